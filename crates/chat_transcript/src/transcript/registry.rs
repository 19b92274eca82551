//! Action renderer registry.
//!
//! Each action name may map to a static in-progress label or to a render
//! callback that receives the action's status, arguments and result.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use derive_more::IsVariant;
use ratatui::text::Text;
use serde::Serialize;
use serde_json::Value;

/// Execution status of an action, derived from streaming completeness and
/// result correlation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, IsVariant)]
#[serde(rename_all = "camelCase")]
pub enum ActionStatus {
    /// The invocation itself is still streaming.
    InProgress,
    /// Invocation complete, result not yet arrived.
    Executing,
    Complete,
}

impl ActionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionStatus::InProgress => "inProgress",
            ActionStatus::Executing => "executing",
            ActionStatus::Complete => "complete",
        }
    }
}

impl fmt::Display for ActionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Input handed to a render callback.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionRenderProps<'a> {
    pub status: ActionStatus,
    pub args: &'a Value,
    pub result: Option<&'a str>,
}

/// What a render callback produced.
#[derive(Debug, Clone, PartialEq, IsVariant)]
pub enum RenderOutput {
    Text(String),
    /// Pre-built content shown as-is.
    Widget(Text<'static>),
}

pub type RenderFn = Arc<dyn for<'a> Fn(ActionRenderProps<'a>) -> RenderOutput + Send + Sync>;

/// Registry entry for one action.
#[derive(Clone)]
pub enum ActionRender {
    /// Shown next to the spinner while the action is streaming.
    Label(String),
    Render(RenderFn),
}

impl ActionRender {
    pub fn label(label: impl Into<String>) -> Self {
        ActionRender::Label(label.into())
    }

    pub fn render<F>(f: F) -> Self
    where
        F: for<'a> Fn(ActionRenderProps<'a>) -> RenderOutput + Send + Sync + 'static,
    {
        ActionRender::Render(Arc::new(f))
    }
}

impl fmt::Debug for ActionRender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionRender::Label(label) => f.debug_tuple("Label").field(label).finish(),
            ActionRender::Render(_) => f.write_str("Render(..)"),
        }
    }
}

/// Read-only lookup from action name to its renderer.
pub trait RenderRegistry: Send + Sync {
    fn lookup(&self, action_name: &str) -> Option<ActionRender>;
}

/// Map-backed registry. Populated up front, then shared read-only.
#[derive(Debug, Default, Clone)]
pub struct ActionRendererRegistry {
    renderers: HashMap<String, ActionRender>,
}

impl ActionRendererRegistry {
    pub fn new() -> Self {
        Self {
            renderers: HashMap::new(),
        }
    }

    pub fn register(&mut self, action_name: impl Into<String>, render: ActionRender) {
        self.renderers.insert(action_name.into(), render);
    }

    pub fn with(mut self, action_name: impl Into<String>, render: ActionRender) -> Self {
        self.register(action_name, render);
        self
    }

    pub fn len(&self) -> usize {
        self.renderers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.renderers.is_empty()
    }
}

impl RenderRegistry for ActionRendererRegistry {
    fn lookup(&self, action_name: &str) -> Option<ActionRender> {
        self.renderers.get(action_name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn lookup_returns_registered_entries() {
        let registry = ActionRendererRegistry::new()
            .with("search", ActionRender::label("Searching…"))
            .with(
                "getWeather",
                ActionRender::render(|props| RenderOutput::Text(props.status.to_string())),
            );

        assert_eq!(registry.len(), 2);
        assert!(matches!(
            registry.lookup("search"),
            Some(ActionRender::Label(label)) if label == "Searching…"
        ));

        let Some(ActionRender::Render(render)) = registry.lookup("getWeather") else {
            panic!("expected a render callback");
        };
        let args = json!({});
        let output = render(ActionRenderProps {
            status: ActionStatus::Executing,
            args: &args,
            result: None,
        });
        assert_eq!(output, RenderOutput::Text("executing".to_string()));
        assert!(registry.lookup("missing").is_none());
    }

    #[test]
    fn status_serializes_camel_case() {
        assert_eq!(
            serde_json::to_string(&ActionStatus::InProgress).unwrap(),
            "\"inProgress\""
        );
        assert_eq!(ActionStatus::Complete.as_str(), "complete");
    }
}
