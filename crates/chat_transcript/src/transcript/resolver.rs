//! Per-message render decisions.
//!
//! The resolver is a pure function of the message, its position, the
//! correlation table, the registry and the progress flag. Every pass is
//! computed from scratch over the whole transcript.

use derive_more::IsVariant;
use ratatui::text::Text;
use serde_json::Value;
use tracing::{trace, warn};

use super::correlation::FunctionResults;
use super::error::{RenderError, Result};
use super::message::{Message, Role};
use super::registry::{
    ActionRender, ActionRenderProps, ActionStatus, RenderFn, RenderOutput, RenderRegistry,
};
use crate::config::ChatConfig;

/// Converts assistant markdown into displayable text.
pub trait MarkdownFormatter: Send + Sync {
    fn format(&self, text: &str) -> Text<'static>;
}

/// What the view should show for one message.
#[derive(Debug, Clone, PartialEq, IsVariant)]
pub enum RenderDecision {
    UserText(String),
    AssistantText(Text<'static>),
    /// Nothing to show yet besides the spinner icon.
    AssistantSpinner,
    AssistantStatusLabel { spinner: bool, label: String },
    /// Output of an action render callback, shown as-is.
    CustomWidget(Text<'static>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedRow {
    /// Position in the normalized transcript.
    pub index: usize,
    pub message_id: String,
    pub decision: RenderDecision,
}

pub struct Resolver<'a> {
    config: &'a ChatConfig,
    registry: &'a dyn RenderRegistry,
    formatter: &'a dyn MarkdownFormatter,
    results: &'a FunctionResults,
    in_progress: bool,
}

impl<'a> Resolver<'a> {
    pub fn new(
        config: &'a ChatConfig,
        registry: &'a dyn RenderRegistry,
        formatter: &'a dyn MarkdownFormatter,
        results: &'a FunctionResults,
        in_progress: bool,
    ) -> Self {
        Self {
            config,
            registry,
            formatter,
            results,
            in_progress,
        }
    }

    /// Resolve every message. Messages without a visual row are skipped.
    pub fn resolve_all(&self, messages: &[Message]) -> Result<Vec<RenderedRow>> {
        let mut rows = Vec::with_capacity(messages.len());
        for (index, message) in messages.iter().enumerate() {
            if let Some(decision) = self.resolve(message, index, messages.len())? {
                rows.push(RenderedRow {
                    index,
                    message_id: message.id.clone(),
                    decision,
                });
            }
        }
        Ok(rows)
    }

    pub fn resolve(
        &self,
        message: &Message,
        index: usize,
        len: usize,
    ) -> Result<Option<RenderDecision>> {
        let is_last = index + 1 == len;
        match message.role {
            Role::User => Ok(Some(RenderDecision::UserText(message.text().to_string()))),
            Role::Assistant => self.resolve_assistant(message, is_last).map(Some),
            Role::Function | Role::Unknown => Ok(None),
        }
    }

    fn resolve_assistant(&self, message: &Message, is_last: bool) -> Result<RenderDecision> {
        let streaming = is_last && self.in_progress;

        if streaming && !message.has_content() && message.partial_function_call.is_none() {
            return Ok(RenderDecision::AssistantSpinner);
        }

        let Some(action) = message.action_name() else {
            return Ok(RenderDecision::AssistantText(
                self.formatter.format(message.text()),
            ));
        };

        // An empty label is treated like a missing entry.
        let entry = self
            .registry
            .lookup(action)
            .filter(|entry| !matches!(entry, ActionRender::Label(label) if label.is_empty()));

        match entry {
            None => {
                trace!("No renderer registered for action {}", action);
                if !streaming && message.function_call.is_some() {
                    Ok(self.done())
                } else {
                    Ok(RenderDecision::AssistantSpinner)
                }
            }
            Some(ActionRender::Label(label)) => {
                if streaming {
                    Ok(RenderDecision::AssistantStatusLabel {
                        spinner: true,
                        label,
                    })
                } else {
                    Ok(self.done())
                }
            }
            Some(ActionRender::Render(render)) => {
                self.render_action(message, action, &render, streaming)
            }
        }
    }

    fn render_action(
        &self,
        message: &Message,
        action: &str,
        render: &RenderFn,
        streaming: bool,
    ) -> Result<RenderDecision> {
        let args = self.action_arguments(message, action)?;
        let result = self.results.get(&message.id);
        let status = if result.is_some() {
            ActionStatus::Complete
        } else if message.function_call.is_some() {
            ActionStatus::Executing
        } else {
            ActionStatus::InProgress
        };

        let output = render(ActionRenderProps {
            status,
            args: &args,
            result,
        });

        Ok(match output {
            RenderOutput::Text(label) if streaming => RenderDecision::AssistantStatusLabel {
                spinner: true,
                label,
            },
            RenderOutput::Text(text) => RenderDecision::AssistantText(Text::raw(text)),
            RenderOutput::Widget(widget) => RenderDecision::CustomWidget(widget),
        })
    }

    /// Parsed arguments of a complete call, or the partially decoded value of
    /// a call still streaming.
    fn action_arguments(&self, message: &Message, action: &str) -> Result<Value> {
        match &message.function_call {
            Some(call) => {
                let raw = if call.arguments.is_empty() {
                    "{}"
                } else {
                    call.arguments.as_str()
                };
                serde_json::from_str(raw).map_err(|source| {
                    warn!(
                        "Malformed arguments for action {} in message {}",
                        action, message.id
                    );
                    RenderError::MalformedArguments {
                        message_id: message.id.clone(),
                        action: action.to_string(),
                        source,
                    }
                })
            }
            None => Ok(message
                .partial_function_call
                .as_ref()
                .and_then(|call| call.arguments.clone())
                .unwrap_or(Value::Null)),
        }
    }

    fn done(&self) -> RenderDecision {
        RenderDecision::AssistantStatusLabel {
            spinner: false,
            label: self.config.labels.done.clone(),
        }
    }
}
