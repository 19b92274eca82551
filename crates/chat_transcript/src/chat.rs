use std::sync::Arc;

use tracing::debug;

use crate::config::ChatConfig;
use crate::transcript::correlation::{FunctionResults, JsonResultDecoder, ResultDecoder};
use crate::transcript::error::Result;
use crate::transcript::message::Message;
use crate::transcript::normalize::GreetingCache;
use crate::transcript::registry::{ActionRendererRegistry, RenderRegistry};
use crate::transcript::resolver::{MarkdownFormatter, RenderedRow, Resolver};
use crate::transcript::scroll::{AutoScroll, ScrollRequest};
use crate::ui::terminal::markdown::TuiMarkdownFormatter;

/// Output of one render pass.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderPass {
    /// Greetings followed by the caller's transcript.
    pub messages: Vec<Message>,
    pub rows: Vec<RenderedRow>,
    /// Set when the transcript changed since the previous pass.
    pub scroll: Option<ScrollRequest>,
}

/// Runs normalize → correlate → resolve → scroll over the whole transcript
/// on every update.
pub struct ChatRenderer {
    config: ChatConfig,
    registry: Arc<dyn RenderRegistry>,
    decoder: Arc<dyn ResultDecoder>,
    formatter: Arc<dyn MarkdownFormatter>,
    greetings: GreetingCache,
    auto_scroll: AutoScroll,
}

impl ChatRenderer {
    pub fn new(config: ChatConfig, registry: Arc<dyn RenderRegistry>) -> Self {
        Self {
            config,
            registry,
            decoder: Arc::new(JsonResultDecoder),
            formatter: Arc::new(TuiMarkdownFormatter),
            greetings: GreetingCache::new(),
            auto_scroll: AutoScroll::new(),
        }
    }

    pub fn with_decoder(mut self, decoder: Arc<dyn ResultDecoder>) -> Self {
        self.decoder = decoder;
        self
    }

    pub fn with_formatter(mut self, formatter: Arc<dyn MarkdownFormatter>) -> Self {
        self.formatter = formatter;
        self
    }

    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    /// Replace the configuration. Greetings are regenerated on the next pass
    /// only if the greeting set changed.
    pub fn set_config(&mut self, config: ChatConfig) {
        self.config = config;
    }

    pub fn render(&mut self, transcript: &[Message], in_progress: bool) -> Result<RenderPass> {
        let messages = self
            .greetings
            .normalize(&self.config.labels.initial, transcript);
        let results = FunctionResults::build(&messages, self.decoder.as_ref());
        let rows = Resolver::new(
            &self.config,
            self.registry.as_ref(),
            self.formatter.as_ref(),
            &results,
            in_progress,
        )
        .resolve_all(&messages)?;
        let scroll = self.auto_scroll.observe(&messages);

        debug!(
            "Render pass: {} messages, {} rows, {} results, in_progress={}",
            messages.len(),
            rows.len(),
            results.len(),
            in_progress
        );

        Ok(RenderPass {
            messages,
            rows,
            scroll,
        })
    }
}

impl Default for ChatRenderer {
    fn default() -> Self {
        Self::new(ChatConfig::default(), Arc::new(ActionRendererRegistry::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InitialMessages;
    use crate::transcript::registry::{ActionRender, RenderOutput};
    use crate::transcript::resolver::RenderDecision;
    use ratatui::text::Text;

    fn config_with_greetings(greetings: &[&str]) -> ChatConfig {
        let mut config = ChatConfig::default();
        config.labels.initial =
            InitialMessages::Many(greetings.iter().map(|g| g.to_string()).collect());
        config
    }

    #[test]
    fn greetings_only_transcript() {
        let mut renderer = ChatRenderer::new(
            config_with_greetings(&["Hi!", "How can I help?"]),
            Arc::new(ActionRendererRegistry::new()),
        );
        let pass = renderer.render(&[], false).unwrap();

        assert_eq!(pass.messages.len(), 2);
        assert_eq!(pass.rows.len(), 2);
        assert!(pass.rows.iter().all(|row| row.decision.is_assistant_text()));
        assert_ne!(pass.messages[0].id, pass.messages[1].id);
    }

    #[test]
    fn greeting_ids_are_stable_across_passes() {
        let mut renderer = ChatRenderer::new(
            config_with_greetings(&["Hi!"]),
            Arc::new(ActionRendererRegistry::new()),
        );
        let first = renderer.render(&[], false).unwrap();
        let second = renderer.render(&[Message::user("hello")], true).unwrap();
        assert_eq!(first.messages[0].id, second.messages[0].id);
    }

    #[test]
    fn weather_conversation_end_to_end() {
        let registry = ActionRendererRegistry::new().with(
            "getWeather",
            ActionRender::render(|props| match props.result {
                Some(result) => RenderOutput::Text(format!("Paris: {result}")),
                None => RenderOutput::Text("Fetching Paris weather…".to_string()),
            }),
        );
        let mut renderer = ChatRenderer::new(ChatConfig::default(), Arc::new(registry));
        let call = Message::assistant("")
            .with_id("A")
            .with_function_call("getWeather", r#"{"city":"Paris"}"#);
        let mut transcript = vec![Message::user("Weather in Paris?"), call];

        let pass = renderer.render(&transcript, false).unwrap();
        assert_eq!(
            pass.rows[1].decision,
            RenderDecision::AssistantText(Text::raw("Fetching Paris weather…"))
        );
        assert!(pass.scroll.is_some());

        transcript.push(Message::function_result("\"18°C\""));
        let pass = renderer.render(&transcript, false).unwrap();
        assert_eq!(pass.rows.len(), 2);
        assert_eq!(
            pass.rows[1].decision,
            RenderDecision::AssistantText(Text::raw("Paris: 18°C"))
        );
        assert!(pass.scroll.is_some());

        let pass = renderer.render(&transcript, false).unwrap();
        assert!(pass.scroll.is_none());
    }

    #[test]
    fn failed_pass_does_not_consume_scroll() {
        let registry = ActionRendererRegistry::new().with(
            "lookup",
            ActionRender::render(|_| RenderOutput::Text(String::new())),
        );
        let mut renderer = ChatRenderer::new(ChatConfig::default(), Arc::new(registry));
        let good = vec![Message::assistant("")
            .with_id("A")
            .with_function_call("lookup", "{}")];
        let malformed = vec![Message::assistant("")
            .with_id("A")
            .with_function_call("lookup", "{")];

        assert!(renderer.render(&good, false).unwrap().scroll.is_some());
        assert!(renderer.render(&malformed, false).is_err());
        assert!(renderer.render(&good, false).unwrap().scroll.is_none());
    }

    struct ShoutingDecoder;

    impl ResultDecoder for ShoutingDecoder {
        fn decode(&self, raw: &str) -> String {
            raw.to_uppercase()
        }
    }

    struct BracketFormatter;

    impl MarkdownFormatter for BracketFormatter {
        fn format(&self, text: &str) -> Text<'static> {
            Text::raw(format!("[{text}]"))
        }
    }

    #[test]
    fn injected_decoder_and_formatter_are_used() {
        let registry = ActionRendererRegistry::new().with(
            "getWeather",
            ActionRender::render(|props| {
                RenderOutput::Text(props.result.unwrap_or("pending").to_string())
            }),
        );
        let mut renderer = ChatRenderer::new(ChatConfig::default(), Arc::new(registry))
            .with_decoder(Arc::new(ShoutingDecoder))
            .with_formatter(Arc::new(BracketFormatter));
        let transcript = vec![
            Message::assistant("")
                .with_id("A")
                .with_function_call("getWeather", "{}"),
            Message::function_result("sunny"),
            Message::assistant("It is *sunny*"),
        ];

        let pass = renderer.render(&transcript, false).unwrap();

        assert_eq!(pass.rows.len(), 2);
        assert_eq!(
            pass.rows[0].decision,
            RenderDecision::AssistantText(Text::raw("SUNNY"))
        );
        assert_eq!(
            pass.rows[1].decision,
            RenderDecision::AssistantText(Text::raw("[It is *sunny*]"))
        );
    }

    #[test]
    fn set_config_regenerates_greetings_only_when_they_change() {
        let mut renderer = ChatRenderer::new(
            config_with_greetings(&["Hi!"]),
            Arc::new(ActionRendererRegistry::new()),
        );
        let original = renderer.render(&[], false).unwrap().messages[0].id.clone();

        let mut relabeled = renderer.config().clone();
        relabeled.labels.done = "Finished".to_string();
        renderer.set_config(relabeled);
        assert_eq!(renderer.config().labels.done, "Finished");
        let pass = renderer.render(&[], false).unwrap();
        assert_eq!(pass.messages[0].id, original);

        renderer.set_config(config_with_greetings(&["Hello again!"]));
        let pass = renderer.render(&[], false).unwrap();
        assert_ne!(pass.messages[0].id, original);
        assert_eq!(pass.messages[0].text(), "Hello again!");
    }
}
