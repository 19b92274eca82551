use tracing::trace;

use super::message::{Message, Role};
use crate::config::InitialMessages;

/// Build one assistant message per configured greeting, each with a fresh id.
pub fn make_initial_messages(initial: &InitialMessages) -> Vec<Message> {
    initial
        .as_slice()
        .iter()
        .map(|greeting| Message::new(Message::new_id(), Role::Assistant, Some(greeting.clone())))
        .collect()
}

/// Greetings followed by the caller's transcript.
pub fn normalize(greetings: &[Message], transcript: &[Message]) -> Vec<Message> {
    let mut messages = Vec::with_capacity(greetings.len() + transcript.len());
    messages.extend_from_slice(greetings);
    messages.extend_from_slice(transcript);
    messages
}

/// Memoizes synthesized greetings on the configured greeting set, so their
/// ids stay stable across render passes until the configuration changes.
#[derive(Debug, Default)]
pub struct GreetingCache {
    key: Option<InitialMessages>,
    messages: Vec<Message>,
}

impl GreetingCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn greetings(&mut self, initial: &InitialMessages) -> &[Message] {
        if self.key.as_ref() != Some(initial) {
            trace!("Greeting configuration changed, regenerating initial messages");
            self.messages = make_initial_messages(initial);
            self.key = Some(initial.clone());
        }
        &self.messages
    }

    pub fn normalize(&mut self, initial: &InitialMessages, transcript: &[Message]) -> Vec<Message> {
        normalize(self.greetings(initial), transcript)
    }
}
