//! Pairs action invocations with their results.
//!
//! A result belongs to an assistant message only when the message directly
//! after it has the `function` role. Nothing further down the transcript is
//! considered and names are never compared.

use std::collections::HashMap;

use super::message::{Message, Role};

/// Turns the raw content of a result message into display text.
pub trait ResultDecoder: Send + Sync {
    fn decode(&self, raw: &str) -> String;
}

/// Unquotes results encoded as JSON strings; everything else passes through.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonResultDecoder;

impl ResultDecoder for JsonResultDecoder {
    fn decode(&self, raw: &str) -> String {
        match serde_json::from_str::<serde_json::Value>(raw) {
            Ok(serde_json::Value::String(text)) => text,
            _ => raw.to_string(),
        }
    }
}

/// Decoded action results keyed by the id of the invoking assistant message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FunctionResults {
    results: HashMap<String, String>,
}

impl FunctionResults {
    pub fn build(messages: &[Message], decoder: &dyn ResultDecoder) -> Self {
        let mut results = HashMap::new();
        for (message, next) in messages.iter().zip(messages.iter().skip(1)) {
            if message.role == Role::Assistant
                && message.function_call.is_some()
                && next.role == Role::Function
            {
                results.insert(message.id.clone(), decoder.decode(next.text()));
            }
        }
        Self { results }
    }

    pub fn get(&self, message_id: &str) -> Option<&str> {
        self.results.get(message_id).map(String::as_str)
    }

    pub fn contains(&self, message_id: &str) -> bool {
        self.results.contains_key(message_id)
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}
