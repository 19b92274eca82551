use derive_more::IsVariant;
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Alphabet used for generated message ids (URL-safe, 64 symbols).
const ID_ALPHABET: &[u8] = b"useandom-26T198340PX75pxJACKVERYMINDBUSHWOLF_GQZbfghjklqvwyzrict";
const ID_LEN: usize = 21;

/// Who produced a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, IsVariant)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    /// Result of an action execution, produced by the transport.
    Function,
    /// Any role this crate has no rendering for (e.g. "error").
    #[serde(other)]
    Unknown,
}

/// A fully streamed action invocation. `arguments` is JSON text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    #[serde(default)]
    pub arguments: String,
}

/// An action invocation that is still streaming in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartialFunctionCall {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arguments: Option<Value>,
}

/// A single transcript entry.
///
/// Messages are owned by the transport; the renderer only ever reads them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, alias = "function_call", skip_serializing_if = "Option::is_none")]
    pub function_call: Option<FunctionCall>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partial_function_call: Option<PartialFunctionCall>,
}

impl Message {
    pub fn new(id: impl Into<String>, role: Role, content: Option<String>) -> Self {
        Self {
            id: id.into(),
            role,
            content,
            function_call: None,
            partial_function_call: None,
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Self::new_id(), Role::User, Some(content.into()))
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Self::new_id(), Role::Assistant, Some(content.into()))
    }

    /// Result message for an action; `content` is the encoded result.
    pub fn function_result(content: impl Into<String>) -> Self {
        Self::new(Self::new_id(), Role::Function, Some(content.into()))
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_function_call(
        mut self,
        name: impl Into<String>,
        arguments: impl Into<String>,
    ) -> Self {
        self.function_call = Some(FunctionCall {
            name: name.into(),
            arguments: arguments.into(),
        });
        self
    }

    pub fn with_partial_function_call(
        mut self,
        name: impl Into<String>,
        arguments: Option<Value>,
    ) -> Self {
        self.partial_function_call = Some(PartialFunctionCall {
            name: name.into(),
            arguments,
        });
        self
    }

    /// Content as a string slice, empty when absent.
    pub fn text(&self) -> &str {
        self.content.as_deref().unwrap_or_default()
    }

    pub fn has_content(&self) -> bool {
        !self.text().is_empty()
    }

    /// Name of the invoked action. A complete call wins over a partial one
    /// unless its name is still empty.
    pub fn action_name(&self) -> Option<&str> {
        match (&self.function_call, &self.partial_function_call) {
            (Some(call), Some(partial)) if call.name.is_empty() => Some(partial.name.as_str()),
            (Some(call), _) => Some(call.name.as_str()),
            (None, Some(partial)) => Some(partial.name.as_str()),
            (None, None) => None,
        }
    }

    /// Generate a fresh random id.
    pub fn new_id() -> String {
        let mut rng = rand::thread_rng();
        (0..ID_LEN)
            .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
            .collect()
    }
}
