use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use tracing::trace;

use super::message::Message;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollTarget {
    LastElement,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBehavior {
    /// Jump without animation.
    Instant,
}

/// Request for the view to bring a transcript element into view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollRequest {
    pub target: ScrollTarget,
    pub behavior: ScrollBehavior,
}

impl ScrollRequest {
    pub fn to_bottom() -> Self {
        Self {
            target: ScrollTarget::LastElement,
            behavior: ScrollBehavior::Instant,
        }
    }
}

/// Emits one scroll request per observed transcript change.
#[derive(Debug, Default)]
pub struct AutoScroll {
    last_fingerprint: Option<(usize, u64)>,
}

impl AutoScroll {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, messages: &[Message]) -> Option<ScrollRequest> {
        let fingerprint = (messages.len(), fingerprint(messages));
        if self.last_fingerprint == Some(fingerprint) {
            return None;
        }
        self.last_fingerprint = Some(fingerprint);
        trace!("Transcript changed ({} messages), scrolling to bottom", messages.len());
        Some(ScrollRequest::to_bottom())
    }

    /// Forget the last observation; the next one always scrolls.
    pub fn reset(&mut self) {
        self.last_fingerprint = None;
    }
}

/// Hash of everything the transport may change while streaming.
fn fingerprint(messages: &[Message]) -> u64 {
    let mut hasher = DefaultHasher::new();
    for message in messages {
        message.id.hash(&mut hasher);
        message.role.hash(&mut hasher);
        message.content.hash(&mut hasher);
        message.function_call.hash(&mut hasher);
        if let Some(partial) = &message.partial_function_call {
            partial.name.hash(&mut hasher);
            partial
                .arguments
                .as_ref()
                .map(|args| args.to_string())
                .hash(&mut hasher);
        }
    }
    hasher.finish()
}
