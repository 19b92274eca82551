//! Terminal presentation of render decisions.

pub mod markdown;
pub mod view;

pub use markdown::TuiMarkdownFormatter;
pub use view::TranscriptView;
