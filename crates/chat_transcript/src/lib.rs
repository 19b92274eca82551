//! Render decisions for an assistant chat transcript whose actions run
//! asynchronously and report results as later messages.

pub mod chat;
pub mod config;
pub mod logging;
pub mod transcript;
pub mod ui;

pub use chat::{ChatRenderer, RenderPass};
pub use config::ChatConfig;
