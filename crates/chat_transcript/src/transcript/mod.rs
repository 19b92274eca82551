//! Transcript model and the render pipeline core: greeting normalization,
//! result correlation, per-message render decisions and auto-scroll.

pub mod correlation;
pub mod error;
pub mod message;
pub mod normalize;
pub mod registry;
pub mod resolver;
pub mod scroll;

pub use correlation::{FunctionResults, JsonResultDecoder, ResultDecoder};
pub use error::RenderError;
pub use message::{FunctionCall, Message, PartialFunctionCall, Role};
pub use normalize::GreetingCache;
pub use registry::{
    ActionRender, ActionRenderProps, ActionRendererRegistry, ActionStatus, RenderOutput,
    RenderRegistry,
};
pub use resolver::{MarkdownFormatter, RenderDecision, RenderedRow, Resolver};
pub use scroll::{AutoScroll, ScrollRequest};
