//! Reasoning loop for advisor-rs
//!
//! The [`ReasoningController`] drives the Thought/Action/Observation cycle:
//! render the transcript into a prompt, call the text generator, parse the
//! response into a [`advisor_core::Directive`], dispatch the requested tool,
//! and append the step to the trace. The loop is bounded by an iteration cap
//! and a consecutive-parse-failure cap, and always terminates with an
//! [`advisor_core::AgentResult`] rather than an error.

pub mod controller;
pub mod directive;
pub mod events;

pub use controller::{ControllerConfig, ReasoningController};
pub use directive::parse_directive;
pub use events::{ControllerEventHandler, NoOpEventHandler};
