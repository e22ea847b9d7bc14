//! Core types shared across the advisor-rs workspace
//!
//! This crate defines the data model of one reasoning session: the
//! [`AgentQuery`] that starts it, the [`Trace`] of recorded [`Step`]s,
//! the [`Directive`] parsed from each raw model response, and the
//! [`AgentResult`] handed back to the caller. It also provides the
//! [`CancelToken`] checked by the reasoning loop.

pub mod cancel;
pub mod query;
pub mod trace;

pub use cancel::CancelToken;
pub use query::{AgentQuery, ChatRole, ChatTurn};
pub use trace::{AgentResult, AgentStatus, Directive, Step, Trace};
