//! Prompt assembly for advisor-rs
//!
//! The [`PromptAssembler`] deterministically renders the running transcript
//! (question, prior steps, scratchpad) into the next model prompt. The
//! template text is an external, versioned asset: changing it changes
//! observable behavior, so tests pin it.

pub mod assembler;
pub mod error;

pub use assembler::PromptAssembler;
pub use error::{PromptError, Result};
