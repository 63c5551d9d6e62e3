//! Builder-misuse errors (component G).
//!
//! Most of the Builder API's scoping rules are enforced structurally by
//! Rust's ownership model: a `group`/`nest`/`if_break` call takes a closure,
//! so there is no way to leave a scope half-closed the way a dynamically
//! scoped Ruby-style builder could. The one caller-facing boundary that
//! isn't structurally safe is [`crate::builder::Builder::with_target`],
//! which accepts an externally owned child sequence — that value could
//! already be borrowed by a caller further up the stack, so it gets a real
//! fallible check.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BuilderError {
    #[error("with_target: the supplied external target is already borrowed elsewhere")]
    TargetAlreadyBorrowed,
}
