//! symsub_binder: Lexical scope tracking for symbolic substitution.
//!
//! The [`ScopeStack`] holds one binding frame per open program, function or
//! block; the [`Binder`] drives it on behalf of a rewrite pass, recording
//! what each name was last bound to and which names are externally
//! observable (the parameter set of the function being rewritten).

mod binder;
mod scope;

pub use binder::Binder;
pub use scope::{BindingFrame, FrameKind, ScopeStack};
