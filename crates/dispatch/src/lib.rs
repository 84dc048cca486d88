//! Dynamic dispatch substrate: classes, method tables, and call plumbing.
//!
//! This crate provides the indirection owners consult for dynamic calls:
//! - [`Value`]: dynamic argument and return values
//! - [`Call`]: one invocation (receiver, arguments, optional block)
//! - [`MethodTable`]: string-keyed table of callables
//! - [`Class`]: a method-table owner with identity and a singleton class
//!
//! Routing calls through a [`MethodTable`] instead of native dispatch is
//! what makes a method name re-bindable while the process runs: every
//! caller sees the new binding immediately.

mod call;
mod class;
mod table;
mod value;

pub use call::{BlockFn, Call, CallError, MethodFn};
pub use class::{Class, ClassId};
pub use table::MethodTable;
pub use value::Value;
