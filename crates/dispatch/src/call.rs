use std::any::Any;
use std::sync::Arc;

use thiserror::Error;

use crate::Value;

/// Errors that can occur on the dynamic call path.
///
/// This error type is shared between the dispatch and override layers to
/// avoid circular dependencies: [`CallError::Disabled`] is produced by the
/// interception wrapper, everything else by the table or method bodies.
#[derive(Error, Debug, Clone)]
pub enum CallError {
	/// General method failure with message.
	#[error("{0}")]
	Failed(String),
	/// A required argument was not provided.
	#[error("missing argument: {0}")]
	MissingArgument(&'static str),
	/// An argument was provided but invalid.
	#[error("invalid argument: {0}")]
	InvalidArgument(String),
	/// Method name was not found in the table.
	#[error("method not found: {0}")]
	NotFound(String),
	/// Method is currently disabled. Displays the override message verbatim.
	#[error("{0}")]
	Disabled(String),
}

/// Caller-supplied block parameter, forwarded to method bodies unchanged.
pub type BlockFn<'a> = dyn FnMut(&[Value]) -> Result<Value, CallError> + 'a;

/// Stored method implementation.
///
/// Reference-counted rather than a bare fn pointer: tables re-bind names at
/// runtime and aliases share one implementation.
pub type MethodFn = Arc<dyn Fn(Call<'_>) -> Result<Value, CallError> + Send + Sync>;

/// One dynamic invocation: the receiver it executes against, positional
/// arguments, and an optional block parameter.
pub struct Call<'a> {
	/// The receiver bound as the executing context.
	pub receiver: &'a mut dyn Any,
	/// Positional arguments.
	pub args: &'a [Value],
	/// Optional block parameter.
	pub block: Option<&'a mut BlockFn<'a>>,
}

impl<'a> Call<'a> {
	/// Creates a call with no block parameter.
	pub fn new(receiver: &'a mut dyn Any, args: &'a [Value]) -> Self {
		Self {
			receiver,
			args,
			block: None,
		}
	}

	/// Creates a call carrying a block parameter.
	pub fn with_block(
		receiver: &'a mut dyn Any,
		args: &'a [Value],
		block: &'a mut BlockFn<'a>,
	) -> Self {
		Self {
			receiver,
			args,
			block: Some(block),
		}
	}

	/// Invokes the block parameter with the given arguments.
	pub fn yield_block(&mut self, args: &[Value]) -> Result<Value, CallError> {
		match self.block.as_mut() {
			Some(block) => block(args),
			None => Err(CallError::MissingArgument("block")),
		}
	}
}
