use thiserror::Error;

/// Errors from the disable/restore surface.
///
/// Rejected calls to a disabled method are not represented here: those
/// surface on the call path as `CallError::Disabled`.
#[derive(Error, Debug, Clone)]
pub enum OverrideError {
	/// Tried to disable a method the owner does not define.
	#[error("no method {name:?} on {owner}")]
	UnknownMethod { owner: String, name: String },
	/// Tried to restore a method that was never disabled for this owner.
	#[error("no override recorded for {owner}#{name}")]
	UnknownOverride { owner: String, name: String },
}
