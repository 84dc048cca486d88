//! Disable and restore methods behind the dispatch table.
//!
//! Disabling a method installs an interception wrapper under its public
//! name; while disabled, calls fail with `CallError::Disabled` instead of
//! running the body. Restoring flips the record back so calls forward to
//! the preserved original. The intended use is guarding test suites: turn
//! dangerous or expensive operations (network, payments) off up front and
//! fail loudly if they are ever exercised.
//!
//! ```
//! use tripwire_dispatch::{Call, Class, Value};
//! use tripwire_overrides::Disable;
//!
//! let mailer = Class::new("Mailer");
//! mailer.define_method("deliver", |_| Ok(Value::from("sent")));
//!
//! mailer.disable_method("deliver", None).unwrap();
//! let err = mailer.call("deliver", Call::new(&mut (), &[])).unwrap_err();
//! assert_eq!(err.to_string(), "Mailer#deliver is disabled");
//!
//! mailer.restore_method("deliver").unwrap();
//! let ok = mailer.call("deliver", Call::new(&mut (), &[])).unwrap();
//! assert_eq!(ok, Value::from("sent"));
//! ```

mod error;
mod mangle;
mod record;
mod registry;

pub use error::OverrideError;
pub use mangle::{MARKERS, MethodName};
pub use record::OverrideRecord;
pub use registry::{DisablerMap, OverrideRegistry, global};

use std::sync::Arc;

use tripwire_dispatch::Class;

/// Disable/restore capability, available on every class.
///
/// Backed by the process-wide [`DisablerMap`]; use an explicit map directly
/// when isolation matters (for example, tests that must not observe each
/// other's overrides).
pub trait Disable {
	/// Disables an instance method until restored.
	fn disable_method(&self, name: &str, message: Option<&str>) -> Result<(), OverrideError>;
	/// Restores a previously disabled instance method.
	fn restore_method(&self, name: &str) -> Result<(), OverrideError>;
	/// Disables a class-level method until restored.
	fn disable_class_method(&self, name: &str, message: Option<&str>) -> Result<(), OverrideError>;
	/// Restores a previously disabled class-level method.
	fn restore_class_method(&self, name: &str) -> Result<(), OverrideError>;
	/// Returns true if the named instance method is currently disabled.
	fn method_disabled(&self, name: &str) -> bool;
	/// Returns true if the named class-level method is currently disabled.
	fn class_method_disabled(&self, name: &str) -> bool;
}

impl Disable for Arc<Class> {
	fn disable_method(&self, name: &str, message: Option<&str>) -> Result<(), OverrideError> {
		global().disable_method(self, name, message)
	}

	fn restore_method(&self, name: &str) -> Result<(), OverrideError> {
		global().restore_method(self, name)
	}

	fn disable_class_method(&self, name: &str, message: Option<&str>) -> Result<(), OverrideError> {
		global().disable_class_method(self, name, message)
	}

	fn restore_class_method(&self, name: &str) -> Result<(), OverrideError> {
		global().restore_class_method(self, name)
	}

	fn method_disabled(&self, name: &str) -> bool {
		global().method_disabled(self, name)
	}

	fn class_method_disabled(&self, name: &str) -> bool {
		global().class_method_disabled(self, name)
	}
}
