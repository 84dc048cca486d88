use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use tracing::{debug, trace};
use tripwire_dispatch::{Call, CallError, Class, MethodFn, Value};

use crate::OverrideError;
use crate::mangle::MethodName;

/// Interception state for one method on one owner.
///
/// A record is created disabled: installation rewrites the owner's dispatch
/// entries and turns the method off in the same step. The true original is
/// captured exactly once; later disable/restore calls only flip the flag
/// and never touch the table again.
pub struct OverrideRecord {
	owner: Arc<Class>,
	name: MethodName,
	original: MethodFn,
	enabled: AtomicBool,
	message: Mutex<String>,
}

impl std::fmt::Debug for OverrideRecord {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("OverrideRecord")
			.field("owner", &self.owner.name())
			.field("name", &self.name)
			.field("enabled", &self.enabled)
			.finish_non_exhaustive()
	}
}

impl OverrideRecord {
	/// Captures the original implementation and installs the wrapper.
	///
	/// Must run at most once per (owner, name) — the registry guarantees a
	/// second disable reuses the existing record. Running installation again
	/// would capture the wrapper itself and lose the original for good.
	pub(crate) fn install(owner: &Arc<Class>, name: &str) -> Result<Arc<Self>, OverrideError> {
		let name = MethodName::parse(name);
		let table = owner.methods();
		let original =
			table
				.lookup(&name.canonical())
				.ok_or_else(|| OverrideError::UnknownMethod {
					owner: owner.name().to_string(),
					name: name.canonical(),
				})?;

		let record = Arc::new(Self {
			owner: owner.clone(),
			message: Mutex::new(default_message(owner, &name)),
			original,
			enabled: AtomicBool::new(false),
			name,
		});

		let wrapper: MethodFn = {
			let record = record.clone();
			Arc::new(move |call: Call<'_>| record.dispatch(call))
		};
		table.define(record.name.with_disable(), wrapper.clone());
		table.define(record.name.without_disable(), record.original.clone());
		table.define(record.name.canonical(), wrapper);

		debug!(owner = %record.owner, method = %record.name, "installed method interception");
		Ok(record)
	}

	/// Returns the owner this record intercepts.
	pub fn owner(&self) -> &Arc<Class> {
		&self.owner
	}

	/// Returns the intercepted public method name.
	pub fn method_name(&self) -> String {
		self.name.canonical()
	}

	/// Returns true if calls currently forward to the original.
	pub fn is_enabled(&self) -> bool {
		self.enabled.load(Ordering::Relaxed)
	}

	/// Returns the message a rejected call carries.
	pub fn message(&self) -> String {
		self.message.lock().clone()
	}

	/// Turns the method off and rewrites the message.
	///
	/// `None` resets to the default, so a re-disable reads like a fresh one
	/// rather than resurrecting a stale custom message.
	pub(crate) fn disable(&self, message: Option<&str>) {
		let text = message.map_or_else(|| default_message(&self.owner, &self.name), str::to_string);
		*self.message.lock() = text;
		self.enabled.store(false, Ordering::Relaxed);
		debug!(owner = %self.owner, method = %self.name, "method disabled");
	}

	/// Turns the method back on.
	pub(crate) fn restore(&self) {
		self.enabled.store(true, Ordering::Relaxed);
		debug!(owner = %self.owner, method = %self.name, "method restored");
	}

	fn dispatch(&self, call: Call<'_>) -> Result<Value, CallError> {
		if !self.is_enabled() {
			trace!(owner = %self.owner, method = %self.name, "rejecting call to disabled method");
			return Err(CallError::Disabled(self.message()));
		}
		(self.original)(call)
	}
}

fn default_message(owner: &Class, name: &MethodName) -> String {
	format!("{owner}#{name} is disabled")
}

#[cfg(test)]
mod tests {
	use super::*;

	fn mailer() -> Arc<Class> {
		let class = Class::new("Mailer");
		class.define_method("deliver", |_| Ok(Value::from("sent")));
		class
	}

	#[test]
	fn install_rewrites_all_three_dispatch_entries() {
		let class = mailer();
		let record = OverrideRecord::install(&class, "deliver").unwrap();
		assert!(!record.is_enabled());

		let table = class.methods();
		assert!(table.contains("deliver"));
		assert!(table.contains("deliver_with_disable"));
		assert!(table.contains("deliver_without_disable"));
	}

	#[test]
	fn install_of_an_undefined_method_fails() {
		let class = Class::new("Empty");
		let err = OverrideRecord::install(&class, "missing").unwrap_err();
		assert!(matches!(err, OverrideError::UnknownMethod { .. }));
	}

	#[test]
	fn default_message_uses_the_owner_display_form() {
		let class = mailer();
		let record = OverrideRecord::install(&class, "deliver").unwrap();
		assert_eq!(record.message(), "Mailer#deliver is disabled");

		record.disable(Some("do not email in tests"));
		assert_eq!(record.message(), "do not email in tests");

		record.disable(None);
		assert_eq!(record.message(), "Mailer#deliver is disabled");
	}

	#[test]
	fn alias_bypasses_the_wrapper() {
		let class = mailer();
		let _record = OverrideRecord::install(&class, "deliver").unwrap();

		let direct = class.call("deliver_without_disable", Call::new(&mut (), &[]));
		assert_eq!(direct.unwrap(), Value::from("sent"));

		let err = class.call("deliver", Call::new(&mut (), &[])).unwrap_err();
		assert!(matches!(err, CallError::Disabled(_)));
	}
}
