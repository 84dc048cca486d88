use std::sync::{Arc, LazyLock};

use parking_lot::Mutex;
use rustc_hash::FxHashMap as HashMap;
use tracing::debug;
use tripwire_dispatch::{Class, ClassId};

use crate::OverrideError;
use crate::record::OverrideRecord;

/// Per-owner table of override records, keyed by public method name.
///
/// Records are created on the first disable of a name and never removed;
/// restore only flips the record's flag back.
pub struct OverrideRegistry {
	owner: Arc<Class>,
	records: Mutex<HashMap<String, Arc<OverrideRecord>>>,
}

impl OverrideRegistry {
	fn new(owner: Arc<Class>) -> Self {
		Self {
			owner,
			records: Mutex::new(HashMap::default()),
		}
	}

	/// Returns the owner this registry tracks.
	pub fn owner(&self) -> &Arc<Class> {
		&self.owner
	}

	/// Disables `name`, installing the interception on first use.
	///
	/// Idempotent: an already-intercepted name reuses its record, so the
	/// installation never runs twice. The record map's lock serializes
	/// first-time installation.
	pub fn disable(&self, name: &str, message: Option<&str>) -> Result<(), OverrideError> {
		let mut records = self.records.lock();
		let record = match records.get(name) {
			Some(record) => record.clone(),
			None => {
				let record = OverrideRecord::install(&self.owner, name)?;
				records.insert(name.to_string(), record.clone());
				record
			}
		};
		record.disable(message);
		Ok(())
	}

	/// Restores `name` to its original implementation.
	///
	/// Restoring a name that was never disabled is a caller bug and fails
	/// with [`OverrideError::UnknownOverride`].
	pub fn restore(&self, name: &str) -> Result<(), OverrideError> {
		let records = self.records.lock();
		let record = records
			.get(name)
			.ok_or_else(|| OverrideError::UnknownOverride {
				owner: self.owner.name().to_string(),
				name: name.to_string(),
			})?;
		record.restore();
		Ok(())
	}

	/// Returns true if `name` is currently disabled.
	pub fn is_disabled(&self, name: &str) -> bool {
		self.records
			.lock()
			.get(name)
			.is_some_and(|record| !record.is_enabled())
	}

	/// Returns the record for `name`, if one was ever created.
	pub fn record(&self, name: &str) -> Option<Arc<OverrideRecord>> {
		self.records.lock().get(name).cloned()
	}

	/// Returns names with override records, sorted for stable snapshots.
	pub fn overridden(&self) -> Vec<String> {
		let mut names: Vec<_> = self.records.lock().keys().cloned().collect();
		names.sort();
		names
	}
}

/// Owner-indexed table of override registries.
///
/// This is the facility's process-wide mutable state made explicit: one
/// registry per owner identity, created lazily on the first disable.
/// Construct a private map where isolation matters; [`global`] serves the
/// common case behind the `Disable` trait.
#[derive(Default)]
pub struct DisablerMap {
	registries: Mutex<HashMap<ClassId, Arc<OverrideRegistry>>>,
}

impl DisablerMap {
	/// Creates an empty map.
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the registry for `owner`, creating it on first use.
	pub fn registry(&self, owner: &Arc<Class>) -> Arc<OverrideRegistry> {
		self.registries
			.lock()
			.entry(owner.id())
			.or_insert_with(|| {
				debug!(owner = %owner, "created override registry");
				Arc::new(OverrideRegistry::new(owner.clone()))
			})
			.clone()
	}

	fn existing(&self, owner: &Arc<Class>) -> Option<Arc<OverrideRegistry>> {
		self.registries.lock().get(&owner.id()).cloned()
	}

	/// Disables an instance method on `owner`.
	pub fn disable_method(
		&self,
		owner: &Arc<Class>,
		name: &str,
		message: Option<&str>,
	) -> Result<(), OverrideError> {
		self.registry(owner).disable(name, message)
	}

	/// Restores an instance method on `owner`.
	pub fn restore_method(&self, owner: &Arc<Class>, name: &str) -> Result<(), OverrideError> {
		let registry = self
			.existing(owner)
			.ok_or_else(|| OverrideError::UnknownOverride {
				owner: owner.name().to_string(),
				name: name.to_string(),
			})?;
		registry.restore(name)
	}

	/// Disables a class-level method: same logic, targeting the singleton.
	pub fn disable_class_method(
		&self,
		owner: &Arc<Class>,
		name: &str,
		message: Option<&str>,
	) -> Result<(), OverrideError> {
		self.disable_method(owner.singleton(), name, message)
	}

	/// Restores a class-level method on `owner`.
	pub fn restore_class_method(&self, owner: &Arc<Class>, name: &str) -> Result<(), OverrideError> {
		self.restore_method(owner.singleton(), name)
	}

	/// Returns true if the named instance method is currently disabled.
	pub fn method_disabled(&self, owner: &Arc<Class>, name: &str) -> bool {
		self.existing(owner)
			.is_some_and(|registry| registry.is_disabled(name))
	}

	/// Returns true if the named class-level method is currently disabled.
	pub fn class_method_disabled(&self, owner: &Arc<Class>, name: &str) -> bool {
		self.method_disabled(owner.singleton(), name)
	}
}

/// Returns the process-wide default map backing the `Disable` trait surface.
pub fn global() -> &'static DisablerMap {
	static GLOBAL: LazyLock<DisablerMap> = LazyLock::new(DisablerMap::default);
	&GLOBAL
}
