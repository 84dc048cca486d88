use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap as HashMap;

use crate::{Call, CallError, MethodFn, Value};

/// String-keyed table of callable methods.
///
/// Every dynamic call routes through a table, so re-pointing a name swaps
/// behavior for all callers in the process at once.
#[derive(Default)]
pub struct MethodTable {
	methods: RwLock<HashMap<String, MethodFn>>,
}

impl MethodTable {
	/// Creates an empty table.
	pub fn new() -> Self {
		Self::default()
	}

	/// Binds `name` to `method`, replacing any existing binding.
	pub fn define(&self, name: impl Into<String>, method: MethodFn) {
		self.methods.write().insert(name.into(), method);
	}

	/// Binds `name` to a plain closure.
	pub fn define_fn<F>(&self, name: impl Into<String>, f: F)
	where
		F: Fn(Call<'_>) -> Result<Value, CallError> + Send + Sync + 'static,
	{
		self.define(name, Arc::new(f));
	}

	/// Returns the callable bound to `name`, if any.
	pub fn lookup(&self, name: &str) -> Option<MethodFn> {
		self.methods.read().get(name).cloned()
	}

	/// Returns true if `name` is bound.
	pub fn contains(&self, name: &str) -> bool {
		self.methods.read().contains_key(name)
	}

	/// Binds `alias` to the callable currently bound to `existing`.
	pub fn alias(&self, alias: impl Into<String>, existing: &str) -> Result<(), CallError> {
		let mut methods = self.methods.write();
		let method = methods
			.get(existing)
			.cloned()
			.ok_or_else(|| CallError::NotFound(existing.to_string()))?;
		methods.insert(alias.into(), method);
		Ok(())
	}

	/// Looks up `name` and invokes it.
	///
	/// The callable is cloned out first so no lock is held while it runs.
	pub fn call(&self, name: &str, call: Call<'_>) -> Result<Value, CallError> {
		let method = self
			.lookup(name)
			.ok_or_else(|| CallError::NotFound(name.to_string()))?;
		method(call)
	}

	/// Returns bound names, sorted for stable snapshots.
	pub fn names(&self) -> Vec<String> {
		let mut names: Vec<_> = self.methods.read().keys().cloned().collect();
		names.sort();
		names
	}
}

impl std::fmt::Debug for MethodTable {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("MethodTable")
			.field("names", &self.names())
			.finish()
	}
}
