use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

use crate::{Call, CallError, MethodTable, Value};

/// Process-unique identity for a class or its singleton.
///
/// Identities are allocated from a monotonic counter and never reused, so
/// they remain valid keys even if an owner is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClassId(u64);

impl ClassId {
	fn next() -> Self {
		static NEXT: AtomicU64 = AtomicU64::new(0);
		Self(NEXT.fetch_add(1, Ordering::Relaxed))
	}

	/// Returns the underlying u64 value.
	#[inline]
	pub fn as_u64(self) -> u64 {
		self.0
	}
}

impl fmt::Display for ClassId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "ClassId({})", self.0)
	}
}

/// A class-like owner of dynamically dispatched methods.
///
/// Class-level methods live on the lazily created singleton class, which is
/// an owner in its own right: it has its own identity and its own method
/// table, so an instance method and a class method may share a name without
/// touching each other.
pub struct Class {
	id: ClassId,
	name: String,
	methods: MethodTable,
	singleton: OnceLock<Arc<Class>>,
}

impl Class {
	/// Creates a new class with the given display name.
	pub fn new(name: impl Into<String>) -> Arc<Self> {
		Arc::new(Self {
			id: ClassId::next(),
			name: name.into(),
			methods: MethodTable::new(),
			singleton: OnceLock::new(),
		})
	}

	/// Returns this owner's identity.
	pub fn id(&self) -> ClassId {
		self.id
	}

	/// Returns the display name.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Returns the instance method table.
	pub fn methods(&self) -> &MethodTable {
		&self.methods
	}

	/// Returns the singleton class holding class-level methods.
	pub fn singleton(&self) -> &Arc<Class> {
		self.singleton
			.get_or_init(|| Class::new(format!("<class:{}>", self.name)))
	}

	/// Binds an instance method.
	pub fn define_method<F>(&self, name: impl Into<String>, f: F)
	where
		F: Fn(Call<'_>) -> Result<Value, CallError> + Send + Sync + 'static,
	{
		self.methods.define_fn(name, f);
	}

	/// Binds a class-level method on the singleton.
	pub fn define_class_method<F>(&self, name: impl Into<String>, f: F)
	where
		F: Fn(Call<'_>) -> Result<Value, CallError> + Send + Sync + 'static,
	{
		self.singleton().methods().define_fn(name, f);
	}

	/// Calls an instance method by name.
	pub fn call(&self, name: &str, call: Call<'_>) -> Result<Value, CallError> {
		self.methods.call(name, call)
	}

	/// Calls a class-level method by name.
	pub fn call_class(&self, name: &str, call: Call<'_>) -> Result<Value, CallError> {
		self.singleton().call(name, call)
	}
}

impl fmt::Display for Class {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.name)
	}
}

impl fmt::Debug for Class {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Class")
			.field("id", &self.id)
			.field("name", &self.name)
			.finish()
	}
}
