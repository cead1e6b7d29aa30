/*!
# Type registry

Maps fully qualified type identities (`namespace + "." + prefix + tag`) to
factories which produce fresh [`Element`] instances.
*/
use std::collections::HashMap;
use std::fmt;
#[cfg(not(feature = "mt"))]
use std::rc::Rc;
#[cfg(feature = "mt")]
use std::sync::Arc;

use crate::element::Element;

/// Shared pointer used to hand a [`Registry`] to many builders.
///
/// In builds with the `mt` feature, this is a [`Arc`]. In non-`mt` builds,
/// this is a [`std::rc::Rc`]
#[cfg(feature = "mt")]
pub type RcPtr<T> = Arc<T>;
/// Shared pointer used to hand a [`Registry`] to many builders.
///
/// In builds with the `mt` feature, this is a [`std::sync::Arc`].
/// In non-`mt` builds, this is a [`Rc`].
#[cfg(not(feature = "mt"))]
pub type RcPtr<T> = Rc<T>;

/// Produce a fresh, default-initialised element.
pub type Factory = fn() -> Box<dyn Element>;

fn construct_default<T: Element + Default>() -> Box<dyn Element> {
	Box::new(T::default())
}

/// How a registered identity is instantiated.
#[derive(Clone, Copy)]
pub enum Constructor {
	Available(Factory),
	/// The identity is known, but no factory may be used to construct it.
	///
	/// Resolving a tag to such an identity is a deployment error and aborts
	/// the parse.
	Restricted,
}

impl fmt::Debug for Constructor {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		match self {
			Constructor::Available(_) => f.write_str("Available(..)"),
			Constructor::Restricted => f.write_str("Restricted"),
		}
	}
}

/// Build the fully qualified identity of a tag under a candidate.
pub fn qualify(namespace: &str, prefix: &str, tag: &str) -> String {
	let mut result = String::with_capacity(namespace.len() + prefix.len() + tag.len() + 1);
	result.push_str(namespace);
	result.push('.');
	result.push_str(prefix);
	result.push_str(tag);
	result
}

/**
# Identity to factory mapping

The registry is populated by the application on startup and then shared
(read-only) between any number of parses.

## Example

```
use xmlbind::{Registry, FallbackElement};

let mut registry = Registry::new();
registry.register::<FallbackElement>("com.example.Note");
assert!(registry.contains("com.example.Note"));
assert!(!registry.contains("com.example.note"));
```
*/
#[derive(Debug, Default)]
pub struct Registry {
	types: HashMap<String, Constructor>,
}

impl Registry {
	pub fn new() -> Registry {
		Registry{ types: HashMap::new() }
	}

	/// Register `T` under `identity`, constructed through [`Default`].
	///
	/// A previous registration for the same identity is replaced.
	pub fn register<T: Element + Default>(&mut self, identity: &str) -> &mut Registry {
		self.register_factory(identity, construct_default::<T>)
	}

	/// Register an explicit factory under `identity`.
	pub fn register_factory(&mut self, identity: &str, factory: Factory) -> &mut Registry {
		self.types.insert(identity.to_string(), Constructor::Available(factory));
		self
	}

	/// Declare `identity` as known but not constructible.
	pub fn register_restricted(&mut self, identity: &str) -> &mut Registry {
		self.types.insert(identity.to_string(), Constructor::Restricted);
		self
	}

	pub fn lookup(&self, identity: &str) -> Option<Constructor> {
		self.types.get(identity).copied()
	}

	pub fn contains(&self, identity: &str) -> bool {
		self.types.contains_key(identity)
	}

	pub fn len(&self) -> usize {
		self.types.len()
	}

	pub fn is_empty(&self) -> bool {
		self.types.is_empty()
	}
}
