/*!
# The element capability

Every node of a tree produced by the [`TreeBuilder`](crate::TreeBuilder)
implements [`Element`]. The builder drives the write side of the trait
(attributes, text, children, completion) while the document is read, and the
[writer](crate::writer) uses the read side to render the tree back to markup.
*/
use std::any::Any;
use std::fmt;
use std::iter::FromIterator;
use std::slice;

use crate::error::Rejection;

/// Compact string type used for tag and attribute names.
pub type Name = smartstring::alias::String;

/**
# Ordered attribute map

Attributes are kept in document order. Lookups are linear, which is the
better trade-off for the handful of attributes typical elements carry.
*/
#[derive(Clone, Default, PartialEq, Eq)]
pub struct AttrMap {
	inner: Vec<(Name, String)>,
}

impl AttrMap {
	pub fn new() -> AttrMap {
		AttrMap{ inner: Vec::new() }
	}

	/// Insert an attribute.
	///
	/// If an attribute with the same name exists, its value is replaced in
	/// place (keeping its original position) and the old value is returned.
	pub fn insert<N: Into<Name>, V: Into<String>>(&mut self, name: N, value: V) -> Option<String> {
		let name = name.into();
		let value = value.into();
		for (k, v) in self.inner.iter_mut() {
			if *k == name {
				return Some(std::mem::replace(v, value));
			}
		}
		self.inner.push((name, value));
		None
	}

	pub fn get(&self, name: &str) -> Option<&str> {
		self.inner.iter().find(|(k, _)| k.as_str() == name).map(|(_, v)| v.as_str())
	}

	pub fn contains(&self, name: &str) -> bool {
		self.get(name).is_some()
	}

	pub fn len(&self) -> usize {
		self.inner.len()
	}

	pub fn is_empty(&self) -> bool {
		self.inner.is_empty()
	}

	pub fn iter(&self) -> Iter<'_> {
		Iter{ inner: self.inner.iter() }
	}
}

impl fmt::Debug for AttrMap {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		f.debug_map().entries(self.iter()).finish()
	}
}

impl<N: Into<Name>, V: Into<String>> FromIterator<(N, V)> for AttrMap {
	fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> AttrMap {
		let mut result = AttrMap::new();
		for (k, v) in iter {
			result.insert(k, v);
		}
		result
	}
}

/// Iterator over the attributes of an [`AttrMap`], in document order.
pub struct Iter<'a> {
	inner: slice::Iter<'a, (Name, String)>,
}

impl<'a> Iterator for Iter<'a> {
	type Item = (&'a str, &'a str);

	fn next(&mut self) -> Option<Self::Item> {
		self.inner.next().map(|(k, v)| (k.as_str(), v.as_str()))
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		self.inner.size_hint()
	}
}

impl<'a> IntoIterator for &'a AttrMap {
	type Item = (&'a str, &'a str);
	type IntoIter = Iter<'a>;

	fn into_iter(self) -> Iter<'a> {
		self.iter()
	}
}

#[doc(hidden)]
pub trait AsAny {
	fn as_any(&self) -> &dyn Any;
}

impl<T: Any> AsAny for T {
	fn as_any(&self) -> &dyn Any {
		self
	}
}

/**
# Contract for tree nodes

The [`TreeBuilder`](crate::TreeBuilder) calls the mutating methods in this
order for every element:

1. [`set_attributes`](Element::set_attributes), exactly once, right after the
   element was constructed;
2. [`add_child`](Element::add_child) for each child element, in document
   order, as soon as the child is complete;
3. once the end tag is reached and only if character data was seen:
   [`add_untrimmed_text`](Element::add_untrimmed_text) with all character
   data of the element, followed by [`add_text`](Element::add_text) with the
   same data trimmed, if the trimmed data is non-empty;
4. [`complete`](Element::complete).

Any of these may reject its input, which aborts the whole parse.

Implementations are constructed through a [`Registry`](crate::Registry), so
they need a way to be built without arguments (typically [`Default`]).
*/
pub trait Element: AsAny + 'static {
	/// Accept the attributes of the start tag.
	fn set_attributes(&mut self, attrs: AttrMap) -> Result<(), Rejection>;

	/// Accept a completed child element.
	fn add_child(&mut self, child: Box<dyn Element>) -> Result<(), Rejection>;

	/// Accept the trimmed, non-empty character data of the element.
	fn add_text(&mut self, text: &str) -> Result<(), Rejection>;

	/// Accept the character data of the element exactly as it was read.
	fn add_untrimmed_text(&mut self, _text: &str) -> Result<(), Rejection> {
		Ok(())
	}

	/// Called when the end tag of the element has been processed.
	fn complete(&mut self) -> Result<(), Rejection> {
		Ok(())
	}

	/// Whether the text must be written back inline and untouched.
	///
	/// Elements which consume [`add_text`](Element::add_text) typically
	/// return false, those which consume
	/// [`add_untrimmed_text`](Element::add_untrimmed_text) return true.
	fn preserve_spaces(&self) -> bool {
		false
	}

	fn tag_name(&self) -> &str;

	fn attributes(&self) -> Option<&AttrMap> {
		None
	}

	fn text(&self) -> Option<&str> {
		None
	}

	fn children(&self) -> &[Box<dyn Element>] {
		&[]
	}
}

impl dyn Element {
	/// Return true if the element is of type `T`.
	pub fn is<T: Element>(&self) -> bool {
		self.as_any().is::<T>()
	}

	/// Borrow the element as its concrete type, if it is a `T`.
	pub fn downcast_ref<T: Element>(&self) -> Option<&T> {
		self.as_any().downcast_ref::<T>()
	}
}

impl fmt::Debug for dyn Element {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		f.debug_struct("Element")
			.field("tag_name", &self.tag_name())
			.field("attributes", &self.attributes())
			.field("text", &self.text())
			.field("children", &self.children())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn attrmap_keeps_insertion_order() {
		let mut attrs = AttrMap::new();
		attrs.insert("b", "2");
		attrs.insert("a", "1");
		attrs.insert("c", "3");
		let names: Vec<_> = attrs.iter().map(|(k, _)| k).collect();
		assert_eq!(names, vec!["b", "a", "c"]);
	}

	#[test]
	fn attrmap_insert_replaces_in_place() {
		let mut attrs: AttrMap = vec![("a", "1"), ("b", "2")].into_iter().collect();
		assert_eq!(attrs.insert("a", "3"), Some("1".to_string()));
		assert_eq!(attrs.len(), 2);
		let pairs: Vec<_> = attrs.iter().collect();
		assert_eq!(pairs, vec![("a", "3"), ("b", "2")]);
	}

	#[test]
	fn attrmap_get_missing_is_none() {
		let attrs = AttrMap::new();
		assert!(attrs.is_empty());
		assert_eq!(attrs.get("x"), None);
		assert!(!attrs.contains("x"));
	}

	#[derive(Default)]
	struct Leaf;

	impl Element for Leaf {
		fn set_attributes(&mut self, _attrs: AttrMap) -> Result<(), Rejection> {
			Ok(())
		}

		fn add_child(&mut self, _child: Box<dyn Element>) -> Result<(), Rejection> {
			Err(Rejection::new("leaf"))
		}

		fn add_text(&mut self, _text: &str) -> Result<(), Rejection> {
			Ok(())
		}

		fn tag_name(&self) -> &str {
			"leaf"
		}
	}

	#[test]
	fn dyn_element_downcasts_to_concrete_type() {
		let el: Box<dyn Element> = Box::new(Leaf);
		assert!(el.is::<Leaf>());
		assert!(el.downcast_ref::<Leaf>().is_some());
		assert!(!el.is::<crate::FallbackElement>());
	}
}
