/*!
# Helpers for element implementations

Small functions which [`Element`] implementations typically need while
accepting attributes and children.
*/
use std::fmt::Write;

use crate::element::{AttrMap, Element};
use crate::error::Rejection;

/**
Look up attributes which must be present.

Returns the values in the order of `names`. The first missing attribute
causes a rejection naming `element_tag`.

```
use xmlbind::{mandatory_attributes, AttrMap};

let attrs: AttrMap = vec![("isbn", "123"), ("lang", "en")].into_iter().collect();
assert_eq!(mandatory_attributes("book", &attrs, &["lang", "isbn"]).unwrap(), vec!["en", "123"]);

let err = mandatory_attributes("book", &attrs, &["title"]).err().unwrap();
assert_eq!(err.message(), "Element book is missing attribute title");
```
*/
pub fn mandatory_attributes<'a>(element_tag: &str, attrs: &'a AttrMap, names: &[&str]) -> Result<Vec<&'a str>, Rejection> {
	let mut result = Vec::with_capacity(names.len());
	for name in names {
		match attrs.get(name) {
			Some(v) => result.push(v),
			None => return Err(Rejection::new(format!(
				"Element {} is missing attribute {}",
				element_tag, name,
			))),
		}
	}
	Ok(result)
}

/// Look up attributes which may be absent, substituting `defaults`.
///
/// `defaults` is indexed like `names`; a missing default is read as the
/// empty string.
pub fn optional_attributes<'a>(attrs: &'a AttrMap, names: &[&str], defaults: &[&'a str]) -> Vec<&'a str> {
	names.iter().enumerate().map(|(i, name)| {
		match attrs.get(name) {
			Some(v) => v,
			None => defaults.get(i).copied().unwrap_or(""),
		}
	}).collect()
}

/// Format attributes as ` name="value"` pairs, in order.
pub fn attributes_to_string(attrs: &AttrMap) -> String {
	let mut result = String::new();
	for (name, value) in attrs {
		// writing to a String cannot fail
		let _ = write!(result, " {}=\"{}\"", name, value);
	}
	result
}

/// Check that `child` is one of the `allowed` tags of `parent`.
///
/// An empty `allowed` list permits no children at all.
pub fn verify_child_type(child: &dyn Element, allowed: &[&str], parent: &str) -> Result<(), Rejection> {
	if allowed.len() == 0 {
		return Err(Rejection::new(format!("No children allowed for element {}", parent)));
	}
	if allowed.iter().any(|tag| *tag == child.tag_name()) {
		return Ok(());
	}
	Err(Rejection::new(format!(
		"Invalid child {} for {}, allowed children are: {}",
		child.tag_name(), parent, allowed.join(", "),
	)))
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::fallback::FallbackElement;

	fn attrs(pairs: &[(&str, &str)]) -> AttrMap {
		pairs.iter().cloned().collect()
	}

	#[test]
	fn mandatory_attributes_reports_first_missing() {
		let a = attrs(&[("x", "1")]);
		let err = mandatory_attributes("item", &a, &["x", "y", "z"]).err().unwrap();
		assert_eq!(err.message(), "Element item is missing attribute y");
	}

	#[test]
	fn mandatory_attributes_with_no_names() {
		let a = attrs(&[("x", "1")]);
		assert!(mandatory_attributes("item", &a, &[]).unwrap().is_empty());
	}

	#[test]
	fn optional_attributes_fill_defaults() {
		let a = attrs(&[("b", "two")]);
		assert_eq!(
			optional_attributes(&a, &["a", "b", "c"], &["one", "zwei"]),
			vec!["one", "two", ""],
		);
	}

	#[test]
	fn attributes_to_string_keeps_order() {
		let a = attrs(&[("z", "1"), ("a", "x y")]);
		assert_eq!(attributes_to_string(&a), " z=\"1\" a=\"x y\"");
		assert_eq!(attributes_to_string(&AttrMap::new()), "");
	}

	#[test]
	fn verify_child_type_accepts_listed_tag() {
		let child = FallbackElement::new("page");
		assert!(verify_child_type(&child, &["cover", "page"], "book").is_ok());
	}

	#[test]
	fn verify_child_type_lists_allowed_children() {
		let child = FallbackElement::new("spine");
		let err = verify_child_type(&child, &["cover", "page"], "book").err().unwrap();
		assert_eq!(err.message(), "Invalid child spine for book, allowed children are: cover, page");
	}

	#[test]
	fn verify_child_type_without_allowed_children() {
		let child = FallbackElement::new("page");
		let err = verify_child_type(&child, &[], "leaf").err().unwrap();
		assert_eq!(err.message(), "No children allowed for element leaf");
	}
}
