/*!
# Markup to domain object binding

This crate builds trees of application-defined types directly from markup
documents, and renders such trees back to markup.

## Overview

* A [`Reader`] (or any other [`EventRead`] implementation) produces a flat
  stream of [`Event`]s. The bundled reader is backed by [`rxml`], so documents
  are restricted to its XML 1.0 subset.
* The [`TreeBuilder`] consumes the events and keeps a stack of open
  elements. For every start tag it asks a [`Resolver`] for a fresh
  [`Element`].
* The resolver maps the tag to a type identity by trying an ordered list of
  (namespace, prefix) [`Candidate`]s against a [`Registry`]. Unknown tags
  either abort the parse or become a [`FallbackElement`], depending on the
  [`ResolverConfig`].
* The [`writer`] renders a finished tree back to text.

Element types take part in validation: each of them can refuse attributes,
text or children, and can veto its own completion. The first refusal aborts
the parse with [`Error::ValidationRejected`].

## Example

```
use xmlbind::{
	Binder, Element, AttrMap, Rejection, Registry, ResolverConfig, RcPtr,
	mandatory_attributes, verify_child_type,
};

#[derive(Default)]
struct Shelf {
	books: Vec<Box<dyn Element>>,
}

impl Element for Shelf {
	fn set_attributes(&mut self, _attrs: AttrMap) -> Result<(), Rejection> {
		Ok(())
	}

	fn add_child(&mut self, child: Box<dyn Element>) -> Result<(), Rejection> {
		verify_child_type(&*child, &["book"], "shelf")?;
		self.books.push(child);
		Ok(())
	}

	fn add_text(&mut self, _text: &str) -> Result<(), Rejection> {
		Err(Rejection::new("shelf does not take text"))
	}

	fn tag_name(&self) -> &str {
		"shelf"
	}

	fn children(&self) -> &[Box<dyn Element>] {
		&self.books
	}
}

#[derive(Default)]
struct Book {
	isbn: String,
	title: String,
}

impl Element for Book {
	fn set_attributes(&mut self, attrs: AttrMap) -> Result<(), Rejection> {
		self.isbn = mandatory_attributes("book", &attrs, &["isbn"])?[0].to_string();
		Ok(())
	}

	fn add_child(&mut self, _child: Box<dyn Element>) -> Result<(), Rejection> {
		Err(Rejection::new("book does not take children"))
	}

	fn add_text(&mut self, text: &str) -> Result<(), Rejection> {
		self.title = text.to_string();
		Ok(())
	}

	fn tag_name(&self) -> &str {
		"book"
	}
}

let mut registry = Registry::new();
registry.register::<Shelf>("com.example.shelf");
registry.register::<Book>("com.example.book");
let config = ResolverConfig::new(
	Some(vec!["com.example".to_string()]),
	Some(vec!["".to_string()]),
	false,
).unwrap();
let binder = Binder::new(RcPtr::new(registry), config);

let root = binder.parse_str("<shelf>\n  <book isbn='42'> Dune </book>\n</shelf>").unwrap();
let shelf = root.downcast_ref::<Shelf>().unwrap();
let book = shelf.books[0].downcast_ref::<Book>().unwrap();
assert_eq!(book.isbn, "42");
assert_eq!(book.title, "Dune");

assert!(binder.parse_str("<shelf><book/></shelf>").is_err());
```

## Round trip

Trees which consist of [`FallbackElement`]s only keep their character data
untouched, so rendering them, parsing the result and rendering again gives
the same text, as long as no element mixes text with child elements.
*/
pub mod error;
pub mod element;
pub mod fallback;
pub mod registry;
pub mod resolver;
pub mod builder;
pub mod reader;
pub mod writer;
pub mod util;


#[doc(inline)]
pub use error::{Error, Result, Position, Rejection, Stage};
#[doc(inline)]
pub use element::{Element, AttrMap, Name};
#[doc(inline)]
pub use fallback::FallbackElement;
#[doc(inline)]
pub use registry::{Registry, Constructor, Factory, RcPtr};
#[doc(inline)]
pub use resolver::{Candidate, Resolver, ResolverConfig};
#[doc(inline)]
pub use builder::{Event, EventRead, TreeBuilder, State};
#[doc(inline)]
pub use reader::Reader;
#[doc(inline)]
pub use writer::{encode, render, to_markup, Markup};
pub use util::{mandatory_attributes, optional_attributes, attributes_to_string, verify_child_type};

pub const VERSION: &'static str = env!("CARGO_PKG_VERSION");

/**
# Parse entry point

Holds the shared [`Registry`] together with a [`ResolverConfig`] and runs
each parse on a fresh [`TreeBuilder`], so one binder can serve any number
of documents.
*/
#[derive(Debug, Clone)]
pub struct Binder {
	resolver: Resolver,
}

impl Binder {
	pub fn new(registry: RcPtr<Registry>, config: ResolverConfig) -> Binder {
		Binder{
			resolver: Resolver::new(registry, config),
		}
	}

	/// Create a builder for driving a parse manually.
	pub fn builder(&self) -> TreeBuilder {
		TreeBuilder::new(self.resolver.clone())
	}

	/// Build a tree from any event source.
	pub fn parse<R: EventRead>(&self, r: &mut R) -> Result<Box<dyn Element>> {
		self.builder().build(r)
	}

	pub fn parse_str(&self, doc: &str) -> Result<Box<dyn Element>> {
		self.parse(&mut Reader::new(doc))
	}

	/// Parse UTF-8 encoded bytes.
	pub fn parse_bytes(&self, doc: &[u8]) -> Result<Box<dyn Element>> {
		self.parse(&mut Reader::from_bytes(doc))
	}
}
