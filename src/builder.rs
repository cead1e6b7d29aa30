/*!
# Event-driven tree builder

The [`TreeBuilder`] consumes a flat sequence of [`Event`]s and turns it into a
tree of [`Element`]s, resolving each tag through a [`Resolver`].
*/
use std::fmt;
use std::mem;

use crate::element::{AttrMap, Element, Name};
use crate::error::{Error, Position, Result, Stage};
use crate::resolver::Resolver;

/**
# Markup parse events

The term *Event* is borrowed from SAX terminology. A well-formed stream
starts with [`Event::StartDocument`], contains exactly one top-level element
and ends with [`Event::EndDocument`].
*/
#[derive(Clone, PartialEq, Debug)]
pub enum Event {
	StartDocument,
	/// The start of an element with its tag name and attributes.
	StartElement(Name, AttrMap),
	/// A chunk of character data.
	///
	/// **Note:** Multiple consecutive `Text` events may be emitted for a
	/// single run of character data.
	Text(String),
	/// The end of the element with the given tag name.
	EndElement(Name),
	EndDocument,
}

/**
# Source for individual markup events

This trait is implemented by event sources such as the
[`Reader`](crate::Reader). It is analogous to the [`std::io::Read`] trait,
but for [`Event`]s instead of bytes.
*/
pub trait EventRead {
	/// Read a single event from the source.
	///
	/// If the end of the source has been reached, `None` is returned.
	fn read(&mut self) -> Result<Option<Event>>;

	/// Read all events until the end of the source.
	///
	/// The given `cb` is invoked for each event.
	fn read_all<F>(&mut self, mut cb: F) -> Result<()>
		where F: FnMut(Event) -> ()
	{
		loop {
			match self.read()? {
				None => return Ok(()),
				Some(ev) => cb(ev),
			}
		}
	}

	/// Position of the most recently returned event, if known.
	fn position(&self) -> Option<Position> {
		None
	}
}

/// Replays a prepared sequence of events.
impl EventRead for std::vec::IntoIter<Event> {
	fn read(&mut self) -> Result<Option<Event>> {
		Ok(self.next())
	}
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum State {
	/// No document in progress.
	Idle,
	/// Between the start of the document and the end of its root element.
	InDocument,
	/// The root element is complete, waiting for the end of the document.
	RootClosed,
	/// The root has been captured.
	Done,
}

/// Bookkeeping for a currently open element.
struct Frame {
	tag: Name,
	element: Box<dyn Element>,
	text: String,
}

/**
# Stack-based tree builder

The builder keeps one [`Frame`] per open element. When an element ends, its
character data is flushed into it, it is completed and then attached to its
parent. The outermost element stays on the stack until the end of the
document, where it becomes the result.

Once a document is complete, the same builder can be used for the next one.
The first failure poisons it: all further calls return the same error and
the partial tree is discarded.

## Example

```
use xmlbind::{Element, Event, ResolverConfig, Registry, RcPtr, Resolver, TreeBuilder};

let resolver = Resolver::new(RcPtr::new(Registry::new()), ResolverConfig::fallback_only());
let mut builder = TreeBuilder::new(resolver);
let mut events = vec![
	Event::StartDocument,
	Event::StartElement("greeting".into(), Default::default()),
	Event::Text("hello".to_string()),
	Event::EndElement("greeting".into()),
	Event::EndDocument,
].into_iter();
let root = builder.build(&mut events).unwrap();
assert_eq!(root.tag_name(), "greeting");
assert_eq!(root.text(), Some("hello"));
```
*/
pub struct TreeBuilder {
	resolver: Resolver,
	state: State,
	frames: Vec<Frame>,
	root: Option<Box<dyn Element>>,
	poison: Option<Error>,
}

impl TreeBuilder {
	pub fn new(resolver: Resolver) -> TreeBuilder {
		TreeBuilder{
			resolver,
			state: State::Idle,
			frames: Vec::new(),
			root: None,
			poison: None,
		}
	}

	pub fn state(&self) -> State {
		self.state
	}

	/// Number of currently open elements.
	pub fn depth(&self) -> usize {
		match self.state {
			State::RootClosed | State::Done => 0,
			State::Idle | State::InDocument => self.frames.len(),
		}
	}

	fn check_poison(&self) -> Result<()> {
		match self.poison.as_ref() {
			Some(e) => Err(e.clone()),
			None => Ok(()),
		}
	}

	/// Poison the builder, dropping everything built so far.
	fn poison(&mut self, e: Error) -> Error {
		log::debug!(target: "xmlbind::builder", "aborting: {}", e);
		self.frames.clear();
		self.root = None;
		self.poison = Some(e.clone());
		e
	}

	/// Reset to an empty stack.
	///
	/// A builder which finished a document may start the next one; an
	/// uncollected root of the previous document is dropped.
	pub fn start_document(&mut self) -> Result<()> {
		self.check_poison()?;
		match self.state {
			State::Idle | State::Done => {
				log::debug!(target: "xmlbind::builder", "start of document");
				self.frames.clear();
				self.root = None;
				self.state = State::InDocument;
				Ok(())
			},
			State::InDocument | State::RootClosed => Err(Error::MalformedStream("document started twice", None)),
		}
	}

	/// Resolve `tag`, push a frame for it and deliver its attributes.
	pub fn start_element(&mut self, tag: Name, attrs: AttrMap) -> Result<()> {
		self.check_poison()?;
		match self.state {
			State::InDocument => (),
			State::Idle => return Err(Error::MalformedStream("element outside of document", None)),
			State::RootClosed | State::Done => return Err(Error::MalformedStream("element after the root element", None)),
		}
		let mut element = self.resolver.resolve(&tag)?;
		log::trace!(target: "xmlbind::builder", "start of {} at depth {}", tag, self.frames.len());
		element.set_attributes(attrs).map_err(|r| Error::rejected(&tag, Stage::Attributes, r))?;
		self.frames.push(Frame{
			tag,
			element,
			text: String::new(),
		});
		Ok(())
	}

	/// Append a chunk of character data to the innermost open element.
	///
	/// Whitespace is kept as-is; trimming happens when the element ends.
	pub fn text(&mut self, chunk: &str) -> Result<()> {
		self.check_poison()?;
		match (self.state, self.frames.last_mut()) {
			(State::InDocument, Some(frame)) => {
				frame.text.push_str(chunk);
				Ok(())
			},
			_ if chunk.trim().len() == 0 => Ok(()),
			_ => Err(Error::MalformedStream("character data outside of the root element", None)),
		}
	}

	/// Flush text into the innermost element, complete it and attach it to
	/// its parent.
	pub fn end_element(&mut self, tag: &str) -> Result<()> {
		self.check_poison()?;
		if self.state != State::InDocument || self.frames.len() == 0 {
			return Err(Error::MalformedStream("end of element without matching start", None));
		}
		let nframes = self.frames.len();
		let frame = &mut self.frames[nframes - 1];
		if frame.tag.as_str() != tag {
			return Err(Error::MalformedStream("end of element does not match the open element", None));
		}

		let text = mem::take(&mut frame.text);
		if text.len() > 0 {
			frame.element.add_untrimmed_text(&text)
				.map_err(|r| Error::rejected(&frame.tag, Stage::Text, r))?;
			let trimmed = text.trim();
			if trimmed.len() > 0 {
				frame.element.add_text(trimmed)
					.map_err(|r| Error::rejected(&frame.tag, Stage::Text, r))?;
			}
		}
		frame.element.complete().map_err(|r| Error::rejected(&frame.tag, Stage::Completion, r))?;

		if nframes == 1 {
			log::trace!(target: "xmlbind::builder", "end of root element {}", tag);
			self.state = State::RootClosed;
			return Ok(());
		}

		// the length check above guarantees a frame to pop
		if let Some(child) = self.frames.pop() {
			let parent = &mut self.frames[nframes - 2];
			log::trace!(target: "xmlbind::builder", "attaching {} to {}", child.tag, parent.tag);
			parent.element.add_child(child.element)
				.map_err(|r| Error::rejected(&parent.tag, Stage::Child, r))?;
		}
		Ok(())
	}

	/// Capture the completed root element.
	pub fn end_document(&mut self) -> Result<()> {
		self.check_poison()?;
		match self.state {
			State::RootClosed => (),
			State::InDocument if self.frames.len() > 0 => {
				return Err(Error::MalformedStream("end of document inside an element", None))
			},
			State::InDocument => return Err(Error::MalformedStream("document without root element", None)),
			State::Idle => return Err(Error::MalformedStream("end of document without start", None)),
			State::Done => return Err(Error::MalformedStream("document ended twice", None)),
		}
		debug_assert!(self.frames.len() == 1);
		self.root = self.frames.pop().map(|frame| frame.element);
		self.state = State::Done;
		log::debug!(target: "xmlbind::builder", "end of document");
		Ok(())
	}

	/// Process a single event.
	///
	/// On failure, `at` is attached to the error and the builder is
	/// poisoned.
	pub fn feed(&mut self, ev: Event, at: Option<Position>) -> Result<()> {
		let result = match ev {
			Event::StartDocument => self.start_document(),
			Event::StartElement(tag, attrs) => self.start_element(tag, attrs),
			Event::Text(chunk) => self.text(&chunk),
			Event::EndElement(tag) => self.end_element(&tag),
			Event::EndDocument => self.end_document(),
		};
		match result {
			Ok(()) => Ok(()),
			Err(e) if self.poison.is_some() => Err(e),
			Err(e) => Err(self.poison(e.with_position(at))),
		}
	}

	/// Take the root element once the document is complete.
	pub fn take_root(&mut self) -> Option<Box<dyn Element>> {
		match self.state {
			State::Done => self.root.take(),
			_ => None,
		}
	}

	/// Drive the builder with all events from `r` and return the root.
	///
	/// Errors from the event source are passed through, with the source
	/// position attached if they do not carry one yet.
	pub fn build<R: EventRead>(&mut self, r: &mut R) -> Result<Box<dyn Element>> {
		self.check_poison()?;
		loop {
			let ev = match r.read() {
				Ok(Some(ev)) => ev,
				Ok(None) => break,
				Err(e) => return Err(self.poison(e.with_position(r.position()))),
			};
			self.feed(ev, r.position())?;
		}
		match self.take_root() {
			Some(root) => Ok(root),
			None => Err(self.poison(Error::MalformedStream("event stream ended before the document", r.position()))),
		}
	}
}

impl fmt::Debug for TreeBuilder {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		f.debug_struct("TreeBuilder")
			.field("state", &self.state)
			.field("depth", &self.depth())
			.finish()
	}
}
