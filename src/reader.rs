/*!
# Markup reader

The [`Reader`] drives an [`rxml::PullParser`] over a document held in memory
and translates its events into [`Event`]s for the
[`TreeBuilder`](crate::TreeBuilder).

rxml implements the restricted XML 1.0 subset: comments, processing
instructions and document type declarations are rejected. On top of that,
the reader

* brackets the element events with [`Event::StartDocument`] and
  [`Event::EndDocument`];
* drops the XML declaration;
* names elements and attributes by their local name, so prefixed names lose
  their namespace;
* orders attributes by name, as rxml hands them out as a hash map;
* tracks the line and column each event starts at.
*/
use std::fmt;

use rxml::EventRead as _;

use crate::builder::{Event, EventRead};
use crate::element::{AttrMap, Name};
use crate::error::{Error, Position, Result};

#[derive(Clone, Copy, PartialEq, Debug)]
enum State {
	/// Nothing returned yet
	Initial,
	/// Passing on parser events
	Document,
	Eof,
}

/// Incremental byte offset to line/column conversion.
#[derive(Clone, Copy, Debug)]
struct Cursor {
	offset: usize,
	line: usize,
	column: usize,
}

impl Cursor {
	fn new() -> Cursor {
		Cursor{ offset: 0, line: 1, column: 1 }
	}

	/// Move forward to `offset`, which must not lie behind the cursor.
	fn advance(&mut self, src: &[u8], offset: usize) -> Position {
		let end = offset.min(src.len());
		for b in &src[self.offset.min(end)..end] {
			if *b == b'\n' {
				self.line += 1;
				self.column = 1;
			} else if *b & 0xc0 != 0x80 {
				// count chars, not continuation bytes
				self.column += 1;
			}
		}
		self.offset = self.offset.max(end);
		Position::new(self.line, self.column)
	}
}

fn is_space(b: u8) -> bool {
	b == b' ' || b == b'\t' || b == b'\r' || b == b'\n'
}

/**
# Reader for in-memory documents

## Example

```
use xmlbind::{Event, EventRead, Reader};

let mut r = Reader::new("<a>\n  <b x='1'/>\n</a>");
let mut evs = Vec::new();
r.read_all(|ev| evs.push(ev)).unwrap();
assert_eq!(evs.len(), 8);
assert_eq!(evs[0], Event::StartDocument);
assert!(matches!(&evs[3], Event::StartElement(name, attrs) if name.as_str() == "b" && attrs.get("x") == Some("1")));
```
*/
pub struct Reader<'x> {
	src: &'x [u8],
	parser: rxml::PullParser<&'x [u8]>,
	state: State,
	/// Bytes accounted for by the parser events seen so far
	consumed: usize,
	cursor: Cursor,
	open: Vec<Name>,
	last: Option<Position>,
}

impl<'x> Reader<'x> {
	pub fn new(src: &'x str) -> Reader<'x> {
		Reader::from_bytes(src.as_bytes())
	}

	/// Create a reader for UTF-8 encoded bytes.
	///
	/// Invalid UTF-8 is reported by the first [`read`](EventRead::read)
	/// which reaches it.
	pub fn from_bytes(src: &'x [u8]) -> Reader<'x> {
		Reader{
			src,
			parser: rxml::PullParser::new(src),
			state: State::Initial,
			consumed: 0,
			cursor: Cursor::new(),
			open: Vec::new(),
			last: None,
		}
	}

	/// Position right behind the last complete event.
	pub fn here(&self) -> Position {
		let mut cursor = self.cursor;
		cursor.advance(self.src, self.consumed)
	}

	/// Account for an rxml event of `len` bytes and return where its
	/// content starts.
	fn account(&mut self, len: usize, skip_space: bool) -> Position {
		let mut start = self.consumed;
		if skip_space {
			// the root start tag includes the whitespace before it
			while start < self.src.len() && is_space(self.src[start]) {
				start += 1;
			}
		}
		self.consumed += len;
		self.cursor.advance(self.src, start)
	}

	fn translate(&mut self, ev: rxml::Event) -> Result<Option<Event>> {
		match ev {
			rxml::Event::XMLDeclaration(em, _) => {
				self.account(em.len(), false);
				Ok(None)
			},
			rxml::Event::StartElement(em, (_, localname), attrs) => {
				self.last = Some(self.account(em.len(), true));
				let mut attrs: Vec<_> = attrs.into_iter()
					.map(|((_, name), value)| (name, value))
					.collect();
				attrs.sort_by(|a, b| a.0.as_str().cmp(b.0.as_str()));
				let attrs: AttrMap = attrs.into_iter()
					.map(|(name, value)| (Name::from(name.as_str()), String::from(value)))
					.collect();
				let name = Name::from(localname.as_str());
				self.open.push(name.clone());
				Ok(Some(Event::StartElement(name, attrs)))
			},
			rxml::Event::EndElement(em) => {
				self.last = Some(self.account(em.len(), false));
				match self.open.pop() {
					Some(name) => Ok(Some(Event::EndElement(name))),
					None => Err(Error::MalformedStream("end of element without matching start", self.last)),
				}
			},
			rxml::Event::Text(em, text) => {
				self.last = Some(self.account(em.len(), false));
				Ok(Some(Event::Text(String::from(text))))
			},
		}
	}
}

impl<'x> EventRead for Reader<'x> {
	fn read(&mut self) -> Result<Option<Event>> {
		match self.state {
			State::Initial => {
				self.state = State::Document;
				self.last = Some(self.cursor.advance(self.src, 0));
				return Ok(Some(Event::StartDocument));
			},
			State::Document => (),
			State::Eof => return Ok(None),
		}
		loop {
			let ev = match self.parser.read() {
				Ok(Some(ev)) => ev,
				Ok(None) => {
					self.state = State::Eof;
					self.last = Some(self.here());
					return Ok(Some(Event::EndDocument));
				},
				// rxml keeps returning the same error, no need to poison here
				Err(e) => {
					self.last = Some(self.here());
					return Err(Error::Xml(e, self.last));
				},
			};
			if let Some(ev) = self.translate(ev)? {
				return Ok(Some(ev));
			}
		}
	}

	fn position(&self) -> Option<Position> {
		self.last
	}
}

impl<'x> fmt::Debug for Reader<'x> {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		f.debug_struct("Reader")
			.field("state", &self.state)
			.field("position", &self.here())
			.field("depth", &self.open.len())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn read_all(src: &str) -> Result<Vec<(Event, Position)>> {
		let mut r = Reader::new(src);
		let mut result = Vec::new();
		while let Some(ev) = r.read()? {
			result.push((ev, r.position().unwrap()));
		}
		Ok(result)
	}

	fn events(src: &str) -> Vec<Event> {
		read_all(src).unwrap().into_iter().map(|(ev, _)| ev).collect()
	}

	fn start(tag: &str, attrs: &[(&str, &str)]) -> Event {
		Event::StartElement(tag.into(), attrs.iter().cloned().collect())
	}

	fn end(tag: &str) -> Event {
		Event::EndElement(tag.into())
	}

	#[test]
	fn brackets_document_events() {
		assert_eq!(events("<a/>"), vec![
			Event::StartDocument,
			start("a", &[]),
			end("a"),
			Event::EndDocument,
		]);
	}

	#[test]
	fn end_tags_carry_the_open_name() {
		assert_eq!(events("<a><b>x</b></a>"), vec![
			Event::StartDocument,
			start("a", &[]),
			start("b", &[]),
			Event::Text("x".to_string()),
			end("b"),
			end("a"),
			Event::EndDocument,
		]);
	}

	#[test]
	fn xml_declaration_is_dropped() {
		assert_eq!(events("<?xml version='1.0'?>\n<a/>"), vec![
			Event::StartDocument,
			start("a", &[]),
			end("a"),
			Event::EndDocument,
		]);
	}

	#[test]
	fn attributes_are_sorted_by_name() {
		let evs = events("<a z='1' b='2' m='&amp;'/>");
		match &evs[1] {
			Event::StartElement(_, attrs) => {
				let pairs: Vec<_> = attrs.iter().collect();
				assert_eq!(pairs, vec![("b", "2"), ("m", "&"), ("z", "1")]);
			},
			other => panic!("unexpected event: {:?}", other),
		}
	}

	#[test]
	fn text_is_decoded() {
		let text: String = events("<a>1 &lt; 2<![CDATA[ & <b> ]]></a>").into_iter()
			.filter_map(|ev| match ev {
				Event::Text(t) => Some(t),
				_ => None,
			})
			.collect();
		assert_eq!(text, "1 < 2 & <b> ");
	}

	#[test]
	fn prefixed_names_use_local_part() {
		let evs = events("<x:a xmlns:x='urn:x' x:k='v'/>");
		assert_eq!(evs[1], start("a", &[("k", "v")]));
	}

	#[test]
	fn positions_point_at_event_start() {
		let evs = read_all("<a>\n  <b/>\n  ä<c/>\n</a>").unwrap();
		let at = |pred: &dyn Fn(&Event) -> bool| {
			evs.iter().find(|(ev, _)| pred(ev)).map(|(_, pos)| *pos).unwrap()
		};
		assert_eq!(at(&|ev| *ev == start("a", &[])), Position::new(1, 1));
		assert_eq!(at(&|ev| *ev == start("b", &[])), Position::new(2, 3));
		// columns count chars
		assert_eq!(at(&|ev| *ev == start("c", &[])), Position::new(3, 4));
	}

	#[test]
	fn root_position_skips_leading_whitespace() {
		let evs = read_all("<?xml version='1.0'?>\n\n  <root/>").unwrap();
		assert_eq!(evs[1], (start("root", &[]), Position::new(3, 3)));
	}

	#[test]
	fn restricted_constructs_are_rejected() {
		for doc in ["<a><!-- no --></a>", "<?pi x?><a/>", "<!DOCTYPE a><a/>"].iter() {
			let err = read_all(doc).err().unwrap();
			assert!(matches!(err, Error::Xml(_, Some(_))), "accepted {:?}", doc);
		}
	}

	fn first_error(mut r: Reader) -> Error {
		loop {
			match r.read() {
				Ok(Some(_)) => (),
				Ok(None) => panic!("document was accepted"),
				Err(e) => return e,
			}
		}
	}

	#[test]
	fn mismatched_end_tag_is_an_error() {
		match first_error(Reader::new("<a>\n<b></a>")) {
			Error::Xml(rxml::Error::NotWellFormed(_), Some(pos)) => assert_eq!(pos.line, 2),
			other => panic!("unexpected error: {:?}", other),
		}
	}

	#[test]
	fn invalid_utf8_is_an_error() {
		assert!(matches!(first_error(Reader::from_bytes(b"<a>\xc3</a>")), Error::Xml(..)));
	}

	#[test]
	fn truncated_document_is_an_error() {
		assert!(matches!(read_all("<a><b>"), Err(Error::Xml(..))));
	}

	#[test]
	fn eof_is_sticky() {
		let mut r = Reader::new("<a/>");
		r.read_all(|_| ()).unwrap();
		assert!(r.read().unwrap().is_none());
		assert!(r.read().unwrap().is_none());
	}
}
