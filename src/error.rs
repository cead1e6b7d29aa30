/*!
# Error types

All failures which abort a parse are represented by [`Error`]. Element
implementations report their own complaints through [`Rejection`], which the
[`TreeBuilder`](crate::TreeBuilder) wraps into
[`Error::ValidationRejected`] together with the tag of the complaining
element and the position of the offending event.
*/
use std::error;
use std::fmt;
use std::result::Result as StdResult;

/// A location in the source document.
///
/// Both fields are 1-based. Columns count chars, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
	pub line: usize,
	pub column: usize,
}

impl Position {
	pub fn new(line: usize, column: usize) -> Position {
		Position{ line, column }
	}
}

impl fmt::Display for Position {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		write!(f, "line {}, column {}", self.line, self.column)
	}
}

/**
# Complaint raised by an element

Returned by the methods of [`Element`](crate::Element) when the element does
not accept what it is being given. The message is surfaced to the caller
verbatim.
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
	message: String,
}

impl Rejection {
	pub fn new<S: Into<String>>(message: S) -> Rejection {
		Rejection{ message: message.into() }
	}

	pub fn message(&self) -> &str {
		&self.message
	}

	pub fn into_message(self) -> String {
		self.message
	}
}

impl fmt::Display for Rejection {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		f.write_str(&self.message)
	}
}

impl error::Error for Rejection {}

/// The element operation during which a [`Rejection`] was raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
	Attributes,
	Text,
	Child,
	Completion,
}

impl fmt::Display for Stage {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		f.write_str(match self {
			Stage::Attributes => "attributes",
			Stage::Text => "text",
			Stage::Child => "child",
			Stage::Completion => "completion",
		})
	}
}

#[derive(Debug, Clone)]
pub enum Error {
	/// The candidate lists handed to
	/// [`ResolverConfig`](crate::ResolverConfig) are inconsistent.
	Configuration(&'static str),
	/// No candidate resolved the tag and unknown tags are not tolerated.
	UnresolvedTag{
		tag: String,
		position: Option<Position>,
	},
	/// A candidate identity is registered, but cannot be constructed.
	InaccessibleConstructor{
		tag: String,
		identity: String,
		position: Option<Position>,
	},
	/// An element refused its attributes, text, a child, or failed its
	/// completion check.
	ValidationRejected{
		/// Tag of the element which raised the rejection
		tag: String,
		stage: Stage,
		message: String,
		position: Option<Position>,
	},
	/// The event sequence does not nest properly.
	MalformedStream(&'static str, Option<Position>),
	/// The source text was refused by the XML parser, either because it is
	/// not well-formed or because it uses a construct outside of the
	/// restricted XML subset.
	Xml(rxml::Error, Option<Position>),
}

pub type Result<T> = StdResult<T, Error>;

impl Error {
	pub(crate) fn rejected(tag: &str, stage: Stage, r: Rejection) -> Error {
		Error::ValidationRejected{
			tag: tag.to_string(),
			stage,
			message: r.into_message(),
			position: None,
		}
	}

	/// Attach a source position, unless the error already carries one.
	pub fn with_position(self, at: Option<Position>) -> Error {
		if self.position().is_some() {
			return self;
		}
		match self {
			Error::UnresolvedTag{ tag, .. } => Error::UnresolvedTag{ tag, position: at },
			Error::InaccessibleConstructor{ tag, identity, .. } => Error::InaccessibleConstructor{ tag, identity, position: at },
			Error::ValidationRejected{ tag, stage, message, .. } => Error::ValidationRejected{ tag, stage, message, position: at },
			Error::MalformedStream(msg, _) => Error::MalformedStream(msg, at),
			Error::Xml(e, _) => Error::Xml(e, at),
			other => other,
		}
	}

	/// The best-known source position of the failure.
	pub fn position(&self) -> Option<Position> {
		match self {
			Error::UnresolvedTag{ position, .. } |
				Error::InaccessibleConstructor{ position, .. } |
				Error::ValidationRejected{ position, .. } => *position,
			Error::MalformedStream(_, at) | Error::Xml(_, at) => *at,
			Error::Configuration(_) => None,
		}
	}
}

impl From<rxml::Error> for Error {
	fn from(e: rxml::Error) -> Error {
		Error::Xml(e, None)
	}
}

struct At(Option<Position>);

impl fmt::Display for At {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		match self.0 {
			Some(pos) => write!(f, " at {}", pos),
			None => Ok(()),
		}
	}
}

impl fmt::Display for Error {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		match self {
			Error::Configuration(msg) => write!(f, "invalid configuration: {}", msg),
			Error::UnresolvedTag{ tag, position } => write!(f, "unknown tag received: {}{}", tag, At(*position)),
			Error::InaccessibleConstructor{ tag, identity, position } => write!(
				f,
				"tag {} found but corresponding type {} does not allow construction{}",
				tag, identity, At(*position),
			),
			Error::ValidationRejected{ tag, stage, message, position } => write!(
				f,
				"element {} rejected {}: {}{}",
				tag, stage, message, At(*position),
			),
			Error::MalformedStream(msg, at) => write!(f, "malformed event stream: {}{}", msg, At(*at)),
			Error::Xml(e, at) => write!(f, "{}{}", e, At(*at)),
		}
	}
}

impl error::Error for Error {
	fn source(&self) -> Option<&(dyn error::Error + 'static)> {
		match self {
			Error::Xml(e, _) => Some(e),
			Error::Configuration(_) |
				Error::UnresolvedTag{ .. } |
				Error::InaccessibleConstructor{ .. } |
				Error::ValidationRejected{ .. } |
				Error::MalformedStream(..) => None,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn with_position_fills_missing_position() {
		let e = Error::rejected("book", Stage::Child, Rejection::new("no pages allowed"));
		let e = e.with_position(Some(Position::new(3, 7)));
		assert_eq!(e.position(), Some(Position::new(3, 7)));
		assert_eq!(
			e.to_string(),
			"element book rejected child: no pages allowed at line 3, column 7",
		);
	}

	#[test]
	fn with_position_keeps_existing_position() {
		let e = Error::MalformedStream("x", Some(Position::new(1, 1)));
		let e = e.with_position(Some(Position::new(9, 9)));
		assert_eq!(e.position(), Some(Position::new(1, 1)));
	}

	#[test]
	fn parser_errors_take_a_position() {
		let e = Error::from(rxml::Error::RestrictedXml("comments"));
		assert_eq!(e.position(), None);
		let e = e.with_position(Some(Position::new(2, 4)));
		assert!(matches!(e, Error::Xml(rxml::Error::RestrictedXml(_), Some(pos)) if pos == Position::new(2, 4)));
		assert!(error::Error::source(&e).is_some());
	}

	#[test]
	fn unresolved_tag_display_names_tag() {
		let e = Error::UnresolvedTag{ tag: "fnord".to_string(), position: None };
		assert_eq!(e.to_string(), "unknown tag received: fnord");
	}
}
