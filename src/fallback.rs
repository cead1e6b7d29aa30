use crate::element::{AttrMap, Element, Name};
use crate::error::Rejection;

/**
# Generic element

Used for every tag for which no domain type could be resolved. It accepts
everything it is given and keeps the character data exactly as read, so
unknown markup survives a parse/render cycle with its whitespace intact.
*/
#[derive(Debug, Default)]
pub struct FallbackElement {
	tag_name: Name,
	attributes: Option<AttrMap>,
	text: Option<String>,
	children: Vec<Box<dyn Element>>,
}

impl FallbackElement {
	pub fn new<N: Into<Name>>(tag_name: N) -> FallbackElement {
		FallbackElement{
			tag_name: tag_name.into(),
			attributes: None,
			text: None,
			children: Vec::new(),
		}
	}

	/// Copy tag name, attributes and text of another element.
	///
	/// Children are not copied: they are owned by the source tree.
	pub fn from_element(other: &dyn Element) -> FallbackElement {
		FallbackElement{
			tag_name: other.tag_name().into(),
			attributes: other.attributes().cloned(),
			text: other.text().map(|s| s.to_string()),
			children: Vec::new(),
		}
	}

	/// The character data exactly as it was read, including whitespace-only
	/// data.
	pub fn untrimmed_text(&self) -> Option<&str> {
		self.text.as_deref()
	}
}

impl Element for FallbackElement {
	fn set_attributes(&mut self, attrs: AttrMap) -> Result<(), Rejection> {
		self.attributes = Some(attrs);
		Ok(())
	}

	fn add_child(&mut self, child: Box<dyn Element>) -> Result<(), Rejection> {
		self.children.push(child);
		Ok(())
	}

	// only the untrimmed variant is of interest
	fn add_text(&mut self, _text: &str) -> Result<(), Rejection> {
		Ok(())
	}

	fn add_untrimmed_text(&mut self, text: &str) -> Result<(), Rejection> {
		self.text = Some(text.to_string());
		Ok(())
	}

	fn preserve_spaces(&self) -> bool {
		true
	}

	fn tag_name(&self) -> &str {
		&self.tag_name
	}

	fn attributes(&self) -> Option<&AttrMap> {
		self.attributes.as_ref()
	}

	/// The untrimmed text, or `None` if it contains nothing but whitespace.
	fn text(&self) -> Option<&str> {
		match self.text.as_deref() {
			Some(s) if s.trim().len() > 0 => Some(s),
			_ => None,
		}
	}

	fn children(&self) -> &[Box<dyn Element>] {
		&self.children
	}
}
