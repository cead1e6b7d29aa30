/*!
# Tree to markup rendering

Renders an [`Element`] tree back to markup text. The layout is fixed:

* every opening tag starts on its own line, indented by the current depth
  times [`INDENT`] spaces;
* text is always wrapped in a CDATA section;
* elements which [preserve spaces](Element::preserve_spaces) get their text
  inline right after the opening tag, and their closing tag right after the
  last child without indentation;
* other elements get their text on a separate line, at the same indentation
  as their tags (not one [`INDENT`] deeper, as older renderers of this
  layout did).

No XML declaration is emitted. Attribute values and text are written
literally; values containing quotes or `]]>` do not survive a round trip.
*/
use std::fmt;

use crate::element::Element;
use crate::util::attributes_to_string;

/// Additional indentation per nesting level.
pub const INDENT: usize = 3;

const CDATA_START: &'static str = "<![CDATA[";
const CDATA_END: &'static str = "]]>";

fn pad<W: fmt::Write + ?Sized>(out: &mut W, n: usize) -> fmt::Result {
	for _ in 0..n {
		out.write_char(' ')?;
	}
	Ok(())
}

/// Write `el` and its subtree to `out`, starting at `indent` spaces.
pub fn encode<W: fmt::Write + ?Sized>(el: &dyn Element, indent: usize, out: &mut W) -> fmt::Result {
	let preserve = el.preserve_spaces();
	pad(out, indent)?;
	out.write_char('<')?;
	out.write_str(el.tag_name())?;
	if let Some(attrs) = el.attributes() {
		out.write_str(&attributes_to_string(attrs))?;
	}
	out.write_char('>')?;

	match el.text() {
		Some(text) if preserve => {
			out.write_str(CDATA_START)?;
			out.write_str(text)?;
			out.write_str(CDATA_END)?;
		},
		Some(text) => {
			out.write_char('\n')?;
			// same column as the tags
			pad(out, indent)?;
			out.write_str(CDATA_START)?;
			out.write_str(text)?;
			out.write_str(CDATA_END)?;
			out.write_char('\n')?;
		},
		None => out.write_char('\n')?,
	}

	for child in el.children() {
		encode(&**child, indent + INDENT, out)?;
	}

	if !preserve {
		pad(out, indent)?;
	}
	out.write_str("</")?;
	out.write_str(el.tag_name())?;
	out.write_str(">\n")
}

/**
# Display adapter for element trees

```
use xmlbind::{Element, FallbackElement, Markup};

let mut el = FallbackElement::new("note");
el.add_untrimmed_text("hi").unwrap();
assert_eq!(Markup::new(&el).to_string(), "<note><![CDATA[hi]]></note>\n");
```
*/
#[derive(Clone, Copy)]
pub struct Markup<'a> {
	el: &'a dyn Element,
	indent: usize,
}

impl<'a> Markup<'a> {
	pub fn new(el: &'a dyn Element) -> Markup<'a> {
		Markup::with_indent(el, 0)
	}

	pub fn with_indent(el: &'a dyn Element, indent: usize) -> Markup<'a> {
		Markup{ el, indent }
	}
}

impl<'a> fmt::Display for Markup<'a> {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		encode(self.el, self.indent, f)
	}
}

/// Render a tree at `indent` spaces; `None` in, `None` out.
pub fn render(el: Option<&dyn Element>, indent: usize) -> Option<String> {
	el.map(|el| Markup::with_indent(el, indent).to_string())
}

/// Render a tree without initial indentation.
pub fn to_markup(el: &dyn Element) -> String {
	Markup::new(el).to_string()
}
