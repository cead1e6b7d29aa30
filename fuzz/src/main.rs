#[macro_use]
extern crate afl;
extern crate xmlbind;

use xmlbind::{to_markup, Binder, Element, RcPtr, Registry, ResolverConfig};

/// Whether the writer can represent `el` faithfully.
///
/// Text next to child elements picks up the rendering whitespace, and values
/// are written unescaped.
fn representable(el: &dyn Element) -> bool {
	if let Some(text) = el.text() {
		if el.children().len() > 0 || text.contains("]]>") || text.contains('\r') {
			return false;
		}
	}
	if let Some(attrs) = el.attributes() {
		let special = |c: char| c == '"' || c == '&' || c == '<' || c == '\t' || c == '\n' || c == '\r';
		if attrs.iter().any(|(_, v)| v.contains(special)) {
			return false;
		}
	}
	el.children().iter().all(|child| representable(&**child))
}

fn main() {
	fuzz!(|data: &[u8]| {
		let binder = Binder::new(RcPtr::new(Registry::new()), ResolverConfig::fallback_only());
		let first = match binder.parse_bytes(data) {
			Ok(root) if representable(&*root) => to_markup(&*root),
			_ => return,
		};
		let second = match binder.parse_str(&first) {
			Ok(root) => to_markup(&*root),
			Err(e) => panic!("rendered markup could not be read back: {}\n{}", e, first),
		};
		assert_eq!(first, second);
	});
}
