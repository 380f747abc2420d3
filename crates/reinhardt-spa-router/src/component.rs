//! Minimal view model for routed content.
//!
//! Route slots produce [`View`] values. Rendering beyond HTML serialization is
//! left to the host application; the router only decides which content is
//! active.

use std::fmt::Write;

/// Renderable output of a component.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum View {
	/// Renders nothing.
	#[default]
	Empty,
	/// Escaped text.
	Text(String),
	/// An element with attributes and children.
	Element(ElementView),
	/// A sequence of views rendered in order.
	Fragment(Vec<View>),
}

impl View {
	/// Creates a text view.
	pub fn text(text: impl Into<String>) -> Self {
		Self::Text(text.into())
	}

	/// Creates a fragment from any sequence of views.
	pub fn fragment(children: impl IntoIterator<Item = View>) -> Self {
		Self::Fragment(children.into_iter().collect())
	}

	/// Returns whether rendering this view produces no output.
	pub fn is_empty(&self) -> bool {
		match self {
			Self::Empty => true,
			Self::Text(text) => text.is_empty(),
			Self::Element(_) => false,
			Self::Fragment(children) => children.iter().all(View::is_empty),
		}
	}

	/// Serializes the view to HTML.
	pub fn render_to_string(&self) -> String {
		let mut out = String::new();
		self.write_html(&mut out);
		out
	}

	fn write_html(&self, out: &mut String) {
		match self {
			Self::Empty => {}
			Self::Text(text) => out.push_str(&escape(text, false)),
			Self::Element(element) => element.write_html(out),
			Self::Fragment(children) => {
				for child in children {
					child.write_html(out);
				}
			}
		}
	}
}

/// An HTML element.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementView {
	tag: String,
	attrs: Vec<(String, String)>,
	children: Vec<View>,
}

impl ElementView {
	/// Creates an element with the given tag name.
	pub fn new(tag: impl Into<String>) -> Self {
		Self {
			tag: tag.into(),
			attrs: Vec::new(),
			children: Vec::new(),
		}
	}

	/// Adds an attribute.
	pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.attrs.push((name.into(), value.into()));
		self
	}

	/// Appends a child.
	pub fn child(mut self, child: impl IntoView) -> Self {
		self.children.push(child.into_view());
		self
	}

	/// Returns the tag name.
	pub fn tag(&self) -> &str {
		&self.tag
	}

	/// Returns the value of an attribute, if set.
	pub fn get_attr(&self, name: &str) -> Option<&str> {
		self.attrs
			.iter()
			.find(|(key, _)| key == name)
			.map(|(_, value)| value.as_str())
	}

	fn write_html(&self, out: &mut String) {
		out.push('<');
		out.push_str(&self.tag);
		for (name, value) in &self.attrs {
			let _ = write!(out, " {}=\"{}\"", name, escape(value, true));
		}
		out.push('>');
		for child in &self.children {
			child.write_html(out);
		}
		let _ = write!(out, "</{}>", self.tag);
	}
}

fn escape(text: &str, attribute: bool) -> String {
	let mut escaped = String::with_capacity(text.len());
	for c in text.chars() {
		match c {
			'&' => escaped.push_str("&amp;"),
			'<' => escaped.push_str("&lt;"),
			'>' => escaped.push_str("&gt;"),
			'"' if attribute => escaped.push_str("&quot;"),
			_ => escaped.push(c),
		}
	}
	escaped
}

/// Conversion into a [`View`].
pub trait IntoView {
	/// Converts self into a view.
	fn into_view(self) -> View;
}

impl IntoView for View {
	fn into_view(self) -> View {
		self
	}
}

impl IntoView for ElementView {
	fn into_view(self) -> View {
		View::Element(self)
	}
}

impl IntoView for String {
	fn into_view(self) -> View {
		View::Text(self)
	}
}

impl IntoView for &str {
	fn into_view(self) -> View {
		View::Text(self.to_string())
	}
}

/// A renderable unit.
pub trait Component {
	/// Renders the component.
	fn render(&self) -> View;

	/// Returns the component name.
	fn name() -> &'static str
	where
		Self: Sized;
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_text_is_escaped() {
		let view = View::text("<b>Tom & Jerry</b>");
		assert_eq!(view.render_to_string(), "&lt;b&gt;Tom &amp; Jerry&lt;/b&gt;");
	}

	#[rstest]
	fn test_element_rendering() {
		let view = ElementView::new("a")
			.attr("href", "/about?x=\"1\"")
			.child("About")
			.into_view();

		assert_eq!(
			view.render_to_string(),
			"<a href=\"/about?x=&quot;1&quot;\">About</a>"
		);
	}

	#[rstest]
	fn test_fragment_and_empty() {
		let view = View::fragment([View::Empty, View::text("a"), View::text("b")]);
		assert_eq!(view.render_to_string(), "ab");
		assert!(!view.is_empty());
		assert!(View::fragment([View::Empty, View::text("")]).is_empty());
	}

	#[rstest]
	fn test_get_attr() {
		let element = ElementView::new("div").attr("id", "main");
		assert_eq!(element.get_attr("id"), Some("main"));
		assert_eq!(element.get_attr("class"), None);
		assert_eq!(element.tag(), "div");
	}
}
