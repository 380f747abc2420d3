//! Browser host abstraction.
//!
//! The navigation controller never touches `window` directly. Everything it
//! needs from the browser (history entries, the live location, scroll offset,
//! global click and navigation notifications, and a way to run work after
//! the next layout) goes through [`BrowserHost`].
//!
//! - [`MemoryHost`]: deterministic in-memory host for native builds and tests
//! - `WebHost`: `web-sys` backed host (WASM only)

mod memory;
#[cfg(target_arch = "wasm32")]
mod web;

pub use memory::MemoryHost;
#[cfg(target_arch = "wasm32")]
pub use web::WebHost;

use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::error::RouterError;

/// Snapshot of the browser location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
	/// Serialized origin, e.g. `http://localhost:8000`.
	pub origin: String,
	/// Path component, always starting with `/`.
	pub path: String,
	/// Query component without the leading `?`.
	pub query: String,
}

impl Location {
	/// Creates a location from its parts. A leading `?` on `query` is dropped.
	pub fn new(origin: impl Into<String>, path: impl Into<String>, query: impl Into<String>) -> Self {
		let query = query.into();
		Self {
			origin: origin.into(),
			path: path.into(),
			query: query.strip_prefix('?').map(str::to_string).unwrap_or(query),
		}
	}

	/// Builds a location from a parsed URL.
	pub fn from_url(url: &url::Url) -> Self {
		Self::new(
			url.origin().ascii_serialization(),
			url.path(),
			url.query().unwrap_or_default(),
		)
	}

	/// Returns the full URL.
	pub fn href(&self) -> String {
		if self.query.is_empty() {
			format!("{}{}", self.origin, self.path)
		} else {
			format!("{}{}?{}", self.origin, self.path, self.query)
		}
	}
}

/// State attached to each history entry the router creates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryState {
	/// The path the entry was created for.
	pub path: String,
	/// Caller-provided payload.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub state: Option<serde_json::Value>,
}

impl HistoryState {
	/// Creates a state for `path` without payload.
	pub fn new(path: impl Into<String>) -> Self {
		Self {
			path: path.into(),
			state: None,
		}
	}

	/// Attaches a payload.
	pub fn with_state(mut self, state: Option<serde_json::Value>) -> Self {
		self.state = state;
		self
	}
}

/// The anchor an activation landed on.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AnchorClick {
	/// The `href` attribute, absolute or relative to the current location.
	pub href: String,
	/// The `target` attribute, if any.
	pub target: Option<String>,
	/// Whether the anchor carries a `download` attribute.
	pub download: bool,
	/// Whether the anchor is marked `data-external`.
	pub external: bool,
}

impl AnchorClick {
	/// Creates a plain anchor activation.
	pub fn new(href: impl Into<String>) -> Self {
		Self {
			href: href.into(),
			..Self::default()
		}
	}

	/// Sets the `target` attribute.
	pub fn target(mut self, target: impl Into<String>) -> Self {
		self.target = Some(target.into());
		self
	}

	/// Marks the anchor as a download link.
	pub fn download(mut self, download: bool) -> Self {
		self.download = download;
		self
	}

	/// Marks the anchor as external.
	pub fn external(mut self, external: bool) -> Self {
		self.external = external;
		self
	}
}

/// A click delivered to the global click listener.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClickEvent {
	/// Nearest enclosing anchor of the click target.
	pub anchor: Option<AnchorClick>,
	/// Mouse button; `0` is the primary button.
	pub button: i16,
	/// Whether ctrl, meta, shift or alt was held.
	pub modifier_key: bool,
	/// Whether an earlier handler already prevented the default action.
	pub default_prevented: bool,
}

impl ClickEvent {
	/// A primary-button click on `anchor`.
	pub fn on_anchor(anchor: AnchorClick) -> Self {
		Self {
			anchor: Some(anchor),
			..Self::default()
		}
	}

	/// A click that did not land inside an anchor.
	pub fn elsewhere() -> Self {
		Self::default()
	}

	/// Marks a modifier key as held.
	pub fn with_modifier(mut self) -> Self {
		self.modifier_key = true;
		self
	}

	/// Sets the mouse button.
	pub fn with_button(mut self, button: i16) -> Self {
		self.button = button;
		self
	}
}

/// What the click listener did with a click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickDisposition {
	/// The router handled the click; the host must prevent the default action.
	Intercepted,
	/// The click is left to the browser.
	Ignored,
}

/// Global click listener.
pub type ClickListener = Rc<dyn Fn(&ClickEvent) -> ClickDisposition>;

/// Browser back/forward notification listener.
pub type NavigationListener = Rc<dyn Fn()>;

/// Keeps a host listener installed; dropping it removes the listener.
#[must_use = "dropping a ListenerHandle removes the listener immediately"]
pub struct ListenerHandle {
	release: Option<Box<dyn FnOnce()>>,
}

impl ListenerHandle {
	/// Creates a handle that runs `release` when dropped.
	pub fn new(release: impl FnOnce() + 'static) -> Self {
		Self {
			release: Some(Box::new(release)),
		}
	}
}

impl fmt::Debug for ListenerHandle {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ListenerHandle")
			.field("installed", &self.release.is_some())
			.finish()
	}
}

impl Drop for ListenerHandle {
	fn drop(&mut self) {
		if let Some(release) = self.release.take() {
			release();
		}
	}
}

/// The browser surface consumed by the router.
pub trait BrowserHost {
	/// Returns the live location.
	fn location(&self) -> Location;

	/// Appends a history entry for `url` (absolute or relative) and makes it current.
	fn push_entry(&self, url: &str, state: &HistoryState) -> Result<(), RouterError>;

	/// Replaces the current history entry.
	fn replace_entry(&self, url: &str, state: &HistoryState) -> Result<(), RouterError>;

	/// Starts native back navigation.
	///
	/// The location changes asynchronously; completion is reported through
	/// the navigation listeners.
	fn back(&self) -> Result<(), RouterError>;

	/// Returns the vertical scroll offset.
	fn scroll_y(&self) -> f64;

	/// Scrolls to a vertical offset.
	fn scroll_to(&self, offset: f64);

	/// Installs a capturing global click listener.
	fn on_click(&self, listener: ClickListener) -> Result<ListenerHandle, RouterError>;

	/// Installs a back/forward navigation listener.
	fn on_navigation(&self, listener: NavigationListener) -> Result<ListenerHandle, RouterError>;

	/// Runs `task` after the next layout.
	fn defer(&self, task: Box<dyn FnOnce()>);
}
