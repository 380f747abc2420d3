//! In-memory browser host.
//!
//! `MemoryHost` models the parts of a browser the router consumes: a history
//! stack, the live location, a scroll offset, global listeners and a deferred
//! task queue. Asynchronous browser behavior is made explicit: [`back`] only
//! queues the navigation notification, and nothing deferred runs until
//! [`MemoryHost::flush`] is called.
//!
//! [`back`]: BrowserHost::back

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::rc::{Rc, Weak};

use url::Url;

use super::{
	BrowserHost, ClickDisposition, ClickEvent, ClickListener, HistoryState, ListenerHandle,
	Location, NavigationListener,
};
use crate::error::RouterError;

const DEFAULT_ORIGIN: &str = "http://localhost";

#[derive(Debug, Clone)]
struct HistoryEntry {
	url: Url,
	state: Option<HistoryState>,
}

struct MemoryInner {
	entries: RefCell<Vec<HistoryEntry>>,
	index: Cell<usize>,
	scroll_y: Cell<f64>,
	scroll_calls: RefCell<Vec<f64>>,
	click_listeners: RefCell<Vec<(u64, ClickListener)>>,
	navigation_listeners: RefCell<Vec<(u64, NavigationListener)>>,
	next_listener: Cell<u64>,
	tasks: RefCell<VecDeque<Box<dyn FnOnce()>>>,
	default_navigations: RefCell<Vec<String>>,
}

impl MemoryInner {
	fn current_url(&self) -> Url {
		self.entries.borrow()[self.index.get()].url.clone()
	}

	fn resolve(&self, url: &str) -> Result<Url, RouterError> {
		let current = self.current_url();
		let next = current.join(url).map_err(|source| RouterError::InvalidUrl {
			url: url.to_string(),
			source,
		})?;

		if next.origin() != current.origin() {
			return Err(RouterError::Navigation(format!(
				"history entry `{}` is not same-origin with `{}`",
				next,
				current.origin().ascii_serialization()
			)));
		}
		Ok(next)
	}

	fn notify_navigation(&self) {
		let listeners: Vec<NavigationListener> = self
			.navigation_listeners
			.borrow()
			.iter()
			.map(|(_, listener)| Rc::clone(listener))
			.collect();

		for listener in listeners {
			listener();
		}
	}

	fn allocate_listener_id(&self) -> u64 {
		let id = self.next_listener.get();
		self.next_listener.set(id + 1);
		id
	}
}

/// Deterministic in-memory [`BrowserHost`].
///
/// Clones share the same browser state, so a test can keep one handle while
/// the router owns another.
///
/// # Example
///
/// ```
/// use reinhardt_spa_router::host::{BrowserHost, MemoryHost};
///
/// let host = MemoryHost::starting_at("/?page=1").unwrap();
/// assert_eq!(host.location().path, "/");
/// assert_eq!(host.location().query, "page=1");
/// ```
#[derive(Clone)]
pub struct MemoryHost {
	inner: Rc<MemoryInner>,
}

impl fmt::Debug for MemoryHost {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("MemoryHost")
			.field("url", &self.inner.current_url().as_str())
			.field("history_len", &self.history_len())
			.field("index", &self.inner.index.get())
			.field("scroll_y", &self.inner.scroll_y.get())
			.field("pending_tasks", &self.pending_tasks())
			.finish()
	}
}

impl Default for MemoryHost {
	fn default() -> Self {
		Self::new()
	}
}

impl MemoryHost {
	/// Creates a host at `http://localhost/`.
	pub fn new() -> Self {
		let url = Url::parse(DEFAULT_ORIGIN)
			.unwrap_or_else(|err| unreachable!("default origin is a valid URL: {err}"));
		Self::from_url(url)
	}

	/// Creates a host whose initial entry is `url`, resolved against
	/// `http://localhost/`.
	pub fn starting_at(url: &str) -> Result<Self, RouterError> {
		let host = Self::new();
		let start = host.inner.resolve(url)?;
		host.inner.entries.borrow_mut()[0].url = start;
		Ok(host)
	}

	/// Creates a host on another origin, e.g. `https://app.example.com/`.
	pub fn with_origin(url: &str) -> Result<Self, RouterError> {
		let url = Url::parse(url).map_err(|source| RouterError::InvalidUrl {
			url: url.to_string(),
			source,
		})?;
		Ok(Self::from_url(url))
	}

	fn from_url(url: Url) -> Self {
		Self {
			inner: Rc::new(MemoryInner {
				entries: RefCell::new(vec![HistoryEntry { url, state: None }]),
				index: Cell::new(0),
				scroll_y: Cell::new(0.0),
				scroll_calls: RefCell::new(Vec::new()),
				click_listeners: RefCell::new(Vec::new()),
				navigation_listeners: RefCell::new(Vec::new()),
				next_listener: Cell::new(0),
				tasks: RefCell::new(VecDeque::new()),
				default_navigations: RefCell::new(Vec::new()),
			}),
		}
	}

	/// Returns this host as a shared trait object.
	pub fn shared(&self) -> Rc<dyn BrowserHost> {
		Rc::new(self.clone())
	}

	/// Returns the current URL.
	pub fn current_url(&self) -> String {
		self.inner.current_url().to_string()
	}

	/// Returns the state stored with the current history entry.
	pub fn current_state(&self) -> Option<HistoryState> {
		self.inner.entries.borrow()[self.inner.index.get()]
			.state
			.clone()
	}

	/// Returns the number of history entries.
	pub fn history_len(&self) -> usize {
		self.inner.entries.borrow().len()
	}

	/// Pushes an entry without notifying anyone, like a script calling
	/// `history.pushState` behind the router's back.
	pub fn visit(&self, url: &str) -> Result<(), RouterError> {
		self.push_entry(url, &HistoryState::new(url))
	}

	/// Starts native forward navigation.
	pub fn forward(&self) {
		let len = self.history_len();
		let index = self.inner.index.get();
		if index + 1 < len {
			self.inner.index.set(index + 1);
			self.queue_navigation_notification();
		}
	}

	/// Delivers a navigation notification synchronously, like dispatching a
	/// `popstate` event by hand.
	pub fn dispatch_navigation(&self) {
		self.inner.notify_navigation();
	}

	/// Sets the current scroll offset, as if the user scrolled.
	pub fn set_scroll_y(&self, offset: f64) {
		self.inner.scroll_y.set(offset);
	}

	/// Returns every offset passed to [`BrowserHost::scroll_to`], oldest first.
	pub fn scroll_calls(&self) -> Vec<f64> {
		self.inner.scroll_calls.borrow().clone()
	}

	/// Dispatches a click to the installed click listeners.
	///
	/// Returns whether the default action was prevented. Anchor clicks that
	/// nobody intercepts are recorded as default (full page) navigations.
	pub fn click(&self, event: ClickEvent) -> bool {
		let listeners: Vec<ClickListener> = self
			.inner
			.click_listeners
			.borrow()
			.iter()
			.map(|(_, listener)| Rc::clone(listener))
			.collect();

		let mut event = event;
		for listener in listeners {
			if listener(&event) == ClickDisposition::Intercepted {
				event.default_prevented = true;
			}
		}

		if !event.default_prevented {
			if let Some(anchor) = &event.anchor {
				self.inner
					.default_navigations
					.borrow_mut()
					.push(anchor.href.clone());
			}
		}
		event.default_prevented
	}

	/// Returns the hrefs of anchor clicks left to default handling.
	pub fn default_navigations(&self) -> Vec<String> {
		self.inner.default_navigations.borrow().clone()
	}

	/// Returns the number of installed click and navigation listeners.
	pub fn listener_counts(&self) -> (usize, usize) {
		(
			self.inner.click_listeners.borrow().len(),
			self.inner.navigation_listeners.borrow().len(),
		)
	}

	/// Returns the number of queued deferred tasks.
	pub fn pending_tasks(&self) -> usize {
		self.inner.tasks.borrow().len()
	}

	/// Runs deferred tasks and queued notifications until none are left.
	///
	/// Returns how many tasks ran.
	pub fn flush(&self) -> usize {
		let mut ran = 0;
		loop {
			let task = self.inner.tasks.borrow_mut().pop_front();
			match task {
				Some(task) => {
					task();
					ran += 1;
				}
				None => return ran,
			}
		}
	}

	fn queue_navigation_notification(&self) {
		let weak: Weak<MemoryInner> = Rc::downgrade(&self.inner);
		self.defer(Box::new(move || {
			if let Some(inner) = weak.upgrade() {
				inner.notify_navigation();
			}
		}));
	}

	fn install<L: 'static>(
		&self,
		select: fn(&MemoryInner) -> &RefCell<Vec<(u64, L)>>,
		listener: L,
	) -> ListenerHandle {
		let id = self.inner.allocate_listener_id();
		select(&self.inner).borrow_mut().push((id, listener));

		let weak: Weak<MemoryInner> = Rc::downgrade(&self.inner);
		ListenerHandle::new(move || {
			if let Some(inner) = weak.upgrade() {
				select(&inner)
					.borrow_mut()
					.retain(|(existing, _)| *existing != id);
			}
		})
	}
}

impl BrowserHost for MemoryHost {
	fn location(&self) -> Location {
		Location::from_url(&self.inner.current_url())
	}

	fn push_entry(&self, url: &str, state: &HistoryState) -> Result<(), RouterError> {
		let next = self.inner.resolve(url)?;
		let index = self.inner.index.get();

		let mut entries = self.inner.entries.borrow_mut();
		entries.truncate(index + 1);
		entries.push(HistoryEntry {
			url: next,
			state: Some(state.clone()),
		});
		self.inner.index.set(index + 1);
		Ok(())
	}

	fn replace_entry(&self, url: &str, state: &HistoryState) -> Result<(), RouterError> {
		let next = self.inner.resolve(url)?;
		let index = self.inner.index.get();

		self.inner.entries.borrow_mut()[index] = HistoryEntry {
			url: next,
			state: Some(state.clone()),
		};
		Ok(())
	}

	fn back(&self) -> Result<(), RouterError> {
		let index = self.inner.index.get();
		if index > 0 {
			self.inner.index.set(index - 1);
			self.queue_navigation_notification();
		}
		Ok(())
	}

	fn scroll_y(&self) -> f64 {
		self.inner.scroll_y.get()
	}

	fn scroll_to(&self, offset: f64) {
		self.inner.scroll_y.set(offset);
		self.inner.scroll_calls.borrow_mut().push(offset);
	}

	fn on_click(&self, listener: ClickListener) -> Result<ListenerHandle, RouterError> {
		Ok(self.install(|inner| &inner.click_listeners, listener))
	}

	fn on_navigation(&self, listener: NavigationListener) -> Result<ListenerHandle, RouterError> {
		Ok(self.install(|inner| &inner.navigation_listeners, listener))
	}

	fn defer(&self, task: Box<dyn FnOnce()>) {
		self.inner.tasks.borrow_mut().push_back(task);
	}
}
