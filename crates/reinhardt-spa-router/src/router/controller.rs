//! Navigation controller.
//!
//! A [`NavigationController`] is one navigation scope: it owns a route
//! registry, the resolver memo, the scroll cache and the published
//! [`NavigationState`]. A top-level scope also owns the global click and
//! navigation listeners; nested scopes follow their parent's path and delegate
//! history operations to the top-level scope.
//!
//! Every state change is a transition. Transitions arising inside a render
//! pass are queued and applied in order when the outermost pass ends;
//! transitions arising elsewhere are applied immediately. Transitions raised
//! while the queue drains are appended to the same queue.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::rc::{Rc, Weak};

use url::Url;

use super::context;
use super::guard::{GuardToken, ScopeGuard};
use super::registry::{PathSpec, Registry, RouteHandlerId};
use super::resolver::{MatchResolver, Resolution};
use super::scroll::ScrollCache;
use super::state::{MatchStatus, NavigationState};
use crate::config::{GuardMode, RouterConfig};
use crate::error::RouterError;
use crate::host::{
	BrowserHost, ClickDisposition, ClickEvent, HistoryState, ListenerHandle, Location,
};
use crate::reactive::{Store, Subscription};
use crate::{debug_log, error_log, info_log, warn_log};

/// Options for a programmatic navigation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NavigateOptions {
	/// Replace the current history entry instead of appending one.
	pub replace: bool,
	/// Payload stored with the history entry.
	pub state: Option<serde_json::Value>,
}

impl NavigateOptions {
	/// Options for a push navigation.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets whether the current entry is replaced.
	pub fn replace(mut self, replace: bool) -> Self {
		self.replace = replace;
		self
	}

	/// Attaches a history payload.
	pub fn state(mut self, state: serde_json::Value) -> Self {
		self.state = Some(state);
		self
	}
}

#[derive(Debug)]
enum Transition {
	/// Re-run resolution for the current path.
	Recompute,
	/// Programmatic or click navigation.
	Navigate {
		path: String,
		options: NavigateOptions,
	},
	/// The browser moved through history.
	Popped,
	/// The parent scope moved to a new path.
	Follow(String),
}

#[derive(Default)]
struct ScopeResources {
	listeners: Vec<ListenerHandle>,
	parent_subscription: Option<Subscription>,
	token: Option<GuardToken>,
}

struct ControllerInner {
	host: Rc<dyn BrowserHost>,
	config: RouterConfig,
	parent: Option<NavigationController>,
	registry: RefCell<Registry>,
	resolver: RefCell<MatchResolver>,
	scroll: RefCell<ScrollCache>,
	state: Store<NavigationState>,
	pending: RefCell<VecDeque<Transition>>,
	pass_depth: Cell<usize>,
	draining: Cell<bool>,
	mounted: Cell<bool>,
	resources: RefCell<ScopeResources>,
}

/// One mounted navigation scope.
///
/// Clones refer to the same scope.
#[derive(Clone)]
pub struct NavigationController {
	inner: Rc<ControllerInner>,
}

impl fmt::Debug for NavigationController {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("NavigationController")
			.field("top_level", &self.is_top_level())
			.field("mounted", &self.inner.mounted.get())
			.field("state", &self.inner.state.get())
			.field("routes", &self.inner.registry.borrow().len())
			.field("pending", &self.inner.pending.borrow().len())
			.finish()
	}
}

struct PassGuard<'a> {
	controller: &'a NavigationController,
}

impl<'a> PassGuard<'a> {
	fn enter(controller: &'a NavigationController) -> Self {
		let depth = &controller.inner.pass_depth;
		depth.set(depth.get() + 1);
		context::push_scope(controller.clone());
		Self { controller }
	}
}

impl Drop for PassGuard<'_> {
	fn drop(&mut self) {
		context::pop_scope();
		let depth = &self.controller.inner.pass_depth;
		depth.set(depth.get() - 1);
	}
}

struct DrainGuard<'a>(&'a Cell<bool>);

impl Drop for DrainGuard<'_> {
	fn drop(&mut self) {
		self.0.set(false);
	}
}

impl NavigationController {
	/// Mounts a top-level scope on `host`.
	///
	/// Takes `guard`, then installs the click listener (when
	/// [`RouterConfig::intercept_clicks`] is set) and the browser navigation
	/// listener. Nothing is resolved until the first render pass or
	/// registration.
	///
	/// # Errors
	///
	/// Returns [`RouterError::ScopeAlreadyMounted`] when `guard` is held and
	/// the guard mode is [`GuardMode::Strict`]. In relaxed mode the scope
	/// mounts anyway and a warning is logged.
	pub fn mount(
		host: Rc<dyn BrowserHost>,
		config: RouterConfig,
		guard: &ScopeGuard,
	) -> Result<Self, RouterError> {
		let token = match guard.try_acquire() {
			Some(token) => Some(token),
			None => match config.guard_mode {
				GuardMode::Strict => return Err(RouterError::ScopeAlreadyMounted),
				GuardMode::Relaxed => {
					warn_log!(
						"a top-level Routes scope is already mounted; global listeners will fire once per scope"
					);
					None
				}
			},
		};

		let location = host.location();
		let controller = Self::build(
			Rc::clone(&host),
			config,
			None,
			NavigationState::at(location.path.as_str()),
		);

		let mut listeners = Vec::new();
		if controller.inner.config.intercept_clicks {
			let weak = Rc::downgrade(&controller.inner);
			listeners.push(host.on_click(Rc::new(move |event: &ClickEvent| {
				match Self::upgrade(&weak) {
					Some(controller) => controller.handle_click(event),
					None => ClickDisposition::Ignored,
				}
			}))?);
		}

		let weak = Rc::downgrade(&controller.inner);
		listeners.push(host.on_navigation(Rc::new(move || {
			let Some(controller) = Self::upgrade(&weak) else {
				return;
			};
			if let Err(err) = controller.schedule(Transition::Popped) {
				error_log!("failed to follow browser navigation: {}", err);
			}
		}))?);

		{
			let mut resources = controller.inner.resources.borrow_mut();
			resources.listeners = listeners;
			resources.token = token;
		}
		info_log!("navigation scope mounted at {}", location.path);
		Ok(controller)
	}

	/// Creates a nested scope following `parent`.
	///
	/// The nested scope has its own registry and resolves the parent's path
	/// against it. It installs no listeners and takes no guard.
	pub fn nested(parent: &NavigationController) -> Self {
		let controller = Self::build(
			Rc::clone(&parent.inner.host),
			parent.inner.config.clone(),
			Some(parent.clone()),
			NavigationState::at(parent.current_path()),
		);

		let weak = Rc::downgrade(&controller.inner);
		let subscription = parent.subscribe(move |state: &NavigationState| {
			let Some(controller) = Self::upgrade(&weak) else {
				return;
			};
			if let Err(err) = controller.schedule(Transition::Follow(state.current_path.clone())) {
				error_log!("nested scope failed to follow {}: {}", state.current_path, err);
			}
		});
		controller.inner.resources.borrow_mut().parent_subscription = Some(subscription);

		debug_log!("nested navigation scope created at {}", parent.current_path());
		controller
	}

	fn build(
		host: Rc<dyn BrowserHost>,
		config: RouterConfig,
		parent: Option<NavigationController>,
		initial: NavigationState,
	) -> Self {
		Self {
			inner: Rc::new(ControllerInner {
				host,
				config,
				parent,
				registry: RefCell::new(Registry::new()),
				resolver: RefCell::new(MatchResolver::new()),
				scroll: RefCell::new(ScrollCache::new()),
				state: Store::new(initial),
				pending: RefCell::new(VecDeque::new()),
				pass_depth: Cell::new(0),
				draining: Cell::new(false),
				mounted: Cell::new(true),
				resources: RefCell::new(ScopeResources::default()),
			}),
		}
	}

	fn upgrade(weak: &Weak<ControllerInner>) -> Option<Self> {
		weak.upgrade().map(|inner| Self { inner })
	}

	/// Removes the scope's listeners and releases its guard.
	///
	/// Dropping the last handle to a scope has the same effect.
	pub fn unmount(&self) {
		if !self.inner.mounted.replace(false) {
			return;
		}
		let resources = std::mem::take(&mut *self.inner.resources.borrow_mut());
		drop(resources);
		info_log!("navigation scope unmounted");
	}

	/// Returns whether [`unmount`](Self::unmount) has not been called yet.
	pub fn is_mounted(&self) -> bool {
		self.inner.mounted.get()
	}

	/// Returns whether this scope owns the global listeners.
	pub fn is_top_level(&self) -> bool {
		self.inner.parent.is_none()
	}

	/// Returns the top-level scope this scope belongs to.
	pub fn root(&self) -> NavigationController {
		let mut current = self.clone();
		while let Some(parent) = current.inner.parent.clone() {
			current = parent;
		}
		current
	}

	/// Returns the configuration.
	pub fn config(&self) -> &RouterConfig {
		&self.inner.config
	}

	/// Returns the browser host.
	pub fn host(&self) -> Rc<dyn BrowserHost> {
		Rc::clone(&self.inner.host)
	}

	/// Returns a snapshot of the published state.
	pub fn state(&self) -> NavigationState {
		self.inner.state.get()
	}

	/// Returns the path this scope reflects.
	pub fn current_path(&self) -> String {
		self.inner.state.with(|state| state.current_path.clone())
	}

	/// Returns the active handler, if any.
	pub fn active_handler(&self) -> Option<RouteHandlerId> {
		self.inner.state.with(NavigationState::active_handler)
	}

	/// Returns the match status.
	pub fn status(&self) -> MatchStatus {
		self.inner.state.with(|state| state.status)
	}

	/// Returns how many state changes have been published.
	pub fn version(&self) -> u64 {
		self.inner.state.version()
	}

	/// Subscribes to published state.
	pub fn subscribe(&self, subscriber: impl Fn(&NavigationState) + 'static) -> Subscription {
		self.inner.state.subscribe(subscriber)
	}

	/// Appends routes for `handler` and schedules a recomputation.
	///
	/// # Errors
	///
	/// Returns the matcher's error for a malformed pattern, or the error of
	/// the recomputation when it runs immediately.
	pub fn register(
		&self,
		spec: impl Into<PathSpec>,
		handler: RouteHandlerId,
	) -> Result<(), RouterError> {
		let spec = spec.into();
		self.inner.registry.borrow_mut().register(&spec, handler)?;
		debug_log!("registered {:?} for {}", spec.patterns(), handler);
		self.schedule(Transition::Recompute)
	}

	/// Returns the number of registry entries.
	pub fn route_count(&self) -> usize {
		self.inner.registry.borrow().len()
	}

	/// Returns how many registry entries belong to `handler`.
	pub fn routes_for(&self, handler: RouteHandlerId) -> usize {
		self.inner.registry.borrow().count_for(handler)
	}

	/// Returns the offset the scroll cache holds for `path`.
	pub fn scroll_offset(&self, path: &str) -> f64 {
		self.inner.scroll.borrow().offset(path)
	}

	/// Appends a history entry for `path` and moves to it.
	pub fn push(&self, path: &str) -> Result<(), RouterError> {
		self.navigate_with(path, NavigateOptions::new())
	}

	/// Replaces the current history entry with `path` and moves to it.
	pub fn replace(&self, path: &str) -> Result<(), RouterError> {
		self.navigate_with(path, NavigateOptions::new().replace(true))
	}

	/// Navigates to `path`.
	///
	/// Nested scopes forward the navigation to the top-level scope.
	pub fn navigate_with(&self, path: &str, options: NavigateOptions) -> Result<(), RouterError> {
		self.root().schedule(Transition::Navigate {
			path: path.to_string(),
			options,
		})
	}

	/// Starts native back navigation.
	///
	/// The state changes only once the host reports the navigation.
	pub fn back(&self) -> Result<(), RouterError> {
		self.inner.host.back()
	}

	/// Runs `f` as a render pass of this scope.
	///
	/// While `f` runs, this scope is the innermost scope visible to
	/// [`use_router`](super::use_router), and transitions are queued. When the
	/// outermost pass ends, a recomputation is queued and the queue is
	/// drained.
	///
	/// # Errors
	///
	/// Returns the first error raised while draining.
	pub fn render_pass<R>(&self, f: impl FnOnce() -> R) -> Result<R, RouterError> {
		let output = {
			let _pass = PassGuard::enter(self);
			f()
		};
		self.schedule(Transition::Recompute)?;
		Ok(output)
	}

	fn schedule(&self, transition: Transition) -> Result<(), RouterError> {
		self.inner.pending.borrow_mut().push_back(transition);
		if self.inner.pass_depth.get() > 0 || self.inner.draining.get() {
			return Ok(());
		}
		self.drain()
	}

	fn drain(&self) -> Result<(), RouterError> {
		self.inner.draining.set(true);
		let _draining = DrainGuard(&self.inner.draining);

		let mut first_error = None;
		loop {
			let next = self.inner.pending.borrow_mut().pop_front();
			let Some(transition) = next else {
				break;
			};
			if let Err(err) = self.apply(transition) {
				first_error.get_or_insert(err);
			}
		}
		first_error.map_or(Ok(()), Err)
	}

	fn apply(&self, transition: Transition) -> Result<(), RouterError> {
		match transition {
			Transition::Recompute => {
				let path = self.current_path();
				self.commit(path, &self.inner.host.location().query)
			}
			Transition::Navigate { path, options } => self.apply_navigation(&path, options),
			Transition::Popped => self.apply_pop(),
			Transition::Follow(path) => self.commit(path, &self.inner.host.location().query),
		}
	}

	fn apply_navigation(&self, path: &str, options: NavigateOptions) -> Result<(), RouterError> {
		debug_log!("navigate to {} (replace: {})", path, options.replace);
		self.record_leaving();

		let entry = HistoryState::new(path).with_state(options.state);
		if options.replace {
			self.inner.host.replace_entry(path, &entry)?;
		} else {
			self.inner.host.push_entry(path, &entry)?;
		}

		let Location { path, query, .. } = self.inner.host.location();
		if self.inner.config.scroll_restoration {
			self.inner.scroll.borrow_mut().reset(&path);
		}
		self.commit(path.clone(), &query)?;
		self.schedule_restore(path);
		Ok(())
	}

	fn apply_pop(&self) -> Result<(), RouterError> {
		self.record_leaving();

		let Location { path, query, .. } = self.inner.host.location();
		debug_log!("browser navigation to {}", path);
		self.commit(path.clone(), &query)?;
		self.schedule_restore(path);
		Ok(())
	}

	fn record_leaving(&self) {
		if !self.inner.config.scroll_restoration {
			return;
		}
		let leaving = self.current_path();
		let offset = self.inner.host.scroll_y();
		self.inner.scroll.borrow_mut().record_last(&leaving, offset);
	}

	fn commit(&self, path: String, query: &str) -> Result<(), RouterError> {
		let query_params = MatchResolver::query_params(query)?;
		let resolution = self
			.inner
			.resolver
			.borrow_mut()
			.resolve(&path, &self.inner.registry.borrow());

		let mut next = self.inner.state.get();
		next.current_path = path;
		match resolution {
			Resolution::Matched(found) => {
				next.apply_match(found);
				next.query_params = query_params;
			}
			Resolution::NotFound => {
				next.clear_match();
				next.query_params.clear();
			}
			Resolution::Skipped => {
				if next.status != MatchStatus::NotFound {
					next.query_params = query_params;
				}
			}
		}
		self.inner.state.set(next);
		Ok(())
	}

	fn schedule_restore(&self, path: String) {
		if !self.inner.config.scroll_restoration {
			return;
		}
		let weak = Rc::downgrade(&self.inner);
		self.inner.host.defer(Box::new(move || {
			let Some(controller) = Self::upgrade(&weak) else {
				return;
			};
			if controller.current_path() != path {
				debug_log!("dropped stale scroll restore for {}", path);
				return;
			}
			let offset = controller.inner.scroll.borrow().offset(&path);
			controller.inner.host.scroll_to(offset);
		}));
	}

	fn handle_click(&self, event: &ClickEvent) -> ClickDisposition {
		if event.default_prevented {
			// Another scope may already have moved the location; track it
			// without adding a second history entry.
			let live = self.inner.host.location().path;
			if let Err(err) = self.schedule(Transition::Follow(live)) {
				error_log!("failed to follow intercepted link: {}", err);
			}
			return ClickDisposition::Ignored;
		}
		if event.button != 0 || event.modifier_key {
			return ClickDisposition::Ignored;
		}
		let Some(anchor) = &event.anchor else {
			return ClickDisposition::Ignored;
		};
		let foreign_target = anchor
			.target
			.as_deref()
			.is_some_and(|target| target != "_self");
		if foreign_target || anchor.download || anchor.external {
			return ClickDisposition::Ignored;
		}

		let Ok(base) = Url::parse(&self.inner.host.location().href()) else {
			return ClickDisposition::Ignored;
		};
		let Ok(resolved) = base.join(&anchor.href) else {
			return ClickDisposition::Ignored;
		};
		if resolved.origin() != base.origin() {
			return ClickDisposition::Ignored;
		}
		// In-page anchors scroll natively.
		let same_document = resolved.path() == base.path() && resolved.query() == base.query();
		if same_document && resolved.fragment().is_some() {
			return ClickDisposition::Ignored;
		}

		match self.push(&resolved[url::Position::BeforePath..]) {
			Ok(()) => ClickDisposition::Intercepted,
			Err(err) => {
				error_log!("failed to follow link {}: {}", anchor.href, err);
				ClickDisposition::Ignored
			}
		}
	}
}
