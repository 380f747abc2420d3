//! Router Components for navigation.
//!
//! This module provides the scope providers ([`Routes`], [`NestedRoutes`])
//! and the navigation helpers ([`Link`], [`Navigate`], [`Redirect`]).

use std::cell::OnceCell;
use std::fmt;
use std::rc::Rc;

use super::context::try_use_router;
use super::controller::{NavigateOptions, NavigationController};
use super::guard::ScopeGuard;
use super::registry::{PathSpec, RouteHandlerId};
use super::slot::{RouteSlot, render_or_log};
use crate::component::{Component, ElementView, IntoView, View};
use crate::config::RouterConfig;
use crate::error::RouterError;
use crate::host::BrowserHost;
use crate::reactive::publish_epoch;

type ViewFn = Rc<dyn Fn() -> View>;

/// A link component that navigates without full page reload.
///
/// Renders an `<a>`; the top-level scope intercepts activations of
/// same-origin links. External links are marked `data-external` and left to
/// the browser.
///
/// # Example
///
/// ```
/// use reinhardt_spa_router::{Component, Link};
///
/// let html = Link::new("/users/42", "View User").render().render_to_string();
/// assert_eq!(html, "<a href=\"/users/42\" data-link=\"true\">View User</a>");
/// ```
#[derive(Debug, Clone)]
pub struct Link {
	/// The destination path.
	to: String,
	/// The link content.
	content: View,
	/// Additional CSS classes.
	class: Option<String>,
	/// Whether to replace the current history entry.
	replace: bool,
	/// Whether the browser handles the link.
	external: bool,
	/// Whether to open in a new tab.
	new_tab: bool,
	/// Custom attributes.
	attrs: Vec<(String, String)>,
}

impl Link {
	/// Creates a new link.
	pub fn new(to: impl Into<String>, content: impl IntoView) -> Self {
		Self {
			to: to.into(),
			content: content.into_view(),
			class: None,
			replace: false,
			external: false,
			new_tab: false,
			attrs: Vec::new(),
		}
	}

	/// Sets the CSS class.
	pub fn class(mut self, class: impl Into<String>) -> Self {
		self.class = Some(class.into());
		self
	}

	/// Sets whether to replace the current history entry.
	pub fn replace(mut self, replace: bool) -> Self {
		self.replace = replace;
		self
	}

	/// Marks the link as external; clicks on it are never intercepted.
	pub fn external(mut self, external: bool) -> Self {
		self.external = external;
		self
	}

	/// Opens the link in a new tab.
	pub fn new_tab(mut self, new_tab: bool) -> Self {
		self.new_tab = new_tab;
		self
	}

	/// Adds a custom attribute.
	pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.attrs.push((name.into(), value.into()));
		self
	}

	/// Returns the destination path.
	pub fn to(&self) -> &str {
		&self.to
	}

	/// Returns whether this is a replace navigation.
	pub fn is_replace(&self) -> bool {
		self.replace
	}

	/// Returns whether this is an external link.
	pub fn is_external(&self) -> bool {
		self.external
	}
}

impl Component for Link {
	fn render(&self) -> View {
		let mut el = ElementView::new("a").attr("href", self.to.clone());

		if let Some(ref class) = self.class {
			el = el.attr("class", class.clone());
		}

		if self.external {
			el = el.attr("data-external", "true");
		} else {
			el = el.attr("data-link", "true");
			if self.replace {
				el = el.attr("data-replace", "true");
			}
		}

		if self.new_tab {
			el = el.attr("target", "_blank");
			el = el.attr("rel", "noopener noreferrer");
		}

		for (name, value) in &self.attrs {
			el = el.attr(name.clone(), value.clone());
		}

		el.child(self.content.clone()).into_view()
	}

	fn name() -> &'static str {
		"Link"
	}
}

/// Navigates as a side effect of rendering.
///
/// Every render inside a scope issues the navigation; place it inside a slot
/// so it only renders while that slot is active. Navigations that lead back
/// to the same slot loop forever.
#[derive(Debug, Clone)]
pub struct Navigate {
	to: String,
	options: NavigateOptions,
}

impl Navigate {
	/// Creates a push navigation to `to`.
	pub fn new(to: impl Into<String>) -> Self {
		Self {
			to: to.into(),
			options: NavigateOptions::new(),
		}
	}

	/// Sets whether to replace the current history entry.
	pub fn replace(mut self, replace: bool) -> Self {
		self.options.replace = replace;
		self
	}

	/// Attaches a history payload.
	pub fn state(mut self, state: serde_json::Value) -> Self {
		self.options.state = Some(state);
		self
	}

	/// Returns the destination path.
	pub fn to(&self) -> &str {
		&self.to
	}

	/// Issues the navigation.
	pub fn try_render(&self) -> Result<View, RouterError> {
		try_use_router()?.navigate_with(&self.to, self.options.clone())?;
		Ok(View::Empty)
	}
}

impl Component for Navigate {
	fn render(&self) -> View {
		render_or_log(Self::name(), self.try_render())
	}

	fn name() -> &'static str {
		"Navigate"
	}
}

/// A slot that replaces paths matching `from` with `to`.
#[derive(Debug, Clone)]
pub struct Redirect {
	slot: RouteSlot,
	to: String,
}

impl Redirect {
	/// Creates a new redirect.
	pub fn new(from: impl Into<PathSpec>, to: impl Into<String>) -> Self {
		let to = to.into();
		let navigate = Navigate::new(to.clone()).replace(true);
		Self {
			slot: RouteSlot::new(from, move |_| navigate.render()),
			to,
		}
	}

	/// Returns the destination path.
	pub fn to(&self) -> &str {
		&self.to
	}

	/// Returns the slot's handler id.
	pub fn id(&self) -> RouteHandlerId {
		self.slot.id()
	}

	/// Registers on first call and redirects while active.
	pub fn try_render(&self) -> Result<View, RouterError> {
		self.slot.try_render()
	}
}

impl Component for Redirect {
	fn render(&self) -> View {
		render_or_log(Self::name(), self.try_render())
	}

	fn name() -> &'static str {
		"Redirect"
	}
}

/// Top-level scope provider.
///
/// Owns a mounted [`NavigationController`] and the view rendered inside it.
/// Dropping the last handle unmounts the scope.
///
/// # Example
///
/// ```
/// use reinhardt_spa_router::host::MemoryHost;
/// use reinhardt_spa_router::{Component, RouteSlot, RouterConfig, Routes, ScopeGuard, View};
///
/// let host = MemoryHost::starting_at("/about").unwrap();
/// let home = RouteSlot::new("/", |_| "Home");
/// let about = RouteSlot::new("/about", |_| "About");
///
/// let routes = Routes::mount(host.shared(), RouterConfig::default(), &ScopeGuard::new(), move || {
///     View::fragment([home.render(), about.render()])
/// })
/// .unwrap();
///
/// assert_eq!(routes.try_render().unwrap().render_to_string(), "About");
/// ```
#[derive(Clone)]
pub struct Routes {
	controller: NavigationController,
	view: ViewFn,
}

impl fmt::Debug for Routes {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Routes")
			.field("controller", &self.controller)
			.finish()
	}
}

impl Routes {
	/// Mounts a top-level scope and binds `view` to it.
	pub fn mount<F, V>(
		host: Rc<dyn BrowserHost>,
		config: RouterConfig,
		guard: &ScopeGuard,
		view: F,
	) -> Result<Self, RouterError>
	where
		F: Fn() -> V + 'static,
		V: IntoView,
	{
		let controller = NavigationController::mount(host, config, guard)?;
		Ok(Self::new(controller, view))
	}

	/// Binds `view` to an existing scope.
	pub fn new<F, V>(controller: NavigationController, view: F) -> Self
	where
		F: Fn() -> V + 'static,
		V: IntoView,
	{
		Self {
			controller,
			view: Rc::new(move || view().into_view()),
		}
	}

	/// Returns the scope.
	pub fn controller(&self) -> &NavigationController {
		&self.controller
	}

	/// Unmounts the scope.
	pub fn unmount(&self) {
		self.controller.unmount();
	}

	/// Renders until the published state is stable and returns the last view.
	///
	/// # Errors
	///
	/// Returns the first error raised while applying queued transitions.
	pub fn try_render(&self) -> Result<View, RouterError> {
		loop {
			let before = publish_epoch();
			let view = self.controller.render_pass(|| (self.view)())?;
			if publish_epoch() == before {
				return Ok(view);
			}
		}
	}
}

impl Component for Routes {
	fn render(&self) -> View {
		render_or_log(Self::name(), self.try_render())
	}

	fn name() -> &'static str {
		"Routes"
	}
}

/// Nested scope provider.
///
/// On first render it creates a nested scope under the enclosing scope. The
/// nested scope resolves the same path against its own routes, so a parent
/// slot such as `/settings*` can delegate `/settings/...` paths to children.
#[derive(Clone)]
pub struct NestedRoutes {
	scope: Rc<OnceCell<NavigationController>>,
	view: ViewFn,
}

impl fmt::Debug for NestedRoutes {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("NestedRoutes")
			.field("scope", &self.scope.get())
			.finish()
	}
}

impl NestedRoutes {
	/// Creates a nested scope provider rendering `view`.
	pub fn new<F, V>(view: F) -> Self
	where
		F: Fn() -> V + 'static,
		V: IntoView,
	{
		Self {
			scope: Rc::new(OnceCell::new()),
			view: Rc::new(move || view().into_view()),
		}
	}

	/// Returns the nested scope once it exists.
	pub fn controller(&self) -> Option<&NavigationController> {
		self.scope.get()
	}

	/// Renders `view` as a pass of the nested scope.
	pub fn try_render(&self) -> Result<View, RouterError> {
		let scope = match self.scope.get() {
			Some(scope) => scope.clone(),
			None => {
				let parent = try_use_router()?;
				let scope = NavigationController::nested(parent.controller());
				self.scope.get_or_init(|| scope).clone()
			}
		};
		scope.render_pass(|| (self.view)())
	}
}

impl Component for NestedRoutes {
	fn render(&self) -> View {
		render_or_log(Self::name(), self.try_render())
	}

	fn name() -> &'static str {
		"NestedRoutes"
	}
}
