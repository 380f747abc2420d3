//! Route slots.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use super::context::{RouterHandle, try_use_router};
use super::registry::{PathSpec, RouteHandlerId};
use crate::component::{Component, IntoView, View};
use crate::error::RouterError;
use crate::error_log;

type SlotContent = Rc<dyn Fn(&RouterHandle) -> View>;

struct SlotInner {
	id: RouteHandlerId,
	paths: PathSpec,
	content: SlotContent,
	registered: Cell<bool>,
}

/// Binds one or more path patterns to content.
///
/// A slot registers its patterns with the enclosing scope the first time it
/// renders and never again, however often it re-renders. It renders its
/// content only while it is the scope's active handler.
///
/// Clones share identity and registration.
///
/// # Example
///
/// ```
/// use reinhardt_spa_router::{RouteSlot, View};
///
/// let user = RouteSlot::new("/user/:id", |router| {
///     View::text(format!("User {}", router.path_param::<i64>("id").unwrap_or_default()))
/// });
/// let home = RouteSlot::new(["/", "/home"], |_| View::text("Home"));
/// assert_ne!(user.id(), home.id());
/// ```
#[derive(Clone)]
pub struct RouteSlot {
	inner: Rc<SlotInner>,
}

impl fmt::Debug for RouteSlot {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("RouteSlot")
			.field("id", &self.inner.id)
			.field("paths", &self.inner.paths)
			.field("registered", &self.inner.registered.get())
			.finish()
	}
}

impl RouteSlot {
	/// Creates a slot with a freshly allocated id.
	pub fn new<F, V>(paths: impl Into<PathSpec>, content: F) -> Self
	where
		F: Fn(&RouterHandle) -> V + 'static,
		V: IntoView,
	{
		Self {
			inner: Rc::new(SlotInner {
				id: RouteHandlerId::allocate(),
				paths: paths.into(),
				content: Rc::new(move |router: &RouterHandle| content(router).into_view()),
				registered: Cell::new(false),
			}),
		}
	}

	/// Returns the slot's handler id.
	pub fn id(&self) -> RouteHandlerId {
		self.inner.id
	}

	/// Returns the slot's patterns.
	pub fn paths(&self) -> &PathSpec {
		&self.inner.paths
	}

	/// Returns whether the slot has registered its patterns.
	pub fn is_registered(&self) -> bool {
		self.inner.registered.get()
	}

	/// Registers on first call, then renders the content if this slot is
	/// active.
	///
	/// # Errors
	///
	/// Returns [`RouterError::OutsideScope`] outside a render pass, or the
	/// matcher's error for a malformed pattern.
	pub fn try_render(&self) -> Result<View, RouterError> {
		let router = try_use_router()?;

		if !self.inner.registered.replace(true) {
			router
				.controller()
				.register(self.inner.paths.clone(), self.inner.id)?;
		}

		if router.active_handler() == Some(self.inner.id) {
			Ok((self.inner.content)(&router))
		} else {
			Ok(View::Empty)
		}
	}
}

/// Renders a fallible component, failing fast outside of a scope.
pub(crate) fn render_or_log(name: &str, result: Result<View, RouterError>) -> View {
	match result {
		Ok(view) => view,
		Err(RouterError::OutsideScope) => panic!("{}", RouterError::OutsideScope),
		Err(err) => {
			error_log!("{} failed to render: {}", name, err);
			View::Empty
		}
	}
}

impl Component for RouteSlot {
	fn render(&self) -> View {
		render_or_log(Self::name(), self.try_render())
	}

	fn name() -> &'static str {
		"RouteSlot"
	}
}
