//! Scope stack and the `use_router` accessor.
//!
//! Render passes push their scope onto a thread-local stack; content rendered
//! inside a pass reaches the innermost scope through [`use_router`].

use std::cell::RefCell;

use reinhardt_spa_infer::ParamMap;

use super::controller::{NavigateOptions, NavigationController};
use super::params::{FromScalar, extract};
use super::registry::RouteHandlerId;
use super::state::NavigationState;
use crate::error::{ParamError, RouterError};

thread_local! {
	static SCOPES: RefCell<Vec<NavigationController>> = const { RefCell::new(Vec::new()) };
}

pub(crate) fn push_scope(controller: NavigationController) {
	SCOPES.with(|scopes| scopes.borrow_mut().push(controller));
}

pub(crate) fn pop_scope() {
	SCOPES.with(|scopes| {
		scopes.borrow_mut().pop();
	});
}

/// Returns the innermost scope, or [`RouterError::OutsideScope`].
pub fn try_use_router() -> Result<RouterHandle, RouterError> {
	SCOPES
		.with(|scopes| scopes.borrow().last().cloned())
		.map(|controller| RouterHandle { controller })
		.ok_or(RouterError::OutsideScope)
}

/// Returns the innermost scope.
///
/// # Panics
///
/// Panics when called outside of a `Routes` render pass.
pub fn use_router() -> RouterHandle {
	match try_use_router() {
		Ok(handle) => handle,
		Err(err) => panic!("{}", err),
	}
}

/// Accessor for the navigation state of a scope.
#[derive(Debug, Clone)]
pub struct RouterHandle {
	controller: NavigationController,
}

impl RouterHandle {
	/// Wraps a scope.
	pub fn new(controller: NavigationController) -> Self {
		Self { controller }
	}

	/// Returns the underlying scope.
	pub fn controller(&self) -> &NavigationController {
		&self.controller
	}

	/// Returns a snapshot of the scope's state.
	pub fn state(&self) -> NavigationState {
		self.controller.state()
	}

	/// Returns the current path.
	pub fn current_path(&self) -> String {
		self.controller.current_path()
	}

	/// Returns the pattern of the active match.
	pub fn matched_pattern(&self) -> Option<String> {
		self.controller.state().matched_pattern
	}

	/// Returns the captured path parameters.
	pub fn path_params(&self) -> ParamMap {
		self.controller.state().path_params
	}

	/// Returns the query parameters.
	pub fn query_params(&self) -> ParamMap {
		self.controller.state().query_params
	}

	/// Returns the active handler.
	pub fn active_handler(&self) -> Option<RouteHandlerId> {
		self.controller.active_handler()
	}

	/// Pushes `path`.
	pub fn navigate(&self, path: &str) -> Result<(), RouterError> {
		self.controller.push(path)
	}

	/// Navigates to `path` with explicit options.
	pub fn navigate_with(&self, path: &str, options: NavigateOptions) -> Result<(), RouterError> {
		self.controller.navigate_with(path, options)
	}

	/// Starts native back navigation.
	pub fn back(&self) -> Result<(), RouterError> {
		self.controller.back()
	}

	/// Reads a typed path parameter.
	pub fn path_param<T: FromScalar>(&self, name: &str) -> Result<T, ParamError> {
		extract(&self.path_params(), name)
	}

	/// Reads a typed query parameter.
	pub fn query_param<T: FromScalar>(&self, name: &str) -> Result<T, ParamError> {
		extract(&self.query_params(), name)
	}
}
