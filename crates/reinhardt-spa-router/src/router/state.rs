//! Published navigation state.

use reinhardt_spa_infer::ParamMap;

use super::registry::{RouteHandlerId, RouteMatch};

/// Match outcome for the current path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchStatus {
	/// Nothing has been resolved yet.
	#[default]
	Unresolved,
	/// The given handler is active.
	Resolved(RouteHandlerId),
	/// No route matches the current path.
	NotFound,
}

/// The state of one navigation scope.
///
/// `path_params` and `matched_pattern` always describe the active handler's
/// match and are empty whenever no handler is active.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NavigationState {
	/// The path the scope currently reflects.
	pub current_path: String,
	/// Match outcome for `current_path`.
	pub status: MatchStatus,
	/// Captured segments of the active match.
	pub path_params: ParamMap,
	/// Parameters of the live query string.
	pub query_params: ParamMap,
	/// The pattern of the active match.
	pub matched_pattern: Option<String>,
}

impl NavigationState {
	/// Creates a state for `path` with nothing resolved.
	pub fn at(path: impl Into<String>) -> Self {
		Self {
			current_path: path.into(),
			..Self::default()
		}
	}

	/// Returns the active handler, if any.
	pub fn active_handler(&self) -> Option<RouteHandlerId> {
		match self.status {
			MatchStatus::Resolved(handler) => Some(handler),
			_ => None,
		}
	}

	/// Records a match.
	pub fn apply_match(&mut self, found: RouteMatch) {
		self.status = MatchStatus::Resolved(found.handler);
		self.path_params = found.path_params;
		self.matched_pattern = Some(found.matched_pattern);
	}

	/// Clears the match after a failed resolution.
	pub fn clear_match(&mut self) {
		self.status = MatchStatus::NotFound;
		self.path_params.clear();
		self.matched_pattern = None;
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use reinhardt_spa_infer::Scalar;
	use rstest::rstest;

	#[rstest]
	fn test_apply_then_clear() {
		let handler = RouteHandlerId::allocate();
		let mut state = NavigationState::at("/user/1");
		assert_eq!(state.active_handler(), None);

		state.apply_match(RouteMatch {
			handler,
			path_params: [("id".to_string(), Scalar::Int(1))].into_iter().collect(),
			matched_pattern: "/user/:id".to_string(),
		});
		assert_eq!(state.active_handler(), Some(handler));
		assert_eq!(state.path_params.len(), 1);

		state.clear_match();
		assert_eq!(state.status, MatchStatus::NotFound);
		assert!(state.path_params.is_empty());
		assert_eq!(state.matched_pattern, None);
	}
}
