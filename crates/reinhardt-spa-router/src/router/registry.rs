//! Route registry.
//!
//! An append-only, ordered list of `(pattern, handler)` entries. Order is
//! insertion order and doubles as match precedence: when several patterns
//! match a path, the earliest registered one wins.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use reinhardt_spa_infer::{ParamMap, infer_pairs};
use reinhardt_spa_matcher::Matcher;

use crate::error::RouterError;

static NEXT_HANDLER: AtomicU64 = AtomicU64::new(0);

/// Opaque identity of a route slot.
///
/// Identifiers are unique for the lifetime of the process and displayed as
/// `route-N`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RouteHandlerId(u64);

impl RouteHandlerId {
	/// Allocates a fresh identifier.
	pub fn allocate() -> Self {
		Self(NEXT_HANDLER.fetch_add(1, Ordering::Relaxed))
	}
}

impl fmt::Display for RouteHandlerId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "route-{}", self.0)
	}
}

/// One pattern or several patterns sharing a handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSpec {
	/// A single pattern.
	One(String),
	/// Several patterns, registered in order.
	Many(Vec<String>),
}

impl PathSpec {
	/// Returns the patterns in registration order.
	pub fn patterns(&self) -> &[String] {
		match self {
			Self::One(pattern) => std::slice::from_ref(pattern),
			Self::Many(patterns) => patterns,
		}
	}
}

impl From<&str> for PathSpec {
	fn from(pattern: &str) -> Self {
		Self::One(pattern.to_string())
	}
}

impl From<String> for PathSpec {
	fn from(pattern: String) -> Self {
		Self::One(pattern)
	}
}

impl From<Vec<String>> for PathSpec {
	fn from(patterns: Vec<String>) -> Self {
		Self::Many(patterns)
	}
}

impl From<Vec<&str>> for PathSpec {
	fn from(patterns: Vec<&str>) -> Self {
		Self::Many(patterns.into_iter().map(str::to_string).collect())
	}
}

impl<const N: usize> From<[&str; N]> for PathSpec {
	fn from(patterns: [&str; N]) -> Self {
		Self::Many(patterns.iter().map(|pattern| pattern.to_string()).collect())
	}
}

/// A registered route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryEntry {
	/// The pattern as declared.
	pub pattern: String,
	/// The owning slot.
	pub handler: RouteHandlerId,
}

/// Identifies a registry's content.
///
/// Equal signatures from the same registry mean no entry was added in
/// between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RegistrySignature(u64);

/// Result of matching a path against the registry.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteMatch {
	/// The winning handler.
	pub handler: RouteHandlerId,
	/// Captured segments with inferred values.
	pub path_params: ParamMap,
	/// The pattern that matched.
	pub matched_pattern: String,
}

/// Ordered route registry of one navigation scope.
#[derive(Debug, Default)]
pub struct Registry {
	matcher: Matcher<RouteHandlerId>,
	entries: Vec<RegistryEntry>,
	generation: u64,
}

impl Registry {
	/// Creates an empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends one entry per pattern in `spec`.
	///
	/// # Errors
	///
	/// Fails on the first pattern the matcher rejects. Patterns before it stay
	/// registered.
	pub fn register(&mut self, spec: &PathSpec, handler: RouteHandlerId) -> Result<(), RouterError> {
		for pattern in spec.patterns() {
			self.matcher.add(pattern, handler)?;
			self.entries.push(RegistryEntry {
				pattern: pattern.clone(),
				handler,
			});
			self.generation += 1;
		}
		Ok(())
	}

	/// Returns the first entry matching `path`.
	pub fn match_path(&self, path: &str) -> Option<RouteMatch> {
		self.matcher
			.match_path(path)
			.into_iter()
			.next()
			.map(|found| RouteMatch {
				handler: found.handler,
				path_params: infer_pairs(found.params),
				matched_pattern: found.pattern,
			})
	}

	/// Returns the current content signature.
	pub fn signature(&self) -> RegistrySignature {
		RegistrySignature(self.generation)
	}

	/// Returns all entries in registration order.
	pub fn entries(&self) -> &[RegistryEntry] {
		&self.entries
	}

	/// Returns the number of entries.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Returns whether no entry is registered.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Returns how many entries belong to `handler`.
	pub fn count_for(&self, handler: RouteHandlerId) -> usize {
		self.entries
			.iter()
			.filter(|entry| entry.handler == handler)
			.count()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use reinhardt_spa_infer::Scalar;
	use rstest::rstest;

	#[rstest]
	fn test_handler_ids_are_unique() {
		let a = RouteHandlerId::allocate();
		let b = RouteHandlerId::allocate();

		assert_ne!(a, b);
		assert!(a.to_string().starts_with("route-"));
	}

	#[rstest]
	fn test_first_registered_wins() {
		let first = RouteHandlerId::allocate();
		let second = RouteHandlerId::allocate();
		let mut registry = Registry::new();
		registry.register(&"/a".into(), first).unwrap();
		registry.register(&"/a".into(), second).unwrap();

		let found = registry.match_path("/a").unwrap();

		assert_eq!(found.handler, first);
		assert_eq!(registry.len(), 2);
	}

	#[rstest]
	fn test_wildcard_registered_first_shadows_literal() {
		let catch_all = RouteHandlerId::allocate();
		let about = RouteHandlerId::allocate();
		let mut registry = Registry::new();
		registry.register(&"*".into(), catch_all).unwrap();
		registry.register(&"/about".into(), about).unwrap();

		assert_eq!(registry.match_path("/about").unwrap().handler, catch_all);
	}

	#[rstest]
	fn test_params_are_inferred() {
		let handler = RouteHandlerId::allocate();
		let mut registry = Registry::new();
		registry.register(&"/user/:id".into(), handler).unwrap();

		let found = registry.match_path("/user/123").unwrap();

		assert_eq!(found.path_params.get("id"), Some(&Scalar::Int(123)));
		assert_eq!(found.matched_pattern, "/user/:id");
	}

	#[rstest]
	fn test_many_patterns_share_handler() {
		let handler = RouteHandlerId::allocate();
		let mut registry = Registry::new();
		registry.register(&["/", "/home"].into(), handler).unwrap();

		assert_eq!(registry.count_for(handler), 2);
		assert_eq!(registry.match_path("/home").unwrap().handler, handler);
		assert_eq!(registry.match_path("/").unwrap().handler, handler);
	}

	#[rstest]
	fn test_no_match() {
		let mut registry = Registry::new();
		registry
			.register(&"/about".into(), RouteHandlerId::allocate())
			.unwrap();

		assert!(registry.match_path("/contact").is_none());
	}

	#[rstest]
	fn test_signature_changes_on_append() {
		let mut registry = Registry::new();
		let before = registry.signature();

		registry
			.register(&"/about".into(), RouteHandlerId::allocate())
			.unwrap();

		assert_ne!(registry.signature(), before);
	}

	#[rstest]
	fn test_partial_failure_keeps_earlier_patterns() {
		let handler = RouteHandlerId::allocate();
		let mut registry = Registry::new();

		let result = registry.register(&["/ok", "/bad/:a/:a"].into(), handler);

		assert!(matches!(result, Err(RouterError::Matcher(_))));
		assert_eq!(registry.entries().len(), 1);
		assert_eq!(registry.entries()[0].pattern, "/ok");
	}
}
