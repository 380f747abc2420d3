//! Memoized path resolution.

use reinhardt_spa_infer::{ParamMap, infer_pairs};

use super::registry::{Registry, RegistrySignature, RouteMatch};
use crate::error::RouterError;

/// Outcome of [`MatchResolver::resolve`].
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
	/// Neither the path nor the registry changed since the last resolution.
	Skipped,
	/// A route matched.
	Matched(RouteMatch),
	/// No route matches the path.
	NotFound,
}

/// Resolves paths against a registry, skipping repeated work.
///
/// The memo key is the pair `(path, registry signature)`: resolution runs
/// again whenever either component changes.
#[derive(Debug, Clone, Default)]
pub struct MatchResolver {
	last: Option<(String, RegistrySignature)>,
}

impl MatchResolver {
	/// Creates a resolver with an empty memo.
	pub fn new() -> Self {
		Self::default()
	}

	/// Resolves `path` unless it was already resolved against the same
	/// registry content.
	pub fn resolve(&mut self, path: &str, registry: &Registry) -> Resolution {
		let signature = registry.signature();
		let unchanged = self
			.last
			.as_ref()
			.is_some_and(|(last_path, last_signature)| last_path == path && *last_signature == signature);
		if unchanged {
			crate::debug_log!("resolver: skipped {}", path);
			return Resolution::Skipped;
		}

		self.last = Some((path.to_string(), signature));
		match registry.match_path(path) {
			Some(found) => {
				crate::debug_log!(
					"resolver: {} matched {} ({})",
					path,
					found.matched_pattern,
					found.handler
				);
				Resolution::Matched(found)
			}
			None => {
				crate::debug_log!("resolver: no route for {}", path);
				Resolution::NotFound
			}
		}
	}

	/// Forgets the memo so the next call resolves unconditionally.
	pub fn invalidate(&mut self) {
		self.last = None;
	}

	/// Decodes a query string (without the leading `?`) into inferred values.
	///
	/// When a key repeats, the last value wins.
	pub fn query_params(query: &str) -> Result<ParamMap, RouterError> {
		let pairs: Vec<(String, String)> = serde_urlencoded::from_str(query)?;
		Ok(infer_pairs(pairs))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::router::registry::RouteHandlerId;
	use reinhardt_spa_infer::Scalar;
	use rstest::rstest;

	fn registry_with(patterns: &[&str]) -> (Registry, Vec<RouteHandlerId>) {
		let mut registry = Registry::new();
		let ids = patterns
			.iter()
			.map(|pattern| {
				let id = RouteHandlerId::allocate();
				registry.register(&(*pattern).into(), id).unwrap();
				id
			})
			.collect();
		(registry, ids)
	}

	#[rstest]
	fn test_repeated_resolution_is_skipped() {
		let (registry, ids) = registry_with(&["/about"]);
		let mut resolver = MatchResolver::new();

		let first = resolver.resolve("/about", &registry);
		assert!(matches!(first, Resolution::Matched(ref found) if found.handler == ids[0]));
		assert_eq!(resolver.resolve("/about", &registry), Resolution::Skipped);
	}

	#[rstest]
	fn test_registry_change_reopens_resolution() {
		let (mut registry, _) = registry_with(&[]);
		let mut resolver = MatchResolver::new();
		assert_eq!(resolver.resolve("/about", &registry), Resolution::NotFound);

		let about = RouteHandlerId::allocate();
		registry.register(&"/about".into(), about).unwrap();

		assert!(matches!(
			resolver.resolve("/about", &registry),
			Resolution::Matched(ref found) if found.handler == about
		));
	}

	#[rstest]
	fn test_invalidate() {
		let (registry, _) = registry_with(&["/"]);
		let mut resolver = MatchResolver::new();
		resolver.resolve("/", &registry);

		resolver.invalidate();

		assert!(matches!(resolver.resolve("/", &registry), Resolution::Matched(_)));
	}

	#[rstest]
	#[case("", &[])]
	#[case("name=test&page=1", &[("name", Scalar::Text("test".into())), ("page", Scalar::Int(1))])]
	#[case("debug=true&ratio=0.5", &[("debug", Scalar::Bool(true)), ("ratio", Scalar::Float(0.5))])]
	#[case("q=hello%20world&q=last", &[("q", Scalar::Text("last".into()))])]
	#[case("code=007", &[("code", Scalar::Text("007".into()))])]
	fn test_query_params(#[case] query: &str, #[case] expected: &[(&str, Scalar)]) {
		let params = MatchResolver::query_params(query).unwrap();

		assert_eq!(params.len(), expected.len());
		for (key, value) in expected {
			assert_eq!(params.get(*key), Some(value), "key {}", key);
		}
	}
}
