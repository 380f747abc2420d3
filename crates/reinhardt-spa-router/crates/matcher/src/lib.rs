//! Path pattern matching engine for reinhardt-spa-router.
//!
//! Patterns are `/`-separated segments compiled into anchored regular
//! expressions. The engine knows nothing about handlers beyond storing them:
//! [`Matcher::match_path`] returns every route whose pattern matches, in the
//! order the routes were added, and leaves the choice of a winner to the caller.
//!
//! ## Pattern syntax
//!
//! | Segment      | Matches                                                    |
//! |--------------|------------------------------------------------------------|
//! | `users`      | The literal segment `users`                                |
//! | `:id`        | One non-empty segment, captured as `id`                    |
//! | `:id?`       | An optional segment, captured as `id` when present         |
//! | `*`          | Any remainder of the path, including nothing at all        |
//! | `not*`       | Any remainder that starts with the literal `not`           |
//!
//! A single trailing `/` on the requested path is ignored, so `/about` matches
//! both `/about` and `/about/`.
//!
//! ## Example
//!
//! ```
//! use reinhardt_spa_matcher::Matcher;
//!
//! let mut matcher = Matcher::new();
//! matcher.add("/user/:id", "user").unwrap();
//! matcher.add("*", "fallback").unwrap();
//!
//! let matches = matcher.match_path("/user/42");
//! assert_eq!(matches.len(), 2);
//! assert_eq!(matches[0].handler, "user");
//! assert_eq!(matches[0].params, vec![("id".to_string(), "42".to_string())]);
//! ```

use regex::Regex;

/// Errors raised while compiling a route pattern.
#[derive(Debug, thiserror::Error)]
pub enum MatcherError {
	/// A named segment uses characters that cannot form a parameter name.
	#[error("invalid parameter name `{name}` in route pattern `{pattern}`")]
	InvalidParameterName {
		/// The offending pattern.
		pattern: String,
		/// The rejected parameter name.
		name: String,
	},
	/// The same parameter name appears twice in one pattern.
	#[error("route pattern `{pattern}` declares parameter `{name}` more than once")]
	DuplicateParameter {
		/// The offending pattern.
		pattern: String,
		/// The repeated parameter name.
		name: String,
	},
	/// The generated expression was rejected by the regex engine.
	#[error("route pattern `{pattern}` could not be compiled: {source}")]
	Compile {
		/// The offending pattern.
		pattern: String,
		/// Underlying regex error.
		#[source]
		source: regex::Error,
	},
}

/// A compiled route pattern.
#[derive(Debug, Clone)]
pub struct PathPattern {
	raw: String,
	regex: Regex,
	param_names: Vec<String>,
}

impl PathPattern {
	/// Compiles a pattern.
	///
	/// # Errors
	///
	/// Returns [`MatcherError`] when a parameter name is malformed or repeated,
	/// or when the generated expression exceeds the regex engine's limits.
	pub fn parse(pattern: &str) -> Result<Self, MatcherError> {
		let body = pattern.strip_prefix('/').unwrap_or(pattern);
		let body = body.strip_suffix('/').unwrap_or(body);

		let mut source = String::from("^");
		let mut param_names: Vec<String> = Vec::new();
		let mut open_ended = false;

		if !body.is_empty() {
			let segments: Vec<&str> = body.split('/').collect();
			let last = segments.len() - 1;

			for (index, segment) in segments.iter().enumerate() {
				let is_last = index == last;

				if let Some(name) = segment.strip_prefix(':') {
					let (name, optional) = match name.strip_suffix('?') {
						Some(name) => (name, true),
						None => (name, false),
					};
					validate_name(pattern, name, &param_names)?;

					if optional {
						source.push_str(&format!("(?:/(?P<{}>[^/]+))?", name));
					} else {
						source.push_str(&format!("/(?P<{}>[^/]+)", name));
					}
					param_names.push(name.to_string());
				} else if *segment == "*" {
					if is_last {
						source.push_str("(?:/.*)?");
						open_ended = true;
					} else {
						source.push_str("/.*");
					}
				} else if let Some(prefix) = segment.strip_suffix('*') {
					source.push('/');
					source.push_str(&regex::escape(prefix));
					source.push_str(".*");
					open_ended = is_last;
				} else {
					source.push('/');
					source.push_str(&regex::escape(segment));
				}
			}
		}

		if open_ended {
			source.push('$');
		} else if body.is_empty() {
			source.push_str("/$");
		} else {
			source.push_str("/?$");
		}

		let regex = Regex::new(&source).map_err(|source| MatcherError::Compile {
			pattern: pattern.to_string(),
			source,
		})?;

		Ok(Self {
			raw: pattern.to_string(),
			regex,
			param_names,
		})
	}

	/// Returns the pattern as it was declared.
	pub fn as_str(&self) -> &str {
		&self.raw
	}

	/// Returns the named parameters in declaration order.
	pub fn param_names(&self) -> &[String] {
		&self.param_names
	}

	/// Matches a path, returning captured parameters in declaration order.
	///
	/// Captured values are percent-decoded; a value that does not decode to
	/// valid UTF-8 is returned as captured.
	pub fn captures(&self, path: &str) -> Option<Vec<(String, String)>> {
		let caps = self.regex.captures(path)?;

		let params = self
			.param_names
			.iter()
			.filter_map(|name| {
				let raw = caps.name(name)?.as_str();
				let value = urlencoding::decode(raw)
					.map(|decoded| decoded.into_owned())
					.unwrap_or_else(|_| raw.to_string());
				Some((name.clone(), value))
			})
			.collect();

		Some(params)
	}

	/// Returns whether the path matches this pattern.
	pub fn is_match(&self, path: &str) -> bool {
		self.regex.is_match(path)
	}
}

fn validate_name(pattern: &str, name: &str, seen: &[String]) -> Result<(), MatcherError> {
	let mut chars = name.chars();
	let valid = match chars.next() {
		Some(first) => {
			(first.is_ascii_alphabetic() || first == '_')
				&& chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
		}
		None => false,
	};

	if !valid {
		return Err(MatcherError::InvalidParameterName {
			pattern: pattern.to_string(),
			name: name.to_string(),
		});
	}

	if seen.iter().any(|existing| existing == name) {
		return Err(MatcherError::DuplicateParameter {
			pattern: pattern.to_string(),
			name: name.to_string(),
		});
	}

	Ok(())
}

/// A route that matched a requested path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match<H> {
	/// The handler stored with the route.
	pub handler: H,
	/// Captured named segments, in declaration order.
	pub params: Vec<(String, String)>,
	/// The pattern the route was added with.
	pub pattern: String,
}

/// Ordered collection of patterns and their handlers.
///
/// Routes are never deduplicated: adding the same pattern twice stores two
/// routes, and both are reported by [`Matcher::match_path`].
#[derive(Debug, Clone)]
pub struct Matcher<H> {
	routes: Vec<(PathPattern, H)>,
}

impl<H> Default for Matcher<H> {
	fn default() -> Self {
		Self { routes: Vec::new() }
	}
}

impl<H: Clone> Matcher<H> {
	/// Creates an empty matcher.
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds a route.
	///
	/// # Errors
	///
	/// Returns [`MatcherError`] if the pattern cannot be compiled.
	pub fn add(&mut self, pattern: &str, handler: H) -> Result<(), MatcherError> {
		let compiled = PathPattern::parse(pattern)?;
		self.routes.push((compiled, handler));
		Ok(())
	}

	/// Returns every route matching `path`, in insertion order.
	pub fn match_path(&self, path: &str) -> Vec<Match<H>> {
		self.routes
			.iter()
			.filter_map(|(pattern, handler)| {
				pattern.captures(path).map(|params| Match {
					handler: handler.clone(),
					params,
					pattern: pattern.as_str().to_string(),
				})
			})
			.collect()
	}

	/// Returns the number of stored routes.
	pub fn len(&self) -> usize {
		self.routes.len()
	}

	/// Returns whether no routes are stored.
	pub fn is_empty(&self) -> bool {
		self.routes.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("/", "/", true)]
	#[case("/", "/about", false)]
	#[case("/about", "/about", true)]
	#[case("/about", "/about/", true)]
	#[case("/about", "/about/team", false)]
	#[case("/about/", "/about", true)]
	#[case("/user/:id", "/user/123", true)]
	#[case("/user/:id", "/user/", false)]
	#[case("/user/:id", "/user/1/posts", false)]
	#[case("*", "/anything/at/all", true)]
	#[case("*", "/", true)]
	#[case("/settings/*", "/settings", true)]
	#[case("/settings/*", "/settings/profile/email", true)]
	#[case("/settings/not*", "/settings/notifications", true)]
	#[case("/settings/not*", "/settings/profile", false)]
	#[case("/files/:name?", "/files", true)]
	#[case("/files/:name?", "/files/readme", true)]
	#[case("/a.b", "/aXb", false)]
	fn test_pattern_matching(#[case] pattern: &str, #[case] path: &str, #[case] expected: bool) {
		let compiled = PathPattern::parse(pattern).unwrap();
		assert_eq!(compiled.is_match(path), expected, "{pattern} vs {path}");
	}

	#[rstest]
	fn test_captures_in_declaration_order() {
		let pattern = PathPattern::parse("/users/:user_id/posts/:post_id").unwrap();

		let params = pattern.captures("/users/1/posts/99").unwrap();
		assert_eq!(
			params,
			vec![
				("user_id".to_string(), "1".to_string()),
				("post_id".to_string(), "99".to_string()),
			]
		);
	}

	#[rstest]
	fn test_captures_are_percent_decoded() {
		let pattern = PathPattern::parse("/user/:name").unwrap();

		let params = pattern.captures("/user/john%20doe").unwrap();
		assert_eq!(params[0].1, "john doe");
	}

	#[rstest]
	fn test_optional_param_absent() {
		let pattern = PathPattern::parse("/files/:name?").unwrap();

		assert!(pattern.captures("/files").unwrap().is_empty());
	}

	#[rstest]
	#[case("/user/:")]
	#[case("/user/:1st")]
	#[case("/user/:na-me")]
	fn test_invalid_parameter_name(#[case] pattern: &str) {
		let result = PathPattern::parse(pattern);
		assert!(matches!(
			result,
			Err(MatcherError::InvalidParameterName { .. })
		));
	}

	#[rstest]
	fn test_duplicate_parameter() {
		let result = PathPattern::parse("/a/:id/b/:id");
		assert!(matches!(result, Err(MatcherError::DuplicateParameter { .. })));
	}

	#[rstest]
	fn test_match_path_preserves_insertion_order() {
		let mut matcher = Matcher::new();
		matcher.add("*", 0).unwrap();
		matcher.add("/a", 1).unwrap();
		matcher.add("/a", 2).unwrap();

		let handlers: Vec<i32> = matcher.match_path("/a").into_iter().map(|m| m.handler).collect();
		assert_eq!(handlers, vec![0, 1, 2]);
	}

	#[rstest]
	fn test_match_path_reports_pattern() {
		let mut matcher = Matcher::new();
		matcher.add("/user/:id", "user").unwrap();

		let matches = matcher.match_path("/user/7");
		assert_eq!(matches[0].pattern, "/user/:id");
	}

	#[rstest]
	fn test_no_match_is_empty() {
		let mut matcher = Matcher::new();
		matcher.add("/about", ()).unwrap();

		assert!(matcher.match_path("/contact").is_empty());
		assert_eq!(matcher.len(), 1);
		assert!(!matcher.is_empty());
	}

	mod properties {
		use super::*;
		use proptest::prelude::*;

		proptest! {
			#[test]
			fn literal_patterns_match_themselves(segments in prop::collection::vec("[a-z0-9._~-]{1,8}", 1..5)) {
				let path = format!("/{}", segments.join("/"));
				let pattern = PathPattern::parse(&path).unwrap();
				prop_assert!(pattern.is_match(&path));
			}

			#[test]
			fn named_segment_captures_any_segment(value in "[A-Za-z0-9_-]{1,12}") {
				let pattern = PathPattern::parse("/item/:value").unwrap();
				let params = pattern.captures(&format!("/item/{}", value)).unwrap();
				prop_assert_eq!(&params[0].1, &value);
			}
		}
	}
}
