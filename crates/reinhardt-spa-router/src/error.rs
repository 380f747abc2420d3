//! Router error types.

use reinhardt_spa_matcher::MatcherError;

/// Error type for router operations.
#[derive(Debug, thiserror::Error)]
pub enum RouterError {
	/// Navigation state was requested outside of any `Routes` scope.
	#[error("use_router must be used within a Routes scope")]
	OutsideScope,
	/// A top-level scope mounted while another one still holds the guard.
	#[error("a top-level Routes scope is already mounted; unmount it before mounting another")]
	ScopeAlreadyMounted,
	/// The history surface rejected an entry.
	#[error("Navigation failed: {0}")]
	Navigation(String),
	/// The DOM or listener surface failed.
	#[error("Browser host error: {0}")]
	Host(String),
	/// A URL could not be resolved against the current location.
	#[error("Invalid URL `{url}`: {source}")]
	InvalidUrl {
		/// The URL as given.
		url: String,
		/// Parser error.
		#[source]
		source: url::ParseError,
	},
	/// The current query string could not be decoded.
	#[error("Invalid query string: {0}")]
	Query(#[from] serde_urlencoded::de::Error),
	/// Router configuration could not be parsed.
	#[error("Invalid router configuration: {0}")]
	Config(#[from] serde_json::Error),
	/// The matcher engine rejected a route pattern.
	#[error(transparent)]
	Matcher(#[from] MatcherError),
}

/// Error returned by typed parameter access.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParamError {
	/// No parameter with this name exists.
	#[error("Missing parameter: {0}")]
	Missing(String),
	/// The parameter exists but holds another type.
	#[error("Parameter `{name}` expected {expected}, found {found}")]
	TypeMismatch {
		/// Parameter name.
		name: String,
		/// Requested type.
		expected: &'static str,
		/// Inferred type of the stored value.
		found: &'static str,
	},
}
