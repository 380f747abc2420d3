//! Router configuration.
//!
//! ```
//! use reinhardt_spa_router::{GuardMode, RouterConfig};
//!
//! let config = RouterConfig::from_json(r#"{ "guard_mode": "relaxed" }"#).unwrap();
//! assert_eq!(config.guard_mode, GuardMode::Relaxed);
//! assert!(config.scroll_restoration);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::RouterError;

/// How a second top-level scope is treated while one is mounted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GuardMode {
	/// Mounting fails with [`RouterError::ScopeAlreadyMounted`].
	#[default]
	Strict,
	/// Mounting logs a warning and both scopes keep operating.
	Relaxed,
}

/// Configuration for a navigation scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
	/// Duplicate top-level scope handling.
	pub guard_mode: GuardMode,
	/// Whether scroll offsets are recorded and restored around navigations.
	pub scroll_restoration: bool,
	/// Whether the top-level scope intercepts same-origin anchor clicks.
	pub intercept_clicks: bool,
}

impl Default for RouterConfig {
	fn default() -> Self {
		Self {
			guard_mode: GuardMode::Strict,
			scroll_restoration: true,
			intercept_clicks: true,
		}
	}
}

impl RouterConfig {
	/// Creates the default configuration.
	pub fn new() -> Self {
		Self::default()
	}

	/// Parses a configuration from JSON. Missing fields keep their defaults.
	pub fn from_json(source: &str) -> Result<Self, RouterError> {
		Ok(serde_json::from_str(source)?)
	}

	/// Sets the guard mode.
	pub fn with_guard_mode(mut self, mode: GuardMode) -> Self {
		self.guard_mode = mode;
		self
	}

	/// Enables or disables scroll restoration.
	pub fn with_scroll_restoration(mut self, enabled: bool) -> Self {
		self.scroll_restoration = enabled;
		self
	}

	/// Enables or disables anchor click interception.
	pub fn with_intercept_clicks(mut self, enabled: bool) -> Self {
		self.intercept_clicks = enabled;
		self
	}
}
