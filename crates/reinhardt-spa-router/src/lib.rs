//! Reinhardt SPA Router - declarative client-side routing
//!
//! Keeps a tree of declared route slots in sync with the browser URL without
//! full page reloads.
//!
//! ## Features
//!
//! - **Ordered matching**: the first registered pattern matching a path wins
//! - **Typed parameters**: path and query values are inferred as integers,
//!   floats, booleans or text
//! - **Scroll restoration**: offsets are recorded before leaving a path and
//!   restored after the next layout
//! - **Host abstraction**: the same router runs on `web-sys` in the browser
//!   and on an in-memory host natively
//!
//! ## Architecture
//!
//! - [`router`]: registry, resolver, navigation controller, slots and helpers
//! - [`host`]: the browser surface ([`host::MemoryHost`], `host::WebHost`)
//! - [`reactive`]: publish/subscribe state container
//! - [`component`]: minimal view model for routed content
//! - [`config`]: scope configuration
//! - [`logging`]: console/tracing logging macros
//!
//! ## Example
//!
//! ```
//! use reinhardt_spa_router::host::{BrowserHost, MemoryHost};
//! use reinhardt_spa_router::prelude::*;
//!
//! let host = MemoryHost::new();
//! let home = RouteSlot::new("/", |_| "Home");
//! let user = RouteSlot::new("/user/:id", |router| {
//!     format!("User {}", router.path_param::<i64>("id").unwrap_or_default())
//! });
//!
//! let routes = Routes::mount(host.shared(), RouterConfig::default(), &ScopeGuard::new(), move || {
//!     View::fragment([home.render(), user.render()])
//! })
//! .unwrap();
//! assert_eq!(routes.try_render().unwrap().render_to_string(), "Home");
//!
//! routes.controller().push("/user/123").unwrap();
//! assert_eq!(routes.try_render().unwrap().render_to_string(), "User 123");
//! assert_eq!(host.location().path, "/user/123");
//! ```

pub mod component;
pub mod config;
pub mod error;
pub mod host;
pub mod logging;
pub mod prelude;
pub mod reactive;
pub mod router;

pub use component::{Component, ElementView, IntoView, View};
pub use config::{GuardMode, RouterConfig};
pub use error::{ParamError, RouterError};
pub use reactive::{Store, Subscription};
pub use router::{
	FromScalar, Link, MatchStatus, Navigate, NavigateOptions, NavigationController,
	NavigationState, NestedRoutes, PathSpec, Redirect, RouteHandlerId, RouteSlot, RouterHandle,
	Routes, ScopeGuard, try_use_router, use_router,
};

pub use reinhardt_spa_infer::{ParamMap, Scalar};
pub use reinhardt_spa_matcher::MatcherError;
