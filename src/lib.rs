//! # Reinhardt SPA
//!
//! Declarative client-side routing for single-page applications.
//!
//! This crate re-exports `reinhardt-spa-router`, which keeps a tree of
//! declared route slots in sync with the browser URL without full page
//! reloads.
//!
//! ## Feature Flags
//!
//! - `debug-hooks` - Verbose resolver and transition logging in debug builds
//!
//! ## Quick Example
//!
//! ```rust
//! use reinhardt_spa::host::MemoryHost;
//! use reinhardt_spa::prelude::*;
//!
//! let host = MemoryHost::starting_at("/old").unwrap();
//! let redirect = Redirect::new("/old", "/new");
//! let page = RouteSlot::new("/new", |_| "New page");
//!
//! let routes = Routes::mount(host.shared(), RouterConfig::default(), &ScopeGuard::new(), move || {
//!     View::fragment([redirect.render(), page.render()])
//! })
//! .unwrap();
//!
//! assert_eq!(routes.try_render().unwrap().render_to_string(), "New page");
//! assert_eq!(routes.controller().current_path(), "/new");
//! ```

pub use reinhardt_spa_router::*;
