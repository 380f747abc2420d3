//! Commonly used items.
//!
//! ```
//! use reinhardt_spa_router::prelude::*;
//! ```

pub use crate::component::{Component, IntoView, View};
pub use crate::config::{GuardMode, RouterConfig};
pub use crate::error::{ParamError, RouterError};
pub use crate::router::{
	Link, NavigateOptions, Navigate, NestedRoutes, Redirect, RouteSlot, RouterHandle, Routes,
	ScopeGuard, try_use_router, use_router,
};
pub use reinhardt_spa_infer::Scalar;
