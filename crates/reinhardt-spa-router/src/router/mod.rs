//! Client-side routing.
//!
//! - [`registry`]: ordered route registry and handler ids
//! - [`resolver`]: memoized path resolution and query decoding
//! - [`controller`]: the navigation state machine of one scope
//! - [`components`]: `Routes`, `NestedRoutes`, `Link`, `Navigate`, `Redirect`

pub mod components;
pub mod context;
pub mod controller;
pub mod guard;
pub mod params;
pub mod registry;
pub mod resolver;
pub mod scroll;
pub mod slot;
pub mod state;

pub use components::{Link, Navigate, NestedRoutes, Redirect, Routes};
pub use context::{RouterHandle, try_use_router, use_router};
pub use controller::{NavigateOptions, NavigationController};
pub use guard::{GuardToken, ScopeGuard};
pub use params::FromScalar;
pub use registry::{PathSpec, Registry, RegistryEntry, RegistrySignature, RouteHandlerId, RouteMatch};
pub use resolver::{MatchResolver, Resolution};
pub use scroll::ScrollCache;
pub use slot::RouteSlot;
pub use state::{MatchStatus, NavigationState};
