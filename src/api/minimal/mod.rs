//! Minimal endpoint registration and versioned route mapping.
//!
//! Endpoints are small types implementing [`MinimalEndpoint`]. They are
//! registered through the application manifest (see [`crate::container`]) and
//! mapped onto the router by [`map_minimal_endpoints`]:
//!
//! - one versioned API per group name,
//! - one [`RouteGroup`] per (group, prefix, version), mounted at
//!   `/api/v{version}{prefix}`,
//! - each endpoint adds its routes to its own route group.

mod group;
mod mapping;
mod version;

pub use group::RouteGroup;
pub use mapping::{map_minimal_endpoints, VersionedApiDescriptor};
pub use version::ApiVersion;

/// A unit exposing one or more HTTP routes under a versioned, grouped path
pub trait MinimalEndpoint<S>: Send + Sync {
    fn group_name(&self) -> &str;

    fn prefix_route(&self) -> &str;

    fn version(&self) -> ApiVersion;

    /// Registers this endpoint's routes on the resolved route group
    fn map_endpoint(&self, group: &mut RouteGroup<S>);
}
