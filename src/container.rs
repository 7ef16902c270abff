//! Explicit capability registry for endpoints and data seeders.
//!
//! Each module of the application declares an [`ApplicationPart`] listing the
//! endpoints and seeders it provides and the parts it depends on. The
//! [`ServiceCollection`] walks that manifest once at startup; the resulting
//! [`ServiceProvider`] hands out fresh instances for every [`ServiceScope`].

use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

use crate::api::minimal::MinimalEndpoint;
use crate::services::seed_worker::DataSeeder;

pub type EndpointFactory<S> = Arc<dyn Fn(&S) -> Box<dyn MinimalEndpoint<S>> + Send + Sync>;
pub type SeederFactory<S> = Arc<dyn Fn(&S) -> Box<dyn DataSeeder> + Send + Sync>;

/// Factory for an endpoint that needs nothing from the application state
pub fn endpoint<S, E>() -> EndpointFactory<S>
where
    S: 'static,
    E: MinimalEndpoint<S> + Default + 'static,
{
    Arc::new(|_: &S| Box::new(E::default()) as Box<dyn MinimalEndpoint<S>>)
}

pub fn seeder<S, D, F>(factory: F) -> SeederFactory<S>
where
    S: 'static,
    D: DataSeeder + 'static,
    F: Fn(&S) -> D + Send + Sync + 'static,
{
    Arc::new(move |state: &S| Box::new(factory(state)) as Box<dyn DataSeeder>)
}

/// A statically declared module contributing capabilities to the manifest
pub trait ApplicationPart<S>: Send + Sync {
    /// Unique name, used to deduplicate parts reachable through several references
    fn name(&self) -> &str;

    fn references(&self) -> Vec<Arc<dyn ApplicationPart<S>>> {
        Vec::new()
    }

    fn endpoints(&self) -> Vec<EndpointFactory<S>> {
        Vec::new()
    }

    fn seeders(&self) -> Vec<SeederFactory<S>> {
        Vec::new()
    }
}

/// Parts to scan: `scan_parts` when given, otherwise `caller` and everything it
/// references transitively, in first-visit order.
pub fn resolve_parts<S>(
    caller: &Arc<dyn ApplicationPart<S>>,
    scan_parts: &[Arc<dyn ApplicationPart<S>>],
) -> Vec<Arc<dyn ApplicationPart<S>>> {
    if !scan_parts.is_empty() {
        return scan_parts.to_vec();
    }

    let mut visited = HashSet::new();
    let mut parts = Vec::new();
    let mut pending = vec![Arc::clone(caller)];

    while !pending.is_empty() {
        let mut next = Vec::new();
        for part in pending {
            if !visited.insert(part.name().to_string()) {
                continue;
            }
            next.extend(part.references());
            parts.push(part);
        }
        pending = next;
    }

    parts
}

/// Registrations collected while composing the application
pub struct ServiceCollection<S> {
    endpoints: Vec<EndpointFactory<S>>,
    seeders: Vec<SeederFactory<S>>,
}

impl<S> Default for ServiceCollection<S> {
    fn default() -> Self {
        Self {
            endpoints: Vec::new(),
            seeders: Vec::new(),
        }
    }
}

impl<S> ServiceCollection<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers every endpoint found in the scanned parts.
    ///
    /// Registrations are appended, so calling this twice registers the
    /// endpoints twice.
    pub fn add_minimal_endpoints(
        &mut self,
        caller: &Arc<dyn ApplicationPart<S>>,
        scan_parts: &[Arc<dyn ApplicationPart<S>>],
    ) -> &mut Self {
        for part in resolve_parts(caller, scan_parts) {
            let endpoints = part.endpoints();
            debug!(
                "Registering {} endpoint(s) from part '{}'",
                endpoints.len(),
                part.name()
            );
            for factory in endpoints {
                self.add_endpoint(factory);
            }
        }
        self
    }

    pub fn add_data_seeders(
        &mut self,
        caller: &Arc<dyn ApplicationPart<S>>,
        scan_parts: &[Arc<dyn ApplicationPart<S>>],
    ) -> &mut Self {
        for part in resolve_parts(caller, scan_parts) {
            let seeders = part.seeders();
            debug!(
                "Registering {} seeder(s) from part '{}'",
                seeders.len(),
                part.name()
            );
            for factory in seeders {
                self.add_seeder(factory);
            }
        }
        self
    }

    pub fn add_endpoint(&mut self, factory: EndpointFactory<S>) -> &mut Self {
        self.endpoints.push(factory);
        self
    }

    pub fn add_seeder(&mut self, factory: SeederFactory<S>) -> &mut Self {
        self.seeders.push(factory);
        self
    }

    pub fn build(self) -> ServiceProvider<S> {
        ServiceProvider {
            endpoints: Arc::from(self.endpoints),
            seeders: Arc::from(self.seeders),
        }
    }
}

/// Read-only view over the registrations, cheap to clone
pub struct ServiceProvider<S> {
    endpoints: Arc<[EndpointFactory<S>]>,
    seeders: Arc<[SeederFactory<S>]>,
}

impl<S> Clone for ServiceProvider<S> {
    fn clone(&self) -> Self {
        Self {
            endpoints: Arc::clone(&self.endpoints),
            seeders: Arc::clone(&self.seeders),
        }
    }
}

impl<S> ServiceProvider<S> {
    pub fn create_scope<'a>(&'a self, state: &'a S) -> ServiceScope<'a, S> {
        ServiceScope {
            provider: self,
            state,
        }
    }

    pub fn endpoint_count(&self) -> usize {
        self.endpoints.len()
    }

    pub fn seeder_count(&self) -> usize {
        self.seeders.len()
    }
}

/// One logical unit of work; every resolution builds new instances
pub struct ServiceScope<'a, S> {
    provider: &'a ServiceProvider<S>,
    state: &'a S,
}

impl<S> ServiceScope<'_, S> {
    pub fn endpoints(&self) -> Vec<Box<dyn MinimalEndpoint<S>>> {
        self.provider
            .endpoints
            .iter()
            .map(|factory| factory(self.state))
            .collect()
    }

    pub fn seeders(&self) -> Vec<Box<dyn DataSeeder>> {
        self.provider
            .seeders
            .iter()
            .map(|factory| factory(self.state))
            .collect()
    }
}
