use axum::{routing::MethodRouter, Router};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use tracing::info;

use super::group::{normalize_prefix, RouteGroup, VersionedApi};
use super::version::ApiVersion;
use crate::container::ServiceProvider;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct SubRouteKey {
    group_name: String,
    prefix: String,
    version: ApiVersion,
}

/// Description of one versioned API surface and its sub-routes
#[derive(Debug, Clone, Serialize)]
pub struct VersionedApiDescriptor {
    pub name: String,
    pub tags: Vec<String>,
    pub sub_routes: Vec<SubRouteDescriptor>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubRouteDescriptor {
    pub prefix: String,
    pub version: ApiVersion,
    pub base_path: String,
    pub routes: Vec<String>,
}

/// Router produced from the registered endpoints, with its route table
pub struct MappedEndpoints<S> {
    router: Router<S>,
    apis: Vec<VersionedApiDescriptor>,
}

impl<S> MappedEndpoints<S> {
    pub fn apis(&self) -> &[VersionedApiDescriptor] {
        &self.apis
    }

    pub fn into_router(self) -> Router<S> {
        self.router
    }
}

/// Resolves every registered endpoint in a new scope and maps it onto the
/// route group matching its (group, prefix, version).
pub fn map_minimal_endpoints<S>(provider: &ServiceProvider<S>, state: &S) -> MappedEndpoints<S>
where
    S: Clone + Send + Sync + 'static,
{
    let scope = provider.create_scope(state);
    let endpoints = scope.endpoints();

    let mut versioned_apis: Vec<VersionedApi> = Vec::new();
    let mut sub_groups: Vec<RouteGroup<S>> = Vec::new();
    let mut sub_group_index: HashMap<SubRouteKey, usize> = HashMap::new();

    for endpoint in &endpoints {
        let group_name = endpoint.group_name();

        if !versioned_apis.iter().any(|api| api.name == group_name) {
            versioned_apis.push(VersionedApi::new(group_name).with_tags([group_name]));
        }

        let key = SubRouteKey {
            group_name: group_name.to_string(),
            prefix: normalize_prefix(endpoint.prefix_route()),
            version: endpoint.version(),
        };

        let index = *sub_group_index.entry(key).or_insert_with(|| {
            sub_groups.push(RouteGroup::new(
                group_name,
                endpoint.prefix_route(),
                endpoint.version(),
            ));
            sub_groups.len() - 1
        });

        endpoint.map_endpoint(&mut sub_groups[index]);
    }

    let apis: Vec<VersionedApiDescriptor> = versioned_apis
        .into_iter()
        .map(|api| {
            let sub_routes = sub_groups
                .iter()
                .filter(|group| group.group_name() == api.name)
                .map(|group| SubRouteDescriptor {
                    prefix: group.prefix().to_string(),
                    version: group.version(),
                    base_path: group.base_path(),
                    routes: group.paths(),
                })
                .collect();

            VersionedApiDescriptor {
                name: api.name,
                tags: api.tags,
                sub_routes,
            }
        })
        .collect();

    // Distinct groups may still land on the same absolute path
    let mut routes: BTreeMap<String, MethodRouter<S>> = BTreeMap::new();
    for group in sub_groups {
        info!(
            "Mapping group '{}' version {} at {}",
            group.group_name(),
            group.version(),
            group.base_path()
        );
        for (path, method_router) in group.into_routes() {
            let merged = match routes.remove(&path) {
                Some(existing) => existing.merge(method_router),
                None => method_router,
            };
            routes.insert(path, merged);
        }
    }

    let router = routes
        .into_iter()
        .fold(Router::new(), |router, (path, method_router)| {
            router.route(&path, method_router)
        });

    MappedEndpoints { router, apis }
}
