use axum::routing::MethodRouter;
use serde::Serialize;
use std::collections::BTreeMap;

use super::version::ApiVersion;

/// Root segment every versioned route group is mounted under
pub const API_ROOT: &str = "/api";

/// Top-level API surface created once per endpoint group name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionedApi {
    pub name: String,
    pub tags: Vec<String>,
}

impl VersionedApi {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tags: Vec::new(),
        }
    }

    pub fn with_tags<I, T>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }
}

/// Versioned sub-route owned by one (group, prefix, version) triple.
///
/// Endpoints add their routes here through [`super::MinimalEndpoint::map_endpoint`].
/// Paths are relative to [`RouteGroup::base_path`]; registering a second method
/// on an existing path merges it into the existing method router.
pub struct RouteGroup<S> {
    group_name: String,
    prefix: String,
    version: ApiVersion,
    routes: BTreeMap<String, MethodRouter<S>>,
}

impl<S> RouteGroup<S>
where
    S: Clone + Send + Sync + 'static,
{
    pub fn new(group_name: impl Into<String>, prefix: &str, version: ApiVersion) -> Self {
        Self {
            group_name: group_name.into(),
            prefix: normalize_prefix(prefix),
            version,
            routes: BTreeMap::new(),
        }
    }

    pub fn group_name(&self) -> &str {
        &self.group_name
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn version(&self) -> ApiVersion {
        self.version
    }

    /// Absolute path of the group, e.g. `/api/v1/catalogs/products`
    pub fn base_path(&self) -> String {
        format!("{}/{}{}", API_ROOT, self.version.url_segment(), self.prefix)
    }

    pub fn route(&mut self, path: &str, method_router: MethodRouter<S>) -> &mut Self {
        let path = normalize_path(path);
        let merged = match self.routes.remove(&path) {
            Some(existing) => existing.merge(method_router),
            None => method_router,
        };
        self.routes.insert(path, merged);
        self
    }

    /// Absolute paths of every route registered so far
    pub fn paths(&self) -> Vec<String> {
        self.routes.keys().map(|path| self.full_path(path)).collect()
    }

    fn full_path(&self, path: &str) -> String {
        if path == "/" {
            self.base_path()
        } else {
            format!("{}{}", self.base_path(), path)
        }
    }

    pub(crate) fn into_routes(self) -> Vec<(String, MethodRouter<S>)> {
        let base = self.base_path();
        self.routes
            .into_iter()
            .map(|(path, router)| {
                let full = if path == "/" {
                    base.clone()
                } else {
                    format!("{base}{path}")
                };
                (full, router)
            })
            .collect()
    }
}

/// `catalogs/products/` -> `/catalogs/products`, blank -> ``
pub(super) fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}

fn normalize_path(path: &str) -> String {
    let trimmed = path.trim();
    let trimmed = trimmed.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}
