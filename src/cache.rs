use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;

pub const DEFAULT_CACHE_PREFIX: &str = "Ch_";
pub const DEFAULT_EXPIRATION: Duration = Duration::from_secs(5 * 60);

/// Declarative caching policy for one query type.
///
/// The default key is the prefix followed by the request's type name, so every
/// request of the same type shares one cache slot. Queries whose result depends
/// on request fields must override [`CacheQuery::cache_key`].
pub trait CacheQuery: Send + Sync {
    type Request;
    type Response: Serialize + DeserializeOwned + Send;

    fn prefix(&self) -> &str {
        DEFAULT_CACHE_PREFIX
    }

    fn absolute_expiration_relative_to_now(&self) -> Duration {
        DEFAULT_EXPIRATION
    }

    fn cache_key(&self, _request: &Self::Request) -> String {
        format!("{}{}", self.prefix(), short_type_name::<Self::Request>())
    }
}

/// Type name without its module path, e.g. `GetProducts` for
/// `crate::catalogs::products::GetProducts`
pub fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}
