use redis::AsyncCommands;
use serde::de::DeserializeOwned;
use std::{future::Future, time::Duration};

use super::DbClient;
use crate::{cache::CacheQuery, Result};

impl DbClient {
    pub async fn set_cache_with_expiry(&self, key: &str, value: &str, ttl: Duration) -> Result<()> {
        let mut redis_conn = self.get_async_redis_conn().await.map_err(|err| {
            tracing::error!("Redis connection error: {}", err);
            err
        })?;

        redis_conn
            .set_ex::<_, _, ()>(key, value, expiry_seconds(ttl))
            .await
            .map_err(|err| {
                tracing::error!("Redis SET failed: {}", err);
                err
            })?;
        tracing::debug!("Cache set for key: {}", key);
        Ok(())
    }

    pub async fn get_cache(&self, key: &str) -> Result<Option<String>> {
        let mut redis_conn = self.get_async_redis_conn().await.map_err(|err| {
            tracing::error!("Redis connection error: {}", err);
            err
        })?;

        let value: Option<String> = redis_conn.get(key).await.map_err(|err| {
            tracing::error!("Redis GET failed: {}", err);
            err
        })?;
        Ok(value)
    }

    /// Reads the response for `request` through the cache.
    ///
    /// A hit is returned as is. On a miss, `fetch` runs and its result is stored
    /// under the query's key with the query's expiration. Cache failures count
    /// as misses; errors from `fetch` propagate.
    pub async fn cached_query<Q, F, Fut>(
        &self,
        query: &Q,
        request: &Q::Request,
        fetch: F,
    ) -> Result<Q::Response>
    where
        Q: CacheQuery,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Q::Response>>,
    {
        let key = query.cache_key(request);

        match self.get_cache(&key).await {
            Ok(cached) => {
                if let Some(response) = decode_cached::<Q::Response>(&key, cached) {
                    tracing::info!("Cache hit for key: {}", key);
                    return Ok(response);
                }
            }
            Err(err) => tracing::warn!("Cache read failed for key {}: {}", key, err),
        }

        let response = fetch().await?;

        match serde_json::to_string(&response) {
            Ok(json) => {
                if let Err(err) = self
                    .set_cache_with_expiry(&key, &json, query.absolute_expiration_relative_to_now())
                    .await
                {
                    tracing::warn!("Cache write failed for key {}: {}", key, err);
                }
            }
            Err(err) => tracing::warn!("Failed to serialize response for key {}: {}", key, err),
        }

        Ok(response)
    }
}

/// Redis rejects a zero expiry, so sub-second durations round up to one second
fn expiry_seconds(ttl: Duration) -> u64 {
    ttl.as_secs().max(1)
}

fn decode_cached<T: DeserializeOwned>(key: &str, cached: Option<String>) -> Option<T> {
    let cached = cached?;
    match serde_json::from_str(&cached) {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::warn!("Discarding unreadable cache entry {}: {}", key, err);
            None
        }
    }
}
