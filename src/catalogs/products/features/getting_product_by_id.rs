use axum::{
    extract::{Path, State},
    routing::get,
    Json,
};
use std::time::Duration;

use crate::{
    api::minimal::{ApiVersion, MinimalEndpoint, RouteGroup},
    cache::CacheQuery,
    catalogs::products::{PRODUCTS_GROUP, PRODUCTS_PREFIX, PRODUCTS_VERSION},
    db::{
        models::{GetProductByIdRequest, ProductDto},
        DbClient,
    },
    Result,
};

/// Products change rarely; one cache slot per product id
pub struct GetProductByIdCache;

impl CacheQuery for GetProductByIdCache {
    type Request = GetProductByIdRequest;
    type Response = ProductDto;

    fn absolute_expiration_relative_to_now(&self) -> Duration {
        Duration::from_secs(10 * 60)
    }

    fn cache_key(&self, request: &GetProductByIdRequest) -> String {
        format!("{}GetProductById_{}", self.prefix(), request.id)
    }
}

#[derive(Default)]
pub struct GetProductByIdEndpoint;

impl MinimalEndpoint<DbClient> for GetProductByIdEndpoint {
    fn group_name(&self) -> &str {
        PRODUCTS_GROUP
    }

    fn prefix_route(&self) -> &str {
        PRODUCTS_PREFIX
    }

    fn version(&self) -> ApiVersion {
        PRODUCTS_VERSION
    }

    fn map_endpoint(&self, group: &mut RouteGroup<DbClient>) {
        group.route("/:id", get(get_product_by_id));
    }
}

/// Handler for retrieving one product
///
/// # Endpoint: GET /api/v1/catalogs/products/:id
pub(crate) async fn get_product_by_id(
    State(db): State<DbClient>,
    Path(id): Path<String>,
) -> Result<Json<ProductDto>> {
    let request = GetProductByIdRequest { id };
    let (client, product_id) = (&db, request.id.as_str());

    let product = db
        .cached_query(&GetProductByIdCache, &request, move || async move {
            client.get_product_by_id(product_id).await.map(ProductDto::from)
        })
        .await?;

    Ok(Json(product))
}

#[cfg(test)]
mod tests {
    use super::super::test_support::send;
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_cache_key_per_product() {
        let key = GetProductByIdCache.cache_key(&GetProductByIdRequest {
            id: "42".to_string(),
        });
        assert_eq!(key, "Ch_GetProductById_42");
        assert_eq!(
            GetProductByIdCache.absolute_expiration_relative_to_now(),
            Duration::from_secs(600)
        );
    }

    #[tokio::test]
    async fn test_storage_failure_is_internal_error() {
        let (status, _) = send("GET", "/api/v1/catalogs/products/42", None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
