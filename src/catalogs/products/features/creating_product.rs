use axum::{extract::State, http::StatusCode, routing::post, Json};
use tracing::info;

use crate::{
    api::minimal::{ApiVersion, MinimalEndpoint, RouteGroup},
    catalogs::products::{PRODUCTS_GROUP, PRODUCTS_PREFIX, PRODUCTS_VERSION},
    db::{
        models::{CreateProductRequest, CreateProductResponse, Product},
        DbClient,
    },
    errors::ApiError,
    Result,
};

#[derive(Default)]
pub struct CreateProductEndpoint;

impl MinimalEndpoint<DbClient> for CreateProductEndpoint {
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
        group.route("/", post(create_product));
    }
}

/// Handler for creating a product
///
/// # Endpoint: POST /api/v1/catalogs/products
///
/// # Returns
/// * `201` with the id of the new product
/// * `400` when the name is blank or the price is negative
pub(crate) async fn create_product(
    State(db): State<DbClient>,
    Json(request): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<CreateProductResponse>)> {
    request.validate().map_err(ApiError::Validation)?;

    let product = Product::from(&request);
    db.insert_product(&product).await?;

    info!("Created product {} ({})", product.id, product.name);
    Ok((
        StatusCode::CREATED,
        Json(CreateProductResponse { id: product.id }),
    ))
}

#[cfg(test)]
mod tests {
    use super::super::test_support::send;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_blank_name_is_rejected() {
        let (status, body) = send(
            "POST",
            "/api/v1/catalogs/products",
            Some(r#"{"name":"  ","price":3.5}"#),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains("Product name cannot be empty"));
    }

    #[tokio::test]
    async fn test_negative_price_is_rejected() {
        let (status, body) = send(
            "POST",
            "/api/v1/catalogs/products",
            Some(r#"{"name":"Desk Lamp","price":-1}"#),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains(r#""status":"error""#));
    }

    #[tokio::test]
    async fn test_database_failure_is_internal_error() {
        let (status, body) = send(
            "POST",
            "/api/v1/catalogs/products",
            Some(r#"{"name":"Desk Lamp","price":12}"#),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!body.contains("127.0.0.1"));
    }
}
