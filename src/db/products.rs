use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::{ExpressionMethods, OptionalExtension, QueryDsl};
use diesel_async::RunQueryDsl;
use tracing::{error, info};

use crate::{
    db::{
        models::{GetProductsRequest, Product},
        DbClient,
    },
    errors::ApiError,
    Result,
};

/// DbClient helper functions for the products table
impl DbClient {
    pub async fn insert_product(&self, product: &Product) -> Result<usize> {
        use crate::schema::products::dsl::*;

        let conn = &mut self.get_db_conn().await?;
        diesel::insert_into(products)
            .values(product)
            .execute(conn)
            .await
            .map_err(|e| insert_error(product, e))
    }

    /// Inserts the rows, skipping any that conflict with existing ones
    pub async fn insert_products(&self, rows: &[Product]) -> Result<usize> {
        use crate::schema::products::dsl::*;

        if rows.is_empty() {
            return Ok(0);
        }

        let conn = &mut self.get_db_conn().await?;
        diesel::insert_into(products)
            .values(rows)
            .on_conflict_do_nothing()
            .execute(conn)
            .await
            .map_err(Into::into)
    }

    pub async fn count_products(&self) -> Result<i64> {
        use crate::schema::products::dsl::*;

        let conn = &mut self.get_db_conn().await?;
        products
            .count()
            .get_result::<i64>(conn)
            .await
            .map_err(Into::into)
    }

    pub async fn get_product_by_id(&self, product_id: &str) -> Result<Product> {
        use crate::schema::products::dsl::*;

        let conn = &mut self.get_db_conn().await?;
        products
            .filter(id.eq(product_id))
            .first::<Product>(conn)
            .await
            .optional()?
            .ok_or_else(|| ApiError::NotFound(format!("product {product_id}")))
    }

    /// Returns one page of products, newest first, and the total matching count
    pub async fn get_products_page(&self, request: &GetProductsRequest) -> Result<(Vec<Product>, i64)> {
        use crate::schema::products::dsl::*;

        let conn = &mut self.get_db_conn().await?;

        let mut page_query = products.into_boxed();
        let mut count_query = products.into_boxed();
        if !request.ids.is_empty() {
            page_query = page_query.filter(id.eq_any(request.ids.clone()));
            count_query = count_query.filter(id.eq_any(request.ids.clone()));
        }

        let total = count_query.count().get_result::<i64>(conn).await?;

        let items = page_query
            .order_by(created_at.desc())
            .then_order_by(id.asc())
            .limit(request.page_size)
            .offset(request.offset())
            .load::<Product>(conn)
            .await?;

        info!(
            "Loaded {} of {} products (page {}, size {})",
            items.len(),
            total,
            request.page,
            request.page_size
        );
        Ok((items, total))
    }
}

/// Product names are unique; a clash is the caller's mistake, not a server fault
fn insert_error(product: &Product, err: DieselError) -> ApiError {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            ApiError::Validation(format!("A product named '{}' already exists", product.name))
        }
        err => {
            error!("Failed to insert product {}: {}", product.id, err);
            err.into()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_unique_violation_is_validation_error() {
        let product = Product::new("Desk Lamp", None, 10.0);
        let err = DieselError::DatabaseError(
            DatabaseErrorKind::UniqueViolation,
            Box::new("duplicate key value violates unique constraint".to_string()),
        );

        let api_error = insert_error(&product, err);

        assert!(matches!(api_error, ApiError::Validation(_)));
        assert_eq!(api_error.status_code(), StatusCode::BAD_REQUEST);
        assert!(api_error.to_string().contains("Desk Lamp"));
    }

    #[test]
    fn test_other_insert_failures_stay_internal() {
        let product = Product::new("Desk Lamp", None, 10.0);

        let api_error = insert_error(&product, DieselError::NotFound);

        assert!(matches!(api_error, ApiError::Diesel(_)));
        assert_eq!(api_error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    fn test_client() -> DbClient {
        dotenv::dotenv().ok();
        let db_url = std::env::var("TEST_DATABASE_URL").unwrap();
        let redis_url = std::env::var("TEST_REDIS_URL").unwrap();
        DbClient::new(&db_url, &redis_url, 4).unwrap()
    }

    #[tokio::test]
    #[ignore = "requires TEST_DATABASE_URL and TEST_REDIS_URL"]
    async fn test_insert_and_get_product() {
        let client = test_client();
        let product = Product::new(format!("Integration Lamp {}", uuid::Uuid::new_v4()), None, 12.0);

        assert_eq!(client.insert_product(&product).await.unwrap(), 1);

        let stored = client.get_product_by_id(&product.id).await.unwrap();
        assert_eq!(stored.name, product.name);

        let missing = client.get_product_by_id("missing").await;
        assert!(matches!(missing, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    #[ignore = "requires TEST_DATABASE_URL and TEST_REDIS_URL"]
    async fn test_duplicate_name_is_rejected() {
        let client = test_client();
        let name = format!("Duplicate Shelf {}", uuid::Uuid::new_v4());

        client.insert_product(&Product::new(name.clone(), None, 5.0)).await.unwrap();
        let second = client.insert_product(&Product::new(name, None, 6.0)).await;

        assert!(matches!(second, Err(ApiError::Validation(_))));
    }

    #[tokio::test]
    #[ignore = "requires TEST_DATABASE_URL and TEST_REDIS_URL"]
    async fn test_get_products_page_filters_ids() {
        let client = test_client();
        let suffix = uuid::Uuid::new_v4();
        let first = Product::new(format!("Paged Chair {suffix}"), None, 40.0);
        let second = Product::new(format!("Paged Table {suffix}"), None, 90.0);
        client.insert_products(&[first.clone(), second]).await.unwrap();

        let request = GetProductsRequest::new(1, 10, vec![first.id.clone()]);
        let (items, total) = client.get_products_page(&request).await.unwrap();

        assert_eq!(total, 1);
        assert_eq!(items[0].id, first.id);
    }
}
