use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::{
    db::{models::Product, DbClient},
    errors::ApiError,
    services::DataSeeder,
    Result,
};

/// Reference products inserted into an empty catalog
pub fn sample_products() -> Vec<Product> {
    [
        ("Desk Lamp", "Adjustable LED desk lamp", 34.99),
        ("Ergonomic Chair", "Mesh office chair with lumbar support", 249.0),
        ("Standing Desk", "Electric height-adjustable desk", 499.0),
        ("Mechanical Keyboard", "Tenkeyless keyboard with brown switches", 89.5),
        ("Monitor Arm", "Single arm mount for 17-32 inch displays", 59.0),
    ]
    .into_iter()
    .map(|(name, description, price)| Product::new(name, Some(description.to_string()), price))
    .collect()
}

pub struct ProductSeeder {
    db: DbClient,
}

impl ProductSeeder {
    pub fn new(db: DbClient) -> Self {
        Self { db }
    }
}

#[async_trait]
impl DataSeeder for ProductSeeder {
    fn order(&self) -> i32 {
        1
    }

    async fn seed_all(&self, cancel: &CancellationToken) -> Result<()> {
        let existing = self.db.count_products().await?;
        if existing > 0 {
            info!("Catalog already holds {} products, nothing to seed", existing);
            return Ok(());
        }

        if cancel.is_cancelled() {
            return Err(ApiError::Cancelled("product seeding".to_string()));
        }

        let inserted = self.db.insert_products(&sample_products()).await?;
        info!("Seeded {} products", inserted);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_sample_products_are_distinct() {
        let products = sample_products();
        let names: HashSet<&str> = products.iter().map(|p| p.name.as_str()).collect();
        let ids: HashSet<&str> = products.iter().map(|p| p.id.as_str()).collect();

        assert_eq!(names.len(), products.len());
        assert_eq!(ids.len(), products.len());
        assert!(products.iter().all(|p| p.price > 0.0));
    }

    #[tokio::test]
    async fn test_unreachable_database_fails_seeding() {
        let db = crate::catalogs::products::features::test_support::unreachable_client();
        let seeder = ProductSeeder::new(db);

        assert_eq!(seeder.order(), 1);
        assert_eq!(seeder.name(), "ProductSeeder");
        assert!(seeder.seed_all(&CancellationToken::new()).await.is_err());
    }

    #[tokio::test]
    #[ignore = "requires TEST_DATABASE_URL and TEST_REDIS_URL"]
    async fn test_seeding_is_idempotent() {
        dotenv::dotenv().ok();
        let db_url = std::env::var("TEST_DATABASE_URL").unwrap();
        let redis_url = std::env::var("TEST_REDIS_URL").unwrap();
        let db = DbClient::new(&db_url, &redis_url, 4).unwrap();
        let seeder = ProductSeeder::new(db.clone());

        seeder.seed_all(&CancellationToken::new()).await.unwrap();
        let after_first = db.count_products().await.unwrap();
        seeder.seed_all(&CancellationToken::new()).await.unwrap();

        assert_eq!(db.count_products().await.unwrap(), after_first);
    }
}
