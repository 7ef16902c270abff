//! Catalogs module: the product slice and everything it registers.

pub mod products;

use crate::{
    container::{endpoint, seeder, ApplicationPart, EndpointFactory, SeederFactory},
    db::DbClient,
};
use products::{
    features::{CreateProductEndpoint, GetProductByIdEndpoint, GetProductsEndpoint},
    seeder::ProductSeeder,
};

pub struct CatalogsPart;

impl ApplicationPart<DbClient> for CatalogsPart {
    fn name(&self) -> &str {
        "catalogs"
    }

    fn endpoints(&self) -> Vec<EndpointFactory<DbClient>> {
        vec![
            endpoint::<DbClient, CreateProductEndpoint>(),
            endpoint::<DbClient, GetProductByIdEndpoint>(),
            endpoint::<DbClient, GetProductsEndpoint>(),
        ]
    }

    fn seeders(&self) -> Vec<SeederFactory<DbClient>> {
        vec![seeder(|db: &DbClient| ProductSeeder::new(db.clone()))]
    }
}
