pub mod features;
pub mod seeder;

use crate::api::minimal::ApiVersion;

pub const PRODUCTS_GROUP: &str = "products";
pub const PRODUCTS_PREFIX: &str = "/catalogs/products";
pub const PRODUCTS_VERSION: ApiVersion = ApiVersion::major(1);
