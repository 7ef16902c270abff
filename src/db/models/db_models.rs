use crate::schema::products;
use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use super::CreateProductRequest;

#[derive(
    Clone, Debug, Serialize, Deserialize, Insertable, Identifiable, Queryable, AsChangeset,
)]
#[diesel(table_name = products, primary_key(id))]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub created_at: NaiveDateTime,
}

impl Product {
    pub fn new(name: impl Into<String>, description: Option<String>, price: f64) -> Self {
        Product {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            description,
            price,
            created_at: Utc::now().naive_utc(),
        }
    }
}

impl<'a> From<&'a CreateProductRequest> for Product {
    fn from(request: &'a CreateProductRequest) -> Self {
        Product::new(
            request.name.trim(),
            request
                .description
                .as_deref()
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(str::to_string),
            request.price,
        )
    }
}
