use axum::{extract::State, routing::get, Json};

use crate::{
    api::{
        minimal::{ApiVersion, MinimalEndpoint, RouteGroup},
        query::{ParameterPick, QueryCollection},
    },
    catalogs::products::{PRODUCTS_GROUP, PRODUCTS_PREFIX, PRODUCTS_VERSION},
    db::{
        models::{GetProductsRequest, GetProductsResponse, ProductDto, DEFAULT_PAGE_SIZE},
        DbClient,
    },
    Result,
};

#[derive(Default)]
pub struct GetProductsEndpoint;

impl MinimalEndpoint<DbClient> for GetProductsEndpoint {
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
        group.route("/", get(get_products));
    }
}

/// `?page=2&page_size=20&ids=a&ids=["b","c"]`
pub(crate) fn products_request(query: &QueryCollection) -> GetProductsRequest {
    GetProductsRequest::new(
        query.get::<i64>("page", 1, ParameterPick::First),
        query.get::<i64>("page_size", DEFAULT_PAGE_SIZE, ParameterPick::Last),
        query.get_collection::<String>("ids", Vec::new()),
    )
}

/// Handler for listing products
///
/// # Endpoint: GET /api/v1/catalogs/products
pub(crate) async fn get_products(
    State(db): State<DbClient>,
    query: QueryCollection,
) -> Result<Json<GetProductsResponse>> {
    let request = products_request(&query);
    let (items, total) = db.get_products_page(&request).await?;

    Ok(Json(GetProductsResponse {
        items: items.into_iter().map(ProductDto::from).collect(),
        page: request.page,
        page_size: request.page_size,
        total,
    }))
}
