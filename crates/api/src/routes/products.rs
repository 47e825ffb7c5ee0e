//! Product route handlers.

use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
};
use serde::Serialize;

use repurpose_core::ProductId;

use super::{ApiResponse, respond};
use crate::db::products::ProductRepository;
use crate::error::{AppError, Result};
use crate::models::{NewProduct, Product};
use crate::state::AppState;

/// Data returned by a successful product creation.
#[derive(Debug, Serialize)]
pub struct CreatedProduct {
    #[serde(rename = "insertedId")]
    pub inserted_id: ProductId,
    pub product: Product,
}

/// Data returned by the product listing.
#[derive(Debug, Serialize)]
pub struct ProductList {
    pub products: Vec<Product>,
}

/// Data returned by a product lookup.
#[derive(Debug, Serialize)]
pub struct ProductBody {
    pub product: Product,
}

/// Create a product.
pub async fn create(
    State(state): State<AppState>,
    payload: std::result::Result<Json<NewProduct>, JsonRejection>,
) -> Result<ApiResponse<CreatedProduct>> {
    let Json(new_product) = payload?;

    let product = ProductRepository::new(state.gateway())
        .create(new_product)
        .await?;
    tracing::info!(product_id = %product.id, "Product created");

    Ok(respond(
        StatusCode::CREATED,
        "Created Product successfully",
        CreatedProduct {
            inserted_id: product.id,
            product,
        },
    ))
}

/// List every product. An empty catalogue is a 200 with an empty list.
pub async fn index(State(state): State<AppState>) -> Result<ApiResponse<ProductList>> {
    let products = ProductRepository::new(state.gateway()).list().await?;

    Ok(respond(
        StatusCode::OK,
        "Got all Products",
        ProductList { products },
    ))
}

/// Get one product by id.
///
/// A malformed id is rejected before the store is queried.
pub async fn show(
    State(state): State<AppState>,
    path: std::result::Result<Path<String>, PathRejection>,
) -> Result<ApiResponse<ProductBody>> {
    let Path(id) = path?;
    let id = ProductId::parse(&id)?;

    let product = ProductRepository::new(state.gateway())
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("no product with id {id}")))?;

    Ok(respond(
        StatusCode::OK,
        "Here is your product details",
        ProductBody { product },
    ))
}
