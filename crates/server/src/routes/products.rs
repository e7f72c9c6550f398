use axum::{extract::{Path, Query, State}, http::StatusCode, Json};
use serde::Deserialize;
use service::products::Product;
use tracing::{debug, info};
use utoipa::IntoParams;

use crate::{errors::JsonApiError, routes::AppState};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// Return only the first `limit` products; absent, empty or 0 returns all.
    #[param(value_type = Option<usize>)]
    pub limit: Option<String>,
}

impl ListQuery {
    /// Empty means "no limit"; anything else must be a non-negative integer.
    fn parsed_limit(&self) -> Result<Option<usize>, JsonApiError> {
        match self.limit.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => raw.parse::<usize>().map(Some).map_err(|_| {
                JsonApiError::new(StatusCode::BAD_REQUEST, "Invalid Query", Some(format!("limit `{}` is not a non-negative integer", raw)))
            }),
        }
    }
}

/// Leading decimal digits of `raw` after optional whitespace, so `1abc` and
/// `1.5` both name product 1. `None` when there are no leading digits, the
/// value is negative, or it does not fit an id.
fn leading_id(raw: &str) -> Option<u64> {
    let rest = raw.trim_start();
    let rest = rest.strip_prefix('+').unwrap_or(rest);
    let end = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
    rest[..end].parse::<u64>().ok()
}

#[utoipa::path(
    get, path = "/products", tag = "products",
    params(ListQuery),
    responses(
        (status = 200, description = "Products in creation order", body = [crate::openapi::ProductDoc]),
        (status = 400, description = "Malformed limit", body = crate::openapi::ErrorDoc),
        (status = 500, description = "List Failed", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn list(State(state): State<AppState>, Query(q): Query<ListQuery>) -> Result<Json<Vec<Product>>, JsonApiError> {
    let limit = q.parsed_limit()?;
    match state.products.get_products(limit).await {
        Ok(list) => { info!(count = list.len(), limit = ?limit, "list products"); Ok(Json(list)) }
        Err(e) => Err(JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "List Failed", Some(e.to_string()))),
    }
}

#[utoipa::path(
    get, path = "/products/{id}", tag = "products",
    params(("id" = u64, Path, description = "Product id")),
    responses(
        (status = 200, description = "Found", body = crate::openapi::ProductDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn get(State(state): State<AppState>, Path(raw_id): Path<String>) -> Result<Json<Product>, JsonApiError> {
    let id = leading_id(&raw_id).ok_or_else(|| {
        debug!(%raw_id, "product id has no leading digits");
        JsonApiError::not_found(format!("product {} not found", raw_id))
    })?;
    let product = state.products.get_product_by_id(id).await?;
    Ok(Json(product))
}
