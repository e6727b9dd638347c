use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, Path},
    routing::get,
    Json, Router,
};

use stockledger_core::ItemId;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/items", get(list_items).post(create_item))
        .route("/items/:id", get(get_item).put(update_item))
        .route("/items/:id/reconcile", get(reconcile_item))
}

pub async fn create_item(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::CreateItemRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return errors::json_rejection_to_response(rejection),
    };

    match services.run(move |s| s.catalog.create_item(body.into())).await {
        Ok(item) => dto::json_ok("item created", item),
        Err(e) => errors::ledger_error_to_response(e, "add item"),
    }
}

pub async fn update_item(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Result<Json<dto::UpdateItemRequest>, JsonRejection>,
) -> axum::response::Response {
    let item_id: ItemId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::invalid_id("item"),
    };
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return errors::json_rejection_to_response(rejection),
    };

    match services
        .run(move |s| s.catalog.update_item(item_id, body.into()))
        .await
    {
        Ok(item) => dto::json_ok("item updated", item),
        Err(e) => errors::ledger_error_to_response(e, "update item"),
    }
}

pub async fn get_item(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let item_id: ItemId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::invalid_id("item"),
    };

    match services.run(move |s| s.catalog.get_item(item_id)).await {
        Ok(item) => dto::json_ok("item fetched", item),
        Err(e) => errors::ledger_error_to_response(e, "fetch item"),
    }
}

pub async fn list_items(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.run(|s| s.catalog.list_items()).await {
        Ok(items) => dto::json_ok("items fetched", items),
        Err(e) => errors::ledger_error_to_response(e, "fetch items"),
    }
}

/// Compare an item's cached stock with the sum of its ledger.
pub async fn reconcile_item(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let item_id: ItemId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::invalid_id("item"),
    };

    match services.run(move |s| s.ledger.reconcile(item_id)).await {
        Ok(report) => dto::json_ok("item reconciled", report),
        Err(e) => errors::ledger_error_to_response(e, "reconcile item"),
    }
}
