use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Extension, Path, Query,
    },
    routing::get,
    Json, Router,
};

use stockledger_core::{ItemId, MutationId};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/mutations", get(list_mutations).post(create_mutation))
        .route(
            "/mutations/:id",
            get(get_mutation).put(update_mutation).delete(delete_mutation),
        )
}

pub async fn create_mutation(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::CreateMutationRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return errors::json_rejection_to_response(rejection),
    };

    match services
        .run(move |s| s.ledger.create_mutation(body.into()))
        .await
    {
        Ok(entry) => dto::json_ok(
            "mutation recorded",
            dto::LedgerEntryResponse::from(entry),
        ),
        Err(e) => errors::ledger_error_to_response(e, "add new mutation"),
    }
}

pub async fn update_mutation(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Result<Json<dto::UpdateMutationRequest>, JsonRejection>,
) -> axum::response::Response {
    let mutation_id: MutationId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::invalid_id("mutation"),
    };
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return errors::json_rejection_to_response(rejection),
    };
    let patch = match body.into_patch() {
        Ok(p) => p,
        Err(e) => return errors::ledger_error_to_response(e.into(), "update mutation"),
    };

    match services
        .run(move |s| s.ledger.update_mutation(mutation_id, patch))
        .await
    {
        Ok(entry) => dto::json_ok("mutation updated", dto::LedgerEntryResponse::from(entry)),
        Err(e) => errors::ledger_error_to_response(e, "update mutation"),
    }
}

pub async fn delete_mutation(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let mutation_id: MutationId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::invalid_id("mutation"),
    };

    match services
        .run(move |s| s.ledger.delete_mutation(mutation_id))
        .await
    {
        Ok(entry) => dto::json_ok("mutation deleted", dto::LedgerEntryResponse::from(entry)),
        Err(e) => errors::ledger_error_to_response(e, "delete mutation"),
    }
}

pub async fn get_mutation(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let mutation_id: MutationId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::invalid_id("mutation"),
    };

    match services.run(move |s| s.ledger.get_mutation(mutation_id)).await {
        Ok(mutation) => dto::json_ok("mutation fetched", mutation),
        Err(e) => errors::ledger_error_to_response(e, "fetch mutation"),
    }
}

pub async fn list_mutations(
    Extension(services): Extension<Arc<AppServices>>,
    query: Result<Query<dto::ListMutationsQuery>, QueryRejection>,
) -> axum::response::Response {
    let Query(query) = match query {
        Ok(q) => q,
        Err(rejection) => return errors::query_rejection_to_response(rejection),
    };
    let item_id = match query.item_id.as_deref().map(str::parse::<ItemId>).transpose() {
        Ok(v) => v,
        Err(_) => return errors::invalid_id("item"),
    };

    match services.run(move |s| s.ledger.list_mutations(item_id)).await {
        Ok(mutations) => dto::json_ok("mutations fetched", mutations),
        Err(e) => errors::ledger_error_to_response(e, "fetch mutations"),
    }
}
