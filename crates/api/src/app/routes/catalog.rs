//! Reference data: categories, locations and users.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, Path},
    routing::get,
    Json, Router,
};

use stockledger_core::{CategoryId, LocationId, UserId};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/categories", get(list_categories).post(create_category))
        .route("/categories/:id", get(get_category))
        .route("/location", get(list_locations).post(create_location))
        .route("/location/:id", get(get_location))
        .route("/users", get(list_users).post(register_user))
        .route("/users/:id", get(get_user))
}

pub async fn create_category(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::CreateCategoryRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return errors::json_rejection_to_response(rejection),
    };

    match services.run(move |s| s.catalog.create_category(body.into())).await {
        Ok(category) => dto::json_ok("category created", category),
        Err(e) => errors::ledger_error_to_response(e, "add category"),
    }
}

pub async fn list_categories(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.run(|s| s.catalog.list_categories()).await {
        Ok(categories) => dto::json_ok("categories fetched", categories),
        Err(e) => errors::ledger_error_to_response(e, "fetch categories"),
    }
}

pub async fn get_category(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let category_id: CategoryId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::invalid_id("category"),
    };

    match services.run(move |s| s.catalog.get_category(category_id)).await {
        Ok(category) => dto::json_ok("category fetched", category),
        Err(e) => errors::ledger_error_to_response(e, "fetch category"),
    }
}

pub async fn create_location(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::CreateLocationRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return errors::json_rejection_to_response(rejection),
    };

    match services.run(move |s| s.catalog.create_location(body.into())).await {
        Ok(location) => dto::json_ok("location created", location),
        Err(e) => errors::ledger_error_to_response(e, "add location"),
    }
}

pub async fn list_locations(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.run(|s| s.catalog.list_locations()).await {
        Ok(locations) => dto::json_ok("locations fetched", locations),
        Err(e) => errors::ledger_error_to_response(e, "fetch locations"),
    }
}

pub async fn get_location(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let location_id: LocationId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::invalid_id("location"),
    };

    match services.run(move |s| s.catalog.get_location(location_id)).await {
        Ok(location) => dto::json_ok("location fetched", location),
        Err(e) => errors::ledger_error_to_response(e, "fetch location"),
    }
}

pub async fn register_user(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::RegisterUserRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return errors::json_rejection_to_response(rejection),
    };

    match services.run(move |s| s.catalog.register_user(body.into())).await {
        Ok(user) => dto::json_ok("user registered", user),
        Err(e) => errors::ledger_error_to_response(e, "register user"),
    }
}

pub async fn list_users(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.run(|s| s.catalog.list_users()).await {
        Ok(users) => dto::json_ok("users fetched", users),
        Err(e) => errors::ledger_error_to_response(e, "fetch users"),
    }
}

pub async fn get_user(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let user_id: UserId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::invalid_id("user"),
    };

    match services.run(move |s| s.catalog.get_user(user_id)).await {
        Ok(user) => dto::json_ok("user fetched", user),
        Err(e) => errors::ledger_error_to_response(e, "fetch user"),
    }
}
