//! Users CRUD endpoints
//!
//! Backed by the `users` table. Ids are server-assigned UUIDv4 values
//! written into the table's unique `id` column; path parameters must be
//! valid UUIDs before the store is consulted.

use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use uuid::Uuid;

use crate::router::{Router, RouterError};
use crate::store::{ColumnSpec, MemoryStore, Row, SchemaError, WhereClause, ALL_COLUMNS};

use super::errors::ApiError;
use super::server::{handler, Handler, RequestContext};

/// Table backing the users resource
pub const USERS_TABLE: &str = "users";

/// Column definitions for the users table
pub fn users_table_columns() -> Vec<ColumnSpec> {
    vec![
        ColumnSpec::new("id", "STRING", &["REQUIRED", "UNIQUE"]),
        ColumnSpec::new("username", "STRING", &["REQUIRED"]),
        ColumnSpec::new("age", "NUMBER", &["REQUIRED"]),
        ColumnSpec::new("hobbies", "ARRAY_OF_STRINGS", &["REQUIRED"]),
    ]
}

/// Creates the users table (idempotent)
pub async fn create_users_table(store: &MemoryStore) -> Result<(), SchemaError> {
    store.create_table(USERS_TABLE, &users_table_columns()).await
}

/// Registers the users endpoints on the route table
pub fn register_users_routes(router: &mut Router<Handler>) -> Result<(), RouterError> {
    router.register("GET", "/api/users", handler(list_users))?;
    router.register("GET", "/api/users/:id", handler(get_user))?;
    router.register("POST", "/api/users", handler(create_user))?;
    router.register("PUT", "/api/users/:id", handler(update_user))?;
    router.register("DELETE", "/api/users/:id", handler(delete_user))?;
    Ok(())
}

// ==================
// Handlers
// ==================

/// GET /api/users
async fn list_users(ctx: RequestContext) -> Response {
    match ctx.store.select(USERS_TABLE, ALL_COLUMNS, None).await {
        Ok(users) => (StatusCode::OK, Json(users)).into_response(),
        Err(err) => ApiError::from(err).into_response(),
    }
}

/// GET /api/users/:id
async fn get_user(ctx: RequestContext) -> Response {
    let id = match bound_id(&ctx) {
        Ok(id) => id,
        Err(err) => return err.into_response(),
    };
    match find_user(&ctx.store, &id).await {
        Ok(Some(user)) => (StatusCode::OK, Json(user)).into_response(),
        Ok(None) => ApiError::UserNotFound(id).into_response(),
        Err(err) => err.into_response(),
    }
}

/// POST /api/users
async fn create_user(ctx: RequestContext) -> Response {
    let payload = match parse_body(&ctx) {
        Ok(payload) => payload,
        Err(err) => return err.into_response(),
    };

    let mut row = Row::new();
    row.insert("id".to_string(), json!(Uuid::new_v4().to_string()));
    row.extend(payload);

    match ctx.store.insert(USERS_TABLE, row).await {
        Ok(user) => (StatusCode::CREATED, Json(user)).into_response(),
        Err(err) => ApiError::from(err).into_response(),
    }
}

/// PUT /api/users/:id
async fn update_user(ctx: RequestContext) -> Response {
    let id = match bound_id(&ctx) {
        Ok(id) => id,
        Err(err) => return err.into_response(),
    };
    match find_user(&ctx.store, &id).await {
        Ok(Some(_)) => {}
        Ok(None) => return ApiError::UserNotFound(id).into_response(),
        Err(err) => return err.into_response(),
    }
    let patch = match parse_body(&ctx) {
        Ok(patch) => patch,
        Err(err) => return err.into_response(),
    };

    let clauses = [WhereClause::equal("id", json!(id))];
    match ctx.store.update(USERS_TABLE, &patch, &clauses).await {
        Ok(Some(user)) => (StatusCode::OK, Json(user)).into_response(),
        Ok(None) => ApiError::UserNotFound(id).into_response(),
        Err(err) => ApiError::from(err).into_response(),
    }
}

/// DELETE /api/users/:id
async fn delete_user(ctx: RequestContext) -> Response {
    let id = match bound_id(&ctx) {
        Ok(id) => id,
        Err(err) => return err.into_response(),
    };
    match find_user(&ctx.store, &id).await {
        Ok(Some(_)) => {}
        Ok(None) => return ApiError::UserNotFound(id).into_response(),
        Err(err) => return err.into_response(),
    }

    let clauses = [WhereClause::equal("id", json!(id))];
    match ctx.store.remove(USERS_TABLE, &clauses).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => ApiError::from(err).into_response(),
    }
}

// ==================
// Helpers
// ==================

/// Extracts the bound `:id` and insists it is a UUID
fn bound_id(ctx: &RequestContext) -> Result<String, ApiError> {
    let value = ctx
        .binding
        .as_ref()
        .map(|binding| binding.value.clone())
        .unwrap_or_default();
    if Uuid::parse_str(&value).is_err() {
        return Err(ApiError::InvalidId(value));
    }
    Ok(value)
}

/// Parses the request body as a JSON object
fn parse_body(ctx: &RequestContext) -> Result<Row, ApiError> {
    serde_json::from_slice::<Row>(&ctx.body).map_err(|err| ApiError::InvalidBody(err.to_string()))
}

/// First row with the given id, if any
async fn find_user(store: &Arc<MemoryStore>, id: &str) -> Result<Option<Row>, ApiError> {
    let clauses = [WhereClause::equal("id", json!(id))];
    let mut users = store.select(USERS_TABLE, ALL_COLUMNS, Some(&clauses)).await?;
    if users.is_empty() {
        Ok(None)
    } else {
        Ok(Some(users.remove(0)))
    }
}
