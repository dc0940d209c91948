//! Property API Handlers

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use serde_json::json;
use shared::error::{ApiResponse, AppError, ErrorCode};
use shared::models::{Property, PropertyCreate, PropertyUpdate};
use shared::util::now_millis;

use crate::api::{ApiResult, ValidatedJson, audit, verify_property};
use crate::auth::CurrentUser;
use crate::db;
use crate::license::LicenseSnapshot;
use crate::state::AppState;

/// GET /api/properties
pub async fn list(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> ApiResult<Vec<Property>> {
    Ok(Json(db::properties::list(&state.pool, current.account_id).await?))
}

/// GET /api/properties/{property_id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> ApiResult<Property> {
    Ok(Json(verify_property(&state, &current, id).await?))
}

/// POST /api/properties
pub async fn create(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Extension(license): Extension<LicenseSnapshot>,
    ValidatedJson(payload): ValidatedJson<PropertyCreate>,
) -> ApiResult<Property> {
    let property = db::properties::create(
        &state.pool,
        current.account_id,
        &payload,
        |used| license.check_property_quota(used),
        now_millis(),
    )
    .await?;

    tracing::info!(account_id = current.account_id, property_id = property.id, "Property created");
    audit(
        &state,
        &current,
        "property.created",
        json!({ "property_id": property.id, "name": property.name }),
    )
    .await;
    Ok(Json(property))
}

/// PUT /api/properties/{property_id}
pub async fn update(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<PropertyUpdate>,
) -> ApiResult<Property> {
    let property =
        db::properties::update(&state.pool, current.account_id, id, &payload, now_millis())
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::PropertyNotFound))?;
    Ok(Json(property))
}

/// DELETE /api/properties/{property_id}
pub async fn delete(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> ApiResult<ApiResponse<()>> {
    let property = verify_property(&state, &current, id).await?;
    if db::properties::has_active_reservations(&state.pool, id).await? {
        return Err(AppError::new(ErrorCode::PropertyHasReservations));
    }
    if !db::properties::delete(&state.pool, current.account_id, id).await? {
        return Err(AppError::new(ErrorCode::PropertyNotFound));
    }

    tracing::info!(account_id = current.account_id, property_id = id, "Property deleted");
    audit(
        &state,
        &current,
        "property.deleted",
        json!({ "property_id": id, "name": property.name }),
    )
    .await;
    Ok(Json(ApiResponse::ok()))
}
