//! Insight API Handlers

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use shared::error::{AppError, ErrorCode};
use shared::models::{
    ChurnRisk, DemandForecast, FEATURE_DEMAND_FORECASTING, FEATURE_DYNAMIC_PRICING,
    FEATURE_FRAUD_DETECTION, FEATURE_GUEST_CHURN, ForecastQuery, FraudAction, FraudAssessment,
    InsightStatus, PricingQuery, PricingRecommendation, percent,
};
use shared::util::today;

use crate::api::{ApiResult, verify_property};
use crate::auth::CurrentUser;
use crate::db;
use crate::insights;
use crate::license::LicenseSnapshot;
use crate::state::AppState;

/// GET /api/properties/{property_id}/insights/forecast?days=
pub async fn forecast(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Extension(license): Extension<LicenseSnapshot>,
    Path(property_id): Path<i64>,
    Query(query): Query<ForecastQuery>,
) -> ApiResult<DemandForecast> {
    license.require_feature(FEATURE_DEMAND_FORECASTING)?;
    verify_property(&state, &current, property_id).await?;
    let days = insights::forecast_days(query.days)?;

    let rooms_total =
        db::availability::sellable_rooms_in_property(&state.pool, property_id, None).await?;
    let nights =
        db::availability::nightly_bookings(&state.pool, property_id, today(), days as i32, None)
            .await?;

    Ok(Json(insights::build_forecast(property_id, rooms_total, nights)))
}

/// GET /api/properties/{property_id}/insights/pricing?room_type_id&date
pub async fn pricing(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Extension(license): Extension<LicenseSnapshot>,
    Path(property_id): Path<i64>,
    Query(query): Query<PricingQuery>,
) -> ApiResult<PricingRecommendation> {
    license.require_feature(FEATURE_DYNAMIC_PRICING)?;
    verify_property(&state, &current, property_id).await?;

    let room_type = db::room_types::find(&state.pool, property_id, query.room_type_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::RoomTypeNotFound))?;

    let total = db::availability::sellable_rooms(&state.pool, room_type.id).await?;
    let booked = db::availability::nightly_bookings(
        &state.pool,
        property_id,
        query.date,
        1,
        Some(room_type.id),
    )
    .await?
    .first()
    .map(|(_, booked)| *booked)
    .unwrap_or(0);

    let occupancy = percent(booked, total);
    let (recommended, change) = insights::recommend_rate(room_type.base_rate, occupancy);
    tracing::debug!(
        property_id,
        room_type_id = room_type.id,
        date = %query.date,
        occupancy,
        recommended = %recommended,
        "Rate recommendation"
    );

    Ok(Json(PricingRecommendation {
        room_type_id: room_type.id,
        date: query.date,
        current_rate: room_type.base_rate,
        recommended_rate: recommended,
        price_change_percent: change,
        occupancy_percent: occupancy,
    }))
}

/// GET /api/insights/status
pub async fn status(Extension(license): Extension<LicenseSnapshot>) -> ApiResult<InsightStatus> {
    Ok(Json(insights::insight_status(&license)))
}

/// GET /api/insights/guests/{guest_id}/churn
pub async fn churn(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Extension(license): Extension<LicenseSnapshot>,
    Path(guest_id): Path<i64>,
) -> ApiResult<ChurnRisk> {
    license.require_feature(FEATURE_GUEST_CHURN)?;
    db::guests::find(&state.pool, current.account_id, guest_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::GuestNotFound))?;

    let history = db::insights::guest_history(&state.pool, current.account_id, guest_id).await?;
    Ok(Json(insights::assess_churn(guest_id, &history, today())))
}

/// GET /api/properties/{property_id}/insights/payments/{payment_id}/fraud
pub async fn fraud(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Extension(license): Extension<LicenseSnapshot>,
    Path((property_id, payment_id)): Path<(i64, i64)>,
) -> ApiResult<FraudAssessment> {
    license.require_feature(FEATURE_FRAUD_DETECTION)?;
    verify_property(&state, &current, property_id).await?;

    let signals = db::insights::payment_signals(&state.pool, property_id, payment_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::PaymentNotFound))?;
    let assessment = insights::screen_payment(&signals);
    if assessment.recommended_action != FraudAction::Accept {
        tracing::warn!(
            property_id,
            payment_id,
            score = assessment.risk_score,
            reasons = ?assessment.reasons,
            "Payment flagged"
        );
    }
    Ok(Json(assessment))
}
