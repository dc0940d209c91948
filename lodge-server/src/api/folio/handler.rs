//! Folio API Handlers

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use rust_decimal::Decimal;
use serde_json::json;
use shared::error::{AppError, ErrorCode};
use shared::models::{
    ChargeCreate, ChargeKind, Folio, FolioCharge, FolioPayment, PaymentCreate, Reservation,
    ReservationStatus,
};
use shared::util::now_millis;

use crate::api::{ApiResult, ValidatedJson, audit, find_reservation, verify_property};
use crate::auth::CurrentUser;
use crate::db;
use crate::db::folio::NewCharge;
use crate::state::AppState;

async fn load_reservation(
    state: &AppState,
    current: &CurrentUser,
    property_id: i64,
    reservation_id: i64,
) -> Result<Reservation, AppError> {
    verify_property(state, current, property_id).await?;
    find_reservation(state, property_id, reservation_id).await
}

/// Cancelled and no-show stays take no new charges
fn ensure_chargeable(reservation: &Reservation) -> Result<(), AppError> {
    match reservation.status() {
        Some(ReservationStatus::Cancelled | ReservationStatus::NoShow) => {
            Err(AppError::new(ErrorCode::ReservationClosed))
        }
        _ => Ok(()),
    }
}

/// Only incidentals and adjustments are posted by hand; incidentals are positive
fn check_manual_charge(charge: &ChargeCreate) -> Result<(), AppError> {
    if !charge.kind.is_manual() {
        return Err(AppError::invalid_request(
            "Only incidental and adjustment charges can be posted by hand",
        ));
    }
    if charge.kind == ChargeKind::Incidental && charge.amount < Decimal::ZERO {
        return Err(AppError::with_message(
            ErrorCode::InvalidAmount,
            "Incidental charges must be positive, use an adjustment for credits",
        ));
    }
    Ok(())
}

/// GET .../reservations/{reservation_id}/folio
pub async fn get(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path((property_id, reservation_id)): Path<(i64, i64)>,
) -> ApiResult<Folio> {
    load_reservation(&state, &current, property_id, reservation_id).await?;
    Ok(Json(db::folio::load(&state.pool, reservation_id).await?))
}

/// POST .../folio/charges
pub async fn add_charge(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path((property_id, reservation_id)): Path<(i64, i64)>,
    ValidatedJson(payload): ValidatedJson<ChargeCreate>,
) -> ApiResult<FolioCharge> {
    check_manual_charge(&payload)?;
    let reservation = load_reservation(&state, &current, property_id, reservation_id).await?;
    ensure_chargeable(&reservation)?;

    let charge = db::folio::add_charge(
        &state.pool,
        &NewCharge {
            reservation_id,
            kind: payload.kind,
            description: payload.description.trim(),
            amount: payload.amount,
            source_order_id: None,
            created_by: Some(current.id),
        },
        now_millis(),
    )
    .await?;
    Ok(Json(charge))
}

/// POST .../folio/charges/{charge_id}/void
pub async fn void_charge(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path((property_id, reservation_id, charge_id)): Path<(i64, i64, i64)>,
) -> ApiResult<FolioCharge> {
    let reservation = load_reservation(&state, &current, property_id, reservation_id).await?;
    ensure_chargeable(&reservation)?;

    let charge = db::folio::void_charge(&state.pool, reservation_id, charge_id).await?;
    tracing::info!(reservation_id, charge_id, amount = %charge.amount, "Charge voided");
    audit(
        &state,
        &current,
        "folio.charge_voided",
        json!({
            "reservation_id": reservation_id,
            "charge_id": charge_id,
            "amount": charge.amount,
        }),
    )
    .await;
    Ok(Json(charge))
}

/// POST .../folio/payments
pub async fn add_payment(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path((property_id, reservation_id)): Path<(i64, i64)>,
    ValidatedJson(payload): ValidatedJson<PaymentCreate>,
) -> ApiResult<FolioPayment> {
    load_reservation(&state, &current, property_id, reservation_id).await?;
    let payment =
        db::folio::add_payment(&state.pool, reservation_id, &payload, current.id, now_millis())
            .await?;
    tracing::info!(
        reservation_id,
        payment_id = payment.id,
        amount = %payment.amount,
        method = %payment.method,
        "Payment recorded"
    );
    Ok(Json(payment))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn charge(kind: ChargeKind, cents: i64) -> ChargeCreate {
        ChargeCreate {
            kind,
            description: "Minibar".into(),
            amount: Decimal::new(cents, 2),
        }
    }

    #[test]
    fn test_manual_charge_kinds() {
        assert!(check_manual_charge(&charge(ChargeKind::Incidental, 1200)).is_ok());
        assert!(check_manual_charge(&charge(ChargeKind::Adjustment, -500)).is_ok());

        let err = check_manual_charge(&charge(ChargeKind::Room, 10000)).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidRequest);
        let err = check_manual_charge(&charge(ChargeKind::RoomService, 800)).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidRequest);
    }

    #[test]
    fn test_negative_incidental_refused() {
        let err = check_manual_charge(&charge(ChargeKind::Incidental, -100)).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidAmount);
    }
}
