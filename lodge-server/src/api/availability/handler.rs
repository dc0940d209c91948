//! Availability API Handlers

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use shared::models::{AvailabilityQuery, FreeRoom, RoomTypeAvailability, stay};

use crate::api::{ApiResult, verify_property};
use crate::auth::CurrentUser;
use crate::db;
use crate::db::availability::RoomTypeLoad;
use crate::state::AppState;

/// GET /api/properties/{property_id}/availability?check_in&check_out[&room_type_id]
pub async fn search(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(property_id): Path<i64>,
    Query(query): Query<AvailabilityQuery>,
) -> ApiResult<Vec<RoomTypeAvailability>> {
    verify_property(&state, &current, property_id).await?;

    // also caps the search range
    stay::nights(query.check_in, query.check_out)?;

    let loads = db::availability::room_type_loads(
        &state.pool,
        property_id,
        query.check_in,
        query.check_out,
        query.room_type_id,
    )
    .await?;
    let free = db::availability::free_rooms(
        &state.pool,
        property_id,
        query.check_in,
        query.check_out,
        query.room_type_id,
    )
    .await?;

    Ok(Json(summarize(loads, free)))
}

/// Attach free rooms to their room type and derive the sellable count
fn summarize(loads: Vec<RoomTypeLoad>, free: Vec<FreeRoom>) -> Vec<RoomTypeAvailability> {
    loads
        .into_iter()
        .map(|load| {
            let free_rooms: Vec<FreeRoom> = free
                .iter()
                .filter(|r| r.room_type_id == load.room_type_id)
                .cloned()
                .collect();
            RoomTypeAvailability {
                room_type_id: load.room_type_id,
                name: load.name,
                base_rate: load.base_rate,
                max_occupancy: load.max_occupancy,
                total_rooms: load.total_rooms,
                booked: load.booked,
                available: (load.total_rooms - load.booked).max(0),
                free_rooms,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn load(id: i64, total: i64, booked: i64) -> RoomTypeLoad {
        RoomTypeLoad {
            room_type_id: id,
            name: format!("Type {id}"),
            base_rate: Decimal::new(10000, 2),
            max_occupancy: 2,
            total_rooms: total,
            booked,
        }
    }

    fn room(id: i64, room_type_id: i64) -> FreeRoom {
        FreeRoom {
            id,
            room_type_id,
            number: id.to_string(),
        }
    }

    #[test]
    fn test_free_rooms_grouped_by_type() {
        let result = summarize(
            vec![load(1, 3, 1), load(2, 2, 0)],
            vec![room(10, 1), room(11, 1), room(20, 2), room(21, 2)],
        );
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].available, 2);
        assert_eq!(
            result[0].free_rooms.iter().map(|r| r.id).collect::<Vec<_>>(),
            vec![10, 11]
        );
        assert_eq!(result[1].available, 2);
        assert_eq!(result[1].free_rooms.len(), 2);
    }

    #[test]
    fn test_overbooked_type_never_negative() {
        // A room taken out of service after it was sold
        let result = summarize(vec![load(1, 1, 2)], vec![]);
        assert_eq!(result[0].available, 0);
        assert!(result[0].free_rooms.is_empty());
    }
}
