//! Storage tests against a real PostgreSQL
//!
//! Each test gets a fresh database with every migration applied; set
//! `DATABASE_URL` to a server the test user may create databases on.

use axum::body::Body;
use chrono::NaiveDate;
use http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use lodge_server::db;
use lodge_server::db::reservations::StayPlan;
use lodge_server::error::ServiceError;
use lodge_server::license::LicenseSnapshot;
use lodge_server::{AppState, Config, build_app};
use rust_decimal::Decimal;
use serde_json::Value;
use shared::error::ErrorCode;
use shared::models::{
    GuestCreate, GuestUpdate, License, PaymentCreate, PaymentMethod, PropertyCreate,
    RegisterRequest, ReservationStatus, RoomCreate, RoomStatus, RoomTypeCreate, RoomUpdate, User,
};
use sqlx::PgPool;
use tower::ServiceExt;

const NOW: i64 = 1_900_000_000_000;

fn date(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2030, month, day).unwrap()
}

fn code<T: std::fmt::Debug>(result: Result<T, ServiceError>) -> ErrorCode {
    match result {
        Err(ServiceError::App(err)) => err.code,
        other => panic!("expected a domain error, got {other:?}"),
    }
}

struct Hotel {
    owner: User,
    license: License,
    property_id: i64,
    room_type_id: i64,
    rooms: Vec<i64>,
    guest_id: i64,
}

impl Hotel {
    fn plan(&self, room_id: Option<i64>, check_in: NaiveDate, nights: i64) -> StayPlan<'static> {
        let nightly_rate = Decimal::new(12000, 2);
        StayPlan {
            property_id: self.property_id,
            guest_id: self.guest_id,
            room_type_id: self.room_type_id,
            room_id,
            rate_plan_id: None,
            check_in,
            check_out: check_in + chrono::Duration::days(nights),
            adults: 2,
            children: 0,
            nightly_rate,
            nights,
            total_amount: nightly_rate * Decimal::from(nights),
            source: None,
            notes: None,
        }
    }
}

async fn register(pool: &PgPool, username: &str) -> (User, License) {
    let request = RegisterRequest {
        account_name: format!("{username} hotels"),
        username: username.into(),
        email: format!("{username}@example.com"),
        password: "correct horse battery".into(),
        display_name: None,
    };
    db::accounts::register(pool, &request, "not-a-real-hash", 14, NOW)
        .await
        .unwrap()
}

async fn add_room_type(pool: &PgPool, property_id: i64, name: &str) -> i64 {
    let room_type = db::room_types::create(
        pool,
        property_id,
        &RoomTypeCreate {
            name: name.into(),
            description: None,
            base_rate: Decimal::new(12000, 2),
            max_occupancy: 2,
        },
        NOW,
    )
    .await
    .unwrap();
    room_type.id
}

async fn add_room(
    pool: &PgPool,
    account_id: i64,
    property_id: i64,
    room_type_id: i64,
    number: &str,
) -> i64 {
    let room = db::rooms::create(
        pool,
        account_id,
        property_id,
        &RoomCreate {
            room_type_id,
            number: number.into(),
            floor: Some(1),
            status: None,
            notes: None,
        },
        |_| Ok(()),
        NOW,
    )
    .await
    .unwrap();
    room.id
}

fn property(name: &str) -> PropertyCreate {
    PropertyCreate {
        name: name.into(),
        address: None,
        city: Some("Porto".into()),
        country: Some("PT".into()),
        phone: None,
        email: None,
        timezone: None,
    }
}

fn guest(first_name: &str) -> GuestCreate {
    GuestCreate {
        first_name: first_name.into(),
        last_name: "Lovelace".into(),
        email: None,
        phone: None,
        nationality: None,
        document_number: None,
        notes: None,
        is_vip: false,
    }
}

/// Account with one property, one room type holding `room_count` rooms and a guest
async fn hotel(pool: &PgPool, room_count: usize) -> Hotel {
    let (owner, license) = register(pool, "harbour").await;
    let account_id = owner.account_id;
    let property_id =
        db::properties::create(pool, account_id, &property("Harbour Inn"), |_| Ok(()), NOW)
            .await
            .unwrap()
            .id;
    let room_type_id = add_room_type(pool, property_id, "Double").await;
    let mut rooms = Vec::new();
    for n in 0..room_count {
        let number = format!("{}", 101 + n);
        rooms.push(add_room(pool, account_id, property_id, room_type_id, &number).await);
    }
    let guest_id = db::guests::create(pool, account_id, &guest("Ada"), NOW)
        .await
        .unwrap()
        .id;
    Hotel {
        owner,
        license,
        property_id,
        room_type_id,
        rooms,
        guest_id,
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn test_concurrent_bookings_for_last_room(pool: PgPool) {
    let hotel = hotel(&pool, 1).await;
    let first = hotel.plan(None, date(5, 10), 3);
    let second = hotel.plan(None, date(5, 11), 2);

    let (a, b) = tokio::join!(
        db::reservations::create(&pool, &first, hotel.owner.id, NOW),
        db::reservations::create(&pool, &second, hotel.owner.id, NOW),
    );
    let outcomes = [a.is_ok(), b.is_ok()];
    assert_eq!(outcomes.iter().filter(|ok| **ok).count(), 1);
    let loser = if a.is_ok() { b } else { a };
    assert_eq!(code(loser), ErrorCode::RoomTypeSoldOut);

    // nights outside the sold-out range are still bookable
    db::reservations::create(&pool, &hotel.plan(None, date(5, 20), 1), hotel.owner.id, NOW)
        .await
        .unwrap();
}

#[sqlx::test(migrations = "./migrations")]
async fn test_assigned_room_cannot_be_double_booked(pool: PgPool) {
    let hotel = hotel(&pool, 2).await;
    let room = hotel.rooms[0];
    db::reservations::create(&pool, &hotel.plan(Some(room), date(5, 10), 2), hotel.owner.id, NOW)
        .await
        .unwrap();

    let overlapping = hotel.plan(Some(room), date(5, 11), 2);
    let result = db::reservations::create(&pool, &overlapping, hotel.owner.id, NOW).await;
    assert_eq!(code(result), ErrorCode::RoomUnavailable);

    // the other room of the type is still free
    db::reservations::create(
        &pool,
        &hotel.plan(Some(hotel.rooms[1]), date(5, 11), 2),
        hotel.owner.id,
        NOW,
    )
    .await
    .unwrap();
}

#[sqlx::test(migrations = "./migrations")]
async fn test_back_to_back_stays_share_a_room(pool: PgPool) {
    let hotel = hotel(&pool, 1).await;
    let room = hotel.rooms[0];
    let departing = hotel.plan(Some(room), date(5, 10), 2);
    let arriving = hotel.plan(Some(room), date(5, 12), 2);

    db::reservations::create(&pool, &departing, hotel.owner.id, NOW)
        .await
        .unwrap();
    let next = db::reservations::create(&pool, &arriving, hotel.owner.id, NOW)
        .await
        .unwrap();
    assert_eq!(next.check_in, departing.check_out);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_exclusion_constraint_maps_to_room_unavailable(pool: PgPool) {
    let hotel = hotel(&pool, 1).await;
    let room = hotel.rooms[0];
    db::reservations::create(&pool, &hotel.plan(Some(room), date(6, 1), 3), hotel.owner.id, NOW)
        .await
        .unwrap();

    // straight to the table, past the booking checks
    let raw = sqlx::query(
        r#"
        INSERT INTO reservations (
            property_id, guest_id, room_type_id, room_id, check_in, check_out,
            nightly_rate, nights, total_amount, created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, 100, 1, 100, $7, $7)
        "#,
    )
    .bind(hotel.property_id)
    .bind(hotel.guest_id)
    .bind(hotel.room_type_id)
    .bind(room)
    .bind(date(6, 2))
    .bind(date(6, 3))
    .bind(NOW)
    .execute(&pool)
    .await
    .map_err(ServiceError::from);
    assert_eq!(code(raw), ErrorCode::RoomUnavailable);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_check_out_waits_for_settled_folio(pool: PgPool) {
    let hotel = hotel(&pool, 1).await;
    let room = hotel.rooms[0];
    let plan = hotel.plan(Some(room), date(7, 1), 2);
    let reservation = db::reservations::create(&pool, &plan, hotel.owner.id, NOW)
        .await
        .unwrap();
    db::reservations::check_in(&pool, hotel.property_id, reservation.id, None, date(7, 1), NOW)
        .await
        .unwrap();

    let refused = db::reservations::check_out(&pool, hotel.property_id, reservation.id, NOW).await;
    assert_eq!(code(refused), ErrorCode::FolioUnsettled);

    let payment = PaymentCreate {
        amount: plan.total_amount,
        method: PaymentMethod::Card,
        reference: Some("auth-4471".into()),
    };
    db::folio::add_payment(&pool, reservation.id, &payment, hotel.owner.id, NOW)
        .await
        .unwrap();

    let departed = db::reservations::check_out(&pool, hotel.property_id, reservation.id, NOW)
        .await
        .unwrap();
    assert_eq!(departed.status(), Some(ReservationStatus::CheckedOut));
    let room = db::rooms::find(&pool, hotel.property_id, room)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(room.status(), Some(RoomStatus::Dirty));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_guest_crud(pool: PgPool) {
    let hotel = hotel(&pool, 0).await;
    let account_id = hotel.owner.account_id;
    let created = db::guests::create(&pool, account_id, &guest("  Grace "), NOW)
        .await
        .unwrap();

    let found = db::guests::find(&pool, account_id, created.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.first_name, created.first_name);

    let update = GuestUpdate {
        first_name: None,
        last_name: Some("Hopper".into()),
        email: None,
        phone: None,
        nationality: None,
        document_number: None,
        notes: None,
        is_vip: Some(true),
    };
    let updated = db::guests::update(&pool, account_id, created.id, &update)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.last_name, "Hopper");
    assert!(updated.is_vip);

    // another account cannot see it
    let (stranger, _) = register(&pool, "stranger").await;
    assert!(
        db::guests::find(&pool, stranger.account_id, created.id)
            .await
            .unwrap()
            .is_none()
    );

    assert!(db::guests::delete(&pool, account_id, created.id).await.unwrap());
    assert!(
        db::guests::find(&pool, account_id, created.id)
            .await
            .unwrap()
            .is_none()
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn test_property_quota_holds_under_concurrency(pool: PgPool) {
    // trial: one property
    let (owner, license) = register(&pool, "quota").await;
    let snapshot = LicenseSnapshot::evaluate(&license, NOW).unwrap();
    let quota = |used| snapshot.check_property_quota(used);

    let (north, south) = (property("North"), property("South"));
    let (a, b) = tokio::join!(
        db::properties::create(&pool, owner.account_id, &north, quota, NOW),
        db::properties::create(&pool, owner.account_id, &south, quota, NOW),
    );
    assert_eq!([a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count(), 1);
    let loser = if a.is_ok() { b } else { a };
    assert_eq!(code(loser), ErrorCode::PropertyLimitReached);
    assert_eq!(db::properties::count(&pool, owner.account_id).await.unwrap(), 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_room_quota_holds_under_concurrency(pool: PgPool) {
    let hotel = hotel(&pool, 0).await;
    let account_id = hotel.owner.account_id;
    let snapshot = LicenseSnapshot::evaluate(&hotel.license, NOW).unwrap();
    let max_rooms = snapshot.max_rooms as usize;
    for n in 0..max_rooms - 1 {
        let number = format!("{}", 200 + n);
        add_room(&pool, account_id, hotel.property_id, hotel.room_type_id, &number).await;
    }

    let room = |number: &str| RoomCreate {
        room_type_id: hotel.room_type_id,
        number: number.into(),
        floor: None,
        status: None,
        notes: None,
    };
    let (last, extra) = (room("900"), room("901"));
    let quota = |used| snapshot.check_room_quota(used);
    let (a, b) = tokio::join!(
        db::rooms::create(&pool, account_id, hotel.property_id, &last, quota, NOW),
        db::rooms::create(&pool, account_id, hotel.property_id, &extra, quota, NOW),
    );
    assert_eq!([a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count(), 1);
    let loser = if a.is_ok() { b } else { a };
    assert_eq!(code(loser), ErrorCode::RoomLimitReached);
    assert_eq!(
        db::rooms::count_for_account(&pool, account_id).await.unwrap(),
        max_rooms as i64
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn test_room_needed_by_unassigned_bookings_is_kept(pool: PgPool) {
    let hotel = hotel(&pool, 2).await;
    // both rooms of the type are sold on the night of 8/2
    for check_in in [date(8, 1), date(8, 2)] {
        db::reservations::create(&pool, &hotel.plan(None, check_in, 2), hotel.owner.id, NOW)
            .await
            .unwrap();
    }

    let deleted = db::rooms::delete(&pool, hotel.property_id, hotel.rooms[0], date(7, 1)).await;
    assert_eq!(code(deleted), ErrorCode::RoomInUse);

    let suite = add_room_type(&pool, hotel.property_id, "Suite").await;
    let retype = RoomUpdate {
        room_type_id: Some(suite),
        number: None,
        floor: None,
        notes: None,
    };
    let moved =
        db::rooms::update(&pool, hotel.property_id, hotel.rooms[1], &retype, date(7, 1)).await;
    assert_eq!(code(moved), ErrorCode::RoomInUse);

    // after the bookings have passed the room is free to go
    assert!(
        db::rooms::delete(&pool, hotel.property_id, hotel.rooms[0], date(8, 10))
            .await
            .unwrap()
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn test_spare_room_can_be_removed(pool: PgPool) {
    let hotel = hotel(&pool, 2).await;
    db::reservations::create(&pool, &hotel.plan(None, date(8, 1), 3), hotel.owner.id, NOW)
        .await
        .unwrap();

    assert!(
        db::rooms::delete(&pool, hotel.property_id, hotel.rooms[0], date(7, 1))
            .await
            .unwrap()
    );
    // the last room now carries the booking
    let last = db::rooms::delete(&pool, hotel.property_id, hotel.rooms[1], date(7, 1)).await;
    assert_eq!(code(last), ErrorCode::RoomInUse);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_deactivated_user_loses_session(pool: PgPool) {
    let hotel = hotel(&pool, 0).await;
    let state = AppState::from_pool(pool.clone(), &Config::for_tests("postgres://unused"));
    let token = state.sessions.issue(&hotel.owner).unwrap().token;
    let app = build_app(state);

    let me = || {
        Request::builder()
            .uri("/api/auth/me")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap()
    };
    let response = app.clone().oneshot(me()).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    db::users::update(
        &pool,
        hotel.owner.account_id,
        hotel.owner.id,
        None,
        None,
        Some(false),
        None,
    )
    .await
    .unwrap()
    .unwrap();

    let response = app.oneshot(me()).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["code"], 1005);
}
