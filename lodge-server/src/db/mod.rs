//! Database access layer
//!
//! Plain SQL over sqlx. Every function returns [`ServiceResult`] so
//! constraint violations surface as domain errors and the rest as 500s.
//! Property-scoped tables are always filtered by `property_id`; callers
//! check property ownership first.
//!
//! [`ServiceResult`]: crate::error::ServiceResult

pub mod accounts;
pub mod audit;
pub mod availability;
pub mod dashboard;
pub mod folio;
pub mod guests;
pub mod insights;
pub mod licenses;
pub mod messages;
pub mod properties;
pub mod rate_plans;
pub mod reservations;
pub mod room_service;
pub mod room_types;
pub mod rooms;
pub mod users;

/// Reservation statuses that hold inventory
pub(crate) const ACTIVE_STATUSES: &str = "('confirmed', 'checked_in')";

/// `%keyword%` for ILIKE, with LIKE wildcards escaped
pub(crate) fn like_pattern(keyword: &str) -> String {
    let escaped = keyword
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("ada"), "%ada%");
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
    }
}
