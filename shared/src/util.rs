use chrono::{DateTime, NaiveDate, Utc};

/// Current UTC timestamp in milliseconds
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Today's date in UTC
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Start of `date` (00:00 UTC) in milliseconds
pub fn date_start_millis(date: NaiveDate) -> i64 {
    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc().timestamp_millis())
        .unwrap_or_default()
}

/// Millisecond timestamp to a UTC date
pub fn millis_to_date(millis: i64) -> Option<NaiveDate> {
    DateTime::<Utc>::from_timestamp_millis(millis).map(|dt| dt.date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_millis_roundtrip() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();
        let millis = date_start_millis(date);
        assert_eq!(millis, 1_773_446_400_000);
        assert_eq!(millis_to_date(millis + 3_600_000), Some(date));
    }
}
