//! Signed license keys
//!
//! Format: `LK1.<tier>.<expires yyyymmdd>.<account_id>.<hex hmac-sha256>`.
//! The signature covers everything before the last dot. A key is bound to a
//! single account and stays valid through its expiry date (UTC).

use chrono::{Days, NaiveDate};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};
use shared::error::{AppError, ErrorCode};
use shared::models::LicenseTier;
use shared::util::date_start_millis;

type HmacSha256 = Hmac<Sha256>;

const KEY_PREFIX: &str = "LK1";
const DATE_FORMAT: &str = "%Y%m%d";

/// Contents of a verified key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LicenseKey {
    pub tier: LicenseTier,
    pub expires_on: NaiveDate,
    pub account_id: i64,
}

impl LicenseKey {
    /// First instant after the expiry date (Unix millis)
    pub fn expires_at(&self) -> i64 {
        let next = self
            .expires_on
            .checked_add_days(Days::new(1))
            .unwrap_or(self.expires_on);
        date_start_millis(next)
    }
}

fn mac(secret: &str) -> Result<HmacSha256, AppError> {
    HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| AppError::internal(format!("license signing key: {e}")))
}

fn payload(tier: LicenseTier, expires_on: NaiveDate, account_id: i64) -> String {
    format!(
        "{KEY_PREFIX}.{}.{}.{account_id}",
        tier.as_db(),
        expires_on.format(DATE_FORMAT)
    )
}

/// Issue a key for `account_id`
pub fn sign(
    secret: &str,
    tier: LicenseTier,
    expires_on: NaiveDate,
    account_id: i64,
) -> Result<String, AppError> {
    let payload = payload(tier, expires_on, account_id);
    let mut mac = mac(secret)?;
    mac.update(payload.as_bytes());
    let signature = hex::encode(mac.finalize().into_bytes());
    Ok(format!("{payload}.{signature}"))
}

/// Verify a key for `account_id` as of `today`
///
/// Checks, in order: format, account binding, signature, expiry.
pub fn verify(
    secret: &str,
    key: &str,
    account_id: i64,
    today: NaiveDate,
) -> Result<LicenseKey, AppError> {
    let invalid = || AppError::new(ErrorCode::LicenseKeyInvalid);

    let key = key.trim();
    let (payload, signature) = key.rsplit_once('.').ok_or_else(invalid)?;
    let parts: Vec<&str> = payload.split('.').collect();
    let [prefix, tier, expires, account] = parts.as_slice() else {
        return Err(invalid());
    };
    if *prefix != KEY_PREFIX {
        return Err(invalid());
    }
    let tier = LicenseTier::from_db(tier).ok_or_else(invalid)?;
    let expires_on = NaiveDate::parse_from_str(expires, DATE_FORMAT).map_err(|_| invalid())?;
    let key_account: i64 = account.parse().map_err(|_| invalid())?;

    if key_account != account_id {
        return Err(AppError::new(ErrorCode::LicenseKeyMismatch));
    }

    let signature = hex::decode(signature).map_err(|_| invalid())?;
    let mut mac = mac(secret)?;
    mac.update(payload.as_bytes());
    mac.verify_slice(&signature).map_err(|_| invalid())?;

    if expires_on < today {
        return Err(AppError::new(ErrorCode::LicenseKeyExpired));
    }

    Ok(LicenseKey {
        tier,
        expires_on,
        account_id: key_account,
    })
}

/// Stored fingerprint of an activated key
pub fn key_hash(key: &str) -> String {
    hex::encode(Sha256::digest(key.trim().as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "signing-secret";

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_sign_and_verify() {
        let key = sign(SECRET, LicenseTier::Professional, date(2027, 1, 31), 12).unwrap();
        assert!(key.starts_with("LK1.professional.20270131.12."));

        let verified = verify(SECRET, &key, 12, date(2026, 6, 1)).unwrap();
        assert_eq!(verified.tier, LicenseTier::Professional);
        assert_eq!(verified.expires_on, date(2027, 1, 31));
        assert_eq!(verified.expires_at(), date_start_millis(date(2027, 2, 1)));
    }

    #[test]
    fn test_key_is_valid_through_expiry_day() {
        let key = sign(SECRET, LicenseTier::Basic, date(2026, 3, 14), 1).unwrap();
        assert!(verify(SECRET, &key, 1, date(2026, 3, 14)).is_ok());
        let err = verify(SECRET, &key, 1, date(2026, 3, 15)).unwrap_err();
        assert_eq!(err.code, ErrorCode::LicenseKeyExpired);
    }

    #[test]
    fn test_wrong_account() {
        let key = sign(SECRET, LicenseTier::Basic, date(2030, 1, 1), 1).unwrap();
        let err = verify(SECRET, &key, 2, date(2026, 1, 1)).unwrap_err();
        assert_eq!(err.code, ErrorCode::LicenseKeyMismatch);
    }

    #[test]
    fn test_tampered_key() {
        let key = sign(SECRET, LicenseTier::Basic, date(2030, 1, 1), 1).unwrap();
        let upgraded = key.replacen("basic", "enterprise", 1);
        let err = verify(SECRET, &upgraded, 1, date(2026, 1, 1)).unwrap_err();
        assert_eq!(err.code, ErrorCode::LicenseKeyInvalid);

        let err = verify("other-secret", &key, 1, date(2026, 1, 1)).unwrap_err();
        assert_eq!(err.code, ErrorCode::LicenseKeyInvalid);
    }

    #[test]
    fn test_malformed_keys() {
        for key in [
            "",
            "LK1",
            "LK2.basic.20300101.1.00",
            "LK1.gold.20300101.1.00",
            "LK1.basic.2030.1.00",
            "LK1.basic.20300101.x.00",
            "LK1.basic.20300101.1.zz",
        ] {
            let err = verify(SECRET, key, 1, date(2026, 1, 1)).unwrap_err();
            assert_eq!(err.code, ErrorCode::LicenseKeyInvalid, "key {key:?}");
        }
    }

    #[test]
    fn test_key_hash_ignores_surrounding_whitespace() {
        assert_eq!(key_hash(" abc \n"), key_hash("abc"));
        assert_eq!(key_hash("abc").len(), 64);
    }
}
