//! Issue a signed license key
//!
//! Usage: `license-key <account_id> <tier> <YYYY-MM-DD>`
//!
//! Reads `LICENSE_SIGNING_SECRET` from the environment (or `.env`).

use chrono::NaiveDate;
use lodge_server::BoxError;
use lodge_server::license::key;
use shared::models::LicenseTier;
use std::process::ExitCode;

const USAGE: &str = "usage: license-key <account_id> <tier> <YYYY-MM-DD>\n\
                     tiers: trial | basic | professional | enterprise";

fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let args: Vec<String> = std::env::args().skip(1).collect();

    match run(&args) {
        Ok(key) => {
            println!("{key}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}\n{USAGE}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &[String]) -> Result<String, BoxError> {
    let [account_id, tier, expires_on] = args else {
        return Err("expected 3 arguments".into());
    };
    let account_id: i64 = account_id
        .parse()
        .map_err(|_| format!("invalid account id: {account_id}"))?;
    let tier = LicenseTier::from_db(tier).ok_or_else(|| format!("unknown tier: {tier}"))?;
    let expires_on = NaiveDate::parse_from_str(expires_on, "%Y-%m-%d")
        .map_err(|_| format!("invalid expiry date: {expires_on}"))?;

    let secret = std::env::var("LICENSE_SIGNING_SECRET")
        .ok()
        .filter(|s| !s.is_empty())
        .ok_or("LICENSE_SIGNING_SECRET must be set")?;

    let key = key::sign(&secret, tier, expires_on, account_id).map_err(|e| e.message)?;
    Ok(key)
}
