use std::env;
use std::str::FromStr;

use chrono::FixedOffset;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::services::input_filter::DEFAULT_MAX_HOURS;
use crate::services::recorder::{RecorderConfig, ReferencePolicy};
use crate::utils::error::{AppError, AppResult};

/// Gateway configuration, loaded from the environment after `.env`.
///
/// | Env Var                     | Default      |
/// |-----------------------------|--------------|
/// | `BACKEND_API_URL`           | required     |
/// | `JWT_SECRET`                | required     |
/// | `BACKEND_TIMEOUT_SECS`      | `30`         |
/// | `MAX_HOURS_VALUE`           | `99999.9`    |
/// | `SCHOOL_UTC_OFFSET_MINUTES` | `0`          |
/// | `STRICT_REFERENCES`         | `false`      |
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub backend_api_url: String,
    pub backend_timeout_secs: u64,
    pub jwt_secret: String,
    pub recorder: RecorderConfig,
}

impl AppConfig {
    pub fn from_env() -> AppResult<Self> {
        let backend_api_url = required("BACKEND_API_URL")?
            .trim_end_matches('/')
            .to_string();
        let jwt_secret = required("JWT_SECRET")?;

        let backend_timeout_secs = parsed("BACKEND_TIMEOUT_SECS", 30u64)?;
        let max_hours = hours_ceiling(parsed("MAX_HOURS_VALUE", DEFAULT_MAX_HOURS)?)?;
        let offset_minutes = parsed("SCHOOL_UTC_OFFSET_MINUTES", 0i32)?;
        let strict = parsed("STRICT_REFERENCES", false)?;

        let utc_offset = offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| {
                AppError::ConfigError(format!(
                    "SCHOOL_UTC_OFFSET_MINUTES out of range: {}",
                    offset_minutes
                ))
            })?;

        Ok(AppConfig {
            backend_api_url,
            backend_timeout_secs,
            jwt_secret,
            recorder: RecorderConfig {
                utc_offset,
                reference_policy: if strict {
                    ReferencePolicy::Strict
                } else {
                    ReferencePolicy::Lenient
                },
                max_hours,
            },
        })
    }
}

// Hour inputs carry one fractional digit, so the ceiling does too
fn hours_ceiling(raw: Decimal) -> AppResult<Decimal> {
    let max = raw.round_dp_with_strategy(1, RoundingStrategy::ToZero);
    if max <= Decimal::ZERO {
        return Err(AppError::ConfigError(format!(
            "MAX_HOURS_VALUE must be at least 0.1: {}",
            raw
        )));
    }
    Ok(max)
}

fn required(key: &str) -> AppResult<String> {
    env::var(key).map_err(|_| AppError::ConfigError(format!("{} must be set", key)))
}

fn parsed<T: FromStr>(key: &str, default: T) -> AppResult<T> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::ConfigError(format!("{} has an invalid value: {}", key, raw))),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parsed_falls_back_and_rejects_garbage() {
        env::remove_var("FSG_TEST_UNSET");
        assert_eq!(parsed("FSG_TEST_UNSET", 30u64), Ok(30));

        env::set_var("FSG_TEST_DECIMAL", " 120.5 ");
        assert_eq!(parsed("FSG_TEST_DECIMAL", DEFAULT_MAX_HOURS), Ok(Decimal::new(1205, 1)));

        env::set_var("FSG_TEST_FLAG", "yes");
        assert!(matches!(
            parsed("FSG_TEST_FLAG", false),
            Err(AppError::ConfigError(_))
        ));
    }

    #[test]
    fn hours_ceiling_keeps_one_fraction_digit() {
        let ceiling = hours_ceiling(Decimal::new(50025, 2)).unwrap();
        assert_eq!(ceiling.to_string(), "500.2");
        assert_eq!(
            crate::services::input_filter::sanitize_hours_input("999", ceiling),
            "500.2"
        );
        assert_eq!(hours_ceiling(DEFAULT_MAX_HOURS), Ok(DEFAULT_MAX_HOURS));
    }

    #[test]
    fn hours_ceiling_must_be_positive() {
        for raw in [Decimal::ZERO, Decimal::new(-5, 0), Decimal::new(9, 2)] {
            assert!(matches!(hours_ceiling(raw), Err(AppError::ConfigError(_))));
        }
    }

    #[test]
    fn required_names_the_missing_key() {
        env::remove_var("FSG_TEST_REQUIRED");
        assert_eq!(
            required("FSG_TEST_REQUIRED"),
            Err(AppError::ConfigError("FSG_TEST_REQUIRED must be set".into()))
        );
    }
}
