//! Key layout and value encoding for stored records
//!
//! Every record kind lives in one flat namespace, partitioned by a string
//! prefix. Values are plain strings; a weight guess packs its date and weight
//! into one value separated by [`GUESS_DELIMITER`].

use crate::error::{Result, TrackerError};
use crate::types::WeightGuess;
use chrono::NaiveDate;

pub const USERS_PREFIX: &str = "users_";
pub const WEIGHTS_PREFIX: &str = "weights_";
pub const WEIGHT_GUESSES_PREFIX: &str = "guess_weight_";

pub const GUESS_DELIMITER: char = '|';

/// Date format used in keys, forms and guess values.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn user_key(username: &str) -> String {
    format!("{}{}", USERS_PREFIX, username)
}

pub fn weight_key(date: NaiveDate) -> String {
    format!("{}{}", WEIGHTS_PREFIX, format_date(date))
}

pub fn weight_guess_key(username: &str) -> String {
    format!("{}{}", WEIGHT_GUESSES_PREFIX, username)
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).ok()
}

/// `f64` display is the shortest string that parses back to the same value.
pub fn encode_weight(weight: f64) -> String {
    weight.to_string()
}

pub fn decode_weight(key: &str, value: &str) -> Result<f64> {
    let weight: f64 = value
        .trim()
        .parse()
        .map_err(|e| TrackerError::invalid_value(key, format!("not a number: {}", e)))?;

    if !weight.is_finite() {
        return Err(TrackerError::invalid_value(key, "weight is not finite"));
    }

    Ok(weight)
}

pub fn encode_weight_guess(guess: &WeightGuess) -> String {
    format!(
        "{}{}{}",
        format_date(guess.date),
        GUESS_DELIMITER,
        encode_weight(guess.weight)
    )
}

pub fn decode_weight_guess(key: &str, value: &str) -> Result<WeightGuess> {
    let (date, weight) = value
        .split_once(GUESS_DELIMITER)
        .ok_or_else(|| TrackerError::invalid_value(key, "missing delimiter"))?;

    let date = parse_date(date)
        .ok_or_else(|| TrackerError::invalid_value(key, format!("bad date {:?}", date)))?;
    let weight = decode_weight(key, weight)?;

    Ok(WeightGuess::new(date, weight))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_keys_are_prefixed_per_kind() {
        assert_eq!(user_key("alice"), "users_alice");
        assert_eq!(weight_key(date(2025, 9, 3)), "weights_2025-09-03");
        assert_eq!(weight_guess_key("alice"), "guess_weight_alice");
    }

    #[test]
    fn test_weight_guess_value_layout() {
        let guess = WeightGuess::new(date(2025, 9, 14), 71.3);
        let encoded = encode_weight_guess(&guess);
        assert_eq!(encoded, "2025-09-14|71.3");
        assert_eq!(decode_weight_guess("k", &encoded).unwrap(), guess);
    }

    #[test]
    fn test_decode_weight_rejects_garbage() {
        assert_eq!(decode_weight("k", " 70.25 ").unwrap(), 70.25);
        assert!(decode_weight("k", "seventy").is_err());
        assert!(decode_weight("k", "NaN").is_err());
        assert!(decode_weight("k", "inf").is_err());
    }

    #[test]
    fn test_decode_weight_guess_rejects_malformed_values() {
        assert!(decode_weight_guess("k", "2025-09-14").is_err());
        assert!(decode_weight_guess("k", "14/09/2025|70.1").is_err());
        assert!(decode_weight_guess("k", "2025-09-14|heavy").is_err());
        assert!(decode_weight_guess("k", "[\"2025-09-14\", 70.1]").is_err());
    }

    #[test]
    fn test_decode_error_names_the_key() {
        let err = decode_weight_guess("guess_weight_bob", "nope").unwrap_err();
        assert!(err.to_string().contains("guess_weight_bob"));
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("2025-01-31"), Some(date(2025, 1, 31)));
        assert_eq!(parse_date("2025-02-30"), None);
        assert_eq!(parse_date("yesterday"), None);
    }
}
