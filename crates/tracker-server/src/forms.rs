//! Form payloads and validation

use chrono::NaiveDate;
use serde::Deserialize;
use tracker_core::codec::parse_date;

#[derive(Debug, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub next: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct AddUserForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub password2: String,
}

impl AddUserForm {
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.username.trim().is_empty() {
            errors.push("Username is required".to_string());
        }
        if self.password.is_empty() {
            errors.push("Password is required".to_string());
        }
        if self.password2.is_empty() {
            errors.push("Repeat Password is required".to_string());
        } else if self.password != self.password2 {
            errors.push("Passwords must match".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct AddWeightForm {
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub weight: String,
}

impl AddWeightForm {
    pub fn validate(&self) -> Result<(NaiveDate, f64), Vec<String>> {
        let mut errors = Vec::new();

        let date = if self.date.trim().is_empty() {
            errors.push("Date is required".to_string());
            None
        } else {
            let date = parse_date(&self.date);
            if date.is_none() {
                errors.push("Must be YYYY-MM-DD".to_string());
            }
            date
        };

        let weight = parse_weight(&self.weight).map_err(|e| errors.push(e)).ok();

        match (date, weight) {
            (Some(date), Some(weight)) if errors.is_empty() => Ok((date, weight)),
            _ => Err(errors),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct WeightGuessForm {
    #[serde(default)]
    pub weight: String,
}

impl WeightGuessForm {
    pub fn validate(&self) -> Result<f64, Vec<String>> {
        parse_weight(&self.weight).map_err(|e| vec![e])
    }
}

fn parse_weight(value: &str) -> Result<f64, String> {
    let value = value.trim();
    if value.is_empty() {
        return Err("Weight is required".to_string());
    }

    match value.parse::<f64>() {
        Ok(weight) if weight.is_finite() && weight > 0.0 => Ok(weight),
        Ok(_) => Err("Weight must be a positive number".to_string()),
        Err(_) => Err("Not a valid float value".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_user_validation() {
        let form = AddUserForm {
            username: "alice".to_string(),
            password: "pw".to_string(),
            password2: "pw".to_string(),
        };
        assert!(form.validate().is_ok());

        let form = AddUserForm {
            username: " ".to_string(),
            password: "pw".to_string(),
            password2: "other".to_string(),
        };
        assert_eq!(
            form.validate().unwrap_err(),
            vec!["Username is required", "Passwords must match"]
        );

        let errors = AddUserForm::default().validate().unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_add_weight_validation() {
        let form = AddWeightForm {
            date: "2025-09-14".to_string(),
            weight: "70.5".to_string(),
        };
        assert_eq!(
            form.validate().unwrap(),
            (NaiveDate::from_ymd_opt(2025, 9, 14).unwrap(), 70.5)
        );

        let form = AddWeightForm {
            date: "14.09.2025".to_string(),
            weight: "-1".to_string(),
        };
        assert_eq!(
            form.validate().unwrap_err(),
            vec!["Must be YYYY-MM-DD", "Weight must be a positive number"]
        );

        let errors = AddWeightForm::default().validate().unwrap_err();
        assert_eq!(errors, vec!["Date is required", "Weight is required"]);
    }

    #[test]
    fn test_weight_guess_validation() {
        let form = WeightGuessForm {
            weight: " 81.2 ".to_string(),
        };
        assert_eq!(form.validate().unwrap(), 81.2);

        let form = WeightGuessForm {
            weight: "a lot".to_string(),
        };
        assert_eq!(
            form.validate().unwrap_err(),
            vec!["Not a valid float value"]
        );
    }
}
