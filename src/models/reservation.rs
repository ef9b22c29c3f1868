use bson::{doc, Document};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use time::macros::format_description;
use time::{Date, Time};

use crate::error::ValidationError;

/// Collection every reservation is written to.
pub const RESERVATION_COLLECTION: &str = "reservation";

pub const MIN_GUESTS: i64 = 1;
pub const MAX_GUESTS: i64 = 100;

/// A reservation as submitted by a client. Identifier and timestamps are
/// attached by the store and are not part of this type.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Reservation {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    /// Calendar date, `YYYY-MM-DD`
    pub date: String,
    /// Wall-clock time, `HH:MM`
    pub time: String,
    pub guests: u32,
    pub notes: Option<String>,
}

impl Reservation {
    /// Checks `value` against the reservation field set, in declaration order,
    /// and stops at the first violation. Unknown fields are ignored.
    pub fn from_json(value: &Value) -> Result<Self, ValidationError> {
        let body = value
            .as_object()
            .ok_or_else(|| ValidationError::new("body", "expected a JSON object"))?;

        let name = required_string(body, "name")?;
        if name.trim().is_empty() {
            return Err(ValidationError::new("name", "must not be empty"));
        }

        let email = required_string(body, "email")?;
        if !looks_like_email(&email) {
            return Err(ValidationError::new("email", "must be a valid email address"));
        }

        let phone = optional_string(body, "phone")?;

        let date = required_string(body, "date")?;
        Date::parse(&date, format_description!("[year]-[month]-[day]"))
            .map_err(|_| ValidationError::new("date", "must be a date formatted as YYYY-MM-DD"))?;

        let time = required_string(body, "time")?;
        Time::parse(&time, format_description!("[hour]:[minute]"))
            .map_err(|_| ValidationError::new("time", "must be a time formatted as HH:MM"))?;

        let guests = required_guests(body)?;
        let notes = optional_string(body, "notes")?;

        Ok(Self {
            name,
            email,
            phone,
            date,
            time,
            guests,
            notes,
        })
    }

    pub fn to_document(&self) -> Document {
        let mut document = doc! {
            "name": self.name.as_str(),
            "email": self.email.as_str(),
            "date": self.date.as_str(),
            "time": self.time.as_str(),
            "guests": i64::from(self.guests),
        };
        if let Some(phone) = &self.phone {
            document.insert("phone", phone.as_str());
        }
        if let Some(notes) = &self.notes {
            document.insert("notes", notes.as_str());
        }

        document
    }
}

fn required_string(body: &Map<String, Value>, field: &str) -> Result<String, ValidationError> {
    match body.get(field) {
        None | Some(Value::Null) => Err(ValidationError::new(field, "field required")),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(ValidationError::new(field, "must be a string")),
    }
}

fn optional_string(body: &Map<String, Value>, field: &str) -> Result<Option<String>, ValidationError> {
    match body.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(ValidationError::new(field, "must be a string")),
    }
}

/// `guests` is the one coerced field: integral floats and numeric strings
/// are accepted alongside plain integers.
fn required_guests(body: &Map<String, Value>) -> Result<u32, ValidationError> {
    let not_integer = || ValidationError::new("guests", "must be an integer");

    let guests = match body.get("guests") {
        None | Some(Value::Null) => return Err(ValidationError::new("guests", "field required")),
        Some(Value::Number(n)) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => i,
            (None, Some(f)) if f.fract() == 0.0 && f.abs() <= i64::MAX as f64 => f as i64,
            _ => return Err(not_integer()),
        },
        Some(Value::String(s)) => s.trim().parse::<i64>().map_err(|_| not_integer())?,
        Some(_) => return Err(not_integer()),
    };

    if !(MIN_GUESTS..=MAX_GUESTS).contains(&guests) {
        return Err(ValidationError::new(
            "guests",
            format!("must be between {} and {}", MIN_GUESTS, MAX_GUESTS),
        ));
    }

    u32::try_from(guests).map_err(|_| not_integer())
}

fn looks_like_email(email: &str) -> bool {
    let mut parts = email.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => {
            !local.is_empty() && !domain.is_empty() && !email.chars().any(char::is_whitespace)
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_payload() -> Value {
        json!({
            "name": "Ada Lovelace",
            "email": "ada@example.com",
            "phone": "+44 20 7946 0000",
            "date": "2026-11-02",
            "time": "19:30",
            "guests": 4,
            "notes": "window seat"
        })
    }

    #[test]
    fn accepts_a_complete_payload() {
        let reservation = Reservation::from_json(&valid_payload()).unwrap();
        assert_eq!(reservation.name, "Ada Lovelace");
        assert_eq!(reservation.guests, 4);
        assert_eq!(reservation.notes.as_deref(), Some("window seat"));
    }

    #[test]
    fn optional_fields_may_be_missing_or_null() {
        let mut payload = valid_payload();
        let body = payload.as_object_mut().unwrap();
        body.remove("phone");
        body.insert("notes".into(), Value::Null);

        let reservation = Reservation::from_json(&payload).unwrap();
        assert_eq!(reservation.phone, None);
        assert_eq!(reservation.notes, None);

        let document = reservation.to_document();
        assert!(!document.contains_key("phone"));
        assert!(!document.contains_key("notes"));
    }

    #[test]
    fn reports_the_first_missing_field() {
        let mut payload = valid_payload();
        let body = payload.as_object_mut().unwrap();
        body.remove("email");
        body.remove("date");

        let err = Reservation::from_json(&payload).unwrap_err();
        assert_eq!(err, ValidationError::new("email", "field required"));
    }

    #[test]
    fn rejects_mistyped_fields() {
        let cases = [
            ("name", json!(42), "must be a string"),
            ("phone", json!(["555"]), "must be a string"),
            ("guests", json!("four"), "must be an integer"),
            ("guests", json!(2.5), "must be an integer"),
            ("guests", json!(0), "must be between 1 and 100"),
        ];

        for (field, value, message) in cases {
            let mut payload = valid_payload();
            payload[field] = value;
            let err = Reservation::from_json(&payload).unwrap_err();
            assert_eq!(err.field, field);
            assert_eq!(err.message, message);
        }
    }

    #[test]
    fn rejects_malformed_shapes() {
        for (field, value) in [
            ("email", "not-an-email"),
            ("email", "a@b@c"),
            ("date", "02/11/2026"),
            ("date", "2026-02-30"),
            ("time", "7pm"),
            ("time", "25:00"),
        ] {
            let mut payload = valid_payload();
            payload[field] = json!(value);
            let err = Reservation::from_json(&payload).unwrap_err();
            assert_eq!(err.field, field, "{value} should be rejected");
        }

        let err = Reservation::from_json(&json!(["not", "an", "object"])).unwrap_err();
        assert_eq!(err.field, "body");
    }

    #[test]
    fn coerces_numeric_guests() {
        let mut payload = valid_payload();
        payload["guests"] = json!("6");
        assert_eq!(Reservation::from_json(&payload).unwrap().guests, 6);

        payload["guests"] = json!(3.0);
        assert_eq!(Reservation::from_json(&payload).unwrap().guests, 3);
    }

    #[test]
    fn ignores_unknown_and_system_fields() {
        let mut payload = valid_payload();
        payload["_id"] = json!("forged");
        payload["created_at"] = json!("yesterday");
        payload["vip"] = json!(true);

        let document = Reservation::from_json(&payload).unwrap().to_document();
        assert!(!document.contains_key("_id"));
        assert!(!document.contains_key("created_at"));
        assert!(!document.contains_key("vip"));
        assert_eq!(document.get_i64("guests").unwrap(), 4);
    }
}
