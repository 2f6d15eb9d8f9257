//! Creation payload validation.
//!
//! Payloads arrive as raw JSON so that every field problem can be reported
//! at once instead of stopping at the first deserialization error.

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};
use utoipa::ToSchema;

use crate::models::NewListing;

/// Fields accepted in a creation payload.
const KNOWN_FIELDS: &[&str] = &[
    "title",
    "size",
    "price",
    "location",
    "description",
    "thumbnailURL",
    "imagesURLs",
];

/// A single field problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FieldError {
    /// Offending field (JSON name, with index for array items).
    pub field: String,
    /// Human-readable description.
    pub message: String,
}

/// Collected validation failures.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct ValidationErrors {
    pub details: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a single field problem.
    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.push(field, message);
        errors
    }

    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        self.details.push(FieldError {
            field: field.to_string(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.details.is_empty()
    }

    /// Whether any problem was reported for `field`.
    pub fn has_field(&self, field: &str) -> bool {
        self.details.iter().any(|e| e.field == field)
    }

    /// `Ok(value)` when nothing was collected, otherwise the errors.
    pub fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.details.iter().map(|e| e.message.as_str()).collect();
        f.write_str(&messages.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Validate a creation payload and convert it into a [`NewListing`].
///
/// Every required string must be present and non-blank, `size` and `price`
/// must be positive numbers (numeric strings are converted), and
/// `imagesURLs`, when present, must be an array of strings. Unknown fields
/// are rejected, which also keeps `id` and the timestamps out of client
/// hands.
pub fn validate_new_listing(payload: &Value) -> Result<NewListing, ValidationErrors> {
    let Some(object) = payload.as_object() else {
        return Err(ValidationErrors::single(
            "value",
            "\"value\" must be of type object",
        ));
    };

    let mut errors = ValidationErrors::new();

    let title = required_string(object, "title", &mut errors);
    let size = required_positive_number(object, "size", &mut errors);
    let price = required_positive_number(object, "price", &mut errors);
    let location = required_string(object, "location", &mut errors);
    let description = required_string(object, "description", &mut errors);
    let thumbnail_url = required_string(object, "thumbnailURL", &mut errors);
    let images_urls = optional_string_list(object, "imagesURLs", &mut errors);

    for key in object.keys() {
        if !KNOWN_FIELDS.contains(&key.as_str()) {
            errors.push(key, format!("\"{key}\" is not allowed"));
        }
    }

    match (title, size, price, location, description, thumbnail_url) {
        (
            Some(title),
            Some(size),
            Some(price),
            Some(location),
            Some(description),
            Some(thumbnail_url),
        ) => errors.into_result(NewListing {
            title,
            size,
            price,
            location,
            description,
            thumbnail_url,
            images_urls,
        }),
        _ => Err(errors),
    }
}

fn required_string(
    object: &Map<String, Value>,
    field: &str,
    errors: &mut ValidationErrors,
) -> Option<String> {
    match object.get(field) {
        None | Some(Value::Null) => {
            errors.push(field, format!("\"{field}\" is required"));
            None
        }
        Some(Value::String(s)) if s.trim().is_empty() => {
            errors.push(field, format!("\"{field}\" is not allowed to be empty"));
            None
        }
        Some(Value::String(s)) => Some(s.trim().to_string()),
        Some(_) => {
            errors.push(field, format!("\"{field}\" must be a string"));
            None
        }
    }
}

fn required_positive_number(
    object: &Map<String, Value>,
    field: &str,
    errors: &mut ValidationErrors,
) -> Option<f64> {
    let number = match object.get(field) {
        None | Some(Value::Null) => {
            errors.push(field, format!("\"{field}\" is required"));
            return None;
        }
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(_) => None,
    };

    match number {
        Some(n) if !n.is_finite() => {
            errors.push(field, format!("\"{field}\" must be a number"));
            None
        }
        Some(n) if n <= 0.0 => {
            errors.push(field, format!("\"{field}\" must be a positive number"));
            None
        }
        Some(n) => Some(n),
        None => {
            errors.push(field, format!("\"{field}\" must be a number"));
            None
        }
    }
}

fn optional_string_list(
    object: &Map<String, Value>,
    field: &str,
    errors: &mut ValidationErrors,
) -> Vec<String> {
    let items = match object.get(field) {
        None | Some(Value::Null) => return Vec::new(),
        Some(Value::Array(items)) => items,
        Some(_) => {
            errors.push(field, format!("\"{field}\" must be an array"));
            return Vec::new();
        }
    };

    let mut urls = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        match item {
            Value::String(s) => urls.push(s.clone()),
            _ => {
                let path = format!("{field}[{index}]");
                errors.push(&path, format!("\"{path}\" must be a string"));
            }
        }
    }
    urls
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid() -> Value {
        json!({
            "title": "A",
            "size": 10,
            "price": 100,
            "location": "L",
            "description": "D",
            "thumbnailURL": "t",
            "imagesURLs": []
        })
    }

    #[test]
    fn accepts_complete_payload() {
        let listing = validate_new_listing(&valid()).unwrap();
        assert_eq!(listing.title, "A");
        assert_eq!(listing.size, 10.0);
        assert_eq!(listing.price, 100.0);
        assert!(listing.images_urls.is_empty());
    }

    #[test]
    fn reports_every_missing_field() {
        let errors = validate_new_listing(&json!({"title": "A"})).unwrap_err();

        for field in ["size", "price", "location", "description", "thumbnailURL"] {
            assert!(errors.has_field(field), "missing error for {field}: {errors}");
        }
        assert!(!errors.has_field("title"));
        assert!(!errors.has_field("imagesURLs"));
    }

    #[test]
    fn gallery_is_optional() {
        let mut payload = valid();
        payload.as_object_mut().unwrap().remove("imagesURLs");
        let listing = validate_new_listing(&payload).unwrap();
        assert!(listing.images_urls.is_empty());
    }

    #[test]
    fn gallery_items_must_be_strings() {
        let mut payload = valid();
        payload["imagesURLs"] = json!(["a.jpg", 3, "b.jpg"]);
        let errors = validate_new_listing(&payload).unwrap_err();
        assert!(errors.has_field("imagesURLs[1]"));
        assert_eq!(errors.details.len(), 1);
    }

    #[test]
    fn gallery_must_be_array() {
        let mut payload = valid();
        payload["imagesURLs"] = json!("a.jpg");
        let errors = validate_new_listing(&payload).unwrap_err();
        assert!(errors.has_field("imagesURLs"));
    }

    #[test]
    fn rejects_blank_strings() {
        let mut payload = valid();
        payload["location"] = json!("   ");
        let errors = validate_new_listing(&payload).unwrap_err();
        assert_eq!(
            errors.details[0].message,
            "\"location\" is not allowed to be empty"
        );
    }

    #[test]
    fn rejects_non_positive_numbers() {
        let mut payload = valid();
        payload["size"] = json!(0);
        payload["price"] = json!(-5);
        let errors = validate_new_listing(&payload).unwrap_err();
        assert!(errors.has_field("size"));
        assert!(errors.has_field("price"));
    }

    #[test]
    fn converts_numeric_strings() {
        let mut payload = valid();
        payload["price"] = json!("2500.5");
        let listing = validate_new_listing(&payload).unwrap();
        assert_eq!(listing.price, 2500.5);
    }

    #[test]
    fn rejects_wrong_types() {
        let mut payload = valid();
        payload["size"] = json!("big");
        payload["title"] = json!(12);
        let errors = validate_new_listing(&payload).unwrap_err();
        assert!(errors.has_field("size"));
        assert!(errors.has_field("title"));
    }

    #[test]
    fn rejects_unknown_and_store_owned_fields() {
        let mut payload = valid();
        payload["id"] = json!("abc");
        payload["createdAt"] = json!("2025-01-01T00:00:00Z");
        let errors = validate_new_listing(&payload).unwrap_err();
        assert!(errors.has_field("id"));
        assert!(errors.has_field("createdAt"));
    }

    #[test]
    fn rejects_non_object_body() {
        let errors = validate_new_listing(&json!([1, 2])).unwrap_err();
        assert!(errors.has_field("value"));
    }

    #[test]
    fn display_joins_messages() {
        let mut errors = ValidationErrors::new();
        errors.push("a", "first");
        errors.push("b", "second");
        assert_eq!(errors.to_string(), "first; second");
    }
}
