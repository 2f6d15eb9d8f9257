//! Estate test utilities.
//!
//! Helpers for integration testing: listing payload builders and assertion
//! utilities for the JSON envelopes.

use serde_json::{Value as JsonValue, json};

/// Create a valid listing payload with the given title.
pub fn test_listing(title: &str) -> TestListing {
    TestListing {
        title: title.to_string(),
        size: json!(85),
        price: json!(1_500_000),
        location: "New Cairo".to_string(),
        description: "Bright two-bedroom apartment".to_string(),
        thumbnail_url: "https://img.example/thumb.jpg".to_string(),
        images_urls: Vec::new(),
    }
}

/// The minimal payload used throughout the API docs.
pub fn minimal_listing() -> JsonValue {
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

/// A listing payload builder for creating test fixtures.
#[derive(Debug, Clone)]
pub struct TestListing {
    pub title: String,
    pub size: JsonValue,
    pub price: JsonValue,
    pub location: String,
    pub description: String,
    pub thumbnail_url: String,
    pub images_urls: Vec<String>,
}

impl TestListing {
    pub fn with_size(mut self, size: f64) -> Self {
        self.size = json!(size);
        self
    }

    pub fn with_price(mut self, price: f64) -> Self {
        self.price = json!(price);
        self
    }

    pub fn with_location(mut self, location: &str) -> Self {
        self.location = location.to_string();
        self
    }

    /// Append a gallery image.
    pub fn with_image(mut self, url: &str) -> Self {
        self.images_urls.push(url.to_string());
        self
    }

    /// Render as the JSON body expected by `POST /api/v1/apartments`.
    pub fn to_json(&self) -> JsonValue {
        json!({
            "title": self.title,
            "size": self.size,
            "price": self.price,
            "location": self.location,
            "description": self.description,
            "thumbnailURL": self.thumbnail_url,
            "imagesURLs": self.images_urls,
        })
    }

    /// JSON body with `field` removed.
    pub fn without(&self, field: &str) -> JsonValue {
        let mut value = self.to_json();
        if let Some(obj) = value.as_object_mut() {
            obj.remove(field);
        }
        value
    }
}

/// Assertion helpers for response envelopes.
pub mod assert {
    use serde_json::Value;

    /// Assert a success envelope with the given message.
    pub fn success(body: &Value, message: &str) {
        assert_eq!(body["success"], true, "expected success envelope: {body}");
        assert_eq!(body["message"], message, "unexpected message: {body}");
    }

    /// Assert a failure envelope with the given message.
    pub fn failure(body: &Value, message: &str) {
        assert_eq!(body["success"], false, "expected failure envelope: {body}");
        assert_eq!(body["message"], message, "unexpected message: {body}");
    }

    /// Assert that a validation failure names `field`.
    pub fn has_field_error(body: &Value, field: &str) {
        let details = body["data"]["details"].as_array();
        assert!(
            details.is_some_and(|d| d.iter().any(|e| e["field"] == field)),
            "Expected a validation error for '{field}', got: {body}"
        );
    }

    /// Assert that a string contains a substring.
    pub fn contains(haystack: &str, needle: &str) {
        assert!(
            haystack.contains(needle),
            "Expected string to contain '{needle}'\nActual: {haystack}"
        );
    }
}
