//! Envelopes returned by the dashboard API.
//!
//! List endpoints answer with `{ message, count, page_size, results }`. Mutations
//! answer with the same envelope, or embed the refreshed page under `result` or
//! `data` so the caller can re-sync without a second round-trip.

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;

const PAGE_KEYS: [&str; 2] = ["result", "data"];
const RECORD_KEYS: [&str; 3] = ["record", "result", "data"];

/// One page of a list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub count: u64,
    pub page_size: u64,
    pub results: Vec<T>,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            count: 0,
            page_size: 0,
            results: Vec::new(),
        }
    }
}

/// Parsed payload of a successful (or failed) API call.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ApiResponse {
    body: Value,
}

impl ApiResponse {
    pub fn new(body: Value) -> Self {
        Self { body }
    }

    pub fn body(&self) -> &Value {
        &self.body
    }

    pub fn into_inner(self) -> Value {
        self.body
    }

    /// Server-provided user message, if any.
    pub fn message(&self) -> Option<&str> {
        non_empty_str(self.body.get("message"))
    }

    /// Message to show for a failed call: `message`, then `error`, then `detail`.
    pub fn error_message(&self) -> Option<&str> {
        ["message", "error", "detail"]
            .iter()
            .find_map(|key| non_empty_str(self.body.get(*key)))
    }

    /// Extract the page carried by this response, wherever the endpoint put it.
    pub fn page<T: DeserializeOwned>(&self) -> Result<Option<Page<T>>, serde_json::Error> {
        if let Some(results) = self.body.get("results").filter(|v| v.is_array()) {
            return page_from(&self.body, results).map(Some);
        }

        for key in PAGE_KEYS {
            match self.body.get(key) {
                Some(results @ Value::Array(_)) => return page_from(&self.body, results).map(Some),
                Some(inner @ Value::Object(_)) => {
                    if let Some(results) = inner.get("results").filter(|v| v.is_array()) {
                        return page_from(inner, results).map(Some);
                    }
                }
                _ => {}
            }
        }

        Ok(None)
    }

    /// Extract a single record: an object under `record`, `result` or `data`
    /// that is not itself a page, or the body when it carries an `_id`.
    pub fn record<T: DeserializeOwned>(&self) -> Result<Option<T>, serde_json::Error> {
        for key in RECORD_KEYS {
            if let Some(inner @ Value::Object(map)) = self.body.get(key)
                && !map.contains_key("results")
            {
                return T::deserialize(without_nulls(inner)).map(Some);
            }
        }

        if self.body.get("_id").is_some() {
            return T::deserialize(without_nulls(&self.body)).map(Some);
        }

        Ok(None)
    }

    /// Deserialize an arbitrary top-level field.
    pub fn field<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, serde_json::Error> {
        match self.body.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => T::deserialize(without_nulls(value)).map(Some),
        }
    }
}

fn page_from<T: DeserializeOwned>(
    container: &Value,
    results: &Value,
) -> Result<Page<T>, serde_json::Error> {
    let results = Vec::<T>::deserialize(without_nulls(results))?;
    let count = container
        .get("count")
        .and_then(Value::as_u64)
        .unwrap_or(results.len() as u64);
    let page_size = container
        .get("page_size")
        .and_then(Value::as_u64)
        .unwrap_or_default();

    Ok(Page {
        count,
        page_size,
        results,
    })
}

/// Drop `null` object members at every depth so records fall back to their
/// field defaults instead of failing on a `null` number or string.
fn without_nulls(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| (k.clone(), without_nulls(v)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(without_nulls).collect()),
        other => other.clone(),
    }
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Item {
        #[serde(rename = "_id")]
        id: String,
        name: String,
    }

    #[test]
    fn test_top_level_page() {
        let response = ApiResponse::new(json!({
            "message": "ok",
            "count": 42,
            "page_size": 20,
            "results": [{ "_id": "a", "name": "Layer mash" }]
        }));

        let page = response.page::<Item>().unwrap().unwrap();
        assert_eq!(page.count, 42);
        assert_eq!(page.page_size, 20);
        assert_eq!(page.results[0].name, "Layer mash");
        assert_eq!(response.message(), Some("ok"));
    }

    #[test]
    fn test_page_nested_under_result() {
        let response = ApiResponse::new(json!({
            "message": "Product created",
            "result": {
                "count": 3,
                "page_size": 10,
                "results": [{ "_id": "a", "name": "Eggs" }]
            }
        }));

        let page = response.page::<Item>().unwrap().unwrap();
        assert_eq!(page.count, 3);
        assert_eq!(page.page_size, 10);
        assert!(response.record::<Item>().unwrap().is_none());
    }

    #[test]
    fn test_data_array_counts_results_when_count_missing() {
        let response = ApiResponse::new(json!({
            "data": [{ "_id": "a", "name": "Eggs" }, { "_id": "b", "name": "Feed" }]
        }));

        let page = response.page::<Item>().unwrap().unwrap();
        assert_eq!(page.count, 2);
        assert_eq!(page.page_size, 0);
    }

    #[test]
    fn test_record_under_data() {
        let response = ApiResponse::new(json!({ "data": { "_id": "x", "name": "Broiler" } }));
        let item = response.record::<Item>().unwrap().unwrap();
        assert_eq!(
            item,
            Item {
                id: "x".into(),
                name: "Broiler".into()
            }
        );
        assert!(response.page::<Item>().unwrap().is_none());
    }

    #[test]
    fn test_error_message_fallbacks() {
        let response = ApiResponse::new(json!({ "message": "  ", "error": "Invalid token" }));
        assert_eq!(response.error_message(), Some("Invalid token"));
        assert_eq!(response.message(), None);

        let response = ApiResponse::new(json!({ "detail": "Not found." }));
        assert_eq!(response.error_message(), Some("Not found."));
    }

    #[test]
    fn test_field_null_is_none() {
        let response = ApiResponse::new(json!({ "token": null, "user": "ada" }));
        assert_eq!(response.field::<String>("token").unwrap(), None);
        assert_eq!(response.field::<String>("user").unwrap(), Some("ada".into()));
    }

    #[derive(Debug, Default, Deserialize, PartialEq)]
    #[serde(default)]
    struct Priced {
        #[serde(rename = "_id")]
        id: String,
        price: f64,
        note: Option<String>,
    }

    #[test]
    fn test_null_members_fall_back_to_defaults() {
        let response = ApiResponse::new(json!({
            "results": [{ "_id": "a", "price": null, "note": null }]
        }));
        let page = response.page::<Priced>().unwrap().unwrap();
        assert_eq!(
            page.results[0],
            Priced {
                id: "a".into(),
                price: 0.0,
                note: None
            }
        );

        let response = ApiResponse::new(json!({ "record": { "_id": "b", "price": null } }));
        let record = response.record::<Priced>().unwrap().unwrap();
        assert_eq!(record.price, 0.0);
    }
}
