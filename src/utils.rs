//! Cache Utilities
//!
//! Key construction and bulk invalidation helpers.
//!
//! Keys built here follow the `<prefix>:<field>:<value>|<field>:<value>`
//! convention, so every entry derived from one prefix can be dropped with
//! `invalidate_by_pattern(cache, "<prefix>:")`.

use std::any::Any;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::cache::CacheService;
use crate::error::{CacheError, Result};

// == Generate Key ==
/// Builds a key from `prefix` and `data`, independent of field order.
///
/// Fields are sorted by name. String values are written as-is, other values
/// as compact JSON.
pub fn generate_key(prefix: &str, data: &Map<String, Value>) -> String {
    let mut fields: Vec<(&String, &Value)> = data.iter().collect();
    fields.sort_by(|a, b| a.0.cmp(b.0));

    let params = fields
        .into_iter()
        .map(|(field, value)| format!("{}:{}", field, render_value(value)))
        .collect::<Vec<_>>()
        .join("|");

    format!("{}:{}", prefix, params)
}

/// Same as [`generate_key`] for any value that serializes to a JSON object,
/// such as a query-parameter struct.
///
/// # Errors
/// `KeyGeneration` if `params` fails to serialize or is not an object.
pub fn generate_key_from<S: Serialize>(prefix: &str, params: &S) -> Result<String> {
    match serde_json::to_value(params) {
        Ok(Value::Object(map)) => Ok(generate_key(prefix, &map)),
        Ok(other) => Err(CacheError::KeyGeneration(format!(
            "key parameters for '{}' must be an object, got {}",
            prefix, other
        ))),
        Err(err) => Err(CacheError::KeyGeneration(err.to_string())),
    }
}

fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// == API Responses ==
/// Caches an API response under `key`.
pub fn cache_api_response<T>(
    cache: &CacheService,
    key: &str,
    response: T,
    ttl: Option<Duration>,
) -> Result<()>
where
    T: Any + Send + Sync,
{
    cache.set(key, response, ttl)
}

/// Returns a cached API response, if still live.
pub fn get_cached_api_response<T>(cache: &CacheService, key: &str) -> Option<Arc<T>>
where
    T: Any + Send + Sync,
{
    cache.get(key)
}

// == Invalidate By Pattern ==
/// Deletes every live key containing `pattern`. Returns the number deleted.
pub fn invalidate_by_pattern(cache: &CacheService, pattern: &str) -> usize {
    let mut removed = 0;
    for key in cache.keys() {
        if key.contains(pattern) && cache.delete(&key) {
            removed += 1;
        }
    }

    debug!("Invalidated {} entries matching '{}'", removed, pattern);
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CacheConfig;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    fn test_cache() -> CacheService {
        CacheService::new(CacheConfig::default()).unwrap()
    }

    #[test]
    fn test_generate_key_format() {
        let data = object(json!({ "status": "draft", "page": 1 }));
        assert_eq!(generate_key("products", &data), "products:page:1|status:draft");
    }

    #[test]
    fn test_generate_key_ignores_field_order() {
        let mut a = Map::new();
        a.insert("status".to_string(), json!("draft"));
        a.insert("page".to_string(), json!(1));
        let mut b = Map::new();
        b.insert("page".to_string(), json!(1));
        b.insert("status".to_string(), json!("draft"));

        assert_ne!(
            a.keys().collect::<Vec<_>>(),
            b.keys().collect::<Vec<_>>(),
            "Maps keep insertion order"
        );
        assert_eq!(generate_key("products", &a), generate_key("products", &b));
        assert_eq!(generate_key("products", &a), "products:page:1|status:draft");
    }

    #[test]
    fn test_generate_key_sorts_unordered_input() {
        let mut data = Map::new();
        data.insert("z".to_string(), json!(1));
        data.insert("a".to_string(), json!(2));

        assert_eq!(data.keys().next().map(String::as_str), Some("z"));
        assert_eq!(generate_key("p", &data), "p:a:2|z:1");
    }

    #[test]
    fn test_generate_key_non_string_values() {
        let data = object(json!({ "active": true, "tags": [1, 2], "parent": null }));
        assert_eq!(
            generate_key("categories", &data),
            "categories:active:true|parent:null|tags:[1,2]"
        );
    }

    #[test]
    fn test_generate_key_empty_data() {
        assert_eq!(generate_key("users", &Map::new()), "users:");
    }

    #[test]
    fn test_generate_key_from_struct() {
        #[derive(Serialize)]
        struct ProductQuery {
            status: &'static str,
            page: u32,
        }

        let query = ProductQuery {
            status: "draft",
            page: 1,
        };
        let key = generate_key_from("products", &query).unwrap();
        assert_eq!(key, "products:page:1|status:draft");
    }

    #[test]
    fn test_generate_key_from_rejects_non_object() {
        let result = generate_key_from("products", &vec![1, 2]);
        assert!(matches!(result, Err(CacheError::KeyGeneration(_))));
    }

    #[test]
    fn test_api_response_pass_through() {
        let cache = test_cache();
        let users = vec!["ana".to_string(), "bo".to_string()];
        cache_api_response(&cache, "users:list:1", users.clone(), None).unwrap();

        let cached = get_cached_api_response::<Vec<String>>(&cache, "users:list:1").unwrap();
        assert_eq!(*cached, users);
        assert!(get_cached_api_response::<Vec<String>>(&cache, "users:list:2").is_none());
    }

    #[test]
    fn test_invalidate_by_pattern() {
        let cache = test_cache();
        cache.set("products:list:1", 1, None).unwrap();
        cache.set("products:detail:5", 2, None).unwrap();
        cache.set("users:list:1", 3, None).unwrap();

        assert_eq!(invalidate_by_pattern(&cache, "products:"), 2);
        assert_eq!(cache.keys(), vec!["users:list:1"]);
        assert_eq!(invalidate_by_pattern(&cache, "products:"), 0);
    }
}
