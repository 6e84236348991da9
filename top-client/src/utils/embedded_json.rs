//! 嵌入式 JSON 字段的 Serde 支持
//!
//! 网关的部分字段把 JSON 文本当作字符串返回（例如 `multi_language_names`、
//! `item_execution_result`），或返回由 JSON 字符串组成的数组。这些字段需要在
//! 模型中逐个声明：
//!
//! ```rust,ignore
//! #[serde(default, with = "embedded_json::option")]
//! pub multi_language_names: Option<BTreeMap<String, String>>,
//! ```
//!
//! 同一字段偶尔也会以原生 JSON 形式出现，两种形式都能解析。

use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Serializes `value` as a JSON string (JSON-in-JSON).
pub fn serialize<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    T: Serialize,
    S: Serializer,
{
    use serde::ser::Error;

    let encoded = serde_json::to_string(value).map_err(S::Error::custom)?;
    serializer.serialize_str(&encoded)
}

/// Deserializes a required embedded JSON field.
pub fn deserialize<'de, T, D>(deserializer: D) -> Result<T, D::Error>
where
    T: DeserializeOwned,
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    parse_embedded(value).map_err(D::Error::custom)
}

fn parse_embedded<T: DeserializeOwned>(value: Value) -> serde_json::Result<T> {
    match value {
        Value::String(s) => serde_json::from_str(&s),
        native => serde_json::from_value(native),
    }
}

/// Optional embedded JSON object: `null` / missing decode to `None`.
pub mod option {
    use super::{DeserializeOwned, Deserializer, Serialize, Serializer, Value, parse_embedded};
    use serde::Deserialize;
    use serde::de::Error as _;

    pub fn serialize<T, S>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Serialize,
        S: Serializer,
    {
        match value {
            Some(v) => super::serialize(v, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        T: DeserializeOwned,
        D: Deserializer<'de>,
    {
        match Option::<Value>::deserialize(deserializer)? {
            None | Some(Value::Null) => Ok(None),
            Some(value) => parse_embedded(value).map(Some).map_err(D::Error::custom),
        }
    }
}

/// Optional array whose elements are JSON strings.
///
/// The platform fills these lists with placeholders such as `"N/A"` when it
/// has no data; if any element fails to parse, the whole field decodes to
/// `None` instead of failing the response.
pub mod option_vec {
    use super::{DeserializeOwned, Deserializer, Serialize, Serializer, Value, parse_embedded};
    use serde::Deserialize;
    use serde::ser::SerializeSeq;

    pub fn serialize<T, S>(value: &Option<Vec<T>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Serialize,
        S: Serializer,
    {
        use serde::ser::Error;

        let Some(items) = value else {
            return serializer.serialize_none();
        };

        let mut seq = serializer.serialize_seq(Some(items.len()))?;
        for item in items {
            let encoded = serde_json::to_string(item).map_err(S::Error::custom)?;
            seq.serialize_element(&encoded)?;
        }
        seq.end()
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
    where
        T: DeserializeOwned,
        D: Deserializer<'de>,
    {
        let Some(items) = Option::<Vec<Value>>::deserialize(deserializer)? else {
            return Ok(None);
        };

        let parsed: serde_json::Result<Vec<T>> = items.into_iter().map(parse_embedded).collect();
        match parsed {
            Ok(list) => Ok(Some(list)),
            Err(e) => {
                log::debug!("[top] Embedded JSON list discarded: {e}");
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use serde::{Deserialize, Serialize};

    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct ExecutionResult {
        product_id: i64,
        success: bool,
    }

    #[derive(Debug, Deserialize)]
    struct Holder {
        #[serde(default, with = "option")]
        names: Option<BTreeMap<String, String>>,
        #[serde(default, with = "option")]
        result: Option<ExecutionResult>,
        #[serde(default, with = "option_vec")]
        json: Option<Vec<ExecutionResult>>,
    }

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Wrapper {
        #[serde(serialize_with = "serialize", deserialize_with = "deserialize")]
        content: ExecutionResult,
    }

    #[test]
    fn string_encoded_map() {
        let holder: Holder =
            serde_json::from_str(r#"{"names":"{\"en\":\"Mobile Phones\",\"ru\":\"Мобильные телефоны\"}"}"#)
                .unwrap();
        let names = holder.names.unwrap();
        assert_eq!(names.get("en").map(String::as_str), Some("Mobile Phones"));
        assert_eq!(
            names.get("ru").map(String::as_str),
            Some("Мобильные телефоны")
        );
    }

    #[test]
    fn native_object_also_accepted() {
        let holder: Holder =
            serde_json::from_str(r#"{"result":{"productId":33030372006,"success":true}}"#).unwrap();
        assert_eq!(
            holder.result,
            Some(ExecutionResult {
                product_id: 33_030_372_006,
                success: true
            })
        );
    }

    #[test]
    fn missing_and_null_are_none() {
        let holder: Holder = serde_json::from_str(r#"{"names":null}"#).unwrap();
        assert!(holder.names.is_none());
        assert!(holder.result.is_none());
        assert!(holder.json.is_none());
    }

    #[test]
    fn malformed_embedded_object_is_an_error() {
        let result = serde_json::from_str::<Holder>(r#"{"result":"{not json"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn list_of_json_strings() {
        let holder: Holder = serde_json::from_str(
            r#"{"json":["{\"productId\":1,\"success\":true}","{\"productId\":2,\"success\":false}"]}"#,
        )
        .unwrap();
        let list = holder.json.unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[1].product_id, 2);
    }

    #[test]
    fn placeholder_list_becomes_none() {
        let holder: Holder = serde_json::from_str(r#"{"json":["N/A"]}"#).unwrap();
        assert!(holder.json.is_none());
    }

    #[test]
    fn serialize_then_deserialize_preserves_value() {
        let original = Wrapper {
            content: ExecutionResult {
                product_id: 42,
                success: true,
            },
        };
        let json = serde_json::to_string(&original).unwrap();
        assert_eq!(json, r#"{"content":"{\"productId\":42,\"success\":true}"}"#);
        let back: Wrapper = serde_json::from_str(&json).unwrap();
        assert_eq!(back, original);
    }
}
