//! 请求参数规范化
//!
//! 将类型化请求展平成 `key -> value` 的字符串参数集：
//! - 标量直接取字符串形式（布尔为 `"true"` / `"false"`）
//! - 数组与嵌套对象编码为紧凑 JSON 字符串，整体作为单个参数值
//! - `null` 字段不输出
//!
//! 字段名由请求模型自身的 serde 声明决定，不做任何大小写推断。

use serde::Serialize;
use serde_json::{Number, Value};

use crate::error::{Result, TopError};
use crate::types::CanonicalParameterSet;

/// Flattens `request` and merges `system_params` on top of it.
///
/// System parameters are reserved names and win on key collision.
pub fn canonicalize<T: Serialize + ?Sized>(
    request: &T,
    system_params: &CanonicalParameterSet,
) -> Result<CanonicalParameterSet> {
    let mut params = request_parameters(request)?;

    for (key, value) in system_params.iter() {
        if params.contains_key(key) {
            log::debug!("[top] System parameter '{key}' overrides request field");
        }
        params.insert(key, value);
    }

    Ok(params)
}

/// Flattens the request's own fields, without system parameters.
pub fn request_parameters<T: Serialize + ?Sized>(request: &T) -> Result<CanonicalParameterSet> {
    let value = serde_json::to_value(request).map_err(|e| TopError::Serialization {
        detail: e.to_string(),
    })?;

    let map = match value {
        Value::Object(map) => map,
        // 无字段的请求（unit struct）
        Value::Null => return Ok(CanonicalParameterSet::new()),
        other => {
            return Err(TopError::Serialization {
                detail: format!("request must serialize to a JSON object, got {}", kind(&other)),
            });
        }
    };

    let mut params = CanonicalParameterSet::new();
    for (key, value) in map {
        if let Some(wire) = wire_value(&value)? {
            params.insert(key, wire);
        }
    }

    Ok(params)
}

/// 将单个字段值转换为线上字符串
fn wire_value(value: &Value) -> Result<Option<String>> {
    Ok(match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(number_value(n)),
        Value::Array(_) | Value::Object(_) => {
            Some(
                serde_json::to_string(value).map_err(|e| TopError::Serialization {
                    detail: e.to_string(),
                })?,
            )
        }
    })
}

/// 浮点数按十进制展开，不使用科学计数法
fn number_value(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() => f.to_string(),
        _ => n.to_string(),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
