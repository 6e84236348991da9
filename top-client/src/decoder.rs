//! Response decoding
//!
//! The gateway wraps every answer in an envelope:
//!
//! - success: `{"<method_with_underscores>_response": { ...payload... }}`
//! - error:   `{"error_response": {"code": 15, "msg": "...", "sub_code": "..."}}`
//!   or the same fields at the top level.
//!
//! Classification depends on the body alone, never on the HTTP status.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::{ApiError, Result, TopError};
use crate::utils::log_sanitizer::truncate_for_log;

/// Key of the nested error envelope.
pub const ERROR_RESPONSE_KEY: &str = "error_response";

/// A classified gateway answer.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseEnvelope {
    /// Raw payload found under the success key.
    Success(Value),
    /// Well-formed error envelope.
    Error(ApiError),
}

/// Returns the success envelope key for `method`.
///
/// `aliexpress.solution.feed.query` → `aliexpress_solution_feed_query_response`
pub fn success_key(method: &str) -> String {
    format!("{}_response", method.replace('.', "_"))
}

/// Stateless decoder shared by all calls.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseDecoder;

impl ResponseDecoder {
    /// Decodes `body` into `T` or an API error.
    pub fn decode<T: DeserializeOwned>(&self, body: &[u8], method: &str) -> Result<T> {
        match self.envelope(body, method)? {
            ResponseEnvelope::Success(payload) => serde_json::from_value(payload).map_err(|e| {
                log::error!("[top] {method}: response payload does not match model: {e}");
                TopError::decoding(format!("{method}: {e}"))
            }),
            ResponseEnvelope::Error(api_error) => {
                log::warn!(
                    "[top] {method}: API error {} - {} (sub_code: {:?}, request_id: {:?})",
                    api_error.code,
                    api_error.msg,
                    api_error.sub_code,
                    api_error.request_id
                );
                Err(TopError::Api(api_error))
            }
        }
    }

    /// Classifies `body` without deserializing the payload.
    pub fn envelope(&self, body: &[u8], method: &str) -> Result<ResponseEnvelope> {
        let value: Value = serde_json::from_slice(body).map_err(|e| {
            log::error!("[top] JSON parse failed: {e}");
            log::error!(
                "[top] Raw response: {}",
                truncate_for_log(&String::from_utf8_lossy(body))
            );
            TopError::decoding(e)
        })?;

        let Value::Object(mut root) = value else {
            return Err(TopError::decoding("response body is not a JSON object"));
        };

        if let Some(payload) = root.remove(&success_key(method)) {
            return Ok(ResponseEnvelope::Success(payload));
        }

        match root.remove(ERROR_RESPONSE_KEY) {
            Some(Value::Object(error)) => return parse_error(error).map(ResponseEnvelope::Error),
            Some(other) => {
                return Err(TopError::decoding(format!(
                    "malformed error envelope: '{ERROR_RESPONSE_KEY}' is {}",
                    truncate_for_log(&other.to_string())
                )));
            }
            None => {}
        }

        if root.contains_key("code") && root.contains_key("msg") {
            return parse_error(root).map(ResponseEnvelope::Error);
        }

        Err(TopError::decoding(format!(
            "neither '{}' nor an error envelope found in response",
            success_key(method)
        )))
    }
}

fn parse_error(fields: Map<String, Value>) -> Result<ApiError> {
    serde_json::from_value(Value::Object(fields))
        .map_err(|e| TopError::decoding(format!("malformed error envelope: {e}")))
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct FeedSubmitData {
        job_id: i64,
        #[serde(default)]
        request_id: Option<String>,
    }

    const METHOD: &str = "aliexpress.solution.feed.submit";

    #[test]
    fn success_key_replaces_dots() {
        assert_eq!(success_key("taobao.httpdns.get"), "taobao_httpdns_get_response");
    }

    #[test]
    fn decodes_success_payload() {
        let body = br#"{"aliexpress_solution_feed_submit_response":{"job_id":200000000060024475}}"#;
        let data: FeedSubmitData = ResponseDecoder.decode(body, METHOD).unwrap();
        assert_eq!(
            data,
            FeedSubmitData {
                job_id: 200_000_000_060_024_475,
                request_id: None
            }
        );
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let body = br#"{"aliexpress_solution_feed_submit_response":{"job_id":1,"brand_new":[1,2]},"extra":true}"#;
        let data: FeedSubmitData = ResponseDecoder.decode(body, METHOD).unwrap();
        assert_eq!(data.job_id, 1);
    }

    #[test]
    fn missing_required_field_is_decoding_error() {
        let body = br#"{"aliexpress_solution_feed_submit_response":{"request_id":"abc"}}"#;
        let err = ResponseDecoder
            .decode::<FeedSubmitData>(body, METHOD)
            .unwrap_err();
        assert!(matches!(err, TopError::Decoding { .. }), "got {err:?}");
    }

    #[test]
    fn nested_error_response() {
        let body = br#"{"error_response":{"code":15,"msg":"Remote service error","sub_code":"isv.invalid-parameter","sub_msg":"bad id","request_id":"zt6k1"}}"#;
        let err = ResponseDecoder
            .decode::<FeedSubmitData>(body, METHOD)
            .unwrap_err();
        let api = err.api_error().cloned().unwrap();
        assert_eq!(api.code, 15);
        assert_eq!(api.msg, "Remote service error");
        assert_eq!(api.sub_code.as_deref(), Some("isv.invalid-parameter"));
        assert_eq!(api.sub_msg.as_deref(), Some("bad id"));
        assert_eq!(api.request_id.as_deref(), Some("zt6k1"));
    }

    #[test]
    fn top_level_error_with_string_code() {
        let body = br#"{"code":"999","msg":"Mocked error","sub_code":"subcode","request_id":"1"}"#;
        let envelope = ResponseDecoder.envelope(body, METHOD).unwrap();
        assert!(
            matches!(
                &envelope,
                ResponseEnvelope::Error(api) if api.code == 999 && api.to_string() == "Mocked error"
            ),
            "unexpected envelope: {envelope:?}"
        );
    }

    #[test]
    fn success_key_wins_over_error_fields() {
        let body = br#"{"aliexpress_solution_feed_submit_response":{"job_id":7},"code":1,"msg":"ignored"}"#;
        let data: FeedSubmitData = ResponseDecoder.decode(body, METHOD).unwrap();
        assert_eq!(data.job_id, 7);
    }

    #[test]
    fn invalid_json_is_decoding_error() {
        let err = ResponseDecoder
            .decode::<FeedSubmitData>(b"<html>502</html>", METHOD)
            .unwrap_err();
        assert!(matches!(err, TopError::Decoding { .. }));
    }

    #[test]
    fn non_object_is_decoding_error() {
        let err = ResponseDecoder
            .decode::<FeedSubmitData>(b"[1,2,3]", METHOD)
            .unwrap_err();
        assert!(matches!(err, TopError::Decoding { .. }));
    }

    #[test]
    fn unrelated_object_is_decoding_error() {
        let err = ResponseDecoder
            .decode::<FeedSubmitData>(br#"{"taobao_httpdns_get_response":{}}"#, METHOD)
            .unwrap_err();
        assert!(
            err.to_string()
                .contains("aliexpress_solution_feed_submit_response")
        );
    }

    #[test]
    fn malformed_error_envelope_is_decoding_error() {
        let err = ResponseDecoder
            .decode::<FeedSubmitData>(br#"{"error_response":{"msg":"no code"}}"#, METHOD)
            .unwrap_err();
        assert!(matches!(err, TopError::Decoding { .. }));
    }

    #[test]
    fn non_object_error_response_is_decoding_error() {
        for body in [
            &br#"{"error_response":"Remote service error","code":15,"msg":"x"}"#[..],
            &br#"{"error_response":[15,"Remote service error"]}"#[..],
        ] {
            let err = ResponseDecoder
                .decode::<FeedSubmitData>(body, METHOD)
                .unwrap_err();
            assert!(
                matches!(&err, TopError::Decoding { detail } if detail.starts_with("malformed error envelope")),
                "got {err:?}"
            );
        }
    }
}
