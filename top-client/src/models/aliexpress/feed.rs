//! Feed（批量商品作业）接口

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, TopError};
use crate::traits::TopRequest;
use crate::types::RequestFormat;
use crate::utils::embedded_json;
use crate::validate;

/// 单次提交的最大条目数
pub const MAX_FEED_ITEMS: usize = 2000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FeedOperationType {
    ProductCreate,
    ProductFullUpdate,
    ProductPricesUpdate,
    ProductStocksUpdate,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FeedStatus {
    Queueing,
    Processing,
    Finish,
    #[serde(other)]
    Unknown,
}

// ============ aliexpress.solution.feed.submit ============

/// One item of a feed job.
///
/// `item_content` goes over the wire as a JSON string nested in the
/// `item_list` JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SingleItemRequestDto {
    pub item_content_id: String,
    #[serde(with = "embedded_json")]
    pub item_content: Value,
}

impl SingleItemRequestDto {
    pub fn new<T: Serialize>(item_content_id: impl Into<String>, content: &T) -> Result<Self> {
        let item_content = serde_json::to_value(content).map_err(|e| TopError::Serialization {
            detail: format!("item_content: {e}"),
        })?;
        Ok(Self {
            item_content_id: item_content_id.into(),
            item_content,
        })
    }
}

/// Submits a batch product job. Not idempotent.
#[derive(Debug, Clone, Serialize)]
pub struct SolutionFeedSubmit {
    pub operation_type: FeedOperationType,
    pub item_list: Vec<SingleItemRequestDto>,
    #[serde(skip)]
    pub format: RequestFormat,
}

impl SolutionFeedSubmit {
    pub fn new(operation_type: FeedOperationType, item_list: Vec<SingleItemRequestDto>) -> Self {
        Self {
            operation_type,
            item_list,
            format: RequestFormat::Json,
        }
    }
}

impl TopRequest for SolutionFeedSubmit {
    type Response = SolutionFeedSubmitResponse;

    fn method(&self) -> &'static str {
        "aliexpress.solution.feed.submit"
    }

    fn format(&self) -> RequestFormat {
        self.format
    }

    fn validate(&self) -> Result<()> {
        if self.operation_type == FeedOperationType::Unknown {
            return Err(TopError::validation(
                "operation_type",
                "This value is not a valid choice.",
            ));
        }
        validate::count("item_list", &self.item_list, 1, MAX_FEED_ITEMS)?;
        for item in &self.item_list {
            validate::not_blank("item_content_id", Some(item.item_content_id.as_str()))?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SolutionFeedSubmitResponse {
    pub job_id: i64,
}

// ============ aliexpress.solution.feed.query ============

#[derive(Debug, Clone, Default, Serialize)]
pub struct SolutionFeedQuery {
    pub job_id: i64,
    #[serde(skip)]
    pub format: RequestFormat,
}

impl SolutionFeedQuery {
    pub fn new(job_id: i64) -> Self {
        Self {
            job_id,
            format: RequestFormat::Json,
        }
    }
}

impl TopRequest for SolutionFeedQuery {
    type Response = SolutionFeedQueryResponse;

    fn method(&self) -> &'static str {
        "aliexpress.solution.feed.query"
    }

    fn format(&self) -> RequestFormat {
        self.format
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SolutionFeedQueryResponse {
    pub job_id: i64,
    #[serde(default)]
    pub success_item_count: Option<i64>,
    #[serde(default)]
    pub result_list: Option<FeedResultList>,
    #[serde(default)]
    pub total_item_count: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedResultList {
    #[serde(default)]
    pub single_item_response_dto: Vec<SingleItemResponseDto>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SingleItemResponseDto {
    pub item_content_id: String,
    #[serde(default, with = "embedded_json::option")]
    pub item_execution_result: Option<ItemExecutionResult>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemExecutionResult {
    #[serde(default)]
    pub product_id: Option<i64>,
    pub success: bool,
    #[serde(default)]
    pub error_message: Option<String>,
}

// ============ aliexpress.solution.feed.list.get ============

/// Lists the seller's feed jobs, newest first.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SolutionFeedListGet {
    pub status: Option<FeedStatus>,
    pub current_page: Option<i64>,
    pub page_size: Option<i64>,
    #[serde(skip)]
    pub format: RequestFormat,
}

impl TopRequest for SolutionFeedListGet {
    type Response = SolutionFeedListGetResponse;

    fn method(&self) -> &'static str {
        "aliexpress.solution.feed.list.get"
    }

    fn format(&self) -> RequestFormat {
        self.format
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SolutionFeedListGetResponse {
    #[serde(default)]
    pub current_page: Option<i64>,
    #[serde(default)]
    pub job_list: Option<FeedJobList>,
    #[serde(default)]
    pub page_size: Option<i64>,
    #[serde(default)]
    pub total_count: Option<i64>,
    #[serde(default)]
    pub total_page: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedJobList {
    #[serde(default)]
    pub batch_operation_job_dto: Vec<BatchOperationJobDto>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BatchOperationJobDto {
    pub status: FeedStatus,
    pub operation_type: FeedOperationType,
    pub job_id: i64,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::canonical::canonicalize;
    use crate::types::CanonicalParameterSet;

    #[test]
    fn item_list_is_json_with_embedded_content() {
        let item = SingleItemRequestDto::new("A00000000Y1", &json!({"code": "code"})).unwrap();
        let request = SolutionFeedSubmit::new(FeedOperationType::ProductPricesUpdate, vec![item]);
        let params = canonicalize(&request, &CanonicalParameterSet::new()).unwrap();

        assert_eq!(params.get("operation_type"), Some("PRODUCT_PRICES_UPDATE"));
        assert_eq!(
            params.get("item_list"),
            Some(r#"[{"item_content":"{\"code\":\"code\"}","item_content_id":"A00000000Y1"}]"#)
        );
        assert!(!params.contains_key("format"));
    }

    #[test]
    fn submit_requires_items() {
        let request = SolutionFeedSubmit::new(FeedOperationType::ProductCreate, Vec::new());
        assert!(request.validate().is_err());
    }

    #[test]
    fn unknown_enum_values_are_tolerated() {
        let job: BatchOperationJobDto = serde_json::from_str(
            r#"{"status":"CANCELLED","operation_type":"PRODUCT_GROUP_UPDATE","job_id":1}"#,
        )
        .unwrap();
        assert_eq!(job.status, FeedStatus::Unknown);
        assert_eq!(job.operation_type, FeedOperationType::Unknown);
    }

    #[test]
    fn list_get_skips_unset_filters() {
        let request = SolutionFeedListGet {
            status: Some(FeedStatus::Finish),
            ..SolutionFeedListGet::default()
        };
        let params = canonicalize(&request, &CanonicalParameterSet::new()).unwrap();
        assert_eq!(params.get("status"), Some("FINISH"));
        assert_eq!(params.len(), 1);
    }
}
