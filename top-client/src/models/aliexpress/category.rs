//! 类目相关接口

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::traits::TopRequest;
use crate::types::RequestFormat;
use crate::utils::datetime::parse_timestamp;
use crate::utils::embedded_json;
use crate::validate;

// ============ aliexpress.solution.seller.category.tree.query ============

/// Lists the children of a category the seller may publish in.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SolutionSellerCategoryTreeQuery {
    /// Parent category; `0` lists the top level.
    pub category_id: Option<i64>,
    pub filter_no_permission: Option<bool>,
    #[serde(skip)]
    pub format: RequestFormat,
}

impl SolutionSellerCategoryTreeQuery {
    pub fn new(category_id: i64) -> Self {
        Self {
            category_id: Some(category_id),
            ..Self::default()
        }
    }
}

impl TopRequest for SolutionSellerCategoryTreeQuery {
    type Response = SolutionSellerCategoryTreeQueryResponse;

    fn method(&self) -> &'static str {
        "aliexpress.solution.seller.category.tree.query"
    }

    fn format(&self) -> RequestFormat {
        self.format
    }

    fn validate(&self) -> Result<()> {
        validate::required("category_id", self.category_id.as_ref())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SolutionSellerCategoryTreeQueryResponse {
    #[serde(default)]
    pub children_category_list: Option<ChildrenCategoryList>,
    #[serde(default)]
    pub is_success: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChildrenCategoryList {
    #[serde(default)]
    pub category_info: Vec<CategoryInfo>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CategoryInfo {
    pub children_category_id: i64,
    #[serde(default)]
    pub is_leaf_category: bool,
    #[serde(default)]
    pub level: u32,
    /// 语言代码 → 类目名称，接口以 JSON 字符串返回
    #[serde(default, with = "embedded_json::option")]
    pub multi_language_names: Option<BTreeMap<String, String>>,
}

impl CategoryInfo {
    pub fn name(&self, lang: &str) -> Option<&str> {
        self.multi_language_names
            .as_ref()
            .and_then(|names| names.get(lang))
            .map(String::as_str)
    }
}

// ============ aliexpress.postproduct.redefining.categoryforecast ============

/// Locales accepted by `aliexpress.postproduct.redefining.categoryforecast`.
pub const FORECAST_LOCALES: &[&str] = &[
    "en", "ru", "pt", "es", "fr", "in", "it", "nl", "tr", "vi", "th", "de", "ko", "ja", "ar",
    "pl", "he",
];

/// Forecasts suitable categories for a product subject.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PostproductRedefiningCategoryForecast {
    pub subject: Option<String>,
    pub locale: Option<String>,
    #[serde(skip)]
    pub format: RequestFormat,
}

impl PostproductRedefiningCategoryForecast {
    pub fn new(subject: impl Into<String>, locale: impl Into<String>) -> Self {
        Self {
            subject: Some(subject.into()),
            locale: Some(locale.into()),
            format: RequestFormat::Json,
        }
    }
}

impl TopRequest for PostproductRedefiningCategoryForecast {
    type Response = PostproductRedefiningCategoryForecastResponse;

    fn method(&self) -> &'static str {
        "aliexpress.postproduct.redefining.categoryforecast"
    }

    fn format(&self) -> RequestFormat {
        self.format
    }

    fn validate(&self) -> Result<()> {
        validate::max_length("subject", self.subject.as_deref(), 512)?;
        validate::one_of("locale", self.locale.as_deref(), FORECAST_LOCALES)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PostproductRedefiningCategoryForecastResponse {
    #[serde(default)]
    pub result: Option<CategoryForecastResult>,
    #[serde(default)]
    pub request_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CategoryForecastResult {
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub category_suitability_list: Option<CategorySuitabilityList>,
    #[serde(default)]
    pub time_stamp: Option<String>,
    #[serde(default)]
    pub error_code: Option<i64>,
    #[serde(default)]
    pub success: Option<bool>,
}

impl CategoryForecastResult {
    /// `time_stamp` as a UTC instant, when it uses the gateway format.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.time_stamp.as_deref().and_then(parse_timestamp)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategorySuitabilityList {
    /// `None` when the platform answered with `"N/A"` placeholders.
    #[serde(default, with = "embedded_json::option_vec")]
    pub json: Option<Vec<CategorySuitability>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySuitability {
    pub score: f64,
    pub suitability_rank: i64,
    pub category_id: i64,
}
