//! AliExpress 接口模型

mod category;
mod feed;

pub use category::{
    CategoryForecastResult, CategoryInfo, FORECAST_LOCALES, CategorySuitability, CategorySuitabilityList,
    ChildrenCategoryList, PostproductRedefiningCategoryForecast,
    PostproductRedefiningCategoryForecastResponse, SolutionSellerCategoryTreeQuery,
    SolutionSellerCategoryTreeQueryResponse,
};
pub use feed::{
    BatchOperationJobDto, FeedJobList, FeedOperationType, FeedResultList, FeedStatus,
    ItemExecutionResult, MAX_FEED_ITEMS, SingleItemRequestDto, SingleItemResponseDto,
    SolutionFeedListGet, SolutionFeedListGetResponse, SolutionFeedQuery,
    SolutionFeedQueryResponse, SolutionFeedSubmit, SolutionFeedSubmitResponse,
};
