//! Request/response models, one pair per remote method.
//!
//! Each request implements [`TopRequest`](crate::TopRequest) and names its
//! response type; field names are the wire names.

#[cfg(feature = "aliexpress")]
pub mod aliexpress;
#[cfg(feature = "taobao")]
pub mod taobao;
