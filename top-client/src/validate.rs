//! 请求字段校验辅助函数
//!
//! 模型在 [`TopRequest::validate`](crate::TopRequest::validate) 中调用这些函数，
//! 校验在参数规范化之前执行。

use crate::error::{Result, TopError};

/// Fails if a required field is unset.
pub fn required<T>(param: &str, value: Option<&T>) -> Result<()> {
    if value.is_none() {
        return Err(TopError::validation(param, "This value should not be blank."));
    }
    Ok(())
}

/// Fails if a required string field is unset or blank.
pub fn not_blank(param: &str, value: Option<&str>) -> Result<()> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(()),
        _ => Err(TopError::validation(param, "This value should not be blank.")),
    }
}

/// Fails if `value` has more than `max` characters.
pub fn max_length(param: &str, value: Option<&str>, max: usize) -> Result<()> {
    match value {
        Some(v) if v.chars().count() > max => Err(TopError::validation(
            param,
            format!("This value is too long. It should have {max} characters or less."),
        )),
        _ => Ok(()),
    }
}

/// Fails if `value` is set but not one of `choices`.
pub fn one_of(param: &str, value: Option<&str>, choices: &[&str]) -> Result<()> {
    match value {
        Some(v) if !choices.contains(&v) => Err(TopError::validation(
            param,
            format!("The value you selected is not a valid choice: '{v}'."),
        )),
        _ => Ok(()),
    }
}

/// Fails if a sequence has fewer than `min` or more than `max` elements.
pub fn count<T>(param: &str, items: &[T], min: usize, max: usize) -> Result<()> {
    let len = items.len();
    if len < min || len > max {
        return Err(TopError::validation(
            param,
            format!("This collection should contain between {min} and {max} elements, got {len}."),
        ));
    }
    Ok(())
}
