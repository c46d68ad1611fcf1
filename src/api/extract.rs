//! Request body extraction

use axum::extract::FromRequest;

use crate::error::AppError;

/// JSON body whose rejections (bad syntax, missing or mistyped fields, wrong
/// content type) answer with the regular `BadValue` error body
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ValidJson<T>(pub T);
