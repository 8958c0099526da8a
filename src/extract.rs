//! Request extractors that report rejections as [Error]s.
//!
//! Axum's own `Json` and `Path` extractors reply with plain text and, for
//! some JSON problems, 422 Unprocessable Entity. These wrappers turn every
//! rejection into an [Error::BadRequest] so clients always get a 400 with a
//! JSON error body.

use axum::extract::{FromRequest, FromRequestParts};

use crate::Error;

/// Like [axum::Json], but rejects with [Error::BadRequest].
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(Error))]
pub struct ApiJson<T>(pub T);

/// Like [axum::extract::Path], but rejects with [Error::BadRequest].
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(Error))]
pub struct ApiPath<T>(pub T);
