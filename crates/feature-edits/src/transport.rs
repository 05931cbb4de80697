//! The transport collaborator that executes requests.
//!
//! Retry/backoff, authentication and connection management belong to the
//! implementor. An [`EditBatch`](crate::EditBatch) issues exactly one
//! [`Transport::send`] per submission and never retries on its own.

use std::sync::Arc;

use async_trait::async_trait;

use crate::codec::Query;
use crate::error::TransportError;

/// HTTP method of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Method {
    #[default]
    Post,
}

/// Expected response body encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseType {
    #[default]
    Json,
}

/// Options for one request.
///
/// The `query` is sent form-encoded as the POST body, with `None`-valued
/// keys omitted (see [`Query::encode_form`]).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RequestOptions {
    pub query: Query,
    pub method: Method,
    pub response_type: ResponseType,
}

impl RequestOptions {
    /// Creates a JSON POST request carrying the given query.
    pub fn post(query: Query) -> Self {
        Self {
            query,
            method: Method::Post,
            response_type: ResponseType::Json,
        }
    }
}

/// A completed response. `data` is the parsed JSON body, if any.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Response {
    pub data: Option<serde_json::Value>,
}

impl Response {
    /// Wraps a parsed JSON body.
    pub fn json(data: serde_json::Value) -> Self {
        Self { data: Some(data) }
    }
}

/// Executes requests against the feature service.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends a request, applying the implementor's retry policy.
    ///
    /// Returns an error only once that policy is exhausted.
    async fn send(&self, url: &str, options: RequestOptions) -> Result<Response, TransportError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for &T {
    async fn send(&self, url: &str, options: RequestOptions) -> Result<Response, TransportError> {
        (**self).send(url, options).await
    }
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn send(&self, url: &str, options: RequestOptions) -> Result<Response, TransportError> {
        (**self).send(url, options).await
    }
}
