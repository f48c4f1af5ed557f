//! Outbound calls to a backend service.
//!
//! # Design Decisions
//! - One shared `reqwest::Client` (connection pooling) for all upstreams
//! - Bodies are read fully into `Bytes`, which returns the connection to
//!   the pool on every exit path
//! - No retries and no per-call timeout: a failed call fails the request

use std::time::Instant;

use axum::body::Bytes;
use axum::http::{header, HeaderValue, StatusCode};
use thiserror::Error;
use url::Url;

use crate::http::X_REQUEST_ID;
use crate::observability::metrics;

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("{service} base URL cannot take path segments: {url}")]
    InvalidBase { service: &'static str, url: Url },

    #[error("request to {service} failed: {source}")]
    Transport {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },
}

/// Raw upstream reply: status, content type and body bytes.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub content_type: Option<HeaderValue>,
    pub body: Bytes,
}

/// A backend service exposing one REST collection.
#[derive(Debug, Clone)]
pub struct Upstream {
    service: &'static str,
    resource: &'static str,
    base: Url,
    client: reqwest::Client,
}

impl Upstream {
    /// `service` names the backend in logs/metrics; `resource` is the
    /// collection path segment (e.g. `users`).
    pub fn new(
        service: &'static str,
        resource: &'static str,
        base: Url,
        client: reqwest::Client,
    ) -> Self {
        Self {
            service,
            resource,
            base,
            client,
        }
    }

    pub fn service(&self) -> &'static str {
        self.service
    }

    pub fn resource(&self) -> &'static str {
        self.resource
    }

    /// `<base>/<resource>` or `<base>/<resource>/<id>`, with `id`
    /// percent-encoded as a single path segment.
    pub fn url_for(&self, id: Option<&str>) -> Result<Url, UpstreamError> {
        let mut url = self.base.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| UpstreamError::InvalidBase {
                service: self.service,
                url: self.base.clone(),
            })?;
            segments.pop_if_empty().push(self.resource);
            if let Some(id) = id {
                segments.push(id);
            }
        }
        Ok(url)
    }

    pub async fn get(
        &self,
        id: Option<&str>,
        request_id: Option<&str>,
    ) -> Result<UpstreamResponse, UpstreamError> {
        let url = self.url_for(id)?;
        self.send(self.client.get(url), request_id).await
    }

    /// POST `body` unmodified, labelled as JSON.
    pub async fn post_json(
        &self,
        body: Bytes,
        request_id: Option<&str>,
    ) -> Result<UpstreamResponse, UpstreamError> {
        let url = self.url_for(None)?;
        let builder = self
            .client
            .post(url)
            .header(header::CONTENT_TYPE, "application/json")
            .body(body);
        self.send(builder, request_id).await
    }

    async fn send(
        &self,
        mut builder: reqwest::RequestBuilder,
        request_id: Option<&str>,
    ) -> Result<UpstreamResponse, UpstreamError> {
        if let Some(id) = request_id {
            builder = builder.header(X_REQUEST_ID, id);
        }

        let start = Instant::now();
        let result = async {
            let response = builder.send().await?;
            let status = response.status();
            let content_type = response.headers().get(header::CONTENT_TYPE).cloned();
            let body = response.bytes().await?;
            Ok::<_, reqwest::Error>(UpstreamResponse {
                status,
                content_type,
                body,
            })
        }
        .await;

        match result {
            Ok(response) => {
                metrics::record_upstream(self.service, response.status.as_str(), start.elapsed());
                Ok(response)
            }
            Err(source) => {
                metrics::record_upstream(self.service, "error", start.elapsed());
                Err(UpstreamError::Transport {
                    service: self.service,
                    source,
                })
            }
        }
    }
}
