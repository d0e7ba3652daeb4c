//! HTTP request handlers
//!
//! Axum handlers for the listing page, manifest endpoint and artifact
//! downloads.

use super::SharedState;
use super::page::render_listing;
use axum::body::Body;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::response::{Html, IntoResponse, Redirect, Response};
use ota_core::listing::build_listing;
use ota_core::trigger::ClientCapabilities;
use ota_core::{OtaError, RequestHeaders, manifest};
use ota_schema::{DOWNLOADS_PREFIX, ManifestRequest};
use serde::Deserialize;
use tokio_util::io::ReaderStream;

/// Query string of the manifest endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestParams {
    pub file: Option<String>,
    pub bundle_id: Option<String>,
    pub version: Option<String>,
    pub title: Option<String>,
}

/// Error response: status from the error, plain-text body.
#[derive(Debug)]
pub struct ApiError(pub OtaError);

impl From<OtaError> for ApiError {
    fn from(err: OtaError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = match &self.0 {
            OtaError::Io(e) => {
                tracing::error!(error = %e, "request failed");
                "Internal server error".to_string()
            }
            OtaError::InvalidName(_) | OtaError::NotFound(_) => "Not found".to_string(),
            other => other.to_string(),
        };
        (status, body).into_response()
    }
}

/// Pick the addressing headers out of a request.
pub fn request_headers(headers: &HeaderMap) -> RequestHeaders<'_> {
    let get = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());
    RequestHeaders {
        host: get(header::HOST.as_str()),
        forwarded_proto: get("x-forwarded-proto"),
        forwarded: get(header::FORWARDED.as_str()),
    }
}

/// `GET /` redirects to the listing
pub async fn index() -> Redirect {
    Redirect::to(DOWNLOADS_PREFIX)
}

/// `GET /downloads` - HTML listing of the store
pub async fn listing(State(state): State<SharedState>, headers: HeaderMap) -> Html<String> {
    let caps = match state.resolver.resolve(&request_headers(&headers)) {
        Ok(host) => ClientCapabilities::for_host(&host),
        Err(e) => {
            tracing::warn!(error = %e, "listing rendered without install links");
            ClientCapabilities::headless()
        }
    };

    let registry = state.registry.clone();
    let artifacts = tokio::task::spawn_blocking(move || registry.list())
        .await
        .unwrap_or_else(|e| {
            tracing::error!(error = %e, "listing task failed");
            Vec::new()
        });
    tracing::info!(count = artifacts.len(), "downloads page accessed");

    let entries = build_listing(artifacts, &caps, &state.defaults);
    Html(render_listing(&entries))
}

/// `GET /api/manifest` - install manifest for one artifact
pub async fn manifest(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Query(params): Query<ManifestParams>,
) -> Result<Response, ApiError> {
    let filename = params.file.unwrap_or_default();
    if filename.is_empty() {
        return Err(OtaError::validation("missing file").into());
    }

    let mut req: ManifestRequest = state.defaults.request_for(filename);
    if let Some(bundle_id) = params.bundle_id {
        req = req.with_bundle_id(bundle_id);
    }
    if let Some(version) = params.version {
        req = req.with_version(version);
    }
    if let Some(title) = params.title {
        req = req.with_title(title);
    }

    let host = state.resolver.resolve(&request_headers(&headers))?;

    let registry = state.registry.clone();
    let name = req.filename.clone();
    let registered = tokio::task::spawn_blocking(move || registry.contains(&name))
        .await
        .map_err(|e| OtaError::Io(std::io::Error::other(e)))??;
    if !registered {
        return Err(OtaError::NotFound(req.filename).into());
    }

    let generated = manifest::generate(&req, &host)?;
    tracing::info!(
        file = %req.filename,
        bundle_id = %req.bundle_id,
        version = %req.version,
        asset_url = generated.asset_url(),
        "manifest generated"
    );

    Ok((
        [(header::CONTENT_TYPE, manifest::CONTENT_TYPE)],
        generated.into_string(),
    )
        .into_response())
}

/// `GET /downloads/:file` - artifact bytes
pub async fn download(
    State(state): State<SharedState>,
    Path(file): Path<String>,
) -> Result<Response, ApiError> {
    let opened = state.artifacts.fetch(&file).await?;
    tracing::info!(file = %opened.artifact.filename, bytes = opened.len, "serving artifact");

    let content_type = opened.content_type();
    let disposition = format!(
        "attachment; filename*=UTF-8''{}",
        urlencoding::encode(&opened.artifact.filename)
    );
    let mut response = Body::from_stream(ReaderStream::new(opened.file)).into_response();
    let headers = response.headers_mut();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
    headers.insert(header::CONTENT_LENGTH, HeaderValue::from(opened.len));
    if let Ok(value) = HeaderValue::from_str(&disposition) {
        headers.insert(header::CONTENT_DISPOSITION, value);
    }
    Ok(response)
}

// =============================================================================
// Tests
// =============================================================================
