use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    Json,
};
use serde_json::Value;

use service::registry::{Ad, NewAd};

use crate::errors::ApiError;
use crate::routes::AppState;

/// Create an ad from a JSON body carrying `title`, `description`, `owner`.
pub async fn create_ad(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<Ad>), ApiError> {
    let data = decode_json_body(&headers, &body)?;
    let input = NewAd::from_json(&data)?;
    let ad = state.ads.create(input).await;
    Ok((StatusCode::CREATED, Json(ad)))
}

/// Fetch an ad by id.
pub async fn get_ad(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Ad>, ApiError> {
    let id = parse_ad_id(&id)?;
    match state.ads.get(id).await {
        Some(ad) => Ok(Json(ad)),
        None => Err(ApiError::NotFound("Ad not found".into())),
    }
}

/// Delete an ad by id.
pub async fn delete_ad(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_ad_id(&id)?;
    if state.ads.delete(id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound("Ad not found".into()))
    }
}

/// The body must declare and decode as JSON before any field validation runs.
fn decode_json_body(headers: &HeaderMap, body: &Bytes) -> Result<Value, ApiError> {
    let is_json = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.split(';').next().unwrap_or("").trim().eq_ignore_ascii_case("application/json"))
        .unwrap_or(false);
    if !is_json {
        return Err(ApiError::BadRequest("Request body must be JSON".into()));
    }
    serde_json::from_slice(body).map_err(|_| ApiError::BadRequest("Malformed JSON".into()))
}

/// Id segments are constrained to plain decimal syntax; anything else gets
/// the same generic response as a path that matched no route.
fn parse_ad_id(raw: &str) -> Result<u64, ApiError> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ApiError::NotFound("Not Found".into()));
    }
    // A digit string too large for u64 addresses no stored ad
    raw.parse::<u64>().map_err(|_| ApiError::NotFound("Ad not found".into()))
}
