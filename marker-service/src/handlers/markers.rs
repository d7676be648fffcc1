use crate::dtos::{MarkerRequest, MarkerResponse};
use crate::services::StoreError;
use crate::startup::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;
use service_core::error::AppError;
use std::fmt::Display;

pub const DUPLICATED_ID: &str = "duplicated id";
pub const ID_MISMATCH: &str = "id in path and body doesn't match";

fn client_error(marker_id: &str, message: impl Display) -> AppError {
    tracing::info!(marker_id = %marker_id, error = %message, "Rejected marker request");
    AppError::bad_request(message)
}

fn store_error(marker_id: Option<&str>, err: StoreError) -> AppError {
    match err {
        StoreError::DuplicateKey(id) => client_error(&id, DUPLICATED_ID),
        StoreError::Backend(e) => {
            tracing::error!(
                marker_id = marker_id.unwrap_or("-"),
                error = %format!("{:#}", e),
                "Marker store operation failed"
            );
            AppError::ServiceUnavailable(e)
        }
    }
}

pub async fn list_markers(
    State(state): State<AppState>,
) -> Result<Json<Vec<MarkerResponse>>, AppError> {
    let markers = state
        .store
        .list()
        .await
        .map_err(|e| store_error(None, e))?;

    Ok(Json(
        markers.into_iter().map(MarkerResponse::from).collect(),
    ))
}

pub async fn create_marker(
    State(state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<MarkerRequest>, AppError>,
) -> Result<StatusCode, AppError> {
    let marker = payload.normalize();
    marker
        .validate()
        .map_err(|e| client_error(&marker.id, e))?;

    state
        .store
        .insert(&marker)
        .await
        .map_err(|e| store_error(Some(&marker.id), e))?;

    tracing::info!(
        marker_id = %marker.id,
        images = marker.images.len(),
        "Marker created"
    );

    Ok(StatusCode::CREATED)
}

/// Requests to `/api/v1/markers/` carry no path parameter and are handled
/// as an empty id.
fn path_id(id: Option<Path<String>>) -> String {
    id.map(|Path(id)| id).unwrap_or_default()
}

pub async fn update_marker(
    State(state): State<AppState>,
    id: Option<Path<String>>,
    WithRejection(Json(payload), _): WithRejection<Json<MarkerRequest>, AppError>,
) -> Result<StatusCode, AppError> {
    let id = path_id(id);
    if payload.id != id {
        return Err(client_error(&id, ID_MISMATCH));
    }

    let marker = payload.normalize();
    marker.validate().map_err(|e| client_error(&id, e))?;

    let matched = state
        .store
        .replace(&marker)
        .await
        .map_err(|e| store_error(Some(&id), e))?;

    if matched {
        tracing::info!(marker_id = %id, "Marker replaced");
    } else {
        tracing::info!(marker_id = %id, "Replace matched no marker");
    }

    Ok(StatusCode::OK)
}

pub async fn delete_marker(
    State(state): State<AppState>,
    id: Option<Path<String>>,
) -> Result<StatusCode, AppError> {
    let id = path_id(id);
    let deleted = state
        .store
        .delete(&id)
        .await
        .map_err(|e| store_error(Some(&id), e))?;

    if deleted {
        tracing::info!(marker_id = %id, "Marker deleted");
    } else {
        tracing::info!(marker_id = %id, "Delete matched no marker");
    }

    Ok(StatusCode::OK)
}
