use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use common::types::MessageResponse;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use service::appointment::domain::{Appointment, FieldError};
use tracing::info;

use crate::{errors::JsonApiError, routes::ServerState};

pub const CREATED_MESSAGE: &str = "appointment created successfully";
pub const UPDATED_MESSAGE: &str = "appointment updated successfully";
pub const DELETED_MESSAGE: &str = "appointment deleted successfully";

#[derive(Debug, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub message: String,
    pub id: i32,
}

/// An absent body reads as `{}`; anything else must be valid JSON.
fn parse_body(bytes: &Bytes) -> Result<Value, JsonApiError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Default::default()));
    }
    serde_json::from_slice(bytes).map_err(|e| {
        JsonApiError::fields(vec![FieldError::body("body", format!("malformed JSON body: {e}"), None)])
    })
}

#[utoipa::path(
    get, path = "/api/agenda", tag = "agenda",
    responses(
        (status = 200, description = "All appointments", body = [crate::openapi::AppointmentDoc]),
        (status = 500, description = "Store failure", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<Appointment>>, JsonApiError> {
    let rows = state.appointments.list().await?;
    Ok(Json(rows))
}

#[utoipa::path(
    post, path = "/api/agendar", tag = "agenda",
    request_body = crate::openapi::CreateAppointmentDoc,
    responses(
        (status = 201, description = "Created", body = crate::openapi::CreatedDoc),
        (status = 400, description = "Validation or booking rule failure"),
        (status = 500, description = "Store failure", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn create(State(state): State<ServerState>, body: Bytes) -> Result<(StatusCode, Json<CreatedResponse>), JsonApiError> {
    let body = parse_body(&body)?;
    let created = state.appointments.create(&body).await?;
    info!(id = created.id, "appointment_create_ok");
    Ok((StatusCode::CREATED, Json(CreatedResponse { message: CREATED_MESSAGE.into(), id: created.id })))
}

#[utoipa::path(
    patch, path = "/api/agenda/{id}", tag = "agenda",
    params(("id" = i32, Path, description = "Appointment id")),
    request_body = crate::openapi::UpdateAppointmentDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::MessageDoc),
        (status = 400, description = "Validation, booking rule, empty or ineffective update"),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc),
        (status = 500, description = "Store failure", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn update(State(state): State<ServerState>, Path(id): Path<String>, body: Bytes) -> Result<Json<MessageResponse>, JsonApiError> {
    let body = parse_body(&body)?;
    state.appointments.update(&id, &body).await?;
    Ok(Json(MessageResponse::new(UPDATED_MESSAGE)))
}

#[utoipa::path(
    delete, path = "/api/agenda/{id}", tag = "agenda",
    params(("id" = i32, Path, description = "Appointment id")),
    responses(
        (status = 200, description = "Deleted", body = crate::openapi::MessageDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc),
        (status = 500, description = "Store failure", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn delete(State(state): State<ServerState>, Path(id): Path<String>) -> Result<Json<MessageResponse>, JsonApiError> {
    state.appointments.delete(&id).await?;
    Ok(Json(MessageResponse::new(DELETED_MESSAGE)))
}
