use axum::{
    extract::Request,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use models::{Appointment, AppointmentFilter, CreateAppointmentRequest};
use serde::Deserialize;
use tracing::info;

use super::{fetch, not_implemented, parse_json, parse_query, read_body, remove, Dispatch};
use crate::{
    auth::{authenticate, Principal},
    errors::ApiError,
    state::AppState,
};

#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// Client id; `clientId` is accepted too.
    #[serde(default, alias = "clientId")]
    pub client: Option<String>,
    /// Business id; `businessId` is accepted too.
    #[serde(default, alias = "businessId")]
    pub business: Option<String>,
}

impl From<ListQuery> for AppointmentFilter {
    fn from(q: ListQuery) -> Self {
        Self { client_id: q.client, business_id: q.business }
    }
}

pub(crate) async fn route(state: &AppState, action: Dispatch, req: Request) -> Result<Response, ApiError> {
    match action {
        Dispatch::List => Ok(list(state, parse_query(req.uri())?).await?.into_response()),
        Dispatch::Get(id) => Ok(get(state, &id).await?.into_response()),
        Dispatch::Create => {
            let principal = authenticate(state, req.headers()).await?;
            let body = read_body(state, req.into_body()).await?;
            Ok(create(state, principal, &body).await?.into_response())
        }
        Dispatch::UploadImage(_) => Err(ApiError::not_implemented("image upload not supported for appointments")),
        Dispatch::GetImage(..) => Err(ApiError::not_implemented("images not supported for appointments")),
        Dispatch::Delete(id) => {
            let principal = authenticate(state, req.headers()).await?;
            Ok(delete(state, principal, &id).await?.into_response())
        }
        Dispatch::NotImplemented(method) => Err(not_implemented(&method)),
    }
}

#[utoipa::path(
    get, path = "/appointments/", tag = "appointments",
    params(ListQuery),
    responses(
        (status = 200, description = "Appointments", body = [crate::openapi::AppointmentDoc]),
        (status = 500, description = "Store failure")
    )
)]
pub async fn list(state: &AppState, query: ListQuery) -> Result<Json<Vec<Appointment>>, ApiError> {
    Ok(Json(state.appointments.list(&query.into()).await?))
}

#[utoipa::path(
    get, path = "/appointments/{id}", tag = "appointments",
    params(("id" = String, Path, description = "Appointment id")),
    responses(
        (status = 200, description = "Appointment", body = crate::openapi::AppointmentDoc),
        (status = 404, description = "appointment not found")
    )
)]
pub async fn get(state: &AppState, id: &str) -> Result<Json<Appointment>, ApiError> {
    fetch(&state.appointments, id).await
}

/// Dates strictly in the past are rejected; client and business ids are
/// not checked against their collections.
#[utoipa::path(
    post, path = "/appointments/", tag = "appointments",
    request_body = crate::openapi::CreateAppointmentDoc,
    responses(
        (status = 200, description = "Created", body = crate::openapi::AppointmentDoc),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthenticated")
    ),
    security(("bearer" = []))
)]
pub async fn create(state: &AppState, principal: Principal, body: &[u8]) -> Result<Json<Appointment>, ApiError> {
    let input: CreateAppointmentRequest = parse_json(body)?;
    let created = state.appointments.create(input.into_new(Utc::now())?).await?;
    info!(id = %created.id, user = %principal.id, business = %created.business_id, "appointment booked");
    Ok(Json(created))
}

#[utoipa::path(
    delete, path = "/appointments/{id}", tag = "appointments",
    params(("id" = String, Path, description = "Appointment id")),
    responses(
        (status = 200, description = "successful deletion"),
        (status = 401, description = "Unauthenticated")
    ),
    security(("bearer" = []))
)]
pub async fn delete(state: &AppState, principal: Principal, id: &str) -> Result<Json<&'static str>, ApiError> {
    remove(&state.appointments, &principal, id).await
}
