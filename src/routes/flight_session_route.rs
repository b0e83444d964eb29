use rocket::serde::json::{Json, Value};
use rocket::State;
use rocket_okapi::openapi;

use crate::models::flight_session::{FlightSessionDraft, FlightSessionPreview, StatusChangeRequest};
use crate::models::reference::FlightSessionFormOptions;
use crate::models::resource::ListQuery;
use crate::services::flight_session_service::FlightSessionService;
use crate::utils::error::AppError;
use crate::utils::jwt::SchoolContext;

/// Show the duration and record a draft would produce
#[openapi(tag = "Flight Sessions")]
#[post("/flight-sessions/preview", format = "json", data = "<draft>")]
pub async fn preview_flight_session(
    draft: Json<FlightSessionDraft>,
    flight_session_service: &State<FlightSessionService>,
) -> Json<FlightSessionPreview> {
    Json(flight_session_service.preview(draft.into_inner()))
}

/// Record a flight session
#[openapi(tag = "Flight Sessions")]
#[post("/flight-sessions", format = "json", data = "<draft>")]
pub async fn create_flight_session(
    draft: Json<FlightSessionDraft>,
    ctx: SchoolContext,
    flight_session_service: &State<FlightSessionService>,
) -> Result<Json<Value>, AppError> {
    let created = flight_session_service.create(&ctx, &draft).await?;
    Ok(Json(created))
}

/// Replace a flight session
#[openapi(tag = "Flight Sessions")]
#[put("/flight-sessions/<id>", format = "json", data = "<draft>")]
pub async fn update_flight_session(
    id: &str,
    draft: Json<FlightSessionDraft>,
    ctx: SchoolContext,
    flight_session_service: &State<FlightSessionService>,
) -> Result<Json<Value>, AppError> {
    let updated = flight_session_service.update(&ctx, id, &draft).await?;
    Ok(Json(updated))
}

/// List flight sessions of the caller's school
#[openapi(tag = "Flight Sessions")]
#[get("/flight-sessions?<query..>")]
pub async fn list_flight_sessions(
    query: ListQuery,
    ctx: SchoolContext,
    flight_session_service: &State<FlightSessionService>,
) -> Result<Json<Vec<Value>>, AppError> {
    let sessions = flight_session_service.list(&ctx, &query).await?;
    Ok(Json(sessions))
}

/// Students, teachers, aircraft and simulators for the form
#[openapi(tag = "Flight Sessions")]
#[get("/flight-sessions/form-options")]
pub async fn flight_session_form_options(
    ctx: SchoolContext,
    flight_session_service: &State<FlightSessionService>,
) -> Result<Json<FlightSessionFormOptions>, AppError> {
    let options = flight_session_service.form_options(&ctx).await?;
    Ok(Json(options))
}

/// Fetch one flight session
#[openapi(tag = "Flight Sessions")]
#[get("/flight-sessions/<id>")]
pub async fn get_flight_session(
    id: &str,
    ctx: SchoolContext,
    flight_session_service: &State<FlightSessionService>,
) -> Result<Json<Value>, AppError> {
    let session = flight_session_service.get(&ctx, id).await?;
    Ok(Json(session))
}

/// Delete a flight session
#[openapi(tag = "Flight Sessions")]
#[delete("/flight-sessions/<id>")]
pub async fn delete_flight_session(
    id: &str,
    ctx: SchoolContext,
    flight_session_service: &State<FlightSessionService>,
) -> Result<Json<Value>, AppError> {
    let deleted = flight_session_service.delete(&ctx, id).await?;
    Ok(Json(deleted))
}

/// Move a flight session to another status
#[openapi(tag = "Flight Sessions")]
#[patch("/flight-sessions/<id>/status", format = "json", data = "<request>")]
pub async fn change_flight_session_status(
    id: &str,
    request: Json<StatusChangeRequest>,
    ctx: SchoolContext,
    flight_session_service: &State<FlightSessionService>,
) -> Result<Json<Value>, AppError> {
    let updated = flight_session_service
        .change_status(&ctx, id, request.into_inner().status)
        .await?;
    Ok(Json(updated))
}
