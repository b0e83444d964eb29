use std::str::FromStr;

use rocket::serde::json::{Json, Value};
use rocket::State;
use rocket_okapi::openapi;

use crate::models::resource::{ListQuery, Resource};
use crate::services::resource_service::ResourceService;
use crate::utils::error::{AppError, AppResult};
use crate::utils::jwt::SchoolContext;

fn parse_resource(segment: &str) -> AppResult<Resource> {
    Resource::from_str(segment)
        .map_err(|_| AppError::NotFound(format!("Unknown resource: {}", segment)))
}

/// List a collection (aircrafts, simulators, maintenance-logs, incidents, snags, students, teachers, payments)
#[openapi(tag = "Resources")]
#[get("/<resource>?<query..>")]
pub async fn list_resources(
    resource: &str,
    query: ListQuery,
    ctx: SchoolContext,
    resource_service: &State<ResourceService>,
) -> Result<Json<Vec<Value>>, AppError> {
    let items = resource_service
        .list(&ctx, parse_resource(resource)?, &query)
        .await?;
    Ok(Json(items))
}

/// Fetch one record
#[openapi(tag = "Resources")]
#[get("/<resource>/<id>")]
pub async fn get_resource(
    resource: &str,
    id: &str,
    ctx: SchoolContext,
    resource_service: &State<ResourceService>,
) -> Result<Json<Value>, AppError> {
    let item = resource_service.get(&ctx, parse_resource(resource)?, id).await?;
    Ok(Json(item))
}

/// Create a record in the caller's school
#[openapi(tag = "Resources")]
#[post("/<resource>", format = "json", data = "<body>")]
pub async fn create_resource(
    resource: &str,
    body: Json<Value>,
    ctx: SchoolContext,
    resource_service: &State<ResourceService>,
) -> Result<Json<Value>, AppError> {
    let created = resource_service
        .create(&ctx, parse_resource(resource)?, body.into_inner())
        .await?;
    Ok(Json(created))
}

/// Replace a record
#[openapi(tag = "Resources")]
#[put("/<resource>/<id>", format = "json", data = "<body>")]
pub async fn update_resource(
    resource: &str,
    id: &str,
    body: Json<Value>,
    ctx: SchoolContext,
    resource_service: &State<ResourceService>,
) -> Result<Json<Value>, AppError> {
    let updated = resource_service
        .update(&ctx, parse_resource(resource)?, id, body.into_inner())
        .await?;
    Ok(Json(updated))
}

/// Delete a record
#[openapi(tag = "Resources")]
#[delete("/<resource>/<id>")]
pub async fn delete_resource(
    resource: &str,
    id: &str,
    ctx: SchoolContext,
    resource_service: &State<ResourceService>,
) -> Result<Json<Value>, AppError> {
    let deleted = resource_service
        .delete(&ctx, parse_resource(resource)?, id)
        .await?;
    Ok(Json(deleted))
}

/// Update a sub-resource, e.g. `PATCH /snags/<id>/resolve`
#[openapi(tag = "Resources")]
#[patch("/<resource>/<id>/<subresource>", format = "json", data = "<body>")]
pub async fn patch_resource(
    resource: &str,
    id: &str,
    subresource: &str,
    body: Json<Value>,
    ctx: SchoolContext,
    resource_service: &State<ResourceService>,
) -> Result<Json<Value>, AppError> {
    let updated = resource_service
        .patch_subresource(&ctx, parse_resource(resource)?, id, subresource, body.into_inner())
        .await?;
    Ok(Json(updated))
}
