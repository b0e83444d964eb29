use rocket::serde::json::{json, Json, Value};
use rocket::{Catcher, Request};

pub mod flight_session_route;
pub mod resource_route;

// Guard failures never reach a handler, so answer them in the same JSON shape
#[catch(401)]
fn unauthorized(_req: &Request) -> Json<Value> {
    Json(json!({ "error": "Authentication error: missing or invalid bearer token" }))
}

#[catch(404)]
fn not_found(req: &Request) -> Json<Value> {
    Json(json!({ "error": format!("Not found: {}", req.uri()) }))
}

#[catch(422)]
fn unprocessable(_req: &Request) -> Json<Value> {
    Json(json!({ "error": "Unprocessable: request body does not match the expected shape" }))
}

#[catch(default)]
fn default_catcher(status: rocket::http::Status, _req: &Request) -> Json<Value> {
    Json(json!({ "error": status.reason().unwrap_or("Unexpected error") }))
}

pub fn catchers() -> Vec<Catcher> {
    catchers![unauthorized, not_found, unprocessable, default_catcher]
}
