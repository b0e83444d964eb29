#[macro_use]
extern crate rocket;
extern crate rocket_okapi;

pub mod config;
pub mod models;
pub mod routes;
pub mod services;
pub mod swagger;
pub mod utils;

use std::sync::Arc;

use rocket::fairing::AdHoc;
use rocket::{Build, Rocket};
use rocket_okapi::openapi_get_routes;
use rocket_okapi::swagger_ui::make_swagger_ui;

use crate::config::AppConfig;
use crate::services::flight_session_service::FlightSessionService;
use crate::services::persistence::PersistenceApi;
use crate::services::recorder::FlightSessionRecorder;
use crate::services::resource_service::ResourceService;
use crate::swagger::swagger_ui;

/// Assembles the gateway around a persistence API implementation.
pub fn build_rocket(config: AppConfig, api: Arc<dyn PersistenceApi>) -> Rocket<Build> {
    let recorder = FlightSessionRecorder::new(config.recorder);
    let flight_service = FlightSessionService::new(api.clone(), recorder);
    let resource_service = ResourceService::new(api);

    rocket::build()
        .manage(config)
        .manage(flight_service)
        .manage(resource_service)
        .mount(
            "/api",
            openapi_get_routes![
                routes::flight_session_route::preview_flight_session,
                routes::flight_session_route::create_flight_session,
                routes::flight_session_route::update_flight_session,
                routes::flight_session_route::list_flight_sessions,
                routes::flight_session_route::flight_session_form_options,
                routes::flight_session_route::get_flight_session,
                routes::flight_session_route::delete_flight_session,
                routes::flight_session_route::change_flight_session_status,
                routes::resource_route::list_resources,
                routes::resource_route::get_resource,
                routes::resource_route::create_resource,
                routes::resource_route::update_resource,
                routes::resource_route::delete_resource,
                routes::resource_route::patch_resource,
            ],
        )
        .mount("/swagger", make_swagger_ui(&swagger_ui()))
        .register("/", routes::catchers())
        .attach(AdHoc::on_response("CORS", |_, res| {
            Box::pin(async move {
                res.set_header(rocket::http::Header::new(
                    "Access-Control-Allow-Origin",
                    "*",
                ));
                res.set_header(rocket::http::Header::new(
                    "Access-Control-Allow-Headers",
                    "Authorization, Content-Type",
                ));
                res.set_header(rocket::http::Header::new(
                    "Access-Control-Allow-Methods",
                    "GET, POST, PUT, PATCH, DELETE, OPTIONS",
                ));
            })
        }))
}
