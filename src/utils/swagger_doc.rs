use crate::utils::error::AppError;
use rocket_okapi::okapi::openapi3::{Response, Responses, MediaType};
use rocket_okapi::response::OpenApiResponderInner;
use rocket_okapi::gen::OpenApiGenerator;
use rocket_okapi::okapi::openapi3::RefOr;
use okapi::openapi3::SchemaObject;
use indexmap::IndexMap;
use serde_json::json;

impl<'r> OpenApiResponderInner for AppError {
    fn responses(_gen: &mut OpenApiGenerator) -> rocket_okapi::Result<Responses> {
        let mut responses = Responses::default();

        // Define error responses
        let error_responses = [
            ("Bad Request", AppError::ValidationError("Please fill in date and time fields".to_string())),
            ("Unauthorized", AppError::AuthError("Missing bearer token".to_string())),
            ("Forbidden", AppError::Forbidden("STUDENT users cannot delete snags".to_string())),
            ("NotFound", AppError::NotFound("Unknown resource: hangars".to_string())),
            ("Unprocessable", AppError::Unprocessable("Unprocessable".to_string())),
            (
                "Bad Gateway",
                AppError::Upstream {
                    status: Some(409),
                    message: "Failed to create flight session".to_string(),
                },
            ),
            ("InternalServerError", AppError::ConfigError("JWT_SECRET must be set".to_string())),
        ];

        for (description, error) in error_responses {
            responses.responses.insert(
                error.status().code.to_string(),
                RefOr::Object(Response {
                    description: description.to_string(),
                    content: {
                        let mut content = IndexMap::new();
                        content.insert(
                            "application/json".to_string(),
                            MediaType {
                                schema: Some(SchemaObject::default()),
                                example: Some(json!({
                                    "error": error.to_string()
                                })),
                                ..Default::default()
                            },
                        );
                        content
                    },
                    ..Default::default()
                }),
            );
        }

        Ok(responses)
    }
}
