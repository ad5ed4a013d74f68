//! Translation of gateway failures into HTTP responses.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use recetas_core::RecipeError;

use super::ErrorResponse;
use crate::config::Environment;

pub const NOT_FOUND_MESSAGE: &str = "Endpoint no encontrado";
pub const INTERNAL_MESSAGE: &str = "Error interno del servidor";
pub const RECIPE_NOT_FOUND_MESSAGE: &str = "Receta no encontrada";

/// An error on its way to the caller.
///
/// `error` is always safe to show. `details` carries internal text and is only
/// attached in development.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    error: String,
    details: Option<String>,
}

impl ApiError {
    pub fn new(status: StatusCode, error: impl Into<String>) -> Self {
        Self {
            status,
            error: error.into(),
            details: None,
        }
    }

    fn with_details(mut self, details: String, environment: Environment) -> Self {
        if environment.is_development() {
            self.details = Some(details);
        }
        self
    }

    /// Map a gateway error. `failure_message` is what the caller sees for
    /// generation and persistence failures.
    pub fn from_recipe(err: RecipeError, failure_message: &str, environment: Environment) -> Self {
        match &err {
            RecipeError::Validation(message) => Self::new(StatusCode::BAD_REQUEST, message.clone()),
            RecipeError::NotFound(_) => Self::new(StatusCode::NOT_FOUND, RECIPE_NOT_FOUND_MESSAGE),
            RecipeError::Generation(_) => {
                tracing::error!(error = %err, "Recipe generation failed");
                Self::new(StatusCode::BAD_GATEWAY, failure_message)
                    .with_details(err.to_string(), environment)
            }
            RecipeError::Persistence(_) => {
                tracing::error!(error = %err, "Recipe store failed");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, failure_message)
                    .with_details(err.to_string(), environment)
            }
        }
    }

    pub fn from_json_rejection(rejection: JsonRejection, environment: Environment) -> Self {
        tracing::debug!(error = %rejection.body_text(), "Rejected request body");
        let (status, message) = if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            (StatusCode::PAYLOAD_TOO_LARGE, "Cuerpo de la petición demasiado grande")
        } else {
            (StatusCode::BAD_REQUEST, "JSON inválido")
        };
        Self::new(status, message).with_details(rejection.body_text(), environment)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                error: self.error,
                details: self.details,
            }),
        )
            .into_response()
    }
}
