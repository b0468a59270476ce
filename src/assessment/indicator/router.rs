use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{IndicatorDefinition, IndicatorId};
use super::repository::{IndicatorRepository, RepositoryError};
use super::service::{IndicatorValidationService, ValidationServiceError};
use crate::assessment::calculation::{CalculationSchema, FieldResponses};

/// Router builder exposing the indicator registry, submission validation,
/// and the authoring test-calculation panel.
pub fn indicator_router<R>(service: Arc<IndicatorValidationService<R>>) -> Router
where
    R: IndicatorRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/indicators",
            post(register_handler::<R>).get(list_handler::<R>),
        )
        .route(
            "/api/v1/indicators/calculation/test",
            post(test_calculation_handler::<R>),
        )
        .route("/api/v1/indicators/:indicator_id", get(get_handler::<R>))
        .route(
            "/api/v1/indicators/:indicator_id/validate",
            post(validate_handler::<R>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct ValidateRequest {
    pub(crate) responses: FieldResponses,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TestCalculationRequest {
    pub(crate) calculation: CalculationSchema,
    pub(crate) responses: FieldResponses,
}

async fn register_handler<R>(
    State(service): State<Arc<IndicatorValidationService<R>>>,
    axum::Json(definition): axum::Json<IndicatorDefinition>,
) -> Response
where
    R: IndicatorRepository + 'static,
{
    let id = definition.id.clone();
    match service.register(definition) {
        Ok(()) => {
            let payload = json!({ "indicator_id": id.0, "registered": true });
            (StatusCode::CREATED, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

async fn list_handler<R>(State(service): State<Arc<IndicatorValidationService<R>>>) -> Response
where
    R: IndicatorRepository + 'static,
{
    match service.list() {
        Ok(definitions) => (StatusCode::OK, axum::Json(definitions)).into_response(),
        Err(error) => error_response(error),
    }
}

async fn get_handler<R>(
    State(service): State<Arc<IndicatorValidationService<R>>>,
    Path(indicator_id): Path<String>,
) -> Response
where
    R: IndicatorRepository + 'static,
{
    match service.get(&IndicatorId(indicator_id)) {
        Ok(definition) => (StatusCode::OK, axum::Json(definition)).into_response(),
        Err(error) => error_response(error),
    }
}

async fn validate_handler<R>(
    State(service): State<Arc<IndicatorValidationService<R>>>,
    Path(indicator_id): Path<String>,
    axum::Json(request): axum::Json<ValidateRequest>,
) -> Response
where
    R: IndicatorRepository + 'static,
{
    let id = IndicatorId(indicator_id);
    match service.validate(&id, &request.responses) {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(error) => error_response(error),
    }
}

async fn test_calculation_handler<R>(
    State(service): State<Arc<IndicatorValidationService<R>>>,
    axum::Json(request): axum::Json<TestCalculationRequest>,
) -> Response
where
    R: IndicatorRepository + 'static,
{
    match service.test_calculation(request.calculation, &request.responses) {
        Ok(outcome) => (StatusCode::OK, axum::Json(outcome)).into_response(),
        Err(error) => error_response(ValidationServiceError::Calculation(error)),
    }
}

fn error_response(error: ValidationServiceError) -> Response {
    let status = match &error {
        ValidationServiceError::SchemaWithoutGroups
        | ValidationServiceError::GroupWithoutRules { .. }
        | ValidationServiceError::Calculation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ValidationServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        ValidationServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        ValidationServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}
