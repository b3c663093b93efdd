//! Route table and request handlers.

use axum::{
    extract::{Path as AxumPath, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use utoipa::{IntoParams, OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;
use uuid::Uuid;

use spectrum_types::{
    CaseSummary, CategoryGroup, Complainant, ComplainantInput, ComplainantSummary, Complaint,
    ComplaintInput, ErrorBody, PatientSummary, SubCategory,
};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(
        health,
        list_complaint_categories,
        list_patients,
        list_cases,
        list_complainants,
        create_complainant,
        get_complainant,
        create_complaint,
        get_complaint,
    ),
    components(schemas(
        HealthRes,
        CategoryGroup,
        SubCategory,
        PatientSummary,
        CaseSummary,
        Complainant,
        ComplainantSummary,
        ComplainantInput,
        Complaint,
        ComplaintInput,
        ErrorBody,
    ))
)]
pub struct ApiDoc;

/// Builds the REST router with all routes, Swagger UI, and CORS applied.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/complaint-categories", get(list_complaint_categories))
        .route("/patients", get(list_patients))
        .route("/cases", get(list_cases))
        .route("/complainants", get(list_complainants))
        .route("/complainants", post(create_complainant))
        .route("/complainants/:id", get(get_complainant))
        .route("/complaints", post(create_complaint))
        .route("/complaints/:id", get(get_complaint))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

/// Free-text search query.
#[derive(Debug, Deserialize, IntoParams)]
pub struct SearchQuery {
    /// Partial match term; omitting it lists all records.
    pub q: Option<String>,
}

/// Patient scope for case listing.
#[derive(Debug, Deserialize, IntoParams)]
pub struct CaseQuery {
    pub patient_id: Option<Uuid>,
}

#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Health check response", body = HealthRes))
)]
async fn health() -> Json<HealthRes> {
    Json(HealthRes {
        ok: true,
        message: "Spectrum REST API is alive".into(),
    })
}

#[utoipa::path(
    get,
    path = "/complaint-categories",
    responses(
        (status = 200, description = "Category taxonomy grouped by main category", body = [CategoryGroup]),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
async fn list_complaint_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<CategoryGroup>>, ApiError> {
    Ok(Json(state.categories().list_grouped()?))
}

#[utoipa::path(
    get,
    path = "/patients",
    params(SearchQuery),
    responses(
        (status = 200, description = "Matching patients", body = [PatientSummary]),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
async fn list_patients(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<PatientSummary>>, ApiError> {
    Ok(Json(state.patients().search(query.q.as_deref())?))
}

#[utoipa::path(
    get,
    path = "/cases",
    params(CaseQuery),
    responses(
        (status = 200, description = "Cases, scoped to a patient when patient_id is given", body = [CaseSummary]),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
async fn list_cases(
    State(state): State<AppState>,
    Query(query): Query<CaseQuery>,
) -> Result<Json<Vec<CaseSummary>>, ApiError> {
    let cases = match query.patient_id {
        Some(patient_id) => state.cases().list_for_patient(patient_id)?,
        None => state.cases().list_all()?,
    };
    Ok(Json(cases))
}

#[utoipa::path(
    get,
    path = "/complainants",
    params(SearchQuery),
    responses(
        (status = 200, description = "Matching complainants", body = [ComplainantSummary]),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
async fn list_complainants(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<ComplainantSummary>>, ApiError> {
    Ok(Json(state.complainants().search(query.q.as_deref())?))
}

#[utoipa::path(
    post,
    path = "/complainants",
    request_body = ComplainantInput,
    responses(
        (status = 201, description = "Complainant created", body = Complainant),
        (status = 400, description = "A field failed validation", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
async fn create_complainant(
    State(state): State<AppState>,
    Json(input): Json<ComplainantInput>,
) -> Result<(StatusCode, Json<Complainant>), ApiError> {
    let created = state.complainants().create(&input)?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get,
    path = "/complainants/{id}",
    params(("id" = Uuid, Path, description = "Complainant id")),
    responses(
        (status = 200, description = "Complainant with address", body = Complainant),
        (status = 404, description = "Complainant not found", body = ErrorBody)
    )
)]
async fn get_complainant(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<Uuid>,
) -> Result<Json<Complainant>, ApiError> {
    Ok(Json(state.complainants().get(id)?))
}

#[utoipa::path(
    post,
    path = "/complaints",
    request_body = ComplaintInput,
    responses(
        (status = 201, description = "Complaint created with related entities embedded", body = Complaint),
        (status = 400, description = "A field failed validation or references a missing entity", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
async fn create_complaint(
    State(state): State<AppState>,
    Json(input): Json<ComplaintInput>,
) -> Result<(StatusCode, Json<Complaint>), ApiError> {
    let created = state.complaints().create(&input)?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get,
    path = "/complaints/{id}",
    params(("id" = Uuid, Path, description = "Complaint id")),
    responses(
        (status = 200, description = "Complaint with related entities embedded", body = Complaint),
        (status = 404, description = "Complaint not found", body = ErrorBody)
    )
)]
async fn get_complaint(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<Uuid>,
) -> Result<Json<Complaint>, ApiError> {
    Ok(Json(state.complaints().get(id)?))
}
