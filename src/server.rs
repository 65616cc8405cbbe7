//! HTTP API over the string service.
//!
//! ## Endpoints
//! - GET  /api/strings?query=...      - List strings
//! - POST /api/add                    - Add a string (form: key, value)
//! - POST /api/edit                   - Edit a string (form: key, value, lang)
//! - POST /api/remove                 - Remove a string (form: key)
//! - PUT  /api/showTranslations       - Toggle translations (form: show)

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post, put},
    Form, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::error::CatalogError;
use crate::listing::Listing;
use crate::service::StringService;

/// API error response
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Error returned by handlers, mapped to a status code by kind.
#[derive(Debug)]
pub struct ApiError(CatalogError);

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = if self.0.is_validation() {
            StatusCode::BAD_REQUEST
        } else {
            error!("Request failed: {}", self.0);
            StatusCode::INTERNAL_SERVER_ERROR
        };
        let body = ErrorResponse {
            error: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub query: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AddForm {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub value: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AddResponse {
    pub key: String,
}

#[derive(Debug, Deserialize)]
pub struct EditForm {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub lang: String,
}

#[derive(Debug, Deserialize)]
pub struct RemoveForm {
    #[serde(default)]
    pub key: String,
}

#[derive(Debug, Deserialize)]
pub struct ShowTranslationsForm {
    #[serde(default)]
    pub show: String,
}

/// Creates the API router
pub fn create_router(service: Arc<StringService>) -> Router {
    Router::new()
        .route("/api/strings", get(get_strings))
        .route("/api/add", post(add_string))
        .route("/api/edit", post(edit_string))
        .route("/api/remove", post(remove_string))
        .route("/api/showTranslations", put(set_show_translations))
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

async fn get_strings(
    State(service): State<Arc<StringService>>,
    Query(query): Query<ListQuery>,
) -> Json<Listing> {
    Json(service.list_strings(query.query.as_deref()).await)
}

async fn add_string(
    State(service): State<Arc<StringService>>,
    Form(form): Form<AddForm>,
) -> Result<(StatusCode, Json<AddResponse>), ApiError> {
    let key = service.add_string(Some(form.key.as_str()), &form.value).await?;
    Ok((StatusCode::CREATED, Json(AddResponse { key })))
}

async fn edit_string(
    State(service): State<Arc<StringService>>,
    Form(form): Form<EditForm>,
) -> Result<StatusCode, ApiError> {
    service
        .edit_string(&form.key, &form.value, &form.lang)
        .await?;
    Ok(StatusCode::OK)
}

async fn remove_string(
    State(service): State<Arc<StringService>>,
    Form(form): Form<RemoveForm>,
) -> Result<StatusCode, ApiError> {
    service.remove_string(&form.key).await?;
    Ok(StatusCode::OK)
}

async fn set_show_translations(
    State(service): State<Arc<StringService>>,
    Form(form): Form<ShowTranslationsForm>,
) -> StatusCode {
    info!("PUT /api/showTranslations (show={})", form.show);
    service.set_show_translations(form.show == "true").await;
    StatusCode::OK
}
