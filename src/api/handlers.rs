use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    Json as RequestJson,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api::service::{FormService, SharedSession};
use crate::error::{FormError, GatewayError};
use crate::gateway::CatalogGateway;
use crate::logic::{Field, FieldOrigin, FormEngine, FormUpdate, SearchableSelector};
use crate::model::{
    top_level_categories, Category, Choice, FieldValue, FormPhase, Id, SessionId, Snapshot,
    NOT_SELECTED_LABEL,
};

pub type AppState<G> = Arc<FormService<G>>;

pub type ApiError = (StatusCode, Json<ErrorResponse>);

/// Simple health check endpoint
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: &str) -> Self {
        Self {
            error: message.to_string(),
        }
    }
}

/// Map a form error onto a status code and the message shown to the user
pub fn form_error_response(error: &FormError) -> ApiError {
    let status = match error {
        e if e.is_validation() => StatusCode::UNPROCESSABLE_ENTITY,
        FormError::Gateway(GatewayError::NetworkUnreachable(_)) => StatusCode::SERVICE_UNAVAILABLE,
        FormError::Gateway(_) => StatusCode::BAD_GATEWAY,
        // Unknown category, subcategory, field or option
        _ => StatusCode::NOT_FOUND,
    };

    if status.is_server_error() {
        log::error!("Catalog request failed: {}", error);
    }
    (status, Json(ErrorResponse::new(&error.user_message())))
}

fn session_not_found() -> ApiError {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse::new("Session not found")),
    )
}

fn find_session<G: CatalogGateway + 'static>(
    service: &FormService<G>,
    session_id: &SessionId,
) -> Result<SharedSession<G>, ApiError> {
    service.session(session_id).ok_or_else(session_not_found)
}

// --- views ---

#[derive(Debug, Serialize, Deserialize)]
pub struct FieldView {
    pub property_id: Id,
    pub name: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
    pub origin: Option<FieldOrigin>,
    pub choices: Vec<Choice>,
    pub value: FieldValue,
    pub display: String,
}

impl FieldView {
    fn from_field(field: &Field, engine: &FormEngine) -> Self {
        let selected = engine.value_of(field.id());
        Self {
            property_id: field.id(),
            name: field.property.name.clone(),
            description: field.property.description.clone(),
            kind: field.property.kind.clone(),
            origin: field.origin.clone(),
            choices: field.property.choices(),
            value: selected
                .map(|v| v.value.clone())
                .unwrap_or(FieldValue::Unset),
            display: selected
                .map(|v| v.display_name())
                .unwrap_or_else(|| NOT_SELECTED_LABEL.to_string()),
        }
    }
}

/// Everything a client needs to render the form
#[derive(Debug, Serialize, Deserialize)]
pub struct FormView {
    pub session_id: SessionId,
    pub phase: FormPhase,
    pub categories: Vec<Category>,
    pub selected_category: Option<Category>,
    pub subcategories: Vec<Category>,
    pub selected_subcategory: Option<Category>,
    pub fields: Vec<FieldView>,
    pub loading: bool,
}

impl FormView {
    pub fn new(session_id: SessionId, engine: &FormEngine) -> Self {
        Self {
            session_id,
            phase: engine.phase(),
            categories: engine.top_level_categories(),
            selected_category: engine.selected_category().cloned(),
            subcategories: engine.subcategories().to_vec(),
            selected_subcategory: engine.selected_subcategory().cloned(),
            fields: engine
                .fields()
                .iter()
                .map(|f| FieldView::from_field(f, engine))
                .collect(),
            loading: engine.is_loading(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChoiceView {
    /// Position in the property's full choice list
    pub index: usize,
    pub label: String,
    pub choice: Choice,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SubmissionResponse {
    pub snapshot: Snapshot,
    pub rows: Vec<String>,
}

// --- request bodies ---

#[derive(Debug, Deserialize)]
pub struct SelectCategoryRequest {
    pub category_id: Id,
}

#[derive(Debug, Deserialize)]
pub struct SelectSubcategoryRequest {
    pub subcategory_id: Id,
}

/// `{"option_id": n}` picks an option, `{"other": "text"}` records free
/// text and `{}` clears the field
#[derive(Debug, Default, Deserialize)]
pub struct SetFieldRequest {
    #[serde(default)]
    pub option_id: Option<Id>,
    #[serde(default)]
    pub other: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChoicesQuery {
    #[serde(default)]
    pub q: String,
}

// --- handlers ---

pub async fn list_categories<G: CatalogGateway + 'static>(
    State(service): State<AppState<G>>,
) -> Result<Json<Vec<Category>>, ApiError> {
    let categories = service
        .gateway()
        .fetch_all_categories()
        .await
        .map_err(|e| form_error_response(&FormError::from(e)))?;
    Ok(Json(top_level_categories(&categories)))
}

pub async fn create_session<G: CatalogGateway + 'static>(
    State(service): State<AppState<G>>,
) -> Result<(StatusCode, Json<FormView>), ApiError> {
    let (session_id, session) = service
        .create_session()
        .await
        .map_err(|e| form_error_response(&e))?;

    let session = session.lock().await;
    Ok((
        StatusCode::CREATED,
        Json(FormView::new(session_id, session.engine())),
    ))
}

pub async fn get_session<G: CatalogGateway + 'static>(
    State(service): State<AppState<G>>,
    Path(session_id): Path<SessionId>,
) -> Result<Json<FormView>, ApiError> {
    let session = find_session(&service, &session_id)?;
    let session = session.lock().await;
    Ok(Json(FormView::new(session_id, session.engine())))
}

pub async fn delete_session<G: CatalogGateway + 'static>(
    State(service): State<AppState<G>>,
    Path(session_id): Path<SessionId>,
) -> Result<StatusCode, ApiError> {
    if service.remove_session(&session_id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(session_not_found())
    }
}

pub async fn select_category<G: CatalogGateway + 'static>(
    State(service): State<AppState<G>>,
    Path(session_id): Path<SessionId>,
    RequestJson(request): RequestJson<SelectCategoryRequest>,
) -> Result<Json<FormView>, ApiError> {
    let session = find_session(&service, &session_id)?;
    let mut session = session.lock().await;

    session
        .select_category(request.category_id)
        .map_err(|e| form_error_response(&e))?;
    Ok(Json(FormView::new(session_id, session.engine())))
}

/// Select a subcategory and wait for its properties
pub async fn select_subcategory<G: CatalogGateway + 'static>(
    State(service): State<AppState<G>>,
    Path(session_id): Path<SessionId>,
    RequestJson(request): RequestJson<SelectSubcategoryRequest>,
) -> Result<Json<FormView>, ApiError> {
    let session = find_session(&service, &session_id)?;
    let mut session = session.lock().await;

    session
        .select_subcategory(request.subcategory_id)
        .map_err(|e| form_error_response(&e))?;

    for update in session.settle().await {
        if let FormUpdate::PropertiesFailed { error, .. } = update {
            return Err(form_error_response(&error));
        }
    }
    Ok(Json(FormView::new(session_id, session.engine())))
}

/// Set, replace or clear a field value, then wait for any child fields
pub async fn set_field<G: CatalogGateway + 'static>(
    State(service): State<AppState<G>>,
    Path((session_id, property_id)): Path<(SessionId, Id)>,
    RequestJson(request): RequestJson<SetFieldRequest>,
) -> Result<Json<FormView>, ApiError> {
    let session = find_session(&service, &session_id)?;
    let mut session = session.lock().await;

    let result = match request {
        SetFieldRequest {
            option_id: Some(option_id),
            other: None,
        } => session.choose_option(property_id, option_id),
        SetFieldRequest {
            option_id: None,
            other: Some(text),
        } => session.set_other_value(property_id, text),
        SetFieldRequest {
            option_id: None,
            other: None,
        } => session.clear_field(property_id),
        SetFieldRequest { .. } => {
            return Err((
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ErrorResponse::new(
                    "Provide either option_id or other, not both",
                )),
            ))
        }
    };
    result.map_err(|e| form_error_response(&e))?;

    session.settle().await;
    Ok(Json(FormView::new(session_id, session.engine())))
}

/// Choices of one field, narrowed by the `q` search text
pub async fn list_choices<G: CatalogGateway + 'static>(
    State(service): State<AppState<G>>,
    Path((session_id, property_id)): Path<(SessionId, Id)>,
    Query(query): Query<ChoicesQuery>,
) -> Result<Json<Vec<ChoiceView>>, ApiError> {
    let session = find_session(&service, &session_id)?;
    let session = session.lock().await;

    let choices = session
        .engine()
        .choices(property_id)
        .map_err(|e| form_error_response(&e))?;

    let mut selector =
        SearchableSelector::new(choices.iter().map(|c| c.label().to_string()).collect());
    let views = selector
        .filter(&query.q)
        .into_iter()
        .map(|item| ChoiceView {
            index: item.index,
            label: item.label,
            choice: choices[item.index].clone(),
        })
        .collect();
    Ok(Json(views))
}

pub async fn submit<G: CatalogGateway + 'static>(
    State(service): State<AppState<G>>,
    Path(session_id): Path<SessionId>,
) -> Result<Json<SubmissionResponse>, ApiError> {
    let session = find_session(&service, &session_id)?;
    let mut session = session.lock().await;

    let snapshot = session.submit().map_err(|e| form_error_response(&e))?;
    log::info!(
        "Session {} submitted {} values for {}",
        session_id,
        snapshot.values.len(),
        snapshot.subcategory.name
    );
    Ok(Json(SubmissionResponse {
        rows: snapshot.rows(),
        snapshot,
    }))
}
