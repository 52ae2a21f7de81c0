use axum::extract::{DefaultBodyLimit, Multipart, Path, RawQuery, State};
use axum::response::Response;
use axum::routing::get;
use axum::{Form, Json, Router};
use property_manager_repository::DocumentUpload;
use property_manager_shared::views::RecordListView;
use property_manager_shared::{Document, RecordId, ValidationErrors};
use serde_json::{json, Value};

use super::{found, list_params};
use crate::errors::{HttpError, HttpResult};
use crate::server::forms::{self, FormData};
use crate::server::state::AppState;

const LIST_URL: &str = "/documents/";

/// Largest accepted upload body.
const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(LIST_URL, get(list_documents))
        .route(
            "/documents/new",
            get(new_document)
                .post(create_document)
                .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route("/documents/:id/edit", get(edit_document).post(update_document))
        .route(
            "/documents/:id/delete",
            get(confirm_delete_document).post(delete_document),
        )
}

async fn list_documents(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> HttpResult<Json<RecordListView<Document>>> {
    let params = list_params(query);
    Ok(Json(state.service.list_documents(&params).await?))
}

async fn new_document(State(state): State<AppState>) -> HttpResult<Json<Value>> {
    Ok(Json(json!({ "unit_choices": state.service.unit_choices().await? })))
}

/// Reads the `unit`, `description` and `file` parts of a multipart body.
async fn read_upload(mut multipart: Multipart) -> HttpResult<DocumentUpload> {
    let mut unit = None;
    let mut description = String::new();
    let mut file_name = String::new();
    let mut bytes = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| HttpError::bad_request(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "unit" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| HttpError::bad_request(e.to_string()))?;
                unit = Some(text);
            }
            "description" => {
                description = field
                    .text()
                    .await
                    .map_err(|e| HttpError::bad_request(e.to_string()))?
                    .trim()
                    .to_string();
            }
            "file" => {
                file_name = field.file_name().unwrap_or_default().to_string();
                bytes = field
                    .bytes()
                    .await
                    .map_err(|e| HttpError::bad_request(e.to_string()))?
                    .to_vec();
            }
            _ => {}
        }
    }

    let unit_id = match unit.as_deref().map(str::trim).filter(|u| !u.is_empty()) {
        None => return Err(field_error("unit", "This field is required.")),
        Some(raw) => raw.parse::<RecordId>().map_err(|_| {
            field_error(
                "unit",
                "Select a valid choice. That choice is not one of the available choices.",
            )
        })?,
    };

    Ok(DocumentUpload {
        unit_id,
        description,
        file_name,
        bytes,
    })
}

fn field_error(field: &str, message: &str) -> HttpError {
    let mut errors = ValidationErrors::new();
    errors.add(field, message);
    HttpError::Validation(errors)
}

async fn create_document(
    State(state): State<AppState>,
    multipart: Multipart,
) -> HttpResult<Response> {
    let upload = read_upload(multipart).await?;
    state.service.create_document(upload).await?;
    Ok(found(LIST_URL))
}

async fn edit_document(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
) -> HttpResult<Json<Value>> {
    let document = state.service.get_document(id).await?;
    Ok(Json(json!({
        "document": document,
        "unit_choices": state.service.unit_choices().await?,
    })))
}

/// Changes the unit or description; the file stays as uploaded.
async fn update_document(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> HttpResult<Response> {
    let input = forms::document_input(&FormData::new(pairs))?;
    state.service.update_document(id, input).await?;
    Ok(found(LIST_URL))
}

async fn confirm_delete_document(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
) -> HttpResult<Json<Value>> {
    let document = state.service.get_document(id).await?;
    Ok(Json(json!({
        "display_name": document.display_name(),
        "document": document,
    })))
}

/// Removes the record, then the stored file.
async fn delete_document(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
) -> HttpResult<Response> {
    state.service.delete_document(id).await?;
    Ok(found(LIST_URL))
}
