use axum::extract::{Path, RawQuery, State};
use axum::response::Response;
use axum::routing::get;
use axum::{Form, Json, Router};
use property_manager_shared::views::RecordListView;
use property_manager_shared::{Incident, RecordId};
use serde_json::{json, Value};

use super::{found, list_params};
use crate::errors::HttpResult;
use crate::server::forms::{self, FormData};
use crate::server::state::AppState;

const LIST_URL: &str = "/incidents/";

pub fn router() -> Router<AppState> {
    Router::new()
        .route(LIST_URL, get(list_incidents))
        .route("/incidents/new", get(new_incident).post(create_incident))
        .route("/incidents/:id/edit", get(edit_incident).post(update_incident))
        .route(
            "/incidents/:id/delete",
            get(confirm_delete_incident).post(delete_incident),
        )
}

async fn list_incidents(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> HttpResult<Json<RecordListView<Incident>>> {
    let params = list_params(query);
    Ok(Json(state.service.list_incidents(&params).await?))
}

async fn new_incident(State(state): State<AppState>) -> HttpResult<Json<Value>> {
    Ok(Json(json!({
        "status": "pending",
        "unit_choices": state.service.unit_choices().await?,
    })))
}

/// The report date is today.
async fn create_incident(
    State(state): State<AppState>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> HttpResult<Response> {
    let input = forms::incident_input(&FormData::new(pairs))?;
    state.service.create_incident(input, state.today()).await?;
    Ok(found(LIST_URL))
}

async fn edit_incident(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
) -> HttpResult<Json<Value>> {
    let incident = state.service.get_incident(id).await?;
    Ok(Json(json!({
        "incident": incident,
        "unit_choices": state.service.unit_choices().await?,
    })))
}

async fn update_incident(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> HttpResult<Response> {
    let input = forms::incident_input(&FormData::new(pairs))?;
    state.service.update_incident(id, input).await?;
    Ok(found(LIST_URL))
}

async fn confirm_delete_incident(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
) -> HttpResult<Json<Value>> {
    let incident = state.service.get_incident(id).await?;
    let unit = state.service.get_unit(incident.unit_id).await?;
    Ok(Json(json!({
        "display_name": incident.display_name(&unit.display_name()),
        "incident": incident,
    })))
}

async fn delete_incident(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
) -> HttpResult<Response> {
    state.service.delete_incident(id).await?;
    Ok(found(LIST_URL))
}
