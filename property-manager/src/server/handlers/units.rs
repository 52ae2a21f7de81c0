use axum::extract::{Path, RawQuery, State};
use axum::response::Response;
use axum::routing::get;
use axum::{Form, Json, Router};
use property_manager_shared::views::{Choice, UnitListView};
use property_manager_shared::{RecordId, UnitCategory};
use serde_json::{json, Value};

use super::{found, list_params};
use crate::errors::HttpResult;
use crate::server::forms::{self, FormData};
use crate::server::state::AppState;

const LIST_URL: &str = "/units/";

pub fn router() -> Router<AppState> {
    Router::new()
        .route(LIST_URL, get(list_units))
        .route("/units/new", get(new_unit).post(create_unit))
        .route("/units/:id/edit", get(edit_unit).post(update_unit))
        .route("/units/:id/delete", get(confirm_delete_unit).post(delete_unit))
}

/// Units filtered by the query string, each flagged as rented when a
/// contract covers today.
async fn list_units(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> HttpResult<Json<UnitListView>> {
    let params = list_params(query);
    let view = state.service.list_units(&params, state.today()).await?;
    Ok(Json(view))
}

async fn form_context(state: &AppState) -> HttpResult<Value> {
    Ok(json!({
        "category_choices": Choice::from_pairs(UnitCategory::choices()),
        "owner_choices": state.service.owner_choices().await?,
    }))
}

async fn new_unit(State(state): State<AppState>) -> HttpResult<Json<Value>> {
    Ok(Json(form_context(&state).await?))
}

async fn create_unit(
    State(state): State<AppState>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> HttpResult<Response> {
    let input = forms::unit_input(&FormData::new(pairs))?;
    state.service.create_unit(input).await?;
    Ok(found(LIST_URL))
}

async fn edit_unit(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
) -> HttpResult<Json<Value>> {
    let unit = state.service.get_unit(id).await?;
    let mut context = form_context(&state).await?;
    context["unit"] = json!(unit);
    Ok(Json(context))
}

async fn update_unit(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> HttpResult<Response> {
    let input = forms::unit_input(&FormData::new(pairs))?;
    state.service.update_unit(id, input).await?;
    Ok(found(LIST_URL))
}

async fn confirm_delete_unit(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
) -> HttpResult<Json<Value>> {
    let unit = state.service.get_unit(id).await?;
    Ok(Json(json!({ "unit": unit, "display_name": unit.display_name() })))
}

async fn delete_unit(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
) -> HttpResult<Response> {
    state.service.delete_unit(id).await?;
    Ok(found(LIST_URL))
}
