use axum::extract::{Path, RawQuery, State};
use axum::response::Response;
use axum::routing::get;
use axum::{Form, Json, Router};
use property_manager_shared::views::RecordListView;
use property_manager_shared::{OwnerInput, OwnerSummary, RecordId};
use serde_json::{json, Value};

use super::{found, list_params};
use crate::errors::HttpResult;
use crate::server::forms::{self, FormData};
use crate::server::state::AppState;

const LIST_URL: &str = "/owners/";

pub fn router() -> Router<AppState> {
    Router::new()
        .route(LIST_URL, get(list_owners))
        .route("/owners/new", get(new_owner).post(create_owner))
        .route("/owners/:id/edit", get(edit_owner).post(update_owner))
        .route("/owners/:id/delete", get(confirm_delete_owner).post(delete_owner))
}

async fn list_owners(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> HttpResult<Json<RecordListView<OwnerSummary>>> {
    let params = list_params(query);
    Ok(Json(state.service.list_owners(&params).await?))
}

async fn new_owner() -> Json<Value> {
    Json(json!({ "owner": OwnerInput::default() }))
}

async fn create_owner(
    State(state): State<AppState>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> HttpResult<Response> {
    let input = forms::owner_input(&FormData::new(pairs));
    state.service.create_owner(input).await?;
    Ok(found(LIST_URL))
}

async fn edit_owner(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
) -> HttpResult<Json<Value>> {
    let owner = state.service.get_owner(id).await?;
    Ok(Json(json!({ "owner": owner })))
}

async fn update_owner(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> HttpResult<Response> {
    let input = forms::owner_input(&FormData::new(pairs));
    state.service.update_owner(id, input).await?;
    Ok(found(LIST_URL))
}

async fn confirm_delete_owner(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
) -> HttpResult<Json<Value>> {
    let owner = state.service.get_owner(id).await?;
    Ok(Json(json!({ "owner": owner, "display_name": owner.display_name() })))
}

async fn delete_owner(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
) -> HttpResult<Response> {
    state.service.delete_owner(id).await?;
    Ok(found(LIST_URL))
}
