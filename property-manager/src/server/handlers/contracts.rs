use axum::extract::{Path, RawQuery, State};
use axum::response::Response;
use axum::routing::get;
use axum::{Form, Json, Router};
use property_manager_shared::views::RecordListView;
use property_manager_shared::{ContractListing, RecordId};
use serde_json::{json, Value};

use super::{found, list_params};
use crate::errors::HttpResult;
use crate::server::forms::{self, FormData};
use crate::server::state::AppState;

const LIST_URL: &str = "/contracts/";

pub fn router() -> Router<AppState> {
    Router::new()
        .route(LIST_URL, get(list_contracts))
        .route("/contracts/new", get(new_contract).post(create_contract))
        .route("/contracts/:id/edit", get(edit_contract).post(update_contract))
        .route(
            "/contracts/:id/delete",
            get(confirm_delete_contract).post(delete_contract),
        )
}

async fn list_contracts(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> HttpResult<Json<RecordListView<ContractListing>>> {
    let params = list_params(query);
    Ok(Json(state.service.list_contracts(&params).await?))
}

async fn form_context(state: &AppState) -> HttpResult<Value> {
    Ok(json!({
        "unit_choices": state.service.unit_choices().await?,
        "owner_choices": state.service.owner_choices().await?,
        "tenant_choices": state.service.tenant_choices().await?,
    }))
}

async fn new_contract(State(state): State<AppState>) -> HttpResult<Json<Value>> {
    Ok(Json(form_context(&state).await?))
}

async fn create_contract(
    State(state): State<AppState>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> HttpResult<Response> {
    let input = forms::contract_input(&FormData::new(pairs))?;
    state.service.create_contract(input).await?;
    Ok(found(LIST_URL))
}

async fn edit_contract(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
) -> HttpResult<Json<Value>> {
    let contract = state.service.get_contract(id).await?;
    let mut context = form_context(&state).await?;
    context["contract"] = json!(contract);
    Ok(Json(context))
}

async fn update_contract(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> HttpResult<Response> {
    let input = forms::contract_input(&FormData::new(pairs))?;
    state.service.update_contract(id, input).await?;
    Ok(found(LIST_URL))
}

async fn confirm_delete_contract(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
) -> HttpResult<Json<Value>> {
    let contract = state.service.get_contract(id).await?;
    let unit = state.service.get_unit(contract.unit_id).await?;
    Ok(Json(json!({
        "display_name": contract.display_name(&unit.display_name()),
        "contract": contract,
    })))
}

async fn delete_contract(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
) -> HttpResult<Response> {
    state.service.delete_contract(id).await?;
    Ok(found(LIST_URL))
}
