use axum::extract::{Path, RawQuery, State};
use axum::response::Response;
use axum::routing::get;
use axum::{Form, Json, Router};
use property_manager_shared::views::{Choice, RecordListView};
use property_manager_shared::{RecordId, TenantInput, TenantListing, UnitCategory};
use serde_json::{json, Value};

use super::{found, list_params};
use crate::errors::HttpResult;
use crate::server::forms::{self, FormData};
use crate::server::state::AppState;

const LIST_URL: &str = "/tenants/";

pub fn router() -> Router<AppState> {
    Router::new()
        .route(LIST_URL, get(list_tenants))
        .route("/tenants/new", get(new_tenant).post(create_tenant))
        .route("/tenants/:id/edit", get(edit_tenant).post(update_tenant))
        .route("/tenants/:id/delete", get(confirm_delete_tenant).post(delete_tenant))
}

async fn list_tenants(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> HttpResult<Json<Value>> {
    let params = list_params(query);
    let view: RecordListView<TenantListing> = state.service.list_tenants(&params).await?;
    Ok(Json(json!({
        "view": view,
        "category_choices": Choice::from_pairs(UnitCategory::choices()),
    })))
}

async fn new_tenant(State(state): State<AppState>) -> HttpResult<Json<Value>> {
    Ok(Json(json!({
        "tenant": TenantInput::default(),
        "unit_choices": state.service.unit_choices().await?,
    })))
}

async fn create_tenant(
    State(state): State<AppState>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> HttpResult<Response> {
    let input = forms::tenant_input(&FormData::new(pairs))?;
    state.service.create_tenant(input).await?;
    Ok(found(LIST_URL))
}

async fn edit_tenant(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
) -> HttpResult<Json<Value>> {
    let tenant = state.service.get_tenant(id).await?;
    Ok(Json(json!({
        "tenant": tenant,
        "unit_choices": state.service.unit_choices().await?,
    })))
}

async fn update_tenant(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> HttpResult<Response> {
    let input = forms::tenant_input(&FormData::new(pairs))?;
    state.service.update_tenant(id, input).await?;
    Ok(found(LIST_URL))
}

async fn confirm_delete_tenant(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
) -> HttpResult<Json<Value>> {
    let tenant = state.service.get_tenant(id).await?;
    Ok(Json(json!({ "tenant": tenant, "display_name": tenant.display_name() })))
}

async fn delete_tenant(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
) -> HttpResult<Response> {
    state.service.delete_tenant(id).await?;
    Ok(found(LIST_URL))
}
