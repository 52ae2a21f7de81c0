use axum::extract::{Path, RawQuery, State};
use axum::response::Response;
use axum::routing::get;
use axum::{Extension, Form, Json, Router};
use property_manager_shared::views::{Choice, RecordListView};
use property_manager_shared::{PayerRole, PaymentType, RecordId};
use serde_json::{json, Value};

use super::{found, list_params};
use crate::errors::HttpResult;
use crate::server::auth::CurrentUser;
use crate::server::forms::{self, FormData};
use crate::server::state::AppState;

const LIST_URL: &str = "/payment-types/";

pub fn router() -> Router<AppState> {
    Router::new()
        .route(LIST_URL, get(list_payment_types))
        .route(
            "/payment-types/new",
            get(new_payment_type).post(create_payment_type),
        )
        .route(
            "/payment-types/:id/edit",
            get(edit_payment_type).post(update_payment_type),
        )
        .route(
            "/payment-types/:id/delete",
            get(confirm_delete_payment_type).post(delete_payment_type),
        )
}

async fn list_payment_types(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> HttpResult<Json<RecordListView<PaymentType>>> {
    let params = list_params(query);
    Ok(Json(state.service.list_payment_types(&params).await?))
}

async fn new_payment_type() -> Json<Value> {
    Json(json!({
        "active": true,
        "payer_choices": Choice::from_pairs(PayerRole::choices()),
    }))
}

async fn create_payment_type(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> HttpResult<Response> {
    let input = forms::payment_type_input(&FormData::new(pairs))?;
    state
        .service
        .create_payment_type(input, &user.username)
        .await?;
    Ok(found(LIST_URL))
}

async fn edit_payment_type(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
) -> HttpResult<Json<Value>> {
    let payment_type = state.service.get_payment_type(id).await?;
    Ok(Json(json!({
        "payment_type": payment_type,
        "payer_choices": Choice::from_pairs(PayerRole::choices()),
    })))
}

async fn update_payment_type(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
    Extension(user): Extension<CurrentUser>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> HttpResult<Response> {
    let input = forms::payment_type_input(&FormData::new(pairs))?;
    state
        .service
        .update_payment_type(id, input, &user.username)
        .await?;
    Ok(found(LIST_URL))
}

async fn confirm_delete_payment_type(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
) -> HttpResult<Json<Value>> {
    let payment_type = state.service.get_payment_type(id).await?;
    Ok(Json(json!({ "payment_type": payment_type })))
}

/// Answers 409 while payments still use the type.
async fn delete_payment_type(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
) -> HttpResult<Response> {
    state.service.delete_payment_type(id).await?;
    Ok(found(LIST_URL))
}
