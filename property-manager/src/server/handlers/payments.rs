use axum::extract::{Path, RawQuery, State};
use axum::response::Response;
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use property_manager_shared::views::{Choice, PaymentListView};
use property_manager_shared::{PayerRole, RecordId};
use serde_json::{json, Value};
use tracing::info;

use super::{found, list_params, safe_next};
use crate::errors::HttpResult;
use crate::server::forms::{self, FormData};
use crate::server::state::AppState;

const LIST_URL: &str = "/payments/";

pub fn router() -> Router<AppState> {
    Router::new()
        .route(LIST_URL, get(list_payments))
        .route("/payments/new", get(new_payment).post(create_payment))
        .route("/payments/:id/edit", get(edit_payment).post(update_payment))
        .route(
            "/payments/:id/delete",
            get(confirm_delete_payment).post(delete_payment),
        )
        .route("/payments/:id/toggle", post(toggle_paid))
}

/// Payments filtered by the query string, with totals over the whole
/// filtered set.
async fn list_payments(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> HttpResult<Json<PaymentListView>> {
    let params = list_params(query);
    Ok(Json(state.service.list_payments(&params).await?))
}

async fn form_context(state: &AppState) -> HttpResult<Value> {
    Ok(json!({
        "unit_choices": state.service.unit_choices().await?,
        "payment_type_choices": state.service.payment_type_choices().await?,
        "payer_choices": Choice::from_pairs(PayerRole::choices()),
    }))
}

/// `?unit=<id>&payment_type=<id>` preselect the form fields.
async fn new_payment(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> HttpResult<Json<Value>> {
    let params = list_params(query);
    let initial = state
        .service
        .payment_form_initial(&params, state.today())
        .await?;
    let mut context = form_context(&state).await?;
    context["initial"] = json!(initial);
    Ok(Json(context))
}

async fn create_payment(
    State(state): State<AppState>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> HttpResult<Response> {
    let input = forms::payment_input(&FormData::new(pairs))?;
    state.service.create_payment(input, state.today()).await?;
    Ok(found(LIST_URL))
}

async fn edit_payment(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
) -> HttpResult<Json<Value>> {
    let payment = state.service.get_payment(id).await?;
    let mut context = form_context(&state).await?;
    context["payment"] = json!(payment);
    Ok(Json(context))
}

async fn update_payment(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> HttpResult<Response> {
    let input = forms::payment_input(&FormData::new(pairs))?;
    state.service.update_payment(id, input).await?;
    Ok(found(LIST_URL))
}

async fn confirm_delete_payment(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
) -> HttpResult<Json<Value>> {
    let payment = state.service.get_payment(id).await?;
    let payment_type = state.service.get_payment_type(payment.payment_type_id).await?;
    Ok(Json(json!({
        "display_name": payment.display_name(&payment_type.name),
        "payment": payment,
    })))
}

async fn delete_payment(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
) -> HttpResult<Response> {
    state.service.delete_payment(id).await?;
    Ok(found(LIST_URL))
}

/// Flips the paid flag, then returns to `next` (form body, then query) or
/// the payment list.
async fn toggle_paid(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
    RawQuery(query): RawQuery,
    form: Option<Form<Vec<(String, String)>>>,
) -> HttpResult<Response> {
    let payment = state.service.toggle_paid(id).await?;
    info!(payment_id = id, paid = payment.paid, "Payment paid flag toggled");

    let body = form.map(|Form(pairs)| FormData::new(pairs)).unwrap_or_default();
    let params = list_params(query);
    let next = body.value("next").or_else(|| params.non_empty("next"));
    Ok(found(&safe_next(next, LIST_URL)))
}
