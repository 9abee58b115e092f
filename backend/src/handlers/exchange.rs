use axum::{
    extract::{rejection::PathRejection, Extension, Path, State},
    Json,
};

use crate::{
    context::RequestContext,
    error::AppError,
    models::{transaction::TransactionResponse, user::User},
    state::AppState,
};

pub async fn convert(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    ctx: RequestContext,
    params: Result<Path<(String, String, String)>, PathRejection>,
) -> Result<Json<TransactionResponse>, AppError> {
    let Path((from, to, amount)) = params?;
    let amount: f64 = amount
        .trim()
        .parse()
        .map_err(|_| AppError::InvalidInput("Amount must be a non-negative number".into()))?;

    let transaction = state
        .converter
        .convert(&ctx, user.id, &from, &to, amount)
        .await?;
    Ok(Json(TransactionResponse::from(transaction)))
}
