use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Extension, Path, Query, State,
    },
    Json,
};

use crate::{
    error::AppError,
    models::{transaction::TransactionResponse, user::User, PageQuery, PaginatedResponse},
    services::ensure_owner,
    state::AppState,
    types::UserId,
};

pub async fn list_transactions(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    user_id: Result<Path<UserId>, PathRejection>,
    page: Result<Query<PageQuery>, QueryRejection>,
) -> Result<Json<PaginatedResponse<TransactionResponse>>, AppError> {
    let Path(user_id) = user_id?;
    ensure_owner(user.id, user_id)?;
    let Query(page) = page?;

    let result = state.ledger.list_for_owner(user_id, page).await?;
    let items = result
        .items
        .into_iter()
        .map(TransactionResponse::from)
        .collect();
    Ok(Json(PaginatedResponse::new(page, result.total, items)))
}
