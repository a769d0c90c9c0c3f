use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use tracing::error;

use alms_ledger::history::{self, Page};
use alms_types::api::{Claims, HistoryQuery, PeriodQuery};
use alms_types::models::Donation;

use crate::auth::AppState;
use crate::convert;
use crate::error::ApiError;

pub async fn get_donation(
    State(state): State<AppState>,
    Path(donation_id): Path<String>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let requestor_id = claims.sub.to_string();

    let db = state.clone();
    let row =
        tokio::task::spawn_blocking(move || history::get_by_id(&db.db, &donation_id, &requestor_id))
            .await
            .map_err(join_error)??;

    Ok(Json(convert::donation(row)))
}

pub async fn list_donations(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let donor_id = claims.sub.to_string();
    let page = Page::new(query.page, query.limit);

    let db = state.clone();
    let rows = tokio::task::spawn_blocking(move || history::list_by_donor(&db.db, &donor_id, page))
        .await
        .map_err(join_error)??;

    let donations: Vec<Donation> = rows.into_iter().map(convert::donation).collect();
    Ok(Json(donations))
}

pub async fn list_donations_in_period(
    State(state): State<AppState>,
    Query(query): Query<PeriodQuery>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let (Some(start_raw), Some(end_raw)) = (query.start_date, query.end_date) else {
        return Err(ApiError::bad_request("Provide startDate and endDate"));
    };
    let start = history::parse_date_bound(&start_raw)
        .ok_or_else(|| ApiError::bad_request("Invalid startDate"))?;
    let end = history::parse_date_bound(&end_raw)
        .ok_or_else(|| ApiError::bad_request("Invalid endDate"))?;

    let donor_id = claims.sub.to_string();
    let page = Page::new(query.page, query.limit);

    let db = state.clone();
    let rows = tokio::task::spawn_blocking(move || {
        history::list_by_donor_in_period(&db.db, &donor_id, start, end, page)
    })
    .await
    .map_err(join_error)??;

    let donations: Vec<Donation> = rows.into_iter().map(convert::donation).collect();
    Ok(Json(donations))
}

fn join_error(e: tokio::task::JoinError) -> ApiError {
    error!("spawn_blocking join error: {}", e);
    ApiError::Internal(anyhow::anyhow!("history query task failed"))
}
