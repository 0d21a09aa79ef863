//! Claims handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use validator::Validate;

use core_kernel::ClaimId;
use domain_claims::{ClaimQuery, StatusSummary};

use crate::auth::{permissions, require, TokenClaims};
use crate::dto::claims::*;
use crate::{error::ApiError, AppState};

fn parse_id(id: &str) -> Result<ClaimId, ApiError> {
    id.parse()
        .map_err(|_| ApiError::BadRequest(format!("invalid claim id '{}'", id)))
}

/// Creates a claim from intake data
pub async fn create_claim(
    State(state): State<AppState>,
    Extension(user): Extension<TokenClaims>,
    Json(request): Json<CreateClaimRequest>,
) -> Result<(StatusCode, Json<ClaimResponse>), ApiError> {
    require(&user, permissions::CLAIM_WRITE)?;
    request.validate()?;

    let claim = state.service.submit_claim(request.into()).await?;
    Ok((StatusCode::CREATED, Json(claim.into())))
}

/// Lists claims, newest first
pub async fn list_claims(
    State(state): State<AppState>,
    Extension(user): Extension<TokenClaims>,
    Query(params): Query<ListClaimsParams>,
) -> Result<Json<Vec<ClaimSummaryResponse>>, ApiError> {
    require(&user, permissions::CLAIM_READ)?;
    params.validate()?;

    let query = ClaimQuery {
        status: params.status()?,
        limit: Some(params.limit()),
        offset: params.offset,
    };
    let claims = state.service.list_claims(query).await?;

    Ok(Json(claims.into_iter().map(Into::into).collect()))
}

/// Counts claims per status
pub async fn status_summary(
    State(state): State<AppState>,
    Extension(user): Extension<TokenClaims>,
) -> Result<Json<StatusSummary>, ApiError> {
    require(&user, permissions::CLAIM_READ)?;
    Ok(Json(state.service.status_summary().await?))
}

/// Gets a claim by ID
pub async fn get_claim(
    State(state): State<AppState>,
    Extension(user): Extension<TokenClaims>,
    Path(id): Path<String>,
) -> Result<Json<ClaimResponse>, ApiError> {
    require(&user, permissions::CLAIM_READ)?;
    let claim = state.service.get_claim(parse_id(&id)?).await?;
    Ok(Json(claim.into()))
}

/// Re-evaluates a claim's eligibility
pub async fn check_eligibility(
    State(state): State<AppState>,
    Extension(user): Extension<TokenClaims>,
    Path(id): Path<String>,
) -> Result<Json<ClaimResponse>, ApiError> {
    require(&user, permissions::CLAIM_WRITE)?;
    let claim = state.service.check_eligibility(parse_id(&id)?).await?;
    Ok(Json(claim.into()))
}

/// Applies a lifecycle event
pub async fn apply_event(
    State(state): State<AppState>,
    Extension(user): Extension<TokenClaims>,
    Path(id): Path<String>,
    Json(request): Json<ApplyEventRequest>,
) -> Result<Json<ClaimResponse>, ApiError> {
    require(&user, permissions::CLAIM_WRITE)?;
    let event = request.event()?;
    let claim = state
        .service
        .apply_event(parse_id(&id)?, event, request.note)
        .await?;
    Ok(Json(claim.into()))
}

/// Records a settlement offer
pub async fn offer_settlement(
    State(state): State<AppState>,
    Extension(user): Extension<TokenClaims>,
    Path(id): Path<String>,
    Json(request): Json<SettlementRequest>,
) -> Result<Json<ClaimResponse>, ApiError> {
    require(&user, permissions::CLAIM_WRITE)?;
    let amount = request.money();
    let claim = state
        .service
        .offer_settlement(parse_id(&id)?, amount, request.note)
        .await?;
    Ok(Json(claim.into()))
}
