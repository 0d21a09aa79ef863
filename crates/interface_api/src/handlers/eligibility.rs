//! Stateless eligibility check

use axum::{extract::State, Json};
use tracing::debug;

use domain_eligibility::DisruptionFacts;

use crate::dto::eligibility::EligibilityResponse;
use crate::AppState;

/// Evaluates disruption facts without creating a claim
pub async fn check_eligibility(
    State(state): State<AppState>,
    Json(facts): Json<DisruptionFacts>,
) -> Json<EligibilityResponse> {
    let engine = state.service.engine();
    let decision = engine.evaluate(&facts);
    debug!(eligible = decision.is_eligible, kind = ?decision.kind(), "Ad-hoc eligibility check");

    Json(EligibilityResponse::new(decision, engine.schedule().name()))
}
