//! HTTP tests for interface_api against the in-memory claim repository

use std::sync::Arc;

use axum::http::{header, HeaderValue, StatusCode};
use axum_test::{TestRequest, TestServer};
use serde_json::{json, Value};

use domain_claims::ports::mock::MockClaimRepository;
use domain_claims::ClaimService;
use domain_eligibility::EligibilityEngine;
use interface_api::auth::{create_token, permissions};
use interface_api::config::ApiConfig;
use interface_api::create_router;

fn server() -> TestServer {
    let service = ClaimService::new(Arc::new(MockClaimRepository::new()), EligibilityEngine::eu261());
    TestServer::new(create_router(service, ApiConfig::default())).unwrap()
}

fn token(roles: &[&str]) -> HeaderValue {
    let config = ApiConfig::default();
    let token = create_token(
        "case-handler-1",
        roles.iter().map(|r| r.to_string()).collect(),
        &config.jwt_secret,
        config.jwt_expiration_secs,
    )
    .unwrap();
    HeaderValue::from_str(&format!("Bearer {}", token)).unwrap()
}

trait Authorized {
    fn as_writer(self) -> Self;
    fn as_reader(self) -> Self;
}

impl Authorized for TestRequest {
    fn as_writer(self) -> Self {
        self.add_header(
            header::AUTHORIZATION,
            token(&[permissions::CLAIM_READ, permissions::CLAIM_WRITE]),
        )
    }

    fn as_reader(self) -> Self {
        self.add_header(header::AUTHORIZATION, token(&[permissions::CLAIM_READ]))
    }
}

fn intake(late_by_minutes: i64) -> Value {
    let scheduled = chrono::DateTime::parse_from_rfc3339("2024-08-03T14:05:00Z").unwrap();
    let actual = scheduled + chrono::Duration::minutes(late_by_minutes);
    json!({
        "flight_number": "W61301",
        "airline": "Wizz Air",
        "flight_date": "2024-08-03",
        "disruption": {
            "distance_km": 1290,
            "scheduled_arrival": scheduled.to_rfc3339(),
            "actual_arrival": actual.to_rfc3339(),
            "departure_airport": "WAW",
            "arrival_airport": "LTN"
        },
        "passenger": {
            "first_name": "Piotr",
            "last_name": "Zielinski",
            "email": "piotr.zielinski@example.com",
            "phone": null,
            "address": null,
            "city": "Warsaw",
            "postal_code": null,
            "country": "PL"
        },
        "gdpr_consent": true,
        "poa_signed": true
    })
}

async fn create_claim(server: &TestServer, late_by_minutes: i64) -> String {
    let response = server
        .post("/api/v1/claims")
        .as_writer()
        .json(&intake(late_by_minutes))
        .await;
    response.assert_status(StatusCode::CREATED);
    response.json::<Value>()["id"].as_str().unwrap().to_string()
}

// ============================================================================
// Public endpoints
// ============================================================================

mod public_tests {
    use super::*;

    #[tokio::test]
    async fn test_health() {
        let response = server().get("/health").await;
        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["status"], "healthy");
    }

    #[tokio::test]
    async fn test_readiness_reports_repository() {
        let response = server().get("/health/ready").await;
        response.assert_status_ok();
        let body = response.json::<Value>();
        assert_eq!(body["status"], "ready");
        assert_eq!(body["repository"]["status"], "healthy");
    }

    #[tokio::test]
    async fn test_eligibility_for_long_haul_delay() {
        let response = server()
            .post("/api/v1/eligibility")
            .json(&json!({
                "distance_km": 4000,
                "scheduled_arrival": "2024-01-10T12:00:00Z",
                "actual_arrival": "2024-01-10T16:00:00Z"
            }))
            .await;

        response.assert_status_ok();
        let body = response.json::<Value>();
        assert_eq!(body["is_eligible"], true);
        assert_eq!(body["compensation_amount"], 600);
        assert_eq!(body["delay_minutes"], 240);
        assert_eq!(body["reason_detail"]["kind"], "delay_eligible");
        assert_eq!(body["schedule"], "EU261");
    }

    #[tokio::test]
    async fn test_eligibility_extraordinary() {
        let response = server()
            .post("/api/v1/eligibility")
            .json(&json!({
                "distance_km": 1200,
                "scheduled_arrival": "2024-01-10T12:00:00Z",
                "actual_arrival": "2024-01-10T18:00:00Z",
                "is_extraordinary": true,
                "extraordinary_reason": "volcanic ash"
            }))
            .await;

        response.assert_status_ok();
        let body = response.json::<Value>();
        assert_eq!(body["is_eligible"], false);
        assert_eq!(body["compensation_amount"], Value::Null);
        assert_eq!(body["extraordinary_reason"], "volcanic ash");
    }
}

// ============================================================================
// Authentication
// ============================================================================

mod auth_tests {
    use super::*;

    #[tokio::test]
    async fn test_claims_require_token() {
        let response = server().get("/api/v1/claims").await;
        response.assert_status(StatusCode::UNAUTHORIZED);
        assert_eq!(response.json::<Value>()["error"], "unauthorized");
    }

    #[tokio::test]
    async fn test_bad_token_is_rejected() {
        let response = server()
            .get("/api/v1/claims")
            .add_header(header::AUTHORIZATION, HeaderValue::from_static("Bearer not-a-jwt"))
            .await;
        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_reader_cannot_create() {
        let response = server()
            .post("/api/v1/claims")
            .as_reader()
            .json(&intake(200))
            .await;
        response.assert_status(StatusCode::FORBIDDEN);
    }
}

// ============================================================================
// Claim lifecycle
// ============================================================================

mod claim_tests {
    use super::*;

    #[tokio::test]
    async fn test_create_and_fetch_claim() {
        let server = server();
        let id = create_claim(&server, 200).await;

        let response = server.get(&format!("/api/v1/claims/{}", id)).as_reader().await;
        response.assert_status_ok();

        let body = response.json::<Value>();
        assert_eq!(body["status"], "NEW");
        assert_eq!(body["passenger_name"], "Piotr Zielinski");
        assert_eq!(body["delay_minutes"], 200);
        assert_eq!(body["eligibility"]["compensation_amount"], 250);
        assert!(body["claim_number"].as_str().unwrap().starts_with("CLM-"));
        assert_eq!(
            body["allowed_events"],
            json!(["start-review", "eligibility-negative", "withdraw"])
        );
    }

    #[tokio::test]
    async fn test_missing_consent_is_unprocessable() {
        let mut body = intake(200);
        body["poa_signed"] = json!(false);

        let response = server().post("/api/v1/claims").as_writer().json(&body).await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(response.json::<Value>()["error"], "validation_error");
    }

    #[tokio::test]
    async fn test_invalid_email_is_unprocessable() {
        let mut body = intake(200);
        body["passenger"]["email"] = json!("nope");

        let response = server().post("/api/v1/claims").as_writer().json(&body).await;
        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_unknown_claim_is_not_found() {
        let response = server()
            .get("/api/v1/claims/CLM-0191d3b2-7a4c-7cc0-9d6e-2f1c5b8a9e01")
            .as_reader()
            .await;
        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_malformed_claim_id_is_bad_request() {
        let response = server().get("/api/v1/claims/not-a-uuid").as_reader().await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_eligibility_check_advances_claim() {
        let server = server();
        let id = create_claim(&server, 200).await;

        let response = server
            .post(&format!("/api/v1/claims/{}/eligibility", id))
            .as_writer()
            .await;

        response.assert_status_ok();
        let body = response.json::<Value>();
        assert_eq!(body["status"], "ELIGIBILITY_CHECKED");
        assert_eq!(body["history"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_short_delay_is_rejected() {
        let server = server();
        let id = create_claim(&server, 120).await;

        let response = server
            .post(&format!("/api/v1/claims/{}/eligibility", id))
            .as_writer()
            .await;

        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["status"], "REJECTED");
    }

    #[tokio::test]
    async fn test_illegal_event_is_conflict() {
        let server = server();
        let id = create_claim(&server, 200).await;

        let response = server
            .post(&format!("/api/v1/claims/{}/events", id))
            .as_writer()
            .json(&json!({ "event": "settlement-accepted" }))
            .await;

        response.assert_status(StatusCode::CONFLICT);
        let body = response.json::<Value>();
        assert_eq!(body["error"], "illegal_transition");
        assert_eq!(
            body["details"],
            json!(["start-review", "eligibility-negative", "withdraw"])
        );
    }

    #[tokio::test]
    async fn test_unknown_event_is_bad_request() {
        let server = server();
        let id = create_claim(&server, 200).await;

        let response = server
            .post(&format!("/api/v1/claims/{}/events", id))
            .as_writer()
            .json(&json!({ "event": "teleport" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_full_settlement_flow() {
        let server = server();
        let id = create_claim(&server, 200).await;

        server
            .post(&format!("/api/v1/claims/{}/eligibility", id))
            .as_writer()
            .await
            .assert_status_ok();

        for event in ["submit-to-airline", "airline-responded"] {
            server
                .post(&format!("/api/v1/claims/{}/events", id))
                .as_writer()
                .json(&json!({ "event": event, "note": format!("step {}", event) }))
                .await
                .assert_status_ok();
        }

        let offered = server
            .post(&format!("/api/v1/claims/{}/settlement", id))
            .as_writer()
            .json(&json!({ "amount": "200.00", "note": "airline counter-offer" }))
            .await;
        offered.assert_status_ok();
        assert_eq!(offered.json::<Value>()["status"], "SETTLEMENT_OFFERED");

        let paid = server
            .post(&format!("/api/v1/claims/{}/events", id))
            .as_writer()
            .json(&json!({ "event": "settlement-accepted" }))
            .await;
        paid.assert_status_ok();

        let body = paid.json::<Value>();
        assert_eq!(body["status"], "PAID");
        assert_eq!(body["final_amount"]["amount"], "200.00");
        assert!(body["paid_at"].is_string());
        assert_eq!(body["allowed_events"], json!([]));
    }

    #[tokio::test]
    async fn test_settlement_during_negotiation_is_conflict() {
        let server = server();
        let id = create_claim(&server, 200).await;

        server
            .post(&format!("/api/v1/claims/{}/eligibility", id))
            .as_writer()
            .await
            .assert_status_ok();
        for event in ["submit-to-airline", "airline-responded", "negotiation-opened"] {
            server
                .post(&format!("/api/v1/claims/{}/events", id))
                .as_writer()
                .json(&json!({ "event": event }))
                .await
                .assert_status_ok();
        }

        let response = server
            .post(&format!("/api/v1/claims/{}/settlement", id))
            .as_writer()
            .json(&json!({ "amount": "200.00" }))
            .await;

        response.assert_status(StatusCode::CONFLICT);
        assert_eq!(
            response.json::<Value>()["details"],
            json!(["eligibility-negative", "escalate", "withdraw"])
        );
    }

    #[tokio::test]
    async fn test_zero_settlement_is_unprocessable() {
        let server = server();
        let id = create_claim(&server, 200).await;

        let response = server
            .post(&format!("/api/v1/claims/{}/settlement", id))
            .as_writer()
            .json(&json!({ "amount": "0" }))
            .await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_list_and_summary() {
        let server = server();
        let first = create_claim(&server, 200).await;
        create_claim(&server, 200).await;
        server
            .post(&format!("/api/v1/claims/{}/events", first))
            .as_writer()
            .json(&json!({ "event": "withdraw" }))
            .await
            .assert_status_ok();

        let all = server.get("/api/v1/claims").as_reader().await;
        all.assert_status_ok();
        assert_eq!(all.json::<Value>().as_array().unwrap().len(), 2);

        let closed = server
            .get("/api/v1/claims")
            .add_query_param("status", "CLOSED")
            .as_reader()
            .await;
        closed.assert_status_ok();
        let closed = closed.json::<Value>();
        assert_eq!(closed.as_array().unwrap().len(), 1);
        assert_eq!(closed[0]["id"], first.as_str());

        let summary = server.get("/api/v1/claims/summary").as_reader().await;
        summary.assert_status_ok();
        let summary = summary.json::<Value>();
        assert_eq!(summary["total"], 2);
        assert_eq!(summary["by_status"]["NEW"], 1);
        assert_eq!(summary["by_status"]["CLOSED"], 1);
        assert_eq!(summary["by_status"]["PAID"], 0);
    }

    #[tokio::test]
    async fn test_unknown_status_filter_is_bad_request() {
        let response = server()
            .get("/api/v1/claims")
            .add_query_param("status", "LOST")
            .as_reader()
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }
}
