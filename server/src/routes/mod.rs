use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::config::{apply_security_headers, create_cors_layer, Config};
use crate::handlers::{add_spot, buy_tickets, create_event, health_check, AppState};

pub fn create_routes(state: AppState, config: &Config) -> Router {
    let router = Router::new()
        .route("/health", get(health_check))
        .route("/checkout", post(buy_tickets))
        .route("/events", post(create_event))
        .route("/events/:event_id/spots", post(add_spot))
        .with_state(state);

    apply_security_headers(router, config.production)
        .layer(TraceLayer::new_for_http())
        .layer(create_cors_layer(config.cors_allowed_origins.as_deref()))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use chrono::{Duration, Utc};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::models::PricingPolicy;
    use crate::partners::{
        MockReservationPartner, PartnerError, PartnerResolver, ReservationPartner,
        ReservationResult,
    };
    use crate::services::CheckoutService;
    use crate::test::InMemoryEventRepository;

    fn app(partner: MockReservationPartner) -> Router {
        let repository = Arc::new(InMemoryEventRepository::new());
        let partner: Arc<dyn ReservationPartner> = Arc::new(partner);
        let checkout = Arc::new(CheckoutService::new(
            repository.clone(),
            PartnerResolver::new([(1, partner)]),
            PricingPolicy::Strict,
        ));
        let config = Config::from_lookup(|_| None).unwrap();

        create_routes(
            AppState {
                repository,
                checkout,
            },
            &config,
        )
    }

    fn echo_partner() -> MockReservationPartner {
        let mut partner = MockReservationPartner::new();
        partner.expect_make_reservation().returning(|request| {
            Ok(request
                .spots
                .iter()
                .map(|spot| ReservationResult {
                    id: format!("res-{spot}"),
                    email: request.email.clone(),
                    spot: spot.clone(),
                    ticket_type: request.ticket_type,
                    status: "reserved".to_string(),
                    event_id: request.event_id.to_string(),
                })
                .collect())
        });
        partner
    }

    async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn create_event(app: &Router, price: f64) -> String {
        let (status, body) = post(
            app,
            "/events",
            json!({
                "name": "Rust Conf",
                "location": "Main Hall",
                "organization": "Rustaceans",
                "rating": "L12",
                "date": (Utc::now() + Duration::days(10)).to_rfc3339(),
                "capacity": 50,
                "price": price,
                "partner_id": 1,
            }),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["data"]["id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_health_check() {
        let response = app(MockReservationPartner::new())
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["x-content-type-options"], "nosniff");
    }

    #[tokio::test]
    async fn test_event_in_the_past_is_rejected() {
        let app = app(MockReservationPartner::new());

        let (status, body) = post(
            &app,
            "/events",
            json!({
                "name": "Yesterday",
                "rating": "L",
                "date": (Utc::now() - Duration::days(1)).to_rfc3339(),
                "capacity": 10,
                "price": 10.0,
                "partner_id": 1,
            }),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_add_spot_validates_and_rejects_duplicates() {
        let app = app(MockReservationPartner::new());
        let event_id = create_event(&app, 100.0).await;
        let uri = format!("/events/{event_id}/spots");

        let (status, body) = post(&app, &uri, json!({ "name": "A1" })).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["status"], "available");

        let (status, _) = post(&app, &uri, json!({ "name": "A1" })).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, body) = post(&app, &uri, json!({ "name": "1A" })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["message"], "spot name must start with an uppercase letter");
    }

    #[tokio::test]
    async fn test_checkout_issues_tickets() {
        let app = app(echo_partner());
        let event_id = create_event(&app, 100.0).await;
        for name in ["A1", "A2"] {
            post(&app, &format!("/events/{event_id}/spots"), json!({ "name": name })).await;
        }

        let (status, body) = post(
            &app,
            "/checkout",
            json!({
                "event_id": event_id,
                "spots": ["A1", "A2"],
                "ticket_type": "half",
                "card_hash": "card-hash",
                "email": "buyer@example.com",
            }),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED, "{body}");
        let tickets = body["data"]["tickets"].as_array().unwrap();
        assert_eq!(tickets.len(), 2);
        assert_eq!(tickets[0]["price"], 50.0);
        assert_eq!(tickets[0]["ticket_type"], "half");
    }

    #[tokio::test]
    async fn test_checkout_unknown_event_is_not_found() {
        let app = app(MockReservationPartner::new());

        let (status, body) = post(
            &app,
            "/checkout",
            json!({
                "event_id": uuid::Uuid::new_v4(),
                "spots": ["A1"],
                "ticket_type": "full",
                "card_hash": "card-hash",
                "email": "buyer@example.com",
            }),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_partner_rejection_is_bad_gateway() {
        let mut partner = MockReservationPartner::new();
        partner
            .expect_make_reservation()
            .returning(|_| Err(PartnerError::Rejected(422)));
        let app = app(partner);
        let event_id = create_event(&app, 100.0).await;
        post(&app, &format!("/events/{event_id}/spots"), json!({ "name": "A1" })).await;

        let (status, body) = post(
            &app,
            "/checkout",
            json!({
                "event_id": event_id,
                "spots": ["A1"],
                "ticket_type": "full",
                "card_hash": "card-hash",
                "email": "buyer@example.com",
            }),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"]["code"], "PARTNER_ERROR");
    }

    #[tokio::test]
    async fn test_sold_spot_reports_incomplete_issuance() {
        let app = app(echo_partner());
        let event_id = create_event(&app, 100.0).await;
        post(&app, &format!("/events/{event_id}/spots"), json!({ "name": "A1" })).await;
        let purchase = json!({
            "event_id": event_id,
            "spots": ["A1"],
            "ticket_type": "full",
            "card_hash": "card-hash",
            "email": "buyer@example.com",
        });

        let (status, _) = post(&app, "/checkout", purchase.clone()).await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = post(&app, "/checkout", purchase).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["code"], "INCOMPLETE_ISSUANCE");
        assert!(body["error"]["details"]["intent_id"].is_string());
        assert_eq!(body["error"]["details"]["issued_tickets"], 0);
    }
}
