//! Partner speaking English field names on `/events/{id}/reserve`.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::http::{join_url, post_reservation};
use super::{PartnerError, ReservationPartner, ReservationRequest, ReservationResult};
use crate::models::TicketType;

#[derive(Debug, Serialize)]
struct ReserveBody<'a> {
    spots: &'a [String],
    ticket_kind: TicketType,
    email: &'a str,
    event_id: Uuid,
}

#[derive(Debug, Deserialize)]
struct Reservation {
    id: String,
    email: String,
    spot: String,
    ticket_kind: TicketType,
    status: String,
    event_id: String,
}

impl From<Reservation> for ReservationResult {
    fn from(r: Reservation) -> Self {
        Self {
            id: r.id,
            email: r.email,
            spot: r.spot,
            ticket_type: r.ticket_kind,
            status: r.status,
            event_id: r.event_id,
        }
    }
}

#[derive(Debug, Clone)]
pub struct StandardPartner {
    client: Client,
    base_url: String,
    api_token: Option<String>,
}

impl StandardPartner {
    pub fn new(client: Client, base_url: impl Into<String>, api_token: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_token,
        }
    }
}

#[async_trait]
impl ReservationPartner for StandardPartner {
    async fn make_reservation(
        &self,
        request: &ReservationRequest,
    ) -> Result<Vec<ReservationResult>, PartnerError> {
        let url = join_url(
            &self.base_url,
            &format!("events/{}/reserve", request.event_id),
        );
        let body = ReserveBody {
            spots: &request.spots,
            ticket_kind: request.ticket_type,
            email: &request.email,
            event_id: request.event_id,
        };

        let reservations: Vec<Reservation> =
            post_reservation(&self.client, &url, self.api_token.as_deref(), &body).await?;

        Ok(reservations.into_iter().map(ReservationResult::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::extract::Path;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{json, Value};
    use tokio::sync::Mutex;

    use super::*;
    use crate::partners::http::testing::{closed_port_url, spawn_partner};
    use crate::partners::http::API_TOKEN_HEADER;

    fn request(event_id: Uuid) -> ReservationRequest {
        ReservationRequest {
            event_id,
            spots: vec!["A1".to_string(), "A2".to_string()],
            ticket_type: TicketType::Half,
            email: "buyer@example.com".to_string(),
            card_hash: "card-hash".to_string(),
        }
    }

    fn echo_router(captured: Arc<Mutex<Option<(String, Option<String>, Value)>>>) -> Router {
        Router::new().route(
            "/events/:id/reserve",
            post(
                move |Path(id): Path<String>, headers: HeaderMap, Json(body): Json<Value>| {
                    let captured = captured.clone();
                    async move {
                        let token = headers
                            .get(API_TOKEN_HEADER)
                            .and_then(|v| v.to_str().ok())
                            .map(str::to_string);
                        *captured.lock().await = Some((id.clone(), token, body.clone()));

                        let reservations: Vec<Value> = body["spots"]
                            .as_array()
                            .cloned()
                            .unwrap_or_default()
                            .into_iter()
                            .enumerate()
                            .map(|(i, spot)| {
                                json!({
                                    "id": format!("res-{i}"),
                                    "email": body["email"],
                                    "spot": spot,
                                    "ticket_kind": body["ticket_kind"],
                                    "status": "reserved",
                                    "event_id": id,
                                })
                            })
                            .collect();
                        (StatusCode::CREATED, Json(reservations))
                    }
                },
            ),
        )
    }

    #[tokio::test]
    async fn test_maps_request_and_response_fields() {
        let captured = Arc::new(Mutex::new(None));
        let base_url = spawn_partner(echo_router(captured.clone())).await;
        let partner = StandardPartner::new(Client::new(), base_url, Some("secret".to_string()));
        let event_id = Uuid::new_v4();

        let results = partner.make_reservation(&request(event_id)).await.unwrap();

        let (path_id, token, body) = captured.lock().await.clone().unwrap();
        assert_eq!(path_id, event_id.to_string());
        assert_eq!(token.as_deref(), Some("secret"));
        assert_eq!(body["spots"], json!(["A1", "A2"]));
        assert_eq!(body["ticket_kind"], "half");
        assert_eq!(body["email"], "buyer@example.com");
        assert!(body.get("card_hash").is_none());

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].spot, "A1");
        assert_eq!(results[1].spot, "A2");
        assert_eq!(results[0].ticket_type, TicketType::Half);
        assert_eq!(results[0].event_id, event_id.to_string());
    }

    #[tokio::test]
    async fn test_non_created_status_is_rejection() {
        for status in [StatusCode::OK, StatusCode::CONFLICT] {
            let router = Router::new().route(
                "/events/:id/reserve",
                post(move || async move { (status, Json(json!([]))) }),
            );
            let base_url = spawn_partner(router).await;
            let partner = StandardPartner::new(Client::new(), base_url, None);

            let result = partner.make_reservation(&request(Uuid::new_v4())).await;

            assert!(
                matches!(result, Err(PartnerError::Rejected(code)) if code == status.as_u16()),
                "expected Rejected({status}), got {result:?}"
            );
        }
    }

    #[tokio::test]
    async fn test_malformed_body_is_protocol_error() {
        let router = Router::new().route(
            "/events/:id/reserve",
            post(|| async { (StatusCode::CREATED, "not json") }),
        );
        let base_url = spawn_partner(router).await;
        let partner = StandardPartner::new(Client::new(), base_url, None);

        let result = partner.make_reservation(&request(Uuid::new_v4())).await;

        assert!(matches!(result, Err(PartnerError::Protocol(_))), "got {result:?}");
    }

    #[tokio::test]
    async fn test_connection_failure_is_unreachable() {
        let partner = StandardPartner::new(Client::new(), closed_port_url().await, None);

        let result = partner.make_reservation(&request(Uuid::new_v4())).await;

        assert!(matches!(result, Err(PartnerError::Unreachable(_))), "got {result:?}");
    }

    #[tokio::test]
    async fn test_timeout_is_unreachable() {
        let router = Router::new().route(
            "/events/:id/reserve",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(2)).await;
                (StatusCode::CREATED, Json(json!([])))
            }),
        );
        let base_url = spawn_partner(router).await;
        let client = Client::builder()
            .timeout(Duration::from_millis(100))
            .build()
            .unwrap();
        let partner = StandardPartner::new(client, base_url, None);

        let result = partner.make_reservation(&request(Uuid::new_v4())).await;

        assert!(matches!(result, Err(PartnerError::Unreachable(_))), "got {result:?}");
    }
}
