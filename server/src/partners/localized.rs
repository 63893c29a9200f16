//! Partner speaking localized field names on `/eventos/{id}/reservar`.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::http::{join_url, post_reservation};
use super::{PartnerError, ReservationPartner, ReservationRequest, ReservationResult};
use crate::models::TicketType;

/// Ticket kind as the localized API spells it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
enum Kind {
    #[serde(rename = "inteira", alias = "full")]
    Whole,
    #[serde(rename = "meia", alias = "half")]
    Half,
}

impl From<TicketType> for Kind {
    fn from(ticket_type: TicketType) -> Self {
        match ticket_type {
            TicketType::Full => Kind::Whole,
            TicketType::Half => Kind::Half,
        }
    }
}

impl From<Kind> for TicketType {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Whole => TicketType::Full,
            Kind::Half => TicketType::Half,
        }
    }
}

#[derive(Debug, Serialize)]
struct ReserveBody<'a> {
    lugares: &'a [String],
    tipo_ingresso: Kind,
    email: &'a str,
    event_id: Uuid,
}

#[derive(Debug, Deserialize)]
struct Reservation {
    id: String,
    email: String,
    lugar: String,
    tipo_ingresso: Kind,
    status: String,
    event_id: String,
}

impl From<Reservation> for ReservationResult {
    fn from(r: Reservation) -> Self {
        Self {
            id: r.id,
            email: r.email,
            spot: r.lugar,
            ticket_type: r.tipo_ingresso.into(),
            status: r.status,
            event_id: r.event_id,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LocalizedPartner {
    client: Client,
    base_url: String,
    api_token: Option<String>,
}

impl LocalizedPartner {
    pub fn new(client: Client, base_url: impl Into<String>, api_token: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_token,
        }
    }
}

#[async_trait]
impl ReservationPartner for LocalizedPartner {
    async fn make_reservation(
        &self,
        request: &ReservationRequest,
    ) -> Result<Vec<ReservationResult>, PartnerError> {
        let url = join_url(
            &self.base_url,
            &format!("eventos/{}/reservar", request.event_id),
        );
        let body = ReserveBody {
            lugares: &request.spots,
            tipo_ingresso: request.ticket_type.into(),
            email: &request.email,
            event_id: request.event_id,
        };

        let reservations: Vec<Reservation> =
            post_reservation(&self.client, &url, self.api_token.as_deref(), &body).await?;

        Ok(reservations.into_iter().map(ReservationResult::from).collect())
    }
}
