//! Partner systems that hold seat inventory and perform the actual reservation.
//!
//! Every partner speaks its own wire protocol; adapters translate the canonical
//! [`ReservationRequest`] into that protocol and normalize the answer back into
//! [`ReservationResult`]s.

mod http;
pub mod localized;
pub mod resolver;
pub mod standard;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use thiserror::Error;
use uuid::Uuid;

use crate::models::TicketType;

pub use localized::LocalizedPartner;
pub use resolver::{PartnerProtocol, PartnerResolver, PartnerSettings, PartnersConfig};
pub use standard::StandardPartner;

/// Canonical reservation request handed to every partner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservationRequest {
    pub event_id: Uuid,
    /// Spot names in the order the buyer asked for them, duplicates included.
    pub spots: Vec<String>,
    pub ticket_type: TicketType,
    pub email: String,
    pub card_hash: String,
}

/// One reserved spot as reported by a partner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservationResult {
    pub id: String,
    pub email: String,
    pub spot: String,
    pub ticket_type: TicketType,
    pub status: String,
    pub event_id: String,
}

#[derive(Debug, Error)]
pub enum PartnerError {
    #[error("no partner configured for id {0}")]
    UnknownPartner(i32),

    #[error("partner unreachable")]
    Unreachable(#[source] reqwest::Error),

    #[error("partner rejected the reservation with status {0}")]
    Rejected(u16),

    #[error("unexpected partner response: {0}")]
    Protocol(String),

    #[error("could not build partner client")]
    ClientSetup(#[source] reqwest::Error),
}

/// The single capability every partner offers. Implementations do not retry.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ReservationPartner: Send + Sync {
    async fn make_reservation(
        &self,
        request: &ReservationRequest,
    ) -> Result<Vec<ReservationResult>, PartnerError>;
}
