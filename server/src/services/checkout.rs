//! Ticket purchase orchestration.
//!
//! A purchase moves forward only:
//! `pending -> partner_reserved -> (ticket issued, spot sold)* -> completed`.
//! Once the partner has confirmed a reservation nothing is rolled back; a failure
//! past that point is reported as [`CheckoutError::IncompleteIssuance`] and the
//! purchase intent is left `incomplete` for reconciliation.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::models::{
    DomainError, Event, IntentStatus, PricingPolicy, PurchaseIntent, Ticket, TicketType,
};
use crate::partners::{PartnerError, PartnerResolver, ReservationRequest, ReservationResult};
use crate::repository::{EventRepository, RepositoryError};

#[derive(Debug, Clone, Deserialize)]
pub struct BuyTicketsInput {
    pub event_id: Uuid,
    pub spots: Vec<String>,
    pub ticket_type: String,
    pub card_hash: String,
    pub email: String,
}

/// What the buyer gets back for every issued ticket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TicketView {
    pub id: Uuid,
    pub spot_id: Uuid,
    pub ticket_type: TicketType,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

impl From<&Ticket> for TicketView {
    fn from(ticket: &Ticket) -> Self {
        Self {
            id: ticket.id,
            spot_id: ticket.spot_id,
            ticket_type: ticket.ticket_type,
            price: ticket.price,
        }
    }
}

/// Why local issuance stopped after the partner had already reserved.
#[derive(Debug, Error)]
pub enum IssuanceFailure {
    #[error("partner returned unexpected results: {0}")]
    UnexpectedResults(String),

    #[error("spot {0} not found")]
    SpotNotFound(String),

    #[error("spot {0} already reserved")]
    AlreadyReserved(String),

    #[error("ticket could not be issued: {0}")]
    Ticket(DomainError),

    #[error("storage error: {0}")]
    Storage(RepositoryError),
}

#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error(transparent)]
    Invalid(#[from] DomainError),

    #[error("event {0} not found")]
    EventNotFound(Uuid),

    #[error(transparent)]
    Partner(#[from] PartnerError),

    #[error("storage error")]
    Repository(#[from] RepositoryError),

    #[error("purchase {intent_id} was reserved by the partner but local issuance is incomplete: {cause}")]
    IncompleteIssuance {
        intent_id: Uuid,
        issued: Vec<TicketView>,
        cause: IssuanceFailure,
    },
}

pub struct CheckoutService {
    repository: Arc<dyn EventRepository>,
    partners: PartnerResolver,
    pricing: PricingPolicy,
}

impl CheckoutService {
    pub fn new(
        repository: Arc<dyn EventRepository>,
        partners: PartnerResolver,
        pricing: PricingPolicy,
    ) -> Self {
        Self {
            repository,
            partners,
            pricing,
        }
    }

    /// Reserves the requested spots with the event's partner and issues one
    /// ticket per reservation, in the partner's order.
    pub async fn buy_tickets(
        &self,
        input: BuyTicketsInput,
    ) -> Result<Vec<TicketView>, CheckoutError> {
        let ticket_type: TicketType = input.ticket_type.parse()?;

        let event = self
            .repository
            .find_event_by_id(input.event_id)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => CheckoutError::EventNotFound(input.event_id),
                other => CheckoutError::Repository(other),
            })?;

        // Every ticket shares the same price, so a bad price fails here with no side effects.
        Ticket::price_for(&event, ticket_type, self.pricing)?;

        let partner = self.partners.create_partner(event.partner_id)?;

        let request = ReservationRequest {
            event_id: event.id,
            spots: input.spots,
            ticket_type,
            email: input.email,
            card_hash: input.card_hash,
        };

        let intent = PurchaseIntent::new(
            event.id,
            event.partner_id,
            request.spots.clone(),
            ticket_type,
            request.email.clone(),
        );
        self.repository.create_purchase_intent(&intent).await?;

        info!(
            intent_id = %intent.id,
            event_id = %event.id,
            partner_id = event.partner_id,
            spots = ?request.spots,
            "Requesting partner reservation"
        );

        let results = match partner.make_reservation(&request).await {
            Ok(results) => results,
            Err(e) => {
                warn!(intent_id = %intent.id, error = %e, "Partner reservation failed");
                self.record_outcome(intent.id, IntentStatus::Aborted, Some(e.to_string()))
                    .await;
                return Err(e.into());
            }
        };

        let mut issued = Vec::with_capacity(results.len());
        match self
            .issue_tickets(intent.id, &event, ticket_type, &request, &results, &mut issued)
            .await
        {
            Ok(()) => {
                self.record_outcome(intent.id, IntentStatus::Completed, None).await;
                info!(
                    intent_id = %intent.id,
                    tickets = issued.len(),
                    "Purchase completed"
                );
                Ok(issued)
            }
            Err(cause) => {
                error!(
                    intent_id = %intent.id,
                    event_id = %event.id,
                    issued = issued.len(),
                    error = %cause,
                    "Partner reservation succeeded but local issuance is incomplete"
                );
                self.record_outcome(
                    intent.id,
                    IntentStatus::Incomplete,
                    Some(cause.to_string()),
                )
                .await;
                Err(CheckoutError::IncompleteIssuance {
                    intent_id: intent.id,
                    issued,
                    cause,
                })
            }
        }
    }

    /// Purchases that still need an operator: pending, partner-reserved or incomplete.
    pub async fn unfinished_purchases(&self) -> Result<Vec<PurchaseIntent>, RepositoryError> {
        self.repository.find_unfinished_intents().await
    }

    async fn issue_tickets(
        &self,
        intent_id: Uuid,
        event: &Event,
        ticket_type: TicketType,
        request: &ReservationRequest,
        results: &[ReservationResult],
        issued: &mut Vec<TicketView>,
    ) -> Result<(), IssuanceFailure> {
        self.repository
            .update_purchase_intent(intent_id, IntentStatus::PartnerReserved, None)
            .await
            .map_err(IssuanceFailure::Storage)?;

        check_results(&request.spots, results)?;

        for result in results {
            let name = result.spot.as_str();

            let mut spot = self
                .repository
                .find_spot_by_name(event.id, name)
                .await
                .map_err(|e| match e {
                    RepositoryError::NotFound => IssuanceFailure::SpotNotFound(name.to_string()),
                    other => IssuanceFailure::Storage(other),
                })?;

            let ticket = Ticket::new(event, &spot, ticket_type, self.pricing)
                .map_err(IssuanceFailure::Ticket)?;

            spot.reserve(ticket.id)
                .map_err(|_| IssuanceFailure::AlreadyReserved(name.to_string()))?;

            self.repository
                .issue_ticket(&ticket)
                .await
                .map_err(|e| spot_write_failure(e, name))?;

            info!(
                intent_id = %intent_id,
                spot = name,
                ticket_id = %ticket.id,
                partner_reservation = %result.id,
                "Ticket issued"
            );
            issued.push(TicketView::from(&ticket));
        }

        Ok(())
    }

    /// Best effort: the purchase outcome stands even if the intent cannot be updated.
    async fn record_outcome(
        &self,
        intent_id: Uuid,
        status: IntentStatus,
        detail: Option<String>,
    ) {
        if let Err(e) = self
            .repository
            .update_purchase_intent(intent_id, status, detail)
            .await
        {
            error!(intent_id = %intent_id, %status, error = ?e, "Failed to update purchase intent");
        }
    }
}

fn spot_write_failure(error: RepositoryError, spot: &str) -> IssuanceFailure {
    match error {
        RepositoryError::Conflict => IssuanceFailure::AlreadyReserved(spot.to_string()),
        RepositoryError::NotFound => IssuanceFailure::SpotNotFound(spot.to_string()),
        other => IssuanceFailure::Storage(other),
    }
}

/// The partner must answer exactly the spots that were asked for.
fn check_results(
    requested: &[String],
    results: &[ReservationResult],
) -> Result<(), IssuanceFailure> {
    if results.len() != requested.len() {
        return Err(IssuanceFailure::UnexpectedResults(format!(
            "expected {} reservations, got {}",
            requested.len(),
            results.len()
        )));
    }

    if let Some(stray) = results.iter().find(|r| !requested.contains(&r.spot)) {
        return Err(IssuanceFailure::UnexpectedResults(format!(
            "spot {} was not requested",
            stray.spot
        )));
    }

    Ok(())
}
