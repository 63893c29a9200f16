use std::fmt;
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{DomainError, Event, Spot, PRICE_DECIMAL_PLACES};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketType {
    Full,
    Half,
}

impl TicketType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketType::Full => "full",
            TicketType::Half => "half",
        }
    }
}

impl fmt::Display for TicketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TicketType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "full" => Ok(TicketType::Full),
            "half" => Ok(TicketType::Half),
            other => Err(DomainError::InvalidTicketType(other.to_string())),
        }
    }
}

/// Whether a derived ticket price of zero is acceptable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PricingPolicy {
    /// Every ticket must cost more than zero.
    #[default]
    Strict,
    /// Tickets for free events are issued at price zero.
    AllowFree,
}

impl PricingPolicy {
    pub fn from_allow_free(allow_free: bool) -> Self {
        if allow_free {
            PricingPolicy::AllowFree
        } else {
            PricingPolicy::Strict
        }
    }
}

/// Proof of purchase for exactly one spot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: Uuid,
    pub event_id: Uuid,
    pub spot_id: Uuid,
    pub ticket_type: TicketType,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

impl Ticket {
    /// Issues a ticket for `spot`, pricing it from the event's base price.
    pub fn new(
        event: &Event,
        spot: &Spot,
        ticket_type: TicketType,
        policy: PricingPolicy,
    ) -> Result<Self, DomainError> {
        let price = Self::price_for(event, ticket_type, policy)?;

        Ok(Self {
            id: Uuid::new_v4(),
            event_id: event.id,
            spot_id: spot.id,
            ticket_type,
            price,
        })
    }

    /// Base price of the event, halved for half tickets, rounded half away
    /// from zero to whole cents.
    pub fn price_for(
        event: &Event,
        ticket_type: TicketType,
        policy: PricingPolicy,
    ) -> Result<Decimal, DomainError> {
        let price = match ticket_type {
            TicketType::Full => event.price,
            TicketType::Half => event.price / Decimal::TWO,
        }
        .round_dp_with_strategy(PRICE_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero);

        let acceptable = match policy {
            PricingPolicy::Strict => price > Decimal::ZERO,
            PricingPolicy::AllowFree => price >= Decimal::ZERO,
        };
        if !acceptable {
            return Err(DomainError::PriceNotPositive);
        }

        Ok(price)
    }
}
