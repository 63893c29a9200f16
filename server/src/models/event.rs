use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{DomainError, Spot, Ticket, PRICE_DECIMAL_PLACES};

/// Age rating of an event, stored with its short code (`L`, `L10`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rating {
    #[serde(rename = "L")]
    Free,
    #[serde(rename = "L10")]
    Age10,
    #[serde(rename = "L12")]
    Age12,
    #[serde(rename = "L14")]
    Age14,
    #[serde(rename = "L16")]
    Age16,
    #[serde(rename = "L18")]
    Age18,
}

impl Rating {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rating::Free => "L",
            Rating::Age10 => "L10",
            Rating::Age12 => "L12",
            Rating::Age14 => "L14",
            Rating::Age16 => "L16",
            Rating::Age18 => "L18",
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Rating {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "L" => Ok(Rating::Free),
            "L10" => Ok(Rating::Age10),
            "L12" => Ok(Rating::Age12),
            "L14" => Ok(Rating::Age14),
            "L16" => Ok(Rating::Age16),
            "L18" => Ok(Rating::Age18),
            other => Err(format!("unknown rating '{other}'")),
        }
    }
}

/// An event whose seats are fulfilled by the partner identified by `partner_id`.
///
/// The spots and tickets are loaded together with the event by the repository.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: Uuid,
    pub name: String,
    pub location: String,
    pub organization: String,
    pub rating: Rating,
    pub date: DateTime<Utc>,
    pub image_url: String,
    pub capacity: i32,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub partner_id: i32,
    #[serde(default)]
    pub spots: Vec<Spot>,
    #[serde(default)]
    pub tickets: Vec<Ticket>,
}

/// Operator input for creating an event.
#[derive(Debug, Clone, Deserialize)]
pub struct NewEvent {
    pub name: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub organization: String,
    pub rating: Rating,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub image_url: String,
    pub capacity: i32,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub partner_id: i32,
}

impl Event {
    /// Builds a validated event with a fresh id and no spots.
    pub fn create(new: NewEvent) -> Result<Self, DomainError> {
        let event = Self {
            id: Uuid::new_v4(),
            name: new.name,
            location: new.location,
            organization: new.organization,
            rating: new.rating,
            date: new.date,
            image_url: new.image_url,
            capacity: new.capacity,
            price: new.price,
            partner_id: new.partner_id,
            spots: Vec::new(),
            tickets: Vec::new(),
        };

        event.validate()?;
        Ok(event)
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        self.validate_at(Utc::now())
    }

    /// Checks the event invariants against the given creation time.
    pub fn validate_at(&self, now: DateTime<Utc>) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::EventNameRequired);
        }
        if self.date <= now {
            return Err(DomainError::InvalidDate);
        }
        if self.capacity <= 0 {
            return Err(DomainError::CapacityNotPositive);
        }
        if self.price < Decimal::ZERO {
            return Err(DomainError::PriceNegative);
        }
        if self.price.normalize().scale() > PRICE_DECIMAL_PLACES {
            return Err(DomainError::PriceTooPrecise);
        }
        Ok(())
    }

    /// Creates a new available spot for this event and tracks it on the event.
    pub fn add_spot(&mut self, name: &str) -> Result<Spot, DomainError> {
        let spot = Spot::new(self.id, name)?;
        self.spots.push(spot.clone());
        Ok(spot)
    }

    pub fn spot(&self, name: &str) -> Option<&Spot> {
        self.spots.iter().find(|spot| spot.name == name)
    }
}
