use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpotStatus {
    Available,
    Sold,
}

impl SpotStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpotStatus::Available => "available",
            SpotStatus::Sold => "sold",
        }
    }
}

impl fmt::Display for SpotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SpotStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "available" => Ok(SpotStatus::Available),
            "sold" => Ok(SpotStatus::Sold),
            other => Err(format!("unknown spot status '{other}'")),
        }
    }
}

/// A numbered seat of an event. Moves from `Available` to `Sold` exactly once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spot {
    pub id: Uuid,
    pub event_id: Uuid,
    pub name: String,
    pub status: SpotStatus,
    pub ticket_id: Option<Uuid>,
}

impl Spot {
    pub fn new(event_id: Uuid, name: &str) -> Result<Self, DomainError> {
        validate_name(name)?;

        Ok(Self {
            id: Uuid::new_v4(),
            event_id,
            name: name.to_string(),
            status: SpotStatus::Available,
            ticket_id: None,
        })
    }

    pub fn is_available(&self) -> bool {
        self.status == SpotStatus::Available
    }

    /// Marks the spot as sold to `ticket_id`.
    ///
    /// Not idempotent: a second call fails with `AlreadyReserved`.
    pub fn reserve(&mut self, ticket_id: Uuid) -> Result<(), DomainError> {
        if !self.is_available() {
            return Err(DomainError::AlreadyReserved);
        }

        self.status = SpotStatus::Sold;
        self.ticket_id = Some(ticket_id);
        Ok(())
    }
}

/// Spot names are an uppercase letter followed by a digit, e.g. `A1`.
pub fn validate_name(name: &str) -> Result<(), DomainError> {
    let mut chars = name.chars();

    let Some(first) = chars.next() else {
        return Err(DomainError::SpotNameRequired);
    };
    let Some(second) = chars.next() else {
        return Err(DomainError::SpotNameTooShort);
    };
    if !first.is_ascii_uppercase() {
        return Err(DomainError::FirstCharNotLetter);
    }
    if !second.is_ascii_digit() {
        return Err(DomainError::SecondCharNotDigit);
    }
    if chars.next().is_some() {
        return Err(DomainError::SpotNameTooLong);
    }

    Ok(())
}
