use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::TicketType;

/// Progress of a purchase across the partner call and local issuance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntentStatus {
    /// Written before calling the partner.
    Pending,
    /// The partner confirmed the reservation; local issuance in progress.
    PartnerReserved,
    Completed,
    /// The partner call failed; nothing was issued locally.
    Aborted,
    /// The partner reserved the spots but local issuance failed partway.
    Incomplete,
}

impl IntentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntentStatus::Pending => "pending",
            IntentStatus::PartnerReserved => "partner_reserved",
            IntentStatus::Completed => "completed",
            IntentStatus::Aborted => "aborted",
            IntentStatus::Incomplete => "incomplete",
        }
    }

    /// Statuses that need an operator (or a reconciliation job) to look at them.
    pub fn is_unfinished(&self) -> bool {
        matches!(
            self,
            IntentStatus::Pending | IntentStatus::PartnerReserved | IntentStatus::Incomplete
        )
    }
}

impl fmt::Display for IntentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IntentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(IntentStatus::Pending),
            "partner_reserved" => Ok(IntentStatus::PartnerReserved),
            "completed" => Ok(IntentStatus::Completed),
            "aborted" => Ok(IntentStatus::Aborted),
            "incomplete" => Ok(IntentStatus::Incomplete),
            other => Err(format!("unknown intent status '{other}'")),
        }
    }
}

/// Durable record of a purchase, written before the partner is called.
///
/// The card hash is never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct PurchaseIntent {
    pub id: Uuid,
    pub event_id: Uuid,
    pub partner_id: i32,
    pub spots: Vec<String>,
    pub ticket_type: TicketType,
    pub email: String,
    pub status: IntentStatus,
    pub detail: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PurchaseIntent {
    pub fn new(
        event_id: Uuid,
        partner_id: i32,
        spots: Vec<String>,
        ticket_type: TicketType,
        email: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            event_id,
            partner_id,
            spots,
            ticket_type,
            email,
            status: IntentStatus::Pending,
            detail: None,
            created_at: now,
            updated_at: now,
        }
    }
}
