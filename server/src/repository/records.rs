//! Row shapes as stored in PostgreSQL and their conversion into domain models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;
use uuid::Uuid;

use super::RepositoryError;
use crate::models::{Event, PurchaseIntent, Spot, Ticket};

#[derive(Debug, FromRow)]
pub(super) struct EventRecord {
    pub id: Uuid,
    pub name: String,
    pub location: String,
    pub organization: String,
    pub rating: String,
    pub date: DateTime<Utc>,
    pub image_url: String,
    pub capacity: i32,
    pub price: Decimal,
    pub partner_id: i32,
}

impl EventRecord {
    pub fn into_event(
        self,
        spots: Vec<Spot>,
        tickets: Vec<Ticket>,
    ) -> Result<Event, RepositoryError> {
        Ok(Event {
            id: self.id,
            name: self.name,
            location: self.location,
            organization: self.organization,
            rating: self.rating.parse().map_err(RepositoryError::Corrupt)?,
            date: self.date,
            image_url: self.image_url,
            capacity: self.capacity,
            price: self.price,
            partner_id: self.partner_id,
            spots,
            tickets,
        })
    }
}

#[derive(Debug, FromRow)]
pub(super) struct SpotRecord {
    pub id: Uuid,
    pub event_id: Uuid,
    pub name: String,
    pub status: String,
    pub ticket_id: Option<Uuid>,
}

impl TryFrom<SpotRecord> for Spot {
    type Error = RepositoryError;

    fn try_from(record: SpotRecord) -> Result<Self, Self::Error> {
        Ok(Spot {
            id: record.id,
            event_id: record.event_id,
            name: record.name,
            status: record.status.parse().map_err(RepositoryError::Corrupt)?,
            ticket_id: record.ticket_id,
        })
    }
}

#[derive(Debug, FromRow)]
pub(super) struct TicketRecord {
    pub id: Uuid,
    pub event_id: Uuid,
    pub spot_id: Uuid,
    pub ticket_type: String,
    pub price: Decimal,
}

impl TryFrom<TicketRecord> for Ticket {
    type Error = RepositoryError;

    fn try_from(record: TicketRecord) -> Result<Self, Self::Error> {
        Ok(Ticket {
            id: record.id,
            event_id: record.event_id,
            spot_id: record.spot_id,
            ticket_type: record
                .ticket_type
                .parse()
                .map_err(|e| RepositoryError::Corrupt(format!("{e}")))?,
            price: record.price,
        })
    }
}

#[derive(Debug, FromRow)]
pub(super) struct PurchaseIntentRecord {
    pub id: Uuid,
    pub event_id: Uuid,
    pub partner_id: i32,
    pub spots: Vec<String>,
    pub ticket_type: String,
    pub email: String,
    pub status: String,
    pub detail: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<PurchaseIntentRecord> for PurchaseIntent {
    type Error = RepositoryError;

    fn try_from(record: PurchaseIntentRecord) -> Result<Self, Self::Error> {
        Ok(PurchaseIntent {
            id: record.id,
            event_id: record.event_id,
            partner_id: record.partner_id,
            spots: record.spots,
            ticket_type: record
                .ticket_type
                .parse()
                .map_err(|e| RepositoryError::Corrupt(format!("{e}")))?,
            email: record.email,
            status: record.status.parse().map_err(RepositoryError::Corrupt)?,
            detail: record.detail,
            created_at: record.created_at,
            updated_at: record.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SpotStatus, TicketType};

    #[test]
    fn test_spot_record_converts() {
        let record = SpotRecord {
            id: Uuid::new_v4(),
            event_id: Uuid::new_v4(),
            name: "A1".to_string(),
            status: "sold".to_string(),
            ticket_id: Some(Uuid::new_v4()),
        };

        let spot = Spot::try_from(record).unwrap();

        assert_eq!(spot.status, SpotStatus::Sold);
    }

    #[test]
    fn test_unknown_status_is_corrupt() {
        let record = SpotRecord {
            id: Uuid::new_v4(),
            event_id: Uuid::new_v4(),
            name: "A1".to_string(),
            status: "held".to_string(),
            ticket_id: None,
        };

        assert!(matches!(Spot::try_from(record), Err(RepositoryError::Corrupt(_))));
    }

    #[test]
    fn test_ticket_record_converts() {
        let record = TicketRecord {
            id: Uuid::new_v4(),
            event_id: Uuid::new_v4(),
            spot_id: Uuid::new_v4(),
            ticket_type: "half".to_string(),
            price: Decimal::from(50),
        };

        let ticket = Ticket::try_from(record).unwrap();

        assert_eq!(ticket.ticket_type, TicketType::Half);
        assert_eq!(ticket.price, Decimal::from(50));
    }
}
