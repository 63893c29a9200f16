use async_trait::async_trait;
use chrono::Utc;
use sqlx::{query, query_as, PgPool};
use tracing::debug;
use uuid::Uuid;

use super::records::{EventRecord, PurchaseIntentRecord, SpotRecord, TicketRecord};
use super::{EventRepository, RepositoryError};
use crate::models::{Event, IntentStatus, PurchaseIntent, Spot, SpotStatus, Ticket};

const FIND_EVENT_SQL: &str = "
    SELECT id, name, location, organization, rating, date, image_url, capacity, price, partner_id
    FROM events
    WHERE id = $1";

const FIND_EVENT_SPOTS_SQL: &str = "
    SELECT id, event_id, name, status, ticket_id
    FROM spots
    WHERE event_id = $1
    ORDER BY name";

const FIND_EVENT_TICKETS_SQL: &str = "
    SELECT id, event_id, spot_id, ticket_type, price
    FROM tickets
    WHERE event_id = $1";

const CREATE_EVENT_SQL: &str = "
    INSERT INTO events (id, name, location, organization, rating, date, image_url, capacity, price, partner_id)
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)";

const CREATE_SPOT_SQL: &str = "
    INSERT INTO spots (id, event_id, name, status, ticket_id)
    VALUES ($1, $2, $3, $4, $5)";

const FIND_SPOT_BY_NAME_SQL: &str = "
    SELECT id, event_id, name, status, ticket_id
    FROM spots
    WHERE event_id = $1 AND name = $2";

const CREATE_TICKET_SQL: &str = "
    INSERT INTO tickets (id, event_id, spot_id, ticket_type, price)
    VALUES ($1, $2, $3, $4, $5)";

const RESERVE_SPOT_SQL: &str = "
    UPDATE spots
    SET status = $3, ticket_id = $2
    WHERE id = $1 AND status = $4";

const SPOT_EXISTS_SQL: &str = "SELECT EXISTS (SELECT 1 FROM spots WHERE id = $1)";

const CREATE_INTENT_SQL: &str = "
    INSERT INTO purchase_intents
        (id, event_id, partner_id, spots, ticket_type, email, status, detail, created_at, updated_at)
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)";

const UPDATE_INTENT_SQL: &str = "
    UPDATE purchase_intents
    SET status = $2, detail = $3, updated_at = $4
    WHERE id = $1";

const FIND_UNFINISHED_INTENTS_SQL: &str = "
    SELECT id, event_id, partner_id, spots, ticket_type, email, status, detail, created_at, updated_at
    FROM purchase_intents
    WHERE status IN ('pending', 'partner_reserved', 'incomplete')
    ORDER BY created_at";

#[derive(Debug, Clone)]
pub struct PgEventRepository {
    pool: PgPool,
}

impl PgEventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventRepository for PgEventRepository {
    async fn find_event_by_id(&self, event_id: Uuid) -> Result<Event, RepositoryError> {
        let record = query_as::<_, EventRecord>(FIND_EVENT_SQL)
            .bind(event_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)?;

        let spots = query_as::<_, SpotRecord>(FIND_EVENT_SPOTS_SQL)
            .bind(event_id)
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(Spot::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        let tickets = query_as::<_, TicketRecord>(FIND_EVENT_TICKETS_SQL)
            .bind(event_id)
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(Ticket::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        record.into_event(spots, tickets)
    }

    async fn create_event(&self, event: &Event) -> Result<(), RepositoryError> {
        query(CREATE_EVENT_SQL)
            .bind(event.id)
            .bind(&event.name)
            .bind(&event.location)
            .bind(&event.organization)
            .bind(event.rating.as_str())
            .bind(event.date)
            .bind(&event.image_url)
            .bind(event.capacity)
            .bind(event.price)
            .bind(event.partner_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn create_spot(&self, spot: &Spot) -> Result<(), RepositoryError> {
        query(CREATE_SPOT_SQL)
            .bind(spot.id)
            .bind(spot.event_id)
            .bind(&spot.name)
            .bind(spot.status.as_str())
            .bind(spot.ticket_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn find_spot_by_name(&self, event_id: Uuid, name: &str) -> Result<Spot, RepositoryError> {
        query_as::<_, SpotRecord>(FIND_SPOT_BY_NAME_SQL)
            .bind(event_id)
            .bind(name)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)
            .and_then(Spot::try_from)
    }

    async fn issue_ticket(&self, ticket: &Ticket) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let rows_affected = query(RESERVE_SPOT_SQL)
            .bind(ticket.spot_id)
            .bind(ticket.id)
            .bind(SpotStatus::Sold.as_str())
            .bind(SpotStatus::Available.as_str())
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if rows_affected != 1 {
            let (exists,): (bool,) = query_as(SPOT_EXISTS_SQL)
                .bind(ticket.spot_id)
                .fetch_one(&mut *tx)
                .await?;

            debug!(spot_id = %ticket.spot_id, exists, "Spot was not available for reservation");

            return Err(if exists {
                RepositoryError::Conflict
            } else {
                RepositoryError::NotFound
            });
        }

        query(CREATE_TICKET_SQL)
            .bind(ticket.id)
            .bind(ticket.event_id)
            .bind(ticket.spot_id)
            .bind(ticket.ticket_type.as_str())
            .bind(ticket.price)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(())
    }

    async fn create_purchase_intent(&self, intent: &PurchaseIntent) -> Result<(), RepositoryError> {
        query(CREATE_INTENT_SQL)
            .bind(intent.id)
            .bind(intent.event_id)
            .bind(intent.partner_id)
            .bind(&intent.spots)
            .bind(intent.ticket_type.as_str())
            .bind(&intent.email)
            .bind(intent.status.as_str())
            .bind(&intent.detail)
            .bind(intent.created_at)
            .bind(intent.updated_at)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn update_purchase_intent(
        &self,
        intent_id: Uuid,
        status: IntentStatus,
        detail: Option<String>,
    ) -> Result<(), RepositoryError> {
        let rows_affected = query(UPDATE_INTENT_SQL)
            .bind(intent_id)
            .bind(status.as_str())
            .bind(detail)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?
            .rows_affected();

        if rows_affected == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn find_unfinished_intents(&self) -> Result<Vec<PurchaseIntent>, RepositoryError> {
        query_as::<_, PurchaseIntentRecord>(FIND_UNFINISHED_INTENTS_SQL)
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(PurchaseIntent::try_from)
            .collect()
    }
}
