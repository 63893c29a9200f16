//! Storage collaborator used by the checkout flow.

pub mod postgres;
mod records;

use async_trait::async_trait;
use sqlx::error::{DatabaseError, ErrorKind};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Event, IntentStatus, PurchaseIntent, Spot, Ticket};

pub use postgres::PgEventRepository;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,

    #[error("conflicting write")]
    Conflict,

    #[error("stored record is unreadable: {0}")]
    Corrupt(String),

    #[error("storage error")]
    Sql(#[source] sqlx::Error),
}

impl From<sqlx::Error> for RepositoryError {
    fn from(error: sqlx::Error) -> Self {
        if matches!(error, sqlx::Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::Conflict,
            Some(ErrorKind::ForeignKeyViolation) => Self::NotFound,
            _ => Self::Sql(error),
        }
    }
}

#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Loads an event together with its spots and issued tickets.
    async fn find_event_by_id(&self, event_id: Uuid) -> Result<Event, RepositoryError>;

    async fn create_event(&self, event: &Event) -> Result<(), RepositoryError>;

    async fn create_spot(&self, spot: &Spot) -> Result<(), RepositoryError>;

    async fn find_spot_by_name(&self, event_id: Uuid, name: &str) -> Result<Spot, RepositoryError>;

    /// Persists `ticket` and moves its spot from available to sold, all or nothing.
    ///
    /// Fails with `Conflict` when the spot is no longer available and with
    /// `NotFound` when it does not exist. On any error neither write is kept.
    async fn issue_ticket(&self, ticket: &Ticket) -> Result<(), RepositoryError>;

    async fn create_purchase_intent(&self, intent: &PurchaseIntent) -> Result<(), RepositoryError>;

    async fn update_purchase_intent(
        &self,
        intent_id: Uuid,
        status: IntentStatus,
        detail: Option<String>,
    ) -> Result<(), RepositoryError>;

    /// Intents that are pending, partner-reserved or incomplete, oldest first.
    async fn find_unfinished_intents(&self) -> Result<Vec<PurchaseIntent>, RepositoryError>;
}
