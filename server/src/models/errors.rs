use thiserror::Error;

/// Prices are stored as `NUMERIC(12, 2)`.
pub const PRICE_DECIMAL_PLACES: u32 = 2;

/// Domain rule violations. These are client-input errors and are never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("event name is required")]
    EventNameRequired,

    #[error("event date must be in the future")]
    InvalidDate,

    #[error("event capacity must be greater than zero")]
    CapacityNotPositive,

    #[error("event price must be greater or equal to zero")]
    PriceNegative,

    #[error("event price must have at most 2 decimal places")]
    PriceTooPrecise,

    #[error("spot name is required")]
    SpotNameRequired,

    #[error("spot name must be at least 2 characters long")]
    SpotNameTooShort,

    #[error("spot name must be exactly 2 characters long")]
    SpotNameTooLong,

    #[error("spot name must start with an uppercase letter")]
    FirstCharNotLetter,

    #[error("spot name must end with a digit")]
    SecondCharNotDigit,

    #[error("spot already reserved")]
    AlreadyReserved,

    #[error("invalid ticket type '{0}'")]
    InvalidTicketType(String),

    #[error("ticket price must be greater than zero")]
    PriceNotPositive,
}
