pub mod errors;
pub mod event;
pub mod purchase;
pub mod spot;
pub mod ticket;

pub use errors::{DomainError, PRICE_DECIMAL_PLACES};
pub use event::{Event, NewEvent, Rating};
pub use purchase::{IntentStatus, PurchaseIntent};
pub use spot::{Spot, SpotStatus};
pub use ticket::{PricingPolicy, Ticket, TicketType};
