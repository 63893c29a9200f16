use std::sync::Arc;

use crate::repository::EventRepository;
use crate::services::CheckoutService;

pub mod checkout;
pub mod events;
pub mod health;

pub use checkout::buy_tickets;
pub use events::{add_spot, create_event};
pub use health::health_check;

#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<dyn EventRepository>,
    pub checkout: Arc<CheckoutService>,
}
