pub mod checkout;

pub use checkout::{BuyTicketsInput, CheckoutError, CheckoutService, IssuanceFailure, TicketView};
