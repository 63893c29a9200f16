use axum::extract::State;
use axum::response::Response;
use axum::Json;
use serde::Serialize;

use super::AppState;
use crate::services::{BuyTicketsInput, TicketView};
use crate::utils::error::AppError;
use crate::utils::response::created;

#[derive(Serialize)]
struct BuyTicketsOutput {
    tickets: Vec<TicketView>,
}

pub async fn buy_tickets(
    State(state): State<AppState>,
    Json(input): Json<BuyTicketsInput>,
) -> Result<Response, AppError> {
    let tickets = state.checkout.buy_tickets(input).await?;

    Ok(created(BuyTicketsOutput { tickets }, "Tickets purchased"))
}
