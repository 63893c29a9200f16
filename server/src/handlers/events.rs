use axum::extract::{Path, State};
use axum::response::Response;
use axum::Json;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use super::AppState;
use crate::models::{Event, NewEvent};
use crate::repository::RepositoryError;
use crate::utils::error::AppError;
use crate::utils::response::created;

#[derive(Debug, Deserialize)]
pub struct NewSpot {
    pub name: String,
}

pub async fn create_event(
    State(state): State<AppState>,
    Json(input): Json<NewEvent>,
) -> Result<Response, AppError> {
    let event = Event::create(input)?;
    state.repository.create_event(&event).await?;

    info!(event_id = %event.id, partner_id = event.partner_id, "Event created");
    Ok(created(event, "Event created"))
}

pub async fn add_spot(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
    Json(input): Json<NewSpot>,
) -> Result<Response, AppError> {
    let mut event = state
        .repository
        .find_event_by_id(event_id)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => {
                AppError::NotFound(format!("Event with id '{}' was not found", event_id))
            }
            other => other.into(),
        })?;

    if event.spot(&input.name).is_some() {
        return Err(AppError::Conflict(format!(
            "Spot '{}' already exists for this event",
            input.name
        )));
    }

    let spot = event.add_spot(&input.name)?;
    state
        .repository
        .create_spot(&spot)
        .await
        .map_err(|e| match e {
            RepositoryError::Conflict => {
                AppError::Conflict(format!("Spot '{}' already exists for this event", spot.name))
            }
            other => other.into(),
        })?;

    info!(%event_id, spot = %spot.name, "Spot added");
    Ok(created(spot, "Spot added"))
}
