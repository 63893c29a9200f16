use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use super::PartnerError;

/// Header the partner APIs use to authenticate callers.
pub(crate) const API_TOKEN_HEADER: &str = "X-Api-Token";

/// POSTs a reservation body and decodes the partner's array of reservations.
///
/// Only `201 Created` counts as success.
pub(super) async fn post_reservation<B, R>(
    client: &Client,
    url: &str,
    api_token: Option<&str>,
    body: &B,
) -> Result<Vec<R>, PartnerError>
where
    B: Serialize + ?Sized,
    R: DeserializeOwned,
{
    let mut request = client.post(url).json(body);
    if let Some(token) = api_token {
        request = request.header(API_TOKEN_HEADER, token);
    }

    let response = request.send().await.map_err(|e| {
        warn!(%url, error = %e, "Partner call failed");
        PartnerError::Unreachable(e)
    })?;

    let status = response.status();
    if status != StatusCode::CREATED {
        warn!(%url, status = status.as_u16(), "Partner rejected reservation");
        return Err(PartnerError::Rejected(status.as_u16()));
    }

    let bytes = response.bytes().await.map_err(PartnerError::Unreachable)?;
    debug!(%url, bytes = bytes.len(), "Partner reservation response received");

    serde_json::from_slice(&bytes).map_err(|e| PartnerError::Protocol(e.to_string()))
}

pub(super) fn join_url(base_url: &str, path: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), path.trim_start_matches('/'))
}
