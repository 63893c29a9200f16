use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;

use super::{LocalizedPartner, PartnerError, ReservationPartner, StandardPartner};

/// Wire protocol a partner speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartnerProtocol {
    /// English field names, `/events/{id}/reserve`.
    Standard,
    /// Localized field names, `/eventos/{id}/reservar`.
    Localized,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartnerSettings {
    pub id: i32,
    pub protocol: PartnerProtocol,
    pub base_url: String,
    pub api_token: Option<String>,
}

/// Immutable partner table, built once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartnersConfig {
    pub partners: Vec<PartnerSettings>,
    /// Upper bound for a whole partner call.
    pub timeout: Duration,
}

/// Maps an event's partner id to its adapter. Unknown ids never fall back to a default.
#[derive(Clone)]
pub struct PartnerResolver {
    partners: HashMap<i32, Arc<dyn ReservationPartner>>,
}

impl PartnerResolver {
    pub fn new(partners: impl IntoIterator<Item = (i32, Arc<dyn ReservationPartner>)>) -> Self {
        Self {
            partners: partners.into_iter().collect(),
        }
    }

    /// Builds one adapter per configured partner, sharing a single HTTP client.
    pub fn from_config(config: &PartnersConfig) -> Result<Self, PartnerError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(PartnerError::ClientSetup)?;

        let partners = config.partners.iter().map(|settings| {
            let adapter: Arc<dyn ReservationPartner> = match settings.protocol {
                PartnerProtocol::Standard => Arc::new(StandardPartner::new(
                    client.clone(),
                    settings.base_url.clone(),
                    settings.api_token.clone(),
                )),
                PartnerProtocol::Localized => Arc::new(LocalizedPartner::new(
                    client.clone(),
                    settings.base_url.clone(),
                    settings.api_token.clone(),
                )),
            };
            (settings.id, adapter)
        });

        Ok(Self::new(partners))
    }

    pub fn create_partner(
        &self,
        partner_id: i32,
    ) -> Result<Arc<dyn ReservationPartner>, PartnerError> {
        self.partners
            .get(&partner_id)
            .cloned()
            .ok_or(PartnerError::UnknownPartner(partner_id))
    }

    pub fn partner_ids(&self) -> Vec<i32> {
        let mut ids: Vec<i32> = self.partners.keys().copied().collect();
        ids.sort_unstable();
        ids
    }
}

impl fmt::Debug for PartnerResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PartnerResolver")
            .field("partners", &self.partner_ids())
            .finish()
    }
}
