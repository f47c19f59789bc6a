use tracing::{debug, info, instrument};

use crate::actor_framework::{Entity, ResourceClient};
use crate::domain::{CompanySettings, CompanySettingsCreate, PaymentMethod, COMPANY_SETTINGS_ID};
use crate::settings_actor::SettingsError;

/// Client for the single-row company_settings table.
#[derive(Clone)]
pub struct SettingsClient {
    inner: ResourceClient<CompanySettings>,
}

crate::impl_client_new!(SettingsClient, CompanySettings);

impl SettingsClient {
    /// Stored settings, or defaults when nothing has been saved yet.
    #[instrument(skip(self))]
    pub async fn load(&self) -> Result<CompanySettings, SettingsError> {
        debug!("Sending request");
        match self.inner.get(COMPANY_SETTINGS_ID.to_string()).await? {
            Some(settings) => Ok(settings),
            None => CompanySettings::from_create_params(COMPANY_SETTINGS_ID.to_string(), CompanySettingsCreate::default())
                .map_err(SettingsError::ValidationError),
        }
    }

    #[instrument(skip(self, params), fields(company = %params.name))]
    pub async fn save(&self, params: CompanySettingsCreate) -> Result<CompanySettings, SettingsError> {
        debug!("Sending request");
        let settings = self.inner.upsert(COMPANY_SETTINGS_ID.to_string(), params).await?;
        info!("Company settings saved");
        Ok(settings)
    }

    #[instrument(skip(self))]
    pub async fn active_payment_methods(&self) -> Result<Vec<PaymentMethod>, SettingsError> {
        let settings = self.load().await?;
        Ok(settings.payment_methods.into_iter().filter(|method| method.active).collect())
    }

    /// An active payment method by id.
    #[instrument(skip(self))]
    pub async fn payment_method(&self, id: String) -> Result<PaymentMethod, SettingsError> {
        let settings = self.load().await?;
        match settings.payment_method(&id) {
            Some(method) if method.active => Ok(method.clone()),
            Some(_) => Err(SettingsError::PaymentMethodUnavailable(id)),
            None => Err(SettingsError::NotFound(id)),
        }
    }

    pub fn subscribe_settings(
        &self,
        filter: crate::realtime::ChangeFilter<CompanySettings>,
    ) -> crate::realtime::ChangeStream<CompanySettings> {
        self.inner.subscribe(filter)
    }
}
