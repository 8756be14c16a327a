use crate::{
    CallbackHandler, ProviderSupplier, SaslClient, SaslClientFactory, SaslClientRequest, SaslError,
};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Tries the mechanism factories of every supplied provider, in provider
/// order, until one creates a client.
pub struct SecurityProviderSaslClientFactory {
    providers: ProviderSupplier,
}

impl SecurityProviderSaslClientFactory {
    /// Searches the providers yielded by `providers`.
    pub fn new(providers: ProviderSupplier) -> Self {
        Self { providers }
    }

    fn factories(&self) -> impl Iterator<Item = Arc<dyn SaslClientFactory>> {
        self.providers
            .providers()
            .into_iter()
            .flat_map(|provider| provider.sasl_client_factories())
    }
}

impl SaslClientFactory for SecurityProviderSaslClientFactory {
    fn create_sasl_client(
        &self,
        request: SaslClientRequest,
        handler: Arc<dyn CallbackHandler>,
    ) -> Result<Option<Box<dyn SaslClient>>, SaslError> {
        for factory in self.factories() {
            if let Some(client) = factory.create_sasl_client(request.clone(), handler.clone())? {
                return Ok(Some(client));
            }
        }
        Ok(None)
    }

    fn mechanism_names(&self, properties: &BTreeMap<String, String>) -> Vec<String> {
        let mut names = Vec::new();
        for factory in self.factories() {
            for name in factory.mechanism_names(properties) {
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }
        names
    }
}
