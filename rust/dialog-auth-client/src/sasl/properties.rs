use crate::{CallbackHandler, SaslClient, SaslClientFactory, SaslClientRequest, SaslError};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Supplies default mechanism properties. Properties given at the call
/// site take precedence.
pub struct PropertiesSaslClientFactory {
    delegate: Arc<dyn SaslClientFactory>,
    properties: BTreeMap<String, String>,
}

impl PropertiesSaslClientFactory {
    /// Wraps `delegate`, defaulting to `properties`.
    pub fn new(delegate: Arc<dyn SaslClientFactory>, properties: BTreeMap<String, String>) -> Self {
        Self {
            delegate,
            properties,
        }
    }

    fn merged(&self, overrides: &BTreeMap<String, String>) -> BTreeMap<String, String> {
        let mut properties = self.properties.clone();
        properties.extend(
            overrides
                .iter()
                .map(|(key, value)| (key.clone(), value.clone())),
        );
        properties
    }
}

impl SaslClientFactory for PropertiesSaslClientFactory {
    fn create_sasl_client(
        &self,
        mut request: SaslClientRequest,
        handler: Arc<dyn CallbackHandler>,
    ) -> Result<Option<Box<dyn SaslClient>>, SaslError> {
        request.properties = self.merged(&request.properties);
        self.delegate.create_sasl_client(request, handler)
    }

    fn mechanism_names(&self, properties: &BTreeMap<String, String>) -> Vec<String> {
        self.delegate.mechanism_names(&self.merged(properties))
    }
}
