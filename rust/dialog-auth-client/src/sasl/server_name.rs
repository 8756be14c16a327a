use crate::{CallbackHandler, SaslClient, SaslClientFactory, SaslClientRequest, SaslError};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Replaces the server name of every request.
pub struct ServerNameSaslClientFactory {
    delegate: Arc<dyn SaslClientFactory>,
    server_name: String,
}

impl ServerNameSaslClientFactory {
    /// Wraps `delegate`, presenting `server_name` to it.
    pub fn new(delegate: Arc<dyn SaslClientFactory>, server_name: impl Into<String>) -> Self {
        Self {
            delegate,
            server_name: server_name.into(),
        }
    }
}

impl SaslClientFactory for ServerNameSaslClientFactory {
    fn create_sasl_client(
        &self,
        request: SaslClientRequest,
        handler: Arc<dyn CallbackHandler>,
    ) -> Result<Option<Box<dyn SaslClient>>, SaslError> {
        let request = SaslClientRequest {
            server_name: self.server_name.clone(),
            ..request
        };
        self.delegate.create_sasl_client(request, handler)
    }

    fn mechanism_names(&self, properties: &BTreeMap<String, String>) -> Vec<String> {
        self.delegate.mechanism_names(properties)
    }
}
