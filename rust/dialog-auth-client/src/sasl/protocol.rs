use crate::{CallbackHandler, SaslClient, SaslClientFactory, SaslClientRequest, SaslError};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Replaces the protocol of every request.
pub struct ProtocolSaslClientFactory {
    delegate: Arc<dyn SaslClientFactory>,
    protocol: String,
}

impl ProtocolSaslClientFactory {
    /// Wraps `delegate`, presenting `protocol` to it.
    pub fn new(delegate: Arc<dyn SaslClientFactory>, protocol: impl Into<String>) -> Self {
        Self {
            delegate,
            protocol: protocol.into(),
        }
    }
}

impl SaslClientFactory for ProtocolSaslClientFactory {
    fn create_sasl_client(
        &self,
        request: SaslClientRequest,
        handler: Arc<dyn CallbackHandler>,
    ) -> Result<Option<Box<dyn SaslClient>>, SaslError> {
        let request = SaslClientRequest {
            protocol: self.protocol.clone(),
            ..request
        };
        self.delegate.create_sasl_client(request, handler)
    }

    fn mechanism_names(&self, properties: &BTreeMap<String, String>) -> Vec<String> {
        self.delegate.mechanism_names(properties)
    }
}
