use crate::{CallbackHandler, SaslClient, SaslClientFactory, SaslClientRequest, SaslError};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Predicate over mechanism names.
pub type MechanismPredicate = dyn Fn(&str) -> bool + Send + Sync;

/// Hides the mechanisms a predicate rejects from the delegate.
pub struct FilterMechanismSaslClientFactory {
    delegate: Arc<dyn SaslClientFactory>,
    predicate: Arc<MechanismPredicate>,
}

impl FilterMechanismSaslClientFactory {
    /// Wraps `delegate`, passing it only names `predicate` accepts.
    pub fn new(delegate: Arc<dyn SaslClientFactory>, predicate: Arc<MechanismPredicate>) -> Self {
        Self {
            delegate,
            predicate,
        }
    }
}

impl SaslClientFactory for FilterMechanismSaslClientFactory {
    fn create_sasl_client(
        &self,
        mut request: SaslClientRequest,
        handler: Arc<dyn CallbackHandler>,
    ) -> Result<Option<Box<dyn SaslClient>>, SaslError> {
        request.mechanisms.retain(|mechanism| (self.predicate)(mechanism));
        if request.mechanisms.is_empty() {
            return Ok(None);
        }
        self.delegate.create_sasl_client(request, handler)
    }

    fn mechanism_names(&self, properties: &BTreeMap<String, String>) -> Vec<String> {
        let mut names = self.delegate.mechanism_names(properties);
        names.retain(|mechanism| (self.predicate)(mechanism));
        names
    }
}
