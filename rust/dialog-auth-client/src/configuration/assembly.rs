use super::AuthenticationConfiguration;
use crate::{
    Callback, CallbackError, CallbackHandler, ChoiceKind, Credential, CredentialError,
    CredentialKind, FilterMechanismSaslClientFactory, MechanismPredicate,
    PropertiesSaslClientFactory, ProtocolSaslClientFactory, SaslClient, SaslClientFactory,
    SaslClientRequest, SaslError, SecurityProviderSaslClientFactory, ServerNameSaslClientFactory,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use url::Url;

impl AuthenticationConfiguration {
    /// The undecorated mechanism factory: the configured override, or
    /// discovery through the configured providers. Built once per chain.
    fn sasl_client_factory(&self) -> Arc<dyn SaslClientFactory> {
        let cache = &self.0.sasl_client_factory;
        if let Some(factory) = cache.get() {
            return factory.clone();
        }
        let factory: Arc<dyn SaslClientFactory> = match self.sasl_client_factory_supplier() {
            Some(supplier) => supplier.supply(),
            None => Arc::new(SecurityProviderSaslClientFactory::new(
                self.provider_supplier(),
            )),
        };
        tracing::trace!(configuration = %self, "Materialized base mechanism factory");
        // A racing thread may have stored an equivalent factory first.
        let _ = cache.set(factory.clone());
        cache.get().cloned().unwrap_or(factory)
    }

    /// Creates a mechanism client for `uri`, choosing among the mechanisms
    /// the server offered.
    ///
    /// `factory_operator` may wrap or replace the base factory before the
    /// configuration's own decorators are applied. Returns `None` when no
    /// offered mechanism is usable.
    pub fn create_sasl_client<I, S, F>(
        &self,
        uri: &Url,
        server_mechanisms: I,
        factory_operator: F,
    ) -> Result<Option<Box<dyn SaslClient>>, SaslError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: FnOnce(Arc<dyn SaslClientFactory>) -> Arc<dyn SaslClientFactory>,
    {
        let mut factory = factory_operator(self.sasl_client_factory());

        let properties = self.mechanism_properties();
        if !properties.is_empty() {
            factory = Arc::new(PropertiesSaslClientFactory::new(factory, properties));
        }
        if let Some(host) = self.host() {
            factory = Arc::new(ServerNameSaslClientFactory::new(factory, host));
        }
        if let Some(protocol) = self.protocol() {
            factory = Arc::new(ProtocolSaslClientFactory::new(factory, protocol));
        }
        let configuration = self.clone();
        let predicate: Arc<MechanismPredicate> =
            Arc::new(move |mechanism: &str| configuration.sasl_mechanism_supported(mechanism));
        let factory = FilterMechanismSaslClientFactory::new(factory, predicate);

        let request = SaslClientRequest {
            mechanisms: server_mechanisms.into_iter().map(Into::into).collect(),
            authorization_id: self.authorization_name().map(str::to_string),
            protocol: uri.scheme().to_string(),
            server_name: uri.host_str().unwrap_or_default().to_string(),
            properties: BTreeMap::new(),
        };
        let handler: Arc<dyn CallbackHandler> = match self.callback_handler() {
            Some(handler) => handler,
            None => Arc::new(DefaultCallbackHandler::new(self.clone())),
        };

        tracing::debug!(
            %uri,
            offered = ?request.mechanisms,
            "Creating mechanism client"
        );
        factory.create_sasl_client(request, handler)
    }

    /// Answers `callback` from this configuration, or fails with
    /// [`CallbackError::Unsupported`] when it has nothing to offer.
    pub fn handle_callback(&self, callback: &mut Callback) -> Result<(), CallbackError> {
        let kind = callback.kind();
        let answered = match callback {
            Callback::Name(prompt) => match self.principal().name() {
                Some(name) => {
                    prompt.set_name(self.name_rewriter().rewrite(name));
                    true
                }
                None => false,
            },
            Callback::Password(prompt) => {
                match self.credential(CredentialKind::Password)? {
                    Some(Credential::Password(password)) => {
                        prompt.set_password(password);
                        true
                    }
                    _ => false,
                }
            }
            Callback::Credential(request) => match self.credential(request.kind())? {
                Some(credential) => request.set_credential(credential),
                None => false,
            },
            Callback::Realm(prompt) => {
                if prompt.text().is_none() {
                    let realm = self
                        .mechanism_realm()
                        .or(prompt.default_text())
                        .map(str::to_string);
                    if let Some(realm) = realm {
                        prompt.set_text(realm);
                    }
                }
                true
            }
            Callback::Choice(choice) => {
                if self.choice_operation().apply(choice) {
                    true
                } else if choice.kind() == ChoiceKind::Realm {
                    if choice.selected().is_empty() {
                        let index = self
                            .mechanism_realm()
                            .and_then(|realm| {
                                choice.choices().iter().position(|option| option == realm)
                            })
                            .unwrap_or(choice.default_choice());
                        choice.select(index);
                    }
                    true
                } else {
                    false
                }
            }
        };

        if answered {
            Ok(())
        } else {
            tracing::trace!(?kind, "Configuration cannot answer callback");
            Err(CallbackError::Unsupported(kind))
        }
    }

    fn credential(&self, kind: CredentialKind) -> Result<Option<Credential>, CallbackError> {
        self.credential_source()
            .get_credential(kind)
            .map_err(|error| match error {
                CredentialError::Callback(error) => error,
                error => CallbackError::Credential(Box::new(error)),
            })
    }
}

/// Responder used when no callback handler is configured: answers every
/// callback from the configuration itself.
#[derive(Debug, Clone)]
pub struct DefaultCallbackHandler {
    configuration: AuthenticationConfiguration,
}

impl DefaultCallbackHandler {
    /// Answers from `configuration`.
    pub fn new(configuration: AuthenticationConfiguration) -> Self {
        Self { configuration }
    }
}

impl CallbackHandler for DefaultCallbackHandler {
    fn handle(&self, callbacks: &mut [Callback]) -> Result<(), CallbackError> {
        for callback in callbacks.iter_mut() {
            self.configuration.handle_callback(callback)?;
        }
        Ok(())
    }
}
