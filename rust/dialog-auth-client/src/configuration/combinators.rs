use super::{AuthenticationConfiguration, Setting, SettingKind};
use crate::{
    BearerToken, CallbackHandler, ChoiceCallback, ChoiceKind, ChoiceOperation, CipherSuiteSelector,
    ConfigurationError, Credential, CredentialKind, CredentialSource, CredentialStore,
    ForwardedIdentity, GssCredential, Handle, IdentityCredentials, KeyStore, NamePrincipal,
    NameRewriter, ParameterSpec, ParameterSpecRef, Password, Principal, ProtocolSelector,
    ProviderRegistry, ProviderSupplier, SaslClientFactory, SaslClientFactorySupplier,
    SecurityDomain, SecurityFactory, X509CertificateChain, X509KeyManager, X509TrustManager,
    default_trust_manager_factory,
};
use std::collections::BTreeMap;
use std::sync::Arc;

impl AuthenticationConfiguration {
    /// Rewrites the principal name with `rewriter` after any rewriting
    /// already configured.
    pub fn rewrite_user(&self, rewriter: NameRewriter) -> Self {
        self.overlay(Setting::NameRewrite(self.name_rewriter().and_then(rewriter)))
    }

    /// Rewrites the principal name with `rewriter` only, dropping any
    /// rewriting already configured.
    pub fn rewrite_user_only_with(&self, rewriter: NameRewriter) -> Self {
        self.overlay(Setting::NameRewrite(rewriter))
    }

    /// Authenticates anonymously.
    pub fn use_anonymous(&self) -> Self {
        self.overlay(Setting::Identity(Principal::Anonymous))
    }

    /// Authenticates as `principal`.
    pub fn use_principal(&self, principal: NamePrincipal) -> Self {
        self.overlay(Setting::Identity(principal.into()))
    }

    /// Authenticates as the principal called `name`.
    pub fn use_name(&self, name: impl Into<String>) -> Self {
        self.use_principal(NamePrincipal::new(name))
    }

    /// Authorizes as `name` once authenticated; `None` clears it.
    pub fn use_authorization_name(&self, name: Option<&str>) -> Self {
        match name {
            Some(name) => self.overlay(Setting::AuthorizationName(name.to_string())),
            None => self.without(SettingKind::AuthorizationName),
        }
    }

    /// Adds `credential`. A credential added later takes precedence over an
    /// earlier one of the same kind.
    pub fn use_credential(&self, credential: Credential) -> Self {
        self.overlay(Setting::Credentials(
            IdentityCredentials::none().with_credential(credential).into(),
        ))
    }

    /// Replaces every configured password with `password`, or removes them
    /// all when `None`.
    pub fn use_password(&self, password: Option<Password>) -> Self {
        let remaining = self
            .configured_credentials()
            .without(CredentialKind::Password);
        let configuration = self.use_credentials(Some(remaining));
        match password {
            Some(password) => configuration.use_credential(Credential::Password(password)),
            None => configuration,
        }
    }

    /// Adds a private key and certificate chain. An incomplete chain is
    /// ignored.
    pub fn use_certificate_credential(&self, credential: X509CertificateChain) -> Self {
        if credential.is_empty() {
            return self.clone();
        }
        self.use_credential(Credential::X509CertificateChain(credential))
    }

    /// Adds the key store entry stored under `alias`.
    pub fn use_key_store_credential(
        &self,
        store: Arc<dyn KeyStore>,
        alias: &str,
        protection: Option<Password>,
    ) -> Result<Self, ConfigurationError> {
        if alias.is_empty() {
            return Err(ConfigurationError::MissingArgument("alias"));
        }
        Ok(self.overlay(Setting::Credentials(CredentialSource::key_store(
            store, alias, protection,
        ))))
    }

    /// Adds the credentials stored under `alias` in a credential store.
    pub fn use_credential_store_entry(
        &self,
        store: Arc<dyn CredentialStore>,
        alias: &str,
    ) -> Result<Self, ConfigurationError> {
        if alias.is_empty() {
            return Err(ConfigurationError::MissingArgument("alias"));
        }
        Ok(self.overlay(Setting::Credentials(CredentialSource::credential_store(
            store, alias,
        ))))
    }

    /// Adds a GSS-API (Kerberos) credential.
    pub fn use_gss_credential(&self, credential: GssCredential) -> Self {
        self.use_credential(Credential::GssKerberos(credential))
    }

    /// Adds a bearer token.
    pub fn use_bearer_token_credential(&self, token: BearerToken) -> Self {
        self.use_credential(Credential::BearerToken(token))
    }

    /// Presents the key material of `key_manager` during the TLS handshake;
    /// `None` removes it.
    pub fn use_key_manager_credential(&self, key_manager: Option<Arc<dyn X509KeyManager>>) -> Self {
        match key_manager {
            Some(key_manager) => {
                self.overlay(Setting::KeyManager(SecurityFactory::fixed(key_manager)))
            }
            None => self.without(SettingKind::KeyManager),
        }
    }

    /// Replaces every configured credential with `credentials`; `None`
    /// removes them all.
    pub fn use_credentials(&self, credentials: Option<CredentialSource>) -> Self {
        let cleared = self.without(SettingKind::Credentials);
        match credentials {
            Some(source) if !source.is_none() => cleared.overlay(Setting::Credentials(source)),
            _ => cleared,
        }
    }

    /// Answers every callback with `handler` instead of the default
    /// responder.
    pub fn use_callback_handler(&self, handler: Arc<dyn CallbackHandler>) -> Self {
        self.overlay(Setting::CallbackHandler(Handle::from_arc(handler)))
    }

    /// Asks `handler` for credentials before consulting the credentials
    /// already configured.
    pub fn use_credential_callback_handler(&self, handler: Arc<dyn CallbackHandler>) -> Self {
        let source = CredentialSource::callback(handler).with(&self.configured_credentials());
        self.use_credentials(Some(source))
    }

    /// Connects to `host`; an empty host removes the override.
    pub fn use_host(&self, host: &str) -> Self {
        if host.is_empty() {
            return self.without(SettingKind::Host);
        }
        self.overlay(Setting::Host(host.to_string()))
    }

    /// Hands `protocol` to mechanisms; an empty protocol removes the
    /// override.
    pub fn use_protocol(&self, protocol: &str) -> Self {
        if protocol.is_empty() {
            return self.without(SettingKind::Protocol);
        }
        self.overlay(Setting::Protocol(protocol.to_string()))
    }

    /// Connects to `port`, which must lie in 1-65535.
    pub fn use_port(&self, port: u32) -> Result<Self, ConfigurationError> {
        let port = u16::try_from(port)
            .ok()
            .filter(|port| *port != 0)
            .ok_or(ConfigurationError::InvalidPort(port))?;
        Ok(self.overlay(Setting::Port(port)))
    }

    /// Verifies servers with `trust_manager`, or with the platform trust
    /// manager when `None`.
    pub fn use_trust_manager(&self, trust_manager: Option<Arc<dyn X509TrustManager>>) -> Self {
        let factory = match trust_manager {
            Some(trust_manager) => SecurityFactory::fixed(trust_manager),
            None => default_trust_manager_factory(),
        };
        self.overlay(Setting::TrustManager(factory))
    }

    /// Enables the TLS protocol versions `selector` picks.
    pub fn use_ssl_protocol_selector(&self, selector: ProtocolSelector) -> Self {
        self.overlay(Setting::SslProtocols(selector))
    }

    /// Enables the TLS cipher suites `selector` picks.
    pub fn use_ssl_cipher_suite_selector(&self, selector: CipherSuiteSelector) -> Self {
        self.overlay(Setting::SslCipherSuites(selector))
    }

    /// Forwards the identity and credentials current in `domain` for the
    /// calling context.
    pub fn use_forwarded_identity(&self, domain: Arc<dyn SecurityDomain>) -> Self {
        self.overlay(Setting::Forward(ForwardedIdentity::capture(domain)))
    }

    /// Looks up security providers with `providers`; `None` restores the
    /// installed providers.
    pub fn use_providers(&self, providers: Option<ProviderSupplier>) -> Self {
        match providers {
            Some(providers) => self.overlay(Setting::Providers(providers)),
            None => self.use_default_providers(),
        }
    }

    /// Looks up security providers among the installed ones.
    pub fn use_default_providers(&self) -> Self {
        self.without(SettingKind::Providers)
    }

    /// Searches the providers of `registry` before those already configured.
    pub fn use_providers_from_registry(&self, registry: Arc<ProviderRegistry>) -> Self {
        let providers = ProviderSupplier::from_registry(registry).then(self.provider_supplier());
        self.use_providers(Some(providers))
    }

    /// Creates mechanisms with `factory` instead of provider discovery.
    pub fn use_sasl_client_factory(&self, factory: Arc<dyn SaslClientFactory>) -> Self {
        self.use_sasl_client_factory_supplier(SaslClientFactorySupplier::fixed(factory))
    }

    /// Creates mechanisms with the factory `supplier` yields.
    pub fn use_sasl_client_factory_supplier(&self, supplier: SaslClientFactorySupplier) -> Self {
        self.overlay(Setting::SaslClientFactory(supplier))
    }

    /// Discovers mechanism factories through the configured providers.
    pub fn use_sasl_client_factory_from_providers(&self) -> Self {
        self.without(SettingKind::SaslClientFactory)
    }

    /// Hands `properties` to mechanism factories, replacing any configured
    /// before. An empty map changes nothing.
    pub fn use_mechanism_properties<I, K, V>(&self, properties: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let properties: BTreeMap<String, String> = properties
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        if properties.is_empty() {
            return self.clone();
        }
        self.overlay(Setting::MechanismProperties(properties))
    }

    /// Adds `spec`, replacing a configured spec of the same type.
    pub fn use_parameter_spec<T: ParameterSpec>(&self, spec: T) -> Self {
        let spec = ParameterSpecRef::new(spec);
        let mut specs: Vec<ParameterSpecRef> = self
            .parameter_specs()
            .into_iter()
            .filter(|existing| existing.spec_type() != spec.spec_type())
            .collect();
        specs.push(spec);
        self.overlay(Setting::ParameterSpecs(specs))
    }

    /// Answers choice callbacks `matches` accepts (given the choice kind and
    /// prompt) by selecting `choice`, or the default option when `None`.
    /// Choices configured earlier are tried first.
    pub fn use_choice(
        &self,
        matches: impl Fn(ChoiceKind, &str) -> bool + Send + Sync + 'static,
        choice: Option<&str>,
    ) -> Self {
        let choice = choice.map(str::to_string);
        let operation = ChoiceOperation::new(move |callback: &mut ChoiceCallback| {
            if !matches(callback.kind(), callback.prompt()) {
                return false;
            }
            let index = match &choice {
                None => Some(callback.default_choice()),
                Some(choice) => callback
                    .choices()
                    .iter()
                    .position(|option| option == choice),
            };
            match index {
                Some(index) => {
                    callback.select(index);
                    true
                }
                None => false,
            }
        });
        self.overlay(Setting::Choice(self.choice_operation().or(operation)))
    }

    /// Offers `realm` to mechanisms that ask for one; `None` clears it.
    pub fn use_realm(&self, realm: Option<&str>) -> Self {
        match realm {
            Some(realm) => self.overlay(Setting::Realm(realm.to_string())),
            None => self.without(SettingKind::Realm),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mechanism::names;
    use crate::{AccessContext, Callback, CallbackError, SecurityIdentity, SecurityProvider};
    use pretty_assertions::assert_eq;

    #[derive(Debug, PartialEq, Eq, Hash)]
    struct Iterations(u32);

    #[derive(Debug, PartialEq, Eq, Hash)]
    struct ChannelBinding(&'static str);

    #[test]
    fn it_validates_ports() {
        let configuration = AuthenticationConfiguration::empty();

        assert_eq!(
            configuration.use_port(0).err(),
            Some(ConfigurationError::InvalidPort(0))
        );
        assert_eq!(
            configuration.use_port(65536).err(),
            Some(ConfigurationError::InvalidPort(65536))
        );
        assert_eq!(configuration.use_port(1).ok().and_then(|c| c.port()), Some(1));
        assert_eq!(
            configuration.use_port(65535).ok().and_then(|c| c.port()),
            Some(65535)
        );
    }

    #[test]
    fn it_removes_host_and_protocol_on_empty_input() {
        let configuration = AuthenticationConfiguration::empty()
            .use_host("example.org")
            .use_protocol("ldap");

        assert_eq!(configuration.use_host("").host(), None);
        assert_eq!(configuration.use_protocol("").protocol(), None);
    }

    #[test]
    fn it_rejects_empty_credential_store_aliases() {
        struct Empty;
        impl CredentialStore for Empty {
            fn retrieve(
                &self,
                _: &str,
                _: CredentialKind,
            ) -> Result<Option<Credential>, crate::CredentialError> {
                Ok(None)
            }
        }

        let result =
            AuthenticationConfiguration::empty().use_credential_store_entry(Arc::new(Empty), "");
        assert_eq!(
            result.err(),
            Some(ConfigurationError::MissingArgument("alias"))
        );
    }

    #[test]
    fn it_replaces_passwords() -> anyhow::Result<()> {
        let configuration = AuthenticationConfiguration::empty()
            .use_password(Some(Password::clear("first")))
            .use_bearer_token_credential(BearerToken::new("token"))
            .use_password(Some(Password::clear("second")));
        let source = configuration.credential_source();

        assert_eq!(
            source.get_credential(CredentialKind::Password)?,
            Some(Credential::Password(Password::clear("second")))
        );
        assert!(source.may_provide(CredentialKind::BearerToken));

        let cleared = configuration.use_password(None).credential_source();
        assert_eq!(cleared.get_credential(CredentialKind::Password)?, None);
        assert!(cleared.may_provide(CredentialKind::BearerToken));
        Ok(())
    }

    #[test]
    fn it_stacks_credentials_newest_first() -> anyhow::Result<()> {
        let configuration = AuthenticationConfiguration::empty()
            .use_credential(Credential::Password(Password::clear("old")))
            .use_credential(Credential::Password(Password::clear("new")));

        assert_eq!(
            configuration
                .credential_source()
                .get_credential(CredentialKind::Password)?,
            Some(Credential::Password(Password::clear("new")))
        );
        assert_eq!(
            configuration
                .settings()
                .filter(|setting| setting.kind() == SettingKind::Credentials)
                .count(),
            2
        );
        Ok(())
    }

    #[test]
    fn it_composes_name_rewriters() {
        let configuration = AuthenticationConfiguration::empty()
            .rewrite_user(NameRewriter::new(|name| name.to_lowercase()))
            .rewrite_user(NameRewriter::new(|name| format!("{name}@REALM")));
        assert_eq!(configuration.name_rewriter().rewrite("Alice"), "alice@REALM");

        let replaced =
            configuration.rewrite_user_only_with(NameRewriter::new(|name| name.to_uppercase()));
        assert_eq!(replaced.name_rewriter().rewrite("Alice"), "ALICE");
    }

    #[test]
    fn it_deduplicates_parameter_specs_by_type() {
        let configuration = AuthenticationConfiguration::empty()
            .use_parameter_spec(Iterations(1024))
            .use_parameter_spec(ChannelBinding("tls-unique"))
            .use_parameter_spec(Iterations(4096));

        let specs = configuration.parameter_specs();
        assert_eq!(specs.len(), 2);
        assert_eq!(specs[0].downcast_ref::<ChannelBinding>(), Some(&ChannelBinding("tls-unique")));
        assert_eq!(specs[1].downcast_ref::<Iterations>(), Some(&Iterations(4096)));
    }

    #[test]
    fn it_combines_choices() {
        let configuration = AuthenticationConfiguration::empty()
            .use_choice(|kind, _| kind == ChoiceKind::Realm, Some("EAST"))
            .use_choice(|_, prompt| prompt == "flavour", None);

        let mut realm = ChoiceCallback::realm("realm", vec!["WEST".into(), "EAST".into()], 0);
        assert!(configuration.choice_operation().apply(&mut realm));
        assert_eq!(realm.selected(), &[1]);

        let mut flavour =
            ChoiceCallback::new(ChoiceKind::Generic, "flavour", vec!["a".into(), "b".into()], 1);
        assert!(configuration.choice_operation().apply(&mut flavour));
        assert_eq!(flavour.selected(), &[1]);

        let mut other = ChoiceCallback::new(ChoiceKind::Generic, "other", vec!["a".into()], 0);
        assert!(!configuration.choice_operation().apply(&mut other));
    }

    #[test]
    fn it_ignores_empty_mechanism_properties() {
        let configuration = AuthenticationConfiguration::empty();
        let unchanged = configuration.use_mechanism_properties(Vec::<(String, String)>::new());
        assert!(unchanged.ptr_eq(&configuration));

        let configured = configuration.use_mechanism_properties([("qop", "auth")]);
        assert_eq!(
            configured.mechanism_properties(),
            BTreeMap::from([("qop".to_string(), "auth".to_string())])
        );
    }

    struct Forwarding(SecurityIdentity);

    impl SecurityDomain for Forwarding {
        fn current_identity(&self, _: &AccessContext) -> Option<SecurityIdentity> {
            Some(self.0.clone())
        }
    }

    fn forwarding_bob() -> AuthenticationConfiguration {
        let identity = SecurityIdentity::new(
            NamePrincipal::new("bob").into(),
            IdentityCredentials::none()
                .with_credential(Credential::BearerToken(BearerToken::new("bob-token"))),
        );
        AuthenticationConfiguration::empty().use_forwarded_identity(Arc::new(Forwarding(identity)))
    }

    fn refusing(callbacks: &mut [Callback]) -> Result<(), CallbackError> {
        match callbacks.first() {
            Some(callback) => Err(CallbackError::Unsupported(callback.kind())),
            None => Ok(()),
        }
    }

    #[test]
    fn it_never_copies_forwarded_credentials_into_passwords() -> anyhow::Result<()> {
        let configuration = forwarding_bob().use_password(Some(Password::clear("secret")));
        let source = configuration.credential_source();

        assert!(configuration.forwarded_identity().is_none());
        assert_eq!(source.get_credential(CredentialKind::BearerToken)?, None);
        assert_eq!(
            source.get_credential(CredentialKind::Password)?,
            Some(Credential::Password(Password::clear("secret")))
        );
        assert!(!configuration.sasl_mechanism_supported(names::OAUTHBEARER));
        assert!(!configuration.to_string().contains("BearerToken"));
        Ok(())
    }

    #[test]
    fn it_keeps_forwarding_when_clearing_passwords() -> anyhow::Result<()> {
        let configuration = forwarding_bob().use_password(None);

        assert!(configuration.forwarded_identity().is_some());
        assert_eq!(configuration.principal().name(), Some("bob"));
        assert_eq!(
            configuration
                .credential_source()
                .get_credential(CredentialKind::BearerToken)?,
            Some(Credential::BearerToken(BearerToken::new("bob-token")))
        );
        Ok(())
    }

    #[test]
    fn it_never_copies_forwarded_credentials_behind_a_credential_handler() -> anyhow::Result<()> {
        let configuration = forwarding_bob().use_credential_callback_handler(Arc::new(refusing));

        assert!(configuration.forwarded_identity().is_none());
        assert_eq!(
            configuration
                .credential_source()
                .get_credential(CredentialKind::BearerToken)?,
            None
        );
        Ok(())
    }

    #[test]
    fn it_asks_the_credential_handler_before_configured_credentials() -> anyhow::Result<()> {
        let handler = |callbacks: &mut [Callback]| -> Result<(), CallbackError> {
            for callback in callbacks.iter_mut() {
                match callback {
                    Callback::Password(prompt) => prompt.set_password(Password::clear("typed")),
                    other => return Err(CallbackError::Unsupported(other.kind())),
                }
            }
            Ok(())
        };
        let configuration = AuthenticationConfiguration::empty()
            .use_password(Some(Password::clear("configured")))
            .use_bearer_token_credential(BearerToken::new("token"))
            .use_credential_callback_handler(Arc::new(handler));
        let source = configuration.credential_source();

        assert_eq!(
            source.get_credential(CredentialKind::Password)?,
            Some(Credential::Password(Password::clear("typed")))
        );
        assert_eq!(
            source.get_credential(CredentialKind::BearerToken)?,
            Some(Credential::BearerToken(BearerToken::new("token")))
        );
        assert_eq!(
            configuration
                .settings()
                .filter(|setting| setting.kind() == SettingKind::Credentials)
                .count(),
            1
        );
        assert!(configuration.sasl_mechanism_supported(names::GSSAPI));
        Ok(())
    }

    struct Entries(BTreeMap<String, Credential>);

    impl KeyStore for Entries {
        fn entry(
            &self,
            alias: &str,
            protection: Option<&Password>,
        ) -> Result<Option<Credential>, crate::CredentialError> {
            if protection != Some(&Password::clear("changeit")) {
                return Err(crate::CredentialError::Unavailable {
                    kind: CredentialKind::X509CertificateChain,
                    reason: "wrong protection".into(),
                });
            }
            Ok(self.0.get(alias).cloned())
        }
    }

    fn certificate(tag: u8) -> X509CertificateChain {
        X509CertificateChain::new(vec![tag], vec![vec![tag, tag]])
    }

    fn key_store(alias: &str, tag: u8) -> Arc<dyn KeyStore> {
        Arc::new(Entries(BTreeMap::from([(
            alias.to_string(),
            Credential::X509CertificateChain(certificate(tag)),
        )])))
    }

    #[test]
    fn it_reads_key_store_entries() -> anyhow::Result<()> {
        let configuration = AuthenticationConfiguration::base().use_key_store_credential(
            key_store("client", 1),
            "client",
            Some(Password::clear("changeit")),
        )?;

        assert_eq!(
            configuration
                .credential_source()
                .get_credential(CredentialKind::X509CertificateChain)?,
            Some(Credential::X509CertificateChain(certificate(1)))
        );
        assert!(configuration.sasl_mechanism_supported(names::EXTERNAL));
        Ok(())
    }

    #[test]
    fn it_rejects_empty_key_store_aliases() {
        let result = AuthenticationConfiguration::empty().use_key_store_credential(
            key_store("", 1),
            "",
            None,
        );

        assert_eq!(
            result.err(),
            Some(ConfigurationError::MissingArgument("alias"))
        );
    }

    #[test]
    fn it_prefers_the_newest_key_store() -> anyhow::Result<()> {
        let protection = Some(Password::clear("changeit"));
        let configuration = AuthenticationConfiguration::base()
            .use_key_store_credential(key_store("client", 1), "client", protection.clone())?
            .use_key_store_credential(key_store("client", 2), "client", protection)?;

        assert_eq!(
            configuration
                .credential_source()
                .get_credential(CredentialKind::X509CertificateChain)?,
            Some(Credential::X509CertificateChain(certificate(2)))
        );
        Ok(())
    }

    #[test]
    fn it_ignores_incomplete_certificate_chains() -> anyhow::Result<()> {
        let base = AuthenticationConfiguration::base();
        let incomplete = X509CertificateChain::new(Vec::new(), vec![vec![1]]);
        assert!(base.use_certificate_credential(incomplete).ptr_eq(&base));

        let configured = base.use_certificate_credential(certificate(3));
        assert_eq!(
            configured
                .credential_source()
                .get_credential(CredentialKind::X509CertificateChain)?,
            Some(Credential::X509CertificateChain(certificate(3)))
        );
        assert!(configured.sasl_mechanism_supported(names::EXTERNAL));
        Ok(())
    }

    #[test]
    fn it_adds_kerberos_credentials() -> anyhow::Result<()> {
        let configuration = AuthenticationConfiguration::empty()
            .use_name("alice")
            .use_gss_credential(GssCredential::new(vec![7]));

        assert_eq!(
            configuration
                .credential_source()
                .get_credential(CredentialKind::GssKerberos)?,
            Some(Credential::GssKerberos(GssCredential::new(vec![7])))
        );
        assert!(configuration.sasl_mechanism_supported(names::GSSAPI));
        assert!(configuration.sasl_mechanism_supported(names::GS2_KRB5));
        assert!(!configuration.sasl_mechanism_supported(names::PLAIN));
        Ok(())
    }

    struct NoKeys;

    impl X509KeyManager for NoKeys {
        fn choose_client_alias(&self, _: &[&str]) -> Option<String> {
            None
        }

        fn certificate_chain(&self, _: &str) -> Option<X509CertificateChain> {
            None
        }
    }

    #[test]
    fn it_sets_and_removes_the_key_manager() -> anyhow::Result<()> {
        let key_manager: Arc<dyn X509KeyManager> = Arc::new(NoKeys);
        let configuration = AuthenticationConfiguration::base()
            .use_key_manager_credential(Some(key_manager.clone()));

        let factory = configuration
            .key_manager_factory()
            .ok_or_else(|| anyhow::anyhow!("no key manager configured"))?;
        assert!(Arc::ptr_eq(&factory.create()?, &key_manager));

        let removed = configuration.use_key_manager_credential(None);
        assert!(removed.key_manager_factory().is_none());
        assert_eq!(removed, AuthenticationConfiguration::base());
        Ok(())
    }

    struct Named(&'static str);

    impl SecurityProvider for Named {
        fn name(&self) -> &str {
            self.0
        }

        fn sasl_client_factories(&self) -> Vec<Arc<dyn SaslClientFactory>> {
            Vec::new()
        }
    }

    fn provider(name: &'static str) -> Arc<dyn SecurityProvider> {
        Arc::new(Named(name))
    }

    fn provider_names(configuration: &AuthenticationConfiguration) -> Vec<String> {
        configuration
            .provider_supplier()
            .providers()
            .iter()
            .map(|provider| provider.name().to_string())
            .collect()
    }

    #[test]
    fn it_searches_registry_providers_first() {
        let registry = Arc::new(ProviderRegistry::default());
        registry.install(provider("local"));
        let configuration = AuthenticationConfiguration::base()
            .use_providers(Some(ProviderSupplier::fixed(vec![
                provider("remote"),
                provider("local"),
            ])))
            .use_providers_from_registry(registry.clone());

        assert_eq!(provider_names(&configuration), vec!["local", "remote"]);

        registry.install(provider("late"));
        assert_eq!(provider_names(&configuration), vec!["local", "late", "remote"]);
        assert_eq!(
            configuration.use_default_providers().provider_supplier(),
            ProviderSupplier::installed()
        );
    }

    #[test]
    fn it_selects_tls_protocols_and_cipher_suites() {
        let empty = AuthenticationConfiguration::empty();
        let configuration = empty
            .use_ssl_protocol_selector(ProtocolSelector::new(["TLSv1.3"]))
            .use_ssl_cipher_suite_selector(CipherSuiteSelector::new("HIGH:!aNULL"));

        assert_eq!(configuration.protocol_selector(), ProtocolSelector::new(["TLSv1.3"]));
        assert_eq!(configuration.cipher_suite_selector().as_str(), "HIGH:!aNULL");
        assert!(configuration.to_string().contains("ssl-protocols=TLSv1.3"));
        assert_ne!(configuration, empty);

        assert_eq!(empty.use_ssl_protocol_selector(ProtocolSelector::default()), empty);
        assert_eq!(
            empty.use_ssl_cipher_suite_selector(CipherSuiteSelector::default()),
            empty
        );
    }

    #[test]
    fn it_returns_to_provider_discovery() {
        let factory: Arc<dyn SaslClientFactory> =
            Arc::new(crate::sasl::testing::RecordingFactory::supporting(&["PLAIN"]));
        let empty = AuthenticationConfiguration::empty();
        let configured = empty.use_sasl_client_factory(factory);
        assert!(configured.sasl_client_factory_supplier().is_some());

        let discovering = configured.use_sasl_client_factory_from_providers();
        assert!(discovering.sasl_client_factory_supplier().is_none());
        assert_eq!(discovering, empty);
    }
}
