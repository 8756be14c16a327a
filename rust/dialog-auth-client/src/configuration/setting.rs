use crate::mechanism::{self, names};
use crate::{
    CallbackHandler, ChoiceOperation, CipherSuiteSelector, CredentialSource, ForwardedIdentity,
    Handle, NameRewriter, ParameterSpecRef, Principal, ProtocolSelector, ProviderSupplier,
    SaslClientFactorySupplier, SecurityFactory, X509KeyManager, X509TrustManager,
    default_trust_manager_factory,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{Display, Formatter};

/// Discriminant of the piece of state an overlay overrides.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum SettingKind {
    /// Authentication identity: anonymous or a name.
    Identity,
    /// Identity to authorize as after authentication.
    AuthorizationName,
    /// Credential contributions. Several may be active at once.
    Credentials,
    /// Rewrite applied to the principal name.
    NameRewrite,
    /// Target host override.
    Host,
    /// Target protocol override.
    Protocol,
    /// Target port override.
    Port,
    /// TLS trust manager factory.
    TrustManager,
    /// TLS client key manager.
    KeyManager,
    /// TLS protocol versions.
    SslProtocols,
    /// TLS cipher suites.
    SslCipherSuites,
    /// Security provider lookup.
    Providers,
    /// Base mechanism factory override.
    SaslClientFactory,
    /// Mechanism allow and deny sets.
    MechanismFilter,
    /// Mechanism properties.
    MechanismProperties,
    /// Algorithm parameter specs.
    ParameterSpecs,
    /// Interactive choice answers.
    Choice,
    /// Identity forwarded from a security domain.
    Forward,
    /// Realm name hint.
    Realm,
    /// Callback handler replacing the default responder.
    CallbackHandler,
}

impl SettingKind {
    /// Whether several overlays of this kind may be active in one chain.
    pub fn is_multi_valued(self) -> bool {
        matches!(self, Self::Credentials)
    }

    /// Kinds removed from the parent chain when an overlay of this kind is
    /// added.
    pub(crate) fn displaces(self) -> &'static [SettingKind] {
        match self {
            Self::Identity => &[Self::Identity, Self::Forward],
            Self::Forward => &[Self::Forward, Self::Identity, Self::Credentials],
            Self::Credentials => &[Self::Forward],
            Self::AuthorizationName => &[Self::AuthorizationName],
            Self::NameRewrite => &[Self::NameRewrite],
            Self::Host => &[Self::Host],
            Self::Protocol => &[Self::Protocol],
            Self::Port => &[Self::Port],
            Self::TrustManager => &[Self::TrustManager],
            Self::KeyManager => &[Self::KeyManager],
            Self::SslProtocols => &[Self::SslProtocols],
            Self::SslCipherSuites => &[Self::SslCipherSuites],
            Self::Providers => &[Self::Providers],
            Self::SaslClientFactory => &[Self::SaslClientFactory],
            Self::MechanismFilter => &[Self::MechanismFilter],
            Self::MechanismProperties => &[Self::MechanismProperties],
            Self::ParameterSpecs => &[Self::ParameterSpecs],
            Self::Choice => &[Self::Choice],
            Self::Realm => &[Self::Realm],
            Self::CallbackHandler => &[Self::CallbackHandler],
        }
    }

    /// Name used when rendering a configuration.
    pub fn name(self) -> &'static str {
        match self {
            Self::Identity => "identity",
            Self::AuthorizationName => "authorization-name",
            Self::Credentials => "credentials",
            Self::NameRewrite => "name-rewrite",
            Self::Host => "host",
            Self::Protocol => "protocol",
            Self::Port => "port",
            Self::TrustManager => "trust-manager",
            Self::KeyManager => "key-manager",
            Self::SslProtocols => "ssl-protocols",
            Self::SslCipherSuites => "ssl-cipher-suites",
            Self::Providers => "providers",
            Self::SaslClientFactory => "sasl-client-factory",
            Self::MechanismFilter => "mechanism-filter",
            Self::MechanismProperties => "mechanism-properties",
            Self::ParameterSpecs => "parameter-specs",
            Self::Choice => "choice",
            Self::Forward => "forward",
            Self::Realm => "realm",
            Self::CallbackHandler => "callback-handler",
        }
    }
}

/// The state one overlay holds.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum Setting {
    Identity(Principal),
    AuthorizationName(String),
    Credentials(CredentialSource),
    NameRewrite(NameRewriter),
    Host(String),
    Protocol(String),
    Port(u16),
    TrustManager(SecurityFactory<dyn X509TrustManager>),
    KeyManager(SecurityFactory<dyn X509KeyManager>),
    SslProtocols(ProtocolSelector),
    SslCipherSuites(CipherSuiteSelector),
    Providers(ProviderSupplier),
    SaslClientFactory(SaslClientFactorySupplier),
    MechanismFilter {
        allowed: BTreeSet<String>,
        denied: BTreeSet<String>,
    },
    MechanismProperties(BTreeMap<String, String>),
    ParameterSpecs(Vec<ParameterSpecRef>),
    Choice(ChoiceOperation),
    Forward(ForwardedIdentity),
    Realm(String),
    CallbackHandler(Handle<dyn CallbackHandler>),
}

impl Setting {
    pub(crate) fn kind(&self) -> SettingKind {
        match self {
            Self::Identity(_) => SettingKind::Identity,
            Self::AuthorizationName(_) => SettingKind::AuthorizationName,
            Self::Credentials(_) => SettingKind::Credentials,
            Self::NameRewrite(_) => SettingKind::NameRewrite,
            Self::Host(_) => SettingKind::Host,
            Self::Protocol(_) => SettingKind::Protocol,
            Self::Port(_) => SettingKind::Port,
            Self::TrustManager(_) => SettingKind::TrustManager,
            Self::KeyManager(_) => SettingKind::KeyManager,
            Self::SslProtocols(_) => SettingKind::SslProtocols,
            Self::SslCipherSuites(_) => SettingKind::SslCipherSuites,
            Self::Providers(_) => SettingKind::Providers,
            Self::SaslClientFactory(_) => SettingKind::SaslClientFactory,
            Self::MechanismFilter { .. } => SettingKind::MechanismFilter,
            Self::MechanismProperties(_) => SettingKind::MechanismProperties,
            Self::ParameterSpecs(_) => SettingKind::ParameterSpecs,
            Self::Choice(_) => SettingKind::Choice,
            Self::Forward(_) => SettingKind::Forward,
            Self::Realm(_) => SettingKind::Realm,
            Self::CallbackHandler(_) => SettingKind::CallbackHandler,
        }
    }

    /// Whether this overlay answers every query exactly as its absence
    /// would, so that it can be ignored when comparing chains.
    pub(crate) fn is_default(&self) -> bool {
        match self {
            Self::Credentials(source) => source.is_none(),
            Self::NameRewrite(rewriter) => *rewriter == NameRewriter::identity(),
            Self::TrustManager(factory) => *factory == default_trust_manager_factory(),
            Self::SslProtocols(selector) => *selector == ProtocolSelector::default(),
            Self::SslCipherSuites(selector) => *selector == CipherSuiteSelector::default(),
            Self::Providers(supplier) => *supplier == ProviderSupplier::installed(),
            Self::Choice(operation) => *operation == ChoiceOperation::never(),
            _ => false,
        }
    }

    /// Whether this overlay makes `mechanism` usable. Contributions are
    /// OR-combined down the chain.
    pub(crate) fn supports(&self, mechanism: &str) -> bool {
        match self {
            Self::Identity(Principal::Anonymous) => mechanism == names::ANONYMOUS,
            Self::Credentials(source) => mechanism::required_credential_kinds(mechanism)
                .iter()
                .any(|kind| source.may_provide(*kind)),
            Self::Forward(forwarded) => forwarded.identity().is_some_and(|identity| {
                mechanism::required_credential_kinds(mechanism)
                    .iter()
                    .any(|kind| identity.credentials().contains(*kind))
            }),
            Self::KeyManager(_) => mechanism == names::EXTERNAL,
            Self::MechanismFilter { allowed, .. } => allowed.contains(mechanism),
            Self::CallbackHandler(_) => true,
            _ => false,
        }
    }

    /// Whether this overlay's policy permits `mechanism`. Contributions are
    /// AND-combined down the chain.
    pub(crate) fn allows(&self, mechanism: &str) -> bool {
        match self {
            Self::Identity(Principal::Name(_)) => mechanism != names::ANONYMOUS,
            Self::MechanismFilter { denied, .. } => !denied.contains(mechanism),
            _ => true,
        }
    }
}

impl Display for Setting {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}=", self.kind().name())?;
        match self {
            Self::Identity(principal) => write!(f, "{principal}"),
            Self::AuthorizationName(name) | Self::Host(name) | Self::Protocol(name) => {
                f.write_str(name)
            }
            Self::Realm(realm) => f.write_str(realm),
            Self::Port(port) => write!(f, "{port}"),
            Self::Credentials(source) => write!(f, "{}", describe(source)),
            Self::SslProtocols(selector) => f.write_str(&selector.protocols().join(":")),
            Self::SslCipherSuites(selector) => f.write_str(selector.as_str()),
            Self::MechanismFilter { allowed, denied } => {
                let allowed: Vec<&str> = allowed.iter().map(String::as_str).collect();
                let denied: Vec<&str> = denied.iter().map(String::as_str).collect();
                write!(f, "+[{}]-[{}]", allowed.join(" "), denied.join(" "))
            }
            Self::MechanismProperties(properties) => {
                let pairs: Vec<String> = properties
                    .iter()
                    .map(|(key, value)| format!("{key}:{value}"))
                    .collect();
                write!(f, "{{{}}}", pairs.join(" "))
            }
            Self::ParameterSpecs(specs) => write!(f, "{}", specs.len()),
            Self::TrustManager(_) if self.is_default() => f.write_str("default"),
            Self::Providers(_) if self.is_default() => f.write_str("installed"),
            Self::TrustManager(_)
            | Self::KeyManager(_)
            | Self::Providers(_)
            | Self::SaslClientFactory(_)
            | Self::NameRewrite(_)
            | Self::Choice(_)
            | Self::Forward(_)
            | Self::CallbackHandler(_) => f.write_str("<custom>"),
        }
    }
}

fn describe(source: &CredentialSource) -> String {
    match source {
        CredentialSource::Identity(credentials) => {
            let kinds: Vec<String> = credentials
                .iter()
                .map(|credential| format!("{:?}", credential.kind()))
                .collect();
            format!("[{}]", kinds.join(" "))
        }
        CredentialSource::KeyStore { alias, .. } => format!("key-store:{alias}"),
        CredentialSource::CredentialStore { alias, .. } => format!("credential-store:{alias}"),
        CredentialSource::Callback(_) => "callback".into(),
        CredentialSource::Layered(first, second) => {
            format!("{}+{}", describe(first), describe(second))
        }
        CredentialSource::Without(inner, kind) => format!("{}-{kind:?}", describe(inner)),
    }
}
