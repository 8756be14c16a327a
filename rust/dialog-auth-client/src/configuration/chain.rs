use super::{AuthenticationConfiguration, Link, Setting, SettingKind};
use crate::{
    CallbackHandler, ChoiceOperation, CipherSuiteSelector, CredentialSource, ForwardedIdentity,
    NameRewriter, ParameterSpecRef, Principal, ProtocolSelector, ProviderSupplier,
    SaslClientFactorySupplier, SecurityFactory, X509KeyManager, X509TrustManager,
    default_trust_manager_factory,
};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

/// Walks the overlays of a chain from the head toward the base.
pub(crate) struct Settings<'a> {
    next: &'a AuthenticationConfiguration,
}

impl<'a> Iterator for Settings<'a> {
    type Item = &'a Setting;

    fn next(&mut self) -> Option<Self::Item> {
        let current: &'a AuthenticationConfiguration = self.next;
        match &current.0.link {
            Link::Base => None,
            Link::Overlay { parent, setting } => {
                self.next = parent;
                Some(setting)
            }
        }
    }
}

impl AuthenticationConfiguration {
    pub(crate) fn settings(&self) -> Settings<'_> {
        Settings { next: self }
    }

    /// Pushes `setting` on top of this chain after removing every overlay
    /// it displaces.
    pub(super) fn overlay(&self, setting: Setting) -> Self {
        let parent = self.without_any(setting.kind().displaces());
        Self::from_link(Link::Overlay { parent, setting })
    }

    /// This chain without any overlay of `kind`.
    ///
    /// Overlays below the removed ones are shared with this chain, and when
    /// nothing is removed the result is this very chain.
    pub fn without(&self, kind: SettingKind) -> Self {
        self.without_any(&[kind])
    }

    /// This chain without any overlay of one of the `kinds`.
    pub fn without_any(&self, kinds: &[SettingKind]) -> Self {
        match &self.0.link {
            Link::Base => self.clone(),
            Link::Overlay { parent, setting } => {
                let trimmed = parent.without_any(kinds);
                if kinds.contains(&setting.kind()) {
                    trimmed
                } else if trimmed.ptr_eq(parent) {
                    self.clone()
                } else {
                    trimmed.overlay(setting.clone())
                }
            }
        }
    }

    /// Rebuilds this chain's overlays, oldest first, on top of `base`.
    fn copy_to(&self, base: &AuthenticationConfiguration) -> Self {
        match &self.0.link {
            Link::Base => base.clone(),
            Link::Overlay { parent, setting } => parent.copy_to(base).overlay(setting.clone()),
        }
    }

    /// Merges `other` into this configuration. Every setting `other` has
    /// replaces the same setting here; settings only this configuration
    /// has are kept.
    pub fn with(&self, other: &AuthenticationConfiguration) -> Self {
        let mut stacked: Vec<SettingKind> = other
            .settings()
            .map(Setting::kind)
            .filter(|kind| kind.is_multi_valued())
            .collect();
        stacked.dedup();
        other.copy_to(&self.without_any(&stacked))
    }

    /// Whether some overlay of `kind` is active in this chain.
    pub fn delegates_through(&self, kind: SettingKind) -> bool {
        self.settings().any(|setting| setting.kind() == kind)
    }

    /// The identity to authenticate as.
    pub fn principal(&self) -> Principal {
        self.settings()
            .find_map(|setting| match setting {
                Setting::Identity(principal) => Some(principal.clone()),
                Setting::Forward(forwarded) => Some(
                    forwarded
                        .identity()
                        .map(|identity| identity.principal().clone())
                        .unwrap_or_default(),
                ),
                _ => None,
            })
            .unwrap_or_default()
    }

    /// Identity to authorize as after authenticating.
    pub fn authorization_name(&self) -> Option<&str> {
        self.settings().find_map(|setting| match setting {
            Setting::AuthorizationName(name) => Some(name.as_str()),
            _ => None,
        })
    }

    /// Where credentials come from: every credential overlay, newest first,
    /// followed by the credentials of a forwarded identity.
    pub fn credential_source(&self) -> CredentialSource {
        self.settings()
            .fold(CredentialSource::none(), |source, setting| match setting {
                Setting::Credentials(own) => source.with(own),
                Setting::Forward(forwarded) => match forwarded.identity() {
                    Some(identity) => source.with(&identity.credentials().clone().into()),
                    None => source,
                },
                _ => source,
            })
    }

    /// The credential overlays alone, newest first. A forwarded identity
    /// contributes nothing here; its credentials are resolved on use.
    pub(super) fn configured_credentials(&self) -> CredentialSource {
        self.settings()
            .fold(CredentialSource::none(), |source, setting| match setting {
                Setting::Credentials(own) => source.with(own),
                _ => source,
            })
    }

    /// The principal name rewriter.
    pub fn name_rewriter(&self) -> NameRewriter {
        self.settings()
            .find_map(|setting| match setting {
                Setting::NameRewrite(rewriter) => Some(rewriter.clone()),
                _ => None,
            })
            .unwrap_or_else(NameRewriter::identity)
    }

    /// Target host override.
    pub fn host(&self) -> Option<&str> {
        self.settings().find_map(|setting| match setting {
            Setting::Host(host) => Some(host.as_str()),
            _ => None,
        })
    }

    /// Target protocol override.
    pub fn protocol(&self) -> Option<&str> {
        self.settings().find_map(|setting| match setting {
            Setting::Protocol(protocol) => Some(protocol.as_str()),
            _ => None,
        })
    }

    /// Target port override.
    pub fn port(&self) -> Option<u16> {
        self.settings().find_map(|setting| match setting {
            Setting::Port(port) => Some(*port),
            _ => None,
        })
    }

    /// Factory for the TLS trust manager.
    pub fn trust_manager_factory(&self) -> SecurityFactory<dyn X509TrustManager> {
        self.settings()
            .find_map(|setting| match setting {
                Setting::TrustManager(factory) => Some(factory.clone()),
                _ => None,
            })
            .unwrap_or_else(default_trust_manager_factory)
    }

    /// Factory for the TLS client key manager, if one is configured.
    pub fn key_manager_factory(&self) -> Option<SecurityFactory<dyn X509KeyManager>> {
        self.settings().find_map(|setting| match setting {
            Setting::KeyManager(factory) => Some(factory.clone()),
            _ => None,
        })
    }

    /// TLS protocol versions to enable.
    pub fn protocol_selector(&self) -> ProtocolSelector {
        self.settings()
            .find_map(|setting| match setting {
                Setting::SslProtocols(selector) => Some(selector.clone()),
                _ => None,
            })
            .unwrap_or_default()
    }

    /// TLS cipher suites to enable.
    pub fn cipher_suite_selector(&self) -> CipherSuiteSelector {
        self.settings()
            .find_map(|setting| match setting {
                Setting::SslCipherSuites(selector) => Some(selector.clone()),
                _ => None,
            })
            .unwrap_or_default()
    }

    /// Where security providers are looked up.
    pub fn provider_supplier(&self) -> ProviderSupplier {
        self.settings()
            .find_map(|setting| match setting {
                Setting::Providers(supplier) => Some(supplier.clone()),
                _ => None,
            })
            .unwrap_or_else(ProviderSupplier::installed)
    }

    /// Base mechanism factory override, if any.
    pub fn sasl_client_factory_supplier(&self) -> Option<SaslClientFactorySupplier> {
        self.settings().find_map(|setting| match setting {
            Setting::SaslClientFactory(supplier) => Some(supplier.clone()),
            _ => None,
        })
    }

    /// Mechanisms explicitly allowed.
    pub fn allowed_sasl_mechanisms(&self) -> BTreeSet<String> {
        self.mechanism_filter().0
    }

    /// Mechanisms explicitly forbidden.
    pub fn denied_sasl_mechanisms(&self) -> BTreeSet<String> {
        self.mechanism_filter().1
    }

    fn mechanism_filter(&self) -> (BTreeSet<String>, BTreeSet<String>) {
        self.settings()
            .find_map(|setting| match setting {
                Setting::MechanismFilter { allowed, denied } => {
                    Some((allowed.clone(), denied.clone()))
                }
                _ => None,
            })
            .unwrap_or_default()
    }

    /// Properties handed to mechanism factories.
    pub fn mechanism_properties(&self) -> BTreeMap<String, String> {
        self.settings()
            .find_map(|setting| match setting {
                Setting::MechanismProperties(properties) => Some(properties.clone()),
                _ => None,
            })
            .unwrap_or_default()
    }

    /// Algorithm parameter specs, at most one per concrete type.
    pub fn parameter_specs(&self) -> Vec<ParameterSpecRef> {
        self.settings()
            .find_map(|setting| match setting {
                Setting::ParameterSpecs(specs) => Some(specs.clone()),
                _ => None,
            })
            .unwrap_or_default()
    }

    /// Answers for interactive choices.
    pub fn choice_operation(&self) -> ChoiceOperation {
        self.settings()
            .find_map(|setting| match setting {
                Setting::Choice(operation) => Some(operation.clone()),
                _ => None,
            })
            .unwrap_or_else(ChoiceOperation::never)
    }

    /// The forwarded identity source, if any.
    pub fn forwarded_identity(&self) -> Option<&ForwardedIdentity> {
        self.settings().find_map(|setting| match setting {
            Setting::Forward(forwarded) => Some(forwarded),
            _ => None,
        })
    }

    /// Realm name hint.
    pub fn mechanism_realm(&self) -> Option<&str> {
        self.settings().find_map(|setting| match setting {
            Setting::Realm(realm) => Some(realm.as_str()),
            _ => None,
        })
    }

    /// Callback handler replacing the default responder, if any.
    pub fn callback_handler(&self) -> Option<Arc<dyn CallbackHandler>> {
        self.settings().find_map(|setting| match setting {
            Setting::CallbackHandler(handler) => Some(handler.as_arc().clone()),
            _ => None,
        })
    }
}
