//! TLS collaborators a configuration selects: trust verification, client
//! key material, and the protocol and cipher-suite selection policies.

use crate::{Handle, ProviderSupplier, SecurityError, X509CertificateChain};
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Formatter};
use std::hash::{Hash, Hasher};
use std::sync::{Arc, LazyLock};

/// Verifies the certificate chain a server presents.
pub trait X509TrustManager: Send + Sync {
    /// Accepts or rejects `chain` (DER certificates, leaf first) for the
    /// given key-exchange `auth_type`.
    fn check_server_trusted(
        &self,
        chain: &[Vec<u8>],
        auth_type: &str,
    ) -> Result<(), SecurityError>;

    /// DER-encoded certificate authorities this manager trusts.
    fn accepted_issuers(&self) -> Vec<Vec<u8>> {
        Vec::new()
    }
}

/// Selects the key material a client presents during the TLS handshake.
pub trait X509KeyManager: Send + Sync {
    /// Picks an alias usable with one of `key_types`, if any.
    fn choose_client_alias(&self, key_types: &[&str]) -> Option<String>;

    /// Private key and chain stored under `alias`.
    fn certificate_chain(&self, alias: &str) -> Option<X509CertificateChain>;
}

type FactoryFn<T> = dyn Fn() -> Result<Arc<T>, SecurityError> + Send + Sync;

/// Produces a security collaborator on demand.
///
/// Factories are opaque; two factories are equal only when they are clones
/// of one another.
pub struct SecurityFactory<T: ?Sized>(Handle<FactoryFn<T>>);

impl<T: ?Sized + 'static> SecurityFactory<T> {
    /// Wraps a factory function.
    pub fn new(
        factory: impl Fn() -> Result<Arc<T>, SecurityError> + Send + Sync + 'static,
    ) -> Self {
        let factory: Arc<FactoryFn<T>> = Arc::new(factory);
        Self(Handle::from_arc(factory))
    }

    /// A factory that always yields `value`.
    pub fn fixed(value: Arc<T>) -> Self
    where
        T: Send + Sync,
    {
        Self::new(move || Ok(value.clone()))
    }

    /// Produces the collaborator.
    pub fn create(&self) -> Result<Arc<T>, SecurityError> {
        (*self.0)()
    }
}

impl<T: ?Sized> Clone for SecurityFactory<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T: ?Sized> PartialEq for SecurityFactory<T> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<T: ?Sized> Eq for SecurityFactory<T> {}

impl<T: ?Sized> Hash for SecurityFactory<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl<T: ?Sized> Debug for SecurityFactory<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("SecurityFactory").field(&self.0).finish()
    }
}

static DEFAULT_TRUST_MANAGER: LazyLock<SecurityFactory<dyn X509TrustManager>> =
    LazyLock::new(|| {
        SecurityFactory::new(|| {
            ProviderSupplier::installed()
                .providers()
                .iter()
                .find_map(|provider| provider.trust_manager())
                .ok_or(SecurityError::NoTrustManager)
        })
    });

/// The platform trust manager factory: the first trust manager offered by
/// an installed provider.
pub fn default_trust_manager_factory() -> SecurityFactory<dyn X509TrustManager> {
    DEFAULT_TRUST_MANAGER.clone()
}

/// Which TLS protocol versions to enable, in preference order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProtocolSelector(Vec<String>);

impl Default for ProtocolSelector {
    fn default() -> Self {
        Self(vec!["TLSv1.3".into(), "TLSv1.2".into()])
    }
}

impl ProtocolSelector {
    /// Enables exactly `protocols`, in the given order.
    pub fn new<I, S>(protocols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(protocols.into_iter().map(Into::into).collect())
    }

    /// The enabled protocols.
    pub fn protocols(&self) -> &[String] {
        &self.0
    }

    /// The enabled protocols among those `supported`, in preference order.
    pub fn select<'a>(&'a self, supported: &[&str]) -> Vec<&'a str> {
        self.0
            .iter()
            .map(String::as_str)
            .filter(|protocol| supported.contains(protocol))
            .collect()
    }
}

/// Cipher suites to enable, as an OpenSSL-style selector string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CipherSuiteSelector(String);

impl Default for CipherSuiteSelector {
    fn default() -> Self {
        Self("DEFAULT".into())
    }
}

impl CipherSuiteSelector {
    /// Wraps a selector string, handed to the TLS engine as-is.
    pub fn new(selector: impl Into<String>) -> Self {
        Self(selector.into())
    }

    /// The selector string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
