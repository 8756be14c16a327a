//! Credentials a client can present, and the sources they come from.

use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Formatter};

mod source;
pub use source::*;

/// Discriminant of a [`Credential`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CredentialKind {
    /// A clear password.
    Password,
    /// An opaque bearer token.
    BearerToken,
    /// A private key with its X.509 certificate chain.
    X509CertificateChain,
    /// A GSS-API (Kerberos) credential.
    GssKerberos,
}

/// A clear-text password.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Password(String);

impl Password {
    /// Creates a clear password.
    pub fn clear(password: impl Into<String>) -> Self {
        Self(password.into())
    }

    /// The password text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Debug for Password {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("Password(<redacted>)")
    }
}

impl From<&str> for Password {
    fn from(password: &str) -> Self {
        Self::clear(password)
    }
}

impl From<String> for Password {
    fn from(password: String) -> Self {
        Self::clear(password)
    }
}

/// An opaque bearer token, e.g. for `OAUTHBEARER`.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct BearerToken(String);

impl BearerToken {
    /// Wraps a token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The token text.
    pub fn token(&self) -> &str {
        &self.0
    }
}

impl Debug for BearerToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("BearerToken(<redacted>)")
    }
}

/// DER-encoded private key and certificate chain, leaf first.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct X509CertificateChain {
    private_key: Vec<u8>,
    chain: Vec<Vec<u8>>,
}

impl X509CertificateChain {
    /// Pairs a private key with its certificate chain.
    pub fn new(private_key: Vec<u8>, chain: Vec<Vec<u8>>) -> Self {
        Self { private_key, chain }
    }

    /// The encoded private key.
    pub fn private_key(&self) -> &[u8] {
        &self.private_key
    }

    /// The encoded certificates, leaf first.
    pub fn chain(&self) -> &[Vec<u8>] {
        &self.chain
    }

    /// Whether either the key or the chain is missing.
    pub fn is_empty(&self) -> bool {
        self.private_key.is_empty() || self.chain.is_empty()
    }
}

impl Debug for X509CertificateChain {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("X509CertificateChain")
            .field("certificates", &self.chain.len())
            .finish_non_exhaustive()
    }
}

/// Opaque GSS-API credential token.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GssCredential(Vec<u8>);

impl GssCredential {
    /// Wraps an exported GSS-API credential.
    pub fn new(token: Vec<u8>) -> Self {
        Self(token)
    }

    /// The exported credential bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// A single credential.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Credential {
    /// See [`Password`].
    Password(Password),
    /// See [`BearerToken`].
    BearerToken(BearerToken),
    /// See [`X509CertificateChain`].
    X509CertificateChain(X509CertificateChain),
    /// See [`GssCredential`].
    GssKerberos(GssCredential),
}

impl Credential {
    /// The kind of this credential.
    pub fn kind(&self) -> CredentialKind {
        match self {
            Self::Password(_) => CredentialKind::Password,
            Self::BearerToken(_) => CredentialKind::BearerToken,
            Self::X509CertificateChain(_) => CredentialKind::X509CertificateChain,
            Self::GssKerberos(_) => CredentialKind::GssKerberos,
        }
    }
}

/// An ordered set of credentials holding at most one credential per kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct IdentityCredentials(Vec<Credential>);

impl IdentityCredentials {
    /// The empty set.
    pub fn none() -> Self {
        Self::default()
    }

    /// Copy of this set with `credential` added, replacing any credential of
    /// the same kind.
    pub fn with_credential(&self, credential: Credential) -> Self {
        let mut credentials = self.0.clone();
        match credentials
            .iter_mut()
            .find(|existing| existing.kind() == credential.kind())
        {
            Some(existing) => *existing = credential,
            None => credentials.push(credential),
        }
        Self(credentials)
    }

    /// Union of both sets. On a kind present in both, this set wins.
    pub fn with(&self, other: &IdentityCredentials) -> Self {
        let mut credentials = self.0.clone();
        for credential in &other.0 {
            if !self.contains(credential.kind()) {
                credentials.push(credential.clone());
            }
        }
        Self(credentials)
    }

    /// Copy of this set without credentials of the given kind.
    pub fn without(&self, kind: CredentialKind) -> Self {
        Self(
            self.0
                .iter()
                .filter(|credential| credential.kind() != kind)
                .cloned()
                .collect(),
        )
    }

    /// The credential of the given kind, if present.
    pub fn get(&self, kind: CredentialKind) -> Option<&Credential> {
        self.0.iter().find(|credential| credential.kind() == kind)
    }

    /// Whether a credential of the given kind is present.
    pub fn contains(&self, kind: CredentialKind) -> bool {
        self.get(kind).is_some()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates credentials in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Credential> {
        self.0.iter()
    }
}

impl FromIterator<Credential> for IdentityCredentials {
    fn from_iter<I: IntoIterator<Item = Credential>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::none(), |credentials, credential| {
                credentials.with_credential(credential)
            })
    }
}
