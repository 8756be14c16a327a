use crate::{CallbackKind, CredentialKind};

/// Errors raised while building a configuration, before any overlay is
/// created.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
    /// Port outside the inclusive range 1-65535.
    #[error("Invalid port number {0}, expected a value between 1 and 65535")]
    InvalidPort(u32),

    /// A required argument was empty.
    #[error("Missing required argument '{0}'")]
    MissingArgument(&'static str),
}

/// Errors raised by a callback handler.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CallbackError {
    /// The handler does not know how to answer this kind of callback. The
    /// mechanism decides whether that is fatal.
    #[error("Unsupported callback: {0:?}")]
    Unsupported(CallbackKind),

    /// The handler recognised the callback but could not answer it.
    #[error("Callback failed: {0}")]
    Failed(String),

    /// The credential needed to answer the callback could not be acquired.
    #[error(transparent)]
    Credential(Box<CredentialError>),
}

/// Errors raised while acquiring a credential from a credential source.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialError {
    /// The backing store could not produce the credential.
    #[error("Credential of kind {kind:?} unavailable: {reason}")]
    Unavailable {
        /// Requested credential kind.
        kind: CredentialKind,
        /// Description of the failure.
        reason: String,
    },

    /// A callback handler used as a credential source failed.
    #[error(transparent)]
    Callback(#[from] CallbackError),
}

/// Errors raised while resolving trust or key material.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SecurityError {
    /// No installed provider offers a platform trust manager.
    #[error("No default trust manager is available")]
    NoTrustManager,

    /// A trust or key-manager factory failed.
    #[error("Security factory failed: {0}")]
    Factory(String),

    /// A trust manager rejected the presented certificate chain.
    #[error("Certificate chain not trusted: {0}")]
    Untrusted(String),
}

/// Errors raised while negotiating an authentication mechanism. They come
/// from the mechanism factory and pass through every decorator unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SaslError {
    /// The mechanism factory or client failed.
    #[error("Mechanism negotiation failed: {0}")]
    Negotiation(String),

    /// A callback needed by the mechanism failed.
    #[error(transparent)]
    Callback(#[from] CallbackError),

    /// A credential needed by the mechanism could not be acquired.
    #[error(transparent)]
    Credential(#[from] CredentialError),
}
