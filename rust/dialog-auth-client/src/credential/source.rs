use super::{Credential, CredentialKind, IdentityCredentials, Password};
use crate::{
    Callback, CallbackError, CallbackHandler, CredentialCallback, CredentialError, Handle,
    PasswordCallback,
};
use std::sync::Arc;

/// A key store holding private keys and certificates under aliases.
pub trait KeyStore: Send + Sync {
    /// Reads the entry stored under `alias`, unlocking it with `protection`
    /// when the store requires it.
    fn entry(
        &self,
        alias: &str,
        protection: Option<&Password>,
    ) -> Result<Option<Credential>, CredentialError>;
}

/// A credential store holding credentials of several kinds under aliases.
pub trait CredentialStore: Send + Sync {
    /// Retrieves the credential of `kind` stored under `alias`.
    fn retrieve(
        &self,
        alias: &str,
        kind: CredentialKind,
    ) -> Result<Option<Credential>, CredentialError>;
}

/// Where credentials come from.
///
/// Sources compose: [`CredentialSource::with`] layers two sources and
/// [`CredentialSource::without`] hides one kind of credential. Sources
/// compare structurally; the stores and handlers they wrap compare by
/// identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CredentialSource {
    /// A fixed set of credentials held in memory.
    Identity(IdentityCredentials),
    /// One entry of a key store.
    KeyStore {
        /// The store.
        store: Handle<dyn KeyStore>,
        /// Entry alias.
        alias: String,
        /// Entry protection, if the store requires one.
        protection: Option<Password>,
    },
    /// One alias of a credential store.
    CredentialStore {
        /// The store.
        store: Handle<dyn CredentialStore>,
        /// Entry alias.
        alias: String,
    },
    /// Credentials obtained by asking a callback handler.
    Callback(Handle<dyn CallbackHandler>),
    /// The first source, falling back to the second.
    Layered(Arc<CredentialSource>, Arc<CredentialSource>),
    /// The inner source with one kind hidden.
    Without(Arc<CredentialSource>, CredentialKind),
}

impl Default for CredentialSource {
    fn default() -> Self {
        Self::none()
    }
}

impl CredentialSource {
    /// The source that never yields a credential.
    pub fn none() -> Self {
        Self::Identity(IdentityCredentials::none())
    }

    /// Source backed by a key store entry.
    pub fn key_store(
        store: Arc<dyn KeyStore>,
        alias: impl Into<String>,
        protection: Option<Password>,
    ) -> Self {
        Self::KeyStore {
            store: Handle::from_arc(store),
            alias: alias.into(),
            protection,
        }
    }

    /// Source backed by a credential store alias.
    pub fn credential_store(store: Arc<dyn CredentialStore>, alias: impl Into<String>) -> Self {
        Self::CredentialStore {
            store: Handle::from_arc(store),
            alias: alias.into(),
        }
    }

    /// Source that asks `handler` for credentials.
    pub fn callback(handler: Arc<dyn CallbackHandler>) -> Self {
        Self::Callback(Handle::from_arc(handler))
    }

    /// Whether this source can never yield a credential.
    pub fn is_none(&self) -> bool {
        matches!(self, Self::Identity(credentials) if credentials.is_empty())
    }

    /// Consults this source first and `other` when this one has nothing.
    pub fn with(&self, other: &CredentialSource) -> CredentialSource {
        match (self, other) {
            (_, other) if other.is_none() => self.clone(),
            (this, _) if this.is_none() => other.clone(),
            (Self::Identity(this), Self::Identity(other)) => Self::Identity(this.with(other)),
            _ => Self::Layered(Arc::new(self.clone()), Arc::new(other.clone())),
        }
    }

    /// This source with credentials of `kind` hidden.
    pub fn without(&self, kind: CredentialKind) -> CredentialSource {
        match self {
            Self::Identity(credentials) => Self::Identity(credentials.without(kind)),
            _ if !self.may_provide(kind) => self.clone(),
            _ => Self::Without(Arc::new(self.clone()), kind),
        }
    }

    /// Whether this source may be able to yield a credential of `kind`.
    ///
    /// In-memory credentials answer exactly; external stores and handlers
    /// can only be asked, so they answer optimistically.
    pub fn may_provide(&self, kind: CredentialKind) -> bool {
        match self {
            Self::Identity(credentials) => credentials.contains(kind),
            Self::KeyStore { .. } => matches!(
                kind,
                CredentialKind::X509CertificateChain | CredentialKind::Password
            ),
            Self::CredentialStore { .. } | Self::Callback(_) => true,
            Self::Layered(first, second) => first.may_provide(kind) || second.may_provide(kind),
            Self::Without(inner, hidden) => *hidden != kind && inner.may_provide(kind),
        }
    }

    /// Acquires a credential of `kind`, returning `None` when the source
    /// has none.
    pub fn get_credential(
        &self,
        kind: CredentialKind,
    ) -> Result<Option<Credential>, CredentialError> {
        match self {
            Self::Identity(credentials) => Ok(credentials.get(kind).cloned()),
            Self::KeyStore {
                store,
                alias,
                protection,
            } => Ok(store
                .entry(alias, protection.as_ref())?
                .filter(|credential| credential.kind() == kind)),
            Self::CredentialStore { store, alias } => store.retrieve(alias, kind),
            Self::Callback(handler) => ask(handler.as_arc().as_ref(), kind),
            Self::Layered(first, second) => match first.get_credential(kind)? {
                Some(credential) => Ok(Some(credential)),
                None => second.get_credential(kind),
            },
            Self::Without(_, hidden) if *hidden == kind => Ok(None),
            Self::Without(inner, _) => inner.get_credential(kind),
        }
    }
}

impl From<IdentityCredentials> for CredentialSource {
    fn from(credentials: IdentityCredentials) -> Self {
        Self::Identity(credentials)
    }
}

/// Asks `handler` for a credential, falling back to a password prompt for
/// passwords. A handler that does not understand the prompt has nothing to
/// offer.
fn ask(
    handler: &dyn CallbackHandler,
    kind: CredentialKind,
) -> Result<Option<Credential>, CredentialError> {
    let mut callbacks = [Callback::Credential(CredentialCallback::new(kind))];
    match handler.handle(&mut callbacks) {
        Ok(()) => {
            if let [Callback::Credential(callback)] = &mut callbacks {
                if let Some(credential) = callback.take_credential() {
                    return Ok(Some(credential));
                }
            }
        }
        Err(CallbackError::Unsupported(_)) => {}
        Err(error) => return Err(error.into()),
    }

    if kind != CredentialKind::Password {
        return Ok(None);
    }

    let mut callbacks = [Callback::Password(PasswordCallback::new("Password: "))];
    match handler.handle(&mut callbacks) {
        Ok(()) => match &callbacks {
            [Callback::Password(callback)] => {
                Ok(callback.password().cloned().map(Credential::Password))
            }
            _ => Ok(None),
        },
        Err(CallbackError::Unsupported(_)) => Ok(None),
        Err(error) => Err(error.into()),
    }
}
