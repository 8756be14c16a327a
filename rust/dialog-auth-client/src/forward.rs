use crate::{Handle, IdentityCredentials, Principal};
use std::sync::Arc;
use std::thread::ThreadId;

/// An authenticated identity established by a security domain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct SecurityIdentity {
    principal: Principal,
    credentials: IdentityCredentials,
}

impl SecurityIdentity {
    /// Creates an identity for `principal` holding `credentials`.
    pub fn new(principal: Principal, credentials: IdentityCredentials) -> Self {
        Self {
            principal,
            credentials,
        }
    }

    /// The authenticated principal.
    pub fn principal(&self) -> &Principal {
        &self.principal
    }

    /// Credentials that may be forwarded to outbound connections.
    pub fn credentials(&self) -> &IdentityCredentials {
        &self.credentials
    }
}

/// The execution context an identity was forwarded from.
///
/// Captured when the forwarding overlay is created and handed back to the
/// domain on every lookup, so the identity resolved later is the one that
/// was current for the capturing caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AccessContext {
    thread: ThreadId,
}

impl AccessContext {
    /// Captures the calling context.
    pub fn capture() -> Self {
        Self {
            thread: std::thread::current().id(),
        }
    }

    /// Thread the context was captured on.
    pub fn thread(&self) -> ThreadId {
        self.thread
    }
}

/// Source of the identity to forward to outbound connections.
pub trait SecurityDomain: Send + Sync {
    /// The identity current within `context`, if any.
    fn current_identity(&self, context: &AccessContext) -> Option<SecurityIdentity>;
}

/// A security domain paired with the context to resolve identities in.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ForwardedIdentity {
    domain: Handle<dyn SecurityDomain>,
    context: AccessContext,
}

impl ForwardedIdentity {
    /// Forwards from `domain` within the calling context.
    pub fn capture(domain: Arc<dyn SecurityDomain>) -> Self {
        Self {
            domain: Handle::from_arc(domain),
            context: AccessContext::capture(),
        }
    }

    /// The domain identities are resolved in.
    pub fn domain(&self) -> &Arc<dyn SecurityDomain> {
        self.domain.as_arc()
    }

    /// The captured context.
    pub fn context(&self) -> &AccessContext {
        &self.context
    }

    /// Resolves the forwarded identity now.
    pub fn identity(&self) -> Option<SecurityIdentity> {
        self.domain.current_identity(&self.context)
    }
}
