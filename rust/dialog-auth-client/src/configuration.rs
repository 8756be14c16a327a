//! The immutable, composable client authentication configuration.
//!
//! An [`AuthenticationConfiguration`] is a chain of overlays ending in a
//! shared base. Every `use_*` combinator returns a new chain whose head is
//! one new overlay; the receiver is never modified, so configurations can be
//! shared freely across threads and derived from one another.
//!
//! ```
//! use dialog_auth_client::AuthenticationConfiguration;
//!
//! let common = AuthenticationConfiguration::empty()
//!     .use_name("alice")
//!     .use_host("auth.example.org");
//! let admin = common.use_authorization_name(Some("admin"));
//!
//! assert_eq!(admin.host(), Some("auth.example.org"));
//! assert_eq!(common.authorization_name(), None);
//! ```

use crate::{SaslClientFactory, mechanism::names};
use std::fmt::{Debug, Display, Formatter};
use std::sync::atomic::AtomicU64;
use std::sync::{Arc, LazyLock, OnceLock};

mod assembly;
mod chain;
mod combinators;
mod equality;
mod filter;
mod setting;

pub use assembly::*;
pub use setting::SettingKind;

pub(crate) use setting::Setting;

/// How a client authenticates: identity, credentials, target, TLS material
/// and mechanism policy.
///
/// Two configurations are equal when they answer every query the same way,
/// whatever order their overlays were applied in.
#[derive(Clone)]
pub struct AuthenticationConfiguration(Arc<Node>);

struct Node {
    link: Link,
    /// Structural hash, `0` until computed.
    hash: AtomicU64,
    sasl_client_factory: OnceLock<Arc<dyn SaslClientFactory>>,
}

enum Link {
    Base,
    Overlay {
        parent: AuthenticationConfiguration,
        setting: Setting,
    },
}

static BASE: LazyLock<AuthenticationConfiguration> =
    LazyLock::new(|| AuthenticationConfiguration::from_link(Link::Base));

static EMPTY: LazyLock<AuthenticationConfiguration> = LazyLock::new(|| {
    BASE.use_anonymous()
        .use_trust_manager(None)
        .forbid_sasl_mechanisms([names::EXTERNAL])
});

impl AuthenticationConfiguration {
    /// The bare base every chain ends in. It answers every query with its
    /// default and supports only the local-user mechanism.
    pub fn base() -> Self {
        BASE.clone()
    }

    /// The usual starting point: anonymous, platform trust manager, and
    /// `EXTERNAL` forbidden.
    pub fn empty() -> Self {
        EMPTY.clone()
    }

    fn from_link(link: Link) -> Self {
        Self(Arc::new(Node {
            link,
            hash: AtomicU64::new(0),
            sasl_client_factory: OnceLock::new(),
        }))
    }

    /// Whether both values are the very same chain.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Default for AuthenticationConfiguration {
    fn default() -> Self {
        Self::empty()
    }
}

impl Display for AuthenticationConfiguration {
    /// Renders the overlays from the oldest to the newest as
    /// comma separated `kind=value` pairs.
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut settings: Vec<&Setting> = self.settings().collect();
        settings.reverse();
        for (index, setting) in settings.into_iter().enumerate() {
            if index > 0 {
                f.write_str(",")?;
            }
            write!(f, "{setting}")?;
        }
        Ok(())
    }
}

impl Debug for AuthenticationConfiguration {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("AuthenticationConfiguration")
            .field(&format_args!("{self}"))
            .finish()
    }
}
