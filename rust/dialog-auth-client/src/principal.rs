use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// A principal identified only by its name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NamePrincipal(String);

impl NamePrincipal {
    /// Creates a principal with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The principal name.
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl Display for NamePrincipal {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The identity a client presents when authenticating.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Principal {
    /// No identity; authenticate anonymously.
    #[default]
    Anonymous,
    /// A named identity.
    Name(NamePrincipal),
}

impl Principal {
    /// Name of the principal, or `None` when anonymous.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Anonymous => None,
            Self::Name(principal) => Some(principal.name()),
        }
    }

    /// Whether this is the anonymous principal.
    pub fn is_anonymous(&self) -> bool {
        matches!(self, Self::Anonymous)
    }
}

impl From<NamePrincipal> for Principal {
    fn from(principal: NamePrincipal) -> Self {
        Self::Name(principal)
    }
}

impl Display for Principal {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Anonymous => f.write_str("anonymous"),
            Self::Name(principal) => principal.fmt(f),
        }
    }
}
