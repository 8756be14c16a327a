//! Immutable, composable client authentication configuration.
//!
//! This crate describes *how a client should authenticate* a connection:
//! which identity to present, which credentials to supply, which host,
//! protocol and port to target, which trust and key material to use for
//! TLS, and which authentication mechanisms are acceptable. At connection
//! time the description drives mechanism negotiation and answers the
//! callbacks the chosen mechanism raises.
//!
//! # Quick Example
//!
//! ```rust
//! use dialog_auth_client::{AuthenticationConfiguration, Password, mechanism::names};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let configuration = AuthenticationConfiguration::empty()
//!     .use_name("alice")
//!     .use_password(Some(Password::clear("secret")))
//!     .use_host("auth.example.org")
//!     .use_port(9990)?
//!     .forbid_sasl_mechanisms([names::PLAIN]);
//!
//! // Mechanisms the configuration would negotiate, in server order
//! let usable = configuration.filter_sasl_mechanisms([
//!     names::PLAIN,
//!     names::SCRAM_SHA_256,
//!     names::GSSAPI,
//! ]);
//! assert_eq!(usable, vec![names::SCRAM_SHA_256.to_string()]);
//! # Ok(())
//! # }
//! ```
//!
//! # Core Concepts
//!
//! ## Overlay chains
//!
//! An [`AuthenticationConfiguration`] is a persistent chain of overlays,
//! each overriding one kind of setting ([`SettingKind`]) and delegating
//! every other query to the chain below it. Combinators never modify the
//! receiver: they return a new head, sharing the rest of the chain.
//! Adding a setting first removes the overlay it replaces, so a chain holds
//! at most one overlay per kind, except for credentials, which stack.
//!
//! [`AuthenticationConfiguration::without`] removes a kind while sharing
//! every overlay below the removed one, and [`AuthenticationConfiguration::with`]
//! merges two configurations, the argument winning on every kind it sets.
//!
//! ## Equality
//!
//! Configurations compare by the settings they denote, not by how they were
//! built: applying independent settings in a different order yields an
//! equal configuration with an equal hash, so configurations can key
//! connection pools.
//!
//! ## Mechanism filtering
//!
//! A mechanism is negotiated only if some overlay can serve it (an
//! anonymous identity serves `ANONYMOUS`, a password serves `PLAIN` and the
//! `SCRAM` family, and so on) and no overlay's policy forbids it. See
//! [`AuthenticationConfiguration::sasl_mechanism_supported`].
//!
//! ## Assembly
//!
//! [`AuthenticationConfiguration::create_sasl_client`] resolves the base
//! mechanism factory, wraps it with the configured properties, server name,
//! protocol and mechanism filter, and creates a client whose callbacks are
//! answered by the configured handler or by [`DefaultCallbackHandler`].

mod callback;
mod configuration;
mod credential;
mod error;
mod forward;
mod handle;
pub mod mechanism;
mod parameter;
mod principal;
mod provider;
mod rewrite;
mod sasl;
mod ssl;

pub use callback::*;
pub use configuration::*;
pub use credential::*;
pub use error::*;
pub use forward::*;
pub use handle::*;
pub use parameter::*;
pub use principal::*;
pub use provider::*;
pub use rewrite::*;
pub use sasl::*;
pub use ssl::*;
