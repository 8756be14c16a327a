//! Well-known authentication mechanism names and the credentials they need.

use crate::CredentialKind;

/// Mechanism names as registered with IANA.
pub mod names {
    /// Anonymous access, RFC 4505.
    pub const ANONYMOUS: &str = "ANONYMOUS";
    /// Clear-text user name and password, RFC 4616.
    pub const PLAIN: &str = "PLAIN";
    /// Authentication established outside the exchange (e.g. by TLS client
    /// certificates).
    pub const EXTERNAL: &str = "EXTERNAL";
    /// OAuth 2.0 bearer tokens, RFC 7628.
    pub const OAUTHBEARER: &str = "OAUTHBEARER";
    /// Kerberos v5 through GSS-API, RFC 4752.
    pub const GSSAPI: &str = "GSSAPI";
    /// Kerberos v5 through the GS2 bridge, RFC 5801.
    pub const GS2_KRB5: &str = "GS2-KRB5";
    /// Kerberos v5 through the GS2 bridge with channel binding.
    pub const GS2_KRB5_PLUS: &str = "GS2-KRB5-PLUS";
    /// HTTP-style digest with MD5, RFC 2831.
    pub const DIGEST_MD5: &str = "DIGEST-MD5";
    /// Digest with SHA-256.
    pub const DIGEST_SHA_256: &str = "DIGEST-SHA-256";
    /// Salted challenge response with SHA-1, RFC 5802.
    pub const SCRAM_SHA_1: &str = "SCRAM-SHA-1";
    /// Salted challenge response with SHA-256, RFC 7677.
    pub const SCRAM_SHA_256: &str = "SCRAM-SHA-256";
    /// Salted challenge response with SHA-512.
    pub const SCRAM_SHA_512: &str = "SCRAM-SHA-512";
    /// Keyed MD5 challenge response, RFC 2195.
    pub const CRAM_MD5: &str = "CRAM-MD5";
    /// One-time passwords, RFC 2444.
    pub const OTP: &str = "OTP";
    /// Local user bypass for clients on the same host as the server.
    pub const JBOSS_LOCAL_USER: &str = "JBOSS-LOCAL-USER";
}

/// Credential kinds any one of which lets a client attempt `mechanism`.
///
/// Mechanisms that need no credential (e.g. `ANONYMOUS`) and unknown
/// mechanisms yield an empty list.
pub fn required_credential_kinds(mechanism: &str) -> &'static [CredentialKind] {
    const PASSWORD: &[CredentialKind] = &[CredentialKind::Password];
    const BEARER: &[CredentialKind] = &[CredentialKind::BearerToken];
    const KERBEROS: &[CredentialKind] = &[CredentialKind::GssKerberos];
    const X509: &[CredentialKind] = &[CredentialKind::X509CertificateChain];

    match mechanism {
        names::PLAIN | names::CRAM_MD5 | names::OTP => PASSWORD,
        names::OAUTHBEARER => BEARER,
        names::GSSAPI => KERBEROS,
        names::EXTERNAL => X509,
        other if other.starts_with("DIGEST-") || other.starts_with("SCRAM-") => PASSWORD,
        other if other.starts_with(names::GS2_KRB5) => KERBEROS,
        _ => &[],
    }
}
