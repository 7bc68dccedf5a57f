/// The single distinguished administrator. This email carries the bootstrap
/// login fallback and can never be removed through the admin-management
/// endpoints.
pub const PRIMARY_ADMIN_EMAIL: &str = "aaryabpandey@gmail.com";

/// Principal id used when the primary admin logs in through the bootstrap
/// fallback rather than a stored credential row.
pub const PRIMARY_ADMIN_ID: &str = "primary-admin";

pub mod session {

    /// Session key under which the authenticated principal is stored.
    pub const PRINCIPAL_KEY: &str = "principal";

    /// Session key for the OIDC CSRF state saved before the redirect.
    pub const OIDC_STATE_KEY: &str = "oidc_state";

    /// Session key for the OIDC nonce saved before the redirect.
    pub const OIDC_NONCE_KEY: &str = "oidc_nonce";

    /// Lifetime of a password-login principal.
    pub const TTL_SECONDS: i64 = 3600;
}

pub mod oidc {

    /// How long a fetched discovery document stays valid.
    pub const DISCOVERY_TTL_SECONDS: u64 = 3600;

    pub const SCOPES: &str = "openid email profile offline_access";
}

pub mod categories {

    /// Sentinel category filter value meaning "no category filter".
    pub const ALL: &str = "All";
}
