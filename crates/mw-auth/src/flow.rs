//! The seam between the credential state machine and the network.

use crate::client::ClientConfig;
use crate::credential::TokenGrant;
use crate::error::Result;

/// Obtains and refreshes tokens against an OAuth provider.
///
/// [`crate::OAuth2Flow`] is the real implementation; tests substitute a
/// scripted one.
pub trait AuthorizationFlow {
    /// Authorize via a loopback redirect to a local listener.
    fn authorize_local(
        &self,
        client: &ClientConfig,
        scopes: &[String],
        open_browser: bool,
    ) -> Result<TokenGrant>;

    /// Authorize by having the user paste the code into the terminal.
    fn authorize_console(&self, client: &ClientConfig, scopes: &[String]) -> Result<TokenGrant>;

    /// Exchange a refresh token for a new access token.
    fn refresh(&self, client: &ClientConfig, refresh_token: &str) -> Result<TokenGrant>;
}
