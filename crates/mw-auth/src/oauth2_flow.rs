//! Installed-application OAuth2 flow with PKCE.
//!
//! Uses the `oauth2` crate's blocking HTTP client; every command runs to
//! completion in one short-lived process, so there is no runtime to share.

use std::net::TcpListener;

use dialoguer::Input;
use oauth2::basic::{BasicClient, BasicTokenResponse};
use oauth2::reqwest::http_client;
use oauth2::{
    AuthType, AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken, PkceCodeChallenge,
    RedirectUrl, RefreshToken, Scope, TokenResponse, TokenUrl,
};
use tracing::{debug, info, warn};

use crate::callback::{code_from_pasted, wait_for_code};
use crate::client::ClientConfig;
use crate::credential::TokenGrant;
use crate::error::{Error, Result};
use crate::flow::AuthorizationFlow;

/// Redirect for clients that can't receive a loopback request.
pub const OUT_OF_BAND_REDIRECT: &str = "urn:ietf:wg:oauth:2.0:oob";

/// The real flow, talking to the provider's endpoints.
#[derive(Debug, Clone, Copy, Default)]
pub struct OAuth2Flow;

impl OAuth2Flow {
    pub fn new() -> Self {
        Self
    }

    fn client(config: &ClientConfig, redirect: Option<String>) -> Result<BasicClient> {
        let auth_url = AuthUrl::new(config.auth_uri.clone())
            .map_err(|e| Error::AuthorizationFailed(format!("Invalid auth URL: {e}")))?;
        let token_url = TokenUrl::new(config.token_uri.clone())
            .map_err(|e| Error::AuthorizationFailed(format!("Invalid token URL: {e}")))?;

        let mut client = BasicClient::new(
            ClientId::new(config.client_id.clone()),
            config.client_secret.clone().map(ClientSecret::new),
            auth_url,
            Some(token_url),
        )
        .set_auth_type(AuthType::RequestBody);

        if let Some(redirect) = redirect {
            let redirect = RedirectUrl::new(redirect)
                .map_err(|e| Error::AuthorizationFailed(format!("Invalid redirect URL: {e}")))?;
            client = client.set_redirect_uri(redirect);
        }
        Ok(client)
    }

    /// Build the consent URL, returning it with the CSRF state and PKCE verifier.
    fn consent_url(
        client: &BasicClient,
        scopes: &[String],
    ) -> (String, CsrfToken, oauth2::PkceCodeVerifier) {
        let (challenge, verifier) = PkceCodeChallenge::new_random_sha256();

        let mut request = client
            .authorize_url(CsrfToken::new_random)
            .set_pkce_challenge(challenge)
            // Without these the provider omits the refresh token
            .add_extra_param("access_type", "offline")
            .add_extra_param("prompt", "consent");
        for scope in scopes {
            request = request.add_scope(Scope::new(scope.clone()));
        }

        let (url, state) = request.url();
        (url.to_string(), state, verifier)
    }

    fn exchange(
        client: &BasicClient,
        code: String,
        verifier: oauth2::PkceCodeVerifier,
    ) -> Result<TokenGrant> {
        let response = client
            .exchange_code(AuthorizationCode::new(code))
            .set_pkce_verifier(verifier)
            .request(http_client)
            .map_err(|e| Error::TokenExchangeFailed(e.to_string()))?;
        Ok(grant_from(&response))
    }
}

fn grant_from(response: &BasicTokenResponse) -> TokenGrant {
    TokenGrant {
        access_token: response.access_token().secret().clone(),
        refresh_token: response.refresh_token().map(|t| t.secret().clone()),
        expires_in: response.expires_in(),
    }
}

impl AuthorizationFlow for OAuth2Flow {
    fn authorize_local(
        &self,
        config: &ClientConfig,
        scopes: &[String],
        open_browser: bool,
    ) -> Result<TokenGrant> {
        let listener = TcpListener::bind("127.0.0.1:0")
            .map_err(|e| Error::CallbackServerFailed(e.to_string()))?;
        let port = listener
            .local_addr()
            .map_err(|e| Error::CallbackServerFailed(e.to_string()))?
            .port();

        let client = Self::client(config, Some(format!("http://127.0.0.1:{port}/")))?;
        let (url, state, verifier) = Self::consent_url(&client, scopes);

        eprintln!("Please visit this URL to authorize this application:\n{url}");
        if open_browser {
            if let Err(e) = open::that(&url) {
                warn!("Failed to open browser: {e}");
            }
        }

        info!(port, "Waiting for OAuth callback");
        let code = wait_for_code(&listener, state.secret())?;
        Self::exchange(&client, code, verifier)
    }

    fn authorize_console(&self, config: &ClientConfig, scopes: &[String]) -> Result<TokenGrant> {
        let client = Self::client(config, Some(OUT_OF_BAND_REDIRECT.to_string()))?;
        let (url, _state, verifier) = Self::consent_url(&client, scopes);

        eprintln!("Please visit this URL to authorize this application:\n{url}");
        let pasted: String = Input::new()
            .with_prompt("Enter the authorization code")
            .interact_text()?;

        let code = code_from_pasted(&pasted)
            .ok_or_else(|| Error::AuthorizationFailed("No authorization code entered".to_string()))?;
        Self::exchange(&client, code, verifier)
    }

    fn refresh(&self, config: &ClientConfig, refresh_token: &str) -> Result<TokenGrant> {
        let client = Self::client(config, None)?;
        debug!(client_id = %config.client_id, "Refreshing access token");

        let response = client
            .exchange_refresh_token(&RefreshToken::new(refresh_token.to_string()))
            .request(http_client)
            .map_err(|e| Error::RefreshFailed(e.to_string()))?;
        Ok(grant_from(&response))
    }
}
