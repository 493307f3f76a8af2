//! [`ScriptedFlow`]: an [`AuthorizationFlow`] that never touches the network.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use mw_auth::{AuthorizationFlow, ClientConfig, Error, Result, TokenGrant};

/// How many times each flow entry point was called.
#[derive(Debug, Default)]
pub struct FlowCalls {
    pub local: Cell<u32>,
    pub console: Cell<u32>,
    pub refresh: Cell<u32>,
}

impl FlowCalls {
    pub fn total(&self) -> u32 {
        self.local.get() + self.console.get() + self.refresh.get()
    }
}

/// Returns fixed grants and fails where told to.
///
/// Keep a clone of [`ScriptedFlow::calls`] before boxing the flow to
/// inspect calls afterwards.
#[derive(Debug, Default)]
pub struct ScriptedFlow {
    pub calls: Rc<FlowCalls>,
    pub local_fails: bool,
    pub console_fails: bool,
    pub refresh_fails: bool,
}

impl ScriptedFlow {
    pub fn new() -> Self {
        Self::default()
    }

    /// A flow where every call fails, for paths that must not authorize.
    pub fn failing() -> Self {
        Self {
            local_fails: true,
            console_fails: true,
            refresh_fails: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Rc<FlowCalls> {
        Rc::clone(&self.calls)
    }
}

fn grant(access_token: &str, refresh_token: Option<&str>) -> TokenGrant {
    TokenGrant {
        access_token: access_token.to_string(),
        refresh_token: refresh_token.map(String::from),
        expires_in: Some(Duration::from_secs(3600)),
    }
}

fn bump(counter: &Cell<u32>) {
    counter.set(counter.get() + 1);
}

impl AuthorizationFlow for ScriptedFlow {
    fn authorize_local(&self, _: &ClientConfig, _: &[String], _: bool) -> Result<TokenGrant> {
        bump(&self.calls.local);
        if self.local_fails {
            return Err(Error::CallbackServerFailed("scripted failure".into()));
        }
        Ok(grant("local-token", Some("local-refresh")))
    }

    fn authorize_console(&self, _: &ClientConfig, _: &[String]) -> Result<TokenGrant> {
        bump(&self.calls.console);
        if self.console_fails {
            return Err(Error::AuthorizationFailed("scripted failure".into()));
        }
        Ok(grant("console-token", Some("console-refresh")))
    }

    fn refresh(&self, _: &ClientConfig, _: &str) -> Result<TokenGrant> {
        bump(&self.calls.refresh);
        if self.refresh_fails {
            return Err(Error::RefreshFailed("invalid_grant".into()));
        }
        Ok(grant("refreshed-token", None))
    }
}
