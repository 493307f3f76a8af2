//! Loopback redirect handling for the local authorization flow.

use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};

use tracing::debug;

use crate::error::{Error, Result};

/// What the provider sent back on the redirect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackParams {
    pub code: String,
    pub state: String,
}

/// Parse `code` and `state` from a redirect target such as `/?code=x&state=y`.
///
/// Returns `Ok(None)` when the target carries neither a code nor an error,
/// e.g. a browser fetching `/favicon.ico`.
pub fn parse_callback_target(target: &str) -> Result<Option<CallbackParams>> {
    let url = url::Url::parse(&format!("http://localhost{target}"))
        .map_err(|e| Error::AuthorizationFailed(format!("Invalid callback URL: {e}")))?;

    let mut code = None;
    let mut state = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "code" => code = Some(value.into_owned()),
            "state" => state = Some(value.into_owned()),
            "error" => {
                let description = url
                    .query_pairs()
                    .find(|(k, _)| k == "error_description")
                    .map(|(_, v)| v.into_owned())
                    .unwrap_or_else(|| value.into_owned());
                return Err(Error::AuthorizationFailed(description));
            }
            _ => {}
        }
    }

    match (code, state) {
        (Some(code), Some(state)) => Ok(Some(CallbackParams { code, state })),
        (Some(_), None) => Err(Error::AuthorizationFailed(
            "Missing state in callback".to_string(),
        )),
        _ => Ok(None),
    }
}

/// Pull an authorization code out of whatever the user pasted: either the
/// bare code or the full redirect URL.
pub fn code_from_pasted(input: &str) -> Option<String> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    match url::Url::parse(input) {
        Ok(url) => url
            .query_pairs()
            .find(|(k, _)| k == "code")
            .map(|(_, v)| v.into_owned()),
        Err(_) => Some(input.to_string()),
    }
}

/// Serve requests on `listener` until one carries the authorization code.
pub fn wait_for_code(listener: &TcpListener, expected_state: &str) -> Result<String> {
    loop {
        let (mut stream, _) = listener
            .accept()
            .map_err(|e| Error::CallbackServerFailed(e.to_string()))?;

        let mut request_line = String::new();
        BufReader::new(&stream)
            .read_line(&mut request_line)
            .map_err(|e| Error::CallbackServerFailed(e.to_string()))?;
        debug!(request = request_line.trim(), "OAuth callback request");

        let target = request_line.split_whitespace().nth(1).unwrap_or("/");
        let params = match parse_callback_target(target) {
            Ok(Some(params)) => params,
            Ok(None) => {
                respond(&mut stream, "404 Not Found", "Waiting for authorization.");
                continue;
            }
            Err(e) => {
                respond(&mut stream, "400 Bad Request", &e.to_string());
                return Err(e);
            }
        };

        if params.state != expected_state {
            respond(&mut stream, "400 Bad Request", "Invalid state parameter.");
            return Err(Error::AuthorizationFailed("CSRF token mismatch".to_string()));
        }

        respond(
            &mut stream,
            "200 OK",
            "Authorization complete. You can close this window and return to the terminal.",
        );
        return Ok(params.code);
    }
}

fn respond(stream: &mut TcpStream, status: &str, message: &str) {
    let body = format!(
        "<!DOCTYPE html>\n<html><head><title>mutt-wizard</title></head>\
         <body><p>{message}</p></body></html>"
    );
    let response = format!(
        "HTTP/1.1 {status}\r\nContent-Type: text/html; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    // The browser may already be gone
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.flush();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_code_and_state() {
        let params = parse_callback_target("/?state=abc&code=4%2F0Ad&scope=x")
            .unwrap()
            .unwrap();
        assert_eq!(params.code, "4/0Ad");
        assert_eq!(params.state, "abc");
    }

    #[test]
    fn favicon_is_ignored() {
        assert_eq!(parse_callback_target("/favicon.ico").unwrap(), None);
    }

    #[test]
    fn provider_error_is_reported() {
        let err = parse_callback_target("/?error=access_denied").unwrap_err();
        assert!(err.to_string().contains("access_denied"));
    }

    #[test]
    fn pasted_code_or_url() {
        assert_eq!(code_from_pasted("  4/0Ad \n").as_deref(), Some("4/0Ad"));
        assert_eq!(
            code_from_pasted("http://localhost/?code=4%2F0Ad&state=s").as_deref(),
            Some("4/0Ad")
        );
        assert_eq!(code_from_pasted("   "), None);
    }

    #[test]
    fn serves_until_code_arrives() {
        use std::io::Read;

        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let browser = std::thread::spawn(move || {
            for target in ["/favicon.ico", "/?code=the-code&state=s1"] {
                let mut stream = TcpStream::connect(addr).unwrap();
                write!(stream, "GET {target} HTTP/1.1\r\nHost: localhost\r\n\r\n").unwrap();
                let mut response = String::new();
                let _ = stream.read_to_string(&mut response);
            }
        });

        let code = wait_for_code(&listener, "s1").unwrap();
        browser.join().unwrap();
        assert_eq!(code, "the-code");
    }
}
