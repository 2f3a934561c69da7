//! OAuth2 browser consent flow.
//!
//! Opens the user's browser for consent, captures the redirect on a localhost
//! TcpListener, exchanges the auth code for tokens, and persists the result
//! so subsequent runs only need a refresh.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::path::Path;

use tracing::{info, warn};

use super::{load_credentials, save_token, GoogleApiError, GoogleToken, SCOPES};

/// Run the full consent flow and persist the resulting token.
pub async fn run_consent_flow(
    credentials_file: &Path,
    token_file: &Path,
) -> Result<GoogleToken, GoogleApiError> {
    let creds = load_credentials(credentials_file)?;
    let installed = &creds.installed;

    let listener = TcpListener::bind("127.0.0.1:0")?;
    let port = listener.local_addr()?.port();
    let redirect_uri = format!("http://localhost:{}", port);

    let scope_string = SCOPES.join(" ");
    let auth_url = format!(
        "{}?client_id={}&redirect_uri={}&response_type=code&scope={}&access_type=offline&prompt=consent",
        installed.auth_uri,
        urlencode(&installed.client_id),
        urlencode(&redirect_uri),
        urlencode(&scope_string),
    );

    info!("Opening browser for Google OAuth consent...");
    if let Err(e) = open::that(&auth_url) {
        warn!("Failed to open browser: {}. URL: {}", e, auth_url);
    }

    let auth_code = wait_for_auth_code(&listener)?;

    // Exchange the auth code for tokens
    let client = super::http_client();
    let mut form = vec![
        ("code", auth_code.as_str()),
        ("client_id", installed.client_id.as_str()),
        ("redirect_uri", redirect_uri.as_str()),
        ("grant_type", "authorization_code"),
    ];
    if let Some(secret) = installed.client_secret.as_deref() {
        form.push(("client_secret", secret));
    }

    let resp = client.post(&installed.token_uri).form(&form).send().await?;
    if !resp.status().is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(GoogleApiError::RefreshFailed(format!(
            "Token exchange failed: {}",
            body
        )));
    }

    let body: serde_json::Value = resp.json().await?;
    let access_token = body["access_token"]
        .as_str()
        .ok_or_else(|| GoogleApiError::RefreshFailed("No access_token in response".into()))?
        .to_string();
    let refresh_token = body["refresh_token"].as_str().map(|s| s.to_string());
    let expires_in = body["expires_in"].as_u64().unwrap_or(3600);
    let expiry = chrono::Utc::now() + chrono::Duration::seconds(expires_in as i64);

    let token = GoogleToken {
        token: access_token,
        refresh_token,
        token_uri: installed.token_uri.clone(),
        client_id: installed.client_id.clone(),
        client_secret: installed.client_secret.clone(),
        scopes: SCOPES.iter().map(|s| s.to_string()).collect(),
        expiry: Some(expiry.to_rfc3339()),
    };

    save_token(token_file, &token)?;
    Ok(token)
}

/// Block on the OAuth redirect and extract the `code` query parameter.
fn wait_for_auth_code(listener: &TcpListener) -> Result<String, GoogleApiError> {
    let (mut stream, _) = listener.accept()?;

    let mut buffer = [0u8; 4096];
    let n = stream.read(&mut buffer)?;
    let request = String::from_utf8_lossy(&buffer[..n]);

    // First request line looks like: GET /?code=xxx&scope=... HTTP/1.1
    let code = request
        .lines()
        .next()
        .and_then(|line| {
            let path = line.split_whitespace().nth(1)?;
            let query = path.split('?').nth(1)?;
            query
                .split('&')
                .find(|p| p.starts_with("code="))
                .map(|p| p.strip_prefix("code=").unwrap_or("").to_string())
        })
        .ok_or(GoogleApiError::FlowCancelled)?;

    if code.is_empty() {
        if request.contains("error=") {
            send_response(&mut stream, "Authorization denied. You can close this tab.");
            return Err(GoogleApiError::FlowCancelled);
        }
        send_response(
            &mut stream,
            "No authorization code received. You can close this tab.",
        );
        return Err(GoogleApiError::FlowCancelled);
    }

    // The code may arrive percent-encoded
    let code = urldecode(&code);

    send_response(
        &mut stream,
        "Authorization successful! You can close this tab and return to your terminal.",
    );

    Ok(code)
}

fn send_response(stream: &mut impl Write, message: &str) {
    let body = format!(
        "<html><body style=\"font-family: system-ui; text-align: center; padding: 40px;\">\
         <h2>{}</h2></body></html>",
        message
    );
    let response = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: {}\r\n\r\n{}",
        body.len(),
        body
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.flush();
}

fn urlencode(s: &str) -> String {
    url::form_urlencoded::byte_serialize(s.as_bytes()).collect()
}

fn urldecode(s: &str) -> String {
    url::form_urlencoded::parse(s.as_bytes())
        .map(|(key, _)| key.to_string())
        .next()
        .unwrap_or_else(|| s.to_string())
}
