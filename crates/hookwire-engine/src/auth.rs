//! `Authorization` header construction.
//!
//! Pure, deterministic header building for the three hook authentication
//! schemes. Digest uses the hook's statically configured challenge
//! parameters rather than a live server challenge; the MD5 response is
//! computed per RFC 2617 with `qop` over the configured nonce set.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use url::Url;

use crate::hook::{AuthScheme, DigestParams};

/// Builds the `Authorization` header value for a hook request.
///
/// Returns `None` for [`AuthScheme::None`]; no header is emitted. `method`
/// defaults to `GET` when empty. Missing Digest parameters produce a header
/// with empty fields, which surfaces as a transport-classified failure
/// rather than an error here.
pub fn build_auth_header(
    scheme: AuthScheme,
    url: &str,
    method: &str,
    username: &str,
    password: &str,
    digest: Option<&DigestParams>,
) -> Option<String> {
    match scheme {
        AuthScheme::None => None,
        AuthScheme::Basic => Some(basic_auth_header(username, password)),
        AuthScheme::Digest => {
            let params = digest.cloned().unwrap_or_default();
            Some(digest_auth_header(url, method, username, password, &params))
        }
    }
}

/// `Basic base64(username:password)`.
fn basic_auth_header(username: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{username}:{password}")))
}

/// Digest header over the statically configured challenge parameters.
fn digest_auth_header(
    url: &str,
    method: &str,
    username: &str,
    password: &str,
    params: &DigestParams,
) -> String {
    let uri = request_uri(url);
    let method = if method.is_empty() { "GET" } else { method };

    let a1 = md5_hex(&format!("{username}:{}:{password}", params.realm));
    let a2 = md5_hex(&format!("{method}:{uri}"));
    let response = md5_hex(&format!(
        "{a1}:{}:{}:{}:{}:{a2}",
        params.nonce, params.nonce_count, params.client_nonce, params.qop
    ));

    format!(
        "Digest username=\"{username}\", realm=\"{}\", nonce=\"{}\", uri=\"{uri}\", \
         cnonce=\"{}\", nc={}, qop=\"{}\", response=\"{response}\", opaque=\"{}\", \
         algorithm=\"{}\"",
        params.realm,
        params.nonce,
        params.client_nonce,
        params.nonce_count,
        params.qop,
        params.opaque,
        params.algorithm,
    )
}

/// The path+query component of the URL, as sent on the request line.
fn request_uri(url: &str) -> String {
    match Url::parse(url) {
        Ok(parsed) => match parsed.query() {
            Some(query) => format!("{}?{query}", parsed.path()),
            None => parsed.path().to_string(),
        },
        // Not an absolute URL; use the raw string as the request URI.
        Err(_) => url.to_string(),
    }
}

fn md5_hex(input: &str) -> String {
    format!("{:x}", md5::compute(input))
}
