//! One-shot user messages carried across a redirect in a cookie.

use axum_extra::extract::cookie::{Cookie, CookieJar};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;

const FLASH_COOKIE: &str = "flash";

/// Appends `messages` to any flash already pending in `jar`.
pub fn push<I, S>(jar: CookieJar, messages: I) -> CookieJar
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut pending = peek(&jar);
    pending.extend(messages.into_iter().map(Into::into));

    let value = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&pending).unwrap_or_default());
    jar.add(
        Cookie::build((FLASH_COOKIE, value))
            .path("/")
            .http_only(true),
    )
}

/// Returns pending messages and a jar that clears them.
pub fn take(jar: CookieJar) -> (CookieJar, Vec<String>) {
    let messages = peek(&jar);
    if jar.get(FLASH_COOKIE).is_none() {
        return (jar, messages);
    }
    (jar.remove(Cookie::build(FLASH_COOKIE).path("/")), messages)
}

/// Malformed cookies read as no messages.
fn peek(jar: &CookieJar) -> Vec<String> {
    jar.get(FLASH_COOKIE)
        .and_then(|c| URL_SAFE_NO_PAD.decode(c.value()).ok())
        .and_then(|bytes| serde_json::from_slice(&bytes).ok())
        .unwrap_or_default()
}
