use axum_extra::extract::cookie::{Cookie, SameSite};
use secrecy::{ExposeSecret, SecretString};

/// Cookie carrying a rotated access token.
pub(crate) fn rotated_access_cookie(name: &str, token: &SecretString) -> Cookie<'static> {
    Cookie::build((name.to_owned(), token.expose_secret().to_owned()))
        .http_only(true)
        .same_site(SameSite::None)
        .secure(true)
        .path("/")
        .build()
}
