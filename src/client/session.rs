//! Which bearer token an outbound call carries.

use crate::config::AppEnv;
use cookie::Cookie;

/// Session cookie set by the auth framework over HTTPS in production.
pub const SECURE_SESSION_COOKIE: &str = "__Secure-authjs.session-token";
pub const SESSION_COOKIE: &str = "authjs.session-token";

pub fn session_cookie_name(env: AppEnv) -> &'static str {
    if env.is_production() {
        SECURE_SESSION_COOKIE
    } else {
        SESSION_COOKIE
    }
}

/// Value of cookie `name` in a `Cookie:` request header. Empty values count as absent.
pub fn token_from_cookie_header(header: &str, name: &str) -> Option<String> {
    Cookie::split_parse(header)
        .filter_map(Result::ok)
        .find(|c| c.name() == name)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
}

/// An explicit non-empty token wins, then the session cookie, then nothing.
pub fn resolve_token(explicit: Option<&str>, cookie_header: Option<&str>, env: AppEnv) -> Option<String> {
    if let Some(token) = explicit.map(str::trim).filter(|t| !t.is_empty()) {
        return Some(token.to_string());
    }
    cookie_header.and_then(|h| token_from_cookie_header(h, session_cookie_name(env)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cookie_name_follows_environment() {
        assert_eq!(session_cookie_name(AppEnv::Production), "__Secure-authjs.session-token");
        assert_eq!(session_cookie_name(AppEnv::Development), "authjs.session-token");
    }

    #[test]
    fn reads_named_cookie() {
        let header = "theme=dark; authjs.session-token=abc.def; other=1";
        assert_eq!(token_from_cookie_header(header, SESSION_COOKIE).as_deref(), Some("abc.def"));
        assert_eq!(token_from_cookie_header(header, SECURE_SESSION_COOKIE), None);
        assert_eq!(token_from_cookie_header("authjs.session-token=", SESSION_COOKIE), None);
    }

    #[test]
    fn explicit_token_wins() {
        let cookies = Some("authjs.session-token=from-cookie");
        assert_eq!(
            resolve_token(Some("explicit"), cookies, AppEnv::Development).as_deref(),
            Some("explicit")
        );
        assert_eq!(
            resolve_token(Some(""), cookies, AppEnv::Development).as_deref(),
            Some("from-cookie")
        );
        assert_eq!(resolve_token(None, cookies, AppEnv::Development).as_deref(), Some("from-cookie"));
    }

    #[test]
    fn production_ignores_insecure_cookie() {
        let cookies = Some("authjs.session-token=plain");
        assert_eq!(resolve_token(None, cookies, AppEnv::Production), None);
        let secure = Some("__Secure-authjs.session-token=s3cure");
        assert_eq!(resolve_token(None, secure, AppEnv::Production).as_deref(), Some("s3cure"));
        assert_eq!(resolve_token(None, None, AppEnv::Production), None);
    }
}
