//! Session cookies
//!
//! A login writes three cookies: `token` (upstream token), `user` (upstream
//! user object as JSON) and `session` (signed session). Logout removes all
//! three.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use portico_core::{Session, SessionConfig};

pub const TOKEN_COOKIE: &str = "token";
pub const USER_COOKIE: &str = "user";
pub const SESSION_COOKIE: &str = "session";

fn session_cookie(
    name: &'static str,
    value: String,
    http_only: bool,
    config: &SessionConfig,
) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(http_only)
        .same_site(SameSite::Lax)
        .secure(config.secure_cookies)
        .max_age(time::Duration::seconds(config.effective_ttl_secs()))
        .build()
}

/// Add the session cookies to `jar`
pub fn write_session(
    jar: CookieJar,
    session: &Session,
    signed_session: String,
    config: &SessionConfig,
) -> Result<CookieJar, serde_json::Error> {
    let user_json = serde_json::to_string(&session.user)?;

    Ok(jar
        .add(session_cookie(
            TOKEN_COOKIE,
            session.token.clone(),
            true,
            config,
        ))
        .add(session_cookie(USER_COOKIE, user_json, false, config))
        .add(session_cookie(SESSION_COOKIE, signed_session, true, config)))
}

/// Remove every session cookie from `jar`
pub fn clear_session(jar: CookieJar) -> CookieJar {
    [TOKEN_COOKIE, USER_COOKIE, SESSION_COOKIE]
        .into_iter()
        .fold(jar, |jar, name| {
            // Explicit removal cookie, emitted whether or not the request had one
            let mut cookie = Cookie::build((name, "")).path("/").build();
            cookie.make_removal();
            jar.add(cookie)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::header::SET_COOKIE, response::IntoResponse};
    use portico_core::{Role, User, UserId};

    fn set_cookies(jar: CookieJar) -> Vec<Cookie<'static>> {
        let response = jar.into_response();
        response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .map(|value| {
                Cookie::parse_encoded(value.to_str().unwrap().to_string()).unwrap()
            })
            .collect()
    }

    #[test]
    fn test_write_session_sets_three_cookies() {
        let session = Session {
            token: "t1".to_string(),
            user: User::new(UserId::Number(1), Role::Admin),
        };
        let config = SessionConfig {
            secure_cookies: true,
            ..SessionConfig::default()
        };

        let jar = write_session(CookieJar::new(), &session, "signed".to_string(), &config).unwrap();
        let cookies = set_cookies(jar);
        let find = |name: &str| cookies.iter().find(|c| c.name() == name).unwrap();

        assert_eq!(find(TOKEN_COOKIE).value(), "t1");
        assert_eq!(find(SESSION_COOKIE).value(), "signed");
        let user: serde_json::Value = serde_json::from_str(find(USER_COOKIE).value()).unwrap();
        assert_eq!(user, serde_json::json!({"id": 1, "role": "ADMIN"}));

        assert_eq!(find(TOKEN_COOKIE).http_only(), Some(true));
        assert_ne!(find(USER_COOKIE).http_only(), Some(true));
        assert_eq!(find(SESSION_COOKIE).secure(), Some(true));
        assert_eq!(find(SESSION_COOKIE).path(), Some("/"));
        assert_eq!(find(SESSION_COOKIE).same_site(), Some(SameSite::Lax));
    }

    #[test]
    fn test_max_age_matches_capped_ttl() {
        let session = Session {
            token: "t1".to_string(),
            user: User::new(UserId::Number(1), Role::User),
        };
        let config = SessionConfig {
            ttl_secs: u64::MAX,
            ..SessionConfig::default()
        };

        let jar = write_session(CookieJar::new(), &session, "signed".to_string(), &config).unwrap();
        for cookie in set_cookies(jar) {
            assert_eq!(
                cookie.max_age(),
                Some(time::Duration::seconds(
                    portico_core::MAX_SESSION_TTL_SECS as i64
                ))
            );
        }
    }

    #[test]
    fn test_clear_session_expires_cookies() {
        let jar = CookieJar::new()
            .add(Cookie::new(TOKEN_COOKIE, "t1"))
            .add(Cookie::new(SESSION_COOKIE, "signed"));

        let cookies = set_cookies(clear_session(jar));
        for name in [TOKEN_COOKIE, USER_COOKIE, SESSION_COOKIE] {
            let cookie = cookies.iter().find(|c| c.name() == name).unwrap();
            assert_eq!(cookie.value(), "");
            assert_eq!(cookie.max_age(), Some(time::Duration::ZERO));
        }
    }
}
