//! Template system for server-side rendering
//!
//! Every page extends `base.html`, which emits the route's metadata.

use crate::WebResult;
use askama::Template;
use axum::response::Html;
use portico_core::{RouteMetadata, User};

/// Landing page template
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate<'a> {
    pub meta: &'a RouteMetadata,
    pub user: Option<&'a User>,
}

/// Login page template
#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate<'a> {
    pub meta: &'a RouteMetadata,
    /// Where to go after a successful login
    pub next: Option<&'a str>,
    pub login_endpoint: &'a str,
}

/// Dashboard page template
#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate<'a> {
    pub meta: &'a RouteMetadata,
    pub user: Option<&'a User>,
}

/// Reward settings page template
///
/// Only the mount point is rendered; the settings component itself is
/// loaded by the client.
#[derive(Template)]
#[template(path = "reward_settings.html")]
pub struct RewardSettingsTemplate<'a> {
    pub meta: &'a RouteMetadata,
    pub user: Option<&'a User>,
}

/// 404 page template
#[derive(Template)]
#[template(path = "not_found.html")]
pub struct NotFoundTemplate<'a> {
    pub meta: &'a RouteMetadata,
    pub path: &'a str,
}

/// Render a template into an HTML response body
pub fn render<T: Template>(template: &T) -> WebResult<Html<String>> {
    Ok(Html(template.render()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use portico_core::{MetadataRegistry, Role, SiteConfig, UserId, REWARD_SETTINGS_ROUTE};

    fn registry() -> MetadataRegistry {
        MetadataRegistry::new(&SiteConfig::default())
    }

    #[test]
    fn test_base_layout_emits_metadata() {
        let registry = registry();
        let meta = registry.lookup(REWARD_SETTINGS_ROUTE);
        let admin = User::new(UserId::Number(1), Role::Admin);

        let html = render(&RewardSettingsTemplate {
            meta,
            user: Some(&admin),
        })
        .unwrap()
        .0;

        assert!(html.contains("<title>Reward settings | Portico</title>"));
        assert!(html.contains(r#"property="og:url" content="http://localhost:3000/dashboard/admin/reward-settings""#));
        assert!(html.contains(r#"name="keywords" content="rewards, settings, admin""#));
        assert!(html.contains(r#"id="reward-settings-root""#));
    }

    #[test]
    fn test_login_template_escapes_next() {
        let registry = registry();
        let html = render(&LoginTemplate {
            meta: registry.lookup("/login"),
            next: Some("/dashboard\"><script>"),
            login_endpoint: "/api/auth/login",
        })
        .unwrap()
        .0;

        assert!(!html.contains("<script>"));
        assert!(html.contains(r#"action="/api/auth/login""#));
        assert!(html.contains(r#"name="next""#));
    }
}
