//! Per-route page metadata

use crate::config::SiteConfig;
use serde::Serialize;
use std::collections::HashMap;

/// Route of the landing page
pub const HOME_ROUTE: &str = "/";
pub const LOGIN_ROUTE: &str = "/login";
pub const DASHBOARD_ROUTE: &str = "/dashboard";
pub const REWARD_SETTINGS_ROUTE: &str = "/dashboard/admin/reward-settings";

/// Open Graph descriptor
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpenGraph {
    pub title: String,
    pub description: String,
    /// Absolute URL of the page
    pub url: String,
    pub site_name: String,
    /// `og:type`
    pub kind: String,
}

/// Static metadata for one route
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteMetadata {
    pub title: String,
    pub description: String,
    pub keywords: Vec<String>,
    pub open_graph: OpenGraph,
}

impl RouteMetadata {
    fn page(site: &SiteConfig, path: &str, page: &str, description: &str, keywords: &[&str]) -> Self {
        let title = format!("{} | {}", page, site.name);
        Self {
            open_graph: OpenGraph {
                title: title.clone(),
                description: description.to_string(),
                url: site.absolute(path),
                site_name: site.name.clone(),
                kind: "website".to_string(),
            },
            title,
            description: description.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }

    /// Keywords as a single `content` attribute value
    pub fn keywords_content(&self) -> String {
        self.keywords.join(", ")
    }
}

/// Metadata table for every page route, plus a site-wide default
#[derive(Debug, Clone)]
pub struct MetadataRegistry {
    default: RouteMetadata,
    routes: HashMap<&'static str, RouteMetadata>,
}

impl MetadataRegistry {
    pub fn new(site: &SiteConfig) -> Self {
        let default = RouteMetadata {
            title: site.name.clone(),
            description: "Administrative dashboard".to_string(),
            keywords: vec!["admin".to_string(), "dashboard".to_string()],
            open_graph: OpenGraph {
                title: site.name.clone(),
                description: "Administrative dashboard".to_string(),
                url: site.absolute(HOME_ROUTE),
                site_name: site.name.clone(),
                kind: "website".to_string(),
            },
        };

        let routes = HashMap::from([
            (
                HOME_ROUTE,
                RouteMetadata::page(
                    site,
                    HOME_ROUTE,
                    "Home",
                    "Sign in to manage rewards, users and settings.",
                    &["admin", "dashboard", "rewards"],
                ),
            ),
            (
                LOGIN_ROUTE,
                RouteMetadata::page(
                    site,
                    LOGIN_ROUTE,
                    "Sign in",
                    "Sign in to the administrative dashboard.",
                    &["login", "sign in", "admin"],
                ),
            ),
            (
                DASHBOARD_ROUTE,
                RouteMetadata::page(
                    site,
                    DASHBOARD_ROUTE,
                    "Dashboard",
                    "Overview of your account and activity.",
                    &["dashboard", "overview"],
                ),
            ),
            (
                REWARD_SETTINGS_ROUTE,
                RouteMetadata::page(
                    site,
                    REWARD_SETTINGS_ROUTE,
                    "Reward settings",
                    "Configure how rewards are earned and redeemed.",
                    &["rewards", "settings", "admin"],
                ),
            ),
        ]);

        Self { default, routes }
    }

    /// Metadata for `path`, or the site-wide default
    pub fn lookup(&self, path: &str) -> &RouteMetadata {
        let normalized = match path.trim_end_matches('/') {
            "" => HOME_ROUTE,
            trimmed => trimmed,
        };
        self.routes.get(normalized).unwrap_or(&self.default)
    }

    pub fn default_metadata(&self) -> &RouteMetadata {
        &self.default
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site() -> SiteConfig {
        SiteConfig {
            app_url: "https://admin.example.com/".to_string(),
            name: "Rewards".to_string(),
        }
    }

    #[test]
    fn test_reward_settings_metadata() {
        let registry = MetadataRegistry::new(&site());
        let meta = registry.lookup(REWARD_SETTINGS_ROUTE);

        assert_eq!(meta.title, "Reward settings | Rewards");
        assert_eq!(
            meta.open_graph.url,
            "https://admin.example.com/dashboard/admin/reward-settings"
        );
        assert_eq!(meta.open_graph.site_name, "Rewards");
        assert_eq!(meta.keywords_content(), "rewards, settings, admin");
    }

    #[test]
    fn test_trailing_slash_and_root() {
        let registry = MetadataRegistry::new(&site());
        assert_eq!(registry.lookup("/dashboard/").title, "Dashboard | Rewards");
        assert_eq!(registry.lookup("/").title, "Home | Rewards");
        assert_eq!(registry.lookup("").title, "Home | Rewards");
    }

    #[test]
    fn test_unknown_route_uses_default() {
        let registry = MetadataRegistry::new(&site());
        let meta = registry.lookup("/nowhere");
        assert_eq!(meta, registry.default_metadata());
        assert_eq!(meta.title, "Rewards");
        assert_eq!(meta.open_graph.url, "https://admin.example.com/");
    }
}
