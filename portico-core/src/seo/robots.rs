//! Crawler directives (`robots.txt`)

use serde::Serialize;
use std::fmt::Write;

/// Paths crawlers must never index
pub const DISALLOWED_PATHS: &[&str] = &[
    "/api/",
    "/auth/verification-status",
    "/dashboard/*/edit",
    "/dashboard/*/settings",
];

/// One `User-agent` group
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RobotsRule {
    pub user_agent: String,
    pub allow: Vec<String>,
    pub disallow: Vec<String>,
}

/// Complete crawler policy
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RobotsPolicy {
    pub rules: Vec<RobotsRule>,
    pub sitemap: String,
}

impl RobotsPolicy {
    /// Policy for a site served from `base_url`
    pub fn for_base_url(base_url: &str) -> Self {
        Self {
            rules: vec![RobotsRule {
                user_agent: "*".to_string(),
                allow: vec!["/".to_string()],
                disallow: DISALLOWED_PATHS.iter().map(|p| p.to_string()).collect(),
            }],
            sitemap: format!("{}/sitemap.xml", base_url.trim_end_matches('/')),
        }
    }

    /// Render as a `robots.txt` body
    pub fn render(&self) -> String {
        let mut out = String::new();
        for rule in &self.rules {
            // Writing to a String cannot fail
            let _ = writeln!(out, "User-Agent: {}", rule.user_agent);
            for path in &rule.allow {
                let _ = writeln!(out, "Allow: {}", path);
            }
            for path in &rule.disallow {
                let _ = writeln!(out, "Disallow: {}", path);
            }
            out.push('\n');
        }
        let _ = writeln!(out, "Sitemap: {}", self.sitemap);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_contains_required_disallows() {
        for base in [
            "http://localhost:3000",
            "https://admin.example.com/",
            "https://example.com/portal",
        ] {
            let policy = RobotsPolicy::for_base_url(base);
            let rule = &policy.rules[0];

            assert_eq!(rule.user_agent, "*");
            assert_eq!(rule.allow, vec!["/".to_string()]);
            for path in DISALLOWED_PATHS {
                assert!(rule.disallow.iter().any(|d| d == path), "missing {path}");
            }
            assert_eq!(
                policy.sitemap,
                format!("{}/sitemap.xml", base.trim_end_matches('/'))
            );
        }
    }

    #[test]
    fn test_render() {
        let body = RobotsPolicy::for_base_url("http://localhost:3000").render();
        assert_eq!(
            body,
            "User-Agent: *\n\
             Allow: /\n\
             Disallow: /api/\n\
             Disallow: /auth/verification-status\n\
             Disallow: /dashboard/*/edit\n\
             Disallow: /dashboard/*/settings\n\
             \n\
             Sitemap: http://localhost:3000/sitemap.xml\n"
        );
    }
}
