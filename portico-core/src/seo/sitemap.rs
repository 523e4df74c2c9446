//! XML sitemap of the public routes

use super::metadata::{HOME_ROUTE, LOGIN_ROUTE};
use serde::Serialize;

/// Routes anyone may visit
pub const PUBLIC_ROUTES: &[&str] = &[HOME_ROUTE, LOGIN_ROUTE];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SitemapEntry {
    pub loc: String,
    pub change_frequency: &'static str,
    pub priority: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sitemap {
    pub entries: Vec<SitemapEntry>,
}

impl Sitemap {
    pub fn for_base_url(base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        let entries = PUBLIC_ROUTES
            .iter()
            .map(|route| SitemapEntry {
                loc: format!("{}{}", base, route),
                change_frequency: "monthly",
                priority: if *route == HOME_ROUTE { 1.0 } else { 0.5 },
            })
            .collect();
        Self { entries }
    }

    /// Render as a sitemaps.org `urlset` document
    pub fn render(&self) -> String {
        let mut out = String::from(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
             <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
        );
        for entry in &self.entries {
            out.push_str(&format!(
                "  <url>\n    <loc>{}</loc>\n    <changefreq>{}</changefreq>\n    <priority>{:.1}</priority>\n  </url>\n",
                escape_xml(&entry.loc),
                entry.change_frequency,
                entry.priority
            ));
        }
        out.push_str("</urlset>\n");
        out
    }
}

fn escape_xml(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
