//! Page templates using the Tera template engine
//!
//! Templates are embedded directly in the binary.

use anyhow::Result;
use chrono::Datelike;
use serde::Serialize;
use std::collections::HashMap;
use tera::{Context, Tera};

use crate::config::SiteConfig;
use crate::content::{parse_date_string, PostDetail, PostSummary};
use crate::theme::Theme;

/// Template renderer with the embedded page templates
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all page templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("pages/layout.html")),
            ("index.html", include_str!("pages/index.html")),
            ("post.html", include_str!("pages/post.html")),
            ("error.html", include_str!("pages/error.html")),
        ])?;

        tera.register_filter("date_format", date_format_filter);
        tera.register_filter("minutes", minutes_filter);

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }

    /// Render the post listing page
    pub fn render_index(
        &self,
        site: &SiteData,
        theme: Theme,
        posts: &[PostSummary],
    ) -> Result<String> {
        let mut context = base_context(site, theme);
        context.insert("posts", posts);
        self.render("index.html", &context)
    }

    /// Render a post detail page
    pub fn render_post(&self, site: &SiteData, theme: Theme, post: &PostPage) -> Result<String> {
        let mut context = base_context(site, theme);
        context.insert("post", &post.post);
        context.insert("image", &post.image);
        context.insert("canonical", &post.canonical);
        self.render("post.html", &context)
    }

    /// Render an error page for an HTTP status
    pub fn render_error(
        &self,
        site: &SiteData,
        theme: Theme,
        status: u16,
        reason: &str,
        message: &str,
    ) -> Result<String> {
        let mut context = base_context(site, theme);
        context.insert("status", &status);
        context.insert("reason", reason);
        context.insert("message", message);
        self.render("error.html", &context)
    }
}

fn base_context(site: &SiteData, theme: Theme) -> Context {
    let mut context = Context::new();
    context.insert("site", site);
    context.insert("theme", &theme);
    context.insert("year", &chrono::Local::now().year());
    context
}

/// Tera filter: format a front-matter date as "01 January 2024"
fn date_format_filter(
    value: &tera::Value,
    args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("date_format", "value", String, value);
    let format = match args.get("format") {
        Some(val) => tera::try_get_value!("date_format", "format", String, val),
        None => "%d %B %Y".to_string(),
    };

    // Unparseable dates are shown as written
    match parse_date_string(&s) {
        Some(date) => Ok(tera::Value::String(date.format(&format).to_string())),
        None => Ok(tera::Value::String(s)),
    }
}

/// Tera filter: round a reading time to whole minutes
fn minutes_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let minutes = tera::try_get_value!("minutes", "value", f64, value);
    Ok(tera::Value::from(minutes.round() as u64))
}

/// Site-wide values available to every page
#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub title: String,
    pub description: String,
    pub author: String,
    pub url: String,
    pub asset_prefix: String,
}

impl SiteData {
    pub fn from_config(config: &SiteConfig) -> Self {
        Self {
            title: config.title.clone(),
            description: config.description.clone(),
            author: config.author.clone(),
            url: config.url.trim_end_matches('/').to_string(),
            asset_prefix: config.asset_mount(),
        }
    }
}

/// A post detail page
#[derive(Debug, Clone, Serialize)]
pub struct PostPage {
    pub post: PostDetail,
    /// Featured image URL under the asset mount
    pub image: Option<String>,
    pub canonical: String,
}
