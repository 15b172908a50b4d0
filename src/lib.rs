//! inkwell: a personal blog served from a directory of Markdown posts
//!
//! Posts are Markdown files with a YAML front-matter header. Listings and
//! post pages are computed from the files on every request.

pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod server;
pub mod templates;
pub mod theme;

use anyhow::Result;
use std::path::{Path, PathBuf};

use content::{MarkdownRenderer, PostDetail, PostLoader, PostRepository, PostSummary};
use error::BlogError;

/// The main blog application
pub struct Blog {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Directory holding one `.md` file per post
    pub content_dir: PathBuf,
    /// Directory served under the asset prefix
    pub assets_dir: PathBuf,
    repository: PostRepository,
    loader: PostLoader,
}

impl Blog {
    /// Create a new Blog instance from a directory, reading `_config.yml` if present
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            tracing::debug!("No config at {:?}, using defaults", config_path);
            config::SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    /// Create a Blog instance with an explicit configuration
    pub fn with_config<P: AsRef<Path>>(base_dir: P, config: config::SiteConfig) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        let content_dir = base_dir.join(&config.content_dir);
        let assets_dir = base_dir.join(&config.assets_dir);

        let repository = PostRepository::new(&content_dir)
            .with_words_per_minute(config.words_per_minute)
            .with_malformed_policy(config.listing.on_malformed);

        let renderer = MarkdownRenderer::with_options(
            &config.highlight.theme,
            config.highlight.line_number,
            &config.asset_mount(),
        );
        let loader = PostLoader::new(&content_dir, renderer)
            .with_words_per_minute(config.words_per_minute);

        Self {
            config,
            base_dir,
            content_dir,
            assets_dir,
            repository,
            loader,
        }
    }

    /// All posts, newest first
    pub fn posts(&self) -> Result<Vec<PostSummary>, BlogError> {
        self.repository.list()
    }

    /// A single rendered post
    pub fn post(&self, slug: &str) -> Result<PostDetail, BlogError> {
        self.loader.load(slug)
    }

    pub fn repository(&self) -> &PostRepository {
        &self.repository
    }

    pub fn loader(&self) -> &PostLoader {
        &self.loader
    }
}
