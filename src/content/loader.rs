//! Post loader - loads and renders a single post by slug

use std::fs;
use std::path::{Path, PathBuf};

use super::{FrontMatter, MarkdownRenderer, PostDetail, PostSummary, ReadingTime};
use super::DEFAULT_WORDS_PER_MINUTE;
use crate::error::BlogError;

/// Loads full post content from the content directory
pub struct PostLoader {
    content_dir: PathBuf,
    renderer: MarkdownRenderer,
    words_per_minute: u32,
}

impl PostLoader {
    /// Create a new post loader
    pub fn new<P: Into<PathBuf>>(content_dir: P, renderer: MarkdownRenderer) -> Self {
        Self {
            content_dir: content_dir.into(),
            renderer,
            words_per_minute: DEFAULT_WORDS_PER_MINUTE,
        }
    }

    pub fn with_words_per_minute(mut self, words_per_minute: u32) -> Self {
        self.words_per_minute = words_per_minute;
        self
    }

    pub fn renderer(&self) -> &MarkdownRenderer {
        &self.renderer
    }

    /// Load the post stored as `<slug>.md`.
    ///
    /// Every failure, whether the file is missing, unreadable or malformed,
    /// is reported as [`BlogError::NotFound`].
    pub fn load(&self, slug: &str) -> Result<PostDetail, BlogError> {
        if !is_valid_slug(slug) {
            tracing::debug!("Rejecting invalid slug {:?}", slug);
            return Err(BlogError::not_found(slug));
        }

        let path = self.content_dir.join(format!("{}.md", slug));
        self.load_post(slug, &path).map_err(|e| {
            tracing::debug!("Failed to load post {:?}: {}", path, e);
            BlogError::not_found(slug)
        })
    }

    fn load_post(&self, slug: &str, path: &Path) -> Result<PostDetail, BlogError> {
        let content = fs::read_to_string(path).map_err(|source| BlogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let (fm, body) = FrontMatter::parse(&content)?;

        let html = self.renderer.render(body);
        // Estimated from the rendered output, not the raw markdown
        let reading = ReadingTime::estimate(&html, self.words_per_minute);

        Ok(PostDetail {
            summary: PostSummary {
                slug: slug.to_string(),
                title: fm.title,
                date: fm.date,
                reading_time: reading.minutes,
                description: fm.short_desc,
            },
            featured_image: fm.featured_image,
            body: html,
        })
    }
}

/// A slug must name a file directly inside the content directory
fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug != "."
        && slug != ".."
        && !slug.contains(['/', '\\', '\0'])
}
