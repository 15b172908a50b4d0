//! Post repository - builds the date-sorted post listing

use std::cmp::Reverse;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::frontmatter::parse_date_string;
use super::{FrontMatter, PostSummary, ReadingTime, DEFAULT_WORDS_PER_MINUTE};
use crate::config::MalformedPolicy;
use crate::error::BlogError;

/// Enumerates the posts of a content directory
#[derive(Debug, Clone)]
pub struct PostRepository {
    content_dir: PathBuf,
    words_per_minute: u32,
    on_malformed: MalformedPolicy,
}

impl PostRepository {
    /// Create a repository over `content_dir` with default settings
    pub fn new<P: Into<PathBuf>>(content_dir: P) -> Self {
        Self {
            content_dir: content_dir.into(),
            words_per_minute: DEFAULT_WORDS_PER_MINUTE,
            on_malformed: MalformedPolicy::default(),
        }
    }

    pub fn with_words_per_minute(mut self, words_per_minute: u32) -> Self {
        self.words_per_minute = words_per_minute;
        self
    }

    pub fn with_malformed_policy(mut self, policy: MalformedPolicy) -> Self {
        self.on_malformed = policy;
        self
    }

    pub fn content_dir(&self) -> &Path {
        &self.content_dir
    }

    /// List every post, newest first.
    ///
    /// Posts with equal dates are ordered by slug. Dates that cannot be
    /// parsed sort after all parseable ones.
    pub fn list(&self) -> Result<Vec<PostSummary>, BlogError> {
        let dir_error = |source: io::Error| BlogError::DirectoryRead {
            path: self.content_dir.clone(),
            source,
        };

        let metadata = fs::metadata(&self.content_dir).map_err(dir_error)?;
        if !metadata.is_dir() {
            return Err(dir_error(io::Error::new(
                io::ErrorKind::Other,
                "not a directory",
            )));
        }

        let mut posts = Vec::new();

        for entry in WalkDir::new(&self.content_dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| dir_error(e.into()))?;
            let path = entry.path();
            if !entry.file_type().is_file() || !is_markdown_file(path) {
                continue;
            }

            match self.load_summary(path) {
                Ok(post) => posts.push(post),
                Err(e) if self.on_malformed == MalformedPolicy::Skip => {
                    tracing::warn!("Skipping post {:?}: {}", path, e);
                }
                Err(e) => return Err(e),
            }
        }

        posts.sort_by_cached_key(|post| (Reverse(parse_date_string(&post.date)), post.slug.clone()));

        tracing::debug!("Listed {} posts from {:?}", posts.len(), self.content_dir);

        Ok(posts)
    }

    /// Build the summary of a single post file
    fn load_summary(&self, path: &Path) -> Result<PostSummary, BlogError> {
        let slug = slug_from_path(path).ok_or_else(|| {
            BlogError::parse(format!("{:?} is not a valid UTF-8 file name", path))
        })?;

        let content = fs::read_to_string(path).map_err(|source| BlogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let (fm, body) = FrontMatter::parse(&content).map_err(|e| e.in_file(path))?;

        let reading = ReadingTime::estimate(body, self.words_per_minute);

        Ok(PostSummary {
            slug,
            title: fm.title,
            date: fm.date,
            reading_time: reading.minutes,
            description: fm.short_desc,
        })
    }
}

/// Check if a file is a markdown post
pub(crate) fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "md")
        .unwrap_or(false)
}

/// Slug of a post file: its name without the extension
fn slug_from_path(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_post(dir: &Path, slug: &str, date: &str, body: &str) {
        let content = format!(
            "---\ntitle: {slug} title\ndate: {date}\nshortDesc: about {slug}\n---\n\n{body}"
        );
        fs::write(dir.join(format!("{}.md", slug)), content).unwrap();
    }

    fn slugs(posts: &[PostSummary]) -> Vec<&str> {
        posts.iter().map(|p| p.slug.as_str()).collect()
    }

    #[test]
    fn test_sorted_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        write_post(dir.path(), "old", "2021-01-01", "a");
        write_post(dir.path(), "newest", "2023-05-05", "b");
        write_post(dir.path(), "middle", "2022-02-02", "c");

        let posts = PostRepository::new(dir.path()).list().unwrap();
        assert_eq!(slugs(&posts), vec!["newest", "middle", "old"]);

        let dates: Vec<_> = posts.iter().map(|p| p.date.as_str()).collect();
        assert_eq!(dates, vec!["2023-05-05", "2022-02-02", "2021-01-01"]);
    }

    #[test]
    fn test_summary_fields() {
        let dir = tempfile::tempdir().unwrap();
        write_post(dir.path(), "hello-world", "2024-01-01", &"word ".repeat(100));

        let posts = PostRepository::new(dir.path()).list().unwrap();
        assert_eq!(posts.len(), 1);
        let post = &posts[0];
        assert_eq!(post.slug, "hello-world");
        assert_eq!(post.title, "hello-world title");
        assert_eq!(post.description, "about hello-world");
        assert_eq!(post.reading_time, 0.5);
    }

    #[test]
    fn test_reading_time_uses_raw_body_and_configured_speed() {
        let dir = tempfile::tempdir().unwrap();
        // Markdown syntax tokens count as words since the body is not rendered
        write_post(dir.path(), "p", "2024-01-01", "# Title\n\n- a\n- b");

        let posts = PostRepository::new(dir.path())
            .with_words_per_minute(6)
            .list()
            .unwrap();
        assert_eq!(posts[0].reading_time, 1.0);
    }

    #[test]
    fn test_ties_broken_by_slug() {
        let dir = tempfile::tempdir().unwrap();
        write_post(dir.path(), "charlie", "2022-02-02", "");
        write_post(dir.path(), "alpha", "2022-02-02", "");
        write_post(dir.path(), "bravo", "2022-02-02", "");

        let posts = PostRepository::new(dir.path()).list().unwrap();
        assert_eq!(slugs(&posts), vec!["alpha", "bravo", "charlie"]);
    }

    #[test]
    fn test_unparseable_dates_sort_last() {
        let dir = tempfile::tempdir().unwrap();
        write_post(dir.path(), "undated", "someday", "");
        write_post(dir.path(), "dated", "2020-01-01", "");
        write_post(dir.path(), "also-undated", "", "");

        let posts = PostRepository::new(dir.path()).list().unwrap();
        assert_eq!(slugs(&posts), vec!["dated", "also-undated", "undated"]);
    }

    #[test]
    fn test_datetime_and_date_compare() {
        let dir = tempfile::tempdir().unwrap();
        write_post(dir.path(), "morning", "2022-02-02", "");
        write_post(dir.path(), "evening", "2022-02-02 18:00:00", "");

        let posts = PostRepository::new(dir.path()).list().unwrap();
        assert_eq!(slugs(&posts), vec!["evening", "morning"]);
    }

    #[test]
    fn test_empty_directory_is_empty_listing() {
        let dir = tempfile::tempdir().unwrap();
        let posts = PostRepository::new(dir.path()).list().unwrap();
        assert!(posts.is_empty());
    }

    #[test]
    fn test_ignores_non_markdown_and_subdirectories() {
        let dir = tempfile::tempdir().unwrap();
        write_post(dir.path(), "real", "2024-01-01", "");
        fs::write(dir.path().join("notes.txt"), "not a post").unwrap();
        fs::create_dir(dir.path().join("drafts")).unwrap();
        write_post(&dir.path().join("drafts"), "draft", "2025-01-01", "");

        let posts = PostRepository::new(dir.path()).list().unwrap();
        assert_eq!(slugs(&posts), vec!["real"]);
    }

    #[test]
    fn test_missing_directory_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = PostRepository::new(dir.path().join("nope")).list().unwrap_err();
        assert!(matches!(err, BlogError::DirectoryRead { .. }));
    }

    #[test]
    fn test_file_instead_of_directory_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("posts");
        fs::write(&file, "").unwrap();
        let err = PostRepository::new(&file).list().unwrap_err();
        assert!(matches!(err, BlogError::DirectoryRead { .. }));
    }

    #[test]
    fn test_malformed_post_aborts_listing_by_default() {
        let dir = tempfile::tempdir().unwrap();
        write_post(dir.path(), "good", "2024-01-01", "");
        fs::write(dir.path().join("bad.md"), "no front-matter here").unwrap();

        let err = PostRepository::new(dir.path()).list().unwrap_err();
        assert!(matches!(err, BlogError::Parse { .. }));
        assert!(err.to_string().contains("bad.md"));
    }

    #[test]
    fn test_malformed_post_skipped_when_configured() {
        let dir = tempfile::tempdir().unwrap();
        write_post(dir.path(), "good", "2024-01-01", "");
        fs::write(dir.path().join("bad.md"), "---\ntitle: [oops\n---\n").unwrap();

        let posts = PostRepository::new(dir.path())
            .with_malformed_policy(MalformedPolicy::Skip)
            .list()
            .unwrap();
        assert_eq!(slugs(&posts), vec!["good"]);
    }
}
