//! Content module - front-matter, markdown rendering and post loading

mod frontmatter;
pub mod loader;
mod markdown;
mod post;
mod reading_time;
pub mod repository;

pub use frontmatter::FrontMatter;
pub use loader::PostLoader;
pub use markdown::{MarkdownRenderer, DEFAULT_ASSET_PREFIX};
pub use post::{PostDetail, PostSummary};
pub use reading_time::{ReadingTime, DEFAULT_WORDS_PER_MINUTE};
pub use repository::PostRepository;

pub(crate) use frontmatter::parse_date_string;
