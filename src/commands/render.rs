//! Render a single post to stdout

use anyhow::Result;

use crate::Blog;

/// Print the rendered HTML body of the post named by `slug`
pub fn run(blog: &Blog, slug: &str) -> Result<()> {
    let post = blog.post(slug)?;
    tracing::info!(
        "Rendered {:?} ({:.1} minutes to read)",
        post.summary.title,
        post.summary.reading_time
    );
    println!("{}", post.body);
    Ok(())
}
