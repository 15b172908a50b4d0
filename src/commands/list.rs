//! List posts

use anyhow::Result;

use crate::content::{PostSummary, ReadingTime};
use crate::Blog;

/// Print every post, newest first
pub fn run(blog: &Blog) -> Result<()> {
    let posts = blog.posts()?;
    println!("Posts ({}):", posts.len());
    for post in &posts {
        println!("{}", summary_line(post));
    }

    Ok(())
}

/// One listing row: date, reading time, title and slug
fn summary_line(post: &PostSummary) -> String {
    format!(
        "  {} - {} [{}] ({})",
        post.date,
        post.title,
        post.slug,
        ReadingTime::label(post.reading_time)
    )
}
