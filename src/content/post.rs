//! Post models

use serde::{Deserialize, Serialize};

/// A post as shown in listings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostSummary {
    /// Filename without the `.md` extension
    pub slug: String,

    /// Post title
    pub title: String,

    /// Publication date as written in the front-matter
    pub date: String,

    /// Estimated reading time in minutes
    pub reading_time: f64,

    /// Short description (`shortDesc`)
    pub description: String,
}

/// A fully rendered post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDetail {
    #[serde(flatten)]
    pub summary: PostSummary,

    /// Cover image path as written in the front-matter
    pub featured_image: Option<String>,

    /// Rendered HTML content
    pub body: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_serializes_flat_camel_case() {
        let detail = PostDetail {
            summary: PostSummary {
                slug: "hello-world".to_string(),
                title: "Hello".to_string(),
                date: "2024-01-01".to_string(),
                reading_time: 0.5,
                description: "desc".to_string(),
            },
            featured_image: Some("/cover.png".to_string()),
            body: "<h1>Hi</h1>".to_string(),
        };

        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json["slug"], "hello-world");
        assert_eq!(json["readingTime"], 0.5);
        assert_eq!(json["featuredImage"], "/cover.png");
        assert_eq!(json["body"], "<h1>Hi</h1>");
        assert!(json.get("summary").is_none());
    }
}
