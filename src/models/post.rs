use serde::{Deserialize, Serialize};

/// A review post in the `posts` collection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub author: String,
    #[serde(rename = "movieTitle")]
    pub movie_title: String,
    pub content: String,
    #[serde(default = "default_rating")]
    pub rating: u8,
    #[serde(default)]
    pub anonymous: bool,
    #[serde(rename = "profileIcon")]
    pub profile_icon: String,
    #[serde(rename = "moviePoster", skip_serializing_if = "Option::is_none")]
    pub movie_poster: Option<String>,
    #[serde(rename = "movieYear", skip_serializing_if = "Option::is_none")]
    pub movie_year: Option<String>,
    #[serde(rename = "moviePlot", skip_serializing_if = "Option::is_none")]
    pub movie_plot: Option<String>,
    pub timestamp: String,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

fn default_rating() -> u8 {
    5
}

/// A comment embedded in a post document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub author: String,
    pub content: String,
    #[serde(rename = "profileIcon")]
    pub profile_icon: String,
    pub timestamp: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_defaults() {
        let json = r#"{
            "author": "a@b.c",
            "movieTitle": "Heat",
            "content": "great",
            "profileIcon": "🎬",
            "timestamp": "2024-01-01T00:00:00Z"
        }"#;
        let post: Post = serde_json::from_str(json).unwrap();
        assert_eq!(post.rating, 5);
        assert!(!post.anonymous);
        assert!(post.comments.is_empty());
    }
}
