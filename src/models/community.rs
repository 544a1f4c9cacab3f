use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
    pub photo_url: String,
}

impl Author {
    pub fn named(name: &str) -> Self {
        let slug: String = name
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect::<String>()
            .to_lowercase();
        Self {
            name: name.to_string(),
            photo_url: format!("https://i.pravatar.cc/150?u={}", slug),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommunityPost {
    pub id: Uuid,
    pub symbol: String,
    pub author: Author,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    pub likes: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePost {
    pub content: String,
    pub author_name: Option<String>,
}
