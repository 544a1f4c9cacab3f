use std::sync::Arc;

use chrono::{Duration, Utc};
use dashmap::DashMap;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{normalize_symbol, Author, CommunityPost, CreatePost};

const DEFAULT_AUTHOR: &str = "You";

/// Per-symbol discussion feeds, newest post first
#[derive(Clone, Default)]
pub struct CommunityService {
    posts: Arc<DashMap<String, Vec<CommunityPost>>>,
}

impl CommunityService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seeded() -> Self {
        let service = Self::new();
        let now = Utc::now();
        let jane = Author::named("Jane Smith");
        let john = Author::named("John Capital");

        let seed = [
            ("AAPL", &jane, "Apple's earnings report next week will be crucial. I'm expecting strong iPhone sales to beat expectations.", 30, 15),
            ("AAPL", &john, "The Vision Pro is a long-term play. Don't underestimate its potential to create a new market segment.", 60, 42),
            ("TSLA", &john, "Cybertruck production ramp-up seems to be facing some headwinds. Watching delivery numbers closely.", 15, 22),
        ];

        for (symbol, author, content, minutes_ago, likes) in seed {
            service
                .posts
                .entry(symbol.to_string())
                .or_default()
                .push(CommunityPost {
                    id: Uuid::new_v4(),
                    symbol: symbol.to_string(),
                    author: author.clone(),
                    content: content.to_string(),
                    timestamp: now - Duration::minutes(minutes_ago),
                    likes,
                });
        }
        service
    }

    pub fn posts(&self, symbol: &str) -> Vec<CommunityPost> {
        self.posts
            .get(&normalize_symbol(symbol))
            .map(|entry| entry.value().clone())
            .unwrap_or_default()
    }

    pub fn create_post(&self, symbol: &str, input: CreatePost) -> Result<CommunityPost, AppError> {
        let content = input.content.trim();
        if content.is_empty() {
            return Err(AppError::Validation("Post content cannot be empty".into()));
        }

        let author_name = input
            .author_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_AUTHOR);

        let symbol = normalize_symbol(symbol);
        let post = CommunityPost {
            id: Uuid::new_v4(),
            symbol: symbol.clone(),
            author: Author::named(author_name),
            content: content.to_string(),
            timestamp: Utc::now(),
            likes: 0,
        };

        self.posts
            .entry(symbol.clone())
            .or_default()
            .insert(0, post.clone());
        info!("New community post {} on {}", post.id, symbol);

        Ok(post)
    }

    pub fn like(&self, symbol: &str, id: Uuid) -> Result<CommunityPost, AppError> {
        let symbol = normalize_symbol(symbol);
        let mut feed = self
            .posts
            .get_mut(&symbol)
            .ok_or_else(|| AppError::NotFound(format!("No posts for {}", symbol)))?;

        let post = feed
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Post {} not found", id)))?;
        post.likes += 1;
        Ok(post.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_feeds() {
        let service = CommunityService::seeded();
        assert_eq!(service.posts("AAPL").len(), 2);
        assert_eq!(service.posts("tsla").len(), 1);
        assert!(service.posts("MSFT").is_empty());
    }

    #[test]
    fn test_new_post_is_prepended() {
        let service = CommunityService::seeded();
        let post = service
            .create_post("aapl", CreatePost { content: "  Buying the dip  ".into(), author_name: None })
            .unwrap();

        assert_eq!(post.content, "Buying the dip");
        assert_eq!(post.author.name, "You");
        assert_eq!(post.likes, 0);

        let feed = service.posts("AAPL");
        assert_eq!(feed.len(), 3);
        assert_eq!(feed[0].id, post.id);
    }

    #[test]
    fn test_blank_post_is_rejected() {
        let service = CommunityService::new();
        let result = service.create_post("NVDA", CreatePost { content: "   ".into(), author_name: None });
        assert!(matches!(result, Err(AppError::Validation(_))));
        assert!(service.posts("NVDA").is_empty());
    }

    #[test]
    fn test_like_increments() {
        let service = CommunityService::new();
        let post = service
            .create_post("AMZN", CreatePost { content: "Prime day!".into(), author_name: Some("Ann".into()) })
            .unwrap();

        let liked = service.like("AMZN", post.id).unwrap();
        assert_eq!(liked.likes, 1);
        assert_eq!(liked.author.name, "Ann");

        assert!(matches!(service.like("AMZN", Uuid::new_v4()), Err(AppError::NotFound(_))));
        assert!(matches!(service.like("MSFT", post.id), Err(AppError::NotFound(_))));
    }
}
