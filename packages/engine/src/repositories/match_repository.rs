use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::models::game_match::Match;
use crate::repositories::errors::match_repository_errors::MatchRepositoryError;

/// Durable home of match state. The engine never caches matches between
/// operations, so every operation reads through this trait and writes back
/// the full aggregate.
#[async_trait]
pub trait MatchRepository: Send + Sync {
    async fn create_match(&self, game_match: &Match) -> Result<(), MatchRepositoryError>;

    async fn get_match(&self, match_id: &str) -> Result<Option<Match>, MatchRepositoryError>;

    async fn update_match(&self, game_match: &Match) -> Result<(), MatchRepositoryError>;
}

/// Process-local match store, used as the reference implementation and in
/// tests. Hands out deep copies so callers never alias stored state.
#[derive(Debug, Default)]
pub struct InMemoryMatchRepository {
    matches: Mutex<HashMap<String, Match>>,
}

impl InMemoryMatchRepository {
    pub fn new() -> Self {
        InMemoryMatchRepository::default()
    }
}

#[async_trait]
impl MatchRepository for InMemoryMatchRepository {
    async fn create_match(&self, game_match: &Match) -> Result<(), MatchRepositoryError> {
        let mut matches = self.matches.lock().await;
        if matches.contains_key(&game_match.match_id) {
            return Err(MatchRepositoryError::AlreadyExists(
                game_match.match_id.clone(),
            ));
        }
        matches.insert(game_match.match_id.clone(), game_match.clone());
        Ok(())
    }

    async fn get_match(&self, match_id: &str) -> Result<Option<Match>, MatchRepositoryError> {
        let matches = self.matches.lock().await;
        Ok(matches.get(match_id).cloned())
    }

    async fn update_match(&self, game_match: &Match) -> Result<(), MatchRepositoryError> {
        let mut matches = self.matches.lock().await;
        if !matches.contains_key(&game_match.match_id) {
            return Err(MatchRepositoryError::NotFound(game_match.match_id.clone()));
        }
        matches.insert(game_match.match_id.clone(), game_match.clone());
        Ok(())
    }
}
