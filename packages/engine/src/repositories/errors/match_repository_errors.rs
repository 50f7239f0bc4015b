#[derive(Debug)]
pub enum MatchRepositoryError {
    NotFound(String),
    AlreadyExists(String),
    Serialization(String),
    Storage(String),
}

impl std::fmt::Display for MatchRepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchRepositoryError::NotFound(match_id) => {
                write!(f, "No stored match with id: {}", match_id)
            }
            MatchRepositoryError::AlreadyExists(match_id) => {
                write!(f, "Match already stored with id: {}", match_id)
            }
            MatchRepositoryError::Serialization(msg) => {
                write!(f, "Serialization error: {}", msg)
            }
            MatchRepositoryError::Storage(msg) => write!(f, "Storage error: {}", msg),
        }
    }
}

impl std::error::Error for MatchRepositoryError {}
