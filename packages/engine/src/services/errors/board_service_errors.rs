#[derive(Debug)]
pub enum BoardServiceError {
    /// The move notation itself is unusable: wrong length or coordinates
    /// off the board.
    MalformedMove(String),
    /// The serialized position could not be decoded. Stored positions are
    /// only ever written by the engine, so this indicates corrupt state.
    InvalidPosition(String),
}

impl std::fmt::Display for BoardServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BoardServiceError::MalformedMove(msg) => write!(f, "Malformed move: {}", msg),
            BoardServiceError::InvalidPosition(msg) => write!(f, "Invalid position: {}", msg),
        }
    }
}

impl std::error::Error for BoardServiceError {}
