use crate::repositories::errors::channel_repository_errors::ChannelRepositoryError;
use crate::repositories::errors::match_repository_errors::MatchRepositoryError;
use crate::services::errors::board_service_errors::BoardServiceError;

#[derive(Debug)]
pub enum MatchServiceError {
    MatchNotFound,
    MatchNotActive,
    MissingOpponent,
    NotYourTurn,
    MalformedMove(String),
    WrongSideToMove,
    MatchAlreadyFull,
    CannotJoinOwnMatch,
    NotAParticipant,
    Board(BoardServiceError),
    Repository(MatchRepositoryError),
    Channel(ChannelRepositoryError),
}

impl MatchServiceError {
    /// Rejections are the caller's fault: the request was understood and
    /// turned down, and the match is exactly as it was. Everything else is
    /// an engine-side failure.
    pub fn is_rejection(&self) -> bool {
        !matches!(
            self,
            MatchServiceError::Board(_)
                | MatchServiceError::Repository(_)
                | MatchServiceError::Channel(_)
        )
    }
}

impl std::fmt::Display for MatchServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchServiceError::MatchNotFound => write!(f, "Match not found"),
            MatchServiceError::MatchNotActive => write!(f, "Match is not active"),
            MatchServiceError::MissingOpponent => write!(f, "Waiting for an opponent to join"),
            MatchServiceError::NotYourTurn => write!(f, "Not your turn"),
            MatchServiceError::MalformedMove(msg) => write!(f, "Malformed move: {}", msg),
            MatchServiceError::WrongSideToMove => {
                write!(f, "Move is for the wrong side of the board")
            }
            MatchServiceError::MatchAlreadyFull => write!(f, "Match already has two players"),
            MatchServiceError::CannotJoinOwnMatch => write!(f, "Cannot join your own match"),
            MatchServiceError::NotAParticipant => write!(f, "Not a participant in this match"),
            MatchServiceError::Board(err) => write!(f, "Board error: {}", err),
            MatchServiceError::Repository(err) => write!(f, "Repository error: {}", err),
            MatchServiceError::Channel(err) => write!(f, "Channel error: {}", err),
        }
    }
}

impl std::error::Error for MatchServiceError {}

impl From<BoardServiceError> for MatchServiceError {
    fn from(err: BoardServiceError) -> Self {
        match err {
            // Bad notation is the mover's problem, not an internal fault.
            BoardServiceError::MalformedMove(msg) => MatchServiceError::MalformedMove(msg),
            other => MatchServiceError::Board(other),
        }
    }
}

impl From<MatchRepositoryError> for MatchServiceError {
    fn from(err: MatchRepositoryError) -> Self {
        MatchServiceError::Repository(err)
    }
}

impl From<ChannelRepositoryError> for MatchServiceError {
    fn from(err: ChannelRepositoryError) -> Self {
        MatchServiceError::Channel(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejections_are_distinguished_from_failures() {
        assert!(MatchServiceError::NotYourTurn.is_rejection());
        assert!(MatchServiceError::MatchNotFound.is_rejection());
        assert!(MatchServiceError::MalformedMove("too short".to_string()).is_rejection());
        assert!(!MatchServiceError::Repository(MatchRepositoryError::Storage(
            "connection reset".to_string()
        ))
        .is_rejection());
        assert!(
            !MatchServiceError::Board(BoardServiceError::InvalidPosition(
                "truncated".to_string()
            ))
            .is_rejection()
        );
    }

    #[test]
    fn test_malformed_notation_converts_to_a_rejection() {
        let err: MatchServiceError =
            BoardServiceError::MalformedMove("expected 4 or 5 characters".to_string()).into();
        assert!(matches!(err, MatchServiceError::MalformedMove(_)));

        let err: MatchServiceError =
            BoardServiceError::InvalidPosition("bad rank".to_string()).into();
        assert!(matches!(err, MatchServiceError::Board(_)));
    }
}
