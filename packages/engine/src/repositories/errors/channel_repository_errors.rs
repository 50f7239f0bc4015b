#[derive(Debug)]
pub enum ChannelRepositoryError {
    Serialization(String),
    Transport(String),
}

impl std::fmt::Display for ChannelRepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChannelRepositoryError::Serialization(msg) => {
                write!(f, "Serialization error: {}", msg)
            }
            ChannelRepositoryError::Transport(msg) => write!(f, "Transport error: {}", msg),
        }
    }
}

impl std::error::Error for ChannelRepositoryError {}
