pub mod channel_repository_errors;
pub mod match_repository_errors;
