pub mod channel_repository;
pub mod errors;
pub mod match_repository;
