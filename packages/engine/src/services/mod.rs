pub mod board_service;
pub mod clock_service;
pub mod errors;
pub mod match_service;
pub mod matchmaking_service;
pub mod notification_service;
