pub mod game_match;
pub mod move_record;
pub mod queue;
