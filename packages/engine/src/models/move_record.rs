use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::game_match::PieceColor;

/// One accepted move in a match history.
///
/// Plies count from 1. The full-move number pairs plies up the way game
/// notation does: plies 1 and 2 are move 1, plies 3 and 4 are move 2.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    pub ply: u32,
    pub move_number: u32,
    pub color: PieceColor,
    pub uci: String,
    pub played_at: DateTime<Utc>,
}

impl MoveRecord {
    pub fn new(ply: u32, uci: &str, played_at: DateTime<Utc>) -> Self {
        MoveRecord {
            ply,
            move_number: (ply + 1) / 2,
            color: PieceColor::from_ply(ply),
            uci: uci.to_string(),
            played_at,
        }
    }
}
