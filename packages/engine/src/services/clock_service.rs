use chrono::{DateTime, Utc};

use crate::models::game_match::{Match, MatchStatus, PieceColor};

/// Cap on the seconds charged for any single move. Keeps an abandoned or
/// reconnecting player from losing their whole clock to one long gap; the
/// clocks only advance when moves are submitted, there is no background
/// ticking.
pub const MAX_MOVE_CHARGE_SECS: i64 = 60;

/// Outcome of settling a mover's clock.
#[derive(Debug, PartialEq, Eq)]
pub enum TimeCharge {
    /// The mover had time left. Their clock has been reduced.
    Applied,
    /// The mover's clock ran out. The match has been marked won by the
    /// opponent and no move should be applied.
    Flagged,
}

/// Charges thinking time against the clock of the player about to move.
#[derive(Clone)]
pub struct ClockService;

impl ClockService {
    pub fn new() -> Self {
        ClockService
    }

    /// Deducts the time elapsed since the last accepted move from the
    /// clock of the current turn owner. Elapsed time is clamped to
    /// `[0, MAX_MOVE_CHARGE_SECS]`, so clock skew can never credit time
    /// back and one gap can never cost more than the cap.
    ///
    /// If the charge empties the clock, the match is flagged: status flips
    /// to the opponent's win and `finished_at` is stamped.
    pub fn charge(&self, game_match: &mut Match, now: DateTime<Utc>) -> TimeCharge {
        // The opening move is free. The baseline starts mattering once
        // play is underway.
        if game_match.ply == 0 {
            return TimeCharge::Applied;
        }

        let elapsed = (now - game_match.last_move_at)
            .num_seconds()
            .clamp(0, MAX_MOVE_CHARGE_SECS) as u64;

        let mover = if game_match.turn_player_id == game_match.player1_id {
            PieceColor::White
        } else {
            PieceColor::Black
        };
        let clock = match mover {
            PieceColor::White => &mut game_match.white_time_secs,
            PieceColor::Black => &mut game_match.black_time_secs,
        };

        if *clock <= elapsed {
            *clock = 0;
            game_match.status = MatchStatus::win_for(mover.opposite());
            game_match.finished_at = Some(now);
            return TimeCharge::Flagged;
        }

        *clock -= elapsed;
        TimeCharge::Applied
    }
}
