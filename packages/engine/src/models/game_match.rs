use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::move_record::MoveRecord;

/// Standard starting position, white to move.
pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Time-control preset. Fixes the per-side clock budget at match creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameType {
    Blitz,
    Rapid,
}

impl GameType {
    /// Starting clock budget per side, in seconds.
    pub fn initial_time_secs(&self) -> u64 {
        match self {
            GameType::Blitz => 180,
            GameType::Rapid => 600,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchStatus {
    Waiting,
    Ongoing,
    WhiteWin,
    BlackWin,
    Draw,
}

impl MatchStatus {
    /// Terminal statuses accept no further moves.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            MatchStatus::WhiteWin | MatchStatus::BlackWin | MatchStatus::Draw
        )
    }

    /// The status declaring the given color the winner.
    pub fn win_for(color: PieceColor) -> MatchStatus {
        match color {
            PieceColor::White => MatchStatus::WhiteWin,
            PieceColor::Black => MatchStatus::BlackWin,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PieceColor {
    White,
    Black,
}

impl PieceColor {
    pub fn opposite(&self) -> PieceColor {
        match self {
            PieceColor::White => PieceColor::Black,
            PieceColor::Black => PieceColor::White,
        }
    }

    /// Color that plays a given ply. Plies are counted from 1 and white
    /// always moves first, so odd plies are white.
    pub fn from_ply(ply: u32) -> PieceColor {
        if ply % 2 != 0 {
            PieceColor::White
        } else {
            PieceColor::Black
        }
    }
}

/// The central match aggregate: players, lifecycle status, current board,
/// turn ownership, both clocks and the owned move history.
///
/// `player1_id` always plays white and is set at creation; `player2_id`
/// (black) is absent while the match is waiting for an opponent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Match {
    pub match_id: String,
    pub player1_id: String,
    pub player2_id: Option<String>,
    pub status: MatchStatus,
    pub game_type: GameType,
    pub fen: String,
    pub turn_player_id: String,
    pub ply: u32,
    pub last_move_uci: Option<String>,
    pub white_time_secs: u64,
    pub black_time_secs: u64,
    /// Baseline for elapsed-time accounting: the instant of the last
    /// accepted move, or of the most recent clock reset (creation / join).
    pub last_move_at: DateTime<Utc>,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub moves: Vec<MoveRecord>,
}

impl Match {
    /// A match with both seats filled, ready to play. The first player is
    /// white and moves first.
    pub fn paired(player1_id: &str, player2_id: &str, game_type: GameType) -> Self {
        let now = Utc::now();
        let initial_time = game_type.initial_time_secs();
        Match {
            match_id: Uuid::new_v4().to_string(),
            player1_id: player1_id.to_string(),
            player2_id: Some(player2_id.to_string()),
            status: MatchStatus::Ongoing,
            game_type,
            fen: STARTING_FEN.to_string(),
            turn_player_id: player1_id.to_string(),
            ply: 0,
            last_move_uci: None,
            white_time_secs: initial_time,
            black_time_secs: initial_time,
            last_move_at: now,
            started_at: now,
            finished_at: None,
            moves: Vec::new(),
        }
    }

    /// An invite match with only the creator seated. Stays `Waiting` until
    /// an opponent joins; private matches always use the rapid budget.
    pub fn private(player1_id: &str) -> Self {
        let mut game_match = Match::paired(player1_id, "", GameType::Rapid);
        game_match.player2_id = None;
        game_match.status = MatchStatus::Waiting;
        game_match
    }

    pub fn is_participant(&self, player_id: &str) -> bool {
        self.player1_id == player_id || self.player2_id.as_deref() == Some(player_id)
    }

    /// The seat color of a participant, if they are one.
    pub fn player_color(&self, player_id: &str) -> Option<PieceColor> {
        if self.player1_id == player_id {
            Some(PieceColor::White)
        } else if self.player2_id.as_deref() == Some(player_id) {
            Some(PieceColor::Black)
        } else {
            None
        }
    }

    /// Appends the accepted move to the history and advances the ply,
    /// last-move notation and elapsed-time baseline together.
    pub fn record_move(&mut self, uci: &str, played_at: DateTime<Utc>) {
        let ply = self.ply + 1;
        self.moves.push(MoveRecord::new(ply, uci, played_at));
        self.ply = ply;
        self.last_move_uci = Some(uci.to_string());
        self.last_move_at = played_at;
    }
}

/// Public projection of a match, published on topics and returned by every
/// engine operation. Deliberately excludes the move history to keep
/// payloads bounded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchView {
    pub match_id: String,
    pub status: MatchStatus,
    pub game_type: GameType,
    pub player1_id: String,
    pub player2_id: Option<String>,
    pub fen: String,
    pub turn_player_id: String,
    pub ply: u32,
    pub last_move_uci: Option<String>,
    pub white_time_secs: u64,
    pub black_time_secs: u64,
    pub last_move_at: DateTime<Utc>,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl From<&Match> for MatchView {
    fn from(game_match: &Match) -> Self {
        MatchView {
            match_id: game_match.match_id.clone(),
            status: game_match.status,
            game_type: game_match.game_type,
            player1_id: game_match.player1_id.clone(),
            player2_id: game_match.player2_id.clone(),
            fen: game_match.fen.clone(),
            turn_player_id: game_match.turn_player_id.clone(),
            ply: game_match.ply,
            last_move_uci: game_match.last_move_uci.clone(),
            white_time_secs: game_match.white_time_secs,
            black_time_secs: game_match.black_time_secs,
            last_move_at: game_match.last_move_at,
            started_at: game_match.started_at,
            finished_at: game_match.finished_at,
        }
    }
}
