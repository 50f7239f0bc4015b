use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::models::game_match::{GameType, Match, MatchStatus, MatchView, PieceColor};
use crate::repositories::match_repository::MatchRepository;
use crate::services::board_service::{BoardService, UciMove};
use crate::services::clock_service::{ClockService, TimeCharge};
use crate::services::errors::match_service_errors::MatchServiceError;
use crate::services::notification_service::NotificationService;

/// Turn authority for live matches.
///
/// Every mutation runs as read, check, mutate, persist, publish under a
/// per-match lock, so concurrent requests against one match serialize while
/// different matches proceed in parallel. Rejected requests leave the match
/// exactly as it was.
#[derive(Clone)]
pub struct MatchService {
    repository: Arc<dyn MatchRepository + Send + Sync>,
    notifications: NotificationService,
    board_service: BoardService,
    clock_service: ClockService,
    match_locks: Arc<Mutex<HashMap<String, Arc<Mutex<()>>>>>,
}

impl MatchService {
    pub fn new(
        repository: Arc<dyn MatchRepository + Send + Sync>,
        notifications: NotificationService,
    ) -> Self {
        MatchService {
            repository,
            notifications,
            board_service: BoardService::new(),
            clock_service: ClockService::new(),
            match_locks: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// The guard serializing all mutations of one match. Entries are a few
    /// words each and live for the process lifetime.
    async fn lock_for(&self, match_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.match_locks.lock().await;
        locks
            .entry(match_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Creates a match with both seats filled. The first player takes
    /// white and the opening turn.
    pub async fn create_paired_match(
        &self,
        white_player_id: &str,
        black_player_id: &str,
        game_type: GameType,
    ) -> Result<MatchView, MatchServiceError> {
        let game_match = Match::paired(white_player_id, black_player_id, game_type);
        self.repository.create_match(&game_match).await?;
        info!(
            "Created match: {} between {} and {}",
            game_match.match_id, white_player_id, black_player_id
        );
        Ok(MatchView::from(&game_match))
    }

    /// Creates an invite match with only the creator seated. It stays in
    /// `Waiting` until someone joins.
    pub async fn create_private_match(
        &self,
        player_id: &str,
    ) -> Result<MatchView, MatchServiceError> {
        let game_match = Match::private(player_id);
        self.repository.create_match(&game_match).await?;
        info!(
            "Created private match: {} for {}",
            game_match.match_id, player_id
        );
        Ok(MatchView::from(&game_match))
    }

    /// Seats a second player in a waiting match and starts play. The
    /// joiner takes black; the clock baseline restarts at the join.
    pub async fn join_match(
        &self,
        match_id: &str,
        player_id: &str,
    ) -> Result<MatchView, MatchServiceError> {
        let lock = self.lock_for(match_id).await;
        let _guard = lock.lock().await;

        let mut game_match = self
            .repository
            .get_match(match_id)
            .await?
            .ok_or(MatchServiceError::MatchNotFound)?;

        if game_match.player2_id.is_some() {
            return Err(MatchServiceError::MatchAlreadyFull);
        }
        if game_match.player1_id == player_id {
            return Err(MatchServiceError::CannotJoinOwnMatch);
        }

        game_match.player2_id = Some(player_id.to_string());
        game_match.status = MatchStatus::Ongoing;
        game_match.last_move_at = Utc::now();

        let view = self.persist_and_broadcast(&game_match).await?;
        info!("Player {} joined match: {}", player_id, match_id);
        Ok(view)
    }

    pub async fn get_match(
        &self,
        match_id: &str,
    ) -> Result<Option<MatchView>, MatchServiceError> {
        let game_match = self.repository.get_match(match_id).await?;
        Ok(game_match.as_ref().map(MatchView::from))
    }

    /// Validates and applies one move. On rejection the submitter gets a
    /// private error notification and the match is left untouched; the
    /// match topic only ever sees accepted outcomes.
    pub async fn submit_move(
        &self,
        match_id: &str,
        player_id: &str,
        uci: &str,
    ) -> Result<MatchView, MatchServiceError> {
        let result = self.try_submit_move(match_id, player_id, uci).await;
        if let Err(err) = &result {
            if err.is_rejection() {
                warn!(
                    "Rejected move '{}' from {} on match {}: {}",
                    uci, player_id, match_id, err
                );
                if let Err(notify_err) =
                    self.notifications.send_move_rejection(player_id, err).await
                {
                    error!(
                        "Failed to deliver rejection to {}: {}",
                        player_id, notify_err
                    );
                }
            }
        }
        result
    }

    async fn try_submit_move(
        &self,
        match_id: &str,
        player_id: &str,
        uci: &str,
    ) -> Result<MatchView, MatchServiceError> {
        let lock = self.lock_for(match_id).await;
        let _guard = lock.lock().await;

        let mut game_match = self
            .repository
            .get_match(match_id)
            .await?
            .ok_or(MatchServiceError::MatchNotFound)?;

        if game_match.status != MatchStatus::Ongoing {
            return Err(MatchServiceError::MatchNotActive);
        }
        let player2_id = match game_match.player2_id.clone() {
            Some(id) => id,
            None => return Err(MatchServiceError::MissingOpponent),
        };
        if game_match.turn_player_id != player_id {
            return Err(MatchServiceError::NotYourTurn);
        }

        let uci_move = UciMove::parse(uci)?;

        // The stored position and the turn owner must agree on whose move
        // it is. A mismatch means the aggregate is corrupt, and the move is
        // refused rather than applied to the wrong side.
        let mover_color = if game_match.player1_id == player_id {
            PieceColor::White
        } else {
            PieceColor::Black
        };
        if self.board_service.side_to_move(&game_match.fen)? != mover_color {
            return Err(MatchServiceError::WrongSideToMove);
        }

        let now = Utc::now();
        if self.clock_service.charge(&mut game_match, now) == TimeCharge::Flagged {
            let view = self.persist_and_broadcast(&game_match).await?;
            info!(
                "Match {} ended on time: {} flagged, {:?}",
                match_id, player_id, game_match.status
            );
            return Ok(view);
        }

        game_match.fen = self.board_service.apply_move(&game_match.fen, &uci_move)?;
        game_match.record_move(uci, now);
        game_match.turn_player_id = if game_match.player1_id == player_id {
            player2_id
        } else {
            game_match.player1_id.clone()
        };

        let view = self.persist_and_broadcast(&game_match).await?;
        info!(
            "Applied move {} to match: {} at ply {}",
            uci, match_id, game_match.ply
        );
        Ok(view)
    }

    /// Ends the match in favor of the resigner's opponent.
    pub async fn resign(
        &self,
        match_id: &str,
        player_id: &str,
    ) -> Result<MatchView, MatchServiceError> {
        let lock = self.lock_for(match_id).await;
        let _guard = lock.lock().await;

        let mut game_match = self
            .repository
            .get_match(match_id)
            .await?
            .ok_or(MatchServiceError::MatchNotFound)?;

        if game_match.status != MatchStatus::Ongoing {
            return Err(MatchServiceError::MatchNotActive);
        }
        let resigner_color = match game_match.player_color(player_id) {
            Some(color) => color,
            None => return Err(MatchServiceError::NotAParticipant),
        };

        game_match.status = MatchStatus::win_for(resigner_color.opposite());
        game_match.finished_at = Some(Utc::now());

        let view = self.persist_and_broadcast(&game_match).await?;
        info!(
            "Player {} resigned match: {}, {:?}",
            player_id, match_id, game_match.status
        );
        Ok(view)
    }

    async fn persist_and_broadcast(
        &self,
        game_match: &Match,
    ) -> Result<MatchView, MatchServiceError> {
        self.repository.update_match(game_match).await?;
        let view = MatchView::from(game_match);
        self.notifications.broadcast_match_update(&view).await?;
        Ok(view)
    }
}
