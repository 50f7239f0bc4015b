use std::sync::Arc;

use tracing::{debug, info};

use crate::models::game_match::{GameType, MatchView};
use crate::models::queue::{MatchQueues, QueueOutcome};
use crate::services::errors::match_service_errors::MatchServiceError;
use crate::services::match_service::MatchService;
use crate::services::notification_service::NotificationService;

/// Pairs players who ask for a game, strictly first come first served
/// within each game type.
#[derive(Clone)]
pub struct MatchmakingService {
    queues: Arc<MatchQueues>,
    match_service: MatchService,
    notifications: NotificationService,
}

impl MatchmakingService {
    pub fn new(
        queues: Arc<MatchQueues>,
        match_service: MatchService,
        notifications: NotificationService,
    ) -> Self {
        MatchmakingService {
            queues,
            match_service,
            notifications,
        }
    }

    /// Asks for a match. If someone is already waiting for this game type
    /// the two are paired immediately, the earlier arrival taking white,
    /// and both players are told directly. Otherwise the requester waits
    /// and `None` is returned; asking again while waiting changes nothing.
    pub async fn enqueue_or_pair(
        &self,
        player_id: &str,
        game_type: GameType,
    ) -> Result<Option<MatchView>, MatchServiceError> {
        match self.queues.pair_or_enqueue(game_type, player_id).await {
            QueueOutcome::AlreadyQueued => {
                debug!(
                    "Player {} is already waiting in the {:?} queue",
                    player_id, game_type
                );
                Ok(None)
            }
            QueueOutcome::Enqueued => {
                info!("Player {} waiting for a {:?} opponent", player_id, game_type);
                Ok(None)
            }
            QueueOutcome::Paired(opponent) => {
                let view = self
                    .match_service
                    .create_paired_match(&opponent.player_id, player_id, game_type)
                    .await?;
                self.notifications.notify_match_found(&view).await?;
                info!(
                    "Paired {} with {} in match: {}",
                    opponent.player_id, player_id, view.match_id
                );
                Ok(Some(view))
            }
        }
    }

    /// Withdraws a waiting player. Returns whether they were in the queue.
    pub async fn leave_queue(&self, player_id: &str, game_type: GameType) -> bool {
        let removed = self.queues.remove(game_type, player_id).await;
        if removed {
            info!("Player {} left the {:?} queue", player_id, game_type);
        }
        removed
    }
}
