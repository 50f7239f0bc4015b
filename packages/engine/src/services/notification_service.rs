use std::sync::Arc;

use serde_json::json;
use tracing::{debug, info};

use crate::models::game_match::MatchView;
use crate::repositories::channel_repository::ChannelRepository;
use crate::repositories::errors::channel_repository_errors::ChannelRepositoryError;
use crate::services::errors::match_service_errors::MatchServiceError;

/// Fans match events out to channels. Every payload is a JSON envelope
/// with an "action" discriminator so clients can route on it.
#[derive(Clone)]
pub struct NotificationService {
    channels: Arc<dyn ChannelRepository>,
}

impl NotificationService {
    pub fn new(channels: Arc<dyn ChannelRepository>) -> Self {
        NotificationService { channels }
    }

    /// Publishes the current state of a match on its topic. Both players
    /// and any spectators see the same payload.
    pub async fn broadcast_match_update(
        &self,
        view: &MatchView,
    ) -> Result<(), ChannelRepositoryError> {
        let payload = json!({
            "action": "match_update",
            "match": view,
        });
        debug!("Broadcasting update for match: {}", view.match_id);
        self.channels
            .broadcast_to_match(&view.match_id, &payload.to_string())
            .await
    }

    /// Tells each seated player directly that their match exists. Used at
    /// pairing time, before anyone has had a chance to subscribe to the
    /// match topic.
    pub async fn notify_match_found(
        &self,
        view: &MatchView,
    ) -> Result<(), ChannelRepositoryError> {
        let payload = json!({
            "action": "match_found",
            "match": view,
        })
        .to_string();

        self.channels.send_to_player(&view.player1_id, &payload).await?;
        if let Some(player2_id) = &view.player2_id {
            self.channels.send_to_player(player2_id, &payload).await?;
        }
        info!(
            "Notified players of match: {} between {} and {}",
            view.match_id,
            view.player1_id,
            view.player2_id.as_deref().unwrap_or("(open seat)")
        );
        Ok(())
    }

    /// Delivers a rejection to the player whose request was turned down.
    /// Rejections are private, the match topic never sees them.
    pub async fn send_move_rejection(
        &self,
        player_id: &str,
        error: &MatchServiceError,
    ) -> Result<(), ChannelRepositoryError> {
        let payload = json!({
            "action": "error",
            "message": error.to_string(),
            "timestamp": chrono::Utc::now().to_rfc3339(),
        });
        self.channels
            .send_to_player(player_id, &payload.to_string())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::game_match::{GameType, Match};
    use crate::repositories::channel_repository::InMemoryChannelRepository;
    use serde_json::Value;

    fn service_with_channels() -> (NotificationService, Arc<InMemoryChannelRepository>) {
        let channels = Arc::new(InMemoryChannelRepository::new());
        let notifications = NotificationService::new(channels.clone());
        (notifications, channels)
    }

    #[tokio::test]
    async fn test_match_update_reaches_every_subscriber() {
        let (notifications, channels) = service_with_channels();
        let game_match = Match::paired("alice", "bob", GameType::Blitz);
        let view = MatchView::from(&game_match);
        let mut player_feed = channels.subscribe_to_match(&game_match.match_id).await;
        let mut spectator_feed = channels.subscribe_to_match(&game_match.match_id).await;

        notifications.broadcast_match_update(&view).await.unwrap();

        for feed in [&mut player_feed, &mut spectator_feed] {
            let message: Value = serde_json::from_str(&feed.recv().await.unwrap()).unwrap();
            assert_eq!(message["action"], "match_update");
            assert_eq!(message["match"]["match_id"], game_match.match_id.as_str());
            assert_eq!(message["match"]["fen"], game_match.fen.as_str());
        }
    }

    #[tokio::test]
    async fn test_match_found_goes_to_both_players() {
        let (notifications, channels) = service_with_channels();
        let mut alice_feed = channels.register_player("alice").await;
        let mut bob_feed = channels.register_player("bob").await;
        let game_match = Match::paired("alice", "bob", GameType::Rapid);

        notifications
            .notify_match_found(&MatchView::from(&game_match))
            .await
            .unwrap();

        for feed in [&mut alice_feed, &mut bob_feed] {
            let message: Value = serde_json::from_str(&feed.recv().await.unwrap()).unwrap();
            assert_eq!(message["action"], "match_found");
            assert_eq!(message["match"]["player1_id"], "alice");
            assert_eq!(message["match"]["player2_id"], "bob");
        }
    }

    #[tokio::test]
    async fn test_match_found_tolerates_an_open_seat() {
        let (notifications, channels) = service_with_channels();
        let mut alice_feed = channels.register_player("alice").await;
        let game_match = Match::private("alice");

        notifications
            .notify_match_found(&MatchView::from(&game_match))
            .await
            .unwrap();

        let message: Value = serde_json::from_str(&alice_feed.recv().await.unwrap()).unwrap();
        assert_eq!(message["action"], "match_found");
        assert!(message["match"]["player2_id"].is_null());
    }

    #[tokio::test]
    async fn test_rejection_is_private_to_the_submitter() {
        let (notifications, channels) = service_with_channels();
        let mut alice_feed = channels.register_player("alice").await;
        let mut bob_feed = channels.register_player("bob").await;

        notifications
            .send_move_rejection("bob", &MatchServiceError::NotYourTurn)
            .await
            .unwrap();

        let message: Value = serde_json::from_str(&bob_feed.recv().await.unwrap()).unwrap();
        assert_eq!(message["action"], "error");
        assert_eq!(message["message"], "Not your turn");
        assert!(message["timestamp"].is_string());
        assert!(alice_feed.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_notifying_unconnected_players_is_not_an_error() {
        let (notifications, _channels) = service_with_channels();
        let game_match = Match::paired("alice", "bob", GameType::Blitz);

        notifications
            .notify_match_found(&MatchView::from(&game_match))
            .await
            .unwrap();
        notifications
            .send_move_rejection("alice", &MatchServiceError::MatchNotFound)
            .await
            .unwrap();
    }
}
