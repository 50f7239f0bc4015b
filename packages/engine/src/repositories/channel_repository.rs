use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::{broadcast, mpsc, Mutex};
use tracing::{debug, info};

use crate::repositories::errors::channel_repository_errors::ChannelRepositoryError;

/// Buffered messages retained per match topic for slow subscribers.
const MATCH_TOPIC_CAPACITY: usize = 64;

/// Delivery seam for notifications. One topic per match that anyone may
/// subscribe to, plus one private channel per connected player.
///
/// Delivery is fire-and-forget: sending to a match with no subscribers or
/// to a player who is not connected is not an error.
#[async_trait]
pub trait ChannelRepository: Send + Sync {
    async fn broadcast_to_match(
        &self,
        match_id: &str,
        message: &str,
    ) -> Result<(), ChannelRepositoryError>;

    async fn send_to_player(
        &self,
        player_id: &str,
        message: &str,
    ) -> Result<(), ChannelRepositoryError>;
}

/// Process-local channels, used as the reference implementation and in
/// tests. Match topics are tokio broadcast channels, player channels are
/// unbounded mpsc queues.
#[derive(Debug, Default)]
pub struct InMemoryChannelRepository {
    match_topics: Mutex<HashMap<String, broadcast::Sender<String>>>,
    player_channels: Mutex<HashMap<String, mpsc::UnboundedSender<String>>>,
}

impl InMemoryChannelRepository {
    pub fn new() -> Self {
        InMemoryChannelRepository::default()
    }

    /// Subscribes to a match topic, creating the topic on first use.
    /// Spectators and both players go through the same path.
    pub async fn subscribe_to_match(&self, match_id: &str) -> broadcast::Receiver<String> {
        let mut topics = self.match_topics.lock().await;
        topics
            .entry(match_id.to_string())
            .or_insert_with(|| broadcast::channel(MATCH_TOPIC_CAPACITY).0)
            .subscribe()
    }

    /// Opens the player's private channel. Registering again replaces any
    /// previous channel, which models a reconnect.
    pub async fn register_player(&self, player_id: &str) -> mpsc::UnboundedReceiver<String> {
        let (sender, receiver) = mpsc::unbounded_channel();
        let mut channels = self.player_channels.lock().await;
        channels.insert(player_id.to_string(), sender);
        receiver
    }
}

#[async_trait]
impl ChannelRepository for InMemoryChannelRepository {
    async fn broadcast_to_match(
        &self,
        match_id: &str,
        message: &str,
    ) -> Result<(), ChannelRepositoryError> {
        let topics = self.match_topics.lock().await;
        match topics.get(match_id) {
            Some(sender) => {
                if sender.send(message.to_string()).is_err() {
                    debug!("No live subscribers on match topic: {}", match_id);
                }
            }
            None => debug!("No topic open for match: {}, dropping broadcast", match_id),
        }
        Ok(())
    }

    async fn send_to_player(
        &self,
        player_id: &str,
        message: &str,
    ) -> Result<(), ChannelRepositoryError> {
        let mut channels = self.player_channels.lock().await;
        match channels.get(player_id) {
            Some(sender) => {
                if sender.send(message.to_string()).is_err() {
                    // Receiver dropped without re-registering.
                    channels.remove(player_id);
                    debug!("Dropped stale channel for player: {}", player_id);
                }
            }
            None => info!("No channel open for player: {}, skipping message", player_id),
        }
        Ok(())
    }
}
