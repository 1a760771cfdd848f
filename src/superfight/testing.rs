use super::{
    announcer::{Announcement, Announcer, Undeliverable},
    cards::Card,
};
use ahash::{HashSet, HashSetExt};
use async_trait::async_trait;
use poise::serenity_prelude::{ChannelId, UserId};
use std::sync::Mutex;

/// Announcer that keeps everything it is told, for assertions.
#[derive(Debug, Default)]
pub struct RecordingAnnouncer {
    announcements: Mutex<Vec<(ChannelId, Announcement)>>,
    cards: Mutex<Vec<(UserId, Card)>>,
    closed_dms: Mutex<HashSet<UserId>>,
}

impl RecordingAnnouncer {
    pub fn refusing_dms(users: impl IntoIterator<Item = UserId>) -> Self {
        let mut closed = HashSet::new();
        closed.extend(users);
        Self {
            closed_dms: Mutex::new(closed),
            ..Self::default()
        }
    }

    pub fn announcements(&self) -> Vec<Announcement> {
        self.announcements
            .lock()
            .unwrap()
            .iter()
            .map(|(_, announcement)| announcement.clone())
            .collect()
    }

    pub fn cards(&self) -> Vec<(UserId, Card)> {
        self.cards.lock().unwrap().clone()
    }
}

#[async_trait]
impl Announcer for RecordingAnnouncer {
    async fn announce(&self, channel: ChannelId, announcement: Announcement) {
        self.announcements
            .lock()
            .unwrap()
            .push((channel, announcement));
    }

    async fn send_private_card(&self, player: UserId, card: &Card) -> Result<(), Undeliverable> {
        if self.closed_dms.lock().unwrap().contains(&player) {
            return Err(Undeliverable(player));
        }
        self.cards.lock().unwrap().push((player, card.clone()));
        Ok(())
    }

    async fn display_name(&self, user: UserId) -> String {
        format!("player-{user}")
    }
}
