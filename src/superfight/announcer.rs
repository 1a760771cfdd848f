use super::cards::Card;
use async_trait::async_trait;
use poise::serenity_prelude::{ChannelId, UserId};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("could not send a private message to {0}")]
pub struct Undeliverable(pub UserId);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fighter {
    pub id: UserId,
    pub name: String,
    pub card: Option<Card>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Announcement {
    MatchBegins {
        players: usize,
    },
    CardUndeliverable {
        player: UserId,
    },
    RoundStarted {
        round: u32,
        fighters: [Fighter; 2],
    },
    VotingOpened {
        round: u32,
        fighters: [Fighter; 2],
    },
    RoundResults {
        round: u32,
        counts: [(UserId, usize); 2],
        winners: Vec<UserId>,
    },
    MatchResults {
        winners: Vec<UserId>,
        best: usize,
        scoreboard: Vec<(UserId, usize)>,
    },
    NotEnoughPlayers,
}

/// Everything the game engine says to the outside world goes through here.
#[async_trait]
pub trait Announcer: Send + Sync + 'static {
    async fn announce(&self, channel: ChannelId, announcement: Announcement);
    async fn send_private_card(&self, player: UserId, card: &Card) -> Result<(), Undeliverable>;
    async fn display_name(&self, user: UserId) -> String;
}
