use super::{
    announcer::{Announcement, Announcer, Undeliverable},
    cards::Card,
};
use crate::{
    constants::{NAME_CACHE_CAPACITY, NAME_CACHE_TTL},
    message_utils::{announcement_embed, card_embed},
    retry_strategies::discord_retry_strategy,
};
use ahash::RandomState;
use async_trait::async_trait;
use backon::Retryable;
use moka::future::Cache;
use poise::serenity_prelude::{
    Cache as SerenityCache, ChannelId, CreateMessage, Error as SerenityError, Http, HttpError,
    UserId,
};
use std::sync::Arc;
use tracing::{error, warn};

const fn should_retry_send(err: &SerenityError) -> bool {
    if let SerenityError::Http(HttpError::UnsuccessfulRequest(err)) = err {
        // unknown channel, missing access, missing permissions
        if let 10003 | 50001 | 50013 = err.error.code {
            return false;
        }
    }
    true
}

/// Speaks for the game engine through the Discord HTTP API.
pub struct DiscordAnnouncer {
    cache: Arc<SerenityCache>,
    http: Arc<Http>,
    names: Cache<UserId, String, RandomState>,
}

impl DiscordAnnouncer {
    pub fn new(cache: Arc<SerenityCache>, http: Arc<Http>) -> Self {
        Self {
            cache,
            http,
            names: Cache::builder()
                .max_capacity(NAME_CACHE_CAPACITY)
                .time_to_live(NAME_CACHE_TTL)
                .build_with_hasher(RandomState::new()),
        }
    }
}

#[async_trait]
impl Announcer for DiscordAnnouncer {
    async fn announce(&self, channel: ChannelId, announcement: Announcement) {
        let message = CreateMessage::new().embed(announcement_embed(&announcement));
        let res = (|| channel.send_message((&self.cache, self.http.as_ref()), message.clone()))
            .retry(discord_retry_strategy())
            .when(should_retry_send)
            .await;
        if let Err(err) = res {
            error!(
                "Failed to post Superfight update to channel {}: {}",
                channel, err
            );
        }
    }

    async fn send_private_card(&self, player: UserId, card: &Card) -> Result<(), Undeliverable> {
        player
            .direct_message(
                (&self.cache, self.http.as_ref()),
                CreateMessage::new().embed(card_embed(card)),
            )
            .await
            .map(|_| ())
            .map_err(|err| {
                warn!("Card DM to {} failed: {}", player, err);
                Undeliverable(player)
            })
    }

    async fn display_name(&self, user: UserId) -> String {
        self.names
            .try_get_with(user, async {
                user.to_user((&self.cache, self.http.as_ref()))
                    .await
                    .map(|found| found.global_name.unwrap_or(found.name))
            })
            .await
            .unwrap_or_else(|err| {
                warn!("Failed to look up user {}: {}", user, err);
                user.to_string()
            })
    }
}
