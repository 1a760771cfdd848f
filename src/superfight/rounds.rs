use super::{
    announcer::{Announcement, Announcer, Fighter},
    session::RoundOutcome,
    GameRegistry, Slot,
};
use poise::serenity_prelude::{ChannelId, UserId};
use std::sync::Arc;
use tokio::{sync::oneshot, time};
use tracing::{debug, info};

impl<A: Announcer> GameRegistry<A> {
    /// Runs rounds until the match ends or the session is torn down underneath it.
    pub(super) async fn drive_rounds(self: Arc<Self>, channel: ChannelId, slot: Arc<Slot>) {
        loop {
            let Some((round, contestants)) = self.begin_round(channel, &slot).await else {
                return;
            };
            let fighters = self.fighters(&slot, contestants).await;
            self.announcer
                .announce(
                    channel,
                    Announcement::RoundStarted {
                        round,
                        fighters: fighters.clone(),
                    },
                )
                .await;

            time::sleep(self.timings.argument_window).await;
            let Some(end_vote) = Self::open_voting(&slot).await else {
                return;
            };
            debug!("Superfight in channel {} voting on round {}", channel, round);
            self.announcer
                .announce(channel, Announcement::VotingOpened { round, fighters })
                .await;

            tokio::select! {
                () = time::sleep(self.timings.voting_window) => {}
                _ = end_vote => debug!("Superfight in channel {} voting ended early", channel),
            }
            let Some(outcome) = Self::resolve_voting(&slot, contestants).await else {
                return;
            };
            self.announcer
                .announce(
                    channel,
                    Announcement::RoundResults {
                        round,
                        counts: outcome.counts,
                        winners: outcome.winners,
                    },
                )
                .await;
            time::sleep(self.timings.results_delay).await;
        }
    }

    /// Moves to the next round, or wraps up the match when there is none to play.
    async fn begin_round(
        &self,
        channel: ChannelId,
        slot: &Arc<Slot>,
    ) -> Option<(u32, (UserId, UserId))> {
        let mut state = slot.open().await.ok()?;
        let Some(round) = state.game.next_round() else {
            let outcome = state.game.match_outcome();
            // the driver is finishing on its own, so its handle is just dropped
            drop(self.close(channel, slot, &mut state));
            drop(state);
            info!(
                "Superfight in channel {} finished, winners: {:?}",
                channel, outcome.winners
            );
            self.announcer
                .announce(
                    channel,
                    Announcement::MatchResults {
                        winners: outcome.winners,
                        best: outcome.best,
                        scoreboard: outcome.scoreboard,
                    },
                )
                .await;
            return None;
        };
        let Some(contestants) = state.game.contestants() else {
            drop(self.close(channel, slot, &mut state));
            drop(state);
            self.announcer
                .announce(channel, Announcement::NotEnoughPlayers)
                .await;
            return None;
        };
        debug!(
            "Superfight in channel {} round {}: {} vs {}",
            channel, round, contestants.0, contestants.1
        );
        Some((round, contestants))
    }

    async fn fighters(&self, slot: &Slot, contestants: (UserId, UserId)) -> [Fighter; 2] {
        let state = slot.state.lock().await;
        let first = state.game.card(contestants.0).cloned();
        let second = state.game.card(contestants.1).cloned();
        drop(state);
        [
            Fighter {
                id: contestants.0,
                name: self.announcer.display_name(contestants.0).await,
                card: first,
            },
            Fighter {
                id: contestants.1,
                name: self.announcer.display_name(contestants.1).await,
                card: second,
            },
        ]
    }

    async fn open_voting(slot: &Slot) -> Option<oneshot::Receiver<()>> {
        let mut state = slot.open().await.ok()?;
        state.game.open_voting();
        let (sender, receiver) = oneshot::channel();
        state.end_vote = Some(sender);
        Some(receiver)
    }

    /// The only place a voting phase is resolved.
    async fn resolve_voting(slot: &Slot, contestants: (UserId, UserId)) -> Option<RoundOutcome> {
        let mut state = slot.open().await.ok()?;
        state.end_vote = None;
        state.game.resolve_voting(contestants)
    }
}
