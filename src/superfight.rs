use crate::{
    commands::CommandError,
    constants::{ARGUMENT_WINDOW, RESULTS_DELAY, VOTING_WINDOW},
};
use ahash::RandomState;
use dashmap::{mapref::entry::Entry, DashMap};
use poise::serenity_prelude::{ChannelId, UserId};
use rand::{rngs::StdRng, SeedableRng};
use std::{
    sync::{Arc, Mutex},
    time::Duration,
};
use thiserror::Error;
use tokio::{
    sync::{oneshot, Mutex as AsyncMutex, MutexGuard},
    task::JoinHandle,
};
use tracing::{info, warn};

pub mod announcer;
pub mod cards;
pub mod discord;
mod rounds;
pub mod session;
#[cfg(test)]
pub mod testing;

use announcer::{Announcement, Announcer};
use session::{GameSession, GameState, Left, SessionSnapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("A game is already in progress in this channel!")]
    AlreadyActive,
    #[error("No Superfight game is active in this channel. Start one with `/superfight new`!")]
    NoSession,
    #[error("This game has already started. Wait for the next one!")]
    AlreadyStarted,
    #[error("You're already in this game!")]
    AlreadyJoined,
    #[error("The game is full!")]
    Full,
    #[error("You're not in this game!")]
    NotJoined,
    #[error("Only the host can do that!")]
    NotHost,
    #[error("You need at least 2 players to start a game!")]
    NotEnoughPlayers,
    #[error("Voting is not active right now!")]
    NotVoting,
    #[error("That player is not in this game!")]
    TargetNotInGame,
}

impl From<GameError> for CommandError {
    fn from(value: GameError) -> Self {
        Self::Expected(value.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundTimings {
    pub argument_window: Duration,
    pub voting_window: Duration,
    pub results_delay: Duration,
}

impl Default for RoundTimings {
    fn default() -> Self {
        Self {
            argument_window: ARGUMENT_WINDOW,
            voting_window: VOTING_WINDOW,
            results_delay: RESULTS_DELAY,
        }
    }
}

#[derive(Debug)]
struct SlotState {
    game: GameSession,
    closed: bool,
    driver: Option<JoinHandle<()>>,
    end_vote: Option<oneshot::Sender<()>>,
}

#[derive(Debug)]
struct Slot {
    state: AsyncMutex<SlotState>,
}

impl Slot {
    fn new(game: GameSession) -> Self {
        Self {
            state: AsyncMutex::new(SlotState {
                game,
                closed: false,
                driver: None,
                end_vote: None,
            }),
        }
    }

    /// Locks the session, treating an already torn down one as missing.
    async fn open(&self) -> Result<MutexGuard<'_, SlotState>, GameError> {
        let state = self.state.lock().await;
        if state.closed {
            Err(GameError::NoSession)
        } else {
            Ok(state)
        }
    }
}

/// All running Superfight games, one per channel.
pub struct GameRegistry<A> {
    sessions: DashMap<ChannelId, Arc<Slot>, RandomState>,
    announcer: Arc<A>,
    timings: RoundTimings,
    rng: Mutex<StdRng>,
}

impl<A: Announcer> GameRegistry<A> {
    pub fn new(announcer: A, timings: RoundTimings) -> Self {
        Self::with_rng(announcer, timings, StdRng::from_os_rng())
    }

    pub fn with_seed(announcer: A, timings: RoundTimings, seed: u64) -> Self {
        Self::with_rng(announcer, timings, StdRng::seed_from_u64(seed))
    }

    fn with_rng(announcer: A, timings: RoundTimings, rng: StdRng) -> Self {
        Self {
            sessions: DashMap::default(),
            announcer: Arc::new(announcer),
            timings,
            rng: Mutex::new(rng),
        }
    }

    #[cfg(test)]
    pub fn announcer(&self) -> &A {
        &self.announcer
    }

    pub fn active_sessions(&self) -> usize {
        self.sessions.len()
    }

    #[cfg(test)]
    pub fn is_active(&self, channel: ChannelId) -> bool {
        self.sessions.contains_key(&channel)
    }

    fn slot(&self, channel: ChannelId) -> Result<Arc<Slot>, GameError> {
        self.sessions
            .get(&channel)
            .map(|slot| Arc::clone(slot.value()))
            .ok_or(GameError::NoSession)
    }

    /// Marks the session closed and unregisters it. The caller decides what to do with the
    /// round driver handle.
    fn close(&self, channel: ChannelId, slot: &Arc<Slot>, state: &mut SlotState) -> Option<JoinHandle<()>> {
        state.closed = true;
        state.end_vote = None;
        self.sessions
            .remove_if(&channel, |_, registered| Arc::ptr_eq(registered, slot));
        info!(
            "Superfight in channel {} closed ({} active)",
            channel,
            self.sessions.len()
        );
        state.driver.take()
    }

    fn close_and_abort(&self, channel: ChannelId, slot: &Arc<Slot>, state: &mut SlotState) {
        if let Some(driver) = self.close(channel, slot, state) {
            driver.abort();
        }
    }

    pub fn create_session(&self, channel: ChannelId, host: UserId) -> Result<(), GameError> {
        match self.sessions.entry(channel) {
            Entry::Occupied(_) => Err(GameError::AlreadyActive),
            Entry::Vacant(entry) => {
                entry.insert(Arc::new(Slot::new(GameSession::new(channel, host))));
                info!(
                    "Superfight lobby opened in channel {} by {} ({} active)",
                    channel,
                    host,
                    self.active_sessions()
                );
                Ok(())
            }
        }
    }

    /// Returns the player count after joining.
    pub async fn join_session(&self, channel: ChannelId, player: UserId) -> Result<usize, GameError> {
        let slot = self.slot(channel)?;
        let mut state = slot.open().await?;
        state.game.add_player(player)
    }

    pub async fn leave_session(&self, channel: ChannelId, player: UserId) -> Result<Left, GameError> {
        let slot = self.slot(channel)?;
        let mut state = slot.open().await?;
        let left = state.game.remove_player(player)?;
        if left == Left::HostCancelled {
            self.close_and_abort(channel, &slot, &mut state);
        }
        Ok(left)
    }

    pub async fn cast_vote(
        &self,
        channel: ChannelId,
        voter: UserId,
        target: UserId,
    ) -> Result<(), GameError> {
        let slot = self.slot(channel)?;
        let mut state = slot.open().await?;
        state.game.cast_vote(voter, target)
    }

    /// Cuts the voting window short. The round driver performs the resolution, so calling this
    /// again before it does is harmless.
    pub async fn end_voting_early(&self, channel: ChannelId, requester: UserId) -> Result<(), GameError> {
        let slot = self.slot(channel)?;
        let mut state = slot.open().await?;
        state.game.ensure_host(requester)?;
        if state.game.state() != GameState::Voting {
            return Err(GameError::NotVoting);
        }
        if let Some(end_vote) = state.end_vote.take() {
            // the driver may already be past its select
            let _ = end_vote.send(());
        }
        Ok(())
    }

    pub async fn cancel_session(&self, channel: ChannelId, requester: UserId) -> Result<(), GameError> {
        let slot = self.slot(channel)?;
        let mut state = slot.open().await?;
        state.game.ensure_host(requester)?;
        self.close_and_abort(channel, &slot, &mut state);
        Ok(())
    }

    pub async fn snapshot(&self, channel: ChannelId) -> Result<SessionSnapshot, GameError> {
        let slot = self.slot(channel)?;
        let state = slot.open().await?;
        Ok(state.game.snapshot())
    }

    /// Deals the cards, hands them out privately and sets the round driver going.
    pub async fn start_session(
        self: &Arc<Self>,
        channel: ChannelId,
        requester: UserId,
    ) -> Result<(), GameError> {
        let slot = self.slot(channel)?;
        let mut state = slot.open().await?;
        {
            let mut rng = self.rng.lock().unwrap();
            state.game.begin(requester, &mut *rng)?;
        }
        let hands = state.game.hands();
        drop(state);
        info!(
            "Superfight in channel {} started with {} players",
            channel,
            hands.len()
        );
        self.announcer
            .announce(channel, Announcement::MatchBegins { players: hands.len() })
            .await;
        for (player, card) in &hands {
            if let Err(err) = self.announcer.send_private_card(*player, card).await {
                warn!("{}", err);
                self.announcer
                    .announce(channel, Announcement::CardUndeliverable { player: *player })
                    .await;
            }
        }
        let mut state = slot.state.lock().await;
        if !state.closed {
            state.driver = Some(tokio::spawn(
                Arc::clone(self).drive_rounds(channel, Arc::clone(&slot)),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{
        announcer::Announcement,
        session::{GameState, Left},
        testing::RecordingAnnouncer,
        GameError, GameRegistry, RoundTimings,
    };
    use poise::serenity_prelude::{ChannelId, UserId};
    use std::{sync::Arc, time::Duration};
    use tokio::time;

    const CHANNEL: ChannelId = ChannelId::new(100);
    const HOST: UserId = UserId::new(1);
    const GUEST: UserId = UserId::new(2);

    fn registry(announcer: RecordingAnnouncer) -> Arc<GameRegistry<RecordingAnnouncer>> {
        Arc::new(GameRegistry::with_seed(
            announcer,
            RoundTimings::default(),
            11,
        ))
    }

    async fn two_player_game() -> Arc<GameRegistry<RecordingAnnouncer>> {
        let games = registry(RecordingAnnouncer::default());
        games.create_session(CHANNEL, HOST).unwrap();
        games.join_session(CHANNEL, GUEST).await.unwrap();
        games.start_session(CHANNEL, HOST).await.unwrap();
        games
    }

    async fn advance(secs: u64) {
        time::sleep(Duration::from_secs(secs)).await;
    }

    fn round_results(games: &GameRegistry<RecordingAnnouncer>) -> Vec<Vec<UserId>> {
        games
            .announcer()
            .announcements()
            .into_iter()
            .filter_map(|announcement| match announcement {
                Announcement::RoundResults { winners, .. } => Some(winners),
                _ => None,
            })
            .collect()
    }

    #[tokio::test]
    async fn one_session_per_channel() {
        let games = registry(RecordingAnnouncer::default());
        assert_eq!(games.create_session(CHANNEL, HOST), Ok(()));
        assert_eq!(
            games.create_session(CHANNEL, GUEST),
            Err(GameError::AlreadyActive)
        );
        assert_eq!(games.create_session(ChannelId::new(101), GUEST), Ok(()));
        assert_eq!(games.active_sessions(), 2);
    }

    #[test]
    fn concurrent_creates_register_once() {
        let games = registry(RecordingAnnouncer::default());
        let created = std::thread::scope(|scope| {
            let handles = (1..=8)
                .map(|id| {
                    let games = &games;
                    scope.spawn(move || games.create_session(CHANNEL, UserId::new(id)).is_ok())
                })
                .collect::<Vec<_>>();
            handles
                .into_iter()
                .map(|handle| handle.join().unwrap())
                .filter(|created| *created)
                .count()
        });
        assert_eq!(created, 1);
        assert_eq!(games.active_sessions(), 1);
    }

    #[tokio::test]
    async fn operations_without_session() {
        let games = registry(RecordingAnnouncer::default());
        assert_eq!(games.join_session(CHANNEL, HOST).await, Err(GameError::NoSession));
        assert_eq!(games.leave_session(CHANNEL, HOST).await, Err(GameError::NoSession));
        assert_eq!(games.start_session(CHANNEL, HOST).await, Err(GameError::NoSession));
        assert_eq!(
            games.cast_vote(CHANNEL, HOST, GUEST).await,
            Err(GameError::NoSession)
        );
        assert_eq!(
            games.end_voting_early(CHANNEL, HOST).await,
            Err(GameError::NoSession)
        );
        assert_eq!(games.cancel_session(CHANNEL, HOST).await, Err(GameError::NoSession));
        assert!(games.snapshot(CHANNEL).await.is_err());
    }

    #[tokio::test]
    async fn host_leaving_lobby_cancels_it() {
        let games = registry(RecordingAnnouncer::default());
        games.create_session(CHANNEL, HOST).unwrap();
        games.join_session(CHANNEL, GUEST).await.unwrap();
        assert_eq!(games.leave_session(CHANNEL, GUEST).await, Ok(Left::Player));
        assert_eq!(games.join_session(CHANNEL, GUEST).await, Ok(2));
        assert_eq!(
            games.leave_session(CHANNEL, HOST).await,
            Ok(Left::HostCancelled)
        );
        assert!(!games.is_active(CHANNEL));
        assert_eq!(games.join_session(CHANNEL, GUEST).await, Err(GameError::NoSession));
    }

    #[tokio::test(start_paused = true)]
    async fn start_needs_two_players_and_the_host() {
        let games = registry(RecordingAnnouncer::default());
        games.create_session(CHANNEL, HOST).unwrap();
        assert_eq!(
            games.start_session(CHANNEL, HOST).await,
            Err(GameError::NotEnoughPlayers)
        );
        games.join_session(CHANNEL, GUEST).await.unwrap();
        assert_eq!(games.start_session(CHANNEL, GUEST).await, Err(GameError::NotHost));
        assert_eq!(games.start_session(CHANNEL, HOST).await, Ok(()));
        assert_eq!(
            games.start_session(CHANNEL, HOST).await,
            Err(GameError::AlreadyStarted)
        );
        let cards = games.announcer().cards();
        assert_eq!(cards.len(), 2);
        assert!(cards
            .iter()
            .all(|(_, card)| card.attributes[0] != card.attributes[1]));
    }

    #[tokio::test(start_paused = true)]
    async fn full_match() {
        let games = two_player_game().await;
        assert_eq!(
            games.cast_vote(CHANNEL, GUEST, HOST).await,
            Err(GameError::NotVoting)
        );

        advance(241).await;
        assert_eq!(games.snapshot(CHANNEL).await.unwrap().state, GameState::Voting);
        assert_eq!(games.cast_vote(CHANNEL, GUEST, HOST).await, Ok(()));
        assert_eq!(
            games.end_voting_early(CHANNEL, GUEST).await,
            Err(GameError::NotHost)
        );
        assert_eq!(games.end_voting_early(CHANNEL, HOST).await, Ok(()));

        advance(1).await;
        let snapshot = games.snapshot(CHANNEL).await.unwrap();
        assert_eq!(snapshot.round_winners, vec![HOST]);
        assert_eq!(snapshot.state, GameState::InProgress);

        advance(1_000).await;
        assert!(!games.is_active(CHANNEL));
        assert_eq!(games.join_session(CHANNEL, GUEST).await, Err(GameError::NoSession));
        assert_eq!(games.create_session(CHANNEL, GUEST), Ok(()));

        assert_eq!(round_results(&games), vec![vec![HOST], vec![], vec![]]);
        let announcements = games.announcer().announcements();
        assert_eq!(
            announcements.first(),
            Some(&Announcement::MatchBegins { players: 2 })
        );
        assert_eq!(
            announcements.last(),
            Some(&Announcement::MatchResults {
                winners: vec![HOST],
                best: 1,
                scoreboard: vec![(HOST, 1), (GUEST, 0)],
            })
        );
    }

    #[tokio::test(start_paused = true)]
    async fn rounds_announce_both_fighters() {
        let games = two_player_game().await;
        advance(1).await;
        let announcements = games.announcer().announcements();
        let Some(Announcement::RoundStarted { round, fighters }) = announcements.get(1) else {
            panic!("expected a round start, got {announcements:?}");
        };
        assert_eq!(*round, 1);
        assert_eq!(fighters[0].id, HOST);
        assert_eq!(fighters[1].id, GUEST);
        assert_eq!(fighters[1].name, "player-2");
        assert!(fighters.iter().all(|fighter| fighter.card.is_some()));
    }

    #[tokio::test(start_paused = true)]
    async fn voting_window_expires_on_its_own() {
        let games = two_player_game().await;
        advance(241).await;
        games.cast_vote(CHANNEL, UserId::new(50), GUEST).await.unwrap();
        games.cast_vote(CHANNEL, UserId::new(51), HOST).await.unwrap();
        advance(60).await;
        assert_eq!(round_results(&games), vec![vec![HOST, GUEST]]);

        assert_eq!(
            games.end_voting_early(CHANNEL, HOST).await,
            Err(GameError::NotVoting)
        );
        advance(1).await;
        assert_eq!(
            games.snapshot(CHANNEL).await.unwrap().round_winners,
            vec![HOST, GUEST]
        );
        assert_eq!(round_results(&games).len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn repeated_early_end_resolves_once() {
        let games = two_player_game().await;
        advance(241).await;
        games.cast_vote(CHANNEL, GUEST, GUEST).await.unwrap();
        assert_eq!(games.end_voting_early(CHANNEL, HOST).await, Ok(()));
        assert_eq!(games.end_voting_early(CHANNEL, HOST).await, Ok(()));
        advance(1).await;
        assert_eq!(round_results(&games), vec![vec![GUEST]]);
        assert_eq!(
            games.snapshot(CHANNEL).await.unwrap().round_winners,
            vec![GUEST]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_game_stays_quiet() {
        let games = two_player_game().await;
        advance(10).await;
        assert_eq!(games.cancel_session(CHANNEL, GUEST).await, Err(GameError::NotHost));
        assert_eq!(games.cancel_session(CHANNEL, HOST).await, Ok(()));
        let said = games.announcer().announcements().len();

        games.create_session(CHANNEL, GUEST).unwrap();
        advance(2_000).await;
        assert_eq!(games.announcer().announcements().len(), said);
        let snapshot = games.snapshot(CHANNEL).await.unwrap();
        assert_eq!(snapshot.host, GUEST);
        assert_eq!(snapshot.state, GameState::WaitingForPlayers);
    }

    #[tokio::test(start_paused = true)]
    async fn closed_dms_are_reported_not_fatal() {
        let games = registry(RecordingAnnouncer::refusing_dms([GUEST]));
        games.create_session(CHANNEL, HOST).unwrap();
        games.join_session(CHANNEL, GUEST).await.unwrap();
        games.start_session(CHANNEL, HOST).await.unwrap();
        advance(1).await;

        let cards = games.announcer().cards();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].0, HOST);
        let announcements = games.announcer().announcements();
        assert!(announcements.contains(&Announcement::CardUndeliverable { player: GUEST }));
        assert!(announcements
            .iter()
            .any(|announcement| matches!(announcement, Announcement::RoundStarted { .. })));
    }
}
