use super::{cards::Card, GameError};
use crate::constants::{MAX_PLAYERS, MAX_ROUNDS};
use ahash::{HashMap, HashMapExt};
use poise::serenity_prelude::{ChannelId, UserId};
use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    WaitingForPlayers,
    InProgress,
    Voting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Left {
    Player,
    HostCancelled,
}

/// Vote counts for the two contestants of a round and everyone tied for the top.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundOutcome {
    pub counts: [(UserId, usize); 2],
    pub winners: Vec<UserId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchOutcome {
    pub winners: Vec<UserId>,
    pub best: usize,
    pub scoreboard: Vec<(UserId, usize)>,
}

#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub channel: ChannelId,
    pub host: UserId,
    pub players: Vec<UserId>,
    pub state: GameState,
    pub current_round: u32,
    pub max_rounds: u32,
    pub round_winners: Vec<UserId>,
}

#[derive(Debug)]
pub struct GameSession {
    channel: ChannelId,
    host: UserId,
    players: Vec<UserId>,
    state: GameState,
    current_round: u32,
    cards: HashMap<UserId, Card>,
    votes: HashMap<UserId, UserId>,
    round_winners: Vec<UserId>,
}

impl GameSession {
    pub fn new(channel: ChannelId, host: UserId) -> Self {
        Self {
            channel,
            host,
            players: vec![host],
            state: GameState::WaitingForPlayers,
            current_round: 0,
            cards: HashMap::new(),
            votes: HashMap::new(),
            round_winners: Vec::new(),
        }
    }

    pub fn players(&self) -> &[UserId] {
        &self.players
    }
    pub const fn state(&self) -> GameState {
        self.state
    }
    pub fn card(&self, player: UserId) -> Option<&Card> {
        self.cards.get(&player)
    }

    /// Every dealt card, in join order.
    pub fn hands(&self) -> Vec<(UserId, Card)> {
        self.players
            .iter()
            .filter_map(|player| self.cards.get(player).map(|card| (*player, card.clone())))
            .collect()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            channel: self.channel,
            host: self.host,
            players: self.players.clone(),
            state: self.state,
            current_round: self.current_round,
            max_rounds: MAX_ROUNDS,
            round_winners: self.round_winners.clone(),
        }
    }

    pub fn ensure_host(&self, requester: UserId) -> Result<(), GameError> {
        if requester == self.host {
            Ok(())
        } else {
            Err(GameError::NotHost)
        }
    }

    const fn ensure_lobby(&self) -> Result<(), GameError> {
        match self.state {
            GameState::WaitingForPlayers => Ok(()),
            _ => Err(GameError::AlreadyStarted),
        }
    }

    /// Returns the player count after joining.
    pub fn add_player(&mut self, player: UserId) -> Result<usize, GameError> {
        self.ensure_lobby()?;
        if self.players.contains(&player) {
            return Err(GameError::AlreadyJoined);
        }
        if self.players.len() >= MAX_PLAYERS {
            return Err(GameError::Full);
        }
        self.players.push(player);
        Ok(self.players.len())
    }

    pub fn remove_player(&mut self, player: UserId) -> Result<Left, GameError> {
        self.ensure_lobby()?;
        let index = self
            .players
            .iter()
            .position(|id| *id == player)
            .ok_or(GameError::NotJoined)?;
        self.players.remove(index);
        if player == self.host {
            Ok(Left::HostCancelled)
        } else {
            Ok(Left::Player)
        }
    }

    pub fn begin<R: Rng + ?Sized>(&mut self, requester: UserId, rng: &mut R) -> Result<(), GameError> {
        self.ensure_host(requester)?;
        self.ensure_lobby()?;
        if self.players.len() < 2 {
            return Err(GameError::NotEnoughPlayers);
        }
        self.deal_cards(rng);
        self.state = GameState::InProgress;
        self.current_round = 0;
        Ok(())
    }

    fn deal_cards<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for player in &self.players {
            self.cards
                .entry(*player)
                .or_insert_with(|| Card::draw(rng));
        }
    }

    /// Advances the round counter. `None` means the match has run its rounds.
    pub fn next_round(&mut self) -> Option<u32> {
        self.current_round += 1;
        (self.current_round <= MAX_ROUNDS).then_some(self.current_round)
    }

    pub fn contestants(&self) -> Option<(UserId, UserId)> {
        let (first, second) = pair_indices(self.current_round, self.players.len())?;
        Some((self.players[first], self.players[second]))
    }

    pub fn open_voting(&mut self) {
        self.state = GameState::Voting;
        self.votes.clear();
    }

    pub fn cast_vote(&mut self, voter: UserId, target: UserId) -> Result<(), GameError> {
        if self.state != GameState::Voting {
            return Err(GameError::NotVoting);
        }
        if !self.players.contains(&target) {
            return Err(GameError::TargetNotInGame);
        }
        self.votes.insert(voter, target);
        Ok(())
    }

    /// Closes the current voting phase. Returns `None` when no phase is open.
    pub fn resolve_voting(&mut self, contestants: (UserId, UserId)) -> Option<RoundOutcome> {
        if self.state != GameState::Voting {
            return None;
        }
        let outcome = tally(&self.votes, contestants);
        self.round_winners.extend_from_slice(&outcome.winners);
        self.state = GameState::InProgress;
        Some(outcome)
    }

    pub fn match_outcome(&self) -> MatchOutcome {
        let mut wins: HashMap<UserId, usize> = HashMap::new();
        for winner in &self.round_winners {
            *wins.entry(*winner).or_default() += 1;
        }
        let scoreboard = self
            .players
            .iter()
            .map(|player| (*player, wins.get(player).copied().unwrap_or_default()))
            .collect::<Vec<_>>();
        let best = scoreboard.iter().map(|(_, count)| *count).max().unwrap_or_default();
        let winners = if best == 0 {
            Vec::new()
        } else {
            scoreboard
                .iter()
                .filter(|(_, count)| *count == best)
                .map(|(player, _)| *player)
                .collect()
        };
        MatchOutcome {
            winners,
            best,
            scoreboard,
        }
    }
}

/// Round-robin pairing over the join order, nudging the second seat forward when both land on
/// the same player.
pub const fn pair_indices(round: u32, players: usize) -> Option<(usize, usize)> {
    if players < 2 || round == 0 {
        return None;
    }
    let round = round as usize;
    let first = (round * 2 - 2) % players;
    let mut second = (round * 2 - 1) % players;
    if first == second {
        second = (second + 1) % players;
    }
    Some((first, second))
}

pub fn tally(votes: &HashMap<UserId, UserId>, contestants: (UserId, UserId)) -> RoundOutcome {
    let count = |target: UserId| votes.values().filter(|vote| **vote == target).count();
    let counts = [
        (contestants.0, count(contestants.0)),
        (contestants.1, count(contestants.1)),
    ];
    let best = counts[0].1.max(counts[1].1);
    let winners = if best == 0 {
        Vec::new()
    } else {
        counts
            .iter()
            .filter(|(_, count)| *count == best)
            .map(|(player, _)| *player)
            .collect()
    };
    RoundOutcome { counts, winners }
}
