use std::time::Duration;

pub const MAX_PLAYERS: usize = 8;
pub const MAX_ROUNDS: u32 = 3;

pub const ARGUMENT_WINDOW: Duration = Duration::from_secs(240);
pub const VOTING_WINDOW: Duration = Duration::from_secs(60);
pub const RESULTS_DELAY: Duration = Duration::from_secs(5);

pub const NAME_CACHE_TTL: Duration = Duration::from_secs(600);
pub const NAME_CACHE_CAPACITY: u64 = 10_000;

pub const SUCCESS_COLOR: u32 = 0x57F287;
pub const FAILURE_COLOR: u32 = 0xED4245;
pub const INFO_COLOR: u32 = 0x3498DB;
pub const GAME_COLOR: u32 = 0xFF9900;
pub const RESULTS_COLOR: u32 = 0xF1C40F;
