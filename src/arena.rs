//! Match runner.
//!
//! Plays complete matches by asking an [`OrderSource`] for each ship's orders
//! every turn, resolving them and recording the result. Independent matches
//! can be spread across a rayon thread pool.

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::config::Config;
use crate::protocol::{format_orders, parse_orders, RawOrders};
use crate::replay::{MatchEnd, MatchRecord, Outcome, TurnRecord};
use crate::resolve::Resolver;
use crate::world::{
    Orders, ShipId, ShipState, Vec2, WorldState, ALL_MANEUVERS, ALL_MOVEMENTS, ALL_ROTATIONS,
};

/// Tokens a random controller occasionally sends to exercise the fallbacks.
const JUNK_TOKENS: [&str; 3] = ["WARP", "", "full_speed_ahead"];

/// Errors from running a batch of matches.
#[derive(Debug, thiserror::Error)]
pub enum ArenaError {
    #[error("failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Produces orders for one ship each turn.
pub trait OrderSource {
    fn orders(&mut self, ship: ShipId, world: &WorldState, config: &Config) -> RawOrders;
}

/// Replays a fixed list of orders, cycling when it runs out.
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    script: Vec<RawOrders>,
    next: usize,
}

impl ScriptedSource {
    pub fn new(script: Vec<RawOrders>) -> Self {
        ScriptedSource { script, next: 0 }
    }

    /// Issues the same orders every turn.
    pub fn repeating(orders: RawOrders) -> Self {
        ScriptedSource::new(vec![orders])
    }

    pub fn idle() -> Self {
        ScriptedSource::repeating(RawOrders::default())
    }
}

impl OrderSource for ScriptedSource {
    fn orders(&mut self, _ship: ShipId, _world: &WorldState, _config: &Config) -> RawOrders {
        if self.script.is_empty() {
            return RawOrders::default();
        }
        let orders = self.script[self.next % self.script.len()].clone();
        self.next += 1;
        orders
    }
}

/// Picks random tokens from a seeded generator.
#[derive(Debug, Clone)]
pub struct RandomSource {
    rng: SmallRng,
    /// Chance of replacing a token with junk.
    pub junk_rate: f64,
    /// Chance of requesting a launch in a given turn.
    pub launch_rate: f64,
}

impl RandomSource {
    pub fn new(seed: u64) -> Self {
        RandomSource {
            rng: SmallRng::seed_from_u64(seed),
            junk_rate: 0.05,
            launch_rate: 0.2,
        }
    }

    fn token<'a>(&mut self, tokens: &[&'a str]) -> &'a str {
        if self.rng.gen_bool(self.junk_rate) {
            return JUNK_TOKENS.choose(&mut self.rng).copied().unwrap_or_default();
        }
        tokens.choose(&mut self.rng).copied().unwrap_or_default()
    }
}

impl OrderSource for RandomSource {
    fn orders(&mut self, ship: ShipId, world: &WorldState, config: &Config) -> RawOrders {
        let movements: Vec<&str> = ALL_MOVEMENTS.iter().map(|m| m.token()).collect();
        let rotations: Vec<&str> = ALL_ROTATIONS.iter().map(|r| r.token()).collect();
        let movement = self.token(&movements);
        let rotation = self.token(&rotations);

        let weapon = if self.rng.gen_bool(self.launch_rate) {
            "LAUNCH_TORPEDO"
        } else {
            self.token(&["MAINTAIN_CONFIG", "MAINTAIN_CONFIG", "CONFIGURE_WIDE", "CONFIGURE_FOCUSED"])
        };

        let mut raw = RawOrders::new(movement, rotation, weapon);
        let own: Vec<u32> = world.projectiles_owned_by(ship).map(|p| p.id.0).collect();
        for id in own {
            let action = if self.rng.gen_bool(0.25) {
                let delay = self.rng.gen_range(0.0..=config.decision_interval());
                format!("detonate_after:{delay:.1}")
            } else {
                let maneuvers: Vec<&str> = ALL_MANEUVERS.iter().map(|m| m.token()).collect();
                self.token(&maneuvers).to_string()
            };
            raw.torpedo_orders.insert(id.to_string(), action);
        }
        raw
    }
}

/// Which controller to use for both ships in a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Random,
    Idle,
}

impl SourceKind {
    pub fn from_name(name: &str) -> Option<SourceKind> {
        match name.trim().to_ascii_lowercase().as_str() {
            "random" => Some(SourceKind::Random),
            "idle" => Some(SourceKind::Idle),
            _ => None,
        }
    }

    /// Builds a controller for one ship of one match.
    pub fn build(self, match_seed: u64, ship: ShipId) -> Box<dyn OrderSource + Send> {
        match self {
            SourceKind::Random => Box::new(RandomSource::new(
                match_seed.wrapping_mul(2).wrapping_add(ship.index() as u64),
            )),
            SourceKind::Idle => Box::new(ScriptedSource::idle()),
        }
    }
}

/// Settings for a batch of matches.
#[derive(Debug, Clone)]
pub struct MatchSettings {
    pub matches: usize,
    pub max_turns: u32,
    pub seed: u64,
    /// Worker threads; 1 runs the batch on the calling thread.
    pub threads: usize,
    pub source: SourceKind,
    /// Suppress per-match progress logging.
    pub quiet: bool,
}

impl Default for MatchSettings {
    fn default() -> Self {
        MatchSettings {
            matches: 10,
            max_turns: 20,
            seed: 0,
            threads: 4,
            source: SourceKind::Random,
            quiet: false,
        }
    }
}

/// Opening position: ships face each other across the arena's centre line.
pub fn initial_world(config: &Config) -> WorldState {
    let cx = config.arena.width_units / 2.0;
    let cy = config.arena.height_units / 2.0;
    let half = config.arena.spawn_distance_units / 2.0;
    let ship = |x: f64, heading: f64| {
        ShipState::new(
            Vec2::new(x, cy),
            heading,
            config.ship.starting_shields,
            config.ship.starting_energy,
        )
    };
    WorldState::new(ship(cx - half, 0.0), ship(cx + half, std::f64::consts::PI))
}

/// Decides the match if at least one ship is out of shields.
pub fn check_outcome(state: &WorldState) -> Option<Outcome> {
    match (state.ship(ShipId::A).is_destroyed(), state.ship(ShipId::B).is_destroyed()) {
        (true, true) => Some(Outcome::Tie),
        (true, false) => Some(Outcome::Winner(ShipId::B)),
        (false, true) => Some(Outcome::Winner(ShipId::A)),
        (false, false) => None,
    }
}

/// Plays one match from the opening position.
pub fn play_match(
    config: &Config,
    match_id: usize,
    seed: u64,
    max_turns: u32,
    source_a: &mut dyn OrderSource,
    source_b: &mut dyn OrderSource,
) -> MatchRecord {
    let resolver = Resolver::new(config);
    let mut state = initial_world(config);
    let mut turns = Vec::new();
    let mut decided = None;

    while state.turn < max_turns {
        let raw_a = source_a.orders(ShipId::A, &state, config);
        let raw_b = source_b.orders(ShipId::B, &state, config);
        let orders_a: Orders = parse_orders(&raw_a);
        let orders_b: Orders = parse_orders(&raw_b);

        let before = state.clone();
        let (next, events) = resolver.resolve(state, &orders_a, &orders_b);
        turns.push(TurnRecord {
            turn: next.turn,
            state: before,
            orders_a: format_orders(&orders_a),
            orders_b: format_orders(&orders_b),
            events,
        });
        state = next;

        if let Some(outcome) = check_outcome(&state) {
            decided = Some(outcome);
            break;
        }
    }

    let (outcome, end) = match decided {
        Some(outcome) => (outcome, MatchEnd::Destruction),
        None => (Outcome::Tie, MatchEnd::TurnLimit),
    };
    debug!(match_id, turns = state.turn, ?outcome, ?end, "match finished");

    MatchRecord {
        match_id,
        seed,
        outcome,
        end,
        total_turns: state.turn,
        config: config.clone(),
        turns,
        final_state: state,
    }
}

fn play_indexed(config: &Config, settings: &MatchSettings, index: usize) -> MatchRecord {
    let seed = settings.seed.wrapping_add(index as u64);
    let mut source_a = settings.source.build(seed, ShipId::A);
    let mut source_b = settings.source.build(seed, ShipId::B);
    let record = play_match(
        config,
        index,
        seed,
        settings.max_turns,
        source_a.as_mut(),
        source_b.as_mut(),
    );
    if !settings.quiet {
        info!(
            "match {}/{}: {} after {} turns",
            index + 1,
            settings.matches,
            describe(record.outcome, record.end),
            record.total_turns
        );
    }
    record
}

/// Plays a batch of matches. Match `i` uses seed `settings.seed + i`, and
/// results come back in index order however many threads are used.
pub fn run_matches(config: &Config, settings: &MatchSettings) -> Result<Vec<MatchRecord>, ArenaError> {
    if settings.threads <= 1 {
        return Ok((0..settings.matches)
            .map(|i| play_indexed(config, settings, i))
            .collect());
    }

    use rayon::prelude::*;
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(settings.threads)
        .build()?;
    Ok(pool.install(|| {
        (0..settings.matches)
            .into_par_iter()
            .map(|i| play_indexed(config, settings, i))
            .collect()
    }))
}

/// Human-readable result line.
pub fn describe(outcome: Outcome, end: MatchEnd) -> String {
    match (outcome, end) {
        (Outcome::Winner(ship), _) => format!("{ship} wins"),
        (Outcome::Tie, MatchEnd::Destruction) => "mutual destruction".to_string(),
        (Outcome::Tie, MatchEnd::TurnLimit) => "tie on turn limit".to_string(),
    }
}

/// Logs aggregate results for a batch.
pub fn log_summary(records: &[MatchRecord]) {
    let wins_a = records
        .iter()
        .filter(|r| r.outcome == Outcome::Winner(ShipId::A))
        .count();
    let wins_b = records
        .iter()
        .filter(|r| r.outcome == Outcome::Winner(ShipId::B))
        .count();
    let ties = records.len() - wins_a - wins_b;
    let turns: u32 = records.iter().map(|r| r.total_turns).sum();
    let avg_turns = if records.is_empty() {
        0.0
    } else {
        turns as f64 / records.len() as f64
    };
    info!(
        matches = records.len(),
        wins_a,
        wins_b,
        ties,
        avg_turns = %format!("{avg_turns:.1}"),
        "batch summary"
    );
}
