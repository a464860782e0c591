//! Match records and their JSON-lines encoding.
//!
//! A record holds everything needed to replay or audit a match: the config it
//! ran under, the snapshot before every turn, both sides' orders as tokens and
//! every event the resolver emitted.

use std::io::{BufRead, Write};

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::protocol::RawOrders;
use crate::resolve::Event;
use crate::world::{ShipId, WorldState};

/// How a match was decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Winner(ShipId),
    Tie,
}

/// Why a match stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchEnd {
    /// At least one ship reached zero shields.
    Destruction,
    /// The turn limit ran out with both ships alive.
    TurnLimit,
}

/// One resolved turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnRecord {
    pub turn: u32,
    /// Snapshot the orders were issued against.
    pub state: WorldState,
    pub orders_a: RawOrders,
    pub orders_b: RawOrders,
    pub events: Vec<Event>,
}

/// A complete match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub match_id: usize,
    pub seed: u64,
    pub outcome: Outcome,
    pub end: MatchEnd,
    pub total_turns: u32,
    pub config: Config,
    pub turns: Vec<TurnRecord>,
    pub final_state: WorldState,
}

impl MatchRecord {
    /// Number of events of all kinds across the match.
    pub fn event_count(&self) -> usize {
        self.turns.iter().map(|t| t.events.len()).sum()
    }
}

/// Writes records as JSON lines, one match per line.
pub fn write_jsonl<W: Write>(records: &[MatchRecord], out: &mut W) -> std::io::Result<()> {
    for record in records {
        serde_json::to_writer(&mut *out, record)?;
        writeln!(out)?;
    }
    out.flush()
}

/// Reads records written by [`write_jsonl`]. Blank lines are skipped.
pub fn read_jsonl<R: BufRead>(input: R) -> std::io::Result<Vec<MatchRecord>> {
    let mut records = Vec::new();
    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        records.push(serde_json::from_str(&line)?);
    }
    Ok(records)
}
