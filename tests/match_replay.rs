//! Match runner and replay record tests.

use std::fs::File;
use std::io::{BufReader, BufWriter};

use skirmish::arena::{run_matches, MatchSettings, SourceKind};
use skirmish::config::Config;
use skirmish::protocol::parse_orders;
use skirmish::replay::{read_jsonl, write_jsonl, MatchEnd, Outcome};
use skirmish::resolve::resolve_turn;

fn settings(matches: usize, threads: usize) -> MatchSettings {
    MatchSettings {
        matches,
        max_turns: 8,
        seed: 1234,
        threads,
        source: SourceKind::Random,
        quiet: true,
    }
}

#[test]
fn recorded_turns_replay_exactly() {
    let config = Config::default();
    let records = run_matches(&config, &settings(3, 1)).unwrap();

    for record in &records {
        assert_eq!(record.turns.len() as u32, record.total_turns);
        let mut expected_next = None;
        for turn in &record.turns {
            if let Some(prev) = expected_next.take() {
                assert_eq!(turn.state, prev, "snapshot chain broken at turn {}", turn.turn);
            }
            let orders_a = parse_orders(&turn.orders_a);
            let orders_b = parse_orders(&turn.orders_b);
            let (next, events) = resolve_turn(turn.state.clone(), &orders_a, &orders_b, &config);
            assert_eq!(events, turn.events);
            assert_eq!(next.turn, turn.turn);
            expected_next = Some(next);
        }
        assert_eq!(expected_next.as_ref(), Some(&record.final_state));
    }
}

#[test]
fn outcome_matches_final_state() {
    let config = Config::default();
    let records = run_matches(&config, &settings(6, 2)).unwrap();
    for record in &records {
        let a = record.final_state.ships[0].shields;
        let b = record.final_state.ships[1].shields;
        match (record.outcome, record.end) {
            (Outcome::Tie, MatchEnd::TurnLimit) => {
                assert!(a > 0.0 && b > 0.0);
                assert_eq!(record.total_turns, 8);
            }
            (Outcome::Tie, MatchEnd::Destruction) => assert!(a == 0.0 && b == 0.0),
            (Outcome::Winner(ship), MatchEnd::Destruction) => {
                assert!(record.final_state.ship(ship).shields > 0.0);
                assert_eq!(record.final_state.ship(ship.opponent()).shields, 0.0);
            }
            (Outcome::Winner(_), MatchEnd::TurnLimit) => panic!("winner without destruction"),
        }
    }
}

#[test]
fn jsonl_file_round_trip() {
    let config = Config::default();
    let records = run_matches(&config, &settings(2, 1)).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("matches.jsonl");
    {
        let mut writer = BufWriter::new(File::create(&path).unwrap());
        write_jsonl(&records, &mut writer).unwrap();
    }
    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(text.lines().count(), 2);

    let back = read_jsonl(BufReader::new(File::open(&path).unwrap())).unwrap();
    assert_eq!(back, records);
}

#[test]
fn seeds_give_reproducible_batches() {
    let config = Config::default();
    let first = run_matches(&config, &settings(3, 3)).unwrap();
    let second = run_matches(&config, &settings(3, 1)).unwrap();
    assert_eq!(first, second);

    let other = run_matches(&config, &MatchSettings { seed: 99, ..settings(3, 1) }).unwrap();
    assert_ne!(first, other);
}
