//! Property-based tests for the engine, the tokenizer and the symbol table.
//!
//! These tests use proptest to verify properties hold across
//! many randomly generated inputs.

use fsm_relay::core::{State, StateHistory, StateTransition, TransitionKind};
use fsm_relay::engine::{unhandled, Context, Engine, Event, StateMachine, Transition};
use fsm_relay::lexical::CFamily;
use fsm_relay::preprocessor::SymbolTable;
use fsm_relay::tokenizer::{NumericValue, TokenKind, Tokenizer};
use chrono::Utc;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use proptest::prelude::*;
use std::collections::BTreeSet;
use std::convert::Infallible;

static GENERIC: Lazy<Tokenizer> = Lazy::new(|| Tokenizer::new().unwrap());

static C_FAMILY: Lazy<Tokenizer<CFamily>> =
    Lazy::new(|| Tokenizer::builder().grammar(CFamily).build().unwrap());

// A three-state machine with a sparse table, to compare the engine against a
// direct model of the same table.

#[derive(Debug, Clone, Copy, PartialEq)]
enum Stage {
    Low(u8),
    Mid,
    High,
}

#[derive(Debug, Clone, Copy)]
enum Nudge {
    Up,
    Down,
    Bump,
    Noise,
}

impl Event for Nudge {
    fn name(&self) -> &'static str {
        match self {
            Self::Up => "Up",
            Self::Down => "Down",
            Self::Bump => "Bump",
            Self::Noise => "Noise",
        }
    }
}

#[derive(Default)]
struct Counter {
    entered: Mutex<usize>,
    left: Mutex<usize>,
    reentered: Mutex<usize>,
}

fn model(stage: Stage, nudge: Nudge) -> Option<Stage> {
    match (stage, nudge) {
        (Stage::Low(_), Nudge::Up) => Some(Stage::Mid),
        (Stage::Low(n), Nudge::Bump) => Some(Stage::Low(n.wrapping_add(1))),
        (Stage::Mid, Nudge::Up) => Some(Stage::High),
        (Stage::Mid, Nudge::Down) => Some(Stage::Low(0)),
        (Stage::High, Nudge::Down) => Some(Stage::Mid),
        _ => None,
    }
}

impl StateMachine for Counter {
    type State = Stage;
    type Event = Nudge;
    type Error = Infallible;

    fn initial_state(&self) -> Stage {
        Stage::Low(0)
    }

    fn on_event(&self, state: &Stage, event: Nudge) -> Transition<Stage> {
        match model(*state, event) {
            Some(next) => Transition::Next(next),
            None => unhandled::<Self>(state, &event),
        }
    }
}

impl State<Counter> for Stage {
    fn name(&self) -> &'static str {
        match self {
            Self::Low(_) => "Low",
            Self::Mid => "Mid",
            Self::High => "High",
        }
    }

    fn enter(&mut self, cx: &mut Context<'_, Counter>) -> Result<(), Infallible> {
        *cx.machine().entered.lock() += 1;
        Ok(())
    }

    fn leave(&mut self, cx: &mut Context<'_, Counter>) -> Result<(), Infallible> {
        *cx.machine().left.lock() += 1;
        Ok(())
    }

    fn reenter(&mut self, cx: &mut Context<'_, Counter>) -> Result<(), Infallible> {
        *cx.machine().reentered.lock() += 1;
        Ok(())
    }
}

prop_compose! {
    fn arbitrary_nudge()(variant in 0..4u8) -> Nudge {
        match variant {
            0 => Nudge::Up,
            1 => Nudge::Down,
            2 => Nudge::Bump,
            _ => Nudge::Noise,
        }
    }
}

fn token_text() -> impl Strategy<Value = (TokenKind, String)> {
    prop_oneof![
        "[a-z_][a-z0-9_]{0,6}".prop_map(|s| (TokenKind::Symbol, s)),
        "[1-9][0-9]{0,5}".prop_map(|s| (TokenKind::Decimal, s)),
        "[1-9][0-9]{0,3}\\.[0-9]{1,3}".prop_map(|s| (TokenKind::Decimal, s)),
        "0x[0-9a-f]{1,4}".prop_map(|s| (TokenKind::Hex, s)),
        "0b[01]{1,8}".prop_map(|s| (TokenKind::Binary, s)),
        "0[0-7]{1,4}".prop_map(|s| (TokenKind::Octal, s)),
        "\"[a-z0-9]{0,5}\"".prop_map(|s| (TokenKind::String, s)),
        "[-+*/=<>(){};,]".prop_map(|s| (TokenKind::Operator, s)),
    ]
}

fn separator() -> impl Strategy<Value = String> {
    "[ \t\n]{1,3}"
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn tokenizing_preserves_non_whitespace_content(
        parts in prop::collection::vec((token_text(), separator()), 0..12)
    ) {
        let source: String = parts.iter().map(|((_, text), sep)| format!("{text}{sep}")).collect();
        let tokens = GENERIC.tokenize(&source).unwrap();

        let expected: Vec<_> = parts.iter().map(|((kind, text), _)| (*kind, text.clone())).collect();
        let actual: Vec<_> = tokens.iter().map(|t| (t.kind, t.text.clone())).collect();
        prop_assert_eq!(actual, expected);

        let joined: String = tokens.iter().map(|t| t.text.as_str()).collect();
        let stripped: String = source.chars().filter(|c| !c.is_whitespace()).collect();
        prop_assert_eq!(joined, stripped);
    }

    #[test]
    fn c_family_operators_round_trip(
        ops in prop::collection::vec(
            prop::sample::select(vec!["<<", ">>", "==", "!=", "&&", "||", "++", "--", "::", "->", "%", "?"]),
            1..8
        )
    ) {
        let source = ops.join(" ");
        let tokens = C_FAMILY.tokenize(&source).unwrap();
        let joined: String = tokens.iter().map(|t| t.text.as_str()).collect();

        prop_assert_eq!(joined, ops.concat());
        prop_assert!(tokens.iter().all(|t| t.kind == TokenKind::Operator));
    }

    #[test]
    fn literal_values_match_their_base(n in any::<u32>()) {
        let n64 = i64::from(n);
        for (text, kind) in [
            (format!("{n}"), TokenKind::Decimal),
            (format!("{n:#x}"), TokenKind::Hex),
            (format!("{n:#b}"), TokenKind::Binary),
        ] {
            let tokens = GENERIC.tokenize(&text).unwrap();
            prop_assert_eq!(tokens.len(), 1);
            prop_assert_eq!(tokens[0].kind, kind);
            prop_assert_eq!(tokens[0].value(), Some(NumericValue::Integer(n64)));
        }
    }

    #[test]
    fn engine_matches_model_and_hooks_follow_variants(
        nudges in prop::collection::vec(arbitrary_nudge(), 0..40)
    ) {
        let engine = Engine::new(Counter::default()).unwrap();
        let mut stage = Stage::Low(0);
        let (mut changed, mut same) = (0, 0);
        for &nudge in &nudges {
            if let Some(next) = model(stage, nudge) {
                if std::mem::discriminant(&next) == std::mem::discriminant(&stage) {
                    same += 1;
                } else {
                    changed += 1;
                }
                stage = next;
            }
            engine.enqueue(nudge);
        }
        engine.wait_until_queue_empty();

        let machine = engine.machine();
        prop_assert_eq!(engine.state_name(), State::<Counter>::name(&stage));
        prop_assert_eq!(*machine.entered.lock(), changed);
        prop_assert_eq!(*machine.left.lock(), changed);
        prop_assert_eq!(*machine.reentered.lock(), same);
    }

    #[test]
    fn unhandled_events_leave_the_state_alone(noise in 1..20usize, up in any::<bool>()) {
        let engine = Engine::new(Counter::default()).unwrap();
        if up {
            engine.enqueue(Nudge::Up);
            engine.enqueue(Nudge::Up);
        }
        engine.wait_until_queue_empty();
        let before = engine.state_name();

        for _ in 0..noise {
            engine.enqueue(Nudge::Noise);
        }
        engine.wait_until_queue_empty();

        prop_assert_eq!(engine.state_name(), before);
        prop_assert_eq!(*engine.machine().reentered.lock(), 0);
    }

    #[test]
    fn history_never_exceeds_its_limit(limit in 1..16usize, count in 0..64usize) {
        let mut history = StateHistory::with_limit(limit);
        for i in 0..count {
            history.record(StateTransition {
                from: format!("S{i}"),
                to: format!("S{}", i + 1),
                event: "Step".to_string(),
                kind: TransitionKind::Changed,
                timestamp: Utc::now(),
            });
        }

        prop_assert_eq!(history.len(), count.min(limit));
        let path = history.get_path();
        if let Some(last) = path.last() {
            let expected = format!("S{count}");
            prop_assert_eq!(*last, expected.as_str());
        }
    }

    #[test]
    fn symbol_table_behaves_like_a_set(
        ops in prop::collection::vec((any::<bool>(), "[a-c]"), 0..30)
    ) {
        let symbols = SymbolTable::new();
        let mut model = BTreeSet::new();

        for (define, name) in ops {
            if define {
                prop_assert_eq!(symbols.define(&name), model.insert(name.clone()));
            } else {
                prop_assert_eq!(symbols.undef(&name).is_ok(), model.remove(&name));
            }
            prop_assert_eq!(symbols.is_defined(&name), model.contains(&name));
        }
        prop_assert_eq!(symbols.names(), model.into_iter().collect::<Vec<_>>());
    }
}
