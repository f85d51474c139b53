//! Property-based checks of the ledger ordering and chain growth rules.

use proptest::prelude::*;

use picks_engine::{EngineConfig, NumberLedger, OrdinalChain, Phase, StatEngine};

fn draw_strategy(range: u8, slots: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::btree_set(1..=range, slots).prop_map(|set| set.into_iter().collect())
}

proptest! {
    /// Ledger order is non-decreasing in average after every draw, and sorting again changes nothing.
    #[test]
    fn prop_ledger_sorted_and_idempotent(draws in prop::collection::vec(draw_strategy(10, 3), 1..40)) {
        let mut engine = StatEngine::new(EngineConfig {
            range: 10,
            warmup_threshold: 5,
            growth_threshold: 8,
        }).unwrap();
        for draw in &draws {
            engine.process_draw(draw).unwrap();
            let averages: Vec<f64> = engine.ledger().entries().iter().map(|e| e.average).collect();
            prop_assert!(averages.windows(2).all(|w| w[0] <= w[1]), "ordre cassé : {:?}", averages);
        }

        let mut ledger: NumberLedger = engine.ledger().clone();
        let before: Vec<u8> = ledger.entries().iter().map(|e| e.id).collect();
        ledger.sort_by_average();
        let after: Vec<u8> = ledger.entries().iter().map(|e| e.id).collect();
        prop_assert_eq!(before, after);
    }

    /// Every id appears exactly once in the ledger and every rank once per link.
    #[test]
    fn prop_tables_stay_permutations(draws in prop::collection::vec(draw_strategy(12, 4), 1..60)) {
        let mut engine = StatEngine::new(EngineConfig {
            range: 12,
            warmup_threshold: 3,
            growth_threshold: 10,
        }).unwrap();
        engine.ingest(&draws).unwrap();
        engine.correlate();

        let mut ids: Vec<u8> = engine.ledger().entries().iter().map(|e| e.id).collect();
        ids.sort_unstable();
        prop_assert_eq!(ids, (1..=12).collect::<Vec<u8>>());

        for link in engine.chain().links() {
            let mut ranks: Vec<usize> = link.table().entries().iter().map(|e| e.rank).collect();
            ranks.sort_unstable();
            prop_assert_eq!(ranks, (1..=12).collect::<Vec<usize>>());
        }
        prop_assert!(engine.ledger().entries().iter().all(|e| e.cumulative_score.is_finite()));
    }

    /// A link only grows a successor once its own sample count strictly exceeds the threshold.
    #[test]
    fn prop_growth_requires_exceeding_threshold(threshold in 1u64..200, events in 0u64..400) {
        let mut chain = OrdinalChain::new(49, threshold);
        for _ in 0..events {
            chain.record_event(1);
        }
        prop_assert_eq!(chain.len() > 1, events > threshold);
        for (i, link) in chain.links().iter().enumerate() {
            if chain.successor(i).is_some() {
                prop_assert!(link.sample_size() > threshold);
            }
        }
    }

    /// The engine becomes active exactly at draw `threshold + 1`.
    #[test]
    fn prop_activation_point(threshold in 0u64..30, extra in 1u64..20) {
        let mut engine = StatEngine::new(EngineConfig {
            range: 10,
            warmup_threshold: threshold,
            growth_threshold: 500,
        }).unwrap();
        for i in 1..=(threshold + extra) {
            engine.process_draw(&[1, 2, 3]).unwrap();
            let expected = if i > threshold { Phase::Active } else { Phase::Warming };
            prop_assert_eq!(engine.state().phase, expected);
        }
        prop_assert_eq!(engine.state().activated_at, Some(threshold + 1));
    }
}
