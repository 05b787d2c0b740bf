//! Property tests for normalization and fallback invariants.
//!
//! Uses proptest to verify:
//! 1. Fallback completeness: any mix of source outcomes yields one non-empty table
//! 2. Exact-match idempotence: column order and extra columns never change values
//! 3. Reshape determinism: Close = Price and the fixed placeholder derivations
//! 4. Reshape failure: no "date" in any column name always fails

use proptest::prelude::*;
use std::time::Duration;
use tsfetch_core::data::{
    sample_table, Fetcher, Normalizer, RawColumn, RawTable, SchemaError, SourceError, SourceList,
    Strategy as NormalizeStrategy, Tier,
};
use tsfetch_core::Pipeline;

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_price() -> impl Strategy<Value = f64> {
    (1.0..5000.0_f64).prop_map(|p| (p * 100.0).round() / 100.0)
}

fn arb_prices() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(arb_price(), 1..20)
}

/// Column names that never contain "date" in any casing.
fn arb_plain_name() -> impl Strategy<Value = String> {
    "[A-Za-z]{1,8}".prop_filter("must not contain date", |s| {
        !s.to_lowercase().contains("date")
    })
}

#[derive(Debug, Clone)]
enum Outcome {
    Timeout,
    Transport,
    Malformed,
    NoDate,
    Canonical,
    Reshapeable,
}

fn arb_outcome() -> impl Strategy<Value = Outcome> {
    prop_oneof![
        Just(Outcome::Timeout),
        Just(Outcome::Transport),
        Just(Outcome::Malformed),
        Just(Outcome::NoDate),
        Just(Outcome::Canonical),
        Just(Outcome::Reshapeable),
    ]
}

impl Outcome {
    fn response(&self, timeout: Duration) -> Result<String, SourceError> {
        match self {
            Outcome::Timeout => Err(SourceError::Timeout { timeout }),
            Outcome::Transport => Err(SourceError::Transport("connection reset".into())),
            Outcome::Malformed => Ok("a,b\n1,2,3\n".into()),
            Outcome::NoDate => Ok("Symbol,Price\nX,1\n".into()),
            Outcome::Canonical => Ok("Date,Open,High,Low,Close,Volume\nd,1,2,0.5,1.5,9\n".into()),
            Outcome::Reshapeable => Ok("As Of Date,Level\nd,3\n".into()),
        }
    }

    fn usable(&self) -> bool {
        matches!(self, Outcome::Canonical | Outcome::Reshapeable)
    }
}

/// Source `i` answers with `outcomes[i]`; URLs are "s0", "s1", ...
struct OutcomeFetcher {
    outcomes: Vec<Outcome>,
}

impl Fetcher for OutcomeFetcher {
    fn name(&self) -> &str {
        "outcomes"
    }

    fn fetch(&self, url: &str, timeout: Duration) -> Result<String, SourceError> {
        let i: usize = url[1..].parse().expect("url index");
        self.outcomes[i].response(timeout)
    }
}

fn raw(columns: Vec<(String, Vec<String>)>) -> RawTable {
    RawTable::from_columns(
        columns
            .into_iter()
            .map(|(name, values)| RawColumn::new(name, values))
            .collect(),
    )
    .unwrap()
}

// ── 1. Fallback completeness ─────────────────────────────────────────

proptest! {
    #[test]
    fn pipeline_always_produces_one_nonempty_table(
        outcomes in prop::collection::vec(arb_outcome(), 1..6)
    ) {
        let urls: Vec<String> = (0..outcomes.len()).map(|i| format!("s{i}")).collect();
        let sources = SourceList::from_urls(&urls[0], &urls[1..]);
        let fetcher = OutcomeFetcher { outcomes: outcomes.clone() };

        let res = Pipeline::new(&fetcher, sources, Duration::from_secs(1)).resolve();
        prop_assert!(!res.table.is_empty());

        match outcomes.iter().position(Outcome::usable) {
            Some(0) => {
                prop_assert_eq!(res.tier, Tier::Primary);
            }
            Some(i) => {
                prop_assert_eq!(res.tier, Tier::Secondary { index: i - 1 });
            }
            None => {
                prop_assert_eq!(res.tier, Tier::Sample);
                prop_assert_eq!(&res.table, sample_table());
            }
        }
    }
}

// ── 2. Exact-match idempotence ───────────────────────────────────────

proptest! {
    #[test]
    fn exact_match_preserves_values_in_any_column_order(
        closes in arb_prices(),
        extra in arb_plain_name(),
        rotate in 0usize..7,
    ) {
        let n = closes.len();
        let dates: Vec<String> = (0..n).map(|i| format!("2024-01-{:02}", i + 1)).collect();
        let fmt = |xs: &[f64]| xs.iter().map(|x| x.to_string()).collect::<Vec<_>>();
        let opens: Vec<f64> = closes.iter().map(|c| c - 0.5).collect();
        let highs: Vec<f64> = closes.iter().map(|c| c + 1.0).collect();
        let lows: Vec<f64> = closes.iter().map(|c| c - 1.0).collect();
        let volumes: Vec<f64> = (0..n).map(|i| (1000 + i) as f64).collect();

        let mut columns = vec![
            ("Date".to_string(), dates.clone()),
            ("Open".to_string(), fmt(&opens)),
            ("High".to_string(), fmt(&highs)),
            ("Low".to_string(), fmt(&lows)),
            ("Close".to_string(), fmt(&closes)),
            ("Volume".to_string(), fmt(&volumes)),
            (format!("x_{extra}"), vec!["noise".to_string(); n]),
        ];
        columns.rotate_left(rotate);

        let (table, strategy) = Normalizer::normalize(&raw(columns)).unwrap();
        prop_assert_eq!(strategy, NormalizeStrategy::ExactMatch);
        prop_assert_eq!(table.len(), n);
        for (i, r) in table.records().iter().enumerate() {
            prop_assert_eq!(&r.date, &dates[i]);
            prop_assert_eq!(r.open, opens[i]);
            prop_assert_eq!(r.high, highs[i]);
            prop_assert_eq!(r.low, lows[i]);
            prop_assert_eq!(r.close, closes[i]);
            prop_assert_eq!(r.volume, volumes[i]);
        }
    }
}

// ── 3. Reshape determinism ───────────────────────────────────────────

proptest! {
    #[test]
    fn reshape_derives_from_first_numeric_column(prices in arb_prices()) {
        let n = prices.len();
        let dates: Vec<String> = (0..n).map(|i| format!("day {i}")).collect();
        let table = raw(vec![
            ("TradeDate".to_string(), dates.clone()),
            ("Price".to_string(), prices.iter().map(|p| p.to_string()).collect()),
            ("Notes".to_string(), vec!["n/a".to_string(); n]),
        ]);

        let (out, strategy) = Normalizer::normalize(&table).unwrap();
        prop_assert_eq!(strategy, NormalizeStrategy::Reshape);
        prop_assert_eq!(out.len(), n);
        for (i, r) in out.records().iter().enumerate() {
            let p = prices[i];
            prop_assert_eq!(&r.date, &dates[i]);
            prop_assert_eq!(r.close, p);
            prop_assert_eq!(r.open, p * 0.995);
            prop_assert_eq!(r.high, p * 1.01);
            prop_assert_eq!(r.low, p * 0.99);
            prop_assert_eq!(r.volume, 50_000_000.0);
        }
    }
}

// ── 4. Reshape failure ───────────────────────────────────────────────

proptest! {
    #[test]
    fn no_date_column_always_fails(
        names in prop::collection::vec(arb_plain_name(), 1..5),
        prices in arb_prices(),
    ) {
        let columns = names
            .into_iter()
            .map(|name| (name, prices.iter().map(|p| p.to_string()).collect::<Vec<_>>()))
            .collect();
        let err = Normalizer::normalize(&raw(columns)).unwrap_err();
        prop_assert_eq!(err, SchemaError::NoDateColumn);
    }
}
