//! Selection service behaviour against a nullable chain reader.

use std::time::Duration;

use stake_chain::{ChainError, ChainQuery, ChainSnapshot, ValidatorPrefs};
use stake_nullables::NullChainReader;
use stake_selection::{SelectionConfig, SelectionError, SelectionService};
use stake_types::{AccountId, Balance, Perbill};

fn id(s: &str) -> AccountId {
    AccountId::new(s)
}

fn bal(n: i64) -> Balance {
    Balance::from(n)
}

fn open() -> ValidatorPrefs {
    ValidatorPrefs::default()
}

/// Three validators, two nominators, points for eras 8..=10.
fn small_network() -> ChainSnapshot {
    ChainSnapshot::new()
        .with_validator(&id("va"), open(), bal(100))
        .with_validator(&id("vb"), open(), bal(100))
        .with_validator(
            &id("vc"),
            ValidatorPrefs {
                commission: Perbill::from_percent(50),
                blocked: false,
            },
            bal(100),
        )
        .with_nominator(&id("n1"), bal(300), &[id("va"), id("vb")])
        .with_nominator(&id("n2"), bal(50), &[id("vc")])
        .with_era_points(8, &[(id("va"), 10), (id("vb"), 10), (id("vc"), 10)])
        .with_era_points(9, &[(id("va"), 20), (id("vb"), 5), (id("vc"), 5)])
        .with_era_points(10, &[(id("va"), 30), (id("vb"), 30)])
        .with_active_era(10)
}

fn service(snapshot: ChainSnapshot) -> SelectionService<NullChainReader> {
    SelectionService::new(NullChainReader::new(snapshot), SelectionConfig::default())
}

#[tokio::test]
async fn selects_and_ranks_by_return() {
    let svc = service(small_network());
    let selected = svc.select_validators(&id("me")).await.unwrap();

    assert_eq!(selected.len(), 3);
    assert!(selected
        .windows(2)
        .all(|w| w[0].estimated_return >= w[1].estimated_return));
    // vc has the least backing but keeps only half its rewards and earned less.
    assert_eq!(selected[2].validator_id, id("vc"));

    let backed: Balance = selected.iter().map(|v| v.backed_stake).sum();
    assert_eq!(backed, bal(650));
}

#[tokio::test]
async fn selection_is_deterministic() {
    let first = service(small_network()).select_validators(&id("me")).await.unwrap();
    let second = service(small_network()).select_validators(&id("me")).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn excluded_nominator_does_not_vote() {
    let svc = service(small_network());
    let selected = svc.select_validators(&id("n1")).await.unwrap();
    let backed: Balance = selected.iter().map(|v| v.backed_stake).sum();
    assert_eq!(backed, bal(350));
}

#[tokio::test]
async fn queries_active_era_and_seven_before() {
    let svc = service(small_network());
    svc.select_validators(&id("me")).await.unwrap();

    let mut eras: Vec<u32> = svc
        .reader()
        .queries()
        .into_iter()
        .filter_map(|q| match q {
            ChainQuery::EraRewardPoints(era) => Some(era),
            _ => None,
        })
        .collect();
    eras.sort_unstable();
    assert_eq!(eras, (3..=10).collect::<Vec<_>>());
}

#[tokio::test]
async fn era_window_clamped_at_genesis() {
    let svc = service(small_network().with_active_era(2));
    svc.select_validators(&id("me")).await.unwrap();
    let era_reads = svc
        .reader()
        .queries()
        .into_iter()
        .filter(|q| matches!(q, ChainQuery::EraRewardPoints(_)))
        .count();
    assert_eq!(era_reads, 3);
}

#[tokio::test]
async fn failed_bulk_read_fails_selection() {
    let svc = service(small_network());
    svc.reader().fail_on(ChainQuery::Validators);
    let result = svc.select_validators(&id("me")).await;
    assert!(matches!(
        result,
        Err(SelectionError::Chain(ChainError::Unavailable {
            query: ChainQuery::Validators,
            ..
        }))
    ));
}

#[tokio::test]
async fn failed_era_read_fails_selection() {
    let svc = service(small_network());
    svc.reader().fail_on(ChainQuery::EraRewardPoints(5));
    assert!(matches!(
        svc.select_validators(&id("me")).await,
        Err(SelectionError::Chain(ChainError::Unavailable {
            query: ChainQuery::EraRewardPoints(5),
            ..
        }))
    ));
}

#[tokio::test]
async fn stalled_read_times_out() {
    let svc = service(small_network()).with_fetch_timeout(Duration::from_millis(50));
    svc.reader().stall_on(ChainQuery::ActiveEra);
    assert!(matches!(
        svc.select_validators(&id("me")).await,
        Err(SelectionError::Chain(ChainError::Timeout {
            query: ChainQuery::ActiveEra
        }))
    ));
}

#[tokio::test]
async fn missing_ledger_is_reported() {
    let mut snapshot = small_network();
    snapshot.ledgers.remove(&id("n2"));
    assert!(matches!(
        service(snapshot).select_validators(&id("me")).await,
        Err(SelectionError::MissingLedger(who)) if who == id("n2")
    ));
}

#[tokio::test]
async fn missing_controller_is_reported() {
    let mut snapshot = small_network();
    snapshot.bonded.remove(&id("vb"));
    assert!(matches!(
        service(snapshot).select_validators(&id("me")).await,
        Err(SelectionError::MissingController(who)) if who == id("vb")
    ));
}

#[tokio::test]
async fn default_performance_without_points() {
    let snapshot = ChainSnapshot::new()
        .with_validator(&id("v1"), open(), bal(10))
        .with_validator(&id("v2"), open(), bal(10))
        .with_active_era(4);
    let selected = service(snapshot).select_validators(&id("me")).await.unwrap();
    assert_eq!(selected.len(), 2);
    for v in &selected {
        assert_eq!(v.estimated_return, Balance::new(25, 2));
    }
}

#[tokio::test]
async fn blocked_and_saturated_validators_dropped() {
    let mut snapshot = ChainSnapshot::new()
        .with_validator(&id("ok"), open(), bal(10))
        .with_validator(
            &id("blocked"),
            ValidatorPrefs {
                commission: Perbill::ZERO,
                blocked: true,
            },
            bal(10),
        )
        .with_validator(&id("full"), open(), bal(10))
        .with_active_era(1);
    // 255 nominators plus the self-vote make 256 backers.
    for i in 0..255 {
        snapshot = snapshot.with_nominator(&id(&format!("n{i:03}")), bal(1), &[id("full")]);
    }

    let selected = service(snapshot).select_validators(&id("me")).await.unwrap();
    let ids: Vec<&str> = selected.iter().map(|v| v.validator_id.as_str()).collect();
    assert_eq!(ids, ["ok"]);
}

#[tokio::test]
async fn at_most_target_count_selected() {
    let mut snapshot = ChainSnapshot::new().with_active_era(30);
    for i in 0..24 {
        snapshot = snapshot.with_validator(&id(&format!("v{i:02}")), open(), bal(10 + i));
    }
    let selected = service(snapshot).select_validators(&id("me")).await.unwrap();
    assert_eq!(selected.len(), 16);
    // Least backed validators promise the highest return.
    assert_eq!(selected[0].validator_id, id("v00"));
}

#[tokio::test]
async fn seat_count_limits_election() {
    let snapshot = small_network().with_validator_count(1);
    let selected = service(snapshot).select_validators(&id("me")).await.unwrap();
    assert_eq!(selected.len(), 1);
}

#[tokio::test]
async fn empty_chain_selects_nothing() {
    let snapshot = ChainSnapshot::new().with_active_era(0);
    let selected = service(snapshot).select_validators(&id("me")).await.unwrap();
    assert!(selected.is_empty());
}

#[tokio::test]
async fn configured_filters_apply_before_truncation() {
    let config = SelectionConfig {
        max_commission_percent: bal(20),
        excluded_validators: vec![id("va")],
        target_count: 1,
        ..SelectionConfig::default()
    };
    let svc = SelectionService::new(NullChainReader::new(small_network()), config);
    let selected = svc.select_validators(&id("me")).await.unwrap();
    let ids: Vec<&str> = selected.iter().map(|v| v.validator_id.as_str()).collect();
    assert_eq!(ids, ["vb"]);
}

#[tokio::test]
async fn allowed_list_restricts_selection() {
    let config = SelectionConfig {
        allowed_validators: vec![id("vc")],
        ..SelectionConfig::default()
    };
    let svc = SelectionService::new(NullChainReader::new(small_network()), config);
    let selected = svc.select_validators(&id("me")).await.unwrap();
    assert_eq!(selected.len(), 1);
    assert_eq!(selected[0].validator_id, id("vc"));
}

#[tokio::test]
async fn unreachable_static_list_is_ignored() {
    let config = SelectionConfig {
        static_list_url: Some("http://127.0.0.1:1/validators.txt".into()),
        ..SelectionConfig::default()
    };
    let svc = SelectionService::new(NullChainReader::new(small_network()), config);
    let selected = svc.select_validators(&id("me")).await.unwrap();
    assert_eq!(selected.len(), 3);
}
