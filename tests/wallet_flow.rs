//! End-to-end wallet flows against a scripted balance source.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use tokio_test::{assert_err, assert_ok};

use vortex_bot::access::{AccessPolicy, Feature, FeatureSet};
use vortex_bot::ledger::{BalanceOracle, BalanceSource};
use vortex_bot::service::WalletService;
use vortex_bot::store::{UserId, UserStore};
use vortex_bot::wallet::KeyGenerator;
use vortex_bot::{AppError, AppResult};

/// Replies with queued lamport balances (or errors) and counts calls.
#[derive(Default)]
struct ScriptedSource {
    replies: Mutex<VecDeque<AppResult<u64>>>,
    calls: AtomicUsize,
}

impl ScriptedSource {
    fn push(&self, reply: AppResult<u64>) {
        self.replies.lock().unwrap().push_back(reply);
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BalanceSource for ScriptedSource {
    async fn lamports(&self, _address: &str) -> AppResult<u64> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(AppError::oracle("no scripted reply")))
    }
}

struct Harness {
    dir: TempDir,
    source: Arc<ScriptedSource>,
    service: WalletService,
}

impl Harness {
    async fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(UserStore::open(dir.path().join("users.json")).await.unwrap());
        let source = Arc::new(ScriptedSource::default());
        let oracle = BalanceOracle::new(source.clone(), Duration::from_secs(5));
        let service = WalletService::new(store, oracle, AccessPolicy::default());
        Self { dir, source, service }
    }

    async fn reopen_store(&self) -> UserStore {
        UserStore::open(self.dir.path().join("users.json")).await.unwrap()
    }
}

fn full_set() -> FeatureSet {
    Feature::FULL.into_iter().collect()
}

#[tokio::test]
async fn alice_funds_her_wallet() {
    let h = Harness::new().await;
    let alice = UserId::from(42u64);

    let wallet = h.service.ensure_wallet(&alice, "alice").await.unwrap();
    assert!(wallet.created);
    assert_eq!(wallet.record.balance, 0.0);
    assert_eq!(wallet.record.display_name, "alice");
    assert!(KeyGenerator::keys_match(&wallet.record.address, &wallet.record.secret_key));

    h.source.push(Ok(5_000_000));
    let report = assert_ok!(h.service.refresh_access(&alice).await);
    assert_eq!(report.balance, 0.005);
    assert!(!report.unlocked);
    assert_eq!(report.features, FeatureSet::from([Feature::Deposit]));
    assert_eq!(h.service.store().get(&alice).await.unwrap().balance, 0.005);

    h.source.push(Ok(20_000_000));
    let report = h.service.refresh_access(&alice).await.unwrap();
    assert_eq!(report.balance, 0.02);
    assert!(report.unlocked);
    assert_eq!(report.features, full_set());

    let persisted = h.reopen_store().await;
    assert_eq!(persisted.get(&alice).await.unwrap().balance, 0.02);
}

#[tokio::test]
async fn ensure_wallet_twice_keeps_the_same_keys() {
    let h = Harness::new().await;
    let id = UserId::from(1u64);

    let first = h.service.ensure_wallet(&id, "bob").await.unwrap();
    let second = h.service.ensure_wallet(&id, "bob").await.unwrap();

    assert!(first.created);
    assert!(!second.created);
    assert_eq!(first.record.address, second.record.address);
    assert_eq!(first.record.secret_key, second.record.secret_key);
    assert_eq!(h.service.store().len().await, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_first_contact_creates_one_wallet() {
    let h = Harness::new().await;
    let service = Arc::new(h.service.clone());
    let id = UserId::from(77u64);

    let tasks: Vec<_> = (0..16)
        .map(|_| {
            let service = service.clone();
            let id = id.clone();
            tokio::spawn(async move { service.ensure_wallet(&id, "carol").await.unwrap() })
        })
        .collect();

    let results: Vec<_> = futures::future::join_all(tasks)
        .await
        .into_iter()
        .map(|r| r.unwrap())
        .collect();

    assert_eq!(results.iter().filter(|w| w.created).count(), 1);
    let address = &results[0].record.address;
    assert!(results.iter().all(|w| &w.record.address == address));
    assert_eq!(h.service.store().len().await, 1);
    assert_eq!(h.reopen_store().await.len().await, 1);
}

#[tokio::test]
async fn oracle_failure_keeps_stored_balance() {
    let h = Harness::new().await;
    let id = UserId::from(5u64);
    h.service.ensure_wallet(&id, "dave").await.unwrap();

    h.source.push(Ok(30_000_000));
    h.service.refresh_access(&id).await.unwrap();

    h.source.push(Err(AppError::oracle("node down")));
    let err = h.service.refresh_access(&id).await.unwrap_err();
    assert!(matches!(err, AppError::OracleUnavailable(_)));
    assert_eq!(h.service.store().get(&id).await.unwrap().balance, 0.03);
    assert_eq!(h.reopen_store().await.get(&id).await.unwrap().balance, 0.03);
}

#[tokio::test]
async fn refresh_for_unknown_user_touches_nothing() {
    let h = Harness::new().await;
    let stranger = UserId::from(999u64);

    let err = assert_err!(h.service.refresh_access(&stranger).await);
    assert!(matches!(err, AppError::NotFound(_)));
    assert_eq!(h.source.calls(), 0);
    assert!(h.service.store().is_empty().await);
    assert!(!h.service.store().path().exists());
}

#[tokio::test]
async fn balance_can_go_down() {
    let h = Harness::new().await;
    let id = UserId::from(6u64);
    h.service.ensure_wallet(&id, "erin").await.unwrap();

    h.source.push(Ok(50_000_000));
    assert!(h.service.refresh_access(&id).await.unwrap().unlocked);

    h.source.push(Ok(1_000_000));
    let report = h.service.refresh_access(&id).await.unwrap();
    assert_eq!(report.balance, 0.001);
    assert!(!report.unlocked);
}

#[tokio::test]
async fn deposit_and_feature_checks_use_stored_state() {
    let h = Harness::new().await;
    let id = UserId::from(8u64);

    assert!(matches!(
        h.service.deposit_address(&id).await,
        Err(AppError::NotFound(_))
    ));
    assert!(!h.service.check_feature(&id, Feature::Raid).await);

    let wallet = h.service.ensure_wallet(&id, "frank").await.unwrap();
    assert_eq!(h.service.deposit_address(&id).await.unwrap(), wallet.record.address);
    assert!(!h.service.check_feature(&id, Feature::Raid).await);
    assert!(h.service.check_feature(&id, Feature::Deposit).await);

    h.source.push(Ok(10_000_000));
    h.service.refresh_access(&id).await.unwrap();
    assert!(h.service.check_feature(&id, Feature::Raid).await);
    assert!(h.service.check_feature(&id, Feature::Refer).await);
    // feature checks never hit the node
    assert_eq!(h.source.calls(), 1);
}
