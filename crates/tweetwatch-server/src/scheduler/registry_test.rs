use std::sync::atomic::{AtomicUsize, Ordering};

use super::*;
use crate::scheduler::triggers::{BoxFuture, ManualTriggers};

fn counting_fire(counter: &Arc<AtomicUsize>) -> FireFn {
    let counter = Arc::clone(counter);
    Arc::new(move || -> BoxFuture {
        let counter = Arc::clone(&counter);
        Box::pin(async move {
            counter.fetch_add(1, Ordering::SeqCst);
        })
    })
}

fn noop_fire() -> FireFn {
    Arc::new(|| -> BoxFuture { Box::pin(async {}) })
}

fn registry() -> (ObservableRegistry, Arc<ManualTriggers>) {
    let triggers = Arc::new(ManualTriggers::default());
    let registry = ObservableRegistry::new(Arc::clone(&triggers) as Arc<dyn TriggerSource>);
    (registry, triggers)
}

#[tokio::test]
async fn first_upsert_creates_and_installs_resolved_expression() {
    let (registry, triggers) = registry();

    let outcome = registry
        .upsert(ObservableConfig::new("WindItalia", "2h", "it"), noop_fire())
        .await
        .expect("upsert");

    assert_eq!(outcome, UpsertOutcome::Created);
    assert_eq!(registry.len().await, 1);
    assert_eq!(triggers.active_expressions(), vec!["0 0 */2 * * *".to_owned()]);
    let job = registry.get("WindItalia").await.expect("job registered");
    assert_eq!(job.expression, "0 0 */2 * * *");
}

#[tokio::test]
async fn identical_upsert_is_idempotent() {
    let (registry, triggers) = registry();
    let config = ObservableConfig::new("WindItalia", "2h", "it");

    registry
        .upsert(config.clone(), noop_fire())
        .await
        .expect("first upsert");
    let before = registry.get("WindItalia").await.expect("job").trigger;

    let outcome = registry
        .upsert(config, noop_fire())
        .await
        .expect("second upsert");

    assert_eq!(outcome, UpsertOutcome::Unchanged);
    assert_eq!(registry.len().await, 1);
    assert_eq!(triggers.install_count(), 1);
    assert!(triggers.stopped().is_empty());
    let after = registry.get("WindItalia").await.expect("job").trigger;
    assert_eq!(before, after);
}

#[tokio::test]
async fn changed_interval_replaces_exactly_one_trigger() {
    let (registry, triggers) = registry();

    registry
        .upsert(ObservableConfig::new("WindItalia", "2h", "it"), noop_fire())
        .await
        .expect("first upsert");
    let old = registry.get("WindItalia").await.expect("job").trigger;

    let outcome = registry
        .upsert(ObservableConfig::new("WindItalia", "6h", "it"), noop_fire())
        .await
        .expect("second upsert");

    assert_eq!(outcome, UpsertOutcome::Updated);
    assert_eq!(triggers.stopped(), vec![old]);
    assert_eq!(triggers.install_count(), 2);
    assert_eq!(triggers.active_count(), 1);
    assert_eq!(triggers.active_expressions(), vec!["0 0 */6 * * *".to_owned()]);
    let job = registry.get("WindItalia").await.expect("job");
    assert_eq!(job.config.interval, "6h");
    assert_ne!(job.trigger, old);
}

#[tokio::test]
async fn changed_lang_also_replaces_trigger() {
    let (registry, triggers) = registry();

    registry
        .upsert(ObservableConfig::new("WindItalia", "2h", "it"), noop_fire())
        .await
        .expect("first upsert");
    let outcome = registry
        .upsert(ObservableConfig::new("WindItalia", "2h", "en"), noop_fire())
        .await
        .expect("second upsert");

    assert_eq!(outcome, UpsertOutcome::Updated);
    assert_eq!(triggers.stopped().len(), 1);
    assert_eq!(triggers.active_count(), 1);
}

#[tokio::test]
async fn replaced_trigger_no_longer_fires() {
    let (registry, triggers) = registry();
    let old_runs = Arc::new(AtomicUsize::new(0));
    let new_runs = Arc::new(AtomicUsize::new(0));

    registry
        .upsert(
            ObservableConfig::new("WindItalia", "2h", "it"),
            counting_fire(&old_runs),
        )
        .await
        .expect("first upsert");
    registry
        .upsert(
            ObservableConfig::new("WindItalia", "daily", "it"),
            counting_fire(&new_runs),
        )
        .await
        .expect("second upsert");
    triggers.fire_all().await;

    assert_eq!(old_runs.load(Ordering::SeqCst), 0);
    assert_eq!(new_runs.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn invalid_interval_leaves_registry_unchanged() {
    let (registry, triggers) = registry();

    registry
        .upsert(ObservableConfig::new("WindItalia", "2h", "it"), noop_fire())
        .await
        .expect("first upsert");

    let err = registry
        .upsert(ObservableConfig::new("WindItalia", "fail", "it"), noop_fire())
        .await
        .expect_err("bad interval should be rejected");

    assert!(matches!(err, ScheduleError::InvalidSchedule { .. }));
    assert!(triggers.stopped().is_empty());
    assert_eq!(triggers.active_count(), 1);
    let job = registry.get("WindItalia").await.expect("job kept");
    assert_eq!(job.config.interval, "2h");
}

#[tokio::test]
async fn invalid_interval_for_new_account_installs_nothing() {
    let (registry, triggers) = registry();

    let result = registry
        .upsert(ObservableConfig::new("shouldfail", "fail", "it"), noop_fire())
        .await;

    assert!(result.is_err());
    assert_eq!(registry.len().await, 0);
    assert_eq!(triggers.install_count(), 0);
}

#[tokio::test]
async fn blank_account_name_is_rejected() {
    let (registry, triggers) = registry();

    let err = registry
        .upsert(ObservableConfig::new("  ", "2h", "it"), noop_fire())
        .await
        .expect_err("blank name");

    assert!(matches!(err, ScheduleError::EmptyAccountName));
    assert_eq!(triggers.install_count(), 0);
}

#[tokio::test]
async fn remove_watched_account_stops_trigger() {
    let (registry, triggers) = registry();

    registry
        .upsert(ObservableConfig::new("WindItalia", "2h", "it"), noop_fire())
        .await
        .expect("upsert");
    let id = registry.get("WindItalia").await.expect("job").trigger;

    let removed = registry.remove("WindItalia").await.expect("remove");
    assert_eq!(removed, Some(ObservableConfig::new("WindItalia", "2h", "it")));
    assert_eq!(triggers.stopped(), vec![id]);
    assert!(registry.get("WindItalia").await.is_none());
    assert_eq!(triggers.active_count(), 0);
}

#[tokio::test]
async fn remove_unknown_account_is_a_no_op() {
    let (registry, triggers) = registry();

    assert!(registry.remove("nobody").await.expect("remove").is_none());
    assert!(triggers.stopped().is_empty());
}

#[tokio::test]
async fn snapshot_lists_every_observed_config() {
    let (registry, _triggers) = registry();
    for (account, interval, lang) in [("WindItalia", "2h", "it"), ("VodafoneUK", "daily", "en")] {
        registry
            .upsert(ObservableConfig::new(account, interval, lang), noop_fire())
            .await
            .expect("upsert");
    }

    let mut snapshot = registry.snapshot().await;
    snapshot.sort_by(|a, b| a.account_name.cmp(&b.account_name));

    assert_eq!(
        snapshot,
        vec![
            ObservableConfig::new("VodafoneUK", "daily", "en"),
            ObservableConfig::new("WindItalia", "2h", "it"),
        ]
    );
}
