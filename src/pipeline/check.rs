// src/pipeline/check.rs

//! One scheduled check: fetch, decide, notify, persist.

use chrono::Utc;

use crate::error::Result;
use crate::models::report::{
    CHECK_DELIVERY, CHECK_FETCH_SUCCEEDED, CHECK_RULES_EVALUATED, CHECK_STATE_PERSISTED,
    RuntimeReport, Status,
};
use crate::models::{AlertState, Config, Decision};
use crate::pipeline::decide::decide;
use crate::pipeline::report::evaluate_freshness;
use crate::services::{AlertMessage, Notifier, PageSource};
use crate::storage::AlertStateStore;

/// What a check run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOutcome {
    pub decision: Decision,
    /// A notification was accepted by the far end
    pub notified: bool,
    /// The dedup marker was written
    pub state_saved: bool,
}

impl CheckOutcome {
    fn quiet(decision: Decision) -> Self {
        Self {
            decision,
            notified: false,
            state_saved: false,
        }
    }
}

/// Run a single check.
///
/// The marker is written only after the notifier confirms delivery, and
/// never in dry-run mode. A failed delivery or a failed marker write is
/// returned as an error so the scheduler sees a non-zero exit.
pub async fn run_check(
    config: &Config,
    source: &dyn PageSource,
    notifier: &dyn Notifier,
    store: &dyn AlertStateStore,
    report: &mut RuntimeReport,
) -> Result<CheckOutcome> {
    report.dry_run = config.dry_run;

    log::info!("Fetching {}", source.location());
    let page = match source.fetch().await {
        Ok(page) => {
            report.set_check(
                CHECK_FETCH_SUCCEEDED,
                Status::Ok,
                "Fetched source page successfully.",
            );
            page
        }
        Err(e) => {
            report.set_check(CHECK_FETCH_SUCCEEDED, Status::Fail, e.to_string());
            return Err(e);
        }
    };

    let prior = store.load().await;
    let decision = decide(&page, &config.rules(), prior.as_ref());
    report.decision = Some(decision.label().to_string());

    if let Some(estimate) = decision.estimate() {
        report.row_counts.estimates_fetched = 1;
        evaluate_freshness(
            report,
            &estimate.draw_datetime,
            config.source.utc_offset_hours,
            config.freshness.max_lag_secs,
            Utc::now(),
        );
    }

    let (estimate, draw_key) = match &decision {
        Decision::NoData | Decision::ParseError(_) => {
            log::warn!("{decision}");
            report.set_check(CHECK_RULES_EVALUATED, Status::Warn, decision.to_string());
            report.warn(format!("No estimate this run: {decision}"));
            report.set_check(CHECK_DELIVERY, Status::Ok, "No alert to deliver.");
            report.set_check(CHECK_STATE_PERSISTED, Status::Ok, "State unchanged.");
            return Ok(CheckOutcome::quiet(decision.clone()));
        }
        Decision::Suppressed { .. } => {
            log::info!("{decision}");
            report.set_check(CHECK_RULES_EVALUATED, Status::Ok, decision.to_string());
            report.set_check(CHECK_DELIVERY, Status::Ok, "No alert to deliver.");
            report.set_check(CHECK_STATE_PERSISTED, Status::Ok, "State unchanged.");
            return Ok(CheckOutcome::quiet(decision.clone()));
        }
        Decision::Alert { estimate, draw_key } => (estimate.clone(), draw_key.clone()),
    };

    log::info!("{decision}");
    report.set_check(CHECK_RULES_EVALUATED, Status::Ok, decision.to_string());
    report.row_counts.alerts_generated = 1;

    let message = AlertMessage::new(&estimate, config).render(&config.alert.message_template);

    if config.dry_run {
        log::info!("Dry run: message not sent, state not written\n{message}");
        report.set_check(CHECK_DELIVERY, Status::Ok, "Dry run: delivery skipped.");
        report.set_check(CHECK_STATE_PERSISTED, Status::Ok, "Dry run: state not written.");
        return Ok(CheckOutcome::quiet(decision));
    }

    if let Err(e) = notifier.notify(&message).await {
        log::error!("Alert delivery failed, state left unchanged: {e}");
        report.row_counts.alerts_failed = 1;
        report.set_check(CHECK_DELIVERY, Status::Fail, e.to_string());
        report.set_check(
            CHECK_STATE_PERSISTED,
            Status::Warn,
            "Skipped because delivery failed.",
        );
        return Err(e);
    }
    report.row_counts.alerts_sent = 1;
    report.set_check(CHECK_DELIVERY, Status::Ok, "Alert delivered.");

    let state = AlertState::alerted(draw_key, &estimate);
    if let Err(e) = store.save(&state).await {
        // The alert is out but the marker is not; the next run will repeat it.
        log::error!("Alert sent but dedup marker was not saved, next run may re-alert: {e}");
        report.set_check(CHECK_STATE_PERSISTED, Status::Fail, e.to_string());
        return Err(e);
    }
    report.set_check(CHECK_STATE_PERSISTED, Status::Ok, "Dedup marker updated.");

    Ok(CheckOutcome {
        decision,
        notified: true,
        state_saved: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use tempfile::TempDir;

    use crate::error::AppError;
    use crate::models::DedupScope;
    use crate::storage::LocalStateStore;

    const PAGE: &str = r#"
        <div>Next Jackpot Estimate</div><div>$16,000,000</div>
        <div>Next Draw</div><div>2025-07-01</div>
    "#;

    struct StaticPage(&'static str);

    #[async_trait]
    impl PageSource for StaticPage {
        async fn fetch(&self) -> Result<String> {
            Ok(self.0.to_string())
        }

        fn location(&self) -> &str {
            "static"
        }
    }

    struct DownPage;

    #[async_trait]
    impl PageSource for DownPage {
        async fn fetch(&self) -> Result<String> {
            Err(AppError::fetch("http://example.invalid", "connection refused"))
        }

        fn location(&self) -> &str {
            "http://example.invalid"
        }
    }

    /// Records messages; fails every send when `fail` is set.
    #[derive(Default)]
    struct RecordingNotifier {
        sent: Mutex<Vec<String>>,
        fail: bool,
    }

    impl RecordingNotifier {
        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        fn sent(&self) -> Vec<String> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn notify(&self, message: &str) -> Result<()> {
            if self.fail {
                return Err(AppError::delivery("HTTP 502"));
            }
            self.sent.lock().unwrap().push(message.to_string());
            Ok(())
        }
    }

    fn config(threshold: i64, dry_run: bool) -> Config {
        let mut config = Config::from_toml(&format!(
            "[threshold]\namount = {threshold}\n\n[alert]\nmessage_template = \"{{prize_amount}} {{currency}} on {{draw_datetime_text}}\"\n"
        ))
        .unwrap();
        config.dry_run = dry_run;
        config
    }

    fn store(tmp: &TempDir) -> LocalStateStore {
        LocalStateStore::new(tmp.path().join(".state/last_alert.json"))
    }

    #[tokio::test]
    async fn alert_is_sent_then_marker_saved() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);
        let notifier = RecordingNotifier::default();
        let mut report = RuntimeReport::start(Utc::now());

        let outcome = run_check(
            &config(15_000_000, false),
            &StaticPage(PAGE),
            &notifier,
            &store,
            &mut report,
        )
        .await
        .unwrap();

        assert!(outcome.notified && outcome.state_saved);
        assert_eq!(notifier.sent(), vec!["16,000,000 SGD on 2025-07-01".to_string()]);

        let marker = store.load().await.unwrap();
        assert_eq!(marker.last_alerted_draw_key, "2025-07-01");
        assert_eq!(report.row_counts.alerts_sent, 1);
        assert_eq!(report.decision.as_deref(), Some("alert"));
    }

    #[tokio::test]
    async fn second_run_for_same_draw_stays_quiet() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);
        let notifier = RecordingNotifier::default();
        let config = config(15_000_000, false);

        for _ in 0..3 {
            let mut report = RuntimeReport::start(Utc::now());
            run_check(&config, &StaticPage(PAGE), &notifier, &store, &mut report)
                .await
                .unwrap();
        }

        assert_eq!(notifier.sent().len(), 1);
    }

    #[tokio::test]
    async fn below_threshold_sends_nothing() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);
        let notifier = RecordingNotifier::default();
        let mut report = RuntimeReport::start(Utc::now());

        let outcome = run_check(
            &config(16_000_000, false),
            &StaticPage(PAGE),
            &notifier,
            &store,
            &mut report,
        )
        .await
        .unwrap();

        assert_eq!(outcome.decision.label(), "suppressed_below_threshold");
        assert!(notifier.sent().is_empty());
        assert!(store.load().await.is_none());
    }

    #[tokio::test]
    async fn dry_run_neither_sends_nor_writes() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);
        let notifier = RecordingNotifier::default();
        let mut report = RuntimeReport::start(Utc::now());

        let outcome = run_check(
            &config(15_000_000, true),
            &StaticPage(PAGE),
            &notifier,
            &store,
            &mut report,
        )
        .await
        .unwrap();

        assert_eq!(outcome.decision.label(), "alert");
        assert!(!outcome.notified && !outcome.state_saved);
        assert!(notifier.sent().is_empty());
        assert!(!store.path().exists());
        assert!(report.dry_run);
    }

    #[tokio::test]
    async fn failed_delivery_keeps_marker_unchanged() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);
        store.save(&AlertState::new("2025-06-28")).await.unwrap();
        let mut report = RuntimeReport::start(Utc::now());

        let err = run_check(
            &config(15_000_000, false),
            &StaticPage(PAGE),
            &RecordingNotifier::failing(),
            &store,
            &mut report,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::Delivery(_)));
        assert_eq!(store.load().await.unwrap().last_alerted_draw_key, "2025-06-28");
        assert_eq!(report.row_counts.alerts_failed, 1);
        assert_eq!(report.check(CHECK_DELIVERY).unwrap().status, Status::Fail);
    }

    #[tokio::test]
    async fn marker_write_failure_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let blocker = tmp.path().join("blocker");
        std::fs::write(&blocker, b"").unwrap();
        let store = LocalStateStore::new(blocker.join("last_alert.json"));
        let notifier = RecordingNotifier::default();
        let mut report = RuntimeReport::start(Utc::now());

        let err = run_check(
            &config(15_000_000, false),
            &StaticPage(PAGE),
            &notifier,
            &store,
            &mut report,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::StateIo { .. }));
        assert_eq!(notifier.sent().len(), 1);
        assert_eq!(
            report.check(CHECK_STATE_PERSISTED).unwrap().status,
            Status::Fail
        );
    }

    #[tokio::test]
    async fn fetch_failure_propagates() {
        let tmp = TempDir::new().unwrap();
        let mut report = RuntimeReport::start(Utc::now());

        let err = run_check(
            &config(1, false),
            &DownPage,
            &RecordingNotifier::default(),
            &store(&tmp),
            &mut report,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::Fetch { .. }));
        assert_eq!(
            report.check(CHECK_FETCH_SUCCEEDED).unwrap().status,
            Status::Fail
        );
    }

    #[tokio::test]
    async fn unparseable_page_is_not_an_error() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);
        let notifier = RecordingNotifier::default();
        let mut report = RuntimeReport::start(Utc::now());

        let outcome = run_check(
            &config(1, false),
            &StaticPage("<p>Site under maintenance</p>"),
            &notifier,
            &store,
            &mut report,
        )
        .await
        .unwrap();

        assert_eq!(outcome.decision.label(), "parse_error");
        assert!(notifier.sent().is_empty());
        assert_eq!(report.warnings.len(), 1);
    }

    #[tokio::test]
    async fn amount_scope_realerts_on_growth() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);
        store
            .save(&AlertState::new("2025-07-01|15500000"))
            .await
            .unwrap();
        let notifier = RecordingNotifier::default();
        let mut config = config(15_000_000, false);
        config.alert.dedup = DedupScope::DrawAndAmount;
        let mut report = RuntimeReport::start(Utc::now());

        run_check(&config, &StaticPage(PAGE), &notifier, &store, &mut report)
            .await
            .unwrap();

        assert_eq!(notifier.sent().len(), 1);
        assert_eq!(
            store.load().await.unwrap().last_alerted_draw_key,
            "2025-07-01|16000000"
        );
    }
}
