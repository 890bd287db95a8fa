//! Integration specifications for the scoring and appraisal workflow.
//!
//! Scenarios exercise the public service facade and HTTP router end to end:
//! submissions in, period scores, summaries, low-performer verdicts, and
//! draft/finalized appraisal records out.

mod common {
    use std::collections::{BTreeMap, HashMap};
    use std::sync::{Arc, Mutex};

    use chrono::NaiveDate;

    use scorecard::appraisal::{
        AppraisalId, AppraisalRecord, AppraisalService, PerformanceRepository, RepositoryError,
    };
    use scorecard::scoring::{
        CurrentSubmission, EngineConfig, LearningEntry, Metric, PeriodKey, PeriodScore,
        RawMetricValue, Scale, SubjectId, SubmissionRecord,
    };

    #[derive(Default, Clone)]
    pub(super) struct MemoryRepository {
        periods: Arc<Mutex<HashMap<SubjectId, BTreeMap<PeriodKey, PeriodScore>>>>,
        appraisals: Arc<Mutex<HashMap<AppraisalId, AppraisalRecord>>>,
    }

    impl PerformanceRepository for MemoryRepository {
        fn store_period(&self, score: PeriodScore) -> Result<(), RepositoryError> {
            let mut guard = self.periods.lock().expect("period mutex poisoned");
            guard
                .entry(score.subject.clone())
                .or_default()
                .insert(score.period.clone(), score);
            Ok(())
        }

        fn periods(&self, subject: &SubjectId) -> Result<Vec<PeriodScore>, RepositoryError> {
            let guard = self.periods.lock().expect("period mutex poisoned");
            Ok(guard
                .get(subject)
                .map(|history| history.values().cloned().collect())
                .unwrap_or_default())
        }

        fn insert_appraisal(
            &self,
            record: AppraisalRecord,
        ) -> Result<AppraisalRecord, RepositoryError> {
            let mut guard = self.appraisals.lock().expect("appraisal mutex poisoned");
            if guard.contains_key(&record.id) {
                return Err(RepositoryError::Conflict);
            }
            guard.insert(record.id.clone(), record.clone());
            Ok(record)
        }

        fn update_appraisal(&self, record: AppraisalRecord) -> Result<(), RepositoryError> {
            let mut guard = self.appraisals.lock().expect("appraisal mutex poisoned");
            if guard.contains_key(&record.id) {
                guard.insert(record.id.clone(), record);
                Ok(())
            } else {
                Err(RepositoryError::NotFound)
            }
        }

        fn fetch_appraisal(
            &self,
            id: &AppraisalId,
        ) -> Result<Option<AppraisalRecord>, RepositoryError> {
            let guard = self.appraisals.lock().expect("appraisal mutex poisoned");
            Ok(guard.get(id).cloned())
        }
    }

    /// Hundred-point appraisal domain with a learning rule, used by the
    /// twelve-month scenario.
    pub(super) fn review_config() -> EngineConfig {
        EngineConfig::builder(Scale::HUNDRED_POINT)
            .band("A", 85.0, 10.0, "Full increment bracket")
            .band("B", 75.0, 7.0, "Standard increment")
            .band("C", 65.0, 4.0, "Limited increment")
            .band("D", 0.0, 0.0, "PIP/No increment")
            .low_performer(65.0, 2, 2)
            .learning_shortfall_minutes(360)
            .rule(scorecard::scoring::RecommendationRule::new(
                scorecard::scoring::RuleTrigger::LearningShortfall,
                "Focus on dedicating at least 6 hours per month to learning to avoid appraisal delays.",
            ))
            .rule(scorecard::scoring::RecommendationRule::new(
                scorecard::scoring::RuleTrigger::MetricBelow {
                    metric: Metric::kpi(),
                    threshold: 70.0,
                },
                "Review KPI performance to identify areas for improvement and focus on key metrics.",
            ))
            .build()
            .expect("review config is valid")
    }

    pub(super) fn build_service() -> (
        AppraisalService<MemoryRepository>,
        Arc<MemoryRepository>,
    ) {
        let repository = Arc::new(MemoryRepository::default());
        let service = AppraisalService::new(repository.clone(), review_config());
        (service, repository)
    }

    pub(super) fn employee_service() -> (
        AppraisalService<MemoryRepository>,
        Arc<MemoryRepository>,
    ) {
        let repository = Arc::new(MemoryRepository::default());
        let service = AppraisalService::new(repository.clone(), EngineConfig::employee());
        (service, repository)
    }

    pub(super) fn submission(
        year: i32,
        month: u32,
        kpi: f64,
        learning_minutes: u32,
    ) -> SubmissionRecord {
        SubmissionRecord::Current(CurrentSubmission {
            submission_month: NaiveDate::from_ymd_opt(year, month, 1).expect("valid date"),
            metrics: BTreeMap::from([(Metric::kpi(), RawMetricValue::Number(kpi))]),
            learning: vec![LearningEntry {
                topic: "Search quality deep dive".to_string(),
                url: "https://learning.example.com/search-quality".to_string(),
                applied_where: "Client retainers".to_string(),
                minutes: learning_minutes,
            }],
            manager_score: None,
            mentor_score: None,
        })
    }

    /// Eleven months at 78.0 and one at 81.6 average to exactly 78.3; March
    /// is the single learning-short month.
    pub(super) fn submit_review_year(
        service: &AppraisalService<MemoryRepository>,
        subject: &str,
    ) {
        for month in 1..=12u32 {
            let kpi = if month == 12 { 81.6 } else { 78.0 };
            let learning = if month == 3 { 300 } else { 400 };
            service
                .submit_period(
                    SubjectId(subject.to_string()),
                    &submission(2024, month, kpi, learning),
                )
                .expect("submission scores and stores");
        }
    }
}

mod scoring {
    use super::common::*;
    use scorecard::appraisal::PerformanceRepository;
    use scorecard::scoring::{LowPerformerVerdict, SubjectId};

    #[test]
    fn resubmission_replaces_the_period_score() {
        let (service, repository) = build_service();
        let subject = SubjectId("client-acme".to_string());

        service
            .submit_period(subject.clone(), &submission(2024, 1, 60.0, 400))
            .expect("first submission");
        service
            .submit_period(subject.clone(), &submission(2024, 1, 72.0, 400))
            .expect("resubmission");

        let history = repository.periods(&subject).expect("history loads");
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].overall, 72.0);
    }

    #[test]
    fn histories_come_back_in_period_order() {
        let (service, repository) = build_service();
        let subject = SubjectId("client-acme".to_string());

        for month in [7u32, 2, 11, 4] {
            service
                .submit_period(subject.clone(), &submission(2024, month, 70.0, 400))
                .expect("submission");
        }

        let history = repository.periods(&subject).expect("history loads");
        let keys: Vec<&str> = history.iter().map(|p| p.period.as_str()).collect();
        assert_eq!(keys, vec!["2024-02", "2024-04", "2024-07", "2024-11"]);
    }

    #[test]
    fn low_performer_flag_requires_corroborating_history() {
        let (service, _) = build_service();
        let subject = SubjectId("client-slump".to_string());

        service
            .submit_period(subject.clone(), &submission(2024, 1, 40.0, 400))
            .expect("submission");
        assert!(matches!(
            service.low_performer(&subject).expect("verdict"),
            LowPerformerVerdict::InsufficientData {
                available: 1,
                required: 2
            }
        ));

        service
            .submit_period(subject.clone(), &submission(2024, 2, 50.0, 400))
            .expect("submission");
        let verdict = service.low_performer(&subject).expect("verdict");
        assert_eq!(
            verdict,
            LowPerformerVerdict::Flagged {
                rolling_average: 45.0,
                window: 2
            }
        );
    }

    #[test]
    fn employee_domain_flags_a_single_bad_month() {
        let (service, _) = employee_service();
        let subject = SubjectId("emp-17".to_string());

        service
            .submit_period(subject.clone(), &submission(2025, 1, 4.0, 400))
            .expect("submission");

        assert!(service
            .low_performer(&subject)
            .expect("verdict")
            .is_flagged());
    }
}

mod appraisal {
    use super::common::*;
    use scorecard::appraisal::{AppraisalServiceError, AppraisalState, RecommendationOutcome};
    use scorecard::scoring::SubjectId;

    fn key(raw: &str) -> scorecard::scoring::PeriodKey {
        raw.parse().expect("valid period key")
    }

    #[test]
    fn twelve_month_review_lands_in_band_b_with_one_shortfall() {
        let (service, _) = build_service();
        let subject = SubjectId("client-meridian".to_string());
        submit_review_year(&service, "client-meridian");

        let record = service
            .build_appraisal(subject.clone(), key("2024-01"), key("2024-12"), None)
            .expect("appraisal builds");

        assert_eq!(record.summary.average_overall, 78.3);
        assert_eq!(record.summary.total_periods, 12);
        assert_eq!(record.summary.shortfall_periods, 1);
        assert_eq!(record.rating.label, "B");
        assert_eq!(record.rating.increment_pct, 7.0);
        assert_eq!(record.state, AppraisalState::Draft);
        assert_eq!(record.monthly_breakdown.len(), 12);

        let RecommendationOutcome::Improvements { items } = &record.recommendations else {
            panic!("expected improvement items");
        };
        assert_eq!(items.len(), 1);
        assert!(items[0].advice.contains("learning"));
    }

    #[test]
    fn appraisal_over_an_empty_range_is_rejected() {
        let (service, _) = build_service();
        let subject = SubjectId("client-new".to_string());

        let result =
            service.build_appraisal(subject, key("2024-01"), key("2024-12"), None);

        assert!(matches!(
            result,
            Err(AppraisalServiceError::Appraisal(_))
        ));
    }

    #[test]
    fn notes_amend_until_finalized() {
        let (service, _) = build_service();
        let subject = SubjectId("client-meridian".to_string());
        submit_review_year(&service, "client-meridian");

        let record = service
            .build_appraisal(
                subject,
                key("2024-01"),
                key("2024-12"),
                Some("Initial annual review".to_string()),
            )
            .expect("appraisal builds");
        assert_eq!(record.note.as_deref(), Some("Initial annual review"));

        let amended = service
            .amend_note(&record.id, "Reviewed with department head".to_string())
            .expect("draft note amends");
        assert_eq!(amended.note.as_deref(), Some("Reviewed with department head"));

        let finalized = service.finalize(&record.id).expect("finalizes");
        assert_eq!(finalized.state, AppraisalState::Finalized);

        assert!(matches!(
            service.amend_note(&record.id, "too late".to_string()),
            Err(AppraisalServiceError::Appraisal(_))
        ));
        assert!(matches!(
            service.finalize(&record.id),
            Err(AppraisalServiceError::Appraisal(_))
        ));
    }

    #[test]
    fn subject_report_returns_the_value_state_until_data_arrives() {
        let (service, _) = build_service();
        let subject = SubjectId("client-quiet".to_string());

        assert!(service
            .subject_report(&subject)
            .expect("report call succeeds")
            .is_none());

        submit_review_year(&service, "client-quiet");
        let (summary, recommendations) = service
            .subject_report(&subject)
            .expect("report call succeeds")
            .expect("summary present");
        assert_eq!(summary.total_periods, 12);
        assert!(matches!(
            recommendations,
            RecommendationOutcome::Improvements { .. }
        ));
    }
}

mod routing {
    use super::common::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use std::sync::Arc;
    use scorecard::appraisal::appraisal_router;
    use tower::ServiceExt;

    fn build_router() -> (axum::Router, Arc<MemoryRepository>) {
        let (service, repository) = build_service();
        (appraisal_router(Arc::new(service)), repository)
    }

    async fn read_json(response: axum::response::Response) -> Value {
        let body = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("read body");
        serde_json::from_slice(&body).expect("json payload")
    }

    #[tokio::test]
    async fn post_periods_returns_the_computed_score() {
        let (router, _) = build_router();
        let payload = json!({
            "subject": "client-acme",
            "schema": "current",
            "submission_month": "2024-05-01",
            "metrics": { "kpi": 82.0 }
        });

        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/periods")
                    .header("content-type", "application/json")
                    .body(Body::from(payload.to_string()))
                    .expect("request"),
            )
            .await
            .expect("router dispatch");

        assert_eq!(response.status(), StatusCode::ACCEPTED);
        let body = read_json(response).await;
        assert_eq!(body.get("period"), Some(&json!("2024-05")));
        assert_eq!(body.get("overall"), Some(&json!(82.0)));
        assert_eq!(body.get("insufficient_data"), Some(&json!(false)));
    }

    #[tokio::test]
    async fn summary_endpoint_reports_insufficient_data_for_unknown_subjects() {
        let (router, _) = build_router();

        let response = router
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/api/v1/subjects/client-ghost/summary")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router dispatch");

        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        assert_eq!(body.get("status"), Some(&json!("insufficient_data")));
    }

    #[tokio::test]
    async fn appraisal_lifecycle_over_http() {
        let (service, _repository) = build_service();
        submit_review_year(&service, "client-meridian");
        let router = scorecard::appraisal::appraisal_router(Arc::new(service));

        let create = router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/appraisals")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        json!({
                            "subject": "client-meridian",
                            "period_start": "2024-01",
                            "period_end": "2024-12",
                            "note": "Annual cycle"
                        })
                        .to_string(),
                    ))
                    .expect("request"),
            )
            .await
            .expect("router dispatch");

        assert_eq!(create.status(), StatusCode::CREATED);
        let created = read_json(create).await;
        assert_eq!(created.get("rating_band"), Some(&json!("B")));
        assert_eq!(created.get("state"), Some(&json!("draft")));
        let id = created
            .get("appraisal_id")
            .and_then(Value::as_str)
            .expect("appraisal id present")
            .to_string();

        let finalize = router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(format!("/api/v1/appraisals/{id}/finalize"))
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router dispatch");
        assert_eq!(finalize.status(), StatusCode::OK);
        let finalized = read_json(finalize).await;
        assert_eq!(finalized.get("state"), Some(&json!("finalized")));

        let refinalize = router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(format!("/api/v1/appraisals/{id}/finalize"))
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router dispatch");
        assert_eq!(refinalize.status(), StatusCode::CONFLICT);

        let fetch = router
            .clone()
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri(format!("/api/v1/appraisals/{id}"))
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router dispatch");
        assert_eq!(fetch.status(), StatusCode::OK);
        let record = read_json(fetch).await;
        assert_eq!(
            record.pointer("/summary/shortfall_periods"),
            Some(&json!(1))
        );
        assert_eq!(record.pointer("/note"), Some(&json!("Annual cycle")));
    }

    #[tokio::test]
    async fn empty_range_appraisals_are_unprocessable() {
        let (router, _) = build_router();

        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/appraisals")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        json!({
                            "subject": "client-ghost",
                            "period_start": "2024-01",
                            "period_end": "2024-12"
                        })
                        .to_string(),
                    ))
                    .expect("request"),
            )
            .await
            .expect("router dispatch");

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = read_json(response).await;
        assert!(body
            .get("error")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .contains("no scored periods"));
    }

    #[tokio::test]
    async fn missing_appraisals_return_not_found() {
        let (router, _) = build_router();

        let response = router
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/api/v1/appraisals/appr-999999")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router dispatch");

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
