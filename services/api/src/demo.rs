use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::NaiveDate;
use clap::Args;

use scorecard::appraisal::{
    AppraisalService, AppraisalServiceError, RecommendationOutcome, YearlySummary,
};
use scorecard::error::AppError;
use scorecard::scoring::{
    CurrentSubmission, EngineConfig, LearningEntry, LegacySubmissionImporter,
    LowPerformerVerdict, Metric, PeriodKey, PeriodScore, RawMetricValue, ScoringEngine,
    SubjectId, SubmissionRecord,
};

use crate::infra::InMemoryPerformanceRepository;

#[derive(clap::ValueEnum, Clone, Copy, Debug, Default)]
pub(crate) enum DomainArg {
    #[default]
    Employee,
    Seo,
}

impl DomainArg {
    fn engine_config(self) -> EngineConfig {
        match self {
            DomainArg::Employee => EngineConfig::employee(),
            DomainArg::Seo => EngineConfig::seo(),
        }
    }

    fn label(self) -> &'static str {
        match self {
            DomainArg::Employee => "employee",
            DomainArg::Seo => "seo",
        }
    }
}

#[derive(Args, Debug)]
pub(crate) struct YearlyReportArgs {
    /// Legacy submissions CSV export to score
    #[arg(long)]
    pub(crate) csv: PathBuf,
    /// Restrict the report to a single subject (exact name)
    #[arg(long)]
    pub(crate) subject: Option<String>,
    /// Scoring domain preset applied to the imported rows
    #[arg(long, value_enum, default_value_t)]
    pub(crate) domain: DomainArg,
    /// Ignore periods before this month (YYYY-MM)
    #[arg(long, value_parser = crate::infra::parse_period)]
    pub(crate) from: Option<PeriodKey>,
    /// Ignore periods after this month (YYYY-MM)
    #[arg(long, value_parser = crate::infra::parse_period)]
    pub(crate) to: Option<PeriodKey>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Skip the SEO client scoring portion of the demo
    #[arg(long)]
    pub(crate) skip_seo: bool,
}

pub(crate) fn run_yearly_report(args: YearlyReportArgs) -> Result<(), AppError> {
    let YearlyReportArgs {
        csv,
        subject,
        domain,
        from,
        to,
    } = args;

    let engine = ScoringEngine::new(domain.engine_config());
    let imported = LegacySubmissionImporter::from_path(csv)?;

    let mut by_subject: BTreeMap<SubjectId, Vec<PeriodScore>> = BTreeMap::new();
    for row in imported {
        if let Some(only) = &subject {
            if row.subject.0 != *only {
                continue;
            }
        }

        let score = engine
            .score_period(
                row.subject.clone(),
                &SubmissionRecord::Legacy(row.submission),
            )
            .map_err(AppraisalServiceError::from)?;

        if from.as_ref().is_some_and(|start| score.period < *start) {
            continue;
        }
        if to.as_ref().is_some_and(|end| score.period > *end) {
            continue;
        }

        by_subject.entry(row.subject).or_default().push(score);
    }

    if by_subject.is_empty() {
        println!("No matching submissions in the export.");
        return Ok(());
    }

    println!("Yearly performance report ({} domain)", domain.label());
    for (subject, mut periods) in by_subject {
        periods.sort_by(|a, b| a.period.cmp(&b.period));
        let Some(summary) = YearlySummary::from_periods(&periods, engine.config()) else {
            continue;
        };
        render_subject_report(&engine, &subject, &periods, &summary);
    }

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    println!("Performance scoring demo");

    println!("\nEmployee monthly scoring (ten-point domain)");
    let repository = Arc::new(InMemoryPerformanceRepository::default());
    let service = Arc::new(AppraisalService::new(
        repository.clone(),
        EngineConfig::employee(),
    ));

    let priya = SubjectId("Priya Sharma".to_string());
    for (month, kpi, relationship, learning_minutes) in [
        (1u32, 8.0, 9.0, 420u32),
        (2, 7.5, 8.5, 300),
        (3, 8.5, 9.0, 400),
        (4, 9.0, 8.0, 390),
        (5, 8.0, 8.5, 430),
        (6, 8.5, 9.5, 410),
    ] {
        let score = service
            .submit_period(
                priya.clone(),
                &demo_submission(month, kpi, relationship, learning_minutes),
            )
            .map_err(AppError::from)?;
        println!(
            "- {}: overall {:.2} ({} metrics, {} learning min)",
            score.period,
            score.overall,
            score.metrics.len(),
            score.learning_minutes
        );
    }

    if let Some((summary, recommendations)) = service.subject_report(&priya)? {
        let engine = service.engine();
        println!("\nYearly summary for {}", priya);
        render_subject_summary(engine, &summary);
        render_recommendations(&recommendations);
    }

    let record = service.build_appraisal(
        priya.clone(),
        PeriodKey::from_date(demo_month(1)),
        PeriodKey::from_date(demo_month(6)),
        Some("Mid-year review cycle".to_string()),
    )?;
    println!(
        "\nDraft appraisal {} -> band {} ({}% increment)",
        record.id, record.rating.label, record.rating.increment_pct
    );

    let finalized = service.finalize(&record.id)?;
    match serde_json::to_string_pretty(&finalized.status_view()) {
        Ok(json) => println!("Finalized appraisal payload:\n{json}"),
        Err(err) => println!("Finalized appraisal payload unavailable: {err}"),
    }

    println!("\nLow-performer detection");
    let dev = SubjectId("Dev Patel".to_string());
    service
        .submit_period(dev.clone(), &demo_submission(6, 4.0, 4.5, 120))
        .map_err(AppError::from)?;
    render_verdict(&dev, &service.low_performer(&dev)?);

    if args.skip_seo {
        return Ok(());
    }

    println!("\nSEO client scoring (hundred-point domain)");
    let seo_repository = Arc::new(InMemoryPerformanceRepository::default());
    let seo_service = Arc::new(AppraisalService::new(
        seo_repository,
        EngineConfig::seo(),
    ));

    let client = SubjectId("Meridian Plumbing".to_string());
    for (month, month_score) in [(1u32, 62.0), (2, 58.0)] {
        seo_service
            .submit_period(client.clone(), &seo_submission(month, month_score))
            .map_err(AppError::from)?;
    }
    render_verdict(&client, &seo_service.low_performer(&client)?);

    if let Some((summary, recommendations)) = seo_service.subject_report(&client)? {
        render_subject_summary(seo_service.engine(), &summary);
        render_recommendations(&recommendations);
    }

    Ok(())
}

fn demo_month(month: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, month, 1).unwrap_or(NaiveDate::MAX)
}

fn demo_submission(
    month: u32,
    kpi: f64,
    relationship: f64,
    learning_minutes: u32,
) -> SubmissionRecord {
    SubmissionRecord::Current(CurrentSubmission {
        submission_month: demo_month(month),
        metrics: BTreeMap::from([
            (Metric::kpi(), RawMetricValue::Number(kpi)),
            (Metric::relationship(), RawMetricValue::Number(relationship)),
        ]),
        learning: vec![LearningEntry {
            topic: "Monthly learning block".to_string(),
            url: "https://learning.example.com/catalog".to_string(),
            applied_where: "Client delivery".to_string(),
            minutes: learning_minutes,
        }],
        manager_score: Some(RawMetricValue::Number(8.0)),
        mentor_score: None,
    })
}

fn seo_submission(month: u32, month_score: f64) -> SubmissionRecord {
    SubmissionRecord::Current(CurrentSubmission {
        submission_month: demo_month(month),
        metrics: BTreeMap::from([(
            Metric::new("month_score"),
            RawMetricValue::Number(month_score),
        )]),
        learning: Vec::new(),
        manager_score: None,
        mentor_score: None,
    })
}

fn render_subject_report(
    engine: &ScoringEngine,
    subject: &SubjectId,
    periods: &[PeriodScore],
    summary: &YearlySummary,
) {
    println!("\n{subject}");
    for period in periods {
        println!("- {}: overall {:.2}", period.period, period.overall);
    }
    render_subject_summary(engine, summary);
    let recommendations = RecommendationOutcome::from_summary(summary, engine.config());
    render_recommendations(&recommendations);
    render_verdict(subject, &engine.low_performer(periods));
}

fn render_subject_summary(engine: &ScoringEngine, summary: &YearlySummary) {
    let band = engine.classify(summary.average_overall);
    println!(
        "Average overall {:.1} over {} period(s) -> band {} ({})",
        summary.average_overall, summary.total_periods, band.label, band.description
    );
    for (metric, average) in &summary.metric_averages {
        println!("  avg {metric}: {average:.1}");
    }
    if summary.shortfall_periods > 0 {
        println!(
            "  learning shortfall in {} period(s)",
            summary.shortfall_periods
        );
    }
}

fn render_recommendations(outcome: &RecommendationOutcome) {
    match outcome {
        RecommendationOutcome::Improvements { items } => {
            println!("Recommendations:");
            for item in items {
                println!("  {}. {}", item.priority, item.advice);
            }
        }
        RecommendationOutcome::OnTrack { message } => println!("Recommendations: {message}"),
    }
}

fn render_verdict(subject: &SubjectId, verdict: &LowPerformerVerdict) {
    match verdict {
        LowPerformerVerdict::Flagged {
            rolling_average,
            window,
        } => println!(
            "- {subject}: flagged low performer (rolling avg {rolling_average:.2} over {window} period(s))"
        ),
        LowPerformerVerdict::Clear {
            rolling_average,
            window,
        } => println!(
            "- {subject}: clear (rolling avg {rolling_average:.2} over {window} period(s))"
        ),
        LowPerformerVerdict::InsufficientData {
            available,
            required,
        } => println!(
            "- {subject}: insufficient history ({available} of {required} required period(s))"
        ),
    }
}
