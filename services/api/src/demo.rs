use crate::infra::{default_lending_policy, InMemoryDossierRepository, InMemoryNotifier};
use chrono::{Local, NaiveDate};
use clap::Args;
use feasibility_engine::dossier::{
    DossierSubmission, EmploymentDeclaration, EquityDeclaration, FeasibilityService, IncomeMode,
    LiabilitiesDeclaration, PersonDeclaration, PillarThreeKind, PropertyDeclaration, PropertyUsage,
    Verdict, YearlyFigure,
};
use feasibility_engine::error::AppError;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct EvaluateArgs {
    /// Path to a JSON dossier submission
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Evaluation date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) date: Option<NaiveDate>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Override the evaluation date for every scenario (defaults to today).
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) date: Option<NaiveDate>,
}

pub(crate) fn run_evaluate(args: EvaluateArgs) -> Result<(), AppError> {
    let EvaluateArgs { input, date } = args;

    let raw = std::fs::read_to_string(&input)?;
    let submission: DossierSubmission = serde_json::from_str(&raw)?;
    let on = date.unwrap_or_else(|| Local::now().date_naive());

    let service = build_service();
    match service.simulate(submission, on) {
        Ok(verdict) => println!("{}", serde_json::to_string_pretty(&verdict)?),
        Err(err) => println!("Submission rejected: {err}"),
    }

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let on = args.date.unwrap_or_else(|| Local::now().date_naive());

    println!("Mortgage feasibility demo (evaluated {on})");

    let repository = Arc::new(InMemoryDossierRepository::default());
    let notifier = Arc::new(InMemoryNotifier::default());
    let service = Arc::new(FeasibilityService::new(
        repository,
        notifier.clone(),
        default_lending_policy(),
    ));

    let scenarios = [
        ("Primary residence, solid funding", feasible_scenario()),
        ("Stretched affordability", stretched_scenario()),
        (
            "Rental purchase funded with pension savings",
            rental_scenario(),
        ),
    ];

    let mut submitted = Vec::new();
    for (label, submission) in scenarios {
        match service.submit(submission) {
            Ok(record) => {
                let view = record.status_view();
                println!(
                    "Received dossier {} ({label}) -> status {}",
                    view.dossier_id.0, view.status
                );
                submitted.push((label, record.snapshot.dossier_id.clone()));
            }
            Err(err) => println!("Submission rejected ({label}): {err}"),
        }
    }

    match service.evaluate_pending(on, submitted.len()) {
        Ok(verdicts) => {
            for (label, dossier_id) in &submitted {
                println!("\n=== {label} ===");
                match verdicts
                    .iter()
                    .find(|verdict| &verdict.dossier_id == dossier_id)
                {
                    Some(verdict) => render_verdict(verdict),
                    None => println!("Evaluation unavailable"),
                }
            }
        }
        Err(err) => println!("Evaluation unavailable: {err}"),
    }

    let events = notifier.events();
    if events.is_empty() {
        println!("\nExternal alerts: none dispatched");
    } else {
        println!("\nExternal alerts:");
        for alert in events {
            println!("  - template={} -> {}", alert.template, alert.dossier_id.0);
        }
    }

    Ok(())
}

fn render_verdict(verdict: &Verdict) {
    println!(
        "Decision: {}",
        if verdict.feasible {
            "feasible"
        } else {
            "not feasible"
        }
    );
    println!("Rationale: {}", verdict.headline());

    if let Some(ratios) = &verdict.ratios {
        println!(
            "Ratios: total equity {:.4} | hard equity {:.4} | affordability {:.4}",
            ratios.equity_total, ratios.equity_hard, ratios.affordability
        );
        if let Some(price_to_estimate) = ratios.price_to_estimate {
            println!("  price over bank estimate {price_to_estimate:.4}");
        }
    }

    if !verdict.criteria.is_empty() {
        println!("Criteria:");
        for report in &verdict.criteria {
            let mark = if report.passed { "pass" } else { "FAIL" };
            println!("  - [{mark}] {}", report.note);
        }
    }

    if let Some(equity) = &verdict.equity {
        println!(
            "Equity sources (eligible {:.0} / hard {:.0}):",
            equity.total_eligible, equity.total_hard
        );
        for tag in &equity.tags {
            match &tag.ineligibility {
                Some(reason) => println!(
                    "  - {}: {:.0} declared, not counted ({})",
                    tag.source,
                    tag.declared_amount,
                    reason.summary()
                ),
                None => println!(
                    "  - {}: {:.0} counted{}",
                    tag.source,
                    tag.counted_amount,
                    if tag.hard { " (hard)" } else { "" }
                ),
            }
        }
    }
}

fn build_service() -> FeasibilityService<InMemoryDossierRepository, InMemoryNotifier> {
    FeasibilityService::new(
        Arc::new(InMemoryDossierRepository::default()),
        Arc::new(InMemoryNotifier::default()),
        default_lending_policy(),
    )
}

fn salaried(monthly_base: f64, pay_frequency: u8) -> EmploymentDeclaration {
    EmploymentDeclaration::Salaried {
        income_mode: IncomeMode::Regular,
        monthly_base: Some(monthly_base),
        pay_frequency: Some(pay_frequency),
        prior_year_salaries: Vec::new(),
        bonus_years: Vec::new(),
        tenure_start: None,
        tenure_satisfied: Some(true),
    }
}

fn feasible_scenario() -> DossierSubmission {
    DossierSubmission {
        persons: vec![PersonDeclaration {
            employment_records: vec![EmploymentDeclaration::Salaried {
                income_mode: IncomeMode::Regular,
                monthly_base: Some(10_000.0),
                pay_frequency: Some(13),
                prior_year_salaries: Vec::new(),
                bonus_years: vec![
                    YearlyFigure {
                        year: 2023,
                        amount: Some(8_000.0),
                    },
                    YearlyFigure {
                        year: 2024,
                        amount: Some(10_000.0),
                    },
                ],
                tenure_start: None,
                tenure_satisfied: Some(true),
            }],
            liabilities: LiabilitiesDeclaration::default(),
        }],
        equity_contributions: vec![EquityDeclaration::LiquidAssets {
            amount: Some(200_000.0),
        }],
        property: PropertyDeclaration {
            purchase_price: Some(800_000.0),
            bank_estimate: Some(840_000.0),
            usage: PropertyUsage::PrimaryResidence,
        },
    }
}

fn stretched_scenario() -> DossierSubmission {
    DossierSubmission {
        persons: vec![PersonDeclaration {
            employment_records: vec![salaried(9_000.0, 12)],
            liabilities: LiabilitiesDeclaration::default(),
        }],
        equity_contributions: vec![
            EquityDeclaration::LiquidAssets {
                amount: Some(150_000.0),
            },
            EquityDeclaration::Pillar3 {
                amount: Some(60_000.0),
                subtype: PillarThreeKind::Restricted3a,
            },
        ],
        property: PropertyDeclaration {
            purchase_price: Some(1_000_000.0),
            bank_estimate: Some(1_020_000.0),
            usage: PropertyUsage::PrimaryResidence,
        },
    }
}

fn rental_scenario() -> DossierSubmission {
    DossierSubmission {
        persons: vec![PersonDeclaration {
            employment_records: vec![salaried(12_000.0, 13)],
            liabilities: LiabilitiesDeclaration {
                monthly_rental_income: Some(2_400.0),
                ..LiabilitiesDeclaration::default()
            },
        }],
        equity_contributions: vec![
            EquityDeclaration::LiquidAssets {
                amount: Some(200_000.0),
            },
            EquityDeclaration::Pillar3 {
                amount: Some(80_000.0),
                subtype: PillarThreeKind::Restricted3a,
            },
        ],
        property: PropertyDeclaration {
            purchase_price: Some(900_000.0),
            bank_estimate: None,
            usage: PropertyUsage::RentalInvestment,
        },
    }
}
