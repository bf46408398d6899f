use super::domain::{
    DossierId, DossierSnapshot, DossierSubmission, EmploymentDeclaration, EmploymentRecord,
    EquityContribution, EquityDeclaration, IncomeMode, LiabilitiesDeclaration, LiabilitiesProfile,
    PayFrequency, PersonProfile, PropertyContext, PropertyDeclaration, SalariedIncome,
    YearlyAmount, YearlyFigure,
};

/// Validation errors raised at the dossier boundary. Anything the intake
/// accepts is normalized and non-negative, so the engine never re-validates.
#[derive(Debug, thiserror::Error)]
pub enum IntakeViolation {
    #[error("negative amount declared for {field}")]
    NegativeAmount { field: &'static str },
    #[error("pay frequency must be 12 or 13, found {found}")]
    InvalidPayFrequency { found: u8 },
    #[error("at most three yearly figures may be declared for {field}, found {found}")]
    TooManyYearlyFigures { field: &'static str, found: usize },
}

const MAX_YEARLY_FIGURES: usize = 3;

/// Guard converting raw submissions into normalized snapshots.
///
/// Missing amounts become zero, missing booleans become false; tenure gates
/// keep their tri-state so an unknown gate is never read as satisfied.
#[derive(Debug, Clone, Copy, Default)]
pub struct DossierIntake;

impl DossierIntake {
    pub fn snapshot_from_submission(
        &self,
        dossier_id: DossierId,
        submission: DossierSubmission,
    ) -> Result<DossierSnapshot, IntakeViolation> {
        let persons = submission
            .persons
            .into_iter()
            .map(person_profile)
            .collect::<Result<Vec<_>, _>>()?;

        let equity_contributions = submission
            .equity_contributions
            .into_iter()
            .map(equity_contribution)
            .collect::<Result<Vec<_>, _>>()?;

        let property = property_context(submission.property)?;

        Ok(DossierSnapshot {
            dossier_id,
            persons,
            equity_contributions,
            property,
        })
    }
}

fn person_profile(
    person: super::domain::PersonDeclaration,
) -> Result<PersonProfile, IntakeViolation> {
    let employment_records = person
        .employment_records
        .into_iter()
        .map(employment_record)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(PersonProfile {
        employment_records,
        liabilities: liabilities_profile(person.liabilities)?,
    })
}

fn employment_record(
    declaration: EmploymentDeclaration,
) -> Result<EmploymentRecord, IntakeViolation> {
    match declaration {
        EmploymentDeclaration::Salaried {
            income_mode,
            monthly_base,
            pay_frequency,
            prior_year_salaries,
            bonus_years,
            tenure_start,
            tenure_satisfied,
        } => {
            let income = match income_mode {
                IncomeMode::Regular => SalariedIncome::Regular {
                    monthly_base: non_negative(monthly_base, "monthly_base")?,
                    pay_frequency: frequency(pay_frequency)?,
                },
                IncomeMode::Irregular => SalariedIncome::Irregular {
                    prior_year_salaries: yearly_amounts(
                        &prior_year_salaries,
                        "prior_year_salaries",
                    )?,
                },
            };

            Ok(EmploymentRecord::Salaried {
                income,
                bonus_years: yearly_amounts(&bonus_years, "bonus_years")?,
                tenure_start,
                tenure_satisfied,
            })
        }
        EmploymentDeclaration::SelfEmployed {
            net_income_years,
            activity_start,
            activity_satisfied,
        } => Ok(EmploymentRecord::SelfEmployed {
            net_income_years: yearly_amounts(&net_income_years, "net_income_years")?,
            activity_start,
            activity_satisfied,
        }),
    }
}

fn equity_contribution(
    declaration: EquityDeclaration,
) -> Result<EquityContribution, IntakeViolation> {
    match declaration {
        EquityDeclaration::LiquidAssets { amount } => Ok(EquityContribution::LiquidAssets {
            amount: non_negative(amount, "liquid_assets.amount")?,
        }),
        EquityDeclaration::Pillar2Withdrawal {
            amount,
            available_for_withdrawal,
            pledged,
        } => Ok(EquityContribution::Pillar2Withdrawal {
            amount: non_negative(amount, "pillar2_withdrawal.amount")?,
            available_for_withdrawal: non_negative(
                available_for_withdrawal,
                "pillar2_withdrawal.available_for_withdrawal",
            )?,
            pledged: pledged.unwrap_or(false),
        }),
        EquityDeclaration::Pillar2VestedBenefits { amount } => {
            Ok(EquityContribution::Pillar2VestedBenefits {
                amount: non_negative(amount, "pillar2_vested_benefits.amount")?,
            })
        }
        EquityDeclaration::Pillar3 { amount, subtype } => Ok(EquityContribution::Pillar3 {
            amount: non_negative(amount, "pillar3.amount")?,
            subtype,
        }),
        EquityDeclaration::Donation { amount } => Ok(EquityContribution::Donation {
            amount: non_negative(amount, "donation.amount")?,
        }),
        EquityDeclaration::InheritanceAdvance { amount } => {
            Ok(EquityContribution::InheritanceAdvance {
                amount: non_negative(amount, "inheritance_advance.amount")?,
            })
        }
    }
}

fn liabilities_profile(
    declaration: LiabilitiesDeclaration,
) -> Result<LiabilitiesProfile, IntakeViolation> {
    Ok(LiabilitiesProfile {
        monthly_loan_installments: non_negative(
            declaration.monthly_loan_installments,
            "monthly_loan_installments",
        )?,
        monthly_leasing_installments: non_negative(
            declaration.monthly_leasing_installments,
            "monthly_leasing_installments",
        )?,
        monthly_alimony_paid: non_negative(
            declaration.monthly_alimony_paid,
            "monthly_alimony_paid",
        )?,
        monthly_rental_income: non_negative(
            declaration.monthly_rental_income,
            "monthly_rental_income",
        )?,
        active_debt_collection: declaration.active_debt_collection.unwrap_or(false),
    })
}

fn property_context(declaration: PropertyDeclaration) -> Result<PropertyContext, IntakeViolation> {
    let bank_estimate = declaration
        .bank_estimate
        .map(|value| {
            if value < 0.0 {
                Err(IntakeViolation::NegativeAmount {
                    field: "bank_estimate",
                })
            } else {
                Ok(value)
            }
        })
        .transpose()?;

    Ok(PropertyContext {
        purchase_price: non_negative(declaration.purchase_price, "purchase_price")?,
        bank_estimate,
        usage: declaration.usage,
    })
}

fn frequency(value: Option<u8>) -> Result<PayFrequency, IntakeViolation> {
    match value.unwrap_or(12) {
        12 => Ok(PayFrequency::Twelve),
        13 => Ok(PayFrequency::Thirteen),
        found => Err(IntakeViolation::InvalidPayFrequency { found }),
    }
}

fn non_negative(value: Option<f64>, field: &'static str) -> Result<f64, IntakeViolation> {
    let value = value.unwrap_or(0.0);
    if value < 0.0 {
        return Err(IntakeViolation::NegativeAmount { field });
    }
    Ok(value)
}

/// Null entries are dropped rather than counted as zero years.
fn yearly_amounts(
    figures: &[YearlyFigure],
    field: &'static str,
) -> Result<Vec<YearlyAmount>, IntakeViolation> {
    if figures.len() > MAX_YEARLY_FIGURES {
        return Err(IntakeViolation::TooManyYearlyFigures {
            field,
            found: figures.len(),
        });
    }

    figures
        .iter()
        .filter_map(|figure| {
            figure.amount.map(|amount| {
                if amount < 0.0 {
                    Err(IntakeViolation::NegativeAmount { field })
                } else {
                    Ok(YearlyAmount {
                        year: figure.year,
                        amount,
                    })
                }
            })
        })
        .collect()
}
