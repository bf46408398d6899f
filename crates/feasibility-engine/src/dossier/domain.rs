use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for borrower dossiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DossierId(pub String);

/// Raw borrower dossier as received from the persistence collaborator.
///
/// Every numeric field is nullable: the form wizard commits partial data and
/// the engine fills conservative defaults during intake. Tenure-gate booleans
/// stay tri-state, an absent gate is never treated as satisfied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DossierSubmission {
    #[serde(default)]
    pub persons: Vec<PersonDeclaration>,
    #[serde(default)]
    pub equity_contributions: Vec<EquityDeclaration>,
    pub property: PropertyDeclaration,
}

/// One applicant as declared in the wizard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonDeclaration {
    #[serde(default)]
    pub employment_records: Vec<EmploymentDeclaration>,
    #[serde(default)]
    pub liabilities: LiabilitiesDeclaration,
}

/// Monthly recurring obligations and offsets declared per applicant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LiabilitiesDeclaration {
    pub monthly_loan_installments: Option<f64>,
    pub monthly_leasing_installments: Option<f64>,
    pub monthly_alimony_paid: Option<f64>,
    pub monthly_rental_income: Option<f64>,
    pub active_debt_collection: Option<bool>,
}

/// One declared yearly figure, keyed by calendar year so averaging can skip
/// years preceding the declared activity/tenure start.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearlyFigure {
    pub year: i32,
    pub amount: Option<f64>,
}

/// Employment declaration, discriminated by kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "employment_kind", rename_all = "snake_case")]
pub enum EmploymentDeclaration {
    Salaried {
        income_mode: IncomeMode,
        monthly_base: Option<f64>,
        /// 12 or 13 monthly salaries per year.
        pay_frequency: Option<u8>,
        /// Prior-year annual amounts, only consulted on the irregular path.
        #[serde(default)]
        prior_year_salaries: Vec<YearlyFigure>,
        #[serde(default)]
        bonus_years: Vec<YearlyFigure>,
        tenure_start: Option<NaiveDate>,
        tenure_satisfied: Option<bool>,
    },
    SelfEmployed {
        #[serde(default)]
        net_income_years: Vec<YearlyFigure>,
        activity_start: Option<NaiveDate>,
        activity_satisfied: Option<bool>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncomeMode {
    Regular,
    Irregular,
}

/// Declared funding source, discriminated by type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source_type", rename_all = "snake_case")]
pub enum EquityDeclaration {
    LiquidAssets {
        amount: Option<f64>,
    },
    Pillar2Withdrawal {
        amount: Option<f64>,
        available_for_withdrawal: Option<f64>,
        pledged: Option<bool>,
    },
    Pillar2VestedBenefits {
        amount: Option<f64>,
    },
    Pillar3 {
        amount: Option<f64>,
        subtype: PillarThreeKind,
    },
    Donation {
        amount: Option<f64>,
    },
    InheritanceAdvance {
        amount: Option<f64>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PillarThreeKind {
    #[serde(rename = "3a")]
    Restricted3a,
    #[serde(rename = "3b")]
    Flexible3b,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyDeclaration {
    pub purchase_price: Option<f64>,
    /// Bank/appraisal estimate. Absent means the appraisal-tolerance
    /// criterion is skipped, not that the estimate is zero.
    pub bank_estimate: Option<f64>,
    pub usage: PropertyUsage,
}

/// Intended use of the property. This single field changes which equity
/// sources are admissible and which minimum ratios apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyUsage {
    PrimaryResidence,
    RentalInvestment,
}

impl PropertyUsage {
    pub const fn label(self) -> &'static str {
        match self {
            PropertyUsage::PrimaryResidence => "primary_residence",
            PropertyUsage::RentalInvestment => "rental_investment",
        }
    }
}

/// Normalized, intake-validated dossier the engine consumes. Amounts are
/// concrete and non-negative; tenure gates stay tri-state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DossierSnapshot {
    pub dossier_id: DossierId,
    pub persons: Vec<PersonProfile>,
    pub equity_contributions: Vec<EquityContribution>,
    pub property: PropertyContext,
}

impl DossierSnapshot {
    /// Index of the first person with an active debt-collection proceeding.
    pub fn active_debt_collection(&self) -> Option<usize> {
        self.persons
            .iter()
            .position(|person| person.liabilities.active_debt_collection)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonProfile {
    pub employment_records: Vec<EmploymentRecord>,
    pub liabilities: LiabilitiesProfile,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LiabilitiesProfile {
    pub monthly_loan_installments: f64,
    pub monthly_leasing_installments: f64,
    pub monthly_alimony_paid: f64,
    pub monthly_rental_income: f64,
    pub active_debt_collection: bool,
}

/// A declared yearly figure that survived intake (non-null, non-negative).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearlyAmount {
    pub year: i32,
    pub amount: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayFrequency {
    Twelve,
    Thirteen,
}

impl PayFrequency {
    pub const fn multiplier(self) -> f64 {
        match self {
            PayFrequency::Twelve => 12.0,
            PayFrequency::Thirteen => 13.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "income_mode", rename_all = "snake_case")]
pub enum SalariedIncome {
    Regular {
        monthly_base: f64,
        pay_frequency: PayFrequency,
    },
    Irregular {
        prior_year_salaries: Vec<YearlyAmount>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "employment_kind", rename_all = "snake_case")]
pub enum EmploymentRecord {
    Salaried {
        income: SalariedIncome,
        bonus_years: Vec<YearlyAmount>,
        tenure_start: Option<NaiveDate>,
        tenure_satisfied: Option<bool>,
    },
    SelfEmployed {
        net_income_years: Vec<YearlyAmount>,
        activity_start: Option<NaiveDate>,
        activity_satisfied: Option<bool>,
    },
}

impl EmploymentRecord {
    /// Minimum months of activity below which no income may be counted.
    pub fn minimum_tenure_months(&self) -> u32 {
        match self {
            EmploymentRecord::Salaried {
                income: SalariedIncome::Regular { .. },
                ..
            } => 3,
            EmploymentRecord::Salaried {
                income: SalariedIncome::Irregular { .. },
                ..
            } => 12,
            EmploymentRecord::SelfEmployed { .. } => 36,
        }
    }

    pub fn start_date(&self) -> Option<NaiveDate> {
        match self {
            EmploymentRecord::Salaried { tenure_start, .. } => *tenure_start,
            EmploymentRecord::SelfEmployed { activity_start, .. } => *activity_start,
        }
    }

    fn declared_gate(&self) -> Option<bool> {
        match self {
            EmploymentRecord::Salaried {
                tenure_satisfied, ..
            } => *tenure_satisfied,
            EmploymentRecord::SelfEmployed {
                activity_satisfied, ..
            } => *activity_satisfied,
        }
    }

    /// Resolve the tenure gate as of `on`. A declared boolean wins; when it
    /// is absent the gate is derived from the start date, and with neither
    /// fact present the gate stays unknown.
    pub fn tenure_gate(&self, on: NaiveDate) -> TenureGate {
        match self.declared_gate() {
            Some(true) => TenureGate::Satisfied,
            Some(false) => TenureGate::Failed,
            None => match self.start_date() {
                Some(start) => match start.checked_add_months(Months::new(
                    self.minimum_tenure_months(),
                )) {
                    Some(earliest) if earliest <= on => TenureGate::Satisfied,
                    _ => TenureGate::Failed,
                },
                None => TenureGate::Unknown,
            },
        }
    }

    /// Record state derived from the tenure facts. Transitions out of
    /// `Draft` only happen when the caller supplies new facts; the engine
    /// never infers them.
    pub fn state(&self, on: NaiveDate) -> RecordState {
        match self.tenure_gate(on) {
            TenureGate::Satisfied => RecordState::Complete,
            TenureGate::Failed => RecordState::Blocking,
            TenureGate::Unknown => RecordState::Draft,
        }
    }

    /// First calendar year whose declared figures are in scope for averaging.
    pub fn scope_start_year(&self) -> Option<i32> {
        self.start_date().map(|date| date.year())
    }

    pub const fn kind_label(&self) -> &'static str {
        match self {
            EmploymentRecord::Salaried { .. } => "salaried",
            EmploymentRecord::SelfEmployed { .. } => "self_employed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TenureGate {
    Satisfied,
    Failed,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordState {
    Draft,
    Complete,
    Blocking,
}

/// Normalized funding source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source_type", rename_all = "snake_case")]
pub enum EquityContribution {
    LiquidAssets {
        amount: f64,
    },
    Pillar2Withdrawal {
        amount: f64,
        available_for_withdrawal: f64,
        pledged: bool,
    },
    Pillar2VestedBenefits {
        amount: f64,
    },
    Pillar3 {
        amount: f64,
        subtype: PillarThreeKind,
    },
    Donation {
        amount: f64,
    },
    InheritanceAdvance {
        amount: f64,
    },
}

impl EquityContribution {
    pub fn amount(&self) -> f64 {
        match self {
            EquityContribution::LiquidAssets { amount }
            | EquityContribution::Pillar2Withdrawal { amount, .. }
            | EquityContribution::Pillar2VestedBenefits { amount }
            | EquityContribution::Pillar3 { amount, .. }
            | EquityContribution::Donation { amount }
            | EquityContribution::InheritanceAdvance { amount } => *amount,
        }
    }

    pub const fn source_label(&self) -> &'static str {
        match self {
            EquityContribution::LiquidAssets { .. } => "liquid_assets",
            EquityContribution::Pillar2Withdrawal { .. } => "pillar2_withdrawal",
            EquityContribution::Pillar2VestedBenefits { .. } => "pillar2_vested_benefits",
            EquityContribution::Pillar3 {
                subtype: PillarThreeKind::Restricted3a,
                ..
            } => "pillar3a",
            EquityContribution::Pillar3 {
                subtype: PillarThreeKind::Flexible3b,
                ..
            } => "pillar3b",
            EquityContribution::Donation { .. } => "donation",
            EquityContribution::InheritanceAdvance { .. } => "inheritance_advance",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyContext {
    pub purchase_price: f64,
    pub bank_estimate: Option<f64>,
    pub usage: PropertyUsage,
}

/// High level status tracked for a dossier across evaluations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DossierStatus {
    Submitted,
    Feasible,
    Infeasible,
    Blocked,
}

impl DossierStatus {
    pub const fn label(self) -> &'static str {
        match self {
            DossierStatus::Submitted => "submitted",
            DossierStatus::Feasible => "feasible",
            DossierStatus::Infeasible => "infeasible",
            DossierStatus::Blocked => "blocked",
        }
    }
}
