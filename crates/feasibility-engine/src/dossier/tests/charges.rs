use super::common::*;
use crate::dossier::domain::{LiabilitiesProfile, PersonProfile};
use crate::dossier::evaluation::charges::compute;

fn person_with_liabilities(liabilities: LiabilitiesProfile) -> PersonProfile {
    PersonProfile {
        employment_records: Vec::new(),
        liabilities,
    }
}

#[test]
fn no_amortization_at_or_below_two_thirds_ltv() {
    // 666,667 loan on a 1M property sits at the threshold boundary.
    let assessment = compute(1_000_000.0, 333_333.0, &[], &policy());

    assert_eq!(assessment.loan_amount, 666_667.0);
    assert!(assessment.amortization_annual < 0.1);
}

#[test]
fn excess_over_two_thirds_is_amortized_over_fifteen_years() {
    let assessment = compute(1_000_000.0, 300_000.0, &[], &policy());

    assert_eq!(assessment.loan_amount, 700_000.0);
    let expected = (700_000.0 - 1_000_000.0 * (2.0 / 3.0)) / 15.0;
    assert!((assessment.amortization_annual - expected).abs() < 1e-9);
    assert!((assessment.amortization_annual - 2_222.2).abs() < 0.1);
}

#[test]
fn equity_covering_the_full_price_leaves_no_loan() {
    let assessment = compute(500_000.0, 600_000.0, &[], &policy());

    assert_eq!(assessment.loan_amount, 0.0);
    assert_eq!(assessment.theoretical_interest, 0.0);
    assert_eq!(assessment.amortization_annual, 0.0);
    // Maintenance is tied to the price, not the loan.
    assert_eq!(assessment.maintenance, 5_000.0);
}

#[test]
fn recurring_liabilities_are_annualized_across_persons() {
    let persons = vec![
        person_with_liabilities(LiabilitiesProfile {
            monthly_loan_installments: 400.0,
            monthly_leasing_installments: 300.0,
            monthly_alimony_paid: 0.0,
            monthly_rental_income: 1_000.0,
            active_debt_collection: false,
        }),
        person_with_liabilities(LiabilitiesProfile {
            monthly_loan_installments: 0.0,
            monthly_leasing_installments: 0.0,
            monthly_alimony_paid: 500.0,
            monthly_rental_income: 0.0,
            active_debt_collection: false,
        }),
    ];

    let assessment = compute(800_000.0, 800_000.0, &persons, &policy());

    // Rental income belongs to the income side, not to charges.
    assert_eq!(assessment.liabilities_annual, (400.0 + 300.0 + 500.0) * 12.0);
}

#[test]
fn annual_charges_sum_all_components() {
    let persons = vec![person_with_liabilities(LiabilitiesProfile {
        monthly_loan_installments: 250.0,
        ..LiabilitiesProfile::default()
    })];

    let assessment = compute(1_000_000.0, 200_000.0, &persons, &policy());

    assert_eq!(assessment.loan_amount, 800_000.0);
    assert_eq!(assessment.theoretical_interest, 40_000.0);
    assert_eq!(assessment.maintenance, 10_000.0);
    let expected_amortization = (800_000.0 - 1_000_000.0 * (2.0 / 3.0)) / 15.0;
    assert!((assessment.amortization_annual - expected_amortization).abs() < 1e-9);
    assert_eq!(assessment.liabilities_annual, 3_000.0);
    let total = assessment.theoretical_interest
        + assessment.maintenance
        + assessment.amortization_annual
        + assessment.liabilities_annual;
    assert!((assessment.annual_charges - total).abs() < 1e-9);
}
