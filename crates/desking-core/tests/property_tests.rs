use desking_core::deal::{calculate, AddOns, DealInputs, Fees};
use proptest::prelude::*;
use rust_decimal::Decimal;

/// Whole cents as a Decimal.
fn cents(c: u64) -> Decimal {
    Decimal::new(c as i64, 2)
}

prop_compose! {
    fn arb_deal()(
        price in 0u64..15_000_000,
        trade in 0u64..5_000_000,
        owed in 0u64..5_000_000,
        down in 0u64..5_000_000,
        warranty in 0u64..500_000,
        gap in 0u64..200_000,
        tax_bp in 0u32..1_500,
        doc in 0u64..100_000,
        apr_bp in 0u32..3_000,
        term_idx in 0usize..5,
    ) -> DealInputs {
        DealInputs {
            vehicle_price: cents(price),
            trade_value: cents(trade),
            amount_owed_on_trade: cents(owed),
            down_payment: cents(down),
            add_ons: AddOns {
                extended_warranty: cents(warranty),
                gap_insurance: cents(gap),
                ..AddOns::default()
            },
            sales_tax_rate: Decimal::new(tax_bp as i64, 2),
            fees: Fees {
                doc_fee: cents(doc),
                ..Fees::default()
            },
            interest_rate: Decimal::new(apr_bp as i64, 2),
            loan_term: [36, 48, 60, 72, 84][term_idx],
            alternate_terms: None,
        }
    }
}

proptest! {
    #[test]
    fn prop_higher_price_never_lowers_payment(deal in arb_deal(), bump in 1u64..1_000_000) {
        let base = calculate(&deal).unwrap().result;
        let pricier = DealInputs { vehicle_price: deal.vehicle_price + cents(bump), ..deal };
        let bumped = calculate(&pricier).unwrap().result;
        prop_assert!(bumped.monthly_payment >= base.monthly_payment);
    }

    #[test]
    fn prop_more_down_never_raises_payment(deal in arb_deal(), extra in 1u64..1_000_000) {
        let base = calculate(&deal).unwrap().result;
        let more_down = DealInputs { down_payment: deal.down_payment + cents(extra), ..deal };
        let after = calculate(&more_down).unwrap().result;
        prop_assert!(after.monthly_payment <= base.monthly_payment);
    }

    #[test]
    fn prop_outputs_non_negative(deal in arb_deal()) {
        let d = calculate(&deal).unwrap().result;
        prop_assert!(d.taxable_base >= Decimal::ZERO);
        prop_assert!(d.sales_tax >= Decimal::ZERO);
        prop_assert!(d.total_amount_financed >= Decimal::ZERO);
        prop_assert!(d.monthly_payment >= Decimal::ZERO);
        prop_assert!(d.finance_charge >= Decimal::ZERO);
        prop_assert!(d.alternate_terms.iter().all(|t| t.monthly_payment >= Decimal::ZERO));
    }

    #[test]
    fn prop_monetary_outputs_have_at_most_two_places(deal in arb_deal()) {
        let d = calculate(&deal).unwrap().result;
        for v in [d.sales_tax, d.total_amount_financed, d.monthly_payment, d.total_of_payments] {
            prop_assert!(v.scale() <= 2, "{} has scale {}", v, v.scale());
        }
    }

    #[test]
    fn prop_zero_rate_is_principal_over_term(deal in arb_deal()) {
        let zero = DealInputs { interest_rate: Decimal::ZERO, ..deal };
        let d = calculate(&zero).unwrap().result;
        let expected = d.total_amount_financed / Decimal::from(d.loan_term);
        prop_assert!((d.monthly_payment - expected).abs() <= Decimal::new(5, 3));
    }

    #[test]
    fn prop_credits_beyond_total_finance_nothing(deal in arb_deal()) {
        let first = calculate(&deal).unwrap().result;
        let overpaid = DealInputs {
            amount_owed_on_trade: Decimal::ZERO,
            down_payment: deal.vehicle_price + first.total_add_ons + first.sales_tax
                + first.total_fees + Decimal::ONE,
            ..deal
        };
        let d = calculate(&overpaid).unwrap().result;
        prop_assert_eq!(d.total_amount_financed, Decimal::ZERO);
        prop_assert_eq!(d.monthly_payment, Decimal::ZERO);
    }

    #[test]
    fn prop_calculation_is_idempotent(deal in arb_deal()) {
        prop_assert_eq!(calculate(&deal).unwrap(), calculate(&deal).unwrap());
    }
}
