use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Money, Months, Percent};

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

/// Optional F&I products financed with the vehicle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AddOns {
    #[serde(alias = "extendedWarranty")]
    pub extended_warranty: Money,
    #[serde(alias = "gapInsurance")]
    pub gap_insurance: Money,
    #[serde(alias = "creditLife")]
    pub credit_life: Money,
    #[serde(alias = "disabilityInsurance")]
    pub disability_insurance: Money,
    #[serde(alias = "serviceContract")]
    pub service_contract: Money,
}

impl AddOns {
    pub const FIELDS: [&'static str; 5] = [
        "extended_warranty",
        "gap_insurance",
        "credit_life",
        "disability_insurance",
        "service_contract",
    ];

    /// (name, amount) pairs in display order.
    pub fn items(&self) -> [(&'static str, Money); 5] {
        [
            ("extended_warranty", self.extended_warranty),
            ("gap_insurance", self.gap_insurance),
            ("credit_life", self.credit_life),
            ("disability_insurance", self.disability_insurance),
            ("service_contract", self.service_contract),
        ]
    }

    pub fn total(&self) -> Money {
        self.items().iter().map(|(_, v)| *v).sum()
    }
}

/// Flat, untaxed charges.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Fees {
    #[serde(alias = "docFee")]
    pub doc_fee: Money,
    #[serde(alias = "titleFee")]
    pub title_fee: Money,
    #[serde(alias = "registrationFee")]
    pub registration_fee: Money,
}

impl Fees {
    pub const FIELDS: [&'static str; 3] = ["doc_fee", "title_fee", "registration_fee"];

    pub fn items(&self) -> [(&'static str, Money); 3] {
        [
            ("doc_fee", self.doc_fee),
            ("title_fee", self.title_fee),
            ("registration_fee", self.registration_fee),
        ]
    }

    pub fn total(&self) -> Money {
        self.items().iter().map(|(_, v)| *v).sum()
    }
}

/// One snapshot of the desk's deal structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealInputs {
    /// Negotiated selling price
    #[serde(alias = "vehiclePrice")]
    pub vehicle_price: Money,
    /// Appraised trade-in allowance
    #[serde(default, alias = "tradeValue")]
    pub trade_value: Money,
    /// Payoff still owed on the trade-in
    #[serde(default, alias = "amountOwedOnTrade")]
    pub amount_owed_on_trade: Money,
    /// Cash due at signing
    #[serde(default, alias = "downPayment")]
    pub down_payment: Money,
    #[serde(default, alias = "addOns")]
    pub add_ons: AddOns,
    /// Sales tax in percent (9.25 = 9.25%)
    #[serde(alias = "salesTaxRate")]
    pub sales_tax_rate: Percent,
    #[serde(default)]
    pub fees: Fees,
    /// Nominal APR in percent
    #[serde(alias = "interestRate")]
    pub interest_rate: Percent,
    /// Number of monthly installments
    #[serde(alias = "loanTerm")]
    pub loan_term: Months,
    /// Extra terms to quote at the same principal and rate
    #[serde(
        default,
        alias = "alternateTerms",
        skip_serializing_if = "Option::is_none"
    )]
    pub alternate_terms: Option<Vec<Months>>,
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// Monthly payment quoted at a term other than the deal's own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermPayment {
    pub loan_term: Months,
    pub monthly_payment: Money,
    pub total_of_payments: Money,
}

/// Every add-on and fee echoed by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealBreakdown {
    pub extended_warranty: Money,
    pub gap_insurance: Money,
    pub credit_life: Money,
    pub disability_insurance: Money,
    pub service_contract: Money,
    pub doc_fee: Money,
    pub title_fee: Money,
    pub registration_fee: Money,
}

impl DealBreakdown {
    pub fn new(add_ons: &AddOns, fees: &Fees) -> Self {
        Self {
            extended_warranty: add_ons.extended_warranty,
            gap_insurance: add_ons.gap_insurance,
            credit_life: add_ons.credit_life,
            disability_insurance: add_ons.disability_insurance,
            service_contract: add_ons.service_contract,
            doc_fee: fees.doc_fee,
            title_fee: fees.title_fee,
            registration_fee: fees.registration_fee,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealResult {
    // Echoed inputs
    pub vehicle_price: Money,
    pub trade_value: Money,
    pub amount_owed_on_trade: Money,
    pub down_payment: Money,
    pub sales_tax_rate: Percent,
    pub interest_rate: Percent,
    pub loan_term: Months,
    // Derived
    /// Trade allowance less payoff; negative when the customer is upside down
    pub net_trade_difference: Money,
    pub total_add_ons: Money,
    pub taxable_base: Money,
    pub sales_tax: Money,
    pub total_fees: Money,
    pub total_amount_financed: Money,
    pub monthly_payment: Money,
    pub total_of_payments: Money,
    pub finance_charge: Money,
    pub alternate_terms: Vec<TermPayment>,
    pub breakdown: DealBreakdown,
}

impl DealResult {
    pub fn has_negative_equity(&self) -> bool {
        self.net_trade_difference < Decimal::ZERO
    }
}
