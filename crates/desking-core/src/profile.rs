//! Dealer profile: the defaults a desk starts every deal from.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::amortization::validate_term;
use crate::deal::model::Fees;
use crate::error::DeskingError;
use crate::types::{Money, Months, Percent};
use crate::DeskingResult;

/// Largest monetary amount accepted anywhere in a deal.
pub const MAX_MONEY: Money = dec!(1_000_000_000_000);

/// Rates above this are priced but flagged in the warnings.
pub const HIGH_RATE_PERCENT: Percent = dec!(100);

pub const DEFAULT_ALTERNATE_TERMS: [Months; 3] = [48, 60, 84];

/// Per-dealer defaults for taxes, fees and finance terms.
///
/// Fields missing from a deal request are filled from the active profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeskingProfile {
    pub name: String,
    #[serde(alias = "salesTaxRate")]
    pub sales_tax_rate: Percent,
    #[serde(alias = "docFee")]
    pub doc_fee: Money,
    #[serde(alias = "titleFee")]
    pub title_fee: Money,
    #[serde(alias = "registrationFee")]
    pub registration_fee: Money,
    #[serde(alias = "interestRate")]
    pub interest_rate: Percent,
    #[serde(alias = "loanTerm")]
    pub loan_term: Months,
    #[serde(alias = "alternateTerms")]
    pub alternate_terms: Vec<Months>,
}

impl Default for DeskingProfile {
    fn default() -> Self {
        Self {
            name: "default".into(),
            sales_tax_rate: dec!(9.25),
            doc_fee: dec!(699),
            title_fee: dec!(75),
            registration_fee: dec!(24),
            interest_rate: dec!(7.5),
            loan_term: 72,
            alternate_terms: DEFAULT_ALTERNATE_TERMS.to_vec(),
        }
    }
}

impl DeskingProfile {
    pub fn fees(&self) -> Fees {
        Fees {
            doc_fee: self.doc_fee,
            title_fee: self.title_fee,
            registration_fee: self.registration_fee,
        }
    }

    pub fn validate(&self) -> DeskingResult<()> {
        check_percent("sales_tax_rate", self.sales_tax_rate)?;
        check_percent("interest_rate", self.interest_rate)?;
        check_money("doc_fee", self.doc_fee)?;
        check_money("title_fee", self.title_fee)?;
        check_money("registration_fee", self.registration_fee)?;
        validate_term(self.loan_term)?;
        for term in &self.alternate_terms {
            validate_term(*term)?;
        }
        Ok(())
    }
}

/// Non-negative and within [`MAX_MONEY`].
pub(crate) fn check_money(field: &str, value: Money) -> DeskingResult<()> {
    if value < Decimal::ZERO {
        return Err(DeskingError::invalid_input(field, "must not be negative"));
    }
    if value > MAX_MONEY {
        return Err(DeskingError::invalid_input(
            field,
            format!("must not exceed {MAX_MONEY}"),
        ));
    }
    Ok(())
}

pub(crate) fn check_percent(field: &str, value: Percent) -> DeskingResult<()> {
    if value < Decimal::ZERO {
        return Err(DeskingError::invalid_input(field, "must not be negative"));
    }
    Ok(())
}

/// Warning text for a rate above [`HIGH_RATE_PERCENT`], if any.
pub(crate) fn high_rate_warning(field: &str, value: Percent) -> Option<String> {
    (value > HIGH_RATE_PERCENT).then(|| format!("{field} of {value}% is above {HIGH_RATE_PERCENT}%"))
}
