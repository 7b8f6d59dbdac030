use clap::Args;
use rust_decimal::Decimal;
use serde_json::{Map, Value};

use desking_core::deal::{calculator, parse, DealInputs};
use desking_core::schedule;
use desking_core::DeskingProfile;

use crate::input;

/// Deal fields shared by every deal-driven command
#[derive(Args, Debug, Default)]
pub struct DealArgs {
    /// Path to JSON or YAML deal file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Negotiated selling price
    #[arg(long, allow_hyphen_values = true)]
    pub vehicle_price: Option<Decimal>,

    /// Trade-in allowance
    #[arg(long, allow_hyphen_values = true)]
    pub trade_value: Option<Decimal>,

    /// Payoff still owed on the trade-in
    #[arg(long, allow_hyphen_values = true)]
    pub amount_owed: Option<Decimal>,

    /// Cash down at signing
    #[arg(long, allow_hyphen_values = true)]
    pub down_payment: Option<Decimal>,

    #[arg(long, allow_hyphen_values = true)]
    pub extended_warranty: Option<Decimal>,

    #[arg(long, allow_hyphen_values = true)]
    pub gap_insurance: Option<Decimal>,

    #[arg(long, allow_hyphen_values = true)]
    pub credit_life: Option<Decimal>,

    #[arg(long, allow_hyphen_values = true)]
    pub disability_insurance: Option<Decimal>,

    #[arg(long, allow_hyphen_values = true)]
    pub service_contract: Option<Decimal>,

    /// Sales tax rate in percent (9.25 = 9.25%)
    #[arg(long, allow_hyphen_values = true)]
    pub sales_tax_rate: Option<Decimal>,

    #[arg(long, allow_hyphen_values = true)]
    pub doc_fee: Option<Decimal>,

    #[arg(long, allow_hyphen_values = true)]
    pub title_fee: Option<Decimal>,

    #[arg(long, allow_hyphen_values = true)]
    pub registration_fee: Option<Decimal>,

    /// APR in percent
    #[arg(long, allow_hyphen_values = true)]
    pub interest_rate: Option<Decimal>,

    /// Number of monthly installments
    #[arg(long, allow_hyphen_values = true)]
    pub loan_term: Option<i64>,

    /// Terms to quote alongside (comma-separated, e.g. "36,48,60")
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    pub alternate_terms: Option<Vec<i64>>,
}

impl DealArgs {
    /// Only the flags that were given; the profile fills the rest.
    fn to_value(&self) -> Value {
        let mut map = Map::new();
        let money = [
            ("vehicle_price", self.vehicle_price),
            ("trade_value", self.trade_value),
            ("amount_owed_on_trade", self.amount_owed),
            ("down_payment", self.down_payment),
            ("extended_warranty", self.extended_warranty),
            ("gap_insurance", self.gap_insurance),
            ("credit_life", self.credit_life),
            ("disability_insurance", self.disability_insurance),
            ("service_contract", self.service_contract),
            ("sales_tax_rate", self.sales_tax_rate),
            ("doc_fee", self.doc_fee),
            ("title_fee", self.title_fee),
            ("registration_fee", self.registration_fee),
            ("interest_rate", self.interest_rate),
        ];
        for (key, value) in money {
            if let Some(v) = value {
                map.insert(key.into(), Value::String(v.to_string()));
            }
        }
        if let Some(term) = self.loan_term {
            map.insert("loan_term".into(), Value::from(term));
        }
        if let Some(terms) = &self.alternate_terms {
            map.insert(
                "alternate_terms".into(),
                Value::Array(terms.iter().map(|t| Value::from(*t)).collect()),
            );
        }
        Value::Object(map)
    }

    /// Resolve the deal from file, piped stdin, or flags, in that order.
    pub fn resolve(&self, profile: &DeskingProfile) -> Result<DealInputs, Box<dyn std::error::Error>> {
        let raw = if let Some(ref path) = self.input {
            input::file::read_value(path)?
        } else if let Some(data) = input::stdin::read_stdin()? {
            data
        } else {
            if self.vehicle_price.is_none() {
                return Err("--vehicle-price is required (or provide --input)".into());
            }
            self.to_value()
        };
        Ok(parse::deal_from_value(&raw, profile)?)
    }
}

/// Arguments for desking a deal
#[derive(Args)]
pub struct CalculateArgs {
    #[command(flatten)]
    pub deal: DealArgs,
}

pub fn run_calculate(
    args: CalculateArgs,
    profile: &DeskingProfile,
) -> Result<Value, Box<dyn std::error::Error>> {
    let deal = args.deal.resolve(profile)?;
    let result = calculator::calculate(&deal)?;
    Ok(serde_json::to_value(result)?)
}

/// Arguments for an amortization schedule
#[derive(Args)]
pub struct ScheduleArgs {
    #[command(flatten)]
    pub deal: DealArgs,
}

pub fn run_schedule(
    args: ScheduleArgs,
    profile: &DeskingProfile,
) -> Result<Value, Box<dyn std::error::Error>> {
    let deal = args.deal.resolve(profile)?;
    let result = schedule::build_deal_schedule(&deal)?;
    Ok(serde_json::to_value(result)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn test_flags_fill_from_profile() {
        let args = DealArgs {
            vehicle_price: Some(dec!(18500)),
            service_contract: Some(dec!(2299)),
            loan_term: Some(60),
            ..DealArgs::default()
        };
        let deal = parse::deal_from_value(&args.to_value(), &DeskingProfile::default()).unwrap();
        assert_eq!(deal.vehicle_price, dec!(18500));
        assert_eq!(deal.add_ons.service_contract, dec!(2299));
        assert_eq!(deal.loan_term, 60);
        assert_eq!(deal.fees.doc_fee, dec!(699));
    }

    #[test]
    fn test_negative_flag_reaches_validation() {
        let args = DealArgs {
            vehicle_price: Some(dec!(18500)),
            down_payment: Some(dec!(-500)),
            ..DealArgs::default()
        };
        let deal = parse::deal_from_value(&args.to_value(), &DeskingProfile::default()).unwrap();
        let err = calculator::calculate(&deal).unwrap_err();
        assert_eq!(err.field(), "down_payment");
    }

    #[test]
    fn test_owed_flag_maps_to_payoff_field() {
        let args = DealArgs {
            vehicle_price: Some(dec!(20000)),
            amount_owed: Some(dec!(3000)),
            ..DealArgs::default()
        };
        let value = args.to_value();
        assert_eq!(value["amount_owed_on_trade"], "3000");
    }
}
