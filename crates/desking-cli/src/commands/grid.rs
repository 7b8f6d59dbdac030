use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use desking_core::grid::{self, GridField, GridVariable, PaymentGridInput};
use desking_core::deal::parse;
use desking_core::{DeskingError, DeskingProfile};

use crate::commands::deal::DealArgs;
use crate::input;

/// Arguments for a payment grid
#[derive(Args)]
pub struct GridArgs {
    /// Path to JSON or YAML grid file ({deal, rows, terms}); overrides flags
    #[arg(long)]
    pub grid: Option<String>,

    /// Deal variable swept down the rows
    #[arg(long, value_enum, default_value = "down-payment")]
    pub vary: VaryField,

    /// First row value
    #[arg(long)]
    pub min: Option<Decimal>,

    /// Last row value
    #[arg(long)]
    pub max: Option<Decimal>,

    /// Row increment
    #[arg(long)]
    pub step: Option<Decimal>,

    /// Column terms (comma-separated); standard menu when omitted
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    pub terms: Option<Vec<i64>>,

    #[command(flatten)]
    pub deal: DealArgs,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum VaryField {
    DownPayment,
    TradeValue,
    VehiclePrice,
    InterestRate,
}

impl From<VaryField> for GridField {
    fn from(v: VaryField) -> Self {
        match v {
            VaryField::DownPayment => GridField::DownPayment,
            VaryField::TradeValue => GridField::TradeValue,
            VaryField::VehiclePrice => GridField::VehiclePrice,
            VaryField::InterestRate => GridField::InterestRate,
        }
    }
}

pub fn run_grid(args: GridArgs, profile: &DeskingProfile) -> Result<Value, Box<dyn std::error::Error>> {
    let grid_input = match args.grid {
        Some(ref path) => from_file(path, profile)?,
        None => {
            let min = args.min.ok_or("--min is required (or provide --grid)")?;
            let max = args.max.ok_or("--max is required (or provide --grid)")?;
            let step = args.step.ok_or("--step is required (or provide --grid)")?;
            PaymentGridInput {
                deal: args.deal.resolve(profile)?,
                rows: GridVariable {
                    field: args.vary.into(),
                    min,
                    max,
                    step,
                },
                terms: args.terms.unwrap_or_default(),
            }
        }
    };

    let result = grid::build_payment_grid(&grid_input)?;
    Ok(serde_json::to_value(result)?)
}

/// A grid file: `{ deal, rows, terms }`, where the deal is read the same
/// lenient way as `desk calculate --input` so the profile fills gaps.
fn from_file(
    path: &str,
    profile: &DeskingProfile,
) -> Result<PaymentGridInput, Box<dyn std::error::Error>> {
    let raw = input::file::read_value(path)?;
    let deal = raw
        .get("deal")
        .ok_or_else(|| DeskingError::invalid_input("deal", "is required"))?;
    let rows = raw
        .get("rows")
        .ok_or_else(|| DeskingError::invalid_input("rows", "is required"))?;
    let terms = match raw.get("terms") {
        Some(t) => serde_json::from_value(t.clone())?,
        None => Vec::new(),
    };
    Ok(PaymentGridInput {
        deal: parse::deal_from_value(deal, profile)?,
        rows: serde_json::from_value(rows.clone())?,
        terms,
    })
}
