pub mod calculator;
pub mod model;
pub mod parse;

pub use calculator::{calculate, validate};
pub use model::{AddOns, DealBreakdown, DealInputs, DealResult, Fees, TermPayment};
