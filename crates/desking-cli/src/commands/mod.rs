pub mod deal;
pub mod grid;
