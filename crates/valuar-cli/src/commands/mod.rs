pub mod multiples;
pub mod tax;
pub mod valuation;
