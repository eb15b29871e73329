pub mod bracket;
pub mod finalization;
pub mod lifecycle;
pub mod reporting;
