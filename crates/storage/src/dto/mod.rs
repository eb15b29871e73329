pub mod bracket;
pub mod match_result;
pub mod tournament;
