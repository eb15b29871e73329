pub mod matches;
pub mod tournaments;
