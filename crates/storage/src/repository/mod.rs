pub mod matches;
pub mod participant;
pub mod report;
pub mod reward;
pub mod tournament;
