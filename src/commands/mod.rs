pub mod report;
pub mod sprints;
