pub mod acquisition;
pub mod report;
pub mod scheduled;
