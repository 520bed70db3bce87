pub mod news;
pub mod report;
