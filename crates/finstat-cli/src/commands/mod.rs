pub mod analyze;
pub mod catalog;
