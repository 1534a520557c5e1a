pub mod metric;
pub mod routine;
pub mod section;
pub mod user;
