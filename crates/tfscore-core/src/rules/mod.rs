pub mod catalog;
pub mod classify;
pub mod eval;
pub mod matcher;
pub mod rubric;
