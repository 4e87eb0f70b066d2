pub mod page;
pub mod problem;

pub use page::Page;
pub use problem::{Problem, ProblemResponse, ValidationError, APPLICATION_PROBLEM_JSON};
