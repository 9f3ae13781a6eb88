#![forbid(unsafe_code)]

pub mod grader;
pub mod model;
pub mod pool;
pub mod repair;
pub mod time;

pub use grader::grade;
pub use pool::{Pool, canonical_key};
pub use time::{Clock, fixed_now};
