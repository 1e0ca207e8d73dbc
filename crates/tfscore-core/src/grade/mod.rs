pub mod pipeline;
pub mod timestamp;

pub use pipeline::{Grade, grade};
pub use timestamp::Timestamp;
