pub mod blogs;
pub mod stats;
