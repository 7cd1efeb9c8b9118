// Pipelines — the workflows behind each CLI command.

pub mod batch;
pub mod collect;
pub mod single;
