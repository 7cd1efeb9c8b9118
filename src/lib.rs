// whatis: batch "What is ..." explainer generation with a local Ollama server
//
// This is the library root. Each module corresponds to one stage of the
// topic -> prompt -> generate -> clean -> save pipeline.

pub mod catalog;
pub mod clean;
pub mod config;
pub mod inference;
pub mod output;
pub mod pipeline;
pub mod prompt;
pub mod status;
pub mod topics;

#[cfg(feature = "web")]
pub mod web;
