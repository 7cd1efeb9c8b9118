// Text generation — trait-based abstraction over the inference server.
//
// The TextGenerator trait defines the interface. OllamaClient implements it
// over Ollama's HTTP API; tests substitute in-process fakes.

pub mod ollama;
pub mod traits;
