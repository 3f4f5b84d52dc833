// Library interface for newspost modules
// This allows tests and the binaries to import modules

pub mod assembler;
pub mod error;
pub mod generator;
pub mod llm;
pub mod news;
pub mod prompts;
pub mod server;
