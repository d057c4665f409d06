//! HTTP adapters for the engine's collaborator ports — the player-state
//! service and the OpenAI-compatible story interpreter.

pub mod interpreter;
pub mod state_manager;

pub use interpreter::HttpInterpreter;
pub use state_manager::StateManagerClient;
