//! Axum HTTP surface for the Fateweaver turn engine.

pub mod error;
pub mod routes;
pub mod state;
