//! Shared test doubles and utilities for the Fateweaver turn engine.

mod catalogs;
mod clock;
mod dice;
mod interpreter;
mod players;

pub use catalogs::{InMemoryEnemyCatalog, InMemoryItemCatalog, InMemoryLocaleDirectory};
pub use clock::FixedClock;
pub use dice::{MockDice, SequenceDice};
pub use interpreter::{FailingInterpreter, FixedInterpreter};
pub use players::{FailingPlayerDirectory, StaticPlayerDirectory};
