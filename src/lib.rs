pub mod assets;
pub mod combine;
pub mod config;
pub mod error;
pub mod geometry;
pub mod items;
pub mod world;

pub use combine::{Combination, Outcome, Resolver, Rule};
pub use error::{Error, Result};
pub use items::{Item, ItemKind};
