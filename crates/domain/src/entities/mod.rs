//! Domain entities - Records produced by the generation stages

mod character;
mod item;
mod location;
mod scene;

pub use character::Character;
pub use item::Item;
pub use location::Location;
pub use scene::{Choice, Scene};
