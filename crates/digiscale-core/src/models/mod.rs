//! Domain models for the DigiScale system.

mod dates;
mod patient;
mod recent;

pub use dates::*;
pub use patient::*;
pub use recent::*;
