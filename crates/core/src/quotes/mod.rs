//! Quote domain models.

mod model;

pub use model::*;
