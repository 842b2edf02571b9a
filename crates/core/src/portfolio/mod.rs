pub mod history;
pub mod holdings;

pub use history::*;
pub use holdings::*;
