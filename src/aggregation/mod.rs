pub mod patient;
pub mod context;
pub mod trend;

pub use patient::*;
pub use context::*;
pub use trend::*;
