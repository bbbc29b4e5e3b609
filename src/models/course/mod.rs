pub mod schema;

mod queries;
mod types;

pub use queries::*;
pub use types::*;
