pub mod analysis;
pub mod record;
pub mod retell;

pub use analysis::*;
pub use record::*;
pub use retell::*;
