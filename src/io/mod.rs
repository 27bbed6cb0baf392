pub mod input;
pub mod output;
pub mod webhook;

pub use input::*;
pub use output::*;
pub use webhook::*;
