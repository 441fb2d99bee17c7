pub mod chart;
pub mod history;
pub mod signals;

pub use chart::*;
pub use history::*;
pub use signals::*;
