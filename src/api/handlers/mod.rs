pub mod best_xi;
pub mod dataset;
pub mod stats;
pub mod system;

pub use best_xi::*;
pub use dataset::*;
pub use stats::*;
pub use system::*;
