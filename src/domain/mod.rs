mod entry;
mod money;
mod totals;
mod validation;

pub use entry::*;
pub use money::*;
pub use totals::*;
pub use validation::*;
