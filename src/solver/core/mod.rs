// package together all of the following and re-export
// in a partially flattened structure :
// : loosely typed caller inputs
// : cone description and problem data validation
// : settings, solution buffers and the backend boundary
// : the workspace session object and one-shot solve

pub mod inputs;
pub mod traits;

mod cones;
mod error;
mod oneshot;
mod problemdata;
mod settings;
mod solution;
mod workspace;

pub use cones::*;
pub use error::*;
pub use oneshot::*;
pub use problemdata::*;
pub use settings::*;
pub use solution::*;
pub use workspace::*;
