mod cholesky;
mod core;
mod eigen;

pub use self::cholesky::*;
pub use self::eigen::*;
