mod units;
pub use units::*;

mod alg2d;
pub use alg2d::*;

pub mod geodesy;
pub mod sweep;
