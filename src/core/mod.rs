pub mod caption;
pub mod constants;
pub mod error;
pub mod particles;
pub mod sequence;
pub mod spring;

pub use caption::*;
pub use error::*;
pub use particles::*;
pub use sequence::*;
pub use spring::*;
