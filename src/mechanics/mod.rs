pub mod activation;
pub mod axis;
pub mod color;
pub mod stoch;

pub use activation::*;
pub use axis::*;
pub use color::*;
pub use stoch::*;
