pub mod celebrations;
pub mod particles;

pub use celebrations::{Celebration, Effect};
