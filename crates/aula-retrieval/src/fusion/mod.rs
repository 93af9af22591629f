mod classifier;
pub mod rrf;
mod weights;

pub use classifier::classify;
pub use weights::{weight_of, FusionWeights};
