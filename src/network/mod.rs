pub mod digit;
pub mod network;
pub mod spec;

pub use digit::Digit;
pub use network::{MlpNetwork, LAYER_COUNT};
pub use spec::{LayerShape, MlpTopology};
