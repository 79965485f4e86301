pub mod math;
pub mod activation;
pub mod layers;
pub mod network;
pub mod io;

// Convenience re-exports
pub use math::matrix::{Matrix, PRINT_THRESHOLD};
pub use math::error::MatrixError;
pub use activation::activation::ActivationFunction;
pub use layers::dense::Dense;
pub use network::{digit::Digit, network::MlpNetwork, spec::{LayerShape, MlpTopology}};
pub use io::{error::LoadError, load_input, load_network};
