pub mod activation;

pub use activation::{relu, softmax, ActivationFunction};
