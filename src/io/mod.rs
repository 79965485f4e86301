pub mod error;
pub mod image;
pub mod weights;

pub use error::LoadError;
pub use self::image::{load_grayscale_image, load_input};
pub use weights::{load_network, read_matrix_file};
