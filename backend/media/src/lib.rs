pub mod filename;

pub use filename::{derive_filename, is_image, is_video};
