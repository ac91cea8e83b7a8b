//! Representative-image extraction.
//!
//! Finding the article image is a multi-strategy search: known site-specific
//! containers first, then a recursive hunt for large images around the
//! content node (downloading candidates to check their real dimensions,
//! since markup lies), and finally the page's own meta/link tags.

pub mod guesser;
pub mod store;

pub use guesser::best_image;
pub use store::{store_temp_image, StoredImage};
