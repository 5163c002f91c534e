mod image;
mod state;

pub use image::{Image, NewImage};
pub use state::AppState;
