pub mod overlay;
pub mod surface;

pub use overlay::draw_overlay;
pub use surface::{ImageSurface, Surface};
