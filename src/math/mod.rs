mod color;
mod easing;

pub use color::{hex_to_rgb, parse_hex_color, rgb_to_rgba8, srgb_to_linear};
pub use easing::{ease_out_bounce, ease_out_cubic, ease_out_quart};
