/// Convert a packed `0xRRGGBB` value into normalised RGB
pub fn hex_to_rgb(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    ]
}

/// Parse `#rrggbb` (leading `#` optional) into a packed value
pub fn parse_hex_color(text: &str) -> Option<u32> {
    let digits = text.strip_prefix('#').unwrap_or(text);
    if digits.len() != 6 {
        return None;
    }
    u32::from_str_radix(digits, 16).ok()
}

/// Approximate sRGB decode used for light colours
pub fn srgb_to_linear(c: f32) -> f32 {
    c.max(0.0).powf(2.2)
}

pub fn rgb_to_rgba8(rgb: [f32; 3], alpha: u8) -> [u8; 4] {
    let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    [channel(rgb[0]), channel(rgb[1]), channel(rgb[2]), alpha]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_to_rgb_primaries() {
        assert_eq!(hex_to_rgb(0xff0000), [1.0, 0.0, 0.0]);
        assert_eq!(hex_to_rgb(0x00ff00), [0.0, 1.0, 0.0]);
        assert_eq!(hex_to_rgb(0x0000ff), [0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#667eea"), Some(0x667eea));
        assert_eq!(parse_hex_color("764ba2"), Some(0x764ba2));
        assert_eq!(parse_hex_color("#fff"), None);
        assert_eq!(parse_hex_color("#zzzzzz"), None);
    }

    #[test]
    fn test_srgb_to_linear_fixed_points() {
        assert_eq!(srgb_to_linear(0.0), 0.0);
        assert_eq!(srgb_to_linear(1.0), 1.0);
        assert!(srgb_to_linear(0.5) < 0.5);
    }

    #[test]
    fn test_rgba8_roundtrip_of_palette_entry() {
        let rgba = rgb_to_rgba8(hex_to_rgb(0x2d3748), 255);
        assert_eq!(rgba, [0x2d, 0x37, 0x48, 255]);
    }
}
