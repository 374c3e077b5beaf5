use once_cell::sync::Lazy;
use regex::Regex;

static HEX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^#?([a-f\d]{2})([a-f\d]{2})([a-f\d]{2})$").unwrap());

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };

    /// CSS `rgb()` form with 0-255 channels.
    pub fn to_css(self) -> String {
        let channel = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!(
            "rgb({}, {}, {})",
            channel(self.r),
            channel(self.g),
            channel(self.b)
        )
    }
}

pub fn is_hex_color(input: &str) -> bool {
    HEX_RE.is_match(input.trim())
}

/// Parses `#rrggbb` (leading `#` optional). Anything else is black.
pub fn hex_to_rgb(input: &str) -> Rgb {
    let Some(caps) = HEX_RE.captures(input.trim()) else {
        return Rgb::BLACK;
    };
    let channel = |idx: usize| {
        caps.get(idx)
            .and_then(|m| u8::from_str_radix(m.as_str(), 16).ok())
            .map(|v| v as f64 / 255.0)
            .unwrap_or(0.0)
    };
    Rgb {
        r: channel(1),
        g: channel(2),
        b: channel(3),
    }
}

/// `hash = hash * 31 + unit` over UTF-16 code units, wrapping at 32 bits.
pub fn hash_code(input: &str) -> i32 {
    input.encode_utf16().fold(0i32, |hash, unit| {
        hash.wrapping_shl(5)
            .wrapping_sub(hash)
            .wrapping_add(i32::from(unit))
    })
}

pub fn palette_index(id: &str, palette_len: usize) -> usize {
    if palette_len == 0 {
        return 0;
    }
    let magnitude = i64::from(hash_code(id)).unsigned_abs();
    (magnitude % palette_len as u64) as usize
}

pub fn node_color<'a>(id: &str, palette: &'a [String]) -> Option<&'a str> {
    palette
        .get(palette_index(id, palette.len()))
        .map(String::as_str)
}
