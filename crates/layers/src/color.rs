//! CSS color values as used by map hosts.
//!
//! Colors are stored as RGBA in `[0, 1]` and travel as CSS strings
//! (`#rrggbb` when opaque, `rgba(r, g, b, a)` otherwise).

use serde::{Deserialize, Serialize};

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(pub [f32; 4]);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorError {
    Empty,
    Unsupported(String),
    Component(String),
}

impl std::fmt::Display for ColorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColorError::Empty => write!(f, "empty color string"),
            ColorError::Unsupported(s) => write!(f, "unsupported color syntax: {s}"),
            ColorError::Component(s) => write!(f, "invalid color component: {s}"),
        }
    }
}

impl std::error::Error for ColorError {}

impl Color {
    pub const WHITE: Color = Color([1.0, 1.0, 1.0, 1.0]);

    pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Color([r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, a])
    }

    /// Parses hex notation, `rgb()`/`rgba()`, `hsl()`/`hsla()`, named
    /// colors and `transparent`.
    pub fn parse_css(s: &str) -> Result<Self, ColorError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ColorError::Empty);
        }
        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex(hex);
        }
        let lower = s.to_ascii_lowercase();
        if lower == "transparent" {
            return Ok(Color([0.0, 0.0, 0.0, 0.0]));
        }
        if let Ok(idx) = NAMED.binary_search_by(|(name, _)| name.cmp(&lower.as_str())) {
            let [r, g, b] = NAMED[idx].1;
            return Ok(Color::rgba(r, g, b, 1.0));
        }
        let function = |prefixes: [&str; 2]| {
            prefixes
                .iter()
                .find_map(|p| lower.strip_prefix(p))
                .and_then(|rest| rest.strip_suffix(')'))
        };
        if let Some(body) = function(["rgba(", "rgb("]) {
            return parse_rgb(body);
        }
        if let Some(body) = function(["hsla(", "hsl("]) {
            return parse_hsl(body);
        }
        Err(ColorError::Unsupported(s.to_string()))
    }

    pub fn to_css(&self) -> String {
        let [r, g, b, a] = self.0;
        let (r, g, b) = (channel_u8(r), channel_u8(g), channel_u8(b));
        if a >= 1.0 {
            format!("#{r:02x}{g:02x}{b:02x}")
        } else {
            format!("rgba({r}, {g}, {b}, {a})")
        }
    }
}

fn channel_u8(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn parse_hex(hex: &str) -> Result<Color, ColorError> {
    let digit = |c: char| {
        c.to_digit(16)
            .map(|d| d as u8)
            .ok_or_else(|| ColorError::Component(hex.to_string()))
    };
    let chars: Vec<char> = hex.chars().collect();
    let bytes: Vec<u8> = match chars.len() {
        3 => chars
            .iter()
            .map(|&c| digit(c).map(|d| d * 17))
            .collect::<Result<_, _>>()?,
        6 | 8 => chars
            .chunks(2)
            .map(|pair| Ok(digit(pair[0])? * 16 + digit(pair[1])?))
            .collect::<Result<_, ColorError>>()?,
        _ => return Err(ColorError::Unsupported(format!("#{hex}"))),
    };
    let alpha = bytes.get(3).map(|&a| a as f32 / 255.0).unwrap_or(1.0);
    Ok(Color::rgba(bytes[0], bytes[1], bytes[2], alpha))
}

/// Splits a functional body in either the comma form `a, b, c, d` or the
/// space form `a b c / d`.
fn components(body: &str) -> Result<Vec<&str>, ColorError> {
    let parts: Vec<&str> = if body.contains(',') {
        body.split(',').map(str::trim).collect()
    } else {
        body.split(|c: char| c.is_whitespace() || c == '/')
            .filter(|p| !p.is_empty())
            .collect()
    };
    if parts.len() != 3 && parts.len() != 4 {
        return Err(ColorError::Unsupported(body.to_string()));
    }
    Ok(parts)
}

fn parse_alpha(part: Option<&&str>) -> Result<f32, ColorError> {
    let Some(a) = part else {
        return Ok(1.0);
    };
    let v = match a.strip_suffix('%') {
        Some(pct) => pct.parse::<f32>().map(|p| p / 100.0),
        None => a.parse::<f32>(),
    }
    .map_err(|_| ColorError::Component(a.to_string()))?;
    if !(0.0..=1.0).contains(&v) {
        return Err(ColorError::Component(a.to_string()));
    }
    Ok(v)
}

fn parse_rgb(body: &str) -> Result<Color, ColorError> {
    let parts = components(body)?;
    let mut rgb = [0u8; 3];
    for (slot, part) in rgb.iter_mut().zip(&parts) {
        *slot = part
            .parse::<u8>()
            .map_err(|_| ColorError::Component(part.to_string()))?;
    }
    Ok(Color::rgba(rgb[0], rgb[1], rgb[2], parse_alpha(parts.get(3))?))
}

fn parse_hsl(body: &str) -> Result<Color, ColorError> {
    let parts = components(body)?;
    let hue = parts[0].strip_suffix("deg").unwrap_or(parts[0]);
    let h = hue
        .parse::<f32>()
        .map_err(|_| ColorError::Component(parts[0].to_string()))?
        .rem_euclid(360.0);
    let percent = |part: &str| -> Result<f32, ColorError> {
        let v = part
            .strip_suffix('%')
            .and_then(|p| p.parse::<f32>().ok())
            .ok_or_else(|| ColorError::Component(part.to_string()))?;
        if !(0.0..=100.0).contains(&v) {
            return Err(ColorError::Component(part.to_string()));
        }
        Ok(v / 100.0)
    };
    let (s, l) = (percent(parts[1])?, percent(parts[2])?);
    let alpha = parse_alpha(parts.get(3))?;

    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = l - c / 2.0;
    let (r, g, b) = match h {
        h if h < 60.0 => (c, x, 0.0),
        h if h < 120.0 => (x, c, 0.0),
        h if h < 180.0 => (0.0, c, x),
        h if h < 240.0 => (0.0, x, c),
        h if h < 300.0 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    Ok(Color([r + m, g + m, b + m, alpha]))
}

/// CSS named colors, sorted by name.
const NAMED: &[(&str, [u8; 3])] = &[
    ("aliceblue", [240, 248, 255]),
    ("antiquewhite", [250, 235, 215]),
    ("aqua", [0, 255, 255]),
    ("aquamarine", [127, 255, 212]),
    ("azure", [240, 255, 255]),
    ("beige", [245, 245, 220]),
    ("bisque", [255, 228, 196]),
    ("black", [0, 0, 0]),
    ("blanchedalmond", [255, 235, 205]),
    ("blue", [0, 0, 255]),
    ("blueviolet", [138, 43, 226]),
    ("brown", [165, 42, 42]),
    ("burlywood", [222, 184, 135]),
    ("cadetblue", [95, 158, 160]),
    ("chartreuse", [127, 255, 0]),
    ("chocolate", [210, 105, 30]),
    ("coral", [255, 127, 80]),
    ("cornflowerblue", [100, 149, 237]),
    ("cornsilk", [255, 248, 220]),
    ("crimson", [220, 20, 60]),
    ("cyan", [0, 255, 255]),
    ("darkblue", [0, 0, 139]),
    ("darkcyan", [0, 139, 139]),
    ("darkgoldenrod", [184, 134, 11]),
    ("darkgray", [169, 169, 169]),
    ("darkgreen", [0, 100, 0]),
    ("darkgrey", [169, 169, 169]),
    ("darkkhaki", [189, 183, 107]),
    ("darkmagenta", [139, 0, 139]),
    ("darkolivegreen", [85, 107, 47]),
    ("darkorange", [255, 140, 0]),
    ("darkorchid", [153, 50, 204]),
    ("darkred", [139, 0, 0]),
    ("darksalmon", [233, 150, 122]),
    ("darkseagreen", [143, 188, 143]),
    ("darkslateblue", [72, 61, 139]),
    ("darkslategray", [47, 79, 79]),
    ("darkslategrey", [47, 79, 79]),
    ("darkturquoise", [0, 206, 209]),
    ("darkviolet", [148, 0, 211]),
    ("deeppink", [255, 20, 147]),
    ("deepskyblue", [0, 191, 255]),
    ("dimgray", [105, 105, 105]),
    ("dimgrey", [105, 105, 105]),
    ("dodgerblue", [30, 144, 255]),
    ("firebrick", [178, 34, 34]),
    ("floralwhite", [255, 250, 240]),
    ("forestgreen", [34, 139, 34]),
    ("fuchsia", [255, 0, 255]),
    ("gainsboro", [220, 220, 220]),
    ("ghostwhite", [248, 248, 255]),
    ("gold", [255, 215, 0]),
    ("goldenrod", [218, 165, 32]),
    ("gray", [128, 128, 128]),
    ("green", [0, 128, 0]),
    ("greenyellow", [173, 255, 47]),
    ("grey", [128, 128, 128]),
    ("honeydew", [240, 255, 240]),
    ("hotpink", [255, 105, 180]),
    ("indianred", [205, 92, 92]),
    ("indigo", [75, 0, 130]),
    ("ivory", [255, 255, 240]),
    ("khaki", [240, 230, 140]),
    ("lavender", [230, 230, 250]),
    ("lavenderblush", [255, 240, 245]),
    ("lawngreen", [124, 252, 0]),
    ("lemonchiffon", [255, 250, 205]),
    ("lightblue", [173, 216, 230]),
    ("lightcoral", [240, 128, 128]),
    ("lightcyan", [224, 255, 255]),
    ("lightgoldenrodyellow", [250, 250, 210]),
    ("lightgray", [211, 211, 211]),
    ("lightgreen", [144, 238, 144]),
    ("lightgrey", [211, 211, 211]),
    ("lightpink", [255, 182, 193]),
    ("lightsalmon", [255, 160, 122]),
    ("lightseagreen", [32, 178, 170]),
    ("lightskyblue", [135, 206, 250]),
    ("lightslategray", [119, 136, 153]),
    ("lightslategrey", [119, 136, 153]),
    ("lightsteelblue", [176, 196, 222]),
    ("lightyellow", [255, 255, 224]),
    ("lime", [0, 255, 0]),
    ("limegreen", [50, 205, 50]),
    ("linen", [250, 240, 230]),
    ("magenta", [255, 0, 255]),
    ("maroon", [128, 0, 0]),
    ("mediumaquamarine", [102, 205, 170]),
    ("mediumblue", [0, 0, 205]),
    ("mediumorchid", [186, 85, 211]),
    ("mediumpurple", [147, 112, 219]),
    ("mediumseagreen", [60, 179, 113]),
    ("mediumslateblue", [123, 104, 238]),
    ("mediumspringgreen", [0, 250, 154]),
    ("mediumturquoise", [72, 209, 204]),
    ("mediumvioletred", [199, 21, 133]),
    ("midnightblue", [25, 25, 112]),
    ("mintcream", [245, 255, 250]),
    ("mistyrose", [255, 228, 225]),
    ("moccasin", [255, 228, 181]),
    ("navajowhite", [255, 222, 173]),
    ("navy", [0, 0, 128]),
    ("oldlace", [253, 245, 230]),
    ("olive", [128, 128, 0]),
    ("olivedrab", [107, 142, 35]),
    ("orange", [255, 165, 0]),
    ("orangered", [255, 69, 0]),
    ("orchid", [218, 112, 214]),
    ("palegoldenrod", [238, 232, 170]),
    ("palegreen", [152, 251, 152]),
    ("paleturquoise", [175, 238, 238]),
    ("palevioletred", [219, 112, 147]),
    ("papayawhip", [255, 239, 213]),
    ("peachpuff", [255, 218, 185]),
    ("peru", [205, 133, 63]),
    ("pink", [255, 192, 203]),
    ("plum", [221, 160, 221]),
    ("powderblue", [176, 224, 230]),
    ("purple", [128, 0, 128]),
    ("rebeccapurple", [102, 51, 153]),
    ("red", [255, 0, 0]),
    ("rosybrown", [188, 143, 143]),
    ("royalblue", [65, 105, 225]),
    ("saddlebrown", [139, 69, 19]),
    ("salmon", [250, 128, 114]),
    ("sandybrown", [244, 164, 96]),
    ("seagreen", [46, 139, 87]),
    ("seashell", [255, 245, 238]),
    ("sienna", [160, 82, 45]),
    ("silver", [192, 192, 192]),
    ("skyblue", [135, 206, 235]),
    ("slateblue", [106, 90, 205]),
    ("slategray", [112, 128, 144]),
    ("slategrey", [112, 128, 144]),
    ("snow", [255, 250, 250]),
    ("springgreen", [0, 255, 127]),
    ("steelblue", [70, 130, 180]),
    ("tan", [210, 180, 140]),
    ("teal", [0, 128, 128]),
    ("thistle", [216, 191, 216]),
    ("tomato", [255, 99, 71]),
    ("turquoise", [64, 224, 208]),
    ("violet", [238, 130, 238]),
    ("wheat", [245, 222, 179]),
    ("white", [255, 255, 255]),
    ("whitesmoke", [245, 245, 245]),
    ("yellow", [255, 255, 0]),
    ("yellowgreen", [154, 205, 50]),
];

impl TryFrom<String> for Color {
    type Error = ColorError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Color::parse_css(&s)
    }
}

impl From<Color> for String {
    fn from(c: Color) -> Self {
        c.to_css()
    }
}

#[cfg(test)]
mod tests {
    use super::{Color, ColorError};

    #[test]
    fn parses_hex_forms() {
        assert_eq!(Color::parse_css("#fff").unwrap(), Color::WHITE);
        assert_eq!(Color::parse_css("#ec5661").unwrap().to_css(), "#ec5661");
        let translucent = Color::parse_css("#00000080").unwrap();
        assert!((translucent.0[3] - 128.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn parses_functional_forms() {
        let fill = Color::parse_css("rgba(255, 255, 255, 0.2)").unwrap();
        assert_eq!(fill.to_css(), "rgba(255, 255, 255, 0.2)");
        assert_eq!(Color::parse_css("RGB(0,0,0)").unwrap().to_css(), "#000000");
    }

    #[test]
    fn parses_named_and_hsl_forms() {
        assert_eq!(Color::parse_css("red").unwrap().to_css(), "#ff0000");
        assert_eq!(Color::parse_css("Yellow").unwrap().to_css(), "#ffff00");
        assert_eq!(Color::parse_css("rebeccapurple").unwrap().to_css(), "#663399");
        assert_eq!(Color::parse_css("transparent").unwrap().0[3], 0.0);
        assert_eq!(Color::parse_css("hsl(0, 100%, 50%)").unwrap().to_css(), "#ff0000");
        assert_eq!(Color::parse_css("hsl(120deg 100% 25%)").unwrap().to_css(), "#008000");
        let sky = Color::parse_css("hsla(210, 50%, 50%, 0.5)").unwrap();
        assert_eq!(sky.to_css(), "rgba(64, 128, 191, 0.5)");
        assert_eq!(Color::parse_css("rgb(1 2 3 / 50%)").unwrap().0[3], 0.5);
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(Color::parse_css("  "), Err(ColorError::Empty));
        assert!(matches!(
            Color::parse_css("papaya-ish"),
            Err(ColorError::Unsupported(_))
        ));
        assert!(matches!(
            Color::parse_css("hsl(0, 100, 50%)"),
            Err(ColorError::Component(_))
        ));
        assert!(matches!(
            Color::parse_css("#gg0000"),
            Err(ColorError::Component(_))
        ));
        assert!(matches!(
            Color::parse_css("rgba(1, 2, 3, 4)"),
            Err(ColorError::Component(_))
        ));
    }

    #[test]
    fn travels_as_css_string() {
        let json = serde_json::to_string(&Color::rgba(236, 86, 97, 1.0)).unwrap();
        assert_eq!(json, "\"#ec5661\"");
        let back: Color = serde_json::from_str("\"#ec5661\"").unwrap();
        assert_eq!(back.to_css(), "#ec5661");
        assert!(serde_json::from_str::<Color>("\"nope\"").is_err());
    }
}
