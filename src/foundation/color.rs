use crate::foundation::core::Rgb8;
use serde::{Deserialize, Serialize};

impl Serialize for Rgb8 {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Rgb8 {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Hex(String),
            RgbObj { r: f64, g: f64, b: f64 },
            HslObj { h: f64, s: f64, l: f64 },
            Arr(Vec<f64>),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Hex(s) => parse_hex(&s).map_err(serde::de::Error::custom),
            Repr::RgbObj { r, g, b } => Ok(rgb_unit(r, g, b)),
            Repr::HslObj { h, s, l } => Ok(hsl_to_rgb8(h, s, l)),
            Repr::Arr(v) => {
                if v.len() == 3 {
                    Ok(rgb_unit(v[0], v[1], v[2]))
                } else {
                    Err(serde::de::Error::custom("rgb array must have len 3 ([r,g,b])"))
                }
            }
        }
    }
}

fn unit_to_byte(x: f64) -> u8 {
    (x.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn rgb_unit(r: f64, g: f64, b: f64) -> Rgb8 {
    Rgb8::new(unit_to_byte(r), unit_to_byte(g), unit_to_byte(b))
}

/// Parse `#RRGGBB` (the leading `#` is optional, case-insensitive).
pub(crate) fn parse_hex(s: &str) -> Result<Rgb8, String> {
    let s = s.trim();
    let s = s.strip_prefix('#').unwrap_or(s);

    fn hex_byte(pair: &str) -> Result<u8, String> {
        u8::from_str_radix(pair, 16).map_err(|_| format!("invalid hex byte \"{pair}\""))
    }

    if s.len() != 6 || !s.is_ascii() {
        return Err("accent color must be #RRGGBB (case-insensitive)".to_owned());
    }
    Ok(Rgb8::new(
        hex_byte(&s[0..2])?,
        hex_byte(&s[2..4])?,
        hex_byte(&s[4..6])?,
    ))
}

/// HSL to sRGB. `h` in degrees, `s`/`l` in `0..=1`.
pub(crate) fn hsl_to_rgb8(h: f64, s: f64, l: f64) -> Rgb8 {
    let h = (h % 360.0 + 360.0) % 360.0 / 360.0;
    let s = s.clamp(0.0, 1.0);
    let l = l.clamp(0.0, 1.0);

    if s == 0.0 {
        return rgb_unit(l, l, l);
    }

    fn hue_to_rgb(p: f64, q: f64, mut t: f64) -> f64 {
        if t < 0.0 {
            t += 1.0;
        }
        if t > 1.0 {
            t -= 1.0;
        }
        if t < 1.0 / 6.0 {
            return p + (q - p) * 6.0 * t;
        }
        if t < 1.0 / 2.0 {
            return q;
        }
        if t < 2.0 / 3.0 {
            return p + (q - p) * (2.0 / 3.0 - t) * 6.0;
        }
        p
    }

    let q = if l < 0.5 {
        l * (1.0 + s)
    } else {
        l + s - l * s
    };
    let p = 2.0 * l - q;

    rgb_unit(
        hue_to_rgb(p, q, h + 1.0 / 3.0),
        hue_to_rgb(p, q, h),
        hue_to_rgb(p, q, h - 1.0 / 3.0),
    )
}
