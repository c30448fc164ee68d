// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Parsing of dimensions, size labels and slopes out of free text
//!
//! Authoring tools often leave the only usable size in a display name
//! (`Single-Flush 36" x 84"`, `2x10 Joist`, `W10x33`). Everything here works on
//! plain strings and returns feet where a length comes out.

use crate::resolver::Scalar;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// `36" x 84"`
static QUOTED_INCHES_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(\d+(?:\.\d+)?)\s*(?:"|'')\s*[xX×]\s*(\d+(?:\.\d+)?)\s*(?:"|'')"#)
        .expect("quoted inches pattern")
});

/// `3'-0" x 6'-8"`, `3' x 7'`
static QUOTED_FEET_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(\d+)'\s*-?\s*(?:(\d+(?:\.\d+)?)")?\s*[xX×]\s*(\d+)'\s*-?\s*(?:(\d+(?:\.\d+)?)")?"#,
    )
    .expect("quoted feet pattern")
});

/// `36x84`, `0915 x 2134mm`
static BARE_PAIR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:^|[^\d.])(\d+(?:\.\d+)?)\s*[xX×]\s*(\d+(?:\.\d+)?)")
        .expect("bare pair pattern")
});

/// `1-3/4x11-7/8 LVL`, `1.75 x 11.875 LVL`
static LVL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)(\d+(?:\.\d+)?(?:-\d+/\d+)?)"?\s*[x×]\s*(\d+(?:\.\d+)?(?:-\d+/\d+)?)"?\s*LVL"#)
        .expect("LVL pattern")
});

/// `W10x33`
static STEEL_W_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bW\s*(\d{1,2})\s*[x×]\s*(\d+(?:\.\d+)?)\b").expect("steel W pattern")
});

/// `2x10`
static LUMBER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:^|[^\d.])(\d{1,2})\s*[xX×]\s*(\d{1,2})(?:[^\d.]|$)").expect("lumber pattern")
});

/// `6/12`, `6"/12"`, `6:12`
static RATIO_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^\s*(\d+(?:\.\d+)?)\s*"?\s*[/:]\s*(\d+(?:\.\d+)?)\s*"?\s*$"#)
        .expect("slope ratio pattern")
});

/// Bare numbers at or above this are millimetres rather than inches
const BARE_INCHES_BELOW: f64 = 100.0;
const MILLIMETERS_PER_FOOT: f64 = 304.8;

fn number(caps: &regex::Captures<'_>, index: usize) -> Option<f64> {
    caps.get(index)?.as_str().parse::<f64>().ok()
}

/// Width x height, in feet, from a display name
///
/// Patterns are tried in order: quoted inches, quoted feet(-inches), bare
/// numbers. Bare pairs are inches when both are below 100, millimetres
/// otherwise.
pub fn parse_name_dimensions(text: &str) -> Option<(f64, f64)> {
    if let Some(caps) = QUOTED_INCHES_RE.captures(text) {
        let (w, h) = (number(&caps, 1)?, number(&caps, 2)?);
        return positive_pair(w / 12.0, h / 12.0);
    }

    if let Some(caps) = QUOTED_FEET_RE.captures(text) {
        let w = number(&caps, 1)? + number(&caps, 2).unwrap_or(0.0) / 12.0;
        let h = number(&caps, 3)? + number(&caps, 4).unwrap_or(0.0) / 12.0;
        return positive_pair(w, h);
    }

    let caps = BARE_PAIR_RE.captures(text)?;
    let (w, h) = (number(&caps, 1)?, number(&caps, 2)?);
    if w < BARE_INCHES_BELOW && h < BARE_INCHES_BELOW {
        positive_pair(w / 12.0, h / 12.0)
    } else {
        positive_pair(w / MILLIMETERS_PER_FOOT, h / MILLIMETERS_PER_FOOT)
    }
}

fn positive_pair(w: f64, h: f64) -> Option<(f64, f64)> {
    (w > 0.0 && h > 0.0).then_some((w, h))
}

/// Size label of a framing member from its type name
///
/// LVL sizes, then steel wide-flange shapes, then nominal lumber.
pub fn parse_framing_label(text: &str) -> Option<String> {
    if let Some(caps) = LVL_RE.captures(text) {
        return Some(format!("{}x{} LVL", &caps[1], &caps[2]));
    }
    if let Some(caps) = STEEL_W_RE.captures(text) {
        return Some(format!("W{}x{}", &caps[1], &caps[2]));
    }
    LUMBER_RE
        .captures(text)
        .map(|caps| format!("{}x{}", &caps[1], &caps[2]))
}

/// Casework subtype
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseworkKind {
    Vanity,
    Tall,
    Wall,
    Base,
    Other,
}

/// Casework kind from name and type text
pub fn casework_kind(texts: &[Option<&str>]) -> CaseworkKind {
    let text = texts
        .iter()
        .flatten()
        .map(|s| s.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ");

    if text.contains("vanity") {
        CaseworkKind::Vanity
    } else if text.contains("tall") || text.contains("pantry") || text.contains("utility") {
        CaseworkKind::Tall
    } else if text.contains("wall") || text.contains("upper") {
        CaseworkKind::Wall
    } else if text.contains("base") || text.contains("lower") {
        CaseworkKind::Base
    } else {
        CaseworkKind::Other
    }
}

/// Interpreted roof slope
#[derive(Clone, Debug, PartialEq)]
pub struct Slope {
    /// Rise over run
    pub ratio: Option<f64>,
    /// Pitch angle
    pub degrees: Option<f64>,
    pub display: String,
}

impl Slope {
    fn from_degrees(degrees: f64) -> Self {
        Self {
            ratio: Some(degrees.to_radians().tan()),
            degrees: Some(degrees),
            display: slope_display(degrees),
        }
    }
}

/// Snap window for `N"/12"` displays
const SNAP_TOLERANCE_DEGREES: f64 = 0.5;

/// Nearest `N"/12"` within half a degree, else one-decimal degrees
pub fn slope_display(degrees: f64) -> String {
    let nearest = (1..=24u32)
        .map(|rise| {
            let pitch = (rise as f64 / 12.0).atan().to_degrees();
            (rise, (pitch - degrees).abs())
        })
        .min_by(|a, b| a.1.total_cmp(&b.1));

    match nearest {
        Some((rise, delta)) if delta <= SNAP_TOLERANCE_DEGREES => format!("{}\"/12\"", rise),
        _ => format!("{:.1}°", degrees),
    }
}

fn slope_from_number(n: f64) -> Option<Slope> {
    if !n.is_finite() || n <= 0.0 {
        None
    } else if n < 1.0 {
        Some(Slope::from_degrees(n.atan().to_degrees()))
    } else if n <= 90.0 {
        Some(Slope::from_degrees(n))
    } else {
        None
    }
}

/// Interpret a slope value
///
/// Numbers below 1 are rise/run ratios, 1 to 90 are degrees. Text is parsed as
/// a number, then as `rise/run`; anything else is kept as literal display text.
pub fn parse_slope(value: &Scalar) -> Option<Slope> {
    match value {
        Scalar::Number(n) => slope_from_number(*n),
        Scalar::Text(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return None;
            }
            if let Ok(n) = trimmed.parse::<f64>() {
                return slope_from_number(n);
            }
            if let Some(caps) = RATIO_RE.captures(trimmed) {
                let (rise, run) = (number(&caps, 1)?, number(&caps, 2)?);
                if run > 0.0 {
                    let ratio = rise / run;
                    return Some(Slope {
                        ratio: Some(ratio),
                        degrees: Some(ratio.atan().to_degrees()),
                        display: trimmed.to_string(),
                    });
                }
            }
            Some(Slope {
                ratio: None,
                degrees: None,
                display: trimmed.to_string(),
            })
        }
        Scalar::Bool(_) => None,
    }
}

/// Allowed relative error of a reconstructed rectangle's area
const RECTANGLE_AREA_TOLERANCE: f64 = 0.05;

/// Solve `(length, width)` of a rectangle from perimeter and area
///
/// Width is the smaller root of `w² − (P/2)w + A = 0`. `None` for a negative
/// discriminant or when the rebuilt area is off by more than 5%.
pub fn solve_rectangle(perimeter: f64, area: f64) -> Option<(f64, f64)> {
    if !(perimeter > 0.0 && area > 0.0) || !perimeter.is_finite() || !area.is_finite() {
        return None;
    }
    let half = perimeter / 2.0;
    let discriminant = half * half - 4.0 * area;
    if discriminant < 0.0 {
        return None;
    }
    let root = discriminant.sqrt();
    let width = (half - root) / 2.0;
    let length = (half + root) / 2.0;
    if width <= 0.0 {
        return None;
    }
    let rebuilt = width * length;
    ((rebuilt - area).abs() / area <= RECTANGLE_AREA_TOLERANCE).then_some((length, width))
}
