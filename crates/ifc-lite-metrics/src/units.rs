// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Unit normalization and display formatting
//!
//! Exporters hand out lengths, areas and volumes without unit metadata, in SI
//! or imperial depending on the authoring tool. Values are normalized to feet,
//! square feet and cubic feet by magnitude: anything below the threshold is
//! taken as metric.
//!
//! Every function here is total. Non-positive, NaN or infinite input
//! normalizes to `0.0` and formats as an obviously-zero string.

/// Meters to feet
pub const METERS_TO_FEET: f64 = 3.28084;
/// Square meters to square feet
pub const SQ_METERS_TO_SQ_FEET: f64 = 10.764;
/// Cubic meters to cubic feet
pub const CU_METERS_TO_CU_FEET: f64 = 35.3147;
/// Cubic feet per cubic yard
pub const CU_FEET_PER_CU_YARD: f64 = 27.0;

/// Lengths below this are meters
pub const LENGTH_METRIC_BELOW: f64 = 0.5;
/// Areas below this are square meters
pub const AREA_METRIC_BELOW: f64 = 50.0;
/// Volumes below this are cubic meters
pub const VOLUME_METRIC_BELOW: f64 = 10.0;

/// Default fractional-inch denominator (sixteenths)
pub const DEFAULT_DENOMINATOR: u32 = 16;

fn usable(raw: f64) -> Option<f64> {
    (raw.is_finite() && raw > 0.0).then_some(raw)
}

fn normalize(raw: f64, metric_below: f64, factor: f64) -> f64 {
    match usable(raw) {
        Some(v) if v < metric_below => v * factor,
        Some(v) => v,
        None => 0.0,
    }
}

/// Length of unknown unit to feet
pub fn normalize_length(raw: f64) -> f64 {
    normalize(raw, LENGTH_METRIC_BELOW, METERS_TO_FEET)
}

/// Area of unknown unit to square feet
pub fn normalize_area(raw: f64) -> f64 {
    normalize(raw, AREA_METRIC_BELOW, SQ_METERS_TO_SQ_FEET)
}

/// Volume of unknown unit to cubic feet
pub fn normalize_volume(raw: f64) -> f64 {
    normalize(raw, VOLUME_METRIC_BELOW, CU_METERS_TO_CU_FEET)
}

/// Cubic feet to cubic yards
pub fn cubic_feet_to_yards(cu_ft: f64) -> f64 {
    usable(cu_ft).map_or(0.0, |v| v / CU_FEET_PER_CU_YARD)
}

fn whole_inches(feet: f64) -> i64 {
    usable(feet).map_or(0, |v| (v * 12.0).round() as i64)
}

/// Feet to `F' I"`, dropping the inches term when it rounds to zero
pub fn length_to_feet_inches(feet: f64) -> String {
    let total = whole_inches(feet);
    if total == 0 {
        return "0' 0\"".to_string();
    }
    let (ft, inches) = (total / 12, total % 12);
    if inches == 0 {
        format!("{}'", ft)
    } else {
        format!("{}' {}\"", ft, inches)
    }
}

/// Feet to `F'-I"` with the inches term always present
pub fn feet_inches_dashed(feet: f64) -> String {
    let total = whole_inches(feet);
    format!("{}'-{}\"", total / 12, total % 12)
}

fn gcd(mut a: i64, mut b: i64) -> i64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a.abs().max(1)
}

/// Feet to fractional inches, `W-N/D"`
///
/// The fraction is rounded to `denominator` and reduced. A request for 256ths
/// is rounded to quarters.
pub fn format_inches_fraction(feet: f64, denominator: u32) -> String {
    let Some(feet) = usable(feet) else {
        return "0\"".to_string();
    };
    if denominator == 0 {
        return "0\"".to_string();
    }
    let den = if denominator >= 256 { 4 } else { denominator as i64 };

    let inches = feet * 12.0;
    let mut whole = inches.floor() as i64;
    let mut num = ((inches - whole as f64) * den as f64).round() as i64;
    if num >= den {
        whole += 1;
        num = 0;
    }

    if num == 0 {
        return format!("{}\"", whole);
    }
    let g = gcd(num, den);
    let (n, d) = (num / g, den / g);
    if whole == 0 {
        format!("{}/{}\"", n, d)
    } else {
        format!("{}-{}/{}\"", whole, n, d)
    }
}

/// Width x height as `3'-0" x 7'-0" (36" x 84")`
pub fn format_size_display(width_ft: f64, height_ft: f64) -> String {
    format!(
        "{} x {} ({}\" x {}\")",
        feet_inches_dashed(width_ft),
        feet_inches_dashed(height_ft),
        whole_inches(width_ft),
        whole_inches(height_ft)
    )
}

fn with_thousands(value: i64) -> String {
    let digits = value.abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    if value < 0 {
        out.insert(0, '-');
    }
    out
}

fn format_quantity(value: f64, suffix: &str) -> String {
    match usable(value) {
        None => format!("0 {}", suffix),
        Some(v) if v < 10.0 => format!("{:.1} {}", v, suffix),
        Some(v) => format!("{} {}", with_thousands(v.round() as i64), suffix),
    }
}

/// Square feet display (`1,118 SF`)
pub fn format_square_feet(sq_ft: f64) -> String {
    format_quantity(sq_ft, "SF")
}

/// Cubic feet display (`35 CF`)
pub fn format_cubic_feet(cu_ft: f64) -> String {
    format_quantity(cu_ft, "CF")
}

/// Cubic yards display, always two decimals (`1.31 CY`)
pub fn format_cubic_yards(cu_yd: f64) -> String {
    format!("{:.2} CY", usable(cu_yd).unwrap_or(0.0))
}

/// Square inches display (`16.5 sq in`)
pub fn format_square_inches(sq_in: f64) -> String {
    format!("{:.1} sq in", usable(sq_in).unwrap_or(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_length_boundary() {
        assert_relative_eq!(normalize_length(0.49), 0.49 * METERS_TO_FEET);
        assert_relative_eq!(normalize_length(0.5), 0.5);
        assert_relative_eq!(normalize_length(12.0), 12.0);
    }

    #[test]
    fn test_area_and_volume_boundaries() {
        assert_relative_eq!(normalize_area(49.9), 49.9 * SQ_METERS_TO_SQ_FEET);
        assert_relative_eq!(normalize_area(50.0), 50.0);
        assert_relative_eq!(normalize_volume(9.99), 9.99 * CU_METERS_TO_CU_FEET);
        assert_relative_eq!(normalize_volume(10.0), 10.0);
    }

    #[test]
    fn test_degenerate_inputs() {
        for raw in [0.0, -3.0, f64::NAN, f64::INFINITY] {
            assert_eq!(normalize_length(raw), 0.0);
            assert_eq!(normalize_area(raw), 0.0);
            assert_eq!(normalize_volume(raw), 0.0);
            assert_eq!(length_to_feet_inches(raw), "0' 0\"");
            assert_eq!(format_inches_fraction(raw, 16), "0\"");
        }
        assert_eq!(format_square_feet(f64::NAN), "0 SF");
        assert_eq!(format_cubic_yards(-1.0), "0.00 CY");
    }

    #[test]
    fn test_feet_inches() {
        assert_eq!(length_to_feet_inches(3.5), "3' 6\"");
        assert_eq!(length_to_feet_inches(12.0), "12'");
        assert_eq!(length_to_feet_inches(0.5), "0' 6\"");
        // rounds up into the next foot
        assert_eq!(length_to_feet_inches(11.999), "12'");
    }

    #[test]
    fn test_inches_fraction() {
        assert_eq!(format_inches_fraction(3.5 / 12.0, 16), "3-1/2\"");
        assert_eq!(format_inches_fraction(0.25, 16), "3\"");
        assert_eq!(format_inches_fraction(0.75 / 12.0, 16), "3/4\"");
        assert_eq!(format_inches_fraction(7.1875 / 12.0, 16), "7-3/16\"");
        assert_eq!(format_inches_fraction(7.2 / 12.0, 8), "7-1/4\"");
    }

    #[test]
    fn test_high_precision_rounds_to_quarters() {
        assert_eq!(format_inches_fraction(7.1875 / 12.0, 256), "7-1/4\"");
        assert_eq!(format_inches_fraction(7.9 / 12.0, 256), "8\"");
    }

    #[test]
    fn test_size_display() {
        assert_eq!(format_size_display(3.0, 7.0), "3'-0\" x 7'-0\" (36\" x 84\")");
        assert_eq!(
            format_size_display(2.5, 6.75),
            "2'-6\" x 6'-9\" (30\" x 81\")"
        );
    }

    #[test]
    fn test_quantity_displays() {
        assert_eq!(format_square_feet(1118.03), "1,118 SF");
        assert_eq!(format_square_feet(4.52), "4.5 SF");
        assert_eq!(format_cubic_feet(1234567.0), "1,234,567 CF");
        assert_relative_eq!(cubic_feet_to_yards(54.0), 2.0);
        assert_eq!(format_cubic_yards(cubic_feet_to_yards(35.3147)), "1.31 CY");
    }
}
