//! Sky coordinate inputs for cone searches.
//!
//! Query parameters arrive as text. A coordinate is either decimal degrees
//! or a sexagesimal string; the conversion of the latter is left to the
//! repository that runs the search, via [`SkyCoordinate::to_degrees`].

use std::fmt;

use qtty::{Arcminutes, Arcseconds, Degree, Degrees};
use serde::{Deserialize, Serialize};

/// Units of a cone-search radius.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchUnits {
    #[default]
    Degree,
    Arcmin,
    Arcsec,
}

impl SearchUnits {
    /// Tag a raw radius with this unit and express it in degrees.
    pub fn to_degrees(self, radius: f64) -> Degrees {
        match self {
            SearchUnits::Degree => Degrees::new(radius),
            SearchUnits::Arcmin => Arcminutes::new(radius).to::<Degree>(),
            SearchUnits::Arcsec => Arcseconds::new(radius).to::<Degree>(),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SearchUnits::Degree => "degree",
            SearchUnits::Arcmin => "arcmin",
            SearchUnits::Arcsec => "arcsec",
        }
    }
}

impl fmt::Display for SearchUnits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which equatorial axis a coordinate belongs to.
///
/// Sexagesimal right ascension is in hours, declination in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    RightAscension,
    Declination,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::RightAscension => f.write_str("ra"),
            Axis::Declination => f.write_str("dec"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid sexagesimal {axis} value '{value}'")]
pub struct CoordinateError {
    pub axis: Axis,
    pub value: String,
}

/// A coordinate as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SkyCoordinate {
    Degrees(f64),
    Sexagesimal(String),
}

impl SkyCoordinate {
    /// Numeric text becomes decimal degrees, anything else is kept verbatim.
    pub fn parse(text: &str) -> Self {
        let trimmed = text.trim();
        match trimmed.parse::<f64>() {
            Ok(v) => SkyCoordinate::Degrees(v),
            Err(_) => SkyCoordinate::Sexagesimal(trimmed.to_string()),
        }
    }

    pub fn to_degrees(&self, axis: Axis) -> Result<Degrees, CoordinateError> {
        match self {
            SkyCoordinate::Degrees(v) => Ok(Degrees::new(*v)),
            SkyCoordinate::Sexagesimal(text) => parse_sexagesimal(text, axis)
                .map(Degrees::new)
                .ok_or_else(|| CoordinateError {
                    axis,
                    value: text.clone(),
                }),
        }
    }
}

/// Accepts `hh:mm:ss.s`, `hh mm ss`, `12h30m05s`, `-12d30m05s` and `-12°30'05"`.
fn parse_sexagesimal(text: &str, axis: Axis) -> Option<f64> {
    let text = text.trim();
    let (negative, body) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };

    let normalized: String = body
        .chars()
        .map(|c| match c {
            ':' | 'h' | 'H' | 'd' | 'D' | 'm' | 'M' | 's' | 'S' | '°' | '\'' | '"' => ' ',
            other => other,
        })
        .collect();

    let parts = normalized
        .split_whitespace()
        .map(|p| p.parse::<f64>().ok().filter(|v| v.is_finite() && *v >= 0.0))
        .collect::<Option<Vec<f64>>>()?;

    if parts.is_empty() || parts.len() > 3 {
        return None;
    }
    if parts.iter().skip(1).any(|v| *v >= 60.0) {
        return None;
    }

    let magnitude = parts
        .iter()
        .zip([1.0, 60.0, 3600.0])
        .map(|(v, scale)| v / scale)
        .sum::<f64>();

    let value = match axis {
        Axis::RightAscension => magnitude * 15.0,
        Axis::Declination => magnitude,
    };
    Some(if negative { -value } else { value })
}

/// Cone-search parameters after coercion.
#[derive(Debug, Clone, PartialEq)]
pub struct ConeSearch {
    pub ra: SkyCoordinate,
    pub dec: SkyCoordinate,
    pub radius: f64,
    pub units: SearchUnits,
}

impl ConeSearch {
    pub fn radius_degrees(&self) -> Degrees {
        self.units.to_degrees(self.radius)
    }

    /// Resolve the cone center to decimal degrees.
    pub fn center(&self) -> Result<(Degrees, Degrees), CoordinateError> {
        Ok((
            self.ra.to_degrees(Axis::RightAscension)?,
            self.dec.to_degrees(Axis::Declination)?,
        ))
    }
}

/// Great-circle separation between two equatorial positions (haversine).
pub fn angular_separation(ra1: Degrees, dec1: Degrees, ra2: Degrees, dec2: Degrees) -> Degrees {
    let (ra1, dec1) = (ra1.value().to_radians(), dec1.value().to_radians());
    let (ra2, dec2) = (ra2.value().to_radians(), dec2.value().to_radians());

    let half_ddec = ((dec2 - dec1) / 2.0).sin();
    let half_dra = ((ra2 - ra1) / 2.0).sin();
    let h = half_ddec * half_ddec + dec1.cos() * dec2.cos() * half_dra * half_dra;

    Degrees::new((2.0 * h.sqrt().min(1.0).asin()).to_degrees())
}
