use serde::de::{self, SeqAccess, Visitor};
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
    /// Feet above sea level.
    pub elevation: Option<f64>,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self {
            lat,
            lon,
            elevation: None,
        }
    }

    pub fn with_elevation(lat: f64, lon: f64, elevation: f64) -> Self {
        Self {
            lat,
            lon,
            elevation: Some(elevation),
        }
    }

    pub fn rounded(&self) -> Self {
        Self {
            lat: round_to(self.lat, 5),
            lon: round_to(self.lon, 5),
            elevation: self.elevation.map(f64::round),
        }
    }

    pub fn position(&self) -> Self {
        Self::new(self.lat, self.lon)
    }
}

impl Serialize for GeoPoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = if self.elevation.is_some() { 3 } else { 2 };
        let mut seq = serializer.serialize_seq(Some(len))?;
        seq.serialize_element(&self.lat)?;
        seq.serialize_element(&self.lon)?;
        if let Some(elevation) = self.elevation {
            seq.serialize_element(&CompactNumber(elevation))?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for GeoPoint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct GeoPointVisitor;

        impl<'de> Visitor<'de> for GeoPointVisitor {
            type Value = GeoPoint;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an array of [lat, lon] or [lat, lon, elevation]")
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<GeoPoint, A::Error> {
                let lat: f64 = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(0, &self))?;
                let lon: f64 = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(1, &self))?;
                let elevation: Option<Option<f64>> = seq.next_element()?;
                // Tolerate trailing extras rather than rejecting the whole document.
                while seq.next_element::<de::IgnoredAny>()?.is_some() {}
                Ok(GeoPoint {
                    lat,
                    lon,
                    elevation: elevation.flatten(),
                })
            }
        }

        deserializer.deserialize_seq(GeoPointVisitor)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    #[serde(serialize_with = "serialize_compact")]
    pub distance: f64,
    #[serde(default, serialize_with = "serialize_compact_opt")]
    pub elevation: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ChartPoint {
    pub fn new(distance: f64, elevation: f64) -> Self {
        Self {
            distance,
            elevation: Some(elevation),
            extra: Map::new(),
        }
    }
}

/// Writes whole numbers as JSON integers so rewritten files keep `4000`
/// instead of `4000.0`.
pub struct CompactNumber(pub f64);

impl Serialize for CompactNumber {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let value = self.0;
        if value.is_finite() && value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
            serializer.serialize_i64(value as i64)
        } else {
            serializer.serialize_f64(value)
        }
    }
}

pub fn serialize_compact<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    CompactNumber(*value).serialize(serializer)
}

pub fn serialize_compact_opt<S: Serializer>(
    value: &Option<f64>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match value {
        Some(v) => CompactNumber(*v).serialize(serializer),
        None => serializer.serialize_none(),
    }
}

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
