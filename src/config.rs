//! Parameter bags for the zero-bit and multi-bit schemes.
//!
//! Both can be built in code from `Default` or parsed from a JSON object.
//! Parsing is strict: unrecognized keys and pattern names are errors rather
//! than silently falling back to a default.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::carrier::SeedDerivation;
use crate::error::{Result, WatermarkError};
use crate::pattern::PatternKind;
use crate::redundancy::DEFAULT_REDUNDANCY;

pub const DEFAULT_PIXEL_COUNT: usize = 1000;
pub const DEFAULT_THRESHOLD: f64 = 0.7;
pub const DEFAULT_CHANNELS: [usize; 3] = [0, 1, 2];

const ZERO_BIT_KEYS: &[&str] = &[
    "pixel_count",
    "num_pixels",
    "channels",
    "pattern_kind",
    "pattern",
    "detection_threshold",
    "threshold",
    "seed_derivation",
];

const MULTI_BIT_KEYS: &[&str] = &[
    "message_length",
    "num_bits",
    "redundancy",
    "channels",
    "report_psnr",
    "verbose",
    "seed_derivation",
];

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ZeroBitParams {
    #[serde(alias = "num_pixels")]
    pub pixel_count: usize,
    pub channels: Vec<usize>,
    #[serde(rename = "pattern_kind", alias = "pattern")]
    pub pattern: PatternKind,
    #[serde(rename = "detection_threshold", alias = "threshold")]
    pub threshold: f64,
    pub seed_derivation: SeedDerivation,
}

impl ZeroBitParams {
    pub fn from_json(json: &str) -> Result<Self> {
        let map = parse_object(json, ZERO_BIT_KEYS)?;
        if let Some(Value::String(name)) = map.get("pattern_kind").or_else(|| map.get("pattern")) {
            name.parse::<PatternKind>()?;
        }

        let params: Self = serde_json::from_value(Value::Object(map))?;
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<()> {
        if self.pixel_count == 0 {
            return Err(invalid("pixel_count", "must be at least 1"));
        }
        if self.channels.is_empty() {
            return Err(invalid("channels", "at least one channel is required"));
        }
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(invalid("detection_threshold", "must lie within [0, 1]"));
        }
        Ok(())
    }
}

impl Default for ZeroBitParams {
    fn default() -> Self {
        ZeroBitParams {
            pixel_count: DEFAULT_PIXEL_COUNT,
            channels: DEFAULT_CHANNELS.to_vec(),
            pattern: PatternKind::default(),
            threshold: DEFAULT_THRESHOLD,
            seed_derivation: SeedDerivation::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MultiBitParams {
    /// Required for extraction; on embedding it must agree with the message.
    #[serde(alias = "num_bits")]
    pub message_length: Option<usize>,
    pub redundancy: usize,
    pub channels: Vec<usize>,
    #[serde(alias = "verbose")]
    pub report_psnr: bool,
    pub seed_derivation: SeedDerivation,
}

impl MultiBitParams {
    pub fn with_message_length(message_length: usize) -> Self {
        MultiBitParams {
            message_length: Some(message_length),
            ..Default::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let map = parse_object(json, MULTI_BIT_KEYS)?;
        let params: Self = serde_json::from_value(Value::Object(map))?;
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<()> {
        if self.redundancy == 0 {
            return Err(invalid("redundancy", "must be at least 1"));
        }
        if self.channels.is_empty() {
            return Err(invalid("channels", "at least one channel is required"));
        }
        Ok(())
    }

    pub fn message_length(&self) -> Result<usize> {
        self.message_length
            .ok_or(WatermarkError::MissingParameter("message_length"))
    }
}

impl Default for MultiBitParams {
    fn default() -> Self {
        MultiBitParams {
            message_length: None,
            redundancy: DEFAULT_REDUNDANCY,
            channels: DEFAULT_CHANNELS.to_vec(),
            report_psnr: false,
            seed_derivation: SeedDerivation::default(),
        }
    }
}

fn parse_object(json: &str, known: &[&str]) -> Result<Map<String, Value>> {
    let map: Map<String, Value> = serde_json::from_str(json)?;
    match map.keys().find(|key| !known.contains(&key.as_str())) {
        Some(key) => Err(WatermarkError::UnknownParameter(key.clone())),
        None => Ok(map),
    }
}

fn invalid(name: &'static str, reason: &str) -> WatermarkError {
    WatermarkError::InvalidParameter {
        name,
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_yields_defaults() {
        assert_eq!(ZeroBitParams::from_json("{}").unwrap(), ZeroBitParams::default());
        assert_eq!(MultiBitParams::from_json("{}").unwrap(), MultiBitParams::default());
    }

    #[test]
    fn zero_bit_keys_and_aliases() {
        let params = ZeroBitParams::from_json(
            r#"{"num_pixels": 250, "channels": [2], "pattern": "checksum", "threshold": 0.8}"#,
        )
        .unwrap();
        assert_eq!(params.pixel_count, 250);
        assert_eq!(params.channels, vec![2]);
        assert_eq!(params.pattern, PatternKind::Checksum);
        assert_eq!(params.threshold, 0.8);

        let params = ZeroBitParams::from_json(r#"{"pattern_kind": "ones"}"#).unwrap();
        assert_eq!(params.pattern, PatternKind::Ones);
    }

    #[test]
    fn unknown_pattern_is_a_hard_error() {
        let err = ZeroBitParams::from_json(r#"{"pattern_kind": "stripes"}"#).unwrap_err();
        assert!(matches!(err, WatermarkError::UnknownPattern(name) if name == "stripes"));
    }

    #[test]
    fn unknown_key_is_a_hard_error() {
        let err = MultiBitParams::from_json(r#"{"num_bits": 12, "strength": 2}"#).unwrap_err();
        assert!(matches!(err, WatermarkError::UnknownParameter(key) if key == "strength"));
    }

    #[test]
    fn message_length_is_required() {
        let params = MultiBitParams::from_json(
            r#"{"redundancy": 5, "verbose": true, "seed_derivation": "digest"}"#,
        )
        .unwrap();
        assert!(params.report_psnr);
        assert_eq!(params.seed_derivation, SeedDerivation::Digest);
        assert!(matches!(
            params.message_length(),
            Err(WatermarkError::MissingParameter("message_length"))
        ));
        assert_eq!(MultiBitParams::with_message_length(12).message_length().unwrap(), 12);
    }

    #[test]
    fn ranges_are_validated() {
        assert!(ZeroBitParams::from_json(r#"{"threshold": 1.5}"#).is_err());
        assert!(ZeroBitParams::from_json(r#"{"channels": []}"#).is_err());
        assert!(MultiBitParams::from_json(r#"{"redundancy": 0}"#).is_err());
        assert!(matches!(
            MultiBitParams::from_json("[1, 2]"),
            Err(WatermarkError::InvalidConfig(_))
        ));
    }
}
