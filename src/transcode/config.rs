//! Serializable transcode settings.

use serde::{Deserialize, Serialize};

use super::TranscodeOptions;
use crate::color::PadColor;
use crate::error::GeometryError;
use crate::geometry::GeometrySpec;
use crate::params::{ConvertOptions, Params, SeekTime};

/// Transcode settings as they appear in a config file.
///
/// ```
/// use transcode_geometry::transcode::TranscodeConfig;
///
/// let config: TranscodeConfig = serde_json::from_str(
///     r##"{ "geometry": "300x200#", "format": "jpg", "pad_color": "#ffffff", "time": 1.5 }"##,
/// ).unwrap();
/// let options = config.into_options().unwrap();
/// assert_eq!(options.geometry.unwrap().to_string(), "300x200#");
/// assert_eq!(options.pad_color.to_string(), "0xFFFFFF");
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TranscodeConfig {
    /// Geometry string such as `640x480>`.
    pub geometry: Option<String>,
    pub format: Option<String>,
    pub auto_rotate: bool,
    /// Color name or hex value. Defaults to black.
    pub pad_color: Option<String>,
    /// Seek position in seconds for image output.
    pub time: Option<f64>,
    pub whiny: bool,
    /// Encoder options before the source, in order. A `null` value is a flag.
    pub input_options: Vec<(String, Option<String>)>,
    /// Encoder options before the destination, in order.
    pub output_options: Vec<(String, Option<String>)>,
}

impl Default for TranscodeConfig {
    fn default() -> Self {
        Self {
            geometry: None,
            format: None,
            auto_rotate: false,
            pad_color: None,
            time: None,
            whiny: true,
            input_options: Vec::new(),
            output_options: Vec::new(),
        }
    }
}

impl TranscodeConfig {
    /// Validate and convert into runtime options.
    pub fn into_options(self) -> Result<TranscodeOptions, GeometryError> {
        let geometry = self
            .geometry
            .as_deref()
            .map(GeometrySpec::parse)
            .transpose()?;
        let pad_color = self
            .pad_color
            .as_deref()
            .map(PadColor::parse)
            .transpose()?
            .unwrap_or_default();

        let convert_options = ConvertOptions {
            input: params(self.input_options),
            output: params(self.output_options),
        };

        Ok(TranscodeOptions {
            geometry,
            format: self.format,
            auto_rotate: self.auto_rotate,
            pad_color,
            time: self.time.map(SeekTime::Seconds).unwrap_or_default(),
            whiny: self.whiny,
            convert_options,
            ..TranscodeOptions::default()
        })
    }
}

fn params(entries: Vec<(String, Option<String>)>) -> Params {
    let mut p = Params::new();
    for (key, value) in entries {
        match value {
            Some(v) => p.set(key, v),
            None => p.flag(key),
        };
    }
    p
}
