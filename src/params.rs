//! Encoder parameters: ordered input/output options and seek time.

use alloc::boxed::Box;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;

use crate::filter::merge_filters;
use crate::media::MediaMetadata;
use crate::resolve::ResolvedGeometry;

/// Ordered encoder options, e.g. `s=640x480`, `vf=hflip`, `an` (flag).
///
/// Setting an existing key replaces its value in place.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Params {
    entries: Vec<(String, Option<String>)>,
}

impl Params {
    /// Empty parameter list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key` to `value`, keeping the original position if present.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.put(key.into(), Some(value.into()))
    }

    /// Set a valueless flag such as `an`.
    pub fn flag(&mut self, key: impl Into<String>) -> &mut Self {
        self.put(key.into(), None)
    }

    fn put(&mut self, key: String, value: Option<String>) -> &mut Self {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
        self
    }

    /// Value for `key`. Flags return `Some(None)`.
    pub fn get(&self, key: &str) -> Option<Option<&str>> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_deref())
    }

    /// Value for `key`, ignoring flags.
    pub fn value(&self, key: &str) -> Option<&str> {
        self.get(key).flatten()
    }

    /// Remove `key`, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<Option<String>> {
        let idx = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(idx).1)
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_deref()))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Command-line form: `-key value` pairs, `-key` for flags.
    pub fn to_args(&self) -> Vec<String> {
        let mut args = Vec::with_capacity(self.entries.len() * 2);
        for (k, v) in &self.entries {
            args.push(alloc::format!("-{k}"));
            if let Some(v) = v {
                args.push(v.clone());
            }
        }
        args
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut p = Params::new();
        for (k, v) in iter {
            p.set(k, v);
        }
        p
    }
}

/// Options placed before (`input`) and after (`output`) the source.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Options placed before `-i <source>`.
    pub input: Params,
    /// Options placed before the destination. Geometry lands here.
    pub output: Params,
}

/// Output size option key.
pub const SIZE_KEY: &str = "s";
/// Video filter chain option key.
pub const FILTER_KEY: &str = "vf";

impl ConvertOptions {
    /// Empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge a resolution into the output options.
    ///
    /// Sets the output size and prepends any filter fragment to the existing
    /// filter chain. `None` (source left unchanged) touches nothing.
    pub fn apply_geometry(&mut self, resolved: Option<&ResolvedGeometry>) -> &mut Self {
        let Some(r) = resolved else {
            return self;
        };
        self.output.set(SIZE_KEY, r.size().to_string());
        if let Some(fragment) = &r.filter {
            let chain = merge_filters(fragment, self.output.value(FILTER_KEY));
            self.output.set(FILTER_KEY, chain);
        }
        self
    }
}

/// Default seek position for still-image output, in seconds.
pub const DEFAULT_SEEK_SECONDS: f64 = 3.0;

/// Where to grab a frame when the output is a still image.
pub enum SeekTime {
    /// Fixed offset in seconds.
    Seconds(f64),
    /// Offset computed from the source metadata.
    Computed(Box<dyn Fn(&MediaMetadata) -> f64 + Send + Sync>),
}

impl SeekTime {
    /// Seek computed from metadata, e.g. halfway through the clip.
    pub fn computed(f: impl Fn(&MediaMetadata) -> f64 + Send + Sync + 'static) -> Self {
        Self::Computed(Box::new(f))
    }

    /// Resolve to seconds. Negative and non-finite results clamp to 0.
    pub fn resolve(&self, meta: &MediaMetadata) -> f64 {
        let t = match self {
            SeekTime::Seconds(s) => *s,
            SeekTime::Computed(f) => f(meta),
        };
        if t.is_finite() && t > 0.0 { t } else { 0.0 }
    }
}

impl Default for SeekTime {
    fn default() -> Self {
        Self::Seconds(DEFAULT_SEEK_SECONDS)
    }
}

impl fmt::Debug for SeekTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeekTime::Seconds(s) => f.debug_tuple("Seconds").field(s).finish(),
            SeekTime::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

impl From<f64> for SeekTime {
    fn from(seconds: f64) -> Self {
        Self::Seconds(seconds)
    }
}

/// Whether `format` names a still-image output (`jpg`, `jpeg`, `png`, `gif`).
pub fn output_is_image(format: Option<&str>) -> bool {
    let Some(format) = format else {
        return false;
    };
    let f = format.to_ascii_lowercase();
    f.contains("jpg") || f.contains("jpeg") || f.contains("png") || f.ends_with("gif")
}
