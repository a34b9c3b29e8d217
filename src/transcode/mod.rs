//! Transcoding orchestration: identify → resolve geometry → build invocation → run.
//!
//! The metadata extractor and the encoder process sit behind the
//! [`MetadataSource`] and [`EncoderRunner`] traits. Progress is reported via
//! `tracing` events; install a subscriber to see them.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use transcode_geometry::transcode::{
//!     FfmpegRunner, MetadataSource, TranscodeOptions, Transcoder,
//! };
//! use transcode_geometry::MediaMetadata;
//!
//! struct Fixed;
//! impl MetadataSource for Fixed {
//!     fn identify(&self, _: &Path) -> Option<MediaMetadata> {
//!         Some(MediaMetadata::new(1920, 1080))
//!     }
//! }
//!
//! let options = TranscodeOptions::new()
//!     .geometry("640x480>".parse().unwrap())
//!     .format("mp4");
//! let runner = FfmpegRunner::default();
//! Transcoder::new(options, &Fixed, &runner)
//!     .transcode(Path::new("in.mov"), Path::new("out.mp4"))
//!     .unwrap();
//! ```

mod runner;

#[cfg(feature = "serde")]
mod config;

pub use runner::{EncoderRunner, FfmpegRunner, Invocation, MetadataSource, RunError};

#[cfg(feature = "serde")]
pub use config::TranscodeConfig;

use std::path::Path;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::color::PadColor;
use crate::error::GeometryError;
use crate::geometry::GeometrySpec;
use crate::media::MediaMetadata;
use crate::params::{ConvertOptions, SeekTime, output_is_image};
use crate::resolve::{ResolvedGeometry, Resolver};
use crate::rotation::RotationCompensation;

/// Output option that resets the stream's rotation tag.
const ROTATE_METADATA_KEY: &str = "metadata:s:v:0";

/// Transcoding failure.
#[derive(Error, Debug)]
pub enum TranscodeError {
    /// The configured geometry cannot be applied to this source.
    #[error("geometry error: {0}")]
    Geometry(#[from] GeometryError),
    /// Copying a passed-through file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// The encoder failed and `whiny` is set.
    #[error("error while transcoding {name}: {source}")]
    Encoder {
        /// Source file stem.
        name: String,
        #[source]
        source: RunError,
    },
}

/// What [`Transcoder::transcode`] did with the source.
#[derive(Clone, Debug, PartialEq)]
pub enum TranscodeOutcome {
    /// The encoder ran (or failed quietly when not whiny).
    Transcoded {
        /// Metadata reported for the source, for the caller to persist.
        metadata: MediaMetadata,
        /// Resolved output geometry. `None` when no geometry was requested
        /// or the source already satisfied it.
        geometry: Option<ResolvedGeometry>,
    },
    /// The source could not be identified or sized and was copied unchanged.
    PassedThrough,
}

/// Transcode settings.
#[derive(Debug)]
pub struct TranscodeOptions {
    /// Target geometry. `None` keeps the source size.
    pub geometry: Option<GeometrySpec>,
    /// Output format name (`mp4`, `jpg`, …). Image formats grab one frame.
    pub format: Option<String>,
    /// Size rotated sources as they play back and clear their rotation tag.
    pub auto_rotate: bool,
    /// Which rotation tags trigger compensation.
    pub compensation: RotationCompensation,
    /// Pad color for `#` geometries.
    pub pad_color: PadColor,
    /// Frame to grab for image output.
    pub time: SeekTime,
    /// Fail on encoder errors instead of logging them.
    pub whiny: bool,
    /// Extra encoder options. Geometry output is merged into these.
    pub convert_options: ConvertOptions,
}

impl Default for TranscodeOptions {
    fn default() -> Self {
        Self {
            geometry: None,
            format: None,
            auto_rotate: false,
            compensation: RotationCompensation::default(),
            pad_color: PadColor::default(),
            time: SeekTime::default(),
            whiny: true,
            convert_options: ConvertOptions::default(),
        }
    }
}

impl TranscodeOptions {
    /// Defaults: no geometry, whiny, black padding, 3 s seek.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the target geometry.
    pub fn geometry(mut self, geometry: GeometrySpec) -> Self {
        self.geometry = Some(geometry);
        self
    }

    /// Set the output format name.
    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    /// Enable rotation compensation and rotation-tag reset.
    pub fn auto_rotate(mut self, auto_rotate: bool) -> Self {
        self.auto_rotate = auto_rotate;
        self
    }

    /// Choose which rotation tags are compensated.
    pub fn compensation(mut self, compensation: RotationCompensation) -> Self {
        self.compensation = compensation;
        self
    }

    /// Set the pad color.
    pub fn pad_color(mut self, color: PadColor) -> Self {
        self.pad_color = color;
        self
    }

    /// Set the seek time for image output.
    pub fn time(mut self, time: impl Into<SeekTime>) -> Self {
        self.time = time.into();
        self
    }

    /// Fail on encoder errors (`true`) or log them (`false`).
    pub fn whiny(mut self, whiny: bool) -> Self {
        self.whiny = whiny;
        self
    }

    /// Replace the extra encoder options.
    pub fn convert_options(mut self, options: ConvertOptions) -> Self {
        self.convert_options = options;
        self
    }

    fn resolver(&self) -> Resolver {
        Resolver::new()
            .auto_rotate(self.auto_rotate)
            .compensation(self.compensation)
            .pad_color(self.pad_color.clone())
    }
}

/// Transcodes one file per call with fixed options and collaborators.
pub struct Transcoder<'a> {
    options: TranscodeOptions,
    extractor: &'a dyn MetadataSource,
    runner: &'a dyn EncoderRunner,
}

impl<'a> Transcoder<'a> {
    /// Transcoder using `extractor` to identify sources and `runner` to encode.
    pub fn new(
        options: TranscodeOptions,
        extractor: &'a dyn MetadataSource,
        runner: &'a dyn EncoderRunner,
    ) -> Self {
        Self {
            options,
            extractor,
            runner,
        }
    }

    /// Options this transcoder was built with.
    pub fn options(&self) -> &TranscodeOptions {
        &self.options
    }

    /// Transcode `source` into `destination`.
    ///
    /// Sources the extractor can't identify or size are copied through
    /// unchanged. Encoder failures are errors only when `whiny` is set.
    pub fn transcode(
        &self,
        source: &Path,
        destination: &Path,
    ) -> Result<TranscodeOutcome, TranscodeError> {
        let Some(meta) = self.extractor.identify(source) else {
            warn!(source = %source.display(), "unsupported file, passing through");
            return pass_through(source, destination);
        };

        let geometry = match self.resolve(&meta) {
            Err(GeometryError::UnresolvableGeometry) => {
                warn!(source = %source.display(), "source size unknown, passing through");
                return pass_through(source, destination);
            }
            other => other?,
        };

        info!(source = %source.display(), "transcoding supported file");
        let invocation = self.plan(source, destination, &meta, geometry.as_ref());

        match self.runner.run(&invocation) {
            Ok(()) => {
                info!(
                    source = %source.display(),
                    destination = %destination.display(),
                    "successfully transcoded"
                );
            }
            Err(e) if self.options.whiny => {
                return Err(TranscodeError::Encoder {
                    name: display_name(source),
                    source: e,
                });
            }
            Err(e) => {
                warn!(source = %source.display(), error = %e, "transcoding failed, ignoring");
            }
        }

        Ok(TranscodeOutcome::Transcoded {
            metadata: meta,
            geometry,
        })
    }

    /// Resolve the configured geometry against `meta`. `Ok(None)` when no
    /// geometry is set or the source is left as is.
    pub fn resolve(&self, meta: &MediaMetadata) -> Result<Option<ResolvedGeometry>, GeometryError> {
        let Some(spec) = &self.options.geometry else {
            return Ok(None);
        };
        let resolved = self.options.resolver().resolve(spec, meta)?;
        match &resolved {
            Some(r) => debug!(
                geometry = %spec,
                width = r.width,
                height = r.height,
                filter = ?r.filter_fragment(),
                "resolved geometry"
            ),
            None => debug!(geometry = %spec, "geometry leaves source size unchanged"),
        }
        Ok(resolved)
    }

    /// Build the encoder invocation for an identified source.
    pub fn plan(
        &self,
        source: &Path,
        destination: &Path,
        meta: &MediaMetadata,
        geometry: Option<&ResolvedGeometry>,
    ) -> Invocation {
        let mut opts = self.options.convert_options.clone();
        opts.apply_geometry(geometry);

        if self.options.auto_rotate && meta.rotation.is_some_and(|r| r != 0) {
            // The encoder applies the rotation itself; drop the tag so players
            // don't rotate a second time.
            opts.output.set(ROTATE_METADATA_KEY, "rotate=0");
        }

        if output_is_image(self.options.format.as_deref()) {
            let seek = self.options.time.resolve(meta);
            opts.input.set("ss", format_seconds(seek));
            opts.output.set("vframes", "1");
        }

        let mut invocation = Invocation::new(source, destination);
        invocation.input = opts.input;
        invocation.output = opts.output;
        invocation
    }
}

fn pass_through(source: &Path, destination: &Path) -> Result<TranscodeOutcome, TranscodeError> {
    std::fs::copy(source, destination)?;
    Ok(TranscodeOutcome::PassedThrough)
}

fn display_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Seconds without a trailing `.0` for whole values (`3`, `1.5`).
fn format_seconds(seconds: f64) -> String {
    if seconds.fract() == 0.0 {
        format!("{}", seconds as u64)
    } else {
        format!("{seconds}")
    }
}
