//! Encoder invocation and the process boundary.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use thiserror::Error;

use crate::media::MediaMetadata;
use crate::params::Params;

/// Encoder process failure.
#[derive(Error, Debug)]
pub enum RunError {
    /// The encoder binary could not be started.
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    /// The encoder ran and exited unsuccessfully.
    #[error("{program} exited with code {}: {stderr}", exit_code(.code))]
    Status {
        program: String,
        /// `None` when the process was killed by a signal.
        code: Option<i32>,
        /// Trimmed standard error output.
        stderr: String,
    },
}

fn exit_code(code: &Option<i32>) -> String {
    code.map_or_else(|| "none".to_string(), |c| c.to_string())
}

/// One encoder run: source, destination and the options around them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Invocation {
    pub source: PathBuf,
    pub destination: PathBuf,
    /// Options placed before `-i <source>`.
    pub input: Params,
    /// Options placed before the destination.
    pub output: Params,
}

impl Invocation {
    /// Invocation with no options.
    pub fn new(source: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            input: Params::new(),
            output: Params::new(),
        }
    }

    /// Encoder arguments: `-y <input> -i <source> <output> <destination>`.
    pub fn args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec!["-y".into()];
        args.extend(self.input.to_args().into_iter().map(OsString::from));
        args.push("-i".into());
        args.push(self.source.clone().into_os_string());
        args.extend(self.output.to_args().into_iter().map(OsString::from));
        args.push(self.destination.clone().into_os_string());
        args
    }
}

/// Runs an encoder invocation to completion.
///
/// The production implementation is [`FfmpegRunner`]. Tests substitute a
/// recording mock.
pub trait EncoderRunner: Send + Sync {
    fn run(&self, invocation: &Invocation) -> Result<(), RunError>;
}

/// Reads size, aspect, rotation and format from a media file.
///
/// Returns `None` for files the extractor does not understand; the
/// transcoder passes those through unchanged.
pub trait MetadataSource: Send + Sync {
    fn identify(&self, path: &Path) -> Option<MediaMetadata>;
}

/// Runs the `ffmpeg` binary.
#[derive(Clone, Debug)]
pub struct FfmpegRunner {
    program: PathBuf,
}

impl Default for FfmpegRunner {
    fn default() -> Self {
        Self::new("ffmpeg")
    }
}

impl FfmpegRunner {
    /// Runner for the binary at `program` (a path or a name on `PATH`).
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Full command for an invocation, without running it.
    pub fn command(&self, invocation: &Invocation) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg("-hide_banner")
            .args(["-loglevel", "error"])
            .args(invocation.args())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        cmd
    }
}

impl EncoderRunner for FfmpegRunner {
    fn run(&self, invocation: &Invocation) -> Result<(), RunError> {
        let program = self.program.display().to_string();
        let mut cmd = self.command(invocation);
        tracing::debug!(command = ?cmd, "running encoder");

        let output = cmd.output().map_err(|source| RunError::Spawn {
            program: program.clone(),
            source,
        })?;

        if output.status.success() {
            Ok(())
        } else {
            Err(RunError::Status {
                program,
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }
}
