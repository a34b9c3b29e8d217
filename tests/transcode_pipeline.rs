//! Transcoder orchestration against recording collaborators.

#![cfg(feature = "std")]

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use transcode_geometry::MediaMetadata;
use transcode_geometry::transcode::{
    EncoderRunner, Invocation, MetadataSource, RunError, TranscodeError, TranscodeOptions,
    TranscodeOutcome, Transcoder,
};

/// Metadata source returning a fixed answer and recording what it was asked.
#[derive(Default)]
struct MockExtractor {
    metadata: Option<MediaMetadata>,
    identified: Mutex<Vec<PathBuf>>,
}

impl MockExtractor {
    fn with(metadata: MediaMetadata) -> Self {
        Self {
            metadata: Some(metadata),
            identified: Mutex::new(Vec::new()),
        }
    }

    fn unsupported() -> Self {
        Self::default()
    }
}

impl MetadataSource for MockExtractor {
    fn identify(&self, path: &Path) -> Option<MediaMetadata> {
        self.identified.lock().unwrap().push(path.to_path_buf());
        self.metadata.clone()
    }
}

/// Encoder runner that records invocations without running anything.
#[derive(Default)]
struct MockRunner {
    fail_with: Option<i32>,
    invocations: Mutex<Vec<Invocation>>,
}

impl MockRunner {
    fn new() -> Self {
        Self::default()
    }

    fn failing(code: i32) -> Self {
        Self {
            fail_with: Some(code),
            invocations: Mutex::new(Vec::new()),
        }
    }

    fn invocations(&self) -> Vec<Invocation> {
        self.invocations.lock().unwrap().clone()
    }

    fn args(&self) -> Vec<String> {
        let invocations = self.invocations();
        assert_eq!(invocations.len(), 1, "expected exactly one run");
        invocations[0]
            .args()
            .into_iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }
}

impl EncoderRunner for MockRunner {
    fn run(&self, invocation: &Invocation) -> Result<(), RunError> {
        self.invocations.lock().unwrap().push(invocation.clone());
        match self.fail_with {
            None => Ok(()),
            Some(code) => Err(RunError::Status {
                program: "ffmpeg".into(),
                code: Some(code),
                stderr: "Conversion failed!".into(),
            }),
        }
    }
}

fn options(geometry: &str) -> TranscodeOptions {
    TranscodeOptions::new().geometry(geometry.parse().unwrap())
}

#[test]
fn video_is_resized() {
    let extractor = MockExtractor::with(MediaMetadata::new(1920, 1080));
    let runner = MockRunner::new();
    let outcome = Transcoder::new(options("640x480>").format("mp4"), &extractor, &runner)
        .transcode(Path::new("clip.mov"), Path::new("clip.mp4"))
        .unwrap();

    assert_eq!(
        runner.args(),
        ["-y", "-i", "clip.mov", "-s", "640x360", "clip.mp4"]
    );
    match outcome {
        TranscodeOutcome::Transcoded { metadata, geometry } => {
            assert_eq!(metadata, MediaMetadata::new(1920, 1080));
            assert_eq!(geometry.map(|g| (g.width, g.height)), Some((640, 360)));
        }
        other => panic!("unexpected outcome {other:?}"),
    }
    assert_eq!(*extractor.identified.lock().unwrap(), [PathBuf::from("clip.mov")]);
}

#[test]
fn satisfied_geometry_omits_size() {
    let extractor = MockExtractor::with(MediaMetadata::new(320, 240));
    let runner = MockRunner::new();
    Transcoder::new(options("640x480>"), &extractor, &runner)
        .transcode(Path::new("a.mov"), Path::new("a.mp4"))
        .unwrap();

    assert_eq!(runner.args(), ["-y", "-i", "a.mov", "a.mp4"]);
}

#[test]
fn pad_filter_prepended_to_caller_chain() {
    let extractor = MockExtractor::with(MediaMetadata::new(1000, 500));
    let runner = MockRunner::new();
    let mut opts = options("400x300#");
    opts.convert_options.output.set("vf", "hflip");
    Transcoder::new(opts, &extractor, &runner)
        .transcode(Path::new("a.mov"), Path::new("a.mp4"))
        .unwrap();

    let args = runner.args();
    let vf = args.iter().position(|a| a == "-vf").unwrap();
    assert_eq!(args[vf + 1], "scale=400:-1,pad=400:300:0:50:black,hflip");
}

#[test]
fn thumbnail_seeks_and_grabs_one_frame() {
    let extractor = MockExtractor::with(MediaMetadata::new(1280, 720).duration(10.0));
    let runner = MockRunner::new();
    let opts = options("320x")
        .format("jpg")
        .time(transcode_geometry::SeekTime::computed(|m| {
            m.duration.unwrap_or(0.0) / 2.0
        }));
    Transcoder::new(opts, &extractor, &runner)
        .transcode(Path::new("clip.mov"), Path::new("thumb.jpg"))
        .unwrap();

    assert_eq!(
        runner.args(),
        ["-y", "-ss", "5", "-i", "clip.mov", "-s", "320x180", "-vframes", "1", "thumb.jpg"]
    );
}

#[test]
fn auto_rotate_sizes_as_played_and_clears_tag() {
    let extractor = MockExtractor::with(MediaMetadata::new(1920, 1080).rotation(90));
    let runner = MockRunner::new();
    Transcoder::new(options("540x").auto_rotate(true), &extractor, &runner)
        .transcode(Path::new("phone.mp4"), Path::new("out.mp4"))
        .unwrap();

    assert_eq!(
        runner.args(),
        [
            "-y",
            "-i",
            "phone.mp4",
            "-s",
            "540x960",
            "-metadata:s:v:0",
            "rotate=0",
            "out.mp4"
        ]
    );
}

#[test]
fn unsupported_source_passes_through() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("notes.txt");
    let destination = dir.path().join("copy.txt");
    std::fs::write(&source, b"not media").unwrap();

    let extractor = MockExtractor::unsupported();
    let runner = MockRunner::new();
    let outcome = Transcoder::new(options("100x100"), &extractor, &runner)
        .transcode(&source, &destination)
        .unwrap();

    assert_eq!(outcome, TranscodeOutcome::PassedThrough);
    assert_eq!(std::fs::read(&destination).unwrap(), b"not media");
    assert!(runner.invocations().is_empty());
}

#[test]
fn sizeless_source_passes_through() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("audio.wav");
    let destination = dir.path().join("audio-out.wav");
    std::fs::write(&source, b"RIFF").unwrap();

    let extractor = MockExtractor::with(MediaMetadata::without_size().format("wav"));
    let runner = MockRunner::new();
    let outcome = Transcoder::new(options("100x100"), &extractor, &runner)
        .transcode(&source, &destination)
        .unwrap();

    assert_eq!(outcome, TranscodeOutcome::PassedThrough);
    assert!(destination.exists());
    assert!(runner.invocations().is_empty());
}

#[test]
fn pass_through_of_missing_source_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let extractor = MockExtractor::unsupported();
    let runner = MockRunner::new();
    let err = Transcoder::new(TranscodeOptions::new(), &extractor, &runner)
        .transcode(&dir.path().join("missing.bin"), &dir.path().join("out.bin"))
        .unwrap_err();
    assert!(matches!(err, TranscodeError::Io(_)), "{err}");
}

#[test]
fn whiny_encoder_failure_is_error() {
    let extractor = MockExtractor::with(MediaMetadata::new(640, 480));
    let runner = MockRunner::failing(1);
    let err = Transcoder::new(options("320x240"), &extractor, &runner)
        .transcode(Path::new("/media/broken.mov"), Path::new("out.mp4"))
        .unwrap_err();

    match err {
        TranscodeError::Encoder { name, source } => {
            assert_eq!(name, "broken");
            assert!(matches!(source, RunError::Status { code: Some(1), .. }));
        }
        other => panic!("unexpected error {other}"),
    }
}

#[test]
fn quiet_encoder_failure_is_swallowed() {
    let extractor = MockExtractor::with(MediaMetadata::new(640, 480));
    let runner = MockRunner::failing(1);
    let outcome = Transcoder::new(options("320x240").whiny(false), &extractor, &runner)
        .transcode(Path::new("broken.mov"), Path::new("out.mp4"))
        .unwrap();

    assert!(matches!(outcome, TranscodeOutcome::Transcoded { .. }));
    assert_eq!(runner.invocations().len(), 1);
}

#[test]
fn forced_zero_dimension_is_geometry_error() {
    let extractor = MockExtractor::with(MediaMetadata::new(640, 480));
    let runner = MockRunner::new();
    let err = Transcoder::new(options("100x!"), &extractor, &runner)
        .transcode(Path::new("a.mov"), Path::new("a.mp4"))
        .unwrap_err();
    assert!(matches!(err, TranscodeError::Geometry(_)), "{err}");
    assert!(runner.invocations().is_empty());
}

#[test]
fn collapsed_pad_width_never_reaches_encoder() {
    let extractor = MockExtractor::with(MediaMetadata::new(640, 480));
    let runner = MockRunner::new();
    let err = Transcoder::new(options("1x100#"), &extractor, &runner)
        .transcode(Path::new("a.mov"), Path::new("a.mp4"))
        .unwrap_err();
    assert!(
        matches!(err, TranscodeError::Geometry(transcode_geometry::GeometryError::ZeroDimension)),
        "{err}"
    );
    assert!(runner.invocations().is_empty());
}

#[cfg(feature = "serde")]
#[test]
fn config_file_drives_transcode() {
    use transcode_geometry::transcode::TranscodeConfig;

    let config: TranscodeConfig = serde_json::from_str(
        r#"{
            "geometry": "640x480",
            "format": "mp4",
            "whiny": false,
            "output_options": [["vcodec", "libx264"], ["an", null]]
        }"#,
    )
    .unwrap();

    let extractor = MockExtractor::with(MediaMetadata::new(1920, 1080));
    let runner = MockRunner::new();
    let transcoder = Transcoder::new(config.into_options().unwrap(), &extractor, &runner);
    assert!(!transcoder.options().whiny);
    transcoder
        .transcode(Path::new("in.mov"), Path::new("out.mp4"))
        .unwrap();

    assert_eq!(
        runner.args(),
        ["-y", "-i", "in.mov", "-vcodec", "libx264", "-an", "-s", "640x360", "out.mp4"]
    );
}
