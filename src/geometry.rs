//! ImageMagick-style geometry strings.
//!
//! A geometry names a target frame and how to fit the source into it:
//!
//! | Geometry | Meaning |
//! |---|---|
//! | `300x200` | Fit inside 300×200, preserving aspect ratio |
//! | `300x` | Width 300, height from aspect ratio |
//! | `x150` | Height 150, width from aspect ratio |
//! | `300x200!` | Stretch to exactly 300×200 |
//! | `300x200#` | Scale to width 300, pad (or crop) to 200 high |
//! | `640x480<` | Only enlarge sources narrower than 640 |
//! | `640x480>` | Only shrink sources larger than 640×480 |
//!
//! The modifier may also lead the string (`#300x200`).
//!
//! ```
//! use transcode_geometry::{GeometrySpec, ResizeMode};
//!
//! let spec: GeometrySpec = "300x200#".parse().unwrap();
//! assert_eq!(spec.width, Some(300));
//! assert_eq!(spec.height, Some(200));
//! assert_eq!(spec.mode, ResizeMode::Pad);
//! ```

use core::fmt;
use core::str::FromStr;

use crate::error::GeometryError;

/// How a geometry treats the source aspect ratio.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ResizeMode {
    /// Preserve aspect ratio, fit inside the target box.
    #[default]
    None,
    /// Scale to target width, then pad or crop to target height (`#`).
    Pad,
    /// Resize only when the source is narrower than the target (`<`).
    EnlargeOnly,
    /// Resize only when the source exceeds the target (`>`).
    ShrinkOnly,
    /// Ignore aspect ratio, stretch to the exact target (`!`).
    ForceAspect,
}

impl ResizeMode {
    /// The modifier character for this mode, if any.
    pub fn modifier(self) -> Option<char> {
        match self {
            ResizeMode::None => None,
            ResizeMode::Pad => Some('#'),
            ResizeMode::EnlargeOnly => Some('<'),
            ResizeMode::ShrinkOnly => Some('>'),
            ResizeMode::ForceAspect => Some('!'),
        }
    }
}

/// Parsed geometry: target dimensions plus resize mode.
///
/// At least one of `width` / `height` is always set.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct GeometrySpec {
    /// Target width. `None` derives it from height and aspect ratio.
    pub width: Option<u32>,
    /// Target height. `None` derives it from width and aspect ratio.
    pub height: Option<u32>,
    /// Resize mode from the modifier character.
    pub mode: ResizeMode,
}

impl GeometrySpec {
    /// Geometry with both target dimensions.
    pub const fn new(width: u32, height: u32, mode: ResizeMode) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
            mode,
        }
    }

    /// Width-only geometry (`300x`).
    pub const fn width_only(width: u32) -> Self {
        Self {
            width: Some(width),
            height: None,
            mode: ResizeMode::None,
        }
    }

    /// Height-only geometry (`x150`).
    pub const fn height_only(height: u32) -> Self {
        Self {
            width: None,
            height: Some(height),
            mode: ResizeMode::None,
        }
    }

    /// Set the resize mode.
    pub const fn mode(mut self, mode: ResizeMode) -> Self {
        self.mode = mode;
        self
    }

    /// Parse a geometry string.
    pub fn parse(raw: &str) -> Result<Self, GeometryError> {
        let mut flags = Modifiers::default();
        let mut body = raw.trim();

        if let Some(first) = body.chars().next()
            && flags.record(first, false)
        {
            body = &body[first.len_utf8()..];
        }

        while let Some(last) = body.chars().next_back() {
            if !flags.record(last, true) {
                break;
            }
            body = &body[..body.len() - last.len_utf8()];
        }

        let (w_token, h_token) = match body.find(['x', 'X']) {
            Some(i) => (&body[..i], &body[i + 1..]),
            None => (body, ""),
        };

        let width = parse_token(w_token, &mut flags)?;
        let height = parse_token(h_token, &mut flags)?;
        if width.is_none() && height.is_none() {
            return Err(GeometryError::InvalidGeometry);
        }

        Ok(Self {
            width,
            height,
            mode: flags.resolve(),
        })
    }

    /// Whether aspect ratio is preserved.
    pub fn keeps_aspect(&self) -> bool {
        self.mode != ResizeMode::ForceAspect
    }
}

impl FromStr for GeometrySpec {
    type Err = GeometryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for GeometrySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(w) = self.width {
            write!(f, "{w}")?;
        }
        f.write_str("x")?;
        if let Some(h) = self.height {
            write!(f, "{h}")?;
        }
        if let Some(m) = self.mode.modifier() {
            write!(f, "{m}")?;
        }
        Ok(())
    }
}

/// Modifier characters seen while parsing.
#[derive(Default)]
struct Modifiers {
    force: bool,
    pad: bool,
    enlarge: bool,
    shrink: bool,
}

impl Modifiers {
    /// Record `c` if it is a modifier. `!` only counts at the trailing end.
    fn record(&mut self, c: char, trailing: bool) -> bool {
        match c {
            '#' => self.pad = true,
            '<' => self.enlarge = true,
            '>' => self.shrink = true,
            '!' if trailing => self.force = true,
            _ => return false,
        }
        true
    }

    fn resolve(&self) -> ResizeMode {
        if self.force {
            ResizeMode::ForceAspect
        } else if self.pad {
            ResizeMode::Pad
        } else if self.enlarge {
            ResizeMode::EnlargeOnly
        } else if self.shrink {
            ResizeMode::ShrinkOnly
        } else {
            ResizeMode::None
        }
    }
}

/// Strip `!` from either end of a token, then read its leading digit run.
fn parse_token(token: &str, flags: &mut Modifiers) -> Result<Option<u32>, GeometryError> {
    let mut token = token.trim();
    if let Some(rest) = token.strip_prefix('!') {
        flags.force = true;
        token = rest;
    }
    if let Some(rest) = token.strip_suffix('!') {
        flags.force = true;
        token = rest;
    }

    let digits_end = token
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(token.len());
    let digits = &token[..digits_end];
    if digits.is_empty() {
        return Ok(None);
    }
    digits
        .parse::<u32>()
        .map(Some)
        .map_err(|_| GeometryError::DimensionOverflow)
}
