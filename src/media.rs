//! Source media description supplied by a metadata extractor.
//!
//! Aspect ratios are exact rationals. Dimension math truncates toward zero
//! and ratio comparisons cross-multiply, so results don't depend on
//! floating-point rounding.

use alloc::string::String;
use core::fmt;

use num_traits::float::FloatCore;

/// Width × height dimensions in pixels.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Size {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Size {
    /// Create a new size.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Swap width and height.
    pub const fn transposed(self) -> Self {
        Self {
            width: self.height,
            height: self.width,
        }
    }

    /// Whether either dimension is zero.
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Width-to-height ratio as a reduced fraction.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct AspectRatio {
    num: u64,
    den: u64,
}

/// Denominator used when converting decimal aspect ratios.
const DECIMAL_SCALE: u64 = 1_000_000;

impl AspectRatio {
    /// Exact ratio `num / den`. Returns `None` if either side is zero.
    pub fn new(num: u64, den: u64) -> Option<Self> {
        if num == 0 || den == 0 {
            return None;
        }
        let g = gcd(num, den);
        Some(Self {
            num: num / g,
            den: den / g,
        })
    }

    /// Ratio of a frame's width to its height.
    pub fn from_size(size: Size) -> Option<Self> {
        Self::new(size.width as u64, size.height as u64)
    }

    /// Ratio from a decimal such as `1.333` or `1.7777777`.
    ///
    /// Precision is six decimal places. Returns `None` for zero, negative or
    /// non-finite input.
    pub fn from_decimal(value: f64) -> Option<Self> {
        if !FloatCore::is_finite(value) || value <= 0.0 {
            return None;
        }
        let scaled = FloatCore::round(value * DECIMAL_SCALE as f64);
        if scaled < 1.0 || scaled > u32::MAX as f64 * DECIMAL_SCALE as f64 {
            return None;
        }
        Self::new(scaled as u64, DECIMAL_SCALE)
    }

    /// Numerator of the reduced fraction.
    pub const fn numerator(&self) -> u64 {
        self.num
    }

    /// Denominator of the reduced fraction.
    pub const fn denominator(&self) -> u64 {
        self.den
    }

    /// Height-to-width ratio.
    pub const fn inverse(self) -> Self {
        Self {
            num: self.den,
            den: self.num,
        }
    }

    /// `trunc(height * ratio)`.
    pub fn width_for(&self, height: u32) -> u32 {
        scale_trunc(height, self.num, self.den)
    }

    /// `trunc(width / ratio)`.
    pub fn height_for(&self, width: u32) -> u32 {
        scale_trunc(width, self.den, self.num)
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.num, self.den)
    }
}

/// `trunc(value * num / den)`, saturating at `u32::MAX`.
fn scale_trunc(value: u32, num: u64, den: u64) -> u32 {
    let v = value as u128 * num as u128 / den as u128;
    u32::try_from(v).unwrap_or(u32::MAX)
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// What the metadata extractor reported about a source file.
#[derive(Clone, Debug, PartialEq)]
pub struct MediaMetadata {
    /// Stored frame size. `None` when the extractor could not size the source.
    pub size: Option<Size>,
    /// Display aspect ratio, pre-rotation.
    pub aspect: Option<AspectRatio>,
    /// Rotation tag in degrees, as stored in the container.
    pub rotation: Option<i32>,
    /// Container or codec format name.
    pub format: Option<String>,
    /// Duration in seconds.
    pub duration: Option<f64>,
}

impl MediaMetadata {
    /// Metadata for a source of the given size, aspect ratio taken from it.
    pub fn new(width: u32, height: u32) -> Self {
        let size = Size::new(width, height);
        Self {
            size: Some(size),
            aspect: AspectRatio::from_size(size),
            rotation: None,
            format: None,
            duration: None,
        }
    }

    /// Metadata with no size information.
    pub fn without_size() -> Self {
        Self {
            size: None,
            aspect: None,
            rotation: None,
            format: None,
            duration: None,
        }
    }

    /// Override the aspect ratio (e.g. a display aspect that differs from
    /// the stored frame because of non-square pixels).
    pub fn aspect(mut self, aspect: AspectRatio) -> Self {
        self.aspect = Some(aspect);
        self
    }

    /// Set the rotation tag in degrees.
    pub fn rotation(mut self, degrees: i32) -> Self {
        self.rotation = Some(degrees);
        self
    }

    /// Set the format name.
    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    /// Set the duration in seconds.
    pub fn duration(mut self, seconds: f64) -> Self {
        self.duration = Some(seconds);
        self
    }

    /// Aspect ratio to size against: the reported one, else the frame's.
    pub fn effective_aspect(&self) -> Option<AspectRatio> {
        self.aspect.or_else(|| self.size.and_then(AspectRatio::from_size))
    }
}
