//! Geometry resolution and encoder parameter planning for media transcoding.
//!
//! Turns an ImageMagick-style geometry string (`300x200#`, `x150`,
//! `640x480>`) plus source metadata into even output dimensions and, for pad
//! geometries, a scale+pad or scale+crop filter fragment.
//!
//! The geometry engine is pure (no I/O, no logging) and `no_std + alloc`
//! compatible. Process orchestration lives behind the `std` feature.
//!
//! # Modules
//!
//! - [`geometry`] — Geometry string parsing into [`GeometrySpec`]
//! - [`resolve`] — Output dimensions and filter fragments
//! - [`media`] — Source metadata and exact aspect ratios
//! - [`rotation`] — Rotation tags and compensation policy
//! - [`filter`] — Filter fragments and chain merging
//! - [`color`] — Pad color validation
//! - [`params`] — Encoder options, seek time
//! - `transcode` — Encoder invocation through injected collaborators (`std`)
//!
//! # Example
//!
//! ```
//! use transcode_geometry::{GeometrySpec, MediaMetadata, Resolver};
//!
//! let spec = GeometrySpec::parse("x150").unwrap();
//! let meta = MediaMetadata::new(300, 200);
//! let out = Resolver::new().resolve(&spec, &meta).unwrap().unwrap();
//!
//! // 150 * 1.5 = 225, floored to even.
//! assert_eq!((out.width, out.height), (224, 150));
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

pub mod color;
pub mod error;
pub mod filter;
pub mod geometry;
pub mod media;
pub mod params;
pub mod resolve;
pub mod rotation;

#[cfg(feature = "std")]
pub mod transcode;

pub use color::PadColor;
pub use error::GeometryError;
pub use filter::{FilterFragment, merge_filters};
pub use geometry::{GeometrySpec, ResizeMode};
pub use media::{AspectRatio, MediaMetadata, Size};
pub use params::{ConvertOptions, Params, SeekTime, output_is_image};
pub use resolve::{ResolvedGeometry, Resolver, resolve};
pub use rotation::{Rotation, RotationCompensation};
