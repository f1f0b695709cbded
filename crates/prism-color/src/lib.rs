//! Packed color samples and RGB helpers.
//!
//! Pure value types, zero I/O. A [`Sample`] is one pixel's packed color used
//! as a scalar ordinal for distance purposes; [`Rgb`] unpacks it using the
//! `0xAARRGGBB` convention documented on [`Rgb::from_packed`].

mod error;
mod rgb;
mod sample;

pub use error::ColorError;
pub use rgb::{Rgb, TextTone};
pub use sample::Sample;
