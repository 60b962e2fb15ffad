//! Transform definitions and their pixel operations.
//!
//! All pixel work is delegated to the `image` crate, with `imageproc` used for
//! rotations that are not a multiple of 90 degrees.

use std::fmt;
use std::str::FromStr;

use image::imageops::{self, FilterType};
use image::{DynamicImage, GenericImageView, Rgba, RgbaImage};
use imageproc::geometric_transformations::{rotate_about_center, Interpolation};

use crate::error::TransformError;

/// Rotation applied when the request does not specify one.
pub const DEFAULT_ROTATION_DEGREES: i32 = 90;

/// Filter applied when the request does not specify one.
pub const DEFAULT_FILTER_TYPE: &str = "blur";

/// Gaussian sigma used for the blur filter.
pub const BLUR_SIGMA: f32 = 2.0;

/// 3x3 sharpen kernel; `filter3x3` normalizes by the kernel sum (16).
const SHARPEN_KERNEL: [f32; 9] = [-2.0, -2.0, -2.0, -2.0, 32.0, -2.0, -2.0, -2.0, -2.0];

/// Largest resize target accepted, in pixels. Matches the decoder's default
/// 512 MiB allocation limit at four bytes per pixel.
pub const MAX_OUTPUT_PIXELS: u64 = 512 * 1024 * 1024 / 4;

/// Tolerance when rounding rotated bounds up, so exact quarter turns computed
/// in floating point do not gain a pixel.
const BOUNDS_EPSILON: f64 = 1e-6;

// =============================================================================
// Filter Kind
// =============================================================================

/// Convolution filters supported by the filter transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterKind {
    Blur,
    Sharpen,
}

impl FilterKind {
    /// Canonical lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterKind::Blur => "blur",
            FilterKind::Sharpen => "sharpen",
        }
    }
}

impl FromStr for FilterKind {
    type Err = TransformError;

    /// Parse a filter name, ignoring ASCII case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "blur" => Ok(FilterKind::Blur),
            "sharpen" => Ok(FilterKind::Sharpen),
            _ => Err(TransformError::UnsupportedFilter(s.to_string())),
        }
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Transform
// =============================================================================

/// A single-shot image transformation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transform {
    /// Rotate counter-clockwise by `degrees`, expanding the canvas to fit.
    Rotate { degrees: i32 },

    /// Convert to single-channel luminance.
    Grayscale,

    /// Stretch to exactly `width` x `height`.
    Resize { width: u32, height: u32 },

    /// Keep the box `[left, right) x [top, bottom)`, clamped to the image.
    Crop {
        left: i64,
        top: i64,
        right: i64,
        bottom: i64,
    },

    /// Apply a named convolution filter.
    ///
    /// The name is kept as requested: it is validated case-insensitively but
    /// used verbatim in the output filename.
    Filter { filter_type: String },
}

impl Transform {
    /// Short name of the transform kind, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Transform::Rotate { .. } => "rotate",
            Transform::Grayscale => "grayscale",
            Transform::Resize { .. } => "resize",
            Transform::Crop { .. } => "crop",
            Transform::Filter { .. } => "filter",
        }
    }

    /// Derived-store name for the result of applying this transform to
    /// `source_name`.
    ///
    /// Same transform, parameters and source name always produce the same
    /// output name, so repeated requests overwrite one file.
    pub fn output_name(&self, source_name: &str) -> String {
        match self {
            Transform::Rotate { degrees } => format!("rotated_{}_{}", degrees, source_name),
            Transform::Grayscale => format!("grayscale_{}", source_name),
            Transform::Resize { width, height } => {
                format!("resized_{}x{}_{}", width, height, source_name)
            }
            Transform::Crop { .. } => format!("cropped_{}", source_name),
            Transform::Filter { filter_type } => format!("{}_{}", filter_type, source_name),
        }
    }

    /// Check parameters that can be rejected without looking at pixels.
    pub fn validate(&self) -> Result<(), TransformError> {
        match self {
            Transform::Resize { width, height }
                if *width == 0
                    || *height == 0
                    || u64::from(*width) * u64::from(*height) > MAX_OUTPUT_PIXELS =>
            {
                Err(TransformError::InvalidDimensions {
                    width: *width,
                    height: *height,
                })
            }
            Transform::Filter { filter_type } => filter_type.parse::<FilterKind>().map(|_| ()),
            _ => Ok(()),
        }
    }

    /// Apply the transform, producing a new image.
    pub fn apply(&self, image: &DynamicImage) -> Result<DynamicImage, TransformError> {
        self.validate()?;

        match self {
            Transform::Rotate { degrees } => Ok(rotate(image, *degrees)),
            Transform::Grayscale => Ok(DynamicImage::ImageLuma8(image.to_luma8())),
            Transform::Resize { width, height } => {
                Ok(image.resize_exact(*width, *height, FilterType::CatmullRom))
            }
            Transform::Crop {
                left,
                top,
                right,
                bottom,
            } => crop(image, *left, *top, *right, *bottom),
            Transform::Filter { filter_type } => match filter_type.parse::<FilterKind>()? {
                FilterKind::Blur => Ok(image.blur(BLUR_SIGMA)),
                FilterKind::Sharpen => Ok(image.filter3x3(&SHARPEN_KERNEL)),
            },
        }
    }
}

// =============================================================================
// Operations
// =============================================================================

/// Rotate counter-clockwise with an expanded canvas.
///
/// Quarter turns are lossless pixel moves; any other angle is resampled with
/// nearest-neighbour interpolation and the uncovered corners filled black (or
/// transparent when the source has alpha).
fn rotate(image: &DynamicImage, degrees: i32) -> DynamicImage {
    match degrees.rem_euclid(360) {
        0 => image.clone(),
        90 => image.rotate270(),
        180 => image.rotate180(),
        270 => image.rotate90(),
        _ => rotate_expanded(image, degrees),
    }
}

fn rotate_expanded(image: &DynamicImage, degrees: i32) -> DynamicImage {
    let (width, height) = image.dimensions();
    let (new_width, new_height) = rotated_bounds(width, height, degrees);

    // Work on a canvas large enough for both the source and the result so
    // nothing is clipped before the final crop to the rotated bounds.
    let canvas_width = width.max(new_width);
    let canvas_height = height.max(new_height);

    let mut canvas = RgbaImage::new(canvas_width, canvas_height);
    imageops::overlay(
        &mut canvas,
        &image.to_rgba8(),
        i64::from((canvas_width - width) / 2),
        i64::from((canvas_height - height) / 2),
    );

    // imageproc rotates clockwise
    let theta = -(degrees as f32).to_radians();
    let rotated = rotate_about_center(&canvas, theta, Interpolation::Nearest, Rgba([0, 0, 0, 0]));

    let cropped = imageops::crop_imm(
        &rotated,
        (canvas_width - new_width) / 2,
        (canvas_height - new_height) / 2,
        new_width,
        new_height,
    )
    .to_image();

    let result = DynamicImage::ImageRgba8(cropped);
    if image.color().has_alpha() {
        result
    } else {
        DynamicImage::ImageRgb8(result.to_rgb8())
    }
}

/// Size of the axis-aligned box enclosing a `width` x `height` image rotated
/// by `degrees`.
pub fn rotated_bounds(width: u32, height: u32, degrees: i32) -> (u32, u32) {
    let (sin, cos) = f64::from(degrees).to_radians().sin_cos();
    let (w, h) = (f64::from(width), f64::from(height));

    let new_width = (w * cos.abs() + h * sin.abs() - BOUNDS_EPSILON).ceil().max(1.0);
    let new_height = (w * sin.abs() + h * cos.abs() - BOUNDS_EPSILON).ceil().max(1.0);

    (new_width as u32, new_height as u32)
}

/// Crop to a box given as edges, clamping it to the image bounds.
fn crop(
    image: &DynamicImage,
    left: i64,
    top: i64,
    right: i64,
    bottom: i64,
) -> Result<DynamicImage, TransformError> {
    let (width, height) = image.dimensions();

    let x0 = left.clamp(0, i64::from(width));
    let y0 = top.clamp(0, i64::from(height));
    let x1 = right.clamp(0, i64::from(width));
    let y1 = bottom.clamp(0, i64::from(height));

    if x1 <= x0 || y1 <= y0 {
        return Err(TransformError::EmptyCrop {
            left,
            top,
            right,
            bottom,
        });
    }

    // Clamped values fit in u32
    Ok(image.crop_imm(x0 as u32, y0 as u32, (x1 - x0) as u32, (y1 - y0) as u32))
}

// =============================================================================
// Tests
// =============================================================================
