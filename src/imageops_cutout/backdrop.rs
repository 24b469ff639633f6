use std::fmt;
use std::str::FromStr;

use image::{imageops, imageops::FilterType, Rgba};
use imageproc::definitions::Image;
use serde::{Deserialize, Serialize};

use crate::error::CutoutError;

/// An sRGB colour written as `#RRGGBB` or `#RRGGBBAA`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor(pub Rgba<u8>);

impl FromStr for HexColor {
    type Err = CutoutError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || CutoutError::InvalidInput(format!("invalid hex colour: {value:?}"));

        let digits = value.strip_prefix('#').unwrap_or(value);
        if !matches!(digits.len(), 6 | 8) || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let mut channels = [u8::MAX; 4];
        for (channel, start) in channels.iter_mut().zip((0..digits.len()).step_by(2)) {
            *channel = u8::from_str_radix(&digits[start..start + 2], 16).map_err(|_| invalid())?;
        }
        Ok(Self(Rgba(channels)))
    }
}

impl TryFrom<String> for HexColor {
    type Error = CutoutError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<HexColor> for String {
    fn from(color: HexColor) -> Self {
        color.to_string()
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Rgba([red, green, blue, alpha]) = self.0;
        write!(f, "#{red:02X}{green:02X}{blue:02X}")?;
        if alpha != u8::MAX {
            write!(f, "{alpha:02X}")?;
        }
        Ok(())
    }
}

/// What to place behind a cut-out
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Backdrop {
    /// Keep the transparent background
    #[default]
    Transparent,
    /// Fill with a solid colour
    Solid(Rgba<u8>),
    /// Use another image, stretched to the cut-out's size
    Image(Image<Rgba<u8>>),
}

impl Backdrop {
    /// Alpha-blends `foreground` over this backdrop
    ///
    /// The result always has the foreground's dimensions.
    pub fn composite(&self, foreground: Image<Rgba<u8>>) -> Image<Rgba<u8>> {
        let (width, height) = foreground.dimensions();
        let mut canvas = match self {
            Self::Transparent => return foreground,
            Self::Solid(color) => Image::from_pixel(width, height, *color),
            Self::Image(image) if image.dimensions() == (width, height) => image.clone(),
            Self::Image(image) => imageops::resize(image, width, height, FilterType::Lanczos3),
        };
        imageops::overlay(&mut canvas, &foreground, 0, 0);
        canvas
    }
}

impl From<HexColor> for Backdrop {
    fn from(HexColor(color): HexColor) -> Self {
        Self::Solid(color)
    }
}
