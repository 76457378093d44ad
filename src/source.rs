// Copyright (C) 2023 Dheatly23
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Lesser General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Lesser General Public License for more details.
//
// You should have received a copy of the GNU Lesser General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use std::fmt;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use image::codecs::jpeg::JpegEncoder;
use image::io::Reader as ImageReader;
use image::{ColorType, DynamicImage, ImageError};
use reqwest::blocking::Client;
use reqwest::StatusCode;
use thiserror::Error;

/// Default JPEG quality for saved pages.
pub const DEFAULT_QUALITY: u8 = 95;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failure to download image ({url}): {source}")]
    Http { url: String, source: reqwest::Error },
    #[error("http status is invalid ({url}): {status}")]
    Status { url: String, status: StatusCode },
    #[error("I/O error ({path}): {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failure to decode image ({location}): {source}")]
    Decode { location: String, source: ImageError },
    #[error("failure to save image ({path}): {source}")]
    Encode { path: PathBuf, source: ImageError },
}

/// Where a page comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageSource {
    Url(String),
    Path(PathBuf),
}

impl PageSource {
    /// `http://` and `https://` locations are URLs, anything else is a file path.
    pub fn parse(location: &str) -> Self {
        if location.starts_with("http://") || location.starts_with("https://") {
            Self::Url(location.to_owned())
        } else {
            Self::Path(PathBuf::from(location))
        }
    }

    /// Retrieves and decodes the image.
    pub fn fetch(&self, client: &Client) -> Result<DynamicImage, SourceError> {
        match self {
            Self::Url(url) => {
                let http = |source| SourceError::Http {
                    url: url.clone(),
                    source,
                };
                let resp = client.get(url).send().map_err(http)?;
                if resp.status() != StatusCode::OK {
                    return Err(SourceError::Status {
                        url: url.clone(),
                        status: resp.status(),
                    });
                }
                let bytes = resp.bytes().map_err(http)?;

                image::load_from_memory(&bytes).map_err(|source| SourceError::Decode {
                    location: url.clone(),
                    source,
                })
            }
            Self::Path(path) => {
                let io = |source| SourceError::Io {
                    path: path.clone(),
                    source,
                };
                let reader = ImageReader::new(BufReader::new(File::open(path).map_err(io)?))
                    .with_guessed_format()
                    .map_err(io)?;

                reader.decode().map_err(|source| SourceError::Decode {
                    location: path.display().to_string(),
                    source,
                })
            }
        }
    }
}

impl fmt::Display for PageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Url(url) => f.write_str(url),
            Self::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Encodes `image` as JPEG. Alpha is dropped.
pub fn save_jpeg(image: &DynamicImage, path: &Path, quality: u8) -> Result<(), SourceError> {
    let file = File::create(path).map_err(|source| SourceError::Io {
        path: path.to_owned(),
        source,
    })?;

    let rgb = image.to_rgb8();
    JpegEncoder::new_with_quality(BufWriter::new(file), quality)
        .encode(rgb.as_raw(), rgb.width(), rgb.height(), ColorType::Rgb8)
        .map_err(|source| SourceError::Encode {
            path: path.to_owned(),
            source,
        })
}
