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

//! Tile reassembly over a fixed 4×4 grid.
//!
//! Both directions work on arrays whose first 2 axes are rows and
//! columns; any trailing axes (channels) move together with their pixel.

use image::{DynamicImage, ImageBuffer, Pixel};
use ndarray::prelude::*;
use ndarray::{ErrorKind, ShapeError, Slice};
use thiserror::Error;
use tracing::debug;

use crate::permutation::generate_permutation;

/// Tiles per axis.
pub const DIVISIONS: usize = 4;
/// Number of cells in the grid.
pub const GRID_SIZE: usize = DIVISIONS * DIVISIONS;
/// Tile sizes are rounded down to a multiple of this (encoder block size).
pub const BLOCK_ALIGN: usize = 8;

#[derive(Debug, Error)]
pub enum DescrambleError {
    #[error("image or tile size is invalid (w:{tile_width}, h:{tile_height})")]
    InvalidGeometry {
        tile_width: usize,
        tile_height: usize,
    },
    #[error("pixel buffer does not match image dimensions: {0}")]
    Layout(#[from] ShapeError),
}

/// Size of one grid tile, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileGeometry {
    pub tile_width: usize,
    pub tile_height: usize,
}

impl TileGeometry {
    /// Computes tile size for an image of `width` × `height` pixels.
    ///
    /// Fails if either side is too small to hold [DIVISIONS] tiles of
    /// [BLOCK_ALIGN] pixels.
    pub fn new(width: usize, height: usize) -> Result<Self, DescrambleError> {
        let tile_width = width / BLOCK_ALIGN / DIVISIONS * BLOCK_ALIGN;
        let tile_height = height / BLOCK_ALIGN / DIVISIONS * BLOCK_ALIGN;
        if tile_width == 0 || tile_height == 0 {
            return Err(DescrambleError::InvalidGeometry {
                tile_width,
                tile_height,
            });
        }

        Ok(Self {
            tile_width,
            tile_height,
        })
    }

    /// Pixel offset `(row, column)` of the top-left corner of `cell`.
    pub fn origin(&self, cell: usize) -> (usize, usize) {
        (
            cell / DIVISIONS * self.tile_height,
            cell % DIVISIONS * self.tile_width,
        )
    }
}

/// Which way tiles are moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Undo the shuffle: cell `d` receives the tile at `map[d]`.
    Descramble,
    /// Apply the shuffle: the tile at cell `d` goes to `map[d]`.
    Scramble,
}

fn copy_tile<A, D>(
    arr: &ArrayView<'_, A, D>,
    out: &mut Array<A, D>,
    geometry: &TileGeometry,
    src: usize,
    dst: usize,
) where
    A: Clone,
    D: Dimension,
{
    let (h, w) = (geometry.tile_height, geometry.tile_width);

    let (r, c) = geometry.origin(src);
    let mut arr = arr.view();
    arr.slice_axis_inplace(Axis(0), Slice::from(r..r + h));
    arr.slice_axis_inplace(Axis(1), Slice::from(c..c + w));

    let (r, c) = geometry.origin(dst);
    let mut out = out.view_mut();
    out.slice_axis_inplace(Axis(0), Slice::from(r..r + h));
    out.slice_axis_inplace(Axis(1), Slice::from(c..c + w));

    out.assign(&arr);
}

/// Moves the 16 grid tiles of `arr` according to the permutation of `seed`.
///
/// Returns a new array of the same shape. Pixels outside the tiled area
/// (right and bottom strips left over by rounding) are never written and
/// stay at `A::default()`.
///
/// Panics if `arr` has fewer than 2 dimensions.
pub fn transform_array<A, D>(
    arr: ArrayView<'_, A, D>,
    seed: u32,
    direction: Direction,
) -> Result<Array<A, D>, DescrambleError>
where
    A: Clone + Default,
    D: Dimension,
{
    if arr.ndim() < 2 {
        panic!("Array must have at least 2 dimensions (got {})", arr.ndim());
    }

    let (rows, cols) = (arr.shape()[0], arr.shape()[1]);
    let geometry = TileGeometry::new(cols, rows)?;
    debug!(
        width = cols,
        height = rows,
        tile_width = geometry.tile_width,
        tile_height = geometry.tile_height,
        "computed tile geometry"
    );

    let map = generate_permutation(seed, GRID_SIZE);
    let mut out = Array::default(arr.raw_dim());

    for (d, &s) in map.iter().enumerate() {
        match direction {
            Direction::Descramble => copy_tile(&arr, &mut out, &geometry, s, d),
            Direction::Scramble => copy_tile(&arr, &mut out, &geometry, d, s),
        }
    }

    Ok(out)
}

/// Restores the original tile order of a scrambled array.
pub fn descramble_array<A, D>(
    arr: ArrayView<'_, A, D>,
    seed: u32,
) -> Result<Array<A, D>, DescrambleError>
where
    A: Clone + Default,
    D: Dimension,
{
    transform_array(arr, seed, Direction::Descramble)
}

/// Shuffles tiles the way the producer does. Inverse of [descramble_array].
pub fn scramble_array<A, D>(
    arr: ArrayView<'_, A, D>,
    seed: u32,
) -> Result<Array<A, D>, DescrambleError>
where
    A: Clone + Default,
    D: Dimension,
{
    transform_array(arr, seed, Direction::Scramble)
}

fn transform_buffer<P>(
    buf: &ImageBuffer<P, Vec<P::Subpixel>>,
    seed: u32,
    direction: Direction,
) -> Result<ImageBuffer<P, Vec<P::Subpixel>>, DescrambleError>
where
    P: Pixel,
    P::Subpixel: Default,
{
    let (width, height) = buf.dimensions();
    let arr = ArrayView3::from_shape(
        (
            height as usize,
            width as usize,
            usize::from(P::CHANNEL_COUNT),
        ),
        buf.as_raw().as_slice(),
    )?;

    let out = transform_array(arr, seed, direction)?;

    ImageBuffer::from_raw(width, height, out.into_raw_vec())
        .ok_or_else(|| ShapeError::from_kind(ErrorKind::IncompatibleShape).into())
}

/// Applies [transform_array] to a decoded image, keeping its pixel format.
///
/// Formats without a dedicated branch are converted to RGBA8 first.
pub fn transform_image(
    image: &DynamicImage,
    seed: u32,
    direction: Direction,
) -> Result<DynamicImage, DescrambleError> {
    use DynamicImage::*;

    Ok(match image {
        ImageLuma8(b) => ImageLuma8(transform_buffer(b, seed, direction)?),
        ImageLumaA8(b) => ImageLumaA8(transform_buffer(b, seed, direction)?),
        ImageRgb8(b) => ImageRgb8(transform_buffer(b, seed, direction)?),
        ImageRgba8(b) => ImageRgba8(transform_buffer(b, seed, direction)?),
        ImageLuma16(b) => ImageLuma16(transform_buffer(b, seed, direction)?),
        ImageLumaA16(b) => ImageLumaA16(transform_buffer(b, seed, direction)?),
        ImageRgb16(b) => ImageRgb16(transform_buffer(b, seed, direction)?),
        ImageRgba16(b) => ImageRgba16(transform_buffer(b, seed, direction)?),
        ImageRgb32F(b) => ImageRgb32F(transform_buffer(b, seed, direction)?),
        ImageRgba32F(b) => ImageRgba32F(transform_buffer(b, seed, direction)?),
        other => ImageRgba8(transform_buffer(&other.to_rgba8(), seed, direction)?),
    })
}

/// Main descramble entry point.
///
/// Returns a new image with the same bounds as `image`, or
/// [DescrambleError::InvalidGeometry] if it is too small for the grid.
/// A wrong seed is not detected; it just yields a wrong arrangement.
pub fn descramble_image(image: &DynamicImage, seed: u32) -> Result<DynamicImage, DescrambleError> {
    transform_image(image, seed, Direction::Descramble)
}

/// Scrambles an image with `seed`. Inverse of [descramble_image] on the tiled area.
pub fn scramble_image(image: &DynamicImage, seed: u32) -> Result<DynamicImage, DescrambleError> {
    transform_image(image, seed, Direction::Scramble)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// 2D array where every pixel holds its cell index + 1 (0 outside the grid).
    fn labelled(rows: usize, cols: usize) -> Array2<u8> {
        let g = TileGeometry::new(cols, rows).unwrap();
        Array2::from_shape_fn((rows, cols), |(r, c)| {
            let (gr, gc) = (r / g.tile_height, c / g.tile_width);
            if gr < DIVISIONS && gc < DIVISIONS {
                (gr * DIVISIONS + gc + 1) as u8
            } else {
                0
            }
        })
    }

    #[test]
    fn geometry_rounds_to_block() {
        assert_eq!(
            TileGeometry::new(100, 70).unwrap(),
            TileGeometry {
                tile_width: 24,
                tile_height: 16,
            }
        );
        assert_eq!(TileGeometry::new(32, 32).unwrap().tile_width, 8);
    }

    #[test]
    fn geometry_too_small() {
        match TileGeometry::new(10, 10) {
            Err(DescrambleError::InvalidGeometry {
                tile_width: 0,
                tile_height: 0,
            }) => (),
            v => panic!("unexpected {v:?}"),
        }
        assert!(matches!(
            TileGeometry::new(64, 31),
            Err(DescrambleError::InvalidGeometry {
                tile_width: 16,
                tile_height: 0,
            })
        ));
    }

    #[test]
    fn origin_layout() {
        let g = TileGeometry::new(64, 128).unwrap();
        assert_eq!(g.origin(0), (0, 0));
        assert_eq!(g.origin(3), (0, 48));
        assert_eq!(g.origin(4), (32, 0));
        assert_eq!(g.origin(15), (96, 48));
    }

    #[test]
    fn descramble_places_cells_by_map() {
        let arr = labelled(32, 32);
        let out = descramble_array(arr.view(), 42).unwrap();
        let map = generate_permutation(42, GRID_SIZE);

        for d in 0..GRID_SIZE {
            let (r, c) = (d / DIVISIONS * 8, d % DIVISIONS * 8);
            let tile = out.slice(s![r..r + 8, c..c + 8]);
            assert!(tile.iter().all(|&v| v as usize == map[d] + 1));
        }
    }

    #[test]
    fn border_stays_default() {
        let arr = Array2::from_elem((37, 45), 7u8);
        let out = descramble_array(arr.view(), 3).unwrap();
        assert_eq!(out.shape(), arr.shape());
        assert!(out.slice(s![..32, ..32]).iter().all(|&v| v == 7));
        assert!(out.slice(s![32.., ..]).iter().all(|&v| v == 0));
        assert!(out.slice(s![.., 32..]).iter().all(|&v| v == 0));
    }

    #[test]
    fn small_image_is_error() {
        let im = DynamicImage::new_rgb8(10, 10);
        assert!(matches!(
            descramble_image(&im, 42),
            Err(DescrambleError::InvalidGeometry { .. })
        ));
    }

    #[test]
    fn keeps_pixel_format() {
        let im = DynamicImage::new_luma16(40, 48);
        let out = descramble_image(&im, 42).unwrap();
        assert_eq!(out.color(), im.color());
        assert_eq!((out.width(), out.height()), (40, 48));
    }

    #[test]
    #[should_panic(expected = "at least 2 dimensions")]
    fn one_dimension_panics() {
        let arr = Array1::<u8>::zeros(64);
        let _ = descramble_array(arr.view(), 1);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn round_trip(seed in any::<u32>(), rows in 32usize..80, cols in 32usize..80) {
            let arr = Array3::from_shape_fn((rows, cols, 3), |(r, c, k)| (r * 7 + c * 13 + k) as u8);
            let back = descramble_array(scramble_array(arr.view(), seed).unwrap().view(), seed).unwrap();

            let g = TileGeometry::new(cols, rows).unwrap();
            let (h, w) = (g.tile_height * DIVISIONS, g.tile_width * DIVISIONS);
            prop_assert_eq!(back.slice(s![..h, ..w, ..]), arr.slice(s![..h, ..w, ..]));
            prop_assert_eq!(back.shape(), arr.shape());
        }
    }
}
