//! Text and raster views of a tile grid.
//!
//! Both views are row-major, top row first, one glyph or pixel per tile.
//! Gray levels come from [`Tile::gray`]: Floor light, Wall dark, Empty black.

use crate::grid::TileGrid;
#[cfg(feature = "png")]
use image::{GrayImage, ImageFormat, ImageResult, Luma};
use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

impl fmt::Display for TileGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height() {
            if let Some(row) = self.row(y) {
                for tile in row {
                    write!(f, "{}", tile.glyph())?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// ASCII dump: `.` floor, `#` wall, space for empty; every row ends in `\n`.
pub fn to_text(grid: &TileGrid) -> String {
    grid.to_string()
}

/// Binary PPM (P6) with the gray level copied into all three channels.
pub fn write_ppm<W: Write>(grid: &TileGrid, out: &mut W) -> io::Result<()> {
    write!(out, "P6\n{} {}\n255\n", grid.width(), grid.height())?;
    for y in 0..grid.height() {
        if let Some(row) = grid.row(y) {
            let bytes: Vec<u8> = row
                .iter()
                .flat_map(|t| {
                    let g = t.gray();
                    [g, g, g]
                })
                .collect();
            out.write_all(&bytes)?;
        }
    }
    Ok(())
}

pub fn save_ppm(grid: &TileGrid, path: impl AsRef<Path>) -> io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    write_ppm(grid, &mut out)?;
    out.flush()
}

/// 8-bit grayscale image, one pixel per tile.
#[cfg(feature = "png")]
pub fn to_gray_image(grid: &TileGrid) -> GrayImage {
    let mut img = GrayImage::new(grid.width() as u32, grid.height() as u32);
    for (p, tile) in grid.iter() {
        img.put_pixel(p.x as u32, p.y as u32, Luma([tile.gray()]));
    }
    img
}

/// Save as PNG whatever the extension of `path`.
#[cfg(feature = "png")]
pub fn save_png(grid: &TileGrid, path: impl AsRef<Path>) -> ImageResult<()> {
    to_gray_image(grid).save_with_format(path, ImageFormat::Png)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Tile;
    use crate::rect::Rect;

    fn sample() -> TileGrid {
        let mut g = TileGrid::new(4, 3);
        g.fill_rect(&Rect::new(1, 1, 2, 1), Tile::Floor);
        g.set(0, 2, Tile::Empty);
        g
    }

    #[test]
    fn text_dump() {
        assert_eq!(to_text(&sample()), "####\n#..#\n ###\n");
    }

    #[test]
    fn ppm_layout() {
        let mut buf = Vec::new();
        write_ppm(&sample(), &mut buf).unwrap();
        let header = b"P6\n4 3\n255\n";
        assert_eq!(&buf[..header.len()], header);
        let pixels = &buf[header.len()..];
        assert_eq!(pixels.len(), 4 * 3 * 3);
        // (1,1) is floor: row 1, column 1
        let idx = (4 + 1) * 3;
        assert_eq!(&pixels[idx..idx + 3], &[200, 200, 200]);
        assert_eq!(&pixels[0..3], &[80, 80, 80]);
        // (0,2) is empty
        let idx = (2 * 4) * 3;
        assert_eq!(&pixels[idx..idx + 3], &[0, 0, 0]);
    }

    fn scratch_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("delve-{}-{}", std::process::id(), name))
    }

    #[test]
    fn save_ppm_writes_same_bytes() {
        let g = sample();
        let path = scratch_path("grid.ppm");
        save_ppm(&g, &path).unwrap();
        let written = std::fs::read(&path).unwrap();
        std::fs::remove_file(&path).ok();

        let mut expected = Vec::new();
        write_ppm(&g, &mut expected).unwrap();
        assert_eq!(written, expected);
    }

    #[cfg(feature = "png")]
    #[test]
    fn save_png_ignores_extension() {
        let g = sample();
        for name in ["dungeon", "dungeon.map"] {
            let path = scratch_path(name);
            save_png(&g, &path).unwrap();
            let bytes = std::fs::read(&path).unwrap();
            std::fs::remove_file(&path).ok();

            assert_eq!(image::guess_format(&bytes).unwrap(), ImageFormat::Png);
            let img = image::load_from_memory(&bytes).unwrap().into_luma8();
            assert_eq!(img, to_gray_image(&g));
        }
    }

    #[cfg(feature = "png")]
    #[test]
    fn gray_image_matches_grid() {
        let g = sample();
        let img = to_gray_image(&g);
        assert_eq!(img.dimensions(), (4, 3));
        for (p, tile) in g.iter() {
            assert_eq!(img.get_pixel(p.x as u32, p.y as u32).0[0], tile.gray());
        }
    }
}
