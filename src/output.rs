//! Reads and writes the on-disk artifacts.  The canonical artifact is
//! a plain-text `.dat` file: a single header line
//!
//! ```text
//! width height elapsed_seconds x_min x_max y_min y_max
//! ```
//!
//! with the bounds printed to 17 decimal places so they survive a
//! round trip through text, followed by `height` lines of `width`
//! space-separated iteration counts, row 0 first.  A binary graymap
//! (PNM) rendering of the same counts is available for eyeballing a
//! map without any plotting tooling.

use std::fs::File;
use std::io;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

use image::pnm::PNMEncoder;
use image::pnm::{PNMSubtype, SampleEncoding};
use image::ColorType;
use itertools::Itertools;
use num::clamp;

use error::Error;
use matrix::ConvergenceMatrix;
use plane::Region;

/// A `.dat` artifact read back into memory.
#[derive(Debug)]
pub struct SavedMap {
    /// The iteration counts.
    pub matrix: ConvergenceMatrix,
    /// The region the counts were computed over.
    pub region: Region,
    /// The elapsed time recorded in the header, in seconds.
    pub elapsed_seconds: f64,
}

/// Writes the finished map in the documented text layout.  The
/// elapsed time lands in the header at millisecond-ish precision
/// (four decimal places); the bounds at 17, which is enough to
/// reconstruct the exact f64s.
pub fn save_matrix<P: AsRef<Path>>(
    path: P,
    matrix: &ConvergenceMatrix,
    region: &Region,
    elapsed_seconds: f64,
) -> Result<(), Error> {
    let file = File::create(path)?;
    let mut out = BufWriter::new(file);
    writeln!(
        out,
        "{} {} {:.4} {:.17} {:.17} {:.17} {:.17}",
        matrix.width(),
        matrix.height(),
        elapsed_seconds,
        region.x_min,
        region.x_max,
        region.y_min,
        region.y_max
    )?;
    for row in matrix.rows() {
        writeln!(out, "{}", row.iter().format(" "))?;
    }
    Ok(())
}

/// Reads a `.dat` file back.  Anything that does not parse as the
/// documented layout is reported as a malformed-file error rather
/// than whatever the underlying parse failure happened to be.
pub fn load_matrix<P: AsRef<Path>>(path: P) -> Result<SavedMap, Error> {
    let file = File::open(path)?;
    let mut lines = BufReader::new(file).lines();

    let header = match lines.next() {
        Some(line) => line?,
        None => return Err(Error::Malformed("the file is empty".to_string())),
    };
    let fields: Vec<&str> = header.split_whitespace().collect();
    if fields.len() != 7 {
        return Err(Error::Malformed(format!(
            "expected 7 header fields, found {}",
            fields.len()
        )));
    }
    let width: usize = parse_field(fields[0], "width")?;
    let height: usize = parse_field(fields[1], "height")?;
    let elapsed_seconds: f64 = parse_field(fields[2], "elapsed time")?;
    let x_min: f64 = parse_field(fields[3], "left bound")?;
    let x_max: f64 = parse_field(fields[4], "right bound")?;
    let y_min: f64 = parse_field(fields[5], "lower bound")?;
    let y_max: f64 = parse_field(fields[6], "upper bound")?;
    let region = Region::new(x_min, x_max, y_min, y_max, width, height)
        .map_err(|_| Error::Malformed("the header does not describe a usable region".to_string()))?;

    let mut matrix = ConvergenceMatrix::new(width, height);
    for row in 0..height {
        let line = match lines.next() {
            Some(line) => line?,
            None => return Err(Error::Malformed(format!("row {} is missing", row))),
        };
        let counts = line
            .split_whitespace()
            .map(|token| parse_field(token, "count"))
            .collect::<Result<Vec<u32>, Error>>()?;
        if counts.len() != width {
            return Err(Error::Malformed(format!(
                "row {} has {} counts, expected {}",
                row,
                counts.len(),
                width
            )));
        }
        matrix.write_row(row, &counts);
    }

    Ok(SavedMap {
        matrix,
        region,
        elapsed_seconds,
    })
}

/// Renders the counts as a binary graymap, full white for the largest
/// count in the map.  Slow-converging boundary filaments come out
/// bright on a dark field.
pub fn write_image<P: AsRef<Path>>(path: P, matrix: &ConvergenceMatrix) -> Result<(), Error> {
    let top = matrix
        .rows()
        .flat_map(|row| row.iter().cloned())
        .max()
        .unwrap_or(0)
        .max(1);
    let pixels: Vec<u8> = matrix
        .rows()
        .flat_map(|row| {
            row.iter()
                .map(|&count| clamp(u64::from(count) * 255 / u64::from(top), 0, 255) as u8)
        })
        .collect();

    encode_graymap(path.as_ref(), &pixels, matrix.width(), matrix.height())?;
    Ok(())
}

fn encode_graymap(path: &Path, pixels: &[u8], width: usize, height: usize) -> Result<(), io::Error> {
    let output = File::create(path)?;
    let mut encoder =
        PNMEncoder::new(output).with_subtype(PNMSubtype::Graymap(SampleEncoding::Binary));
    encoder.encode(pixels, width as u32, height as u32, ColorType::Gray(8))?;
    Ok(())
}

fn parse_field<T: FromStr>(token: &str, what: &str) -> Result<T, Error> {
    token
        .parse()
        .map_err(|_| Error::Malformed(format!("unreadable {}: {:?}", what, token)))
}
