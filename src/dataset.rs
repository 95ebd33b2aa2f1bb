//! Dataset arena: flat storage for fixed-length byte vectors.
//!
//! Every point carries a stable identity (its insertion index), and all
//! index structures store that index rather than a copy of (or pointer to)
//! the vector. Queries resolve indices back through the owning dataset, so
//! no structure in the crate can hold a dangling reference to a point.
//!
//! Two sources are supported:
//!
//! - [`Dataset::from_rows`] for in-memory vectors (rows must share one
//!   length),
//! - [`Dataset::from_idx_reader`] / [`Dataset::read_idx_file`] for the
//!   big-endian idx image format (magic `2051`, image count, rows, cols,
//!   then row-major `u8` pixels).

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::error::{Error, Result};

/// Magic number identifying an idx file of unsigned-byte images.
const IDX_IMAGE_MAGIC: u32 = 2051;

/// An ordered collection of fixed-length `u8` vectors.
///
/// Vectors live in one flat buffer (`len * dim` bytes); `get(i)` is a slice
/// into it. Indices are assigned by insertion order and never change.
#[derive(Debug, Clone)]
pub struct Dataset {
    data: Vec<u8>,
    dim: usize,
}

impl Dataset {
    /// Build a dataset from an iterator of rows.
    ///
    /// The dimension is taken from the first row; any later row of a
    /// different length fails with [`Error::DatasetFormat`]. An empty
    /// iterator yields an empty dataset (building an *index* over it is
    /// what fails, not this constructor).
    pub fn from_rows<I, V>(rows: I) -> Result<Self>
    where
        I: IntoIterator<Item = V>,
        V: AsRef<[u8]>,
    {
        let mut data = Vec::new();
        let mut dim = 0usize;

        for (i, row) in rows.into_iter().enumerate() {
            let row = row.as_ref();
            if i == 0 {
                if row.is_empty() {
                    return Err(Error::DatasetFormat("zero-dimensional vector".into()));
                }
                dim = row.len();
            } else if row.len() != dim {
                return Err(Error::DatasetFormat(format!(
                    "vector {i} has length {}, expected {dim}",
                    row.len()
                )));
            }
            data.extend_from_slice(row);
        }

        Ok(Self { data, dim })
    }

    /// Read an idx-format image file (big-endian headers, `u8` pixels).
    pub fn read_idx_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_idx_reader(BufReader::new(File::open(path)?))
    }

    /// Parse the idx image format from any reader.
    ///
    /// Header: four big-endian `u32`s (magic `2051`, image count, rows,
    /// cols) followed by `count * rows * cols` pixel bytes. A wrong magic
    /// number or a truncated payload is a [`Error::DatasetFormat`].
    pub fn from_idx_reader<R: Read>(mut reader: R) -> Result<Self> {
        let magic = read_be_u32(&mut reader)?;
        if magic != IDX_IMAGE_MAGIC {
            return Err(Error::DatasetFormat(format!(
                "bad magic number {magic}, expected {IDX_IMAGE_MAGIC}"
            )));
        }

        let count = read_be_u32(&mut reader)? as usize;
        let rows = read_be_u32(&mut reader)? as usize;
        let cols = read_be_u32(&mut reader)? as usize;
        // Header fields are untrusted; the products must not wrap.
        let dim = rows
            .checked_mul(cols)
            .ok_or_else(|| Error::DatasetFormat("image dimensions overflow".into()))?;
        if count > 0 && dim == 0 {
            return Err(Error::DatasetFormat("zero-dimensional images".into()));
        }
        let total = count
            .checked_mul(dim)
            .ok_or_else(|| Error::DatasetFormat("pixel payload size overflows".into()))?;

        let mut data = vec![0u8; total];
        reader.read_exact(&mut data).map_err(|e| {
            Error::DatasetFormat(format!("truncated pixel payload ({e})"))
        })?;

        Ok(Self { data, dim: dim.max(1) })
    }

    /// Vector dimension. `1` for an empty dataset built from no rows.
    #[inline]
    #[must_use]
    pub fn dim(&self) -> usize {
        self.dim.max(1)
    }

    /// Number of vectors.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        if self.dim == 0 {
            0
        } else {
            self.data.len() / self.dim
        }
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The vector with insertion index `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= len()`.
    #[inline]
    #[must_use]
    pub fn get(&self, i: usize) -> &[u8] {
        let start = i * self.dim;
        &self.data[start..start + self.dim]
    }

    /// Iterate over all vectors in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &[u8]> {
        self.data.chunks_exact(self.dim.max(1))
    }
}

fn read_be_u32<R: Read>(reader: &mut R) -> Result<u32> {
    let mut buf = [0u8; 4];
    reader
        .read_exact(&mut buf)
        .map_err(|e| Error::DatasetFormat(format!("truncated header ({e})")))?;
    Ok(u32::from_be_bytes(buf))
}
