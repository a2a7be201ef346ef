/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

//! Read and write dense matrices in the binary vector format.
//!
//! The binary format is:
//! - 8-byte header
//!   - `npoints` (u32 LE)
//!   - `ndims` (u32 LE)
//! - Payload: `npoints × ndims` elements of `T`, tightly packed in row-major order
//!
//! Datasets (one vector per row) and distance matrices (`ndims == npoints`) share the format.

use std::{
    fs::File,
    io::{BufReader, BufWriter, Read, Seek, Write},
    path::Path,
};

use thiserror::Error;

use crate::views::{Matrix, MatrixView};

/// Read a matrix of `T` from the binary format (see [module docs](self)).
///
/// Validates that the reader contains enough data before allocating.
pub fn read_bin<T>(reader: &mut (impl Read + Seek)) -> Result<Matrix<T>, ReadBinError>
where
    T: bytemuck::Pod,
{
    let metadata = Metadata::read(reader)?;
    let (npoints, ndims) = metadata.into_dims();
    let type_size = std::mem::size_of::<T>();

    let expected_bytes = npoints
        .checked_mul(ndims)
        .and_then(|n| n.checked_mul(type_size))
        .ok_or(ReadBinError::Overflow {
            npoints: metadata.npoints_u32(),
            ndims: metadata.ndims_u32(),
            type_size,
        })?;

    let data_start = reader.stream_position()?;
    let end = reader.seek(std::io::SeekFrom::End(0))?;
    let available = end - data_start;
    reader.seek(std::io::SeekFrom::Start(data_start))?;

    if available < expected_bytes as u64 {
        return Err(ReadBinError::SizeMismatch {
            expected: expected_bytes as u64,
            available,
            npoints: metadata.npoints_u32(),
            ndims: metadata.ndims_u32(),
            type_size,
        });
    }

    let mut data = Matrix::new(<T as bytemuck::Zeroable>::zeroed(), npoints, ndims);
    reader.read_exact(bytemuck::must_cast_slice_mut::<T, u8>(data.as_mut_slice()))?;
    Ok(data)
}

/// Write a matrix of `T` in the binary format (see [module docs](self)).
///
/// Returns the total number of bytes written.
pub fn write_bin<T>(data: MatrixView<'_, T>, writer: &mut impl Write) -> Result<usize, SaveBinError>
where
    T: bytemuck::Pod,
{
    let metadata =
        Metadata::new(data.nrows(), data.ncols()).ok_or(SaveBinError::DimensionOverflow {
            nrows: data.nrows(),
            ncols: data.ncols(),
        })?;
    let bytes = metadata.write(writer)?;
    writer.write_all(bytemuck::must_cast_slice::<T, u8>(data.as_slice()))?;
    Ok(bytes + std::mem::size_of_val(data.as_slice()))
}

/// Open `path` and read a matrix of `T` from it.
pub fn load_bin<T>(path: impl AsRef<Path>) -> Result<Matrix<T>, ReadBinError>
where
    T: bytemuck::Pod,
{
    let mut reader = BufReader::new(File::open(path)?);
    read_bin(&mut reader)
}

/// Create (or truncate) `path` and write `data` to it.
pub fn save_bin<T>(data: MatrixView<'_, T>, path: impl AsRef<Path>) -> Result<usize, SaveBinError>
where
    T: bytemuck::Pod,
{
    let mut writer = BufWriter::new(File::create(path)?);
    let bytes = write_bin(data, &mut writer)?;
    writer.flush()?;
    Ok(bytes)
}

/// 8-byte header at the start of a binary file: `npoints` and `ndims` as little-endian u32.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Metadata {
    npoints: u32,
    ndims: u32,
}

impl Metadata {
    /// Construct from sizes, returning `None` if either does not fit in a `u32`.
    pub fn new(npoints: usize, ndims: usize) -> Option<Self> {
        Some(Self {
            npoints: npoints.try_into().ok()?,
            ndims: ndims.try_into().ok()?,
        })
    }

    /// Number of points as `u32`.
    pub fn npoints_u32(&self) -> u32 {
        self.npoints
    }

    /// Number of dimensions as `u32`.
    pub fn ndims_u32(&self) -> u32 {
        self.ndims
    }

    /// Destructure into (`npoints`, `ndims`) as `usize`.
    pub fn into_dims(&self) -> (usize, usize) {
        (self.npoints as usize, self.ndims as usize)
    }

    /// Deserialize the 8-byte header from a reader.
    pub fn read<R>(reader: &mut R) -> std::io::Result<Self>
    where
        R: Read,
    {
        let mut npoints = [0u8; 4];
        let mut ndims = [0u8; 4];
        reader.read_exact(&mut npoints)?;
        reader.read_exact(&mut ndims)?;
        Ok(Metadata {
            npoints: u32::from_le_bytes(npoints),
            ndims: u32::from_le_bytes(ndims),
        })
    }

    /// Serialize the 8-byte header to a writer. Returns the number of bytes written (always 8).
    pub fn write<W>(&self, writer: &mut W) -> std::io::Result<usize>
    where
        W: Write,
    {
        writer.write_all(&self.npoints.to_le_bytes())?;
        writer.write_all(&self.ndims.to_le_bytes())?;
        Ok(2 * std::mem::size_of::<u32>())
    }
}

/// Error type for [`read_bin`].
#[derive(Debug, Error)]
pub enum ReadBinError {
    /// The reader has fewer bytes remaining than the header declares.
    #[error(
        "binary data too short: header declares {npoints} points × {ndims} dims × {type_size} bytes = \
         {expected} bytes, but only {available} bytes available"
    )]
    SizeMismatch {
        expected: u64,
        available: u64,
        npoints: u32,
        ndims: u32,
        type_size: usize,
    },

    /// `npoints * ndims` overflows `usize` (corrupt header).
    #[error(
        "header dimensions overflow: {npoints} points × {ndims} dims × {type_size} bytes overflows"
    )]
    Overflow {
        npoints: u32,
        ndims: u32,
        type_size: usize,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Error type for [`write_bin`].
#[derive(Debug, Error)]
pub enum SaveBinError {
    /// Matrix dimensions exceed `u32::MAX` and cannot be represented in the binary header.
    #[error("dimensions overflow u32: {nrows} rows × {ncols} cols")]
    DimensionOverflow { nrows: usize, ncols: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

///////////
// Tests //
///////////
