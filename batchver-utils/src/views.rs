/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

use std::ops::{Index, IndexMut, Range};

#[cfg(feature = "rayon")]
use rayon::prelude::{IndexedParallelIterator, ParallelSliceMut};
use thiserror::Error;

/// Storage that can back a [`MatrixBase`].
///
/// Implemented for shared slices, mutable slices and boxed slices so owning and borrowing
/// matrices share a single code path.
///
/// # Safety
///
/// `as_slice` must be idempotent: it must always return the same slice with the same
/// length. Matrix shapes are validated once at construction and rely on this afterwards.
pub unsafe trait DenseData {
    type Elem;

    /// Return the underlying data as a slice.
    fn as_slice(&self) -> &[Self::Elem];
}

/// A mutable companion to [`DenseData`].
///
/// # Safety
///
/// Same idempotency requirement as [`DenseData`]. The returned slice must span the exact
/// same memory as `as_slice`.
pub unsafe trait MutDenseData: DenseData {
    fn as_mut_slice(&mut self) -> &mut [Self::Elem];
}

// SAFETY: Returns `self` unchanged.
unsafe impl<T> DenseData for &[T] {
    type Elem = T;
    fn as_slice(&self) -> &[Self::Elem] {
        self
    }
}

// SAFETY: Returns `self` unchanged.
unsafe impl<T> DenseData for &mut [T] {
    type Elem = T;
    fn as_slice(&self) -> &[Self::Elem] {
        self
    }
}

// SAFETY: Returns `self` unchanged, spanning the same memory as `as_slice`.
unsafe impl<T> MutDenseData for &mut [T] {
    fn as_mut_slice(&mut self) -> &mut [Self::Elem] {
        self
    }
}

// SAFETY: Returns the boxed slice unchanged.
unsafe impl<T> DenseData for Box<[T]> {
    type Elem = T;
    fn as_slice(&self) -> &[Self::Elem] {
        self
    }
}

// SAFETY: Returns the boxed slice unchanged, spanning the same memory as `as_slice`.
unsafe impl<T> MutDenseData for Box<[T]> {
    fn as_mut_slice(&mut self) -> &mut [Self::Elem] {
        self
    }
}

////////////
// Matrix //
////////////

/// A dense block of memory interpreted as a 2-dimensional row-major matrix.
///
/// Vector sets (one vector per row) and distance matrices are both represented with this
/// type. When viewing immutable memory, it is `Copy`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatrixBase<T>
where
    T: DenseData,
{
    data: T,
    nrows: usize,
    ncols: usize,
}

/// Returned when the length of the backing storage does not equal `nrows * ncols`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
#[error(
    "tried to construct a matrix view with {nrows} rows and {ncols} columns over a slice \
     of length {len}"
)]
pub struct TryFromError {
    pub len: usize,
    pub nrows: usize,
    pub ncols: usize,
}

/// A generator for initializing the entries in a matrix via `Matrix::new`.
pub trait Generator<T> {
    fn generate(&mut self) -> T;
}

impl<T> Generator<T> for T
where
    T: Clone,
{
    fn generate(&mut self) -> T {
        self.clone()
    }
}

/// A matrix initializer that invokes the provided lambda to initialize each element.
pub struct Init<F>(pub F);

impl<T, F> Generator<T> for Init<F>
where
    F: FnMut() -> T,
{
    fn generate(&mut self) -> T {
        (self.0)()
    }
}

impl<T> MatrixBase<Box<[T]>> {
    /// Construct a new Matrix initialized with the contents of the generator.
    ///
    /// Elements are initialized in memory order.
    pub fn new<U>(mut generator: U, nrows: usize, ncols: usize) -> Self
    where
        U: Generator<T>,
    {
        let data: Box<[T]> = (0..nrows * ncols).map(|_| generator.generate()).collect();
        debug_assert_eq!(data.len(), nrows * ncols);
        Self { data, nrows, ncols }
    }

    /// Take ownership of `data`, interpreting it as a `nrows x ncols` matrix.
    pub fn from_vec(data: Vec<T>, nrows: usize, ncols: usize) -> Result<Self, TryFromError> {
        Self::try_from(data.into_boxed_slice(), nrows, ncols)
    }
}

impl<T> MatrixBase<T>
where
    T: DenseData,
{
    /// Try to construct a `MatrixBase` over the provided base.
    ///
    /// The length of the base must be equal to `nrows * ncols`.
    pub fn try_from(data: T, nrows: usize, ncols: usize) -> Result<Self, TryFromError> {
        let len = data.as_slice().len();
        if Some(len) != nrows.checked_mul(ncols) {
            Err(TryFromError { len, nrows, ncols })
        } else {
            Ok(Self { data, nrows, ncols })
        }
    }

    /// Return the number of columns in the matrix.
    pub fn ncols(&self) -> usize {
        self.ncols
    }

    /// Return the number of rows in the matrix.
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    /// Return `true` if the matrix has as many rows as columns.
    pub fn is_square(&self) -> bool {
        self.nrows == self.ncols
    }

    /// Return the underlying data as a slice.
    pub fn as_slice(&self) -> &[T::Elem] {
        self.data.as_slice()
    }

    /// Return the underlying data as a mutable slice.
    pub fn as_mut_slice(&mut self) -> &mut [T::Elem]
    where
        T: MutDenseData,
    {
        self.data.as_mut_slice()
    }

    /// Return row `row` as a slice.
    ///
    /// # Panics
    ///
    /// Panics if `row >= self.nrows()`.
    pub fn row(&self, row: usize) -> &[T::Elem] {
        assert!(
            row < self.nrows(),
            "tried to access row {row} of a matrix with {} rows",
            self.nrows()
        );
        let start = row * self.ncols;
        &self.as_slice()[start..start + self.ncols]
    }

    /// Return row `row` if `row < self.nrows()`. Otherwise, return `None`.
    pub fn get_row(&self, row: usize) -> Option<&[T::Elem]> {
        (row < self.nrows()).then(|| self.row(row))
    }

    /// Return row `row` as a mutable slice.
    ///
    /// # Panics
    ///
    /// Panics if `row >= self.nrows()`.
    pub fn row_mut(&mut self, row: usize) -> &mut [T::Elem]
    where
        T: MutDenseData,
    {
        assert!(
            row < self.nrows(),
            "tried to access row {row} of a matrix with {} rows",
            self.nrows()
        );
        let ncols = self.ncols;
        let start = row * ncols;
        &mut self.as_mut_slice()[start..start + ncols]
    }

    /// Return a iterator over all rows in the matrix.
    ///
    /// Rows are yielded sequentially beginning with row 0. A matrix with zero columns
    /// yields no rows.
    pub fn row_iter(&self) -> impl ExactSizeIterator<Item = &[T::Elem]> {
        // `chunks_exact` panics on a zero chunk size.
        self.data.as_slice().chunks_exact(self.ncols().max(1))
    }

    /// Return a mutable iterator over all rows in the matrix.
    pub fn row_iter_mut(&mut self) -> impl ExactSizeIterator<Item = &mut [T::Elem]>
    where
        T: MutDenseData,
    {
        let ncols = self.ncols().max(1);
        self.data.as_mut_slice().chunks_exact_mut(ncols)
    }

    /// Return a view over the contiguous rows in `rows`.
    ///
    /// # Panics
    ///
    /// Panics if `rows` is not contained in `0..self.nrows()`.
    pub fn subview(&self, rows: Range<usize>) -> MatrixView<'_, T::Elem> {
        assert!(
            rows.start <= rows.end && rows.end <= self.nrows(),
            "row range {:?} is out of bounds for a matrix with {} rows",
            rows,
            self.nrows()
        );
        let ncols = self.ncols();
        MatrixBase {
            data: &self.as_slice()[rows.start * ncols..rows.end * ncols],
            nrows: rows.len(),
            ncols,
        }
    }

    /// Return a mutable view over the contiguous rows in `rows`.
    ///
    /// # Panics
    ///
    /// Panics if `rows` is not contained in `0..self.nrows()`.
    pub fn subview_mut(&mut self, rows: Range<usize>) -> MutMatrixView<'_, T::Elem>
    where
        T: MutDenseData,
    {
        assert!(
            rows.start <= rows.end && rows.end <= self.nrows(),
            "row range {:?} is out of bounds for a matrix with {} rows",
            rows,
            self.nrows()
        );
        let ncols = self.ncols();
        MatrixBase {
            data: &mut self.as_mut_slice()[rows.start * ncols..rows.end * ncols],
            nrows: rows.len(),
            ncols,
        }
    }

    /// Return a parallel iterator over the mutable rows of the matrix.
    #[cfg(feature = "rayon")]
    pub fn par_row_iter_mut(&mut self) -> impl IndexedParallelIterator<Item = &mut [T::Elem]>
    where
        T: MutDenseData,
        T::Elem: Send,
    {
        let ncols = self.ncols().max(1);
        self.as_mut_slice().par_chunks_exact_mut(ncols)
    }

    /// Return a view over the matrix.
    pub fn as_view(&self) -> MatrixView<'_, T::Elem> {
        MatrixBase {
            data: self.as_slice(),
            nrows: self.nrows(),
            ncols: self.ncols(),
        }
    }

    /// Return a mutable view over the matrix.
    pub fn as_mut_view(&mut self) -> MutMatrixView<'_, T::Elem>
    where
        T: MutDenseData,
    {
        let nrows = self.nrows();
        let ncols = self.ncols();
        MatrixBase {
            data: self.as_mut_slice(),
            nrows,
            ncols,
        }
    }

    /// Set every entry on the main diagonal to `value`.
    ///
    /// For non-square matrices, only the leading `min(nrows, ncols)` diagonal is written.
    pub fn fill_diagonal(&mut self, value: T::Elem)
    where
        T: MutDenseData,
        T::Elem: Clone,
    {
        for i in 0..self.nrows().min(self.ncols()) {
            self[(i, i)] = value.clone();
        }
    }
}

/// An owning row-major matrix.
pub type Matrix<T> = MatrixBase<Box<[T]>>;

/// A non-owning row-major matrix view.
pub type MatrixView<'a, T> = MatrixBase<&'a [T]>;

/// A mutable non-owning row-major matrix view.
pub type MutMatrixView<'a, T> = MatrixBase<&'a mut [T]>;

/// Return a reference to the item at entry `(row, col)` in the matrix.
///
/// # Panics
///
/// Panics if `row >= self.nrows()` or `col >= self.ncols()`.
impl<T> Index<(usize, usize)> for MatrixBase<T>
where
    T: DenseData,
{
    type Output = T::Elem;

    fn index(&self, (row, col): (usize, usize)) -> &Self::Output {
        assert!(
            row < self.nrows(),
            "row {row} is out of bounds (max: {})",
            self.nrows()
        );
        assert!(
            col < self.ncols(),
            "col {col} is out of bounds (max: {})",
            self.ncols()
        );
        &self.as_slice()[row * self.ncols + col]
    }
}

/// Return a mutable reference to the item at entry `(row, col)` in the matrix.
///
/// # Panics
///
/// Panics if `row >= self.nrows()` or `col >= self.ncols()`.
impl<T> IndexMut<(usize, usize)> for MatrixBase<T>
where
    T: MutDenseData,
{
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut Self::Output {
        assert!(
            row < self.nrows(),
            "row {row} is out of bounds (max: {})",
            self.nrows()
        );
        assert!(
            col < self.ncols(),
            "col {col} is out of bounds (max: {})",
            self.ncols()
        );
        let ncols = self.ncols;
        &mut self.as_mut_slice()[row * ncols + col]
    }
}

///////////
// Tests //
///////////

#[cfg(test)]
mod tests {
    use super::*;

    fn counting(nrows: usize, ncols: usize) -> Matrix<usize> {
        let mut i = 0;
        Matrix::new(
            Init(|| {
                let v = i;
                i += 1;
                v
            }),
            nrows,
            ncols,
        )
    }

    #[test]
    fn new_initializes_in_memory_order() {
        let m = counting(2, 3);
        assert_eq!(m.nrows(), 2);
        assert_eq!(m.ncols(), 3);
        assert_eq!(m.as_slice(), &[0, 1, 2, 3, 4, 5]);
        assert_eq!(m.row(1), &[3, 4, 5]);
        assert_eq!(m[(1, 2)], 5);
    }

    #[test]
    fn try_from_rejects_bad_lengths() {
        let data = [1.0f32; 5];
        let err = MatrixView::try_from(&data[..], 2, 3).unwrap_err();
        assert_eq!(
            err,
            TryFromError {
                len: 5,
                nrows: 2,
                ncols: 3
            }
        );
        assert_eq!(
            err.to_string(),
            "tried to construct a matrix view with 2 rows and 3 columns over a slice of length 5"
        );

        // Overflowing shapes are rejected rather than wrapping.
        assert!(MatrixView::try_from(&data[..], usize::MAX, 2).is_err());
    }

    #[test]
    fn empty_matrices() {
        let m = Matrix::<f32>::new(0.0, 0, 0);
        assert_eq!(m.row_iter().len(), 0);
        assert!(m.is_square());
        assert_eq!(m.get_row(0), None);

        // Zero columns but non-zero rows.
        let m = Matrix::<f32>::new(0.0, 3, 0);
        assert_eq!(m.row(2), &[] as &[f32]);
        assert_eq!(m.subview(1..3).nrows(), 2);
    }

    #[test]
    fn get_row_is_checked() {
        let m = counting(2, 2);
        assert_eq!(m.get_row(1), Some(&[2, 3][..]));
        assert_eq!(m.get_row(2), None);
    }

    #[test]
    #[should_panic(expected = "tried to access row 3 of a matrix with 3 rows")]
    fn row_out_of_bounds_panics() {
        let m = counting(3, 2);
        let _ = m.row(3);
    }

    #[test]
    fn subview_rows() {
        let m = counting(5, 2);
        let sub = m.subview(1..4);
        assert_eq!(sub.nrows(), 3);
        assert_eq!(sub.row(0), &[2, 3]);
        assert_eq!(sub.row(2), &[6, 7]);

        let last = m.subview(4..5);
        assert_eq!(last.row(0), &[8, 9]);
    }

    #[test]
    fn subview_mut_writes_through() {
        let mut m = counting(4, 2);
        {
            let mut sub = m.subview_mut(0..2);
            assert_eq!(sub.nrows(), 2);
            sub.row_mut(1).copy_from_slice(&[7, 7]);
        }
        assert_eq!(m.row(1), &[7, 7]);
        assert_eq!(m.subview_mut(4..4).nrows(), 0);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn subview_past_the_end_panics() {
        let m = counting(2, 2);
        let _ = m.subview(1..3);
    }

    #[test]
    fn fill_diagonal() {
        let mut m = Matrix::<f32>::new(1.0, 3, 3);
        m.fill_diagonal(0.0);
        for i in 0..3 {
            for j in 0..3 {
                assert_eq!(m[(i, j)], if i == j { 0.0 } else { 1.0 });
            }
        }

        let mut wide = Matrix::<f32>::new(1.0, 2, 3);
        wide.fill_diagonal(0.0);
        assert_eq!(wide.as_slice(), &[0.0, 1.0, 1.0, 1.0, 0.0, 1.0]);
    }

    #[test]
    fn views_share_storage() {
        let mut m = counting(2, 2);
        {
            let mut view = m.as_mut_view();
            view[(0, 1)] = 10;
            view.row_mut(1).copy_from_slice(&[20, 30]);
        }
        assert_eq!(m.as_slice(), &[0, 10, 20, 30]);

        assert_eq!(m.as_view().row(1), &[20, 30]);
    }

    #[cfg(feature = "rayon")]
    #[test]
    fn parallel_rows_match_serial_rows() {
        use rayon::prelude::*;

        let mut serial = counting(7, 3);
        let mut parallel = counting(7, 3);
        serial.row_iter_mut().enumerate().for_each(|(i, r)| r[0] = i);
        parallel.par_row_iter_mut().enumerate().for_each(|(i, r)| r[0] = i);
        assert_eq!(serial, parallel);
        assert_eq!(parallel.row(6), &[6, 19, 20]);
    }
}
