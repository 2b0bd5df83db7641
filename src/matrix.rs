//! A small row-major matrix used to build and compose rotations.
//!
//! Elements are addressed with 1-based `(row, column)` pairs so that the
//! rotation formulas read the same way they are written on paper.

use std::{
    fmt::{self, Display},
    ops::{Index, IndexMut, Mul, MulAssign},
};

use crate::{vector::Coordinate, Rotation, Vector3};

/// An error produced while addressing or combining [`Matrix`] values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MatrixError {
    /// The requested element does not exist.
    #[error("element ({row}, {column}) is outside of a {rows}x{columns} matrix")]
    OutOfBounds {
        /// The requested 1-based row.
        row: usize,
        /// The requested 1-based column.
        column: usize,
        /// The number of rows in the matrix.
        rows: usize,
        /// The number of columns in the matrix.
        columns: usize,
    },
    /// The left matrix's column count does not match the right matrix's row
    /// count.
    #[error("cannot multiply a {left_rows}x{left_columns} matrix by a {right_rows}x{right_columns} matrix")]
    DimensionMismatch {
        /// Rows in the left operand.
        left_rows: usize,
        /// Columns in the left operand.
        left_columns: usize,
        /// Rows in the right operand.
        right_rows: usize,
        /// Columns in the right operand.
        right_columns: usize,
    },
}

/// A rectangular matrix of `f32` values with a fixed shape.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
pub struct Matrix {
    rows: usize,
    columns: usize,
    values: Vec<f32>,
}

impl Matrix {
    /// Returns a `rows` x `columns` matrix initialized to the identity
    /// pattern: ones on the diagonal and zeroes everywhere else.
    #[must_use]
    pub fn new(rows: usize, columns: usize) -> Self {
        let mut matrix = Self::zeroed(rows, columns);
        for i in 0..rows.min(columns) {
            matrix.values[i * columns + i] = 1.;
        }
        matrix
    }

    /// Returns a square identity matrix.
    #[must_use]
    pub fn identity(size: usize) -> Self {
        Self::new(size, size)
    }

    /// Returns a `rows` x `columns` matrix filled with zeroes.
    #[must_use]
    pub fn zeroed(rows: usize, columns: usize) -> Self {
        Self {
            rows,
            columns,
            values: vec![0.; rows * columns],
        }
    }

    /// Returns a single-column matrix containing `values`.
    #[must_use]
    pub fn column(values: &[f32]) -> Self {
        Self {
            rows: values.len(),
            columns: 1,
            values: values.to_vec(),
        }
    }

    /// Returns the 2D rotation matrix for `angle`.
    ///
    /// ```text
    /// [ cos -sin ]
    /// [ sin  cos ]
    /// ```
    #[must_use]
    pub fn rotation(angle: Rotation) -> Self {
        let (sin, cos) = angle.to_radians().sin_cos();
        Self::from_rows([[cos, -sin], [sin, cos]])
    }

    /// Returns the 3D rotation matrix for `angle` about the x-axis.
    #[must_use]
    pub fn rotation_x(angle: Rotation) -> Self {
        let (sin, cos) = angle.to_radians().sin_cos();
        Self::from_rows([[1., 0., 0.], [0., cos, -sin], [0., sin, cos]])
    }

    /// Returns the 3D rotation matrix for `angle` about the y-axis.
    #[must_use]
    pub fn rotation_y(angle: Rotation) -> Self {
        let (sin, cos) = angle.to_radians().sin_cos();
        Self::from_rows([[cos, 0., sin], [0., 1., 0.], [-sin, 0., cos]])
    }

    /// Returns the 3D rotation matrix for `angle` about the z-axis.
    #[must_use]
    pub fn rotation_z(angle: Rotation) -> Self {
        let (sin, cos) = angle.to_radians().sin_cos();
        Self::from_rows([[cos, -sin, 0.], [sin, cos, 0.], [0., 0., 1.]])
    }

    /// Returns the 3D rotation matrix for `angle` about an arbitrary `axis`.
    ///
    /// A zero-length axis produces the identity.
    #[must_use]
    pub fn rotation_about(axis: Vector3, angle: Rotation) -> Self {
        let length = axis.magnitude();
        if length <= f32::EPSILON {
            return Self::identity(3);
        }
        let Vector3 { x, y, z } = axis / length;
        let (sin, cos) = angle.to_radians().sin_cos();
        let t = 1. - cos;
        Self::from_rows([
            [t * x * x + cos, t * x * y - sin * z, t * x * z + sin * y],
            [t * x * y + sin * z, t * y * y + cos, t * y * z - sin * x],
            [t * x * z - sin * y, t * y * z + sin * x, t * z * z + cos],
        ])
    }

    fn from_rows<const R: usize, const C: usize>(rows: [[f32; C]; R]) -> Self {
        Self {
            rows: R,
            columns: C,
            values: rows.iter().flatten().copied().collect(),
        }
    }

    /// Returns the number of rows in this matrix.
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Returns the number of columns in this matrix.
    #[must_use]
    pub const fn columns(&self) -> usize {
        self.columns
    }

    fn offset(&self, row: usize, column: usize) -> Result<usize, MatrixError> {
        if row == 0 || column == 0 || row > self.rows || column > self.columns {
            Err(MatrixError::OutOfBounds {
                row,
                column,
                rows: self.rows,
                columns: self.columns,
            })
        } else {
            Ok((row - 1) * self.columns + column - 1)
        }
    }

    /// Returns the element at the 1-based `row` and `column`.
    pub fn get(&self, row: usize, column: usize) -> Result<f32, MatrixError> {
        self.offset(row, column).map(|offset| self.values[offset])
    }

    /// Returns the element at the 1-based `row` and `column`, or 0 if it does
    /// not exist.
    #[must_use]
    pub fn get_or_zero(&self, row: usize, column: usize) -> f32 {
        self.get(row, column).unwrap_or_default()
    }

    /// Returns a mutable reference to the element at the 1-based `row` and
    /// `column`.
    pub fn get_mut(&mut self, row: usize, column: usize) -> Result<&mut f32, MatrixError> {
        let offset = self.offset(row, column)?;
        Ok(&mut self.values[offset])
    }

    /// Sets the element at the 1-based `row` and `column` to `value`.
    pub fn set(&mut self, row: usize, column: usize, value: f32) -> Result<(), MatrixError> {
        *self.get_mut(row, column)? = value;
        Ok(())
    }

    /// Returns `self * rhs`, or an error if `self.columns() != rhs.rows()`.
    pub fn try_product(&self, rhs: &Matrix) -> Result<Matrix, MatrixError> {
        if self.columns != rhs.rows {
            return Err(MatrixError::DimensionMismatch {
                left_rows: self.rows,
                left_columns: self.columns,
                right_rows: rhs.rows,
                right_columns: rhs.columns,
            });
        }

        let mut result = Self::zeroed(self.rows, rhs.columns);
        for row in 0..self.rows {
            for column in 0..rhs.columns {
                result.values[row * rhs.columns + column] = (0..self.columns)
                    .map(|k| {
                        self.values[row * self.columns + k] * rhs.values[k * rhs.columns + column]
                    })
                    .sum();
            }
        }
        Ok(result)
    }

    /// Returns `self * rhs`.
    ///
    /// Incompatible shapes are not fatal: a warning is logged and a
    /// zero-filled `self.rows() x rhs.columns()` matrix is returned.
    #[must_use]
    pub fn product(&self, rhs: &Matrix) -> Matrix {
        self.try_product(rhs).unwrap_or_else(|err| {
            log::warn!("{err}");
            Self::zeroed(self.rows, rhs.columns)
        })
    }

    /// Multiplies `vector` by this matrix, treating the vector as a single
    /// column.
    #[must_use]
    pub fn transform<V: Coordinate>(&self, vector: V) -> V {
        V::from_column(&self.product(&vector.to_column()))
    }

    /// Multiplies every element by `scalar` in place.
    pub fn scale(&mut self, scalar: f32) {
        for value in &mut self.values {
            *value *= scalar;
        }
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f32;

    fn index(&self, (row, column): (usize, usize)) -> &Self::Output {
        match self.offset(row, column) {
            Ok(offset) => &self.values[offset],
            Err(err) => panic!("{err}"),
        }
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    fn index_mut(&mut self, (row, column): (usize, usize)) -> &mut Self::Output {
        match self.offset(row, column) {
            Ok(offset) => &mut self.values[offset],
            Err(err) => panic!("{err}"),
        }
    }
}

impl Mul<&Matrix> for &Matrix {
    type Output = Matrix;

    fn mul(self, rhs: &Matrix) -> Self::Output {
        self.product(rhs)
    }
}

impl Mul for Matrix {
    type Output = Matrix;

    fn mul(self, rhs: Matrix) -> Self::Output {
        self.product(&rhs)
    }
}

impl MulAssign<f32> for Matrix {
    fn mul_assign(&mut self, rhs: f32) {
        self.scale(rhs);
    }
}

impl Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.values.chunks(self.columns.max(1)) {
            f.write_str("[")?;
            for value in row {
                write!(f, " {value} ")?;
            }
            f.write_str("]\n")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Vector2, Vector3};

    fn assert_close(a: &Matrix, b: &Matrix) {
        assert_eq!((a.rows(), a.columns()), (b.rows(), b.columns()));
        for (a, b) in a.values.iter().zip(&b.values) {
            assert!((a - b).abs() < 1e-5, "{a} != {b}\n{a:?}\n{b:?}");
        }
    }

    #[test]
    fn identity_pattern() {
        let m = Matrix::new(2, 3);
        assert_eq!(m.values, [1., 0., 0., 0., 1., 0.]);
        let m = Matrix::new(3, 1);
        assert_eq!(m.values, [1., 0., 0.]);
    }

    #[test]
    fn one_based_access() {
        let mut m = Matrix::zeroed(2, 2);
        m.set(1, 2, 5.).unwrap();
        m[(2, 1)] = 3.;
        assert_eq!(m.get(1, 2), Ok(5.));
        assert_eq!(m[(2, 1)], 3.);
        assert_eq!(m.values, [0., 5., 3., 0.]);
    }

    #[test]
    fn out_of_bounds() {
        let mut m = Matrix::identity(2);
        let err = MatrixError::OutOfBounds {
            row: 3,
            column: 1,
            rows: 2,
            columns: 2,
        };
        assert_eq!(m.get(3, 1), Err(err));
        assert!(m.get(0, 1).is_err());
        assert!(m.get_mut(1, 3).is_err());
        assert!(m.set(3, 1, 9.).is_err());
        assert_eq!(m.get_or_zero(3, 1), 0.);
        // Failed writes must not leak into any other element.
        assert_eq!(m, Matrix::identity(2));
    }

    #[test]
    #[should_panic(expected = "outside of a 2x2 matrix")]
    fn index_out_of_bounds() {
        let m = Matrix::identity(2);
        let _ = m[(1, 3)];
    }

    #[test]
    fn product() {
        let a = Matrix::from_rows([[1., 2., 3.], [4., 5., 6.]]);
        let b = Matrix::from_rows([[7., 8.], [9., 10.], [11., 12.]]);
        assert_eq!(&a * &b, Matrix::from_rows([[58., 64.], [139., 154.]]));
    }

    #[test]
    fn product_dimension_mismatch() {
        let a = Matrix::new(2, 3);
        let b = Matrix::new(2, 4);
        assert!(matches!(
            a.try_product(&b),
            Err(MatrixError::DimensionMismatch {
                left_rows: 2,
                left_columns: 3,
                right_rows: 2,
                right_columns: 4,
            })
        ));
        assert_eq!(a.product(&b), Matrix::zeroed(2, 4));
    }

    #[test]
    fn product_is_associative_not_commutative() {
        let a = Matrix::rotation_x(Rotation::degrees(30.));
        let b = Matrix::rotation_y(Rotation::degrees(45.));
        let c = Matrix::rotation_z(Rotation::degrees(60.));
        assert_close(&(&(&a * &b) * &c), &(&a * &(&b * &c)));
        assert_ne!(&a * &b, &b * &a);
    }

    #[test]
    fn scalar_multiply() {
        let mut m = Matrix::identity(2);
        m *= 3.;
        assert_eq!(m, Matrix::from_rows([[3., 0.], [0., 3.]]));
    }

    #[test]
    fn transform_vectors() {
        let quarter = Matrix::rotation(Rotation::degrees(90.));
        let rotated = quarter.transform(Vector2::new(10., 0.));
        assert!(rotated.distance(Vector2::new(0., 10.)) < 1e-4);

        let rotated =
            Matrix::rotation_z(Rotation::degrees(90.)).transform(Vector3::new(1., 0., 0.));
        assert!(rotated.distance(Vector3::new(0., 1., 0.)) < 1e-5);

        // A mismatched transform degrades to the zero vector.
        assert_eq!(quarter.transform(Vector3::new(1., 2., 3.)), Vector3::default());
    }

    #[test]
    fn rotation_about_axis_matches_axis_rotations() {
        let angle = Rotation::degrees(35.);
        assert_close(
            &Matrix::rotation_about(Vector3::new(2., 0., 0.), angle),
            &Matrix::rotation_x(angle),
        );
        assert_close(
            &Matrix::rotation_about(Vector3::new(0., 1., 0.), angle),
            &Matrix::rotation_y(angle),
        );
        assert_close(
            &Matrix::rotation_about(Vector3::new(0., 0., 1.), angle),
            &Matrix::rotation_z(angle),
        );
        assert_eq!(
            Matrix::rotation_about(Vector3::default(), angle),
            Matrix::identity(3)
        );
    }
}
