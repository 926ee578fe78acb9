use std::ops::{Add, AddAssign, Mul, MulAssign, Sub, SubAssign};

use cgmath::SquareMatrix;
use serde::{Deserialize, Serialize};

/// Marks a math type as plain old data.
///
/// SAFETY: only used on `#[repr(transparent)]` wrappers around cgmath's
/// `#[repr(C)]` vectors and matrices, or `#[repr(transparent)]` arrays of
/// those wrappers. Every component is a 4-byte number, so there is no
/// padding and every bit pattern is valid.
macro_rules! impl_pod {
    ($($ident:ident),* $(,)?) => {
        $(
            unsafe impl bytemuck::Zeroable for $ident {}
            unsafe impl bytemuck::Pod for $ident {}
        )*
    };
}

/// Serializes a math type through its plain array form.
macro_rules! impl_serde_as {
    ($ident:ident: $repr:ty) => {
        impl Serialize for $ident {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                <$repr>::from(*self).serialize(serializer)
            }
        }

        impl<'de> Deserialize<'de> for $ident {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                <$repr>::deserialize(deserializer).map(Self::from)
            }
        }
    };
}

macro_rules! impl_vector {
    ($ident:ident; $components:expr; $ty:ty; $constructor:ident; $inner:path; $($field:ident),*) => {
        #[doc = concat!("A ", stringify!($ident), " vector.")]
        #[derive(Debug, Clone, Copy, PartialEq)]
        #[repr(transparent)]
        pub struct $ident {
            inner: $inner,
        }

        impl_serde_as!($ident: [$ty; $components]);

        impl $ident {
            pub const fn new($($field: $ty),*) -> Self {
                Self { inner: <$inner>::new($($field),*) }
            }

            $(
                pub fn $field(&self) -> $ty {
                    self.inner.$field
                }
            )*
        }

        pub const fn $constructor($($field: $ty),*) -> $ident {
            $ident::new($($field),*)
        }

        impl Default for $ident {
            fn default() -> Self {
                <$ident>::new(
                    $(impl_vector!(@zero_field $field)),*
                )
            }
        }

        impl Add for $ident {
            type Output = Self;

            fn add(self, rhs: Self) -> Self::Output {
                Self { inner: self.inner + rhs.inner }
            }
        }

        impl AddAssign for $ident {
            fn add_assign(&mut self, rhs: Self) {
                self.inner += rhs.inner;
            }
        }

        impl Sub for $ident {
            type Output = Self;

            fn sub(self, rhs: Self) -> Self::Output {
                Self { inner: self.inner - rhs.inner }
            }
        }

        impl Mul<$ty> for $ident {
            type Output = Self;

            fn mul(self, rhs: $ty) -> Self::Output {
                Self { inner: self.inner * rhs }
            }
        }

        impl From<$ident> for [$ty; $components] {
            fn from(value: $ident) -> Self {
                value.inner.into()
            }
        }

        impl From<$ident> for $inner {
            fn from(value: $ident) -> Self {
                value.inner
            }
        }

        impl From<$inner> for $ident {
            fn from(inner: $inner) -> Self {
                Self { inner }
            }
        }

        impl From<[$ty; $components]> for $ident {
            fn from(value: [$ty; $components]) -> Self {
                Self { inner: <$inner>::from(value) }
            }
        }
    };

    (@zero_field $field:ident) => { Default::default() };
}

impl_vector!(Vector4; 4; f32; vec4; cgmath::Vector4<f32>; x, y, z, w);
impl_vector!(Vector3; 3; f32; vec3; cgmath::Vector3<f32>; x, y, z);
impl_vector!(Vector2; 2; f32; vec2; cgmath::Vector2<f32>; x, y);

impl_vector!(Vector4U; 4; u32; vec4u; cgmath::Vector4<u32>; x, y, z, w);
impl_vector!(Vector3U; 3; u32; vec3u; cgmath::Vector3<u32>; x, y, z);
impl_vector!(Vector2U; 2; u32; vec2u; cgmath::Vector2<u32>; x, y);

impl_vector!(Vector4I; 4; i32; vec4i; cgmath::Vector4<i32>; x, y, z, w);
impl_vector!(Vector3I; 3; i32; vec3i; cgmath::Vector3<i32>; x, y, z);
impl_vector!(Vector2I; 2; i32; vec2i; cgmath::Vector2<i32>; x, y);

impl_pod!(
    Vector2, Vector3, Vector4, Vector2U, Vector3U, Vector4U, Vector2I, Vector3I, Vector4I,
);

/// Square matrices wrap the cgmath type and support the full operator set.
macro_rules! impl_square_matrix {
    ($ident:ident; $n:expr; $column:ident; $inner:path; $($col:ident),*) => {
        #[doc = concat!("A column-major ", stringify!($n), "x", stringify!($n), " matrix.")]
        #[derive(Debug, Clone, Copy, PartialEq)]
        #[repr(transparent)]
        pub struct $ident {
            inner: $inner,
        }

        impl_serde_as!($ident: [[f32; $n]; $n]);

        impl $ident {
            pub fn new($($col: $column),*) -> Self {
                Self {
                    inner: <$inner>::from_cols($($col.into()),*),
                }
            }

            pub fn identity() -> Self {
                Self { inner: <$inner>::identity() }
            }

            /// Returns the column at `index`.
            ///
            /// Panics if `index` is out of range.
            pub fn col(&self, index: usize) -> $column {
                $column::from(self.inner[index])
            }
        }

        impl Add for $ident {
            type Output = Self;

            fn add(self, rhs: Self) -> Self::Output {
                Self { inner: self.inner + rhs.inner }
            }
        }

        impl AddAssign for $ident {
            fn add_assign(&mut self, rhs: Self) {
                self.inner += rhs.inner;
            }
        }

        impl Sub for $ident {
            type Output = Self;

            fn sub(self, rhs: Self) -> Self::Output {
                Self { inner: self.inner - rhs.inner }
            }
        }

        impl SubAssign for $ident {
            fn sub_assign(&mut self, rhs: Self) {
                self.inner -= rhs.inner;
            }
        }

        impl Mul for $ident {
            type Output = Self;

            fn mul(self, rhs: Self) -> Self::Output {
                Self { inner: self.inner * rhs.inner }
            }
        }

        impl Mul<$column> for $ident {
            type Output = $column;

            fn mul(self, rhs: $column) -> Self::Output {
                $column { inner: self.inner * rhs.inner }
            }
        }

        impl Mul<f32> for $ident {
            type Output = Self;

            fn mul(self, rhs: f32) -> Self::Output {
                Self { inner: self.inner * rhs }
            }
        }

        impl MulAssign<f32> for $ident {
            fn mul_assign(&mut self, rhs: f32) {
                self.inner *= rhs;
            }
        }

        impl Default for $ident {
            fn default() -> Self {
                Self::identity()
            }
        }

        impl From<[[f32; $n]; $n]> for $ident {
            fn from(value: [[f32; $n]; $n]) -> Self {
                Self { inner: <$inner>::from(value) }
            }
        }

        impl From<$ident> for [[f32; $n]; $n] {
            fn from(value: $ident) -> Self {
                value.inner.into()
            }
        }
    };
}

impl_square_matrix!(Matrix2; 2; Vector2; cgmath::Matrix2<f32>; c0, c1);
impl_square_matrix!(Matrix3; 3; Vector3; cgmath::Matrix3<f32>; c0, c1, c2);
impl_square_matrix!(Matrix4; 4; Vector4; cgmath::Matrix4<f32>; c0, c1, c2, c3);

pub type Matrix2x2 = Matrix2;
pub type Matrix3x3 = Matrix3;
pub type Matrix4x4 = Matrix4;

/// Non-square matrices are stored as an array of `$cols` column vectors of
/// `$rows` components each.
macro_rules! impl_matrix {
    ($ident:ident; $cols:expr; $rows:expr; $column:ident) => {
        #[doc = concat!(
            "A column-major matrix with ", stringify!($cols), " columns and ",
            stringify!($rows), " rows."
        )]
        #[derive(Debug, Clone, Copy, PartialEq)]
        #[repr(transparent)]
        pub struct $ident {
            cols: [$column; $cols],
        }

        impl_serde_as!($ident: [[f32; $rows]; $cols]);

        impl $ident {
            pub const fn from_cols(cols: [$column; $cols]) -> Self {
                Self { cols }
            }

            /// A matrix with ones on the main diagonal and zeros elsewhere.
            pub fn identity() -> Self {
                let mut cols = [[0.0; $rows]; $cols];
                for (index, col) in cols.iter_mut().enumerate() {
                    if index < $rows {
                        col[index] = 1.0;
                    }
                }
                Self::from(cols)
            }

            /// Returns the column at `index`.
            ///
            /// Panics if `index` is out of range.
            pub fn col(&self, index: usize) -> $column {
                self.cols[index]
            }
        }

        impl Add for $ident {
            type Output = Self;

            fn add(self, rhs: Self) -> Self::Output {
                let mut cols = self.cols;
                for (col, rhs) in cols.iter_mut().zip(rhs.cols) {
                    *col += rhs;
                }
                Self { cols }
            }
        }

        impl Sub for $ident {
            type Output = Self;

            fn sub(self, rhs: Self) -> Self::Output {
                Self { cols: std::array::from_fn(|index| self.cols[index] - rhs.cols[index]) }
            }
        }

        impl Mul<f32> for $ident {
            type Output = Self;

            fn mul(self, rhs: f32) -> Self::Output {
                Self { cols: self.cols.map(|col| col * rhs) }
            }
        }

        impl Default for $ident {
            fn default() -> Self {
                Self::identity()
            }
        }

        impl From<[[f32; $rows]; $cols]> for $ident {
            fn from(value: [[f32; $rows]; $cols]) -> Self {
                Self { cols: value.map($column::from) }
            }
        }

        impl From<$ident> for [[f32; $rows]; $cols] {
            fn from(value: $ident) -> Self {
                value.cols.map(Into::into)
            }
        }
    };
}

impl_matrix!(Matrix2x3; 2; 3; Vector3);
impl_matrix!(Matrix2x4; 2; 4; Vector4);
impl_matrix!(Matrix3x2; 3; 2; Vector2);
impl_matrix!(Matrix3x4; 3; 4; Vector4);
impl_matrix!(Matrix4x2; 4; 2; Vector2);
impl_matrix!(Matrix4x3; 4; 3; Vector3);

impl_pod!(
    Matrix2, Matrix3, Matrix4, Matrix2x3, Matrix2x4, Matrix3x2, Matrix3x4, Matrix4x2, Matrix4x3,
);

static_assertions::assert_eq_size!(Vector3U, [u32; 3]);
static_assertions::assert_eq_size!(Vector4I, [i32; 4]);
static_assertions::assert_eq_size!(Matrix3, [f32; 9]);
static_assertions::assert_eq_size!(Matrix4, [f32; 16]);
static_assertions::assert_eq_size!(Matrix2x3, [f32; 6]);
static_assertions::assert_eq_size!(Matrix3x4, [f32; 12]);
static_assertions::assert_eq_size!(Matrix4x3, [f32; 12]);
static_assertions::assert_eq_align!(Matrix4x2, f32);
