use std::mem::{align_of, size_of};

use serde::{Deserialize, Serialize};
use vislum_math::{
    Matrix2x2, Matrix2x3, Matrix2x4, Matrix3x2, Matrix3x3, Matrix3x4, Matrix4x2, Matrix4x3,
    Vector2, Vector2I, Vector2U, Vector3, Vector3I, Vector3U, Vector4, Vector4I, Vector4U,
};

use crate::data::{MAX_VALUE_SIZE, MaterialAttributeData, RECORD_SIZE};
use crate::error::MaterialError;

macro_rules! impl_attribute_types {
    ($($name:ident($type:ty) = $tag:literal, size $size:literal, align $align:literal;)*) => {
        /// The type of a material attribute value.
        ///
        /// Zero is not a valid tag, it marks an empty record slot.
        #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[repr(u8)]
        pub enum MaterialAttributeType {
            $(
                #[doc = concat!("`", stringify!($type), "`")]
                $name = $tag,
            )*
        }

        impl MaterialAttributeType {
            /// Every attribute type, in tag order.
            pub const ALL: &'static [MaterialAttributeType] = &[$(Self::$name),*];

            /// Converts a raw tag byte, returning `None` for zero or unknown tags.
            pub const fn from_raw(raw: u8) -> Option<Self> {
                match raw {
                    $($tag => Some(Self::$name),)*
                    _ => None,
                }
            }

            /// The size of the value in bytes.
            pub const fn size(self) -> usize {
                match self {
                    $(Self::$name => $size,)*
                }
            }

            /// The natural alignment of the value in bytes.
            pub const fn alignment(self) -> usize {
                match self {
                    $(Self::$name => $align,)*
                }
            }

            pub const fn name(self) -> &'static str {
                match self {
                    $(Self::$name => stringify!($name),)*
                }
            }
        }

        /// A material attribute value of any supported type.
        #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
        pub enum MaterialValue {
            $($name($type),)*
        }

        impl MaterialValue {
            pub const fn ty(&self) -> MaterialAttributeType {
                match self {
                    $(Self::$name(_) => MaterialAttributeType::$name,)*
                }
            }

            pub(crate) fn decode(attribute: &MaterialAttributeData) -> Self {
                match attribute.ty() {
                    $(MaterialAttributeType::$name => Self::$name(attribute.value::<$type>()),)*
                }
            }

            pub(crate) fn encode(
                self,
                name: &str,
            ) -> Result<MaterialAttributeData, MaterialError> {
                match self {
                    $(Self::$name(value) => MaterialAttributeData::new(name, value),)*
                }
            }
        }

        $(
            impl From<$type> for MaterialValue {
                #[inline(always)]
                fn from(value: $type) -> Self {
                    Self::$name(value)
                }
            }

            impl sealed::Sealed for $type {}

            const _: () = {
                let ty = <$type as MaterialAttributeValue>::TYPE;
                assert!(ty as u8 == $tag);
                assert!(size_of::<$type>() == ty.size());
                assert!(size_of::<<$type as MaterialAttributeValue>::Repr>() == ty.size());
                assert!(align_of::<$type>() == ty.alignment());
                assert!(ty.size() <= MAX_VALUE_SIZE);
                assert!((RECORD_SIZE - ty.size()) % ty.alignment() == 0);
            };
        )*
    };
}

impl_attribute_types! {
    Bool(bool) = 1, size 1, align 1;

    Float(f32) = 2, size 4, align 4;
    UnsignedInt(u32) = 3, size 4, align 4;
    Int(i32) = 4, size 4, align 4;

    Vector2(Vector2) = 5, size 8, align 4;
    Vector2U(Vector2U) = 6, size 8, align 4;
    Vector2I(Vector2I) = 7, size 8, align 4;

    Vector3(Vector3) = 8, size 12, align 4;
    Vector3U(Vector3U) = 9, size 12, align 4;
    Vector3I(Vector3I) = 10, size 12, align 4;

    Vector4(Vector4) = 11, size 16, align 4;
    Vector4U(Vector4U) = 12, size 16, align 4;
    Vector4I(Vector4I) = 13, size 16, align 4;

    Matrix2x2(Matrix2x2) = 14, size 16, align 4;
    Matrix2x3(Matrix2x3) = 15, size 24, align 4;
    Matrix2x4(Matrix2x4) = 16, size 32, align 4;

    Matrix3x2(Matrix3x2) = 17, size 24, align 4;
    Matrix3x3(Matrix3x3) = 18, size 36, align 4;
    Matrix3x4(Matrix3x4) = 19, size 48, align 4;

    Matrix4x2(Matrix4x2) = 20, size 32, align 4;
    Matrix4x3(Matrix4x3) = 21, size 48, align 4;
}

impl MaterialAttributeType {
    /// Whether the value is made of `f32` components.
    pub const fn is_floating_point(self) -> bool {
        matches!(
            self,
            Self::Float
                | Self::Vector2
                | Self::Vector3
                | Self::Vector4
                | Self::Matrix2x2
                | Self::Matrix2x3
                | Self::Matrix2x4
                | Self::Matrix3x2
                | Self::Matrix3x3
                | Self::Matrix3x4
                | Self::Matrix4x2
                | Self::Matrix4x3
        )
    }
}

impl std::fmt::Display for MaterialAttributeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

mod sealed {
    pub trait Sealed {}
}

/// A type that can be stored in a [`MaterialAttributeData`].
///
/// Implemented for `bool`, `f32`, `u32`, `i32` and the vector and matrix
/// types from `vislum-math` that fit in a record. Anything else is rejected
/// at compile time:
///
/// ```compile_fail
/// use vislum_material::MaterialAttributeData;
/// use vislum_material::math::Matrix4;
///
/// let _ = MaterialAttributeData::new("Transformation", Matrix4::identity());
/// ```
///
/// ```compile_fail
/// use vislum_material::MaterialAttributeData;
///
/// let _ = MaterialAttributeData::new("Shininess", 80.0f64);
/// ```
pub trait MaterialAttributeValue: Copy + sealed::Sealed + Into<MaterialValue> {
    /// The tag stored alongside the value.
    const TYPE: MaterialAttributeType;

    /// The in-record representation of the value.
    type Repr: bytemuck::Pod;

    fn to_repr(self) -> Self::Repr;

    fn from_repr(repr: Self::Repr) -> Self;
}

impl MaterialAttributeValue for bool {
    const TYPE: MaterialAttributeType = MaterialAttributeType::Bool;

    type Repr = u8;

    #[inline(always)]
    fn to_repr(self) -> u8 {
        self as u8
    }

    #[inline(always)]
    fn from_repr(repr: u8) -> Self {
        repr != 0
    }
}

macro_rules! impl_pod_value {
    ($($type:ty => $name:ident),* $(,)?) => {
        $(
            impl MaterialAttributeValue for $type {
                const TYPE: MaterialAttributeType = MaterialAttributeType::$name;

                type Repr = $type;

                #[inline(always)]
                fn to_repr(self) -> Self::Repr {
                    self
                }

                #[inline(always)]
                fn from_repr(repr: Self::Repr) -> Self {
                    repr
                }
            }
        )*
    };
}

impl_pod_value! {
    f32 => Float,
    u32 => UnsignedInt,
    i32 => Int,
    Vector2 => Vector2,
    Vector2U => Vector2U,
    Vector2I => Vector2I,
    Vector3 => Vector3,
    Vector3U => Vector3U,
    Vector3I => Vector3I,
    Vector4 => Vector4,
    Vector4U => Vector4U,
    Vector4I => Vector4I,
    Matrix2x2 => Matrix2x2,
    Matrix2x3 => Matrix2x3,
    Matrix2x4 => Matrix2x4,
    Matrix3x2 => Matrix3x2,
    Matrix3x3 => Matrix3x3,
    Matrix3x4 => Matrix3x4,
    Matrix4x2 => Matrix4x2,
    Matrix4x3 => Matrix4x3,
}
