use serde::{Deserialize, Serialize};

use crate::types::MaterialAttributeType;

macro_rules! impl_material_attributes {
    ($($(#[$meta:meta])* $name:ident: $ty:ident,)*) => {
        /// A predefined material attribute name.
        ///
        /// Each attribute has a canonical text name, which is what ends up
        /// stored in a [`MaterialAttributeData`](crate::MaterialAttributeData),
        /// and a documented value type.
        #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum MaterialAttribute {
            $(
                $(#[$meta])*
                $name,
            )*
        }

        impl MaterialAttribute {
            pub const ALL: &'static [MaterialAttribute] = &[$(Self::$name),*];

            /// The canonical name of the attribute.
            pub const fn name(self) -> &'static str {
                match self {
                    $(Self::$name => stringify!($name),)*
                }
            }

            /// The type values of this attribute are expected to have.
            pub const fn value_type(self) -> MaterialAttributeType {
                match self {
                    $(Self::$name => MaterialAttributeType::$ty,)*
                }
            }

            /// Looks up a predefined attribute by its canonical name.
            pub fn from_name(name: &str) -> Option<Self> {
                match name {
                    $(stringify!($name) => Some(Self::$name),)*
                    _ => None,
                }
            }
        }
    };
}

impl_material_attributes! {
    /// Alpha mask cutoff. If set together with `AlphaBlend`, blending is
    /// preferred.
    AlphaMask: Float,
    /// Whether the material is rendered with blending. Opaque if absent.
    AlphaBlend: Bool,
    /// Whether the material is double sided. `false` if absent.
    DoubleSided: Bool,

    /// Ambient color, multiplied with `AmbientTexture` if both are present.
    AmbientColor: Vector4,
    AmbientTexture: UnsignedInt,
    /// Overrides `CoordinateSet` for the ambient texture.
    AmbientCoordinateSet: UnsignedInt,
    /// Overrides `TextureMatrix` for the ambient texture.
    AmbientTextureMatrix: Matrix3x3,

    /// Diffuse color, multiplied with `DiffuseTexture` if both are present.
    DiffuseColor: Vector4,
    DiffuseTexture: UnsignedInt,
    DiffuseCoordinateSet: UnsignedInt,
    DiffuseTextureMatrix: Matrix3x3,

    /// Specular color, multiplied with `SpecularTexture` if both are present.
    SpecularColor: Vector4,
    SpecularTexture: UnsignedInt,
    SpecularCoordinateSet: UnsignedInt,
    /// Too long to fit next to a `Matrix3x3`, so building it fails with
    /// `OversizedAttribute`.
    SpecularTextureMatrix: Matrix3x3,

    /// Tangent-space normal map.
    NormalTexture: UnsignedInt,
    NormalCoordinateSet: UnsignedInt,
    NormalTextureMatrix: Matrix3x3,

    /// Texture coordinate set shared by all textures.
    CoordinateSet: UnsignedInt,
    /// Texture transformation shared by all textures.
    TextureMatrix: Matrix3x3,

    /// Phong shininess exponent.
    Shininess: Float,
}

impl AsRef<str> for MaterialAttribute {
    fn as_ref(&self) -> &str {
        self.name()
    }
}

impl std::fmt::Display for MaterialAttribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A texture of a Phong material.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum MaterialTextureSlot {
    Ambient,
    Diffuse,
    Specular,
    Normal,
}

impl MaterialTextureSlot {
    pub const ALL: [MaterialTextureSlot; 4] = [
        MaterialTextureSlot::Ambient,
        MaterialTextureSlot::Diffuse,
        MaterialTextureSlot::Specular,
        MaterialTextureSlot::Normal,
    ];

    /// The color multiplied with the texture. Normal maps have none.
    pub const fn color(self) -> Option<MaterialAttribute> {
        match self {
            Self::Ambient => Some(MaterialAttribute::AmbientColor),
            Self::Diffuse => Some(MaterialAttribute::DiffuseColor),
            Self::Specular => Some(MaterialAttribute::SpecularColor),
            Self::Normal => None,
        }
    }

    pub const fn texture(self) -> MaterialAttribute {
        match self {
            Self::Ambient => MaterialAttribute::AmbientTexture,
            Self::Diffuse => MaterialAttribute::DiffuseTexture,
            Self::Specular => MaterialAttribute::SpecularTexture,
            Self::Normal => MaterialAttribute::NormalTexture,
        }
    }

    pub const fn coordinate_set(self) -> MaterialAttribute {
        match self {
            Self::Ambient => MaterialAttribute::AmbientCoordinateSet,
            Self::Diffuse => MaterialAttribute::DiffuseCoordinateSet,
            Self::Specular => MaterialAttribute::SpecularCoordinateSet,
            Self::Normal => MaterialAttribute::NormalCoordinateSet,
        }
    }

    pub const fn texture_matrix(self) -> MaterialAttribute {
        match self {
            Self::Ambient => MaterialAttribute::AmbientTextureMatrix,
            Self::Diffuse => MaterialAttribute::DiffuseTextureMatrix,
            Self::Specular => MaterialAttribute::SpecularTextureMatrix,
            Self::Normal => MaterialAttribute::NormalTextureMatrix,
        }
    }
}
