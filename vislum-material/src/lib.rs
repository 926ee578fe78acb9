//! Fixed-size, self-describing material attributes.
//!
//! A [`MaterialAttributeData`] packs a name, a [`MaterialAttributeType`] tag
//! and the raw value into one 64-byte record. A [`MaterialData`] is an
//! ordered list of those records.
//!
//! ```
//! use vislum_material::prelude::*;
//! use vislum_material::math::vec4;
//!
//! let material = MaterialData::new(vec![
//!     MaterialAttributeData::new(MaterialAttribute::Shininess, 80.0f32)?,
//!     MaterialAttributeData::new(MaterialAttribute::AmbientColor, vec4(1.0, 0.0, 0.0, 1.0))?,
//! ]);
//!
//! assert_eq!(material[0].ty(), MaterialAttributeType::Float);
//! assert_eq!(material.shininess(), Some(80.0));
//! # Ok::<(), MaterialError>(())
//! ```

pub mod attribute;
pub mod data;
pub mod error;
pub mod material;
pub mod types;

pub use vislum_math as math;

pub use crate::attribute::{MaterialAttribute, MaterialTextureSlot};
pub use crate::data::{
    MAX_VALUE_SIZE, MaterialAttributeData, RECORD_SIZE, TYPE_FIELD_SIZE, USABLE_PAYLOAD_SIZE,
};
pub use crate::error::MaterialError;
pub use crate::material::MaterialData;
pub use crate::types::{MaterialAttributeType, MaterialAttributeValue, MaterialValue};

pub mod prelude {
    pub use crate::attribute::{MaterialAttribute, MaterialTextureSlot};
    pub use crate::data::MaterialAttributeData;
    pub use crate::error::MaterialError;
    pub use crate::material::MaterialData;
    pub use crate::types::{MaterialAttributeType, MaterialAttributeValue, MaterialValue};
}
