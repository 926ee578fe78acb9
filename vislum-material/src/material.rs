use std::collections::HashSet;

use derive_more::Deref;
use serde::{Deserialize, Serialize};
use vislum_math::{Matrix3, Vector4};

use crate::attribute::{MaterialAttribute, MaterialTextureSlot};
use crate::data::{MaterialAttributeData, RECORD_SIZE};
use crate::error::MaterialError;
use crate::types::{MaterialAttributeType, MaterialAttributeValue};

/// An ordered list of material attributes.
///
/// The list is fixed once created. Attributes keep the order they were
/// passed in and duplicate names are kept as they are; lookups by name
/// return the first match, [`attributes_named`](Self::attributes_named)
/// returns all of them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deref, Serialize, Deserialize)]
#[deref(forward)]
#[serde(from = "Vec<MaterialAttributeData>", into = "Vec<MaterialAttributeData>")]
pub struct MaterialData {
    attributes: Box<[MaterialAttributeData]>,
}

static_assertions::assert_impl_all!(MaterialData: Send, Sync);

impl MaterialData {
    /// Creates a material, taking ownership of the attributes.
    pub fn new(attributes: Vec<MaterialAttributeData>) -> Self {
        Self::check_attributes(&attributes);
        log::trace!("created material with {} attributes", attributes.len());

        Self {
            attributes: attributes.into_boxed_slice(),
        }
    }

    /// Logs attributes a consumer will likely trip over. Nothing is rejected.
    fn check_attributes(attributes: &[MaterialAttributeData]) {
        let mut names = HashSet::with_capacity(attributes.len());

        for (id, attribute) in attributes.iter().enumerate() {
            let name = attribute.name();

            if let Some(known) = MaterialAttribute::from_name(name) {
                if known.value_type() != attribute.ty() {
                    log::warn!(
                        "material attribute {id} ({known}) is a {}, expected a {}",
                        attribute.ty(),
                        known.value_type(),
                    );
                }
            }

            if !names.insert(name) {
                log::debug!("material attribute {name:?} appears more than once, at {id}");
            }
        }
    }

    /// Reads a material back from its [`to_bytes`](Self::to_bytes) form.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, MaterialError> {
        if bytes.len() % RECORD_SIZE != 0 {
            return Err(MaterialError::MalformedAttribute(
                "material data is not a whole number of attribute records",
            ));
        }

        let attributes = bytes
            .chunks_exact(RECORD_SIZE)
            // The length check above leaves only whole records.
            .map(|chunk| MaterialAttributeData::from_bytes(bytemuck::from_bytes(chunk)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::new(attributes))
    }

    /// The raw bytes of every attribute record, in order.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.attributes
            .iter()
            .flat_map(|attribute| attribute.to_bytes())
            .collect()
    }

    #[inline(always)]
    pub fn attribute_count(&self) -> usize {
        self.attributes.len()
    }

    #[inline(always)]
    pub fn attributes(&self) -> &[MaterialAttributeData] {
        &self.attributes
    }

    /// Gets the attribute at `id`.
    ///
    /// Panics if `id` is out of range.
    pub fn attribute(&self, id: usize) -> &MaterialAttributeData {
        &self.attributes[id]
    }

    /// Gives the attributes back, in order.
    pub fn into_attributes(self) -> Vec<MaterialAttributeData> {
        self.attributes.into_vec()
    }

    /// The index of the first attribute called `name`.
    pub fn attribute_id(&self, name: impl AsRef<str>) -> Option<usize> {
        let name = name.as_ref();
        self.attributes
            .iter()
            .position(|attribute| attribute.name() == name)
    }

    pub fn has_attribute(&self, name: impl AsRef<str>) -> bool {
        self.attribute_id(name).is_some()
    }

    /// The first attribute called `name`.
    pub fn find(&self, name: impl AsRef<str>) -> Option<&MaterialAttributeData> {
        self.attribute_id(name).map(|id| &self.attributes[id])
    }

    /// Every attribute called `name`, in order.
    pub fn attributes_named<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Iterator<Item = &'a MaterialAttributeData> + 'a {
        self.attributes
            .iter()
            .filter(move |attribute| attribute.name() == name)
    }

    /// Every attribute of type `ty`, in order.
    pub fn attributes_of_type(
        &self,
        ty: MaterialAttributeType,
    ) -> impl Iterator<Item = &MaterialAttributeData> {
        self.attributes
            .iter()
            .filter(move |attribute| attribute.ty() == ty)
    }

    /// Reads the value of the first attribute called `name`.
    ///
    /// Panics if that attribute is not a `T`.
    pub fn value<T: MaterialAttributeValue>(&self, name: impl AsRef<str>) -> Option<T> {
        self.find(name).map(|attribute| attribute.value())
    }

    /// Reads the value of the first attribute called `name`, or `None` if it
    /// is missing or not a `T`.
    pub fn try_value<T: MaterialAttributeValue>(&self, name: impl AsRef<str>) -> Option<T> {
        self.find(name).and_then(|attribute| attribute.try_value())
    }

    pub fn is_double_sided(&self) -> bool {
        self.try_value(MaterialAttribute::DoubleSided).unwrap_or(false)
    }

    pub fn is_alpha_blended(&self) -> bool {
        self.try_value(MaterialAttribute::AlphaBlend).unwrap_or(false)
    }

    pub fn alpha_mask(&self) -> Option<f32> {
        self.try_value(MaterialAttribute::AlphaMask)
    }

    pub fn shininess(&self) -> Option<f32> {
        self.try_value(MaterialAttribute::Shininess)
    }

    pub fn color(&self, slot: MaterialTextureSlot) -> Option<Vector4> {
        slot.color().and_then(|attribute| self.try_value(attribute))
    }

    /// The texture index bound to `slot`.
    pub fn texture(&self, slot: MaterialTextureSlot) -> Option<u32> {
        self.try_value(slot.texture())
    }

    /// The texture coordinate set used by `slot`.
    ///
    /// A per-texture coordinate set takes precedence over the common
    /// `CoordinateSet`. Defaults to `0`.
    pub fn texture_coordinate_set(&self, slot: MaterialTextureSlot) -> u32 {
        self.try_value(slot.coordinate_set())
            .or_else(|| self.try_value(MaterialAttribute::CoordinateSet))
            .unwrap_or(0)
    }

    /// The texture transformation used by `slot`.
    ///
    /// A per-texture matrix takes precedence over the common
    /// `TextureMatrix`. Defaults to identity.
    pub fn texture_matrix(&self, slot: MaterialTextureSlot) -> Matrix3 {
        self.try_value(slot.texture_matrix())
            .or_else(|| self.try_value(MaterialAttribute::TextureMatrix))
            .unwrap_or_else(Matrix3::identity)
    }
}

impl From<Vec<MaterialAttributeData>> for MaterialData {
    fn from(attributes: Vec<MaterialAttributeData>) -> Self {
        Self::new(attributes)
    }
}

impl From<MaterialData> for Vec<MaterialAttributeData> {
    fn from(material: MaterialData) -> Self {
        material.into_attributes()
    }
}

impl FromIterator<MaterialAttributeData> for MaterialData {
    fn from_iter<I: IntoIterator<Item = MaterialAttributeData>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a MaterialData {
    type Item = &'a MaterialAttributeData;
    type IntoIter = std::slice::Iter<'a, MaterialAttributeData>;

    fn into_iter(self) -> Self::IntoIter {
        self.attributes.iter()
    }
}

impl std::ops::Index<usize> for MaterialData {
    type Output = MaterialAttributeData;

    fn index(&self, id: usize) -> &Self::Output {
        &self.attributes[id]
    }
}
