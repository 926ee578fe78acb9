use serde::{Deserialize, Serialize};

use crate::error::MaterialError;
use crate::types::{MaterialAttributeType, MaterialAttributeValue, MaterialValue};

/// The size of a single attribute record.
pub const RECORD_SIZE: usize = 64;

/// The space taken by the type tag, including its alignment padding.
pub const TYPE_FIELD_SIZE: usize = 8;

/// The bytes shared by the name and the value.
pub const USABLE_PAYLOAD_SIZE: usize = RECORD_SIZE - TYPE_FIELD_SIZE;

/// The largest value a record can hold, leaving room for a name.
pub const MAX_VALUE_SIZE: usize = 48;

/// A single named and typed material attribute.
///
/// The record is always [`RECORD_SIZE`] bytes:
///
/// | offset          | size              | contents                    |
/// |-----------------|-------------------|-----------------------------|
/// | 0               | 1                 | type tag, never zero        |
/// | 1               | 7                 | zero padding                |
/// | 8               | name length       | name bytes                  |
/// | ..              | ..                | zero fill                   |
/// | 64 - value size | value size        | value, native endian        |
///
/// The value sits at the end of the record so its offset is a multiple of
/// its alignment. The name ends at the first zero byte, or where the value
/// starts if it fills the space in between.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[repr(C, align(8))]
pub struct MaterialAttributeData {
    ty: MaterialAttributeType,
    _padding: [u8; TYPE_FIELD_SIZE - 1],
    data: [u8; USABLE_PAYLOAD_SIZE],
}

static_assertions::assert_eq_size!(MaterialAttributeData, [u8; RECORD_SIZE]);
static_assertions::assert_eq_align!(MaterialAttributeData, u64);
static_assertions::assert_eq_size!(Option<MaterialAttributeData>, MaterialAttributeData);
static_assertions::const_assert_eq!(
    std::mem::offset_of!(MaterialAttributeData, data),
    TYPE_FIELD_SIZE
);
static_assertions::const_assert!(MAX_VALUE_SIZE < USABLE_PAYLOAD_SIZE);
static_assertions::assert_impl_all!(MaterialAttributeData: Send, Sync);

impl MaterialAttributeData {
    /// Creates an attribute from a name and a value.
    ///
    /// The name is either a string or a [`MaterialAttribute`](crate::MaterialAttribute).
    /// Fails if the name is empty, contains a zero byte, or is too long to
    /// fit next to the value.
    pub fn new<T>(name: impl AsRef<str>, value: T) -> Result<Self, MaterialError>
    where
        T: MaterialAttributeValue,
    {
        debug_assert_eq!(T::TYPE.size(), std::mem::size_of::<T>());
        Self::from_value_bytes(name.as_ref(), T::TYPE, bytemuck::bytes_of(&value.to_repr()))
    }

    /// Builds a record from raw value bytes, which must be `ty.size()` long
    /// and valid for `ty`.
    fn from_value_bytes(
        name: &str,
        ty: MaterialAttributeType,
        value: &[u8],
    ) -> Result<Self, MaterialError> {
        let value_size = ty.size();
        debug_assert_eq!(value.len(), value_size);

        if name.is_empty() {
            return Err(MaterialError::EmptyAttributeName);
        }

        if name.as_bytes().contains(&0) {
            return Err(MaterialError::AttributeNameContainsNul(name.to_owned()));
        }

        if name.len() + value_size > USABLE_PAYLOAD_SIZE {
            log::debug!(
                "rejecting material attribute {name:?}: {} name bytes and a {ty} of {value_size} bytes do not fit in {USABLE_PAYLOAD_SIZE} bytes",
                name.len(),
            );

            return Err(MaterialError::OversizedAttribute {
                name: name.to_owned(),
                name_size: name.len(),
                value_size,
            });
        }

        let mut data = [0; USABLE_PAYLOAD_SIZE];
        data[..name.len()].copy_from_slice(name.as_bytes());
        data[USABLE_PAYLOAD_SIZE - value_size..].copy_from_slice(value);

        Ok(Self {
            ty,
            _padding: [0; TYPE_FIELD_SIZE - 1],
            data,
        })
    }

    /// Creates an attribute from a dynamically typed value.
    pub fn from_value(name: impl AsRef<str>, value: MaterialValue) -> Result<Self, MaterialError> {
        value.encode(name.as_ref())
    }

    /// Reads an attribute back from its [`to_bytes`](Self::to_bytes) form.
    pub fn from_bytes(bytes: &[u8; RECORD_SIZE]) -> Result<Self, MaterialError> {
        let ty = MaterialAttributeType::from_raw(bytes[0])
            .ok_or(MaterialError::InvalidAttributeType(bytes[0]))?;

        if bytes[1..TYPE_FIELD_SIZE].iter().any(|&byte| byte != 0) {
            return Err(MaterialError::MalformedAttribute("padding after the type is not zero"));
        }

        let mut data = [0; USABLE_PAYLOAD_SIZE];
        data.copy_from_slice(&bytes[TYPE_FIELD_SIZE..]);

        let name_region = &data[..USABLE_PAYLOAD_SIZE - ty.size()];
        let name_len = name_length(name_region);

        if name_len == 0 {
            return Err(MaterialError::MalformedAttribute("the name is empty"));
        }

        if name_region[name_len..].iter().any(|&byte| byte != 0) {
            return Err(MaterialError::MalformedAttribute("garbage after the name"));
        }

        if std::str::from_utf8(&name_region[..name_len]).is_err() {
            return Err(MaterialError::MalformedAttribute("the name is not valid UTF-8"));
        }

        if ty == MaterialAttributeType::Bool && data[USABLE_PAYLOAD_SIZE - 1] > 1 {
            return Err(MaterialError::MalformedAttribute("a bool value is neither 0 nor 1"));
        }

        Ok(Self {
            ty,
            _padding: [0; TYPE_FIELD_SIZE - 1],
            data,
        })
    }

    /// The raw record bytes.
    pub fn to_bytes(&self) -> [u8; RECORD_SIZE] {
        let mut bytes = [0; RECORD_SIZE];
        bytes[0] = self.ty as u8;
        bytes[TYPE_FIELD_SIZE..].copy_from_slice(&self.data);
        bytes
    }

    #[inline(always)]
    pub fn ty(&self) -> MaterialAttributeType {
        self.ty
    }

    pub fn name(&self) -> &str {
        let region = &self.data[..USABLE_PAYLOAD_SIZE - self.ty.size()];
        match std::str::from_utf8(&region[..name_length(region)]) {
            Ok(name) => name,
            Err(_) => unreachable!("material attribute names are validated on construction"),
        }
    }

    /// The size of the value in bytes.
    #[inline(always)]
    pub fn value_size(&self) -> usize {
        self.ty.size()
    }

    /// The offset of the value from the start of the record.
    #[inline(always)]
    pub fn value_offset(&self) -> usize {
        RECORD_SIZE - self.ty.size()
    }

    /// The raw bytes of the value.
    pub fn value_bytes(&self) -> &[u8] {
        &self.data[USABLE_PAYLOAD_SIZE - self.ty.size()..]
    }

    /// Reads the value as `T`.
    ///
    /// Panics if `T` is not the type the attribute was created with.
    pub fn value<T: MaterialAttributeValue>(&self) -> T {
        assert!(
            self.ty == T::TYPE,
            "material attribute {:?} is a {}, not a {}",
            self.name(),
            self.ty,
            T::TYPE,
        );

        T::from_repr(*bytemuck::from_bytes(self.value_bytes()))
    }

    /// Reads the value as `T`, or returns `None` if the attribute has a
    /// different type.
    pub fn try_value<T: MaterialAttributeValue>(&self) -> Option<T> {
        (self.ty == T::TYPE).then(|| T::from_repr(*bytemuck::from_bytes(self.value_bytes())))
    }

    /// Reads the value as whatever type the tag says it is.
    pub fn decode(&self) -> MaterialValue {
        MaterialValue::decode(self)
    }

    /// Whether any f32 component of the value is NaN or infinite.
    fn has_non_finite_components(&self) -> bool {
        self.ty.is_floating_point()
            && bytemuck::cast_slice::<u8, f32>(self.value_bytes())
                .iter()
                .any(|component| !component.is_finite())
    }
}

/// The name ends at the first zero byte or at the end of its region.
fn name_length(region: &[u8]) -> usize {
    region.iter().position(|&byte| byte == 0).unwrap_or(region.len())
}

impl std::fmt::Debug for MaterialAttributeData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MaterialAttributeData")
            .field("name", &self.name())
            .field("value", &self.decode())
            .finish()
    }
}

#[derive(Serialize, Deserialize)]
struct SerializedAttribute<N> {
    name: N,
    #[serde(flatten)]
    value: SerializedValue,
}

/// Text formats have no NaN or infinity, so values containing them are
/// stored as the bit patterns of their components.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum SerializedValue {
    Value(MaterialValue),
    Bits {
        ty: MaterialAttributeType,
        bits: Vec<u32>,
    },
}

impl Serialize for MaterialAttributeData {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let value = if self.has_non_finite_components() {
            SerializedValue::Bits {
                ty: self.ty,
                bits: bytemuck::cast_slice(self.value_bytes()).to_vec(),
            }
        } else {
            SerializedValue::Value(self.decode())
        };

        SerializedAttribute {
            name: self.name(),
            value,
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for MaterialAttributeData {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let attribute = SerializedAttribute::<String>::deserialize(deserializer)?;

        let result = match attribute.value {
            SerializedValue::Value(value) => MaterialAttributeData::from_value(&attribute.name, value),
            SerializedValue::Bits { ty, .. } if !ty.is_floating_point() => Err(
                MaterialError::MalformedAttribute("raw bits are only stored for floating-point values"),
            ),
            SerializedValue::Bits { ty, bits } if bits.len() * 4 != ty.size() => Err(
                MaterialError::MalformedAttribute("raw bits do not match the size of the value"),
            ),
            SerializedValue::Bits { ty, bits } => MaterialAttributeData::from_value_bytes(
                &attribute.name,
                ty,
                bytemuck::cast_slice(bits.as_slice()),
            ),
        };

        result.map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use vislum_math::{
        Matrix2x4, Matrix3x3, Matrix3x4, Vector2U, Vector3I, Vector4, vec2u, vec3, vec3i, vec4,
    };

    use super::*;
    use crate::attribute::MaterialAttribute;

    #[test]
    fn test_float_attribute() {
        let attribute = MaterialAttributeData::new("Shininess", 80.0f32).unwrap();
        assert_eq!(attribute.ty(), MaterialAttributeType::Float);
        assert_eq!(attribute.name(), "Shininess");
        assert_eq!(attribute.value_bytes(), &80.0f32.to_ne_bytes());
        assert_eq!(attribute.value::<f32>(), 80.0);
    }

    #[test]
    fn test_predefined_name() {
        let color = vec4(1.0, 0.0, 0.0, 1.0);
        let attribute = MaterialAttributeData::new(MaterialAttribute::AmbientColor, color).unwrap();
        assert_eq!(attribute.name(), "AmbientColor");
        assert_eq!(attribute.ty(), MaterialAttributeType::Vector4);
        assert_eq!(attribute.value_size(), 16);
        assert_eq!(attribute.value::<Vector4>(), color);
    }

    #[test]
    fn test_bool_attribute() {
        let attribute = MaterialAttributeData::new("DoubleSided", true).unwrap();
        assert_eq!(attribute.value_bytes(), &[1]);
        assert_eq!(attribute.value_offset(), RECORD_SIZE - 1);
        assert!(attribute.value::<bool>());

        let attribute = MaterialAttributeData::new("DoubleSided", false).unwrap();
        assert!(!attribute.value::<bool>());
    }

    #[test]
    fn test_values_are_bit_exact() {
        let nan = f32::from_bits(0x7fc0_1234);
        let attribute = MaterialAttributeData::new("Weird", nan).unwrap();
        assert_eq!(attribute.value::<f32>().to_bits(), 0x7fc0_1234);

        let attribute = MaterialAttributeData::new("Offset", vec3i(-1, i32::MIN, i32::MAX)).unwrap();
        assert_eq!(attribute.value::<Vector3I>(), vec3i(-1, i32::MIN, i32::MAX));

        let attribute = MaterialAttributeData::new("Size", vec2u(u32::MAX, 7)).unwrap();
        assert_eq!(attribute.value::<Vector2U>(), vec2u(u32::MAX, 7));
    }

    #[test]
    fn test_value_offsets_are_aligned() {
        for ty in MaterialAttributeType::ALL {
            assert_eq!((RECORD_SIZE - ty.size()) % ty.alignment(), 0, "{ty}");
        }

        let attribute = MaterialAttributeData::new("M", Matrix3x4::identity()).unwrap();
        let base = &attribute as *const MaterialAttributeData as usize;
        let value = attribute.value_bytes().as_ptr() as usize;
        assert_eq!(value - base, attribute.value_offset());
        assert_eq!(value % 4, 0);
    }

    #[test]
    fn test_layout() {
        let attribute = MaterialAttributeData::new("Shininess", 80.0f32).unwrap();
        let bytes = attribute.to_bytes();

        assert_eq!(bytes[0], MaterialAttributeType::Float as u8);
        assert_eq!(&bytes[1..8], &[0; 7]);
        assert_eq!(&bytes[8..17], b"Shininess");
        assert!(bytes[17..60].iter().all(|&byte| byte == 0));
        assert_eq!(&bytes[60..], &80.0f32.to_ne_bytes());
    }

    #[test]
    fn test_name_filling_the_whole_region() {
        let name = "A".repeat(USABLE_PAYLOAD_SIZE - 36);
        let attribute = MaterialAttributeData::new(&name, Matrix3x3::identity()).unwrap();
        assert_eq!(attribute.name(), name);
        assert_eq!(attribute.value::<Matrix3x3>(), Matrix3x3::identity());
    }

    #[test]
    fn test_oversized_attribute() {
        let result = MaterialAttributeData::new("TransformationMatrix", Matrix3x4::identity());
        assert_eq!(
            result,
            Err(MaterialError::OversizedAttribute {
                name: "TransformationMatrix".to_owned(),
                name_size: 20,
                value_size: 48,
            })
        );

        let name = "A".repeat(USABLE_PAYLOAD_SIZE);
        assert!(matches!(
            MaterialAttributeData::new(&name, true),
            Err(MaterialError::OversizedAttribute { value_size: 1, .. })
        ));

        let name = "A".repeat(USABLE_PAYLOAD_SIZE - 1);
        assert!(MaterialAttributeData::new(&name, true).is_ok());
    }

    #[test]
    fn test_invalid_names() {
        assert_eq!(
            MaterialAttributeData::new("", 1u32),
            Err(MaterialError::EmptyAttributeName)
        );
        assert_eq!(
            MaterialAttributeData::new("Diffuse\0Texture", 1u32),
            Err(MaterialError::AttributeNameContainsNul("Diffuse\0Texture".to_owned()))
        );
    }

    #[test]
    fn test_try_value() {
        let attribute = MaterialAttributeData::new("DiffuseTexture", 3u32).unwrap();
        assert_eq!(attribute.try_value::<u32>(), Some(3));
        assert_eq!(attribute.try_value::<i32>(), None);
        assert_eq!(attribute.try_value::<f32>(), None);
    }

    #[test]
    #[should_panic(expected = "is a UnsignedInt, not a Int")]
    fn test_value_type_mismatch() {
        MaterialAttributeData::new("DiffuseTexture", 3u32).unwrap().value::<i32>();
    }

    #[test]
    fn test_decode() {
        let attribute = MaterialAttributeData::new("TextureMatrix", Matrix3x3::identity()).unwrap();
        assert_eq!(attribute.decode(), MaterialValue::Matrix3x3(Matrix3x3::identity()));

        let value = MaterialValue::Matrix2x4(Matrix2x4::identity());
        let attribute = MaterialAttributeData::from_value("Projection", value).unwrap();
        assert_eq!(attribute.ty(), MaterialAttributeType::Matrix2x4);
        assert_eq!(attribute.decode(), value);
    }

    #[test]
    fn test_bytes_round_trip() {
        let attribute = MaterialAttributeData::new("AlphaMask", 0.5f32).unwrap();
        assert_eq!(MaterialAttributeData::from_bytes(&attribute.to_bytes()), Ok(attribute));
    }

    #[test]
    fn test_from_bytes_rejects_invalid_tags() {
        let mut bytes = MaterialAttributeData::new("AlphaMask", 0.5f32).unwrap().to_bytes();
        bytes[0] = 0;
        assert_eq!(
            MaterialAttributeData::from_bytes(&bytes),
            Err(MaterialError::InvalidAttributeType(0))
        );

        bytes[0] = 22;
        assert_eq!(
            MaterialAttributeData::from_bytes(&bytes),
            Err(MaterialError::InvalidAttributeType(22))
        );

        assert_eq!(
            MaterialAttributeData::from_bytes(&[0; RECORD_SIZE]),
            Err(MaterialError::InvalidAttributeType(0))
        );
    }

    #[test]
    fn test_from_bytes_rejects_malformed_records() {
        let valid = MaterialAttributeData::new("DoubleSided", true).unwrap().to_bytes();

        let mut bytes = valid;
        bytes[3] = 1;
        assert!(matches!(
            MaterialAttributeData::from_bytes(&bytes),
            Err(MaterialError::MalformedAttribute(_))
        ));

        let mut bytes = valid;
        bytes[TYPE_FIELD_SIZE..TYPE_FIELD_SIZE + 11].fill(0);
        assert!(matches!(
            MaterialAttributeData::from_bytes(&bytes),
            Err(MaterialError::MalformedAttribute(_))
        ));

        let mut bytes = valid;
        bytes[40] = b'x';
        assert!(matches!(
            MaterialAttributeData::from_bytes(&bytes),
            Err(MaterialError::MalformedAttribute(_))
        ));

        let mut bytes = valid;
        bytes[TYPE_FIELD_SIZE] = 0xff;
        assert!(matches!(
            MaterialAttributeData::from_bytes(&bytes),
            Err(MaterialError::MalformedAttribute(_))
        ));

        let mut bytes = valid;
        bytes[RECORD_SIZE - 1] = 2;
        assert!(matches!(
            MaterialAttributeData::from_bytes(&bytes),
            Err(MaterialError::MalformedAttribute(_))
        ));
    }

    #[test]
    fn test_serde() {
        let attribute = MaterialAttributeData::new("AmbientColor", vec4(1.0, 0.0, 0.0, 1.0)).unwrap();
        let json = serde_json::to_value(attribute).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "name": "AmbientColor", "value": { "Vector4": [1.0, 0.0, 0.0, 1.0] } })
        );

        let back: MaterialAttributeData = serde_json::from_value(json).unwrap();
        assert_eq!(back, attribute);
    }

    #[test]
    fn test_serde_rejects_oversized() {
        let json = serde_json::json!({
            "name": "TransformationMatrix",
            "value": { "Matrix3x4": [[1.0, 0.0, 0.0, 0.0], [0.0, 1.0, 0.0, 0.0], [0.0, 0.0, 1.0, 0.0]] },
        });
        assert!(serde_json::from_value::<MaterialAttributeData>(json).is_err());
    }

    #[test]
    fn test_serde_non_finite_values() {
        let payload_nan = f32::from_bits(0x7fc0_1234);
        let attributes = [
            MaterialAttributeData::new("AlphaMask", f32::NAN).unwrap(),
            MaterialAttributeData::new("Shininess", f32::INFINITY).unwrap(),
            MaterialAttributeData::new("Shininess", f32::NEG_INFINITY).unwrap(),
            MaterialAttributeData::new("Weird", payload_nan).unwrap(),
            MaterialAttributeData::new("DiffuseColor", vec4(1.0, payload_nan, 0.0, 1.0)).unwrap(),
            MaterialAttributeData::new(
                "TextureMatrix",
                Matrix3x3::new(
                    vec3(1.0, 0.0, 0.0),
                    vec3(0.0, f32::INFINITY, 0.0),
                    vec3(0.0, 0.0, 1.0),
                ),
            )
            .unwrap(),
        ];

        for attribute in attributes {
            let json = serde_json::to_string(&attribute).unwrap();
            let back: MaterialAttributeData = serde_json::from_str(&json).unwrap();
            assert_eq!(back, attribute, "{json}");
            assert_eq!(back.value_bytes(), attribute.value_bytes());
        }

        let back: MaterialAttributeData = serde_json::from_str(
            &serde_json::to_string(&MaterialAttributeData::new("Weird", payload_nan).unwrap()).unwrap(),
        )
        .unwrap();
        assert_eq!(back.value::<f32>().to_bits(), 0x7fc0_1234);
    }

    #[test]
    fn test_serde_non_finite_shape() {
        let attribute = MaterialAttributeData::new("AlphaMask", f32::NAN).unwrap();
        assert_eq!(
            serde_json::to_value(attribute).unwrap(),
            serde_json::json!({ "name": "AlphaMask", "bits": { "ty": "Float", "bits": [f32::NAN.to_bits()] } })
        );
    }

    #[test]
    fn test_serde_rejects_malformed_bits() {
        let json = serde_json::json!({ "name": "DiffuseTexture", "bits": { "ty": "UnsignedInt", "bits": [3] } });
        assert!(serde_json::from_value::<MaterialAttributeData>(json).is_err());

        let json = serde_json::json!({ "name": "DiffuseColor", "bits": { "ty": "Vector4", "bits": [0, 0, 0] } });
        assert!(serde_json::from_value::<MaterialAttributeData>(json).is_err());

        let json = serde_json::json!({ "name": "AlphaMask", "bits": { "ty": "Float", "bits": [0x7fc0_0000] } });
        let attribute: MaterialAttributeData = serde_json::from_value(json).unwrap();
        assert!(attribute.value::<f32>().is_nan());
    }
}
