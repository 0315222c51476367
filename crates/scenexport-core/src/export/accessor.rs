//! Accessor encoding: typed arrays to little-endian bytes plus bounds
//!
//! Integer streams are narrowed to the smallest component type that holds
//! every value. Vector and color streams are always 32-bit floats with
//! per-component bounds.

use crate::document::{AccessorType, component, target};
use crate::{Error, Result};
use serde_json::Value;

/// One attribute or index stream ready to be appended to the buffer
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedAccessor {
    pub component_type: u32,
    pub kind: AccessorType,
    pub count: usize,
    pub min: Vec<Value>,
    pub max: Vec<Value>,
    pub bytes: Vec<u8>,
    pub target: u32,
}

/// Encode a triangle index stream; indices never use signed types
pub fn encode_indices(indices: &[u32]) -> Result<EncodedAccessor> {
    let wide: Vec<i64> = indices.iter().map(|&i| i64::from(i)).collect();
    encode_scalars(&wide, true, "indices")
}

/// Encode a non-index integer stream
pub fn encode_ints(values: &[i32]) -> Result<EncodedAccessor> {
    let wide: Vec<i64> = values.iter().map(|&v| i64::from(v)).collect();
    encode_scalars(&wide, false, "scalar")
}

pub fn encode_vec2(values: &[[f32; 2]]) -> Result<EncodedAccessor> {
    encode_floats(values, AccessorType::Vec2, "vec2")
}

pub fn encode_vec3(values: &[[f32; 3]]) -> Result<EncodedAccessor> {
    encode_floats(values, AccessorType::Vec3, "vec3")
}

pub fn encode_vec4(values: &[[f32; 4]]) -> Result<EncodedAccessor> {
    encode_floats(values, AccessorType::Vec4, "vec4")
}

/// Colors are stored exactly like `VEC4` floats
pub fn encode_colors(values: &[[f32; 4]]) -> Result<EncodedAccessor> {
    encode_floats(values, AccessorType::Vec4, "color")
}

fn encode_scalars(values: &[i64], is_indices: bool, what: &'static str) -> Result<EncodedAccessor> {
    let (Some(&min), Some(&max)) = (values.iter().min(), values.iter().max()) else {
        return Err(Error::EmptyAccessor(what));
    };

    let fits = |lo: i64, hi: i64| min >= lo && max <= hi;

    let (component_type, bytes) = if fits(0, i64::from(u8::MAX)) {
        (component::UNSIGNED_BYTE, pack(values, |v| vec![v as u8]))
    } else if !is_indices && fits(i64::from(i8::MIN), i64::from(i8::MAX)) {
        (component::BYTE, pack(values, |v| (v as i8).to_le_bytes().to_vec()))
    } else if !is_indices && fits(i64::from(i16::MIN), i64::from(i16::MAX)) {
        (component::SHORT, pack(values, |v| (v as i16).to_le_bytes().to_vec()))
    } else if fits(0, i64::from(u16::MAX)) {
        (component::UNSIGNED_SHORT, pack(values, |v| (v as u16).to_le_bytes().to_vec()))
    } else if fits(0, i64::from(u32::MAX)) {
        (component::UNSIGNED_INT, pack(values, |v| (v as u32).to_le_bytes().to_vec()))
    } else {
        (component::FLOAT, pack(values, |v| (v as f32).to_le_bytes().to_vec()))
    };

    Ok(EncodedAccessor {
        component_type,
        kind: AccessorType::Scalar,
        count: values.len(),
        min: vec![Value::from(min)],
        max: vec![Value::from(max)],
        bytes,
        target: if is_indices {
            target::ELEMENT_ARRAY_BUFFER
        } else {
            target::ARRAY_BUFFER
        },
    })
}

fn pack(values: &[i64], write: impl Fn(i64) -> Vec<u8>) -> Vec<u8> {
    values.iter().flat_map(|&v| write(v)).collect()
}

fn encode_floats<const N: usize>(
    values: &[[f32; N]],
    kind: AccessorType,
    what: &'static str,
) -> Result<EncodedAccessor>
where
    [f32; N]: bytemuck::Pod,
{
    if values.is_empty() {
        return Err(Error::EmptyAccessor(what));
    }

    let mut min = [f32::INFINITY; N];
    let mut max = [f32::NEG_INFINITY; N];
    for value in values {
        for i in 0..N {
            min[i] = min[i].min(value[i]);
            max[i] = max[i].max(value[i]);
        }
    }

    Ok(EncodedAccessor {
        component_type: component::FLOAT,
        kind,
        count: values.len(),
        min: min.iter().map(|&v| Value::from(v)).collect(),
        max: max.iter().map(|&v| Value::from(v)).collect(),
        bytes: bytemuck::cast_slice(values).to_vec(),
        target: target::ARRAY_BUFFER,
    })
}
