use std::collections::BTreeMap;

use crate::foundation::core::TextureRef;

/// A single shader parameter value.
///
/// JSON accepts a bare number, a 2/3/4-element number array, or `{ "texture": "<key>" }`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// Scalar uniform.
    Number(f64),
    /// `vec2` uniform.
    Vec2([f64; 2]),
    /// `vec3` uniform.
    Vec3([f64; 3]),
    /// `vec4` uniform.
    Vec4([f64; 4]),
    /// Sampler uniform bound to a host texture.
    Texture(TextureRef),
}

impl ParamValue {
    /// Scalar value, if this is a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(v) => Some(*v),
            _ => None,
        }
    }

    /// Texture reference, if this is a sampler parameter.
    pub fn as_texture(&self) -> Option<&TextureRef> {
        match self {
            Self::Texture(t) => Some(t),
            _ => None,
        }
    }

    /// Number of float components (0 for textures).
    pub fn components(&self) -> usize {
        match self {
            Self::Number(_) => 1,
            Self::Vec2(_) => 2,
            Self::Vec3(_) => 3,
            Self::Vec4(_) => 4,
            Self::Texture(_) => 0,
        }
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<[f64; 2]> for ParamValue {
    fn from(v: [f64; 2]) -> Self {
        Self::Vec2(v)
    }
}

impl From<[f64; 3]> for ParamValue {
    fn from(v: [f64; 3]) -> Self {
        Self::Vec3(v)
    }
}

impl From<[f64; 4]> for ParamValue {
    fn from(v: [f64; 4]) -> Self {
        Self::Vec4(v)
    }
}

impl From<TextureRef> for ParamValue {
    fn from(v: TextureRef) -> Self {
        Self::Texture(v)
    }
}

/// Parameter bag keyed by uniform name. Sorted keys keep draw calls deterministic.
pub type ParamMap = BTreeMap<String, ParamValue>;

/// Overlay `layer` onto `base`; keys in `layer` win.
pub fn overlay(base: &mut ParamMap, layer: &ParamMap) {
    for (k, v) in layer {
        base.insert(k.clone(), v.clone());
    }
}

/// Texture references in `params`, in uniform-name order.
///
/// Texture units are assigned in this order, starting after the source's own unit.
pub fn texture_refs(params: &ParamMap) -> Vec<TextureRef> {
    params
        .values()
        .filter_map(ParamValue::as_texture)
        .cloned()
        .collect()
}
