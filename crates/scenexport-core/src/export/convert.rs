//! Source (left-handed, Y-up, +Z forward) to glTF (right-handed, Y-up) conversion

use crate::document::Node;
use crate::scene::Transform;
use glam::{Quat, Vec2, Vec3, Vec4};

pub fn position(v: Vec3) -> [f32; 3] {
    [-v.x, v.y, v.z]
}

/// Positions and normals share the same mirror
pub fn vectors(values: &[Vec3]) -> Vec<[f32; 3]> {
    values.iter().map(|&v| position(v)).collect()
}

/// Tangents mirror X and flip handedness in W
pub fn tangents(values: &[Vec4]) -> Vec<[f32; 4]> {
    values.iter().map(|t| [-t.x, t.y, t.z, -t.w]).collect()
}

pub fn tex_coords(values: &[Vec2]) -> Vec<[f32; 2]> {
    values.iter().map(|uv| [uv.x, 1.0 - uv.y]).collect()
}

/// Reverse triangle winding by swapping the first and third corner
pub fn flip_faces(triangles: &[u32]) -> Vec<u32> {
    triangles
        .chunks_exact(3)
        .flat_map(|tri| [tri[2], tri[1], tri[0]])
        .collect()
}

pub fn rotation(q: Quat) -> [f32; 4] {
    [q.x, -q.y, -q.z, q.w]
}

/// Half turn about the up axis applied to light nodes only
fn light_forward_flip() -> Quat {
    Quat::from_xyzw(0.0, -1.0, 0.0, 0.0)
}

/// Transform a light node is exported with; the entity itself is unchanged
pub fn light_corrected(transform: &Transform) -> Transform {
    Transform {
        rotation: transform.rotation * light_forward_flip(),
        ..*transform
    }
}

/// Write TRS onto a node, omitting identity components
pub fn apply_transform(node: &mut Node, transform: &Transform) {
    node.translation = (transform.translation != Vec3::ZERO).then(|| position(transform.translation));
    node.rotation = (transform.rotation != Quat::IDENTITY).then(|| rotation(transform.rotation));
    node.scale = (transform.scale != Vec3::ONE).then(|| transform.scale.to_array());
}
