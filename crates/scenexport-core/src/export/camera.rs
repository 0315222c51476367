//! Camera export from projection matrices

use crate::document::{self, CameraType, Orthographic, Perspective};
use crate::scene::Camera;
use glam::Mat4;

/// Element at `row`, `col` of a column-major matrix
fn at(m: &Mat4, row: usize, col: usize) -> f32 {
    m.col(col)[row]
}

pub fn export_camera(name: &str, camera: &Camera) -> document::Camera {
    let m = &camera.projection;

    if camera.orthographic {
        let m22 = at(m, 2, 2);
        let m23 = at(m, 2, 3);
        let zfar = m23 / m22 - 1.0 / m22;
        let znear = zfar + 2.0 / m22;

        document::Camera {
            name: Some(name.to_string()),
            kind: CameraType::Orthographic,
            perspective: None,
            orthographic: Some(Orthographic {
                xmag: 1.0 / at(m, 0, 0),
                ymag: 1.0 / at(m, 1, 1),
                zfar,
                znear,
            }),
        }
    } else {
        let m11 = at(m, 1, 1);
        let m22 = at(m, 2, 2);
        let m23 = at(m, 2, 3);

        let (znear, zfar) = if m22 == -1.0 {
            // infinite projection
            (m23 * -0.5, None)
        } else {
            let zfar = m23 / (m22 + 1.0);
            (zfar * (m22 + 1.0) / (m22 - 1.0), Some(zfar))
        };

        document::Camera {
            name: Some(name.to_string()),
            kind: CameraType::Perspective,
            perspective: Some(Perspective {
                aspect_ratio: m11 / at(m, 0, 0),
                yfov: 2.0 * (1.0 / m11).atan(),
                zfar,
                znear,
            }),
            orthographic: None,
        }
    }
}
