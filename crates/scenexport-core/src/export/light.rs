//! KHR_lights_punctual light export

use crate::document::{self, LightType, Spot};
use crate::scene::{Light, LightKind};

/// Inner cone as a fraction of the outer cone
const INNER_CONE_RATIO: f32 = 0.8;

pub fn export_light(name: &str, light: &Light) -> document::Light {
    let color = light.color.to_array();
    let name = Some(name.to_string());

    match light.kind {
        LightKind::Spot => {
            let outer = (light.spot_angle / 2.0).to_radians();
            document::Light {
                name,
                kind: LightType::Spot,
                color,
                intensity: light.intensity,
                range: Some(light.range),
                spot: Some(Spot {
                    inner_cone_angle: outer * INNER_CONE_RATIO,
                    outer_cone_angle: outer,
                }),
            }
        }
        LightKind::Directional => document::Light {
            name,
            kind: LightType::Directional,
            color,
            intensity: light.intensity,
            range: None,
            spot: None,
        },
        LightKind::Point => document::Light {
            name,
            kind: LightType::Point,
            color,
            intensity: light.intensity,
            range: Some(light.range),
            spot: None,
        },
        // no punctual equivalent: keep the node but make the light inert
        LightKind::Area => document::Light {
            name,
            kind: LightType::Point,
            color: [0.0, 0.0, 0.0],
            intensity: 0.0,
            range: None,
            spot: None,
        },
    }
}
