//! # Room Builder
//!
//! The fixed room the furniture is placed in: a floor slab and two walls.
//! The front and right sides stay open so the default camera looks in.

use cgmath::Vector3;
use serde::{Deserialize, Serialize};

/// Thickness of the floor slab
pub const FLOOR_THICKNESS: f32 = 5.0;
/// Thickness of both walls
pub const WALL_THICKNESS: f32 = 10.0;
/// Height of the floor's top surface
pub const FLOOR_LEVEL: f32 = 0.0;
/// Name of the floor node, the hit target placement follows
pub const FLOOR_NAME: &str = "floor";

pub const FLOOR_COLOR: u32 = 0xCFB997;
pub const WALL_COLOR: u32 = 0xF0F0F0;

/// Converts a `0xRRGGBB` colour to opaque RGBA floats
pub fn hex_color(rgb: u32) -> [f32; 4] {
    let channel = |shift: u32| ((rgb >> shift) & 0xFF) as f32 / 255.0;
    [channel(16), channel(8), channel(0), 1.0]
}

/// Interior dimensions of the room, in scene units (cm)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomDimensions {
    pub width: f32,
    pub depth: f32,
    pub height: f32,
}

impl Default for RoomDimensions {
    fn default() -> Self {
        Self {
            width: 500.0,
            depth: 400.0,
            height: 250.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomPart {
    Floor,
    BackWall,
    LeftWall,
}

/// A static box of the room
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoomVolume {
    pub part: RoomPart,
    pub name: &'static str,
    pub size: Vector3<f32>,
    pub center: Vector3<f32>,
    pub color: [f32; 4],
}

/// Immutable room geometry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Room {
    dimensions: RoomDimensions,
}

impl Room {
    pub fn new(dimensions: RoomDimensions) -> Self {
        Self { dimensions }
    }

    pub fn dimensions(&self) -> RoomDimensions {
        self.dimensions
    }

    /// Floor, back wall and left wall, in that order
    pub fn volumes(&self) -> [RoomVolume; 3] {
        let RoomDimensions {
            width,
            depth,
            height,
        } = self.dimensions;

        [
            RoomVolume {
                part: RoomPart::Floor,
                name: FLOOR_NAME,
                size: Vector3::new(width, FLOOR_THICKNESS, depth),
                center: Vector3::new(0.0, FLOOR_LEVEL - FLOOR_THICKNESS / 2.0, 0.0),
                color: hex_color(FLOOR_COLOR),
            },
            RoomVolume {
                part: RoomPart::BackWall,
                name: "back_wall",
                size: Vector3::new(width + WALL_THICKNESS, height, WALL_THICKNESS),
                center: Vector3::new(0.0, height / 2.0, -depth / 2.0),
                color: hex_color(WALL_COLOR),
            },
            RoomVolume {
                part: RoomPart::LeftWall,
                name: "left_wall",
                size: Vector3::new(WALL_THICKNESS, height, depth + WALL_THICKNESS),
                center: Vector3::new(-width / 2.0, height / 2.0, 0.0),
                color: hex_color(WALL_COLOR),
            },
        ]
    }

    /// Point the camera orbits: the centre of the room at half height
    pub fn orbit_target(&self) -> Vector3<f32> {
        Vector3::new(0.0, self.dimensions.height / 2.0, 0.0)
    }

    /// Default eye position looking into the open corner
    pub fn default_eye(&self) -> Vector3<f32> {
        Vector3::new(0.0, self.dimensions.height * 1.5, self.dimensions.depth * 1.5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_floor_top_at_reference_height() {
        let room = Room::new(RoomDimensions::default());
        let [floor, _, _] = room.volumes();

        assert_eq!(floor.name, FLOOR_NAME);
        assert_eq!(floor.center.y + floor.size.y / 2.0, FLOOR_LEVEL);
        assert_eq!(floor.size.x, 500.0);
        assert_eq!(floor.size.z, 400.0);
    }

    #[test]
    fn test_walls_bound_two_sides() {
        let room = Room::new(RoomDimensions::default());
        let [_, back, left] = room.volumes();

        assert_eq!(back.center, Vector3::new(0.0, 125.0, -200.0));
        assert_eq!(back.size, Vector3::new(510.0, 250.0, 10.0));
        assert_eq!(left.center, Vector3::new(-250.0, 125.0, 0.0));
        assert_eq!(left.size, Vector3::new(10.0, 250.0, 410.0));
    }

    #[test]
    fn test_hex_color() {
        assert_eq!(hex_color(0xFF0000), [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(hex_color(0x0000FF), [0.0, 0.0, 1.0, 1.0]);
    }
}
