use rand::Rng;

use super::surface::{Rgba, Surface};

/// Depth units a star travels toward the viewer per frame.
pub const STAR_SPEED: f32 = 0.6;

/// A star flying toward the viewer, drawn as a streak between its last and
/// current projected positions.
#[derive(Debug, Clone, PartialEq)]
pub struct Star {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub pz: f32,
    pub size: f32,
    pub brightness: f32,
}

impl Star {
    /// A star anywhere in the depth range when `initial`, otherwise at the
    /// far plane.
    pub fn spawn(rng: &mut impl Rng, width: f32, height: f32, initial: bool) -> Self {
        let far = width.max(1.0);
        let z = if initial { rng.gen_range(1.0..=far) } else { far };
        Self {
            x: (rng.gen::<f32>() - 0.5) * width * 10.0,
            y: (rng.gen::<f32>() - 0.5) * height * 10.0,
            z,
            pz: z,
            size: rng.gen_range(0.1..1.1),
            brightness: rng.gen_range(0.2..1.0),
        }
    }

    pub fn update(&mut self, rng: &mut impl Rng, speed: f32, width: f32, height: f32) {
        self.pz = self.z;
        self.z -= speed;
        if self.z < 1.0 {
            *self = Self::spawn(rng, width, height, false);
        }
    }

    pub fn project(&self, z: f32, width: f32, height: f32) -> [f32; 2] {
        [
            self.x / z * (width / 2.0) + width / 2.0,
            self.y / z * (height / 2.0) + height / 2.0,
        ]
    }

    /// Closer stars are brighter and wider.
    pub fn nearness(&self, width: f32) -> f32 {
        1.0 - self.z / width.max(1.0)
    }

    pub fn draw(&self, surface: &mut dyn Surface, width: f32, height: f32) {
        let near = self.nearness(width);
        let alpha = near.min(1.0) * self.brightness * 0.6;
        surface.line(
            self.project(self.pz, width, height),
            self.project(self.z, width, height),
            (near * 1.2).max(0.0),
            Rgba::WHITE.with_alpha(alpha.clamp(0.0, 1.0)),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::surface::{DrawCommand, DrawList};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn star_moves_toward_viewer() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut star = Star::spawn(&mut rng, 800.0, 600.0, false);
        star.update(&mut rng, STAR_SPEED, 800.0, 600.0);
        assert_eq!(star.pz, 800.0);
        assert!((star.z - 799.4).abs() < 1e-3);
    }

    #[test]
    fn star_respawns_at_far_plane() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut star = Star::spawn(&mut rng, 800.0, 600.0, true);
        star.z = 1.2;
        star.update(&mut rng, STAR_SPEED, 800.0, 600.0);
        assert_eq!(star.z, 800.0);
        assert_eq!(star.pz, star.z);
    }

    #[test]
    fn projection_centres_on_axis() {
        let star = Star {
            x: 0.0,
            y: 0.0,
            z: 10.0,
            pz: 10.0,
            size: 1.0,
            brightness: 1.0,
        };
        assert_eq!(star.project(10.0, 800.0, 600.0), [400.0, 300.0]);
    }

    #[test]
    fn distant_star_is_invisible() {
        let star = Star {
            x: 5.0,
            y: 5.0,
            z: 800.0,
            pz: 800.0,
            size: 1.0,
            brightness: 1.0,
        };
        let mut list = DrawList::new(0, 800.0, 600.0);
        star.draw(&mut list, 800.0, 600.0);
        let DrawCommand::Line { width, color, .. } = &list.commands[0] else {
            panic!("star should draw a line");
        };
        assert_eq!(*width, 0.0);
        assert_eq!(color.a, 0.0);
    }
}
