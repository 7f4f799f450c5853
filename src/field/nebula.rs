use std::f32::consts::TAU;

use rand::Rng;

use super::surface::{Blend, GradientStop, Rgba, Surface};
use crate::mood::MoodColor;

const PHASE_STEP: f32 = 0.001;
/// Alpha of the gradient's middle stop (0x05 of 0xFF).
const MID_ALPHA: f32 = 5.0 / 255.0;

/// A huge, slow, faint cloud tinted with the mood color.
#[derive(Debug, Clone, PartialEq)]
pub struct NebulaCloud {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub vx: f32,
    pub vy: f32,
    pub opacity: f32,
    pub phase: f32,
}

impl NebulaCloud {
    pub fn spawn(rng: &mut impl Rng, width: f32, height: f32) -> Self {
        Self {
            size: rng.gen::<f32>() * width * 2.2 + width * 0.5,
            x: rng.gen::<f32>() * width,
            y: rng.gen::<f32>() * height,
            vx: (rng.gen::<f32>() - 0.5) * 0.02,
            vy: (rng.gen::<f32>() - 0.5) * 0.02,
            opacity: rng.gen_range(0.01..0.06),
            phase: rng.gen::<f32>() * TAU,
        }
    }

    pub fn update(&mut self, width: f32) {
        self.x += self.vx;
        self.y += self.vy;
        self.phase = (self.phase + PHASE_STEP) % TAU;
        if self.x < -self.size {
            self.x = width + self.size;
        }
        if self.x > width + self.size {
            self.x = -self.size;
        }
    }

    pub fn bloom(&self) -> f32 {
        self.opacity + self.phase.sin() * 0.01
    }

    pub fn draw(&self, surface: &mut dyn Surface, mood: &MoodColor) {
        let stops = [
            GradientStop {
                offset: 0.0,
                color: Rgba::from_mood(mood, self.bloom()),
            },
            GradientStop {
                offset: 0.5,
                color: Rgba::from_mood(mood, MID_ALPHA),
            },
            GradientStop {
                offset: 1.0,
                color: Rgba::TRANSPARENT,
            },
        ];
        surface.radial_gradient([self.x, self.y], self.size, &stops, Blend::Screen);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn clouds_are_viewport_scale() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let cloud = NebulaCloud::spawn(&mut rng, 1000.0, 800.0);
            assert!((500.0..=2700.0).contains(&cloud.size));
            assert!(cloud.vx.abs() <= 0.01);
            assert!((0.01..0.06).contains(&cloud.opacity));
        }
    }

    #[test]
    fn cloud_wraps_horizontally() {
        let mut cloud = NebulaCloud {
            x: -600.0,
            y: 0.0,
            size: 500.0,
            vx: -0.01,
            vy: 0.0,
            opacity: 0.03,
            phase: 0.0,
        };
        cloud.update(1000.0);
        assert_eq!(cloud.x, 1500.0);
    }

    #[test]
    fn phase_stays_within_one_turn() {
        let mut cloud = NebulaCloud {
            x: 0.0,
            y: 0.0,
            size: 500.0,
            vx: 0.0,
            vy: 0.0,
            opacity: 0.03,
            phase: TAU - 0.0005,
        };
        cloud.update(1000.0);
        assert!(cloud.phase >= 0.0 && cloud.phase < TAU);
        assert!((cloud.phase - 0.0005).abs() < 1e-4);
    }
}
