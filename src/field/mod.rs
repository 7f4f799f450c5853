//! Ambient particle field behind every screen: a warp-speed star field, a
//! few mood-tinted nebula clouds and a layer of drifting dust.

pub mod dust;
pub mod nebula;
pub mod runner;
pub mod star;
pub mod surface;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::config::FieldConfig;
use crate::mood::MoodColor;

use dust::Dust;
use nebula::NebulaCloud;
use star::{Star, STAR_SPEED};
use surface::{DrawList, Rgba, Surface};

/// Viewports narrower than this get the reduced populations.
pub const NARROW_VIEWPORT: f32 = 768.0;

pub const CLOUD_COUNT: usize = 18;

pub fn star_count(width: f32) -> usize {
    if width < NARROW_VIEWPORT {
        500
    } else {
        1500
    }
}

pub fn dust_count(width: f32) -> usize {
    if width < NARROW_VIEWPORT {
        1500
    } else {
        4500
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

pub struct ParticleField {
    viewport: Viewport,
    rng: StdRng,
    stars: Vec<Star>,
    clouds: Vec<NebulaCloud>,
    dust: Vec<Dust>,
    frame: u64,
}

impl std::fmt::Debug for ParticleField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParticleField")
            .field("viewport", &self.viewport)
            .field("stars", &self.stars.len())
            .field("clouds", &self.clouds.len())
            .field("dust", &self.dust.len())
            .field("frame", &self.frame)
            .finish()
    }
}

impl ParticleField {
    /// Populations are sized from the initial viewport and stay fixed.
    pub fn new(config: &FieldConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(
            Viewport {
                width: config.width,
                height: config.height,
            },
            rng,
        )
    }

    pub fn with_rng(viewport: Viewport, mut rng: StdRng) -> Self {
        let Viewport { width, height } = viewport;
        let stars = (0..star_count(width))
            .map(|_| Star::spawn(&mut rng, width, height, true))
            .collect();
        let clouds = (0..CLOUD_COUNT)
            .map(|_| NebulaCloud::spawn(&mut rng, width, height))
            .collect();
        let dust = (0..dust_count(width))
            .map(|_| Dust::spawn(&mut rng, width, height))
            .collect();
        Self {
            viewport,
            rng,
            stars,
            clouds,
            dust,
            frame: 0,
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn frame_number(&self) -> u64 {
        self.frame
    }

    pub fn populations(&self) -> (usize, usize, usize) {
        (self.stars.len(), self.clouds.len(), self.dust.len())
    }

    /// Takes effect on the next frame; particles outside the new bounds wrap
    /// or respawn as they update.
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Advances and paints one frame. Without a surface nothing happens.
    pub fn render(&mut self, surface: Option<&mut dyn Surface>, mood: &MoodColor) {
        let Some(surface) = surface else {
            return;
        };
        let Viewport { width, height } = self.viewport;
        self.frame += 1;

        surface.clear(Rgba::VOID);
        for cloud in &mut self.clouds {
            cloud.update(width);
            cloud.draw(surface, mood);
        }
        for mote in &mut self.dust {
            mote.update(width, height);
            mote.draw(surface, mood);
        }
        for star in &mut self.stars {
            star.update(&mut self.rng, STAR_SPEED, width, height);
            star.draw(surface, width, height);
        }
    }

    /// Renders the next frame into a fresh [`DrawList`].
    pub fn frame(&mut self, mood: &MoodColor) -> DrawList {
        let Viewport { width, height } = self.viewport;
        let mut list = DrawList::new(self.frame + 1, width, height);
        self.render(Some(&mut list), mood);
        list
    }
}
