//! Drawing target for the particle field.

use serde::Serialize;

use crate::mood::MoodColor;

/// Straight RGB plus a 0..=1 alpha.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::rgb(0, 0, 0).with_alpha(0.0);
    /// Deep-space background.
    pub const VOID: Rgba = Rgba::rgb(0x01, 0x01, 0x02);
    pub const WHITE: Rgba = Rgba::rgb(0xFF, 0xFF, 0xFF);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    pub fn from_mood(color: &MoodColor, alpha: f32) -> Self {
        let [r, g, b] = color.rgb();
        Self {
            r,
            g,
            b,
            a: alpha.clamp(0.0, 1.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Blend {
    Normal,
    Screen,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GradientStop {
    pub offset: f32,
    pub color: Rgba,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum DrawCommand {
    Clear {
        color: Rgba,
    },
    Line {
        from: [f32; 2],
        to: [f32; 2],
        width: f32,
        color: Rgba,
    },
    Circle {
        center: [f32; 2],
        radius: f32,
        color: Rgba,
    },
    RadialGradient {
        center: [f32; 2],
        radius: f32,
        stops: Vec<GradientStop>,
        blend: Blend,
    },
}

/// Anything the field can paint on. Implementations decide what a command
/// means; the field only issues them back to front.
pub trait Surface {
    fn clear(&mut self, color: Rgba);
    fn line(&mut self, from: [f32; 2], to: [f32; 2], width: f32, color: Rgba);
    fn circle(&mut self, center: [f32; 2], radius: f32, color: Rgba);
    fn radial_gradient(&mut self, center: [f32; 2], radius: f32, stops: &[GradientStop], blend: Blend);
}

/// A surface that records commands so a frame can be shipped elsewhere.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawList {
    pub frame: u64,
    pub width: f32,
    pub height: f32,
    pub commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new(frame: u64, width: f32, height: f32) -> Self {
        Self {
            frame,
            width,
            height,
            commands: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl Surface for DrawList {
    fn clear(&mut self, color: Rgba) {
        self.commands.clear();
        self.commands.push(DrawCommand::Clear { color });
    }

    fn line(&mut self, from: [f32; 2], to: [f32; 2], width: f32, color: Rgba) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            width,
            color,
        });
    }

    fn circle(&mut self, center: [f32; 2], radius: f32, color: Rgba) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            color,
        });
    }

    fn radial_gradient(&mut self, center: [f32; 2], radius: f32, stops: &[GradientStop], blend: Blend) {
        self.commands.push(DrawCommand::RadialGradient {
            center,
            radius,
            stops: stops.to_vec(),
            blend,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_discards_previous_commands() {
        let mut list = DrawList::new(0, 10.0, 10.0);
        list.circle([1.0, 1.0], 1.0, Rgba::WHITE);
        list.clear(Rgba::VOID);
        assert_eq!(list.commands, vec![DrawCommand::Clear { color: Rgba::VOID }]);
    }

    #[test]
    fn mood_alpha_is_clamped() {
        let color = MoodColor::parse("#FF0055").unwrap();
        let rgba = Rgba::from_mood(&color, 1.7);
        assert_eq!((rgba.r, rgba.g, rgba.b, rgba.a), (0xFF, 0x00, 0x55, 1.0));
        assert_eq!(Rgba::from_mood(&color, -0.2).a, 0.0);
    }

    #[test]
    fn commands_serialize_with_op_tag() {
        let mut list = DrawList::new(3, 10.0, 10.0);
        list.line([0.0, 0.0], [1.0, 1.0], 0.5, Rgba::WHITE);
        let json = serde_json::to_value(&list).unwrap();
        assert_eq!(json["frame"], 3);
        assert_eq!(json["commands"][0]["op"], "line");
        assert_eq!(json["commands"][0]["color"]["r"], 255);
    }
}
