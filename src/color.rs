use std::collections::BTreeMap;

use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Srgb<u8>> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            rgb.into_format()
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Console roles
// ---------------------------------------------------------------------------

/// What a piece of console text is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// What the user types at a prompt.
    Answer,
    Status,
    Success,
    Error,
}

impl Role {
    fn color(self) -> Srgb<u8> {
        match self {
            Role::Answer | Role::Success => Srgb::new(80, 200, 120),
            Role::Status => Srgb::new(90, 140, 240),
            Role::Error => Srgb::new(230, 70, 70),
        }
    }
}

const RESET: &str = "\x1b[0m";

fn escape(color: Srgb<u8>) -> String {
    format!("\x1b[38;2;{};{};{}m", color.red, color.green, color.blue)
}

/// Wraps text in 24-bit ANSI colour escapes, or passes it through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Painter {
    pub enabled: bool,
}

impl Painter {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn paint(&self, color: Srgb<u8>, text: &str) -> String {
        if !self.enabled {
            return text.to_string();
        }
        format!("{}{text}{RESET}", escape(color))
    }

    /// Switch the terminal to `role`'s colour until [`Painter::reset`].
    pub fn start(&self, role: Role) -> String {
        if self.enabled {
            escape(role.color())
        } else {
            String::new()
        }
    }

    pub fn reset(&self) -> &'static str {
        if self.enabled { RESET } else { "" }
    }

    pub fn role(&self, role: Role, text: &str) -> String {
        self.paint(role.color(), text)
    }
}

// ---------------------------------------------------------------------------
// Color mapping: class label → colour
// ---------------------------------------------------------------------------

/// Maps each class label to a distinct colour.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<String, Srgb<u8>>,
    default_color: Srgb<u8>,
}

impl ColorMap {
    /// Build a colour map from the labels in category order.
    pub fn new(labels: &[String]) -> Self {
        let palette = generate_palette(labels.len());
        let mapping = labels.iter().cloned().zip(palette).collect();

        ColorMap {
            mapping,
            default_color: Srgb::new(200, 80, 200),
        }
    }

    /// Look up the colour for a given label.
    pub fn color_for(&self, label: &str) -> Srgb<u8> {
        self.mapping
            .get(label)
            .copied()
            .unwrap_or(self.default_color)
    }
}
