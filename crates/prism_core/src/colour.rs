//! 8-bit display colours assigned to spectrum channels.

/// An sRGB display colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Colour {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Colour {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const RED: Colour = Colour::new(255, 0, 0);
    pub const ORANGE: Colour = Colour::new(255, 128, 0);
    pub const YELLOW: Colour = Colour::new(255, 255, 0);
    pub const GREEN: Colour = Colour::new(0, 255, 0);
    pub const CYAN: Colour = Colour::new(0, 255, 255);
    pub const BLUE: Colour = Colour::new(0, 0, 255);
    pub const INDIGO: Colour = Colour::new(76, 0, 130);
    pub const VIOLET: Colour = Colour::new(127, 0, 255);
    pub const WHITE: Colour = Colour::new(255, 255, 255);
    pub const BLACK: Colour = Colour::new(0, 0, 0);

    /// Components as floats in [0, 1].
    pub fn to_unit(self) -> [f32; 3] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        ]
    }
}
