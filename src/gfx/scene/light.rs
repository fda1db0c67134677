/// Single point light used by the model shader.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub position: [f32; 3],
    pub color: [f32; 3],
    /// Fraction of `color` applied regardless of surface orientation
    pub ambient_strength: f32,
}

impl Default for Light {
    fn default() -> Self {
        Self {
            position: [2.0, 4.0, 3.0],
            color: [1.0, 1.0, 1.0],
            ambient_strength: 0.15,
        }
    }
}
