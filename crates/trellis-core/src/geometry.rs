use crate::math::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Size<T> {
    pub width: T,
    pub height: T,
}

impl<T> Size<T> {
    pub const fn new(width: T, height: T) -> Self {
        Size { width, height }
    }
}

impl Size<f32> {
    pub const ZERO: Size<f32> = Size::new(0.0, 0.0);

    /// Negative (or NaN) extents become zero.
    pub fn clamped(self) -> Self {
        Size {
            width: clamp_extent(self.width),
            height: clamp_extent(self.height),
        }
    }

    /// Shrink by `amount` on every edge, never below zero.
    pub fn inset(self, amount: f32) -> Self {
        Size::new(self.width - amount * 2.0, self.height - amount * 2.0).clamped()
    }

    pub fn to_vec2(self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

fn clamp_extent(value: f32) -> f32 {
    if value > 0.0 { value } else { 0.0 }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Pos<T> {
    pub x: T,
    pub y: T,
}

impl<T> Pos<T> {
    pub const fn new(x: T, y: T) -> Self {
        Pos { x, y }
    }
}

impl Pos<f32> {
    pub const ORIGIN: Pos<f32> = Pos::new(0.0, 0.0);

    pub fn to_vec2(self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_negative_extents() {
        let size = Size::new(-5.0, 12.0).clamped();
        assert_eq!(size, Size::new(0.0, 12.0));
        assert_eq!(Size::new(f32::NAN, -1.0).clamped(), Size::ZERO);
    }

    #[test]
    fn test_inset_never_negative() {
        assert_eq!(Size::new(20.0, 10.0).inset(4.0), Size::new(12.0, 2.0));
        assert_eq!(Size::new(6.0, 6.0).inset(4.0), Size::ZERO);
    }
}
