/// SIMD-accelerated vector types from [`glam`], used for absolute positions
/// in paint output.
///
/// ```
/// use trellis_core::math::Vec2;
///
/// let origin = Vec2::new(10.0, 20.0);
/// let child = origin + Vec2::new(4.0, 4.0);
/// assert_eq!(child, Vec2::new(14.0, 24.0));
/// ```
///
/// [`glam`]: https://docs.rs/glam
pub mod fast {
    pub use glam::*;
}

pub use fast::Vec2;
