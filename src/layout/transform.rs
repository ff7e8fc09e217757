//! `ViewTransform`: the pure mapping between local and surface coordinates.
//!
//! Every drawing call goes through this mapping exactly once, before the
//! rasterizer sees any coordinates. The transform is an offset plus a
//! per-axis scale:
//!
//! ```text
//! surface_x = xc + xs * local_x
//! surface_y = yc + ys * local_y
//! ```

/// Local-coordinate origin offset and scale of a drawing surface.
///
/// `xc`/`yc` place the local origin on the surface; `xs`/`ys` scale local
/// units to surface pixels. Negative scales flip the corresponding axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
    /// X coordinate of the local origin on the surface.
    pub xc: i32,
    /// Y coordinate of the local origin on the surface.
    pub yc: i32,
    /// Horizontal scale factor.
    pub xs: f32,
    /// Vertical scale factor.
    pub ys: f32,
}

impl ViewTransform {
    /// The identity mapping: origin at the surface corner, unit scale.
    pub const IDENTITY: Self = Self {
        xc: 0,
        yc: 0,
        xs: 1.0,
        ys: 1.0,
    };

    /// Create a transform from origin offset and scale.
    #[inline]
    pub const fn new(xc: i32, yc: i32, xs: f32, ys: f32) -> Self {
        Self { xc, yc, xs, ys }
    }

    /// Whether both axes share one scale factor.
    ///
    /// Circles and arcs keep their shape only under such a transform.
    #[inline]
    pub fn is_isotropic(&self) -> bool {
        (self.xs - self.ys).abs() < f32::EPSILON
    }

    /// Map a local point to surface space.
    #[inline]
    pub fn local_to_surface(&self, (x, y): (f32, f32)) -> (f32, f32) {
        (
            self.xc as f32 + self.xs * x,
            self.yc as f32 + self.ys * y,
        )
    }

    /// Map a surface point back to local space.
    ///
    /// Inverse of [`Self::local_to_surface`]; meaningful only while both
    /// scale factors are non-zero.
    #[inline]
    pub fn surface_to_local(&self, (x, y): (f32, f32)) -> (f32, f32) {
        (
            (x - self.xc as f32) / self.xs,
            (y - self.yc as f32) / self.ys,
        )
    }

    /// Scale a local extent vector to surface space (no origin offset).
    #[inline]
    pub fn scale_extent(&self, (w, h): (f32, f32)) -> (f32, f32) {
        (self.xs * w, self.ys * h)
    }

    /// Map a local rectangle (origin + extents) to a well-formed surface
    /// rectangle.
    ///
    /// The origin point and the extent vector are transformed separately; a
    /// negative transformed extent (negative input extent or negative scale)
    /// is folded back so the result has non-negative extents and the same
    /// bounding box the rectangle would cover drawn "forwards".
    pub fn rect_to_surface(&self, (x, y, w, h): (f32, f32, f32, f32)) -> (f32, f32, f32, f32) {
        let (mut ox, mut oy) = self.local_to_surface((x, y));
        let (mut ew, mut eh) = self.scale_extent((w, h));
        if ew < 0.0 {
            ox += ew;
            ew = -ew;
        }
        if eh < 0.0 {
            oy += eh;
            eh = -eh;
        }
        (ox, oy, ew, eh)
    }
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}
