//! Coordinate spaces used by the mask and sampling pipelines.
//!
//! Three pixel grids are in play at once:
//!
//! - [`Display`]: on-screen pixels, after zoom
//! - [`Surface`]: the paint surface, sized to the image's layout box
//! - [`Native`]: the source image's natural pixel grid
//!
//! Points are tagged with their space so that a display-space pointer
//! position cannot be handed to the rasterizer without going through a
//! [`ScaleFactor`].

use std::fmt;
use std::marker::PhantomData;

/// On-screen pixels (pointer events).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Display {}

/// Paint surface pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {}

/// Source image pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Native {}

/// A point in coordinate space `S`.
pub struct Point<S> {
    pub x: f32,
    pub y: f32,
    _space: PhantomData<S>,
}

impl<S> Point<S> {
    pub const fn new(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            _space: PhantomData,
        }
    }

    /// Euclidean distance to another point in the same space
    pub fn distance(self, other: Self) -> f32 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Linear interpolation; `t = 0` is `self`, `t = 1` is `other`
    pub fn lerp(self, other: Self, t: f32) -> Self {
        Self::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }
}

// Manual impls: derives would require `S: Clone` etc. on the marker type
impl<S> Clone for Point<S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S> Copy for Point<S> {}

impl<S> PartialEq for Point<S> {
    fn eq(&self, other: &Self) -> bool {
        self.x == other.x && self.y == other.y
    }
}

impl<S> fmt::Debug for Point<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Integer pixel dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl std::str::FromStr for Size {
    type Err = String;

    /// Parse `WIDTHxHEIGHT`, e.g. `1024x768`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (w, h) = s
            .split_once(['x', 'X'])
            .ok_or_else(|| format!("expected WIDTHxHEIGHT, got {s:?}"))?;
        let width = w.trim().parse().map_err(|e| format!("bad width {w:?}: {e}"))?;
        let height = h.trim().parse().map_err(|e| format!("bad height {h:?}: {e}"))?;
        Ok(Self { width, height })
    }
}

/// Per-axis scale from space `From` to space `To`.
pub struct ScaleFactor<From, To> {
    pub x: f32,
    pub y: f32,
    _spaces: PhantomData<(From, To)>,
}

impl<From, To> ScaleFactor<From, To> {
    pub const fn new(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            _spaces: PhantomData,
        }
    }

    /// Uniform scale on both axes
    pub const fn uniform(s: f32) -> Self {
        Self::new(s, s)
    }

    /// Scale that maps a grid of `from` pixels onto a grid of `to` pixels.
    ///
    /// An empty `from` size yields an identity scale.
    pub fn between(from: Size, to: Size) -> Self {
        if from.is_empty() {
            return Self::uniform(1.0);
        }
        Self::new(
            to.width as f32 / from.width as f32,
            to.height as f32 / from.height as f32,
        )
    }

    pub fn apply(&self, p: Point<From>) -> Point<To> {
        Point::new(p.x * self.x, p.y * self.y)
    }

    /// Scale a length (brush radius). Uses the mean of both axes, which is
    /// exact for the aspect-preserving scales produced by zooming.
    pub fn apply_length(&self, length: f32) -> f32 {
        length * (self.x + self.y) / 2.0
    }

    pub fn inverse(&self) -> ScaleFactor<To, From> {
        ScaleFactor::new(1.0 / self.x, 1.0 / self.y)
    }
}

impl<From, To> Clone for ScaleFactor<From, To> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<From, To> Copy for ScaleFactor<From, To> {}

impl<From, To> fmt::Debug for ScaleFactor<From, To> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ScaleFactor({}, {})", self.x, self.y)
    }
}

impl ScaleFactor<Display, Surface> {
    /// Display-to-surface scale for an image shown at `zoom` (1.0 = 100%).
    pub fn from_zoom(zoom: f32) -> Self {
        Self::uniform(1.0 / zoom)
    }
}
