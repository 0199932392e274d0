//! A box in RGB space holding a sub-population of colors.

use crate::color::Rgb;

/// Sub-population of colors plus its per-channel bounds.
#[derive(Debug, Clone)]
pub(crate) struct ColorBox {
    colors: Vec<Rgb>,
    min: [u8; 3],
    max: [u8; 3],
}

impl ColorBox {
    pub(crate) fn new(colors: Vec<Rgb>) -> Self {
        let mut min = [255u8; 3];
        let mut max = [0u8; 3];

        for c in &colors {
            for (channel, v) in c.to_array().into_iter().enumerate() {
                min[channel] = min[channel].min(v);
                max[channel] = max[channel].max(v);
            }
        }

        Self { colors, min, max }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.colors.len()
    }

    /// Range of each channel (max - min). Empty boxes report zero.
    fn ranges(&self) -> [u8; 3] {
        if self.colors.is_empty() {
            return [0; 3];
        }
        [
            self.max[0] - self.min[0],
            self.max[1] - self.min[1],
            self.max[2] - self.min[2],
        ]
    }

    /// Largest single-channel range.
    pub(crate) fn widest_range(&self) -> u8 {
        let [r, g, b] = self.ranges();
        r.max(g).max(b)
    }

    /// Channel to split along: red wins ties, then green.
    fn split_axis(&self) -> usize {
        let [r, g, b] = self.ranges();
        if r >= g && r >= b {
            0
        } else if g >= b {
            1
        } else {
            2
        }
    }

    /// Sort along the widest axis and cut at the median index.
    ///
    /// The lower half is returned first. Callers only split boxes with at
    /// least two members, so both halves are non-empty.
    pub(crate) fn split(mut self) -> (ColorBox, ColorBox) {
        debug_assert!(self.colors.len() >= 2, "cannot split a box with < 2 colors");

        let axis = self.split_axis();
        // Stable sort keeps equal keys in population order
        self.colors.sort_by_key(|c| c.to_array()[axis]);

        let upper = self.colors.split_off(self.colors.len() / 2);
        (ColorBox::new(self.colors), ColorBox::new(upper))
    }

    /// Per-channel arithmetic mean, rounded to nearest.
    pub(crate) fn average(&self) -> Rgb {
        let n = self.colors.len() as f64;
        let mut sum = [0u64; 3];
        for c in &self.colors {
            sum[0] += c.r as u64;
            sum[1] += c.g as u64;
            sum[2] += c.b as u64;
        }
        Rgb::from_f64(sum[0] as f64 / n, sum[1] as f64 / n, sum[2] as f64 / n)
    }
}
