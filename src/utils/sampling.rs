use nalgebra as na;

/// Cached cosine and sine of equally spaced angles `i * span / divisions` for
/// `i in 0..count`.
///
/// The point generators evaluate trigonometry once per slice or stack index and then reuse
/// it for every point on that ring.
#[derive(Debug, Clone)]
pub struct AngleTable<F: na::RealField + Copy> {
    cos: Vec<F>,
    sin: Vec<F>,
}

impl<F: na::RealField + Copy> AngleTable<F> {
    /// # Panics
    /// If `divisions` is zero while `count` is not.
    pub fn new(count: usize, span: F, divisions: usize) -> Self {
        assert!(
            count == 0 || divisions > 0,
            "cannot divide an angular span into zero parts"
        );

        let (cos, sin) = (0..count)
            .map(|i| {
                let angle = span * na::convert::<f64, F>(i as f64)
                    / na::convert::<f64, F>(divisions as f64);
                (angle.cos(), angle.sin())
            })
            .unzip();

        Self { cos, sin }
    }

    /// `count` angles over the half-open turn [0, 2pi).
    pub fn full_turn(count: usize) -> Self {
        Self::new(count, F::two_pi(), count)
    }

    /// `count` angles over the closed interval [0, pi], both ends included.
    pub fn half_turn_inclusive(count: usize) -> Self {
        Self::new(count, F::pi(), count.saturating_sub(1).max(1))
    }

    pub fn len(&self) -> usize {
        self.cos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cos.is_empty()
    }

    pub fn cos(&self, i: usize) -> F {
        self.cos[i]
    }

    pub fn sin(&self, i: usize) -> F {
        self.sin[i]
    }

    /// `(cos, sin)` pairs in index order
    pub fn iter(&self) -> impl Iterator<Item = (F, F)> + '_ {
        self.cos.iter().copied().zip(self.sin.iter().copied())
    }
}
