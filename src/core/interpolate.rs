/// Clamped piecewise-linear interpolation across `N` stops
///
/// `input` must be strictly increasing. Values outside the input domain
/// clamp to the first/last output; there is no extrapolation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interpolation<const N: usize> {
    input: [f64; N],
    output: [f64; N],
}

impl<const N: usize> Interpolation<N> {
    /// Create an interpolation from matching input and output stops
    ///
    /// Returns `None` if fewer than two stops are given, if any stop is not
    /// finite, or if the input domain is not strictly increasing.
    pub fn new(input: [f64; N], output: [f64; N]) -> Option<Self> {
        if N < 2 {
            return None;
        }
        if input.iter().chain(output.iter()).any(|v| !v.is_finite()) {
            return None;
        }
        if input.windows(2).any(|pair| pair[0] >= pair[1]) {
            return None;
        }
        Some(Self { input, output })
    }

    /// Evaluate at `x`; NaN evaluates as 0
    pub fn at(&self, x: f64) -> f64 {
        let x = if x.is_nan() { 0.0 } else { x };

        if x <= self.input[0] {
            return self.output[0];
        }
        if x >= self.input[N - 1] {
            return self.output[N - 1];
        }

        // Find the segment containing x
        let segment = self
            .input
            .windows(2)
            .position(|pair| x <= pair[1])
            .unwrap_or(N.saturating_sub(2));

        let (x0, x1) = (self.input[segment], self.input[segment + 1]);
        let (y0, y1) = (self.output[segment], self.output[segment + 1]);
        let t = (x - x0) / (x1 - x0);

        y0 + (y1 - y0) * t
    }
}
