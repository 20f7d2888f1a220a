use std::fmt::Debug;

use ndarray::Array1;
use num_traits::Float;

/// Evenly spaced values `j * step`, where `j` runs over the indices of a dimension with `steps`
/// points, either in natural order or in FFT output order.
///
/// In FFT output order the non-negative indices come first, followed by the negative indices
/// counting up towards zero, which matches the bin layout of a discrete Fourier transform:
/// `[0, 1, .., n - 1, -(steps - n), .., -1]` with `n = (steps - 1) / 2 + 1`.
///
#[derive(Clone, Debug, PartialEq)]
pub struct LinearRange<N>
where
    N: Float + Debug,
{
    pub step: N,
    pub steps: usize,
    pub fft_output_order: bool,
}

impl<N> LinearRange<N>
where
    N: Float + Debug,
{
    pub fn new(step: N, steps: usize, fft_output_order: bool) -> Self {
        Self {
            step,
            steps,
            fft_output_order,
        }
    }

    /// The signed index at position `index`.
    pub fn index(&self, index: usize) -> isize {
        self.check_bounds(index);
        let index = index as isize;
        if self.fft_output_order && index >= self.nonnegative() as isize {
            index - self.steps as isize
        } else {
            index
        }
    }

    pub fn get(&self, index: usize) -> N {
        N::from(self.index(index)).unwrap() * self.step
    }

    pub fn values(&self) -> Array1<N> {
        Array1::from_iter((0..self.steps).map(|i| self.get(i)))
    }

    pub fn len(&self) -> usize {
        self.steps
    }

    pub fn shape(&self) -> [usize; 1] {
        [self.steps]
    }

    /// Number of non-negative indices in FFT output order.
    fn nonnegative(&self) -> usize {
        match self.steps {
            0 => 0,
            steps => (steps - 1) / 2 + 1,
        }
    }

    pub fn check_bounds(&self, index: usize) {
        if index >= self.steps {
            panic!(
                "Out of bounds: index {index} is out of bounds for range with length {}",
                self.steps
            );
        }
    }
}
