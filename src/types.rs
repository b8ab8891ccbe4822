use std::ops::Index;

use serde::Serialize;

use crate::alignment::length::LengthSummary;
use crate::error::AlignmentError;

/// Encoder outputs for one sentence, padded to the token capacity.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenSequence {
    pub log_duration: Vec<f32>,
    /// 1.0 for real tokens, 0.0 for padding.
    pub validity: Vec<f32>,
}

impl TokenSequence {
    pub fn new(log_duration: Vec<f32>, validity: Vec<f32>) -> Result<Self, AlignmentError> {
        if log_duration.len() != validity.len() {
            return Err(AlignmentError::invalid_input(format!(
                "log_duration has {} slots but validity has {}",
                log_duration.len(),
                validity.len()
            )));
        }
        Ok(Self {
            log_duration,
            validity,
        })
    }

    /// Marks every given token as real and pads to `capacity` with invalid slots.
    pub fn padded(real_log_duration: &[f32], capacity: usize) -> Result<Self, AlignmentError> {
        if real_log_duration.len() > capacity {
            return Err(AlignmentError::invalid_input(format!(
                "{} tokens exceed token capacity {capacity}",
                real_log_duration.len()
            )));
        }
        let mut log_duration = real_log_duration.to_vec();
        log_duration.resize(capacity, 0.0);
        let mut validity = vec![1.0f32; real_log_duration.len()];
        validity.resize(capacity, 0.0);
        Ok(Self {
            log_duration,
            validity,
        })
    }

    pub fn len(&self) -> usize {
        self.log_duration.len()
    }

    pub fn is_empty(&self) -> bool {
        self.log_duration.is_empty()
    }

    pub fn real_token_count(&self) -> usize {
        self.validity.iter().filter(|&&v| v != 0.0).count()
    }
}

/// Row-major 2D storage with checked `(row, col)` indexing.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid<T> {
    rows: usize,
    cols: usize,
    data: Vec<T>,
}

impl<T: Copy> Grid<T> {
    pub fn filled(rows: usize, cols: usize, value: T) -> Self {
        Self {
            rows,
            cols,
            data: vec![value; rows * cols],
        }
    }

    pub fn from_fn(rows: usize, cols: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut data = Vec::with_capacity(rows * cols);
        for i in 0..rows {
            for j in 0..cols {
                data.push(f(i, j));
            }
        }
        Self { rows, cols, data }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> Option<T> {
        if row < self.rows && col < self.cols {
            Some(self.data[row * self.cols + col])
        } else {
            None
        }
    }

    pub fn row(&self, row: usize) -> Option<&[T]> {
        if row < self.rows {
            Some(&self.data[row * self.cols..(row + 1) * self.cols])
        } else {
            None
        }
    }

    pub fn column(&self, col: usize) -> impl Iterator<Item = T> + '_ {
        let rows = if col < self.cols { self.rows } else { 0 };
        (0..rows).map(move |i| self.data[i * self.cols + col])
    }

    pub fn transpose(&self) -> Self {
        Self::from_fn(self.cols, self.rows, |i, j| self[(j, i)])
    }

    /// Elementwise combination of two grids. Callers check the shapes match.
    pub(crate) fn zip_map<U: Copy, V: Copy>(
        &self,
        other: &Grid<U>,
        mut f: impl FnMut(T, U) -> V,
    ) -> Grid<V> {
        debug_assert_eq!(
            (self.rows, self.cols),
            (other.rows, other.cols),
            "zip_map on grids of different shape"
        );
        Grid {
            rows: self.rows,
            cols: self.cols,
            data: self
                .data
                .iter()
                .zip(&other.data)
                .map(|(&a, &b)| f(a, b))
                .collect(),
        }
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }
}

impl<T> Index<(usize, usize)> for Grid<T> {
    type Output = T;

    fn index(&self, (row, col): (usize, usize)) -> &T {
        assert!(
            row < self.rows && col < self.cols,
            "grid index ({row}, {col}) out of bounds for {}x{}",
            self.rows,
            self.cols
        );
        &self.data[row * self.cols + col]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpansionStatus {
    /// Every in-range frame belongs to exactly one token.
    Complete,
    /// Total duration exceeded the frame capacity; the reported length was
    /// clamped and some in-range frames may be unassigned.
    CapacityOverflow,
    /// No valid tokens; a single in-range frame with an all-zero row.
    Degenerate,
}

impl ExpansionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Complete => "complete",
            Self::CapacityOverflow => "capacity_overflow",
            Self::Degenerate => "degenerate",
        }
    }
}

/// Everything the expansion produced for one request.
///
/// `path` is token-major (`L_max × F_max`); `alignment` is frame-major
/// (`F_max × L_max`), the layout the decoder reads.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignmentOutput {
    /// Slots with `validity == 1`.
    pub real_token_count: usize,
    pub duration: Vec<f32>,
    pub lengths: LengthSummary,
    pub output_mask: Vec<f32>,
    pub path: Grid<u8>,
    pub alignment: Grid<f32>,
}

impl AlignmentOutput {
    pub fn status(&self) -> ExpansionStatus {
        if self.lengths.overflow {
            ExpansionStatus::CapacityOverflow
        } else if self.real_token_count == 0 {
            ExpansionStatus::Degenerate
        } else {
            ExpansionStatus::Complete
        }
    }

    /// Number of real frames the decoder should keep.
    pub fn frame_count(&self) -> usize {
        self.lengths.total_length_clamped
    }

    /// Real waveform samples in the decoder output for this request.
    pub fn audio_sample_count(&self, samples_per_frame: usize) -> usize {
        self.frame_count() * samples_per_frame
    }

    pub fn audio_duration_ms(&self, samples_per_frame: usize, sample_rate_hz: u32) -> f64 {
        if sample_rate_hz == 0 {
            return 0.0;
        }
        self.audio_sample_count(samples_per_frame) as f64 / sample_rate_hz as f64 * 1000.0
    }

    /// Token owning frame `frame`, if any.
    pub fn frame_owner(&self, frame: usize) -> Option<usize> {
        self.alignment
            .row(frame)?
            .iter()
            .position(|&v| v != 0.0)
    }

    /// In-range frames that no token owns.
    pub fn orphaned_frames(&self) -> usize {
        (0..self.frame_count())
            .filter(|&j| self.frame_owner(j).is_none())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn padded_sequence_marks_real_tokens() {
        let seq = TokenSequence::padded(&[0.5, 1.0], 4).unwrap();
        assert_eq!(seq.log_duration, vec![0.5, 1.0, 0.0, 0.0]);
        assert_eq!(seq.validity, vec![1.0, 1.0, 0.0, 0.0]);
        assert_eq!(seq.real_token_count(), 2);
        assert_eq!(seq.len(), 4);
    }

    #[test]
    fn padded_sequence_rejects_overlong_input() {
        let result = TokenSequence::padded(&[0.0; 5], 4);
        assert!(matches!(result, Err(AlignmentError::InvalidInput { .. })));
    }

    #[test]
    fn new_rejects_length_mismatch() {
        let result = TokenSequence::new(vec![0.0; 3], vec![1.0; 2]);
        assert!(result.is_err());
    }

    #[test]
    fn grid_indexing_and_transpose() {
        let grid = Grid::from_fn(2, 3, |i, j| (i * 10 + j) as u32);
        assert_eq!(grid[(1, 2)], 12);
        assert_eq!(grid.get(2, 0), None);
        assert_eq!(grid.get(0, 3), None);
        assert_eq!(grid.row(1), Some(&[10, 11, 12][..]));
        assert_eq!(grid.column(1).collect::<Vec<_>>(), vec![1, 11]);

        let t = grid.transpose();
        assert_eq!((t.rows(), t.cols()), (3, 2));
        assert_eq!(t[(2, 1)], 12);
        assert_eq!(t[(0, 1)], 10);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn grid_index_does_not_wrap_into_next_row() {
        let grid = Grid::filled(2, 2, 0u8);
        let _ = grid[(0, 2)];
    }

    #[test]
    fn zip_map_combines_elementwise() {
        let a = Grid::from_fn(2, 2, |i, j| (i + j) as u8);
        let b = Grid::filled(2, 2, 2u8);
        let c = a.zip_map(&b, |x, y| f32::from(x * y));
        assert_eq!(c.as_slice(), &[0.0, 2.0, 2.0, 4.0]);
    }
}
