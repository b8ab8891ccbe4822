use crate::types::Grid;

/// `coverage[i][j] = 1` iff frame `j` lies before the end of token `i`.
pub fn coverage(cum_duration: &[f32], max_frames: usize) -> Grid<u8> {
    Grid::from_fn(cum_duration.len(), max_frames, |i, j| {
        u8::from((j as f32) < cum_duration[i])
    })
}

/// Moves every row down by one and zero-fills row 0.
pub fn shift_rows_down(grid: &Grid<u8>) -> Grid<u8> {
    Grid::from_fn(grid.rows(), grid.cols(), |i, j| {
        if i == 0 {
            0
        } else {
            grid[(i - 1, j)]
        }
    })
}

/// Hard monotonic path: `path[i][j] = 1` iff
/// `cum_duration[i-1] <= j < cum_duration[i]`.
///
/// Built as `coverage - shift_rows_down(coverage)`. Coverage is monotone in
/// `i` for non-negative durations, so the difference never goes below 0.
pub fn expand_path(cum_duration: &[f32], max_frames: usize) -> Grid<u8> {
    let covered = coverage(cum_duration, max_frames);
    let shifted = shift_rows_down(&covered);
    covered.zip_map(&shifted, |c, s| c.saturating_sub(s))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owners(path: &Grid<u8>) -> Vec<Option<usize>> {
        (0..path.cols())
            .map(|j| path.column(j).position(|v| v == 1))
            .collect()
    }

    #[test]
    fn unit_durations_own_one_frame_each() {
        let path = expand_path(&[1.0, 2.0, 3.0, 3.0], 8);
        assert_eq!(
            owners(&path),
            vec![Some(0), Some(1), Some(2), None, None, None, None, None]
        );
        assert_eq!(path.row(3).map(|r| r.iter().sum::<u8>()), Some(0));
    }

    #[test]
    fn spans_are_contiguous() {
        let path = expand_path(&[2.0, 2.0, 5.0], 6);
        assert_eq!(path.row(0), Some(&[1, 1, 0, 0, 0, 0][..]));
        assert_eq!(path.row(1), Some(&[0, 0, 0, 0, 0, 0][..]));
        assert_eq!(path.row(2), Some(&[0, 0, 1, 1, 1, 0][..]));
    }

    #[test]
    fn each_in_range_column_has_one_owner() {
        let cum = [3.0, 4.0, 9.0, 12.0];
        let path = expand_path(&cum, 16);
        for j in 0..12 {
            assert_eq!(path.column(j).map(u32::from).sum::<u32>(), 1, "frame {j}");
        }
        for j in 12..16 {
            assert_eq!(path.column(j).map(u32::from).sum::<u32>(), 0, "frame {j}");
        }
    }

    #[test]
    fn overflow_stays_inside_capacity() {
        let path = expand_path(&[8.0, 16.0], 2);
        assert_eq!((path.rows(), path.cols()), (2, 2));
        assert_eq!(path.row(0), Some(&[1, 1][..]));
        assert_eq!(path.row(1), Some(&[0, 0][..]));
    }

    #[test]
    fn shift_zero_fills_first_row() {
        let grid = Grid::from_fn(3, 2, |i, _| i as u8 + 1);
        let shifted = shift_rows_down(&grid);
        assert_eq!(shifted.as_slice(), &[0, 0, 1, 1, 2, 2]);
    }
}
