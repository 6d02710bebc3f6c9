//! Antialiased scan conversion of sorted vector paths.
//!
//! [`render_aa`] walks a clean [`Svp`] scanline by scanline and hands the
//! caller, for each integer y, a sorted stream of signed 16.16 coverage
//! increments ([`CoverageStep`]). Integrating the steps left to right
//! yields per-column coverage in the 0..=255 range scaled by 65536; the
//! color fillers in [`crate::paint`] do exactly that.

use crate::svp::Svp;

/// Full coverage of a unit-height span: 255 << 16.
const FULL: f64 = 16_711_680.0;

/// One signed coverage increment at pixel column `x`, in 16.16 fixed
/// point.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CoverageStep {
    pub x: i32,
    pub delta: i32,
}

/// Renders the SVP into the rectangle `[x0, x1) x [y0, y1)`.
///
/// The callback is invoked once per scanline with `(y, start, steps)`:
/// `start` is the accumulated coverage at column `x0` (biased by 0x8000
/// so that integer truncation rounds to nearest) and `steps` is sorted by
/// column.
///
/// The input must be a cleaned SVP: segments sorted by top point, no
/// interior crossings. Each pixel then receives a value proportional to
/// the area of its overlap with the filled region.
pub fn render_aa<F>(svp: &Svp, x0: i32, y0: i32, x1: i32, y1: i32, mut callback: F)
where
    F: FnMut(i32, i32, &[CoverageStep]),
{
    let n_segs = svp.segs.len();
    let mut active_segs: Vec<usize> = Vec::with_capacity(n_segs);
    let mut cursor: Vec<usize> = vec![0; n_segs];
    let mut seg_x: Vec<f64> = vec![0.0; n_segs];
    let mut seg_dx: Vec<f64> = vec![0.0; n_segs];

    let mut steps: Vec<CoverageStep> = Vec::with_capacity(256);

    let mut i = 0;
    for y in y0..y1 {
        // Insert the segments that start overlapping [y, y+1).
        while i < n_segs && svp.segs[i].bbox.min.y < (y + 1) as f64 {
            if svp.segs[i].bbox.max.y > y as f64 {
                let seg = &svp.segs[i];
                // Move the cursor to the topmost edge overlapping the
                // scanline band.
                let mut curs = 0;
                while seg.points[curs + 1].y < y as f64 {
                    curs += 1;
                }
                cursor[i] = curs;
                seg_dx[i] = (seg.points[curs + 1].x - seg.points[curs].x)
                    / (seg.points[curs + 1].y - seg.points[curs].y);
                seg_x[i] = seg.points[curs].x + (y as f64 - seg.points[curs].y) * seg_dx[i];
                insert_active(i, &mut active_segs, &seg_x, &seg_dx);
            }
            i += 1;
        }

        steps.clear();

        // Bias so the >> 16 integration truncates to nearest.
        let mut start: i32 = 0x8000;

        // Render the runlengths, advancing and deleting as we go.
        let mut j = 0;
        while j < active_segs.len() {
            let seg_index = active_segs[j];
            let seg = &svp.segs[seg_index];
            let mut curs = cursor[seg_index];
            while curs != seg.points.len() - 1 && seg.points[curs].y < (y + 1) as f64 {
                let y_top = (y as f64).max(seg.points[curs].y);
                let y_bot = ((y + 1) as f64).min(seg.points[curs + 1].y);
                if y_top != y_bot {
                    let delta = match seg.dir {
                        crate::svp::Direction::Down => FULL,
                        crate::svp::Direction::Up => -FULL,
                    } * (y_bot - y_top);
                    let x_top = seg_x[seg_index] + (y_top - y as f64) * seg_dx[seg_index];
                    let x_bot = seg_x[seg_index] + (y_bot - y as f64) * seg_dx[seg_index];
                    let (x_min, x_max) = if x_top < x_bot {
                        (x_top, x_bot)
                    } else {
                        (x_bot, x_top)
                    };
                    let ix_min = x_min.floor() as i32;
                    let ix_max = x_max.floor() as i32;

                    if ix_min >= x1 {
                        // Skip; it starts to the right of the render
                        // region.
                    } else if ix_max < x0 {
                        // It ends to the left of the render region and
                        // contributes uniformly.
                        start = (start as f64 + delta) as i32;
                    } else if ix_min == ix_max {
                        // Case 1: antialias a single pixel.
                        let xdelta = ((ix_min + 1) as f64 - (x_min + x_max) * 0.5) * delta;
                        let xdelta = xdelta as i32;
                        steps.push(CoverageStep {
                            x: ix_min,
                            delta: xdelta,
                        });
                        steps.push(CoverageStep {
                            x: ix_min + 1,
                            delta: (delta - xdelta as f64) as i32,
                        });
                    } else {
                        // Case 2: antialias a run. The partial first
                        // pixel, a linear ramp across the interior
                        // columns, then the trailing partial pixel;
                        // differences of the running ramp keep the total
                        // equal to the exact trapezoidal area.
                        let rslope = 1.0 / seg_dx[seg_index].abs();
                        let drslope = delta * rslope;
                        let mut last = drslope
                            * 0.5
                            * ((ix_min + 1) as f64 - x_min)
                            * ((ix_min + 1) as f64 - x_min);
                        steps.push(CoverageStep {
                            x: ix_min,
                            delta: last as i32,
                        });
                        for x in ix_min + 1..ix_max {
                            let this = match seg.dir {
                                crate::svp::Direction::Down => FULL,
                                crate::svp::Direction::Up => -FULL,
                            } * rslope
                                * (x as f64 + 0.5 - x_min);
                            steps.push(CoverageStep {
                                x,
                                delta: (this - last) as i32,
                            });
                            last = this;
                        }
                        let this =
                            delta * (1.0 - 0.5 * (x_max - ix_max as f64) * (x_max - ix_max as f64) * rslope);
                        steps.push(CoverageStep {
                            x: ix_max,
                            delta: (this - last) as i32,
                        });
                        last = this;
                        steps.push(CoverageStep {
                            x: ix_max + 1,
                            delta: (delta - last) as i32,
                        });
                    }
                }
                curs += 1;
                if curs != seg.points.len() - 1 && seg.points[curs].y < (y + 1) as f64 {
                    seg_dx[seg_index] = (seg.points[curs + 1].x - seg.points[curs].x)
                        / (seg.points[curs + 1].y - seg.points[curs].y);
                    seg_x[seg_index] =
                        seg.points[curs].x + (y as f64 - seg.points[curs].y) * seg_dx[seg_index];
                }
            }
            if seg.points[curs].y >= (y + 1) as f64 {
                curs -= 1;
                cursor[seg_index] = curs;
                seg_x[seg_index] += seg_dx[seg_index];
                j += 1;
            } else {
                active_segs.remove(j);
            }
        }

        steps.sort_by_key(|s| s.x);

        callback(y, start, &steps);
    }
}

/// Inserts segment `i` into the active list ordered by current x,
/// nudging by a whisker of slope so edges sharing a top point sort in
/// the order they will actually diverge.
fn insert_active(i: usize, active_segs: &mut Vec<usize>, seg_x: &[f64], seg_dx: &[f64]) {
    let x = seg_x[i] + 0.001 * seg_dx[i];
    let mut j = 0;
    while j < active_segs.len() && seg_x[active_segs[j]] < x {
        j += 1;
    }
    active_segs.insert(j, i);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::point;
    use crate::svp::{Direction, SvpSeg};

    // Hand-built clean SVP: the left boundary is filled to its right, so
    // it carries the positive winding contribution.
    fn axis_rect_svp(x0: f64, y0: f64, x1: f64, y1: f64) -> Svp {
        Svp {
            segs: vec![
                SvpSeg::new(Direction::Down, vec![point(x0, y0), point(x0, y1)]),
                SvpSeg::new(Direction::Up, vec![point(x1, y0), point(x1, y1)]),
            ],
        }
    }

    fn coverage_row(svp: &Svp, width: i32, y: i32) -> Vec<u8> {
        let mut rows = vec![Vec::new(); 1];
        render_aa(svp, 0, y, width, y + 1, |_, start, steps| {
            let mut row = Vec::new();
            let mut sum = start;
            let mut k = 0;
            for x in 0..width {
                while k < steps.len() && steps[k].x == x {
                    sum += steps[k].delta;
                    k += 1;
                }
                row.push((sum >> 16) as u8);
            }
            rows[0] = row;
        });
        rows.remove(0)
    }

    #[test]
    fn pixel_aligned_rect_coverage() {
        // A rect with edges on pixel boundaries: interior columns fully
        // covered, everything else empty.
        let svp = axis_rect_svp(2.0, 0.0, 6.0, 4.0);
        let row = coverage_row(&svp, 8, 1);
        assert_eq!(row, vec![0, 0, 255, 255, 255, 255, 0, 0]);
    }

    #[test]
    fn half_pixel_columns() {
        // Vertical edges through pixel centers cover half of the boundary
        // columns.
        let svp = axis_rect_svp(2.5, 0.0, 5.5, 4.0);
        let row = coverage_row(&svp, 8, 2);
        assert_eq!(row[0], 0);
        assert_eq!(row[1], 0);
        assert!((row[2] as i32 - 128).abs() <= 1);
        assert_eq!(row[3], 255);
        assert_eq!(row[4], 255);
        assert!((row[5] as i32 - 128).abs() <= 1);
        assert_eq!(row[6], 0);
    }

    #[test]
    fn fractional_vertical_coverage() {
        // A rect covering only a quarter of the scanline band's height.
        let svp = axis_rect_svp(1.0, 2.0, 3.0, 2.25);
        let row = coverage_row(&svp, 4, 2);
        assert_eq!(row[0], 0);
        assert!((row[1] as i32 - 64).abs() <= 1);
        assert!((row[2] as i32 - 64).abs() <= 1);
        assert_eq!(row[3], 0);
    }

    #[test]
    fn steps_balance_for_contained_polygon() {
        // Σ steps == 0 (up to rounding) on every scanline when the
        // polygon is strictly inside the render rect.
        let svp = axis_rect_svp(1.25, 0.5, 6.75, 7.5);
        render_aa(&svp, 0, 0, 10, 8, |_, start, steps| {
            let mut sum = start;
            for s in steps {
                sum += s.delta;
            }
            assert!((sum - 0x8000).abs() < 64, "residual coverage {}", sum);
        });
    }

    #[test]
    fn sloped_edge_ramp() {
        // A 45 degree edge: coverage ramps linearly, one pixel per
        // column.
        let svp = Svp {
            segs: vec![
                SvpSeg::new(Direction::Down, vec![point(0.0, 0.0), point(0.0, 8.0)]),
                SvpSeg::new(Direction::Up, vec![point(8.0, 0.0), point(0.0, 8.0)]),
            ],
        };
        let row = coverage_row(&svp, 10, 2);
        // At y = 2 the hypotenuse crosses x in [5, 6].
        assert_eq!(row[0], 255);
        assert_eq!(row[4], 255);
        assert!((row[5] as i32 - 128).abs() <= 2);
        assert_eq!(row[6], 0);
    }
}
