//! Approximate distance between binary sketches.

use crate::quantization::SketchRef;
use crate::utils::and_popcount;

/// Approximate distance between two sketches.
///
/// `(vp·wp) + (vm·wm) − (vp·wm) − (vm·wp)`, where `·` is the popcount of the
/// bitwise AND of two masks. Large values mean the kept coordinates agree in
/// sign; the searcher nevertheless ranks it ascending.
#[inline]
pub fn approx_distance(v: SketchRef<'_>, w: SketchRef<'_>) -> i32 {
    let pp = and_popcount(v.plus, w.plus) as i32;
    let mm = and_popcount(v.minus, w.minus) as i32;
    let pm = and_popcount(v.plus, w.minus) as i32;
    let mp = and_popcount(v.minus, w.plus) as i32;
    pp + mm - pm - mp
}
