//! Shifted accumulation over a fixed-length position buffer.
//!
//! `roll_add` adds `src` into `dst` displaced by `shift` positions. The part of
//! `src` that would fall off one edge re-enters at the opposite edge, so every
//! source value lands somewhere in `dst`:
//!
//! ```text
//! shift = +k:  dst[k..]     += src[..n-k]    dst[..k]     += src[n-k..]
//! shift = -k:  dst[n-k..]   += src[..k]      dst[..n-k]   += src[k..]
//! ```
//!
//! A left shift by `k` is therefore the same as a right shift by `n - k`, which is
//! how both directions share one split point below.

/// Add `src` into `dst` shifted by `shift` positions (positive = towards higher indices).
///
/// `|shift|` must not exceed the buffer length. A zero shift or empty buffer is a no-op.
pub fn roll_add(dst: &mut [f64], src: &[f64], shift: isize) {
    let n = dst.len();
    debug_assert_eq!(n, src.len(), "roll_add buffers must be position-aligned");
    if n == 0 || shift == 0 {
        return;
    }

    let k = shift.unsigned_abs();
    debug_assert!(k <= n, "shift {shift} exceeds buffer length {n}");
    let k = k.min(n);

    // Index in `dst` where the first element of `src` lands.
    let split = if shift > 0 { k } else { n - k };

    let (head, tail) = dst.split_at_mut(split);
    add_assign(tail, &src[..n - split]);
    add_assign(head, &src[n - split..]);
}

fn add_assign(dst: &mut [f64], src: &[f64]) {
    for (d, s) in dst.iter_mut().zip(src) {
        *d += *s;
    }
}
