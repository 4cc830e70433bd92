//! Newton-Raphson primary solver.

/// Run Newton-Raphson from `x0`. Returns `None` on divergence, oscillation,
/// a vanishing derivative, or a non-finite iterate — the caller falls back
/// to Brent's method rather than failing.
pub(crate) fn newton_raphson<F, G>(f: F, df: G, x0: f64, tol: f64, max_iter: usize) -> Option<f64>
where
    F: Fn(f64) -> f64,
    G: Fn(f64) -> f64,
{
    // Iterates outside (-1, +1e8) have left the meaningful rate domain.
    const DOMAIN_LOW: f64 = -1.0 + 1e-9;
    const DOMAIN_HIGH: f64 = 1e8;

    let mut x = x0;
    let mut prev_step: Option<f64> = None;
    for _ in 0..max_iter {
        let fx = f(x);
        if !fx.is_finite() {
            return None;
        }
        if fx.abs() <= tol {
            return Some(x);
        }
        let dfx = df(x);
        if !dfx.is_finite() || dfx.abs() <= 1e-14 {
            return None;
        }
        let step = fx / dfx;
        let x_next = x - step;
        if !x_next.is_finite() || !(DOMAIN_LOW..DOMAIN_HIGH).contains(&x_next) {
            return None;
        }
        // Oscillation guard: a step that flips direction without shrinking
        // is a cycle, not progress.
        if let Some(prev) = prev_step {
            if step.signum() != prev.signum() && step.abs() >= prev.abs() {
                return None;
            }
        }
        prev_step = Some(step);
        if (x_next - x).abs() <= 1e-14 {
            return Some(x_next);
        }
        x = x_next;
    }
    None
}
