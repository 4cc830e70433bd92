//! Brent's method: bisection + secant + inverse-quadratic interpolation.

use vintage_core::errors::SolverError;

/// Find a root of `f` in [lower, upper]. The endpoints must bracket a sign
/// change or the search fails with `RootNotBracketed`.
pub(crate) fn brent<F>(
    f: F,
    lower: f64,
    upper: f64,
    f_tol: f64,
    max_iter: usize,
) -> Result<f64, SolverError>
where
    F: Fn(f64) -> f64,
{
    const X_TOL: f64 = 1e-13;

    let mut a = lower;
    let mut b = upper;
    let mut fa = f(a);
    let mut fb = f(b);

    if fa == 0.0 {
        return Ok(a);
    }
    if fb == 0.0 {
        return Ok(b);
    }
    if !fa.is_finite() || !fb.is_finite() || (fa > 0.0) == (fb > 0.0) {
        return Err(SolverError::RootNotBracketed { lower, upper });
    }

    let mut c = a;
    let mut fc = fa;
    let mut d = b - a;
    let mut e = d;

    for _ in 0..max_iter {
        if (fb > 0.0) == (fc > 0.0) {
            // Root left between a and b; reset the contra point.
            c = a;
            fc = fa;
            d = b - a;
            e = d;
        }
        if fc.abs() < fb.abs() {
            // Keep b as the best estimate.
            a = b;
            b = c;
            c = a;
            fa = fb;
            fb = fc;
            fc = fa;
        }

        let tol1 = 2.0 * f64::EPSILON * b.abs() + 0.5 * X_TOL;
        let xm = 0.5 * (c - b);
        if xm.abs() <= tol1 || fb.abs() <= f_tol {
            return Ok(b);
        }

        if e.abs() >= tol1 && fa.abs() > fb.abs() {
            // Interpolation step: secant when a == c, inverse quadratic
            // otherwise.
            let s = fb / fa;
            let (mut p, mut q);
            if a == c {
                p = 2.0 * xm * s;
                q = 1.0 - s;
            } else {
                let r0 = fa / fc;
                let r1 = fb / fc;
                p = s * (2.0 * xm * r0 * (r0 - r1) - (b - a) * (r1 - 1.0));
                q = (r0 - 1.0) * (r1 - 1.0) * (s - 1.0);
            }
            if p > 0.0 {
                q = -q;
            }
            p = p.abs();
            let min1 = 3.0 * xm * q - (tol1 * q).abs();
            let min2 = (e * q).abs();
            if 2.0 * p < min1.min(min2) {
                e = d;
                d = p / q;
            } else {
                // Interpolation rejected; bisect.
                d = xm;
                e = d;
            }
        } else {
            d = xm;
            e = d;
        }

        a = b;
        fa = fb;
        if d.abs() > tol1 {
            b += d;
        } else {
            b += tol1.copysign(xm);
        }
        fb = f(b);
    }

    Err(SolverError::NonConvergence { iterations: max_iter })
}
