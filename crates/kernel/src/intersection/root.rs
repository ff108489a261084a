//! Bracketed 1D root finding.

const MAX_ITERATIONS: usize = 100;

/// Root of `f` inside `[a, b]`, given a sign change between the ends.
///
/// `function` returns `(f(t), f'(t))`. Newton steps are taken while they stay
/// inside the current bracket and shrink fast enough; otherwise the bracket
/// is bisected. Stops when the step is below `x_tolerance`.
pub fn newton_bisection<F>(function: F, a: f64, b: f64, x_tolerance: f64) -> f64
where
    F: Fn(f64) -> (f64, f64),
{
    let (fa, _) = function(a);
    let (fb, _) = function(b);
    if fa == 0.0 {
        return a;
    }
    if fb == 0.0 {
        return b;
    }

    // Orient the bracket so that f(low) < 0 < f(high).
    let (mut low, mut high) = if fa < 0.0 { (a, b) } else { (b, a) };

    let mut t = 0.5 * (a + b);
    let mut dx_old = (b - a).abs();
    let mut dx = dx_old;
    let (mut f, mut df) = function(t);

    for _ in 0..MAX_ITERATIONS {
        let newton_leaves_bracket = ((t - high) * df - f) * ((t - low) * df - f) > 0.0;
        let newton_too_slow = (2.0 * f).abs() > (dx_old * df).abs();

        if newton_leaves_bracket || newton_too_slow {
            dx_old = dx;
            dx = 0.5 * (high - low);
            t = low + dx;
        } else {
            dx_old = dx;
            dx = f / df;
            t -= dx;
        }

        if dx.abs() < x_tolerance {
            return t;
        }

        (f, df) = function(t);
        if f == 0.0 {
            return t;
        }
        if f < 0.0 {
            low = t;
        } else {
            high = t;
        }
    }
    t
}

/// Newton refinement of an approximate root `start`, kept inside
/// `[low, high]`.
///
/// A step is taken only if it reduces `|f|`, so the result is never worse
/// than `start`. Stops when the step is below `x_tolerance` or the
/// derivative vanishes.
pub fn newton_polish<F>(function: F, start: f64, low: f64, high: f64, x_tolerance: f64) -> f64
where
    F: Fn(f64) -> (f64, f64),
{
    let mut t = start;
    let (mut f, mut df) = function(t);
    for _ in 0..MAX_ITERATIONS {
        if f == 0.0 || df == 0.0 || !df.is_finite() {
            break;
        }
        let next = (t - f / df).clamp(low, high);
        let (f_next, df_next) = function(next);
        if f_next.abs() >= f.abs() {
            break;
        }
        let step = (next - t).abs();
        (t, f, df) = (next, f_next, df_next);
        if step < x_tolerance {
            break;
        }
    }
    t
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_square_root() {
        let root = newton_bisection(|t| (t * t - 2.0, 2.0 * t), 0.0, 2.0, 1e-12);
        assert_relative_eq!(root, std::f64::consts::SQRT_2, epsilon = 1e-12);
    }

    #[test]
    fn test_decreasing_function() {
        let root = newton_bisection(|t| (1.0 - t * t * t, -3.0 * t * t), 0.0, 3.0, 1e-12);
        assert_relative_eq!(root, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_flat_derivative_falls_back_to_bisection() {
        // Zero derivative at the midpoint start.
        let root = newton_bisection(|t| (t * t * t - 0.001, 3.0 * t * t), -1.0, 1.0, 1e-12);
        assert_relative_eq!(root, 0.1, epsilon = 1e-10);
    }

    #[test]
    fn test_root_at_bracket_end() {
        assert_eq!(newton_bisection(|t| (t - 1.0, 1.0), 1.0, 2.0, 1e-12), 1.0);
    }

    #[test]
    fn test_polish_moves_onto_root() {
        let root = newton_polish(|t| (t / 100.0 - 2.5, 0.01), 240.0, 0.0, 500.0, 1e-12);
        assert_relative_eq!(root, 250.0, epsilon = 1e-12);
        let root = newton_polish(|t| (t * t - 2.0, 2.0 * t), 1.4, 1.0, 2.0, 1e-14);
        assert_relative_eq!(root, std::f64::consts::SQRT_2, epsilon = 1e-14);
    }

    #[test]
    fn test_polish_stays_inside_bounds() {
        let root = newton_polish(|t| (t - 5.0, 1.0), 0.9, 0.0, 1.0, 1e-12);
        assert_eq!(root, 1.0);
    }

    #[test]
    fn test_polish_keeps_start_without_descent() {
        // Tangential contact just above zero: Newton cannot reach a root.
        let start = 0.3;
        let contact = |t: f64| ((t - 0.3) * (t - 0.3) + 1e-9, 2.0 * (t - 0.3));
        let root = newton_polish(contact, start, 0.0, 1.0, 1e-12);
        assert_eq!(root, start);
    }
}
