//! Easing functions for scroll animations

/// Easing applied to one keyframe segment
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Easing {
    #[default]
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
    /// CSS-style cubic bezier with control points (x1, y1) and (x2, y2)
    CubicBezier(f32, f32, f32, f32),
    /// Hold each level, jumping at the end of each of `n` equal steps
    Step(u32),
}

impl Easing {
    /// Curve that starts slowly and ends abruptly, used to wind up a jump
    pub const WIND_UP: Easing = Easing::CubicBezier(1.0, 0.0, 1.0, 0.0);

    /// Curve that starts abruptly and settles slowly, used to land a jump
    pub const SETTLE: Easing = Easing::CubicBezier(0.0, 1.0, 0.0, 1.0);

    /// Apply the easing function to a progress value (0.0 to 1.0)
    pub fn apply(&self, t: f32) -> f32 {
        match self {
            Easing::Linear => t,
            Easing::EaseIn => t * t * t,
            Easing::EaseOut => 1.0 - (1.0 - t).powi(3),
            Easing::EaseInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Easing::CubicBezier(x1, y1, x2, y2) => cubic_bezier_ease(t, *x1, *y1, *x2, *y2),
            Easing::Step(steps) => step_ease(t, *steps),
        }
    }
}

fn step_ease(t: f32, steps: u32) -> f32 {
    if t >= 1.0 {
        return 1.0;
    }
    if t <= 0.0 || steps == 0 {
        return 0.0;
    }
    let steps = steps as f32;
    (t * steps).floor() / steps
}

/// Cubic bezier easing calculation (matches CSS timing functions).
///
/// Newton-Raphson with a binary-search fallback, computed in f64.
fn cubic_bezier_ease(t: f32, x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }

    let x = t as f64;
    let (x1, y1, x2, y2) = (x1 as f64, y1 as f64, x2 as f64, y2 as f64);

    let mut p = x;
    for _ in 0..8 {
        let err = bezier_sample(p, x1, x2) - x;
        if err.abs() < 1e-7 {
            return bezier_sample(p, y1, y2) as f32;
        }
        let slope = bezier_slope(p, x1, x2);
        if slope.abs() < 1e-7 {
            break;
        }
        p -= err / slope;
    }

    // Flat slope (the wind-up and settle curves hit this): bisect instead
    let mut lo = 0.0_f64;
    let mut hi = 1.0_f64;
    p = x;
    for _ in 0..30 {
        let val = bezier_sample(p, x1, x2);
        if (val - x).abs() < 1e-7 {
            break;
        }
        if val < x {
            lo = p;
        } else {
            hi = p;
        }
        p = (lo + hi) * 0.5;
    }

    bezier_sample(p, y1, y2) as f32
}

/// B(t) = 3(1-t)²t·p1 + 3(1-t)t²·p2 + t³ in Horner form
#[inline]
fn bezier_sample(t: f64, p1: f64, p2: f64) -> f64 {
    let a = 1.0 - 3.0 * p2 + 3.0 * p1;
    let b = 3.0 * p2 - 6.0 * p1;
    let c = 3.0 * p1;
    ((a * t + b) * t + c) * t
}

#[inline]
fn bezier_slope(t: f64, p1: f64, p2: f64) -> f64 {
    let a = 1.0 - 3.0 * p2 + 3.0 * p1;
    let b = 3.0 * p2 - 6.0 * p1;
    let c = 3.0 * p1;
    (3.0 * a * t + 2.0 * b) * t + c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_are_exact() {
        for easing in [
            Easing::Linear,
            Easing::EaseIn,
            Easing::EaseOut,
            Easing::EaseInOut,
            Easing::WIND_UP,
            Easing::SETTLE,
            Easing::Step(1),
        ] {
            assert_eq!(easing.apply(0.0), 0.0, "{easing:?} at 0");
            assert_eq!(easing.apply(1.0), 1.0, "{easing:?} at 1");
        }
    }

    #[test]
    fn test_wind_up_lags_and_settle_leads() {
        // Wind-up stays near the start for most of the segment
        assert!(Easing::WIND_UP.apply(0.5) < 0.2);
        // Settle covers most of the distance early
        assert!(Easing::SETTLE.apply(0.5) > 0.8);
    }

    #[test]
    fn test_step_holds_until_the_end() {
        let step = Easing::Step(1);
        assert_eq!(step.apply(0.25), 0.0);
        assert_eq!(step.apply(0.99), 0.0);

        let quarters = Easing::Step(4);
        assert_eq!(quarters.apply(0.3), 0.25);
        assert_eq!(quarters.apply(0.76), 0.75);
    }

    #[test]
    fn test_cubic_bezier_matches_linear_diagonal() {
        let linear = Easing::CubicBezier(0.25, 0.25, 0.75, 0.75);
        for t in [0.1, 0.3, 0.5, 0.9] {
            assert!((linear.apply(t) - t).abs() < 0.001);
        }
    }
}
