/// Easing curves mapping linear progress in [0, 1] to eased progress.
/// All of them satisfy f(0) = 0 and f(1) = 1.

pub fn ease_out_cubic(t: f32) -> f32 {
    1.0 - (1.0 - t).powi(3)
}

pub fn ease_out_quart(t: f32) -> f32 {
    1.0 - (1.0 - t).powi(4)
}

/// Piecewise-quadratic bounce that settles at 1 after three rebounds.
pub fn ease_out_bounce(t: f32) -> f32 {
    const N1: f32 = 7.5625;
    const D1: f32 = 2.75;

    if t < 1.0 / D1 {
        N1 * t * t
    } else if t < 2.0 / D1 {
        let t = t - 1.5 / D1;
        N1 * t * t + 0.75
    } else if t < 2.5 / D1 {
        let t = t - 2.25 / D1;
        N1 * t * t + 0.9375
    } else {
        let t = t - 2.625 / D1;
        N1 * t * t + 0.984375
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    #[test]
    fn test_endpoints() {
        for f in [ease_out_cubic, ease_out_quart, ease_out_bounce] {
            assert!(f(0.0).abs() < EPS);
            assert!((f(1.0) - 1.0).abs() < EPS);
        }
    }

    #[test]
    fn test_power_curves_are_monotonic() {
        let samples: Vec<f32> = (0..=100).map(|i| i as f32 / 100.0).collect();
        for f in [ease_out_cubic, ease_out_quart] {
            for pair in samples.windows(2) {
                assert!(f(pair[1]) >= f(pair[0]));
            }
        }
    }

    #[test]
    fn test_quart_leads_cubic() {
        // Higher power decays faster, so it is ahead everywhere inside (0, 1)
        for i in 1..100 {
            let t = i as f32 / 100.0;
            assert!(ease_out_quart(t) >= ease_out_cubic(t));
        }
    }

    #[test]
    fn test_bounce_stays_in_range() {
        for i in 0..=1000 {
            let v = ease_out_bounce(i as f32 / 1000.0);
            assert!((0.0..=1.0 + EPS).contains(&v), "bounce out of range: {}", v);
        }
    }

    #[test]
    fn test_bounce_first_contact() {
        // First segment reaches the ground exactly at t = 1 / 2.75
        assert!((ease_out_bounce(1.0 / 2.75) - 1.0).abs() < 1e-4);
        // ...then rebounds below 1
        assert!(ease_out_bounce(0.5) < 1.0);
    }
}
