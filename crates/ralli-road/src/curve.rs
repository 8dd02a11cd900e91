use serde::Deserialize;

/// Piecewise-linear keyframe curve over normalized `t`.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(from = "Vec<[f64; 2]>")]
pub struct Curve {
    keys: Vec<[f64; 2]>,
}

impl From<Vec<[f64; 2]>> for Curve {
    fn from(keys: Vec<[f64; 2]>) -> Self {
        Curve::new(keys)
    }
}

impl Curve {
    pub fn new(mut keys: Vec<[f64; 2]>) -> Self {
        keys.retain(|k| k[0].is_finite() && k[1].is_finite());
        keys.sort_by(|a, b| a[0].total_cmp(&b[0]));
        Self { keys }
    }

    pub fn constant(v: f64) -> Self {
        Self::new(vec![[0.0, v], [1.0, v]])
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Clamped evaluation; an empty curve is 0 everywhere.
    pub fn evaluate(&self, t: f64) -> f64 {
        let (first, last) = match (self.keys.first(), self.keys.last()) {
            (Some(f), Some(l)) => (f, l),
            _ => return 0.0,
        };
        if t <= first[0] {
            return first[1];
        }
        if t >= last[0] {
            return last[1];
        }
        let hi = self.keys.partition_point(|k| k[0] <= t);
        let a = self.keys[hi - 1];
        let b = self.keys[hi];
        let span = b[0] - a[0];
        if span <= f64::EPSILON {
            return b[1];
        }
        a[1] + (b[1] - a[1]) * ((t - a[0]) / span)
    }

    /// Trapezoid integral over `t` in `[0, 1]`.
    pub fn integrate01(&self, steps: usize) -> f64 {
        let n = steps.max(1);
        let dt = 1.0 / n as f64;
        let mut acc = 0.0;
        let mut prev = self.evaluate(0.0);
        for i in 1..=n {
            let v = self.evaluate(i as f64 * dt);
            acc += 0.5 * (prev + v) * dt;
            prev = v;
        }
        acc
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evaluates_between_and_beyond_keys() {
        let c = Curve::new(vec![[1.0, 4.0], [0.0, 0.0], [0.5, 2.0]]);
        assert_eq!(c.evaluate(-1.0), 0.0);
        assert_eq!(c.evaluate(0.25), 1.0);
        assert_eq!(c.evaluate(0.75), 3.0);
        assert_eq!(c.evaluate(2.0), 4.0);
    }

    #[test]
    fn empty_curve_is_zero() {
        let c = Curve::default();
        assert!(c.is_empty());
        assert_eq!(c.evaluate(0.3), 0.0);
    }

    #[test]
    fn integral_of_ramp() {
        let c = Curve::new(vec![[0.0, 0.0], [1.0, 2.0]]);
        assert!((c.integrate01(64) - 1.0).abs() < 1e-9);
    }
}
