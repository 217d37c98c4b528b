#[cfg(any(test, feature = "approx"))]
use approx::{AbsDiffEq, RelativeEq};

const FULL_TURN: f64 = 360.;
#[cfg(any(test, feature = "approx"))]
const HALF_TURN: f64 = 180.;

/// An angle in degrees that is always kept in [0°, 360°).
///
/// Headings are handed out as raw degrees, so unlike most of the crate this works on `f64`
/// degrees directly instead of going through `uom` (which stores radians and would not give back
/// exactly the value we computed).
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct BoundedAngle {
    degrees: f64,
}

impl BoundedAngle {
    pub(crate) fn new(degrees: f64) -> Self {
        Self {
            degrees: Self::into_bounds(degrees),
        }
    }

    /// Returns the angle in [0°, 360°).
    pub(crate) fn get_bounded(self) -> f64 {
        self.degrees
    }

    /// Returns the angle in [-180°, 180°).
    #[cfg(any(test, feature = "approx"))]
    pub(crate) fn to_signed_range(self) -> f64 {
        if self.degrees < HALF_TURN {
            self.degrees
        } else {
            self.degrees - FULL_TURN
        }
    }

    fn into_bounds(degrees: f64) -> f64 {
        let bounded = degrees.rem_euclid(FULL_TURN);
        // rem_euclid rounds tiny negative inputs (eg, -1e-17) up to exactly 360, and keeps the
        // sign of -0 and -360
        if bounded == FULL_TURN || bounded == 0. {
            0.
        } else {
            bounded
        }
    }
}

/// Deserializes raw degrees and wraps them into [0°, 360°).
#[cfg(feature = "serde")]
pub(crate) fn deserialize_bounded_degrees<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let degrees = <f64 as serde::Deserialize>::deserialize(deserializer)?;
    Ok(BoundedAngle::new(degrees).get_bounded())
}

#[cfg(any(test, feature = "approx"))]
impl AbsDiffEq<Self> for BoundedAngle {
    type Epsilon = <f64 as AbsDiffEq>::Epsilon;

    fn default_epsilon() -> Self::Epsilon {
        // degrees; roughly a millimeter of arc at 10 km
        0.000_000_1
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        Self::new(self.degrees - other.degrees)
            .to_signed_range()
            .abs()
            <= epsilon
    }
}

#[cfg(any(test, feature = "approx"))]
impl RelativeEq for BoundedAngle {
    fn default_max_relative() -> Self::Epsilon {
        f64::default_max_relative()
    }

    fn relative_eq(
        &self,
        other: &Self,
        epsilon: Self::Epsilon,
        max_relative: Self::Epsilon,
    ) -> bool {
        let min = f64::min(self.degrees, other.degrees);
        let max = f64::max(self.degrees, other.degrees);

        f64::relative_eq(&min, &max, epsilon, max_relative)
            || f64::relative_eq(&(min + FULL_TURN), &max, epsilon, max_relative)
    }
}

#[cfg(test)]
mod tests {
    use crate::util::BoundedAngle;
    use approx::{assert_abs_diff_eq, assert_abs_diff_ne, assert_relative_eq, assert_relative_ne};
    use rstest::rstest;

    #[test]
    fn bounded_angle_negative() {
        let sut = BoundedAngle::new(-90.);
        assert_eq!(sut.get_bounded(), 270.);
    }

    #[test]
    fn bounded_angle_negative_beyond_full_turn() {
        let sut = BoundedAngle::new(-390.);
        assert_eq!(sut.get_bounded(), 330.);
    }

    #[test]
    fn bounded_angle_positive_within_bounds() {
        let sut = BoundedAngle::new(180.);
        assert_eq!(sut.get_bounded(), 180.);
    }

    #[test]
    fn bounded_angle_positive_outside_bounds() {
        let sut = BoundedAngle::new(360. + 0.9);
        assert_relative_eq!(sut.get_bounded(), 0.9, epsilon = 1e-12);
    }

    #[test]
    fn bounded_angle_never_yields_full_turn() {
        let sut = BoundedAngle::new(-1e-17);
        assert_eq!(sut.get_bounded(), 0.);
    }

    #[rstest]
    #[case(0., 0.)]
    #[case(180., -180.)]
    #[case(359., -1.)]
    #[case(90., 90.)]
    #[case(270., -90.)]
    #[case(-90., -90.)]
    #[case(-180., -180.)]
    #[case(360., 0.)]
    #[case(360. + 120., 120.)]
    #[case(360. + 340., -20.)]
    fn bounded_angle_to_signed_range_converts_correctly(
        #[case] input: f64,
        #[case] expected: f64,
    ) {
        let bounded = BoundedAngle::new(input);

        assert_relative_eq!(
            bounded.to_signed_range(),
            expected,
            epsilon = f64::EPSILON * 1000.
        );
    }

    #[rstest]
    #[case(0., 0. + f64::EPSILON, true)]
    #[case(0. + f64::EPSILON, 0., true)]
    #[case(10., 2., false)]
    #[case(2., 10., false)]
    #[case(360. - f64::EPSILON * 1e3, 0., true)]
    #[case(0. + f64::EPSILON * 1e2, 360. - f64::EPSILON * 1e2, true)]
    #[case(0. + f64::EPSILON * 1e2, 360. * 2. - f64::EPSILON * 1e2, true)]
    #[case(10., 2. + 360., false)]
    fn bounded_angle_comparison(#[case] a: f64, #[case] b: f64, #[case] expected: bool) {
        let a = BoundedAngle::new(a);
        let b = BoundedAngle::new(b);

        if expected {
            assert_relative_eq!(&a, &b, epsilon = 1e-9);
            assert_abs_diff_eq!(&a, &b, epsilon = 1e-9);
        } else {
            assert_relative_ne!(&a, &b, epsilon = 1e-9);
            assert_abs_diff_ne!(&a, &b, epsilon = 1e-9);
        }
    }
}
