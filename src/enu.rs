use crate::Vector3;
use std::fmt;
use std::fmt::Display;
use uom::si::f64::Length;
use uom::si::length::meter;

#[cfg(any(test, feature = "approx"))]
use approx::{AbsDiffEq, RelativeEq};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[cfg(doc)]
use crate::LocalFrame;

/// A position in a local East-North-Up frame: meters east, north, and up of some origin.
///
/// An `EnuPoint` does not know which origin it is relative to. Points are only meaningful
/// together with the [`LocalFrame`] that produced them, and feeding a point from one frame into
/// another frame's [`LocalFrame::enu_to_gps`] silently yields the wrong location.
///
/// ```rust
/// use skyframe::EnuPoint;
/// use uom::si::f64::Length;
/// use uom::si::length::meter;
///
/// // 100m east, 50m north, 30m up from the origin
/// let offset = EnuPoint::from_cartesian(
///     Length::new::<meter>(100.),
///     Length::new::<meter>(50.),
///     Length::new::<meter>(30.),
/// );
/// assert_eq!(offset.up().get::<meter>(), 30.);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EnuPoint {
    pub(crate) east: f64,
    pub(crate) north: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub(crate) up: f64,
}

impl EnuPoint {
    pub(crate) const fn from_meters(east: f64, north: f64, up: f64) -> Self {
        Self { east, north, up }
    }

    pub(crate) fn from_nalgebra_vector(v: Vector3) -> Self {
        Self::from_meters(v.x, v.y, v.z)
    }

    pub(crate) fn to_nalgebra_vector(self) -> Vector3 {
        Vector3::new(self.east, self.north, self.up)
    }

    /// The origin of the frame, ie (0, 0, 0).
    #[must_use]
    pub const fn origin() -> Self {
        Self::from_meters(0., 0., 0.)
    }

    /// Constructs a point at the given east, north, and up offsets from the origin.
    pub fn from_cartesian(
        east: impl Into<Length>,
        north: impl Into<Length>,
        up: impl Into<Length>,
    ) -> Self {
        Self::from_meters(
            east.into().get::<meter>(),
            north.into().get::<meter>(),
            up.into().get::<meter>(),
        )
    }

    /// Constructs a point from named components.
    ///
    /// Prefer this over [`EnuPoint::from_cartesian`] when the argument order is not obvious at
    /// the call site.
    pub fn build(Components { east, north, up }: Components) -> Self {
        Self::from_cartesian(east, north, up)
    }

    /// Distance east of the origin (negative is west).
    #[must_use]
    pub fn east(&self) -> Length {
        Length::new::<meter>(self.east)
    }

    /// Distance north of the origin (negative is south).
    #[must_use]
    pub fn north(&self) -> Length {
        Length::new::<meter>(self.north)
    }

    /// Distance above the origin (negative is below).
    #[must_use]
    pub fn up(&self) -> Length {
        Length::new::<meter>(self.up)
    }

    /// Distance from the origin along the tangent plane, ignoring `up`.
    #[must_use]
    pub fn horizontal_distance(&self) -> Length {
        Length::new::<meter>(self.to_nalgebra_vector().xy().norm())
    }

    /// Straight-line distance from the origin.
    #[must_use]
    pub fn distance_from_origin(&self) -> Length {
        Length::new::<meter>(self.to_nalgebra_vector().norm())
    }
}

impl Display for EnuPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E {}m, N {}m, U {}m", self.east, self.north, self.up)
    }
}

#[cfg(any(test, feature = "approx"))]
impl AbsDiffEq<Self> for EnuPoint {
    type Epsilon = Length;

    fn default_epsilon() -> Self::Epsilon {
        Length::new::<meter>(0.000_001)
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        // this checks each axis separately, not the length of the difference
        self.to_nalgebra_vector()
            .abs_diff_eq(&other.to_nalgebra_vector(), epsilon.get::<meter>())
    }
}

#[cfg(any(test, feature = "approx"))]
impl RelativeEq for EnuPoint {
    fn default_max_relative() -> Self::Epsilon {
        Length::new::<meter>(Vector3::default_max_relative())
    }

    fn relative_eq(
        &self,
        other: &Self,
        epsilon: Self::Epsilon,
        max_relative: Self::Epsilon,
    ) -> bool {
        self.to_nalgebra_vector().relative_eq(
            &other.to_nalgebra_vector(),
            epsilon.get::<meter>(),
            max_relative.get::<meter>(),
        )
    }
}

/// Argument type for [`EnuPoint::build`].
#[derive(Debug, Default, Clone, Copy)]
#[must_use]
pub struct Components {
    pub east: Length,
    pub north: Length,
    pub up: Length,
}

#[cfg(test)]
mod tests {
    use super::{Components, EnuPoint};
    use approx::{assert_relative_eq, assert_relative_ne};
    use uom::si::f64::Length;
    use uom::si::length::meter;

    fn m(meters: f64) -> Length {
        Length::new::<meter>(meters)
    }

    #[test]
    fn distances() {
        let point = EnuPoint::from_cartesian(m(3.), m(-4.), m(12.));
        assert_eq!(point.horizontal_distance().get::<meter>(), 5.);
        assert_eq!(point.distance_from_origin().get::<meter>(), 13.);

        assert_eq!(EnuPoint::origin().distance_from_origin(), m(0.));
    }

    #[test]
    fn build_matches_cartesian() {
        let built = EnuPoint::build(Components {
            north: m(50.),
            east: m(100.),
            up: m(30.),
        });
        assert_eq!(built, EnuPoint::from_cartesian(m(100.), m(50.), m(30.)));
        assert_eq!(built.east(), m(100.));
        assert_eq!(built.north(), m(50.));
        assert_eq!(built.up(), m(30.));
    }

    #[test]
    fn comparison_is_per_axis() {
        let a = EnuPoint::from_cartesian(m(1.), m(2.), m(3.));
        let b = EnuPoint::from_cartesian(m(1.0005), m(2.), m(2.9995));

        assert_relative_eq!(a, b, epsilon = m(0.001));
        assert_relative_ne!(a, b, epsilon = m(0.0001));
    }

    #[test]
    fn enu_display() {
        insta::assert_snapshot!(
            EnuPoint::from_cartesian(m(100.), m(-50.5), m(0.)).to_string(),
            @"E 100m, N -50.5m, U 0m"
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_uses_axis_names() {
        let point: EnuPoint = serde_json::from_str(r#"{"east": 100, "north": 50}"#).unwrap();
        assert_eq!(point, EnuPoint::from_cartesian(m(100.), m(50.), m(0.)));
    }
}
