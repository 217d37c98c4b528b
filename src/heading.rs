use crate::util::BoundedAngle;
use crate::{EnuPoint, GpsPoint, LocalFrame};
use std::fmt;
use std::fmt::Display;
use uom::si::angle::degree;
use uom::si::f64::Angle;

#[cfg(any(test, feature = "approx"))]
use approx::{AbsDiffEq, RelativeEq};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Converts a compass heading into an ENU heading, both in degrees.
///
/// Compass headings start at North and go clockwise (90° is East). ENU headings start at East
/// and go counter-clockwise (90° is North). The result is in [0°, 360°).
///
/// ```rust
/// use skyframe::compass_to_enu;
///
/// assert_eq!(compass_to_enu(0.), 90.); // North
/// assert_eq!(compass_to_enu(90.), 0.); // East
/// ```
#[must_use]
pub fn compass_to_enu(compass_degrees: f64) -> f64 {
    BoundedAngle::new(90. - compass_degrees).get_bounded()
}

/// Converts an ENU heading into a compass heading, both in degrees.
///
/// The conversion is its own inverse; see [`compass_to_enu`]. The result is in [0°, 360°).
///
/// ```rust
/// use skyframe::enu_to_compass;
///
/// assert_eq!(enu_to_compass(0.), 90.); // East
/// assert_eq!(enu_to_compass(90.), 0.); // North
/// ```
#[must_use]
pub fn enu_to_compass(enu_degrees: f64) -> f64 {
    BoundedAngle::new(90. - enu_degrees).get_bounded()
}

/// A heading in the ENU convention used by mission waypoints: 0° is East, 90° is North, 180° is
/// West, and 270° is South.
///
/// Note that this is _not_ a compass heading (see [`CompassHeading`]). The two convert into each
/// other with [`From`].
///
/// The value is always in [0°, 360°).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EnuHeading {
    #[cfg_attr(
        feature = "serde",
        serde(deserialize_with = "crate::util::deserialize_bounded_degrees")
    )]
    degrees: f64,
}

/// A heading in the compass convention: 0° is North, 90° is East, 180° is South, and 270° is
/// West.
///
/// The value is always in [0°, 360°).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CompassHeading {
    #[cfg_attr(
        feature = "serde",
        serde(deserialize_with = "crate::util::deserialize_bounded_degrees")
    )]
    degrees: f64,
}

impl EnuHeading {
    pub const EAST: Self = Self { degrees: 0. };
    pub const NORTH: Self = Self { degrees: 90. };
    pub const WEST: Self = Self { degrees: 180. };
    pub const SOUTH: Self = Self { degrees: 270. };

    /// Constructs an ENU heading from degrees counter-clockwise from East, wrapped into
    /// [0°, 360°).
    #[must_use]
    pub fn from_degrees(degrees: f64) -> Self {
        Self {
            degrees: BoundedAngle::new(degrees).get_bounded(),
        }
    }

    /// Constructs an ENU heading from an angle counter-clockwise from East.
    #[must_use]
    pub fn from_angle(angle: impl Into<Angle>) -> Self {
        Self::from_degrees(angle.into().get::<degree>())
    }

    /// Degrees counter-clockwise from East, in [0°, 360°).
    #[must_use]
    pub fn degrees(self) -> f64 {
        self.degrees
    }

    #[must_use]
    pub fn to_angle(self) -> Angle {
        Angle::new::<degree>(self.degrees)
    }

    /// The heading pointing the opposite way.
    #[must_use]
    pub fn reversed(self) -> Self {
        Self::from_degrees(self.degrees + 180.)
    }
}

impl CompassHeading {
    pub const NORTH: Self = Self { degrees: 0. };
    pub const EAST: Self = Self { degrees: 90. };
    pub const SOUTH: Self = Self { degrees: 180. };
    pub const WEST: Self = Self { degrees: 270. };

    /// Constructs a compass heading from degrees clockwise from North, wrapped into [0°, 360°).
    #[must_use]
    pub fn from_degrees(degrees: f64) -> Self {
        Self {
            degrees: BoundedAngle::new(degrees).get_bounded(),
        }
    }

    /// Constructs a compass heading from an angle clockwise from North.
    #[must_use]
    pub fn from_angle(angle: impl Into<Angle>) -> Self {
        Self::from_degrees(angle.into().get::<degree>())
    }

    /// Degrees clockwise from North, in [0°, 360°).
    #[must_use]
    pub fn degrees(self) -> f64 {
        self.degrees
    }

    #[must_use]
    pub fn to_angle(self) -> Angle {
        Angle::new::<degree>(self.degrees)
    }
}

impl From<CompassHeading> for EnuHeading {
    fn from(compass: CompassHeading) -> Self {
        Self {
            degrees: compass_to_enu(compass.degrees),
        }
    }
}

impl From<EnuHeading> for CompassHeading {
    fn from(enu: EnuHeading) -> Self {
        Self {
            degrees: enu_to_compass(enu.degrees),
        }
    }
}

impl Display for EnuHeading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}° ENU", self.degrees)
    }
}

impl Display for CompassHeading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}° compass", self.degrees)
    }
}

macro_rules! approx_via_bounded_angle {
    ($heading:ty) => {
        #[cfg(any(test, feature = "approx"))]
        impl AbsDiffEq<Self> for $heading {
            /// In degrees.
            type Epsilon = f64;

            fn default_epsilon() -> Self::Epsilon {
                BoundedAngle::default_epsilon()
            }

            fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
                BoundedAngle::new(self.degrees)
                    .abs_diff_eq(&BoundedAngle::new(other.degrees), epsilon)
            }
        }

        #[cfg(any(test, feature = "approx"))]
        impl RelativeEq for $heading {
            fn default_max_relative() -> Self::Epsilon {
                BoundedAngle::default_max_relative()
            }

            fn relative_eq(
                &self,
                other: &Self,
                epsilon: Self::Epsilon,
                max_relative: Self::Epsilon,
            ) -> bool {
                BoundedAngle::new(self.degrees).relative_eq(
                    &BoundedAngle::new(other.degrees),
                    epsilon,
                    max_relative,
                )
            }
        }
    };
}

approx_via_bounded_angle!(EnuHeading);
approx_via_bounded_angle!(CompassHeading);

impl EnuPoint {
    /// The ENU heading one would face at the origin to look at this point.
    ///
    /// A point straight above or below the origin (including the origin itself) has no
    /// well-defined heading; it is reported as East.
    #[must_use]
    pub fn heading_from_origin(&self) -> EnuHeading {
        // atan2(north, east) is the angle counter-clockwise from East
        EnuHeading::from_degrees(self.north.atan2(self.east).to_degrees())
    }
}

/// Computes the ENU heading to face `to` when standing at `from`.
///
/// The heading is measured in the tangent plane at `from`, so the points should be within about
/// 10 km of each other.
///
/// ```rust
/// use skyframe::{heading_between, CompassHeading, GpsPoint};
///
/// let drone = GpsPoint::from_degrees(37.79, -122.40).with_altitude(100.);
/// let target = GpsPoint::from_degrees(37.7897, -122.3972).with_altitude(50.);
///
/// let heading = heading_between(&drone, &target);
/// // the target is to the east, slightly south
/// assert!((heading.degrees() - 352.31).abs() < 0.01);
/// assert!((CompassHeading::from(heading).degrees() - 97.69).abs() < 0.01);
/// ```
#[must_use]
pub fn heading_between(from: &GpsPoint, to: &GpsPoint) -> EnuHeading {
    LocalFrame::at(*from).gps_to_enu(to).heading_from_origin()
}
