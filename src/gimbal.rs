use crate::{EnuPoint, GpsPoint, LocalFrame};
use std::fmt;
use std::fmt::Display;
use uom::si::angle::degree;
use uom::si::f64::Angle;
use uom::si::length::meter;

#[cfg(any(test, feature = "approx"))]
use approx::{AbsDiffEq, RelativeEq};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Below this horizontal distance, a target is treated as straight above or below.
pub const VERTICAL_THRESHOLD_IN_METERS: f64 = 0.001;

/// A gimbal pitch in degrees, where positive looks _down_ and negative looks up.
///
/// Pitches produced by [`pitch_to_target`] are in [-90°, 90°]: 90° is straight down (nadir) and
/// -90° is straight up.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GimbalPitch {
    degrees: f64,
}

impl GimbalPitch {
    /// Looking at the horizon.
    pub const LEVEL: Self = Self { degrees: 0. };
    /// Looking straight down.
    pub const STRAIGHT_DOWN: Self = Self { degrees: 90. };
    /// Looking straight up.
    pub const STRAIGHT_UP: Self = Self { degrees: -90. };

    /// Constructs a pitch from degrees below the horizon.
    ///
    /// The value is not clamped; mission planners may use values outside [-90°, 90°] for gimbals
    /// that can flip over.
    #[must_use]
    pub const fn from_degrees(degrees: f64) -> Self {
        Self { degrees }
    }

    /// Constructs a pitch from an angle below the horizon.
    #[must_use]
    pub fn from_angle(angle: impl Into<Angle>) -> Self {
        Self::from_degrees(angle.into().get::<degree>())
    }

    /// Degrees below the horizon (negative is above).
    #[must_use]
    pub fn degrees(self) -> f64 {
        self.degrees
    }

    #[must_use]
    pub fn to_angle(self) -> Angle {
        Angle::new::<degree>(self.degrees)
    }

    #[must_use]
    pub fn is_looking_down(self) -> bool {
        self.degrees > 0.
    }
}

impl Display for GimbalPitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.degrees < 0. {
            write!(f, "{}° up", -self.degrees)
        } else {
            write!(f, "{}° down", self.degrees)
        }
    }
}

#[cfg(any(test, feature = "approx"))]
impl AbsDiffEq<Self> for GimbalPitch {
    /// In degrees.
    type Epsilon = f64;

    fn default_epsilon() -> Self::Epsilon {
        0.000_000_1
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.degrees.abs_diff_eq(&other.degrees, epsilon)
    }
}

#[cfg(any(test, feature = "approx"))]
impl RelativeEq for GimbalPitch {
    fn default_max_relative() -> Self::Epsilon {
        f64::default_max_relative()
    }

    fn relative_eq(
        &self,
        other: &Self,
        epsilon: Self::Epsilon,
        max_relative: Self::Epsilon,
    ) -> bool {
        self.degrees
            .relative_eq(&other.degrees, epsilon, max_relative)
    }
}

impl EnuPoint {
    /// The gimbal pitch needed at the origin to look at this point.
    ///
    /// Points within [`VERTICAL_THRESHOLD_IN_METERS`] of the vertical axis get exactly
    /// [`GimbalPitch::STRAIGHT_DOWN`] if they are below the origin and
    /// [`GimbalPitch::STRAIGHT_UP`] otherwise. The origin itself therefore gets `STRAIGHT_UP`.
    #[must_use]
    pub fn pitch_from_origin(&self) -> GimbalPitch {
        let horizontal = self.horizontal_distance().get::<meter>();

        if horizontal < VERTICAL_THRESHOLD_IN_METERS {
            tracing::debug!(horizontal, up = self.up, "target is directly above or below");
            return if self.up < 0. {
                GimbalPitch::STRAIGHT_DOWN
            } else {
                GimbalPitch::STRAIGHT_UP
            };
        }

        // + 0. turns the -0 of a level target into 0
        GimbalPitch::from_degrees(-self.up.atan2(horizontal).to_degrees() + 0.)
    }
}

/// Computes the gimbal pitch for a camera at `from` to look at `to`.
///
/// Positive pitches look down. A target (nearly) straight below gives exactly 90°, and one
/// straight above gives exactly -90°.
///
/// ```rust
/// use skyframe::{pitch_to_target, GimbalPitch, GpsPoint};
///
/// let drone = GpsPoint::from_degrees(37.79, -122.40).with_altitude(100.);
/// let below = GpsPoint::from_degrees(37.79, -122.40).with_altitude(0.);
/// assert_eq!(pitch_to_target(&drone, &below), GimbalPitch::STRAIGHT_DOWN);
///
/// let target = GpsPoint::from_degrees(37.7897, -122.3972).with_altitude(50.);
/// assert!((pitch_to_target(&drone, &target).degrees() - 11.36).abs() < 0.01);
/// ```
#[must_use]
pub fn pitch_to_target(from: &GpsPoint, to: &GpsPoint) -> GimbalPitch {
    LocalFrame::at(*from).gps_to_enu(to).pitch_from_origin()
}
