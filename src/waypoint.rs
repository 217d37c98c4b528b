use crate::{heading_between, pitch_to_target};
use crate::{EnuHeading, EnuPoint, GimbalPitch, GpsPoint, LocalFrame};
use std::f64::consts::TAU;
use uom::si::f64::{Length, Velocity};
use uom::si::length::meter;
use uom::si::velocity::meter_per_second;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Flight speed used by waypoints that don't set one, in meters per second.
pub const DEFAULT_SPEED_IN_METERS_PER_SECOND: f64 = 5.;

/// A single stop of a drone mission: where to fly, which way to face, where to point the
/// gimbal, how fast to get there, and whether to take a photo on arrival.
///
/// Construct one through [`Waypoint::builder`]:
///
/// ```rust
/// use skyframe::{heading_between, GpsPoint, Waypoint};
///
/// let position = GpsPoint::from_degrees(37.79, -122.40).with_altitude(100.);
/// let target = GpsPoint::from_degrees(37.7897, -122.3972).with_altitude(50.);
///
/// let waypoint = Waypoint::builder(position).look_at(target).photo(true).build();
/// assert_eq!(waypoint.heading(), heading_between(&position, &target));
/// assert!(waypoint.takes_photo());
/// ```
///
/// With the `serde` feature, a waypoint (de)serializes as a flat record with the keys
/// `latitude_deg`, `longitude_deg`, `altitude_m`, `heading_deg` (ENU), `pitch_deg`,
/// `speed_mps`, and `photo`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(from = "Record", into = "Record")
)]
pub struct Waypoint {
    position: GpsPoint,
    heading: EnuHeading,
    pitch: GimbalPitch,
    speed: Velocity,
    photo: bool,
}

impl Waypoint {
    /// Starts building a waypoint at `position`.
    pub fn builder(position: GpsPoint) -> Builder {
        Builder {
            position,
            look_at: None,
            heading: None,
            pitch: None,
            speed: Velocity::new::<meter_per_second>(DEFAULT_SPEED_IN_METERS_PER_SECOND),
            photo: false,
        }
    }

    #[must_use]
    pub fn position(&self) -> GpsPoint {
        self.position
    }

    #[must_use]
    pub fn heading(&self) -> EnuHeading {
        self.heading
    }

    #[must_use]
    pub fn pitch(&self) -> GimbalPitch {
        self.pitch
    }

    #[must_use]
    pub fn speed(&self) -> Velocity {
        self.speed
    }

    #[must_use]
    pub fn takes_photo(&self) -> bool {
        self.photo
    }
}

/// [Builder] for a [`Waypoint`].
///
/// Construct one through [`Waypoint::builder`], and finalize with [`Builder::build`].
///
/// [Builder]: https://rust-unofficial.github.io/patterns/patterns/creational/builder.html
#[derive(Debug, Clone, Copy)]
#[must_use]
pub struct Builder {
    position: GpsPoint,
    look_at: Option<GpsPoint>,
    heading: Option<EnuHeading>,
    pitch: Option<GimbalPitch>,
    speed: Velocity,
    photo: bool,
}

impl Builder {
    /// Points the drone and its gimbal at `target`.
    ///
    /// Only fills in the heading and pitch that are not set explicitly with
    /// [`Builder::heading`] or [`Builder::pitch`], regardless of call order.
    pub fn look_at(mut self, target: GpsPoint) -> Self {
        self.look_at = Some(target);
        self
    }

    pub fn heading(mut self, heading: impl Into<EnuHeading>) -> Self {
        self.heading = Some(heading.into());
        self
    }

    pub fn pitch(mut self, pitch: GimbalPitch) -> Self {
        self.pitch = Some(pitch);
        self
    }

    /// Defaults to [`DEFAULT_SPEED_IN_METERS_PER_SECOND`].
    pub fn speed(mut self, speed: impl Into<Velocity>) -> Self {
        self.speed = speed.into();
        self
    }

    /// Defaults to `false`.
    pub fn photo(mut self, photo: bool) -> Self {
        self.photo = photo;
        self
    }

    /// Heading and pitch fall back to what `look_at` implies, and then to East and level.
    #[must_use]
    pub fn build(self) -> Waypoint {
        let heading = self
            .heading
            .or_else(|| {
                self.look_at
                    .map(|target| heading_between(&self.position, &target))
            })
            .unwrap_or_default();
        let pitch = self
            .pitch
            .or_else(|| {
                self.look_at
                    .map(|target| pitch_to_target(&self.position, &target))
            })
            .unwrap_or_default();

        Waypoint {
            position: self.position,
            heading,
            pitch,
            speed: self.speed,
            photo: self.photo,
        }
    }
}

/// Plans `count` photo waypoints evenly spaced on a horizontal circle around `center`.
///
/// The circle has the given `radius` and lies `height` above the altitude of `center`. The
/// first waypoint is due East of `center` and the rest follow counter-clockwise (seen from
/// above). Every waypoint faces and points its gimbal at `center`.
///
/// ```rust
/// use skyframe::{orbit, GpsPoint};
/// use uom::si::f64::Length;
/// use uom::si::length::meter;
///
/// let target = GpsPoint::from_degrees(37.7897, -122.3972);
/// let waypoints = orbit(target, Length::new::<meter>(80.), Length::new::<meter>(100.), 36);
/// assert_eq!(waypoints.len(), 36);
/// assert!(waypoints.iter().all(|waypoint| waypoint.takes_photo()));
/// ```
#[must_use]
pub fn orbit(
    center: GpsPoint,
    radius: impl Into<Length>,
    height: impl Into<Length>,
    count: usize,
) -> Vec<Waypoint> {
    let frame = LocalFrame::at(center);
    let radius = radius.into().get::<meter>();
    let up = height.into().get::<meter>();
    tracing::trace!(%center, radius, up, count, "planning orbit");

    (0..count)
        .map(|i| {
            let angle = TAU * i as f64 / count as f64;
            let offset = EnuPoint::from_meters(radius * angle.cos(), radius * angle.sin(), up);
            Waypoint::builder(frame.enu_to_gps(&offset))
                .look_at(center)
                .photo(true)
                .build()
        })
        .collect()
}

#[cfg(feature = "serde")]
#[derive(Serialize, Deserialize)]
struct Record {
    latitude_deg: f64,
    longitude_deg: f64,
    altitude_m: f64,
    heading_deg: f64,
    pitch_deg: f64,
    speed_mps: f64,
    photo: bool,
}

#[cfg(feature = "serde")]
impl From<Waypoint> for Record {
    fn from(waypoint: Waypoint) -> Self {
        Self {
            latitude_deg: waypoint.position.latitude,
            longitude_deg: waypoint.position.longitude,
            altitude_m: waypoint.position.altitude,
            heading_deg: waypoint.heading.degrees(),
            pitch_deg: waypoint.pitch.degrees(),
            speed_mps: waypoint.speed.get::<meter_per_second>(),
            photo: waypoint.photo,
        }
    }
}

#[cfg(feature = "serde")]
impl From<Record> for Waypoint {
    fn from(record: Record) -> Self {
        Self {
            position: GpsPoint::from_degrees(record.latitude_deg, record.longitude_deg)
                .with_altitude(record.altitude_m),
            heading: EnuHeading::from_degrees(record.heading_deg),
            pitch: GimbalPitch::from_degrees(record.pitch_deg),
            speed: Velocity::new::<meter_per_second>(record.speed_mps),
            photo: record.photo,
        }
    }
}
