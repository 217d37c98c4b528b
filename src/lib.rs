//! This library provides the small amount of geodesy a drone mission planner needs: converting
//! between GPS coordinates and local East-North-Up (ENU) meters, and working out which way to
//! face and where to point a camera gimbal to look at something.
//!
//! Everything revolves around a [`LocalFrame`], a flat tangent plane anchored at an origin
//! [`GpsPoint`] on the WGS84 ellipsoid. Within it, positions are [`EnuPoint`]s: plain meters
//! east, north, and up of that origin. Mission geometry (circles, grids, offsets) is far easier
//! to express in meters than in degrees, so the usual flow is to pick an origin, lay out the
//! mission in ENU, and convert each point back to GPS.
//!
//! The frame is an approximation that ignores the curvature of the Earth. It is accurate to
//! well under a meter within roughly [10 km](ACCURATE_RANGE_IN_METERS) of its origin, and gets
//! quadratically worse beyond that; [`LocalFrame::approximation_error`] tells you by how much.
//!
//! Two heading conventions are in common use, and mixing them up points a drone the wrong way.
//! Mission waypoints use ENU headings (0° is East, counter-clockwise), whereas humans and
//! compasses use compass headings (0° is North, clockwise). The two are separate types,
//! [`EnuHeading`] and [`CompassHeading`], that convert into each other with [`From`].
//!
//! # Examples
//!
//! Plan a photo orbit of 36 waypoints, 80 m out and 100 m above a target:
//!
//! ```
//! use skyframe::{EnuPoint, GpsPoint, LocalFrame, Waypoint};
//! use uom::si::f64::Length;
//! use uom::si::length::meter;
//!
//! let target = GpsPoint::from_degrees(37.7897, -122.3972);
//! let frame = LocalFrame::at(target);
//!
//! let waypoints: Vec<_> = (0..36)
//!     .map(|i| {
//!         let angle = f64::from(i * 10).to_radians();
//!         let offset = EnuPoint::from_cartesian(
//!             Length::new::<meter>(80. * angle.cos()),
//!             Length::new::<meter>(80. * angle.sin()),
//!             Length::new::<meter>(100.),
//!         );
//!         Waypoint::builder(frame.enu_to_gps(&offset))
//!             .look_at(target)
//!             .photo(true)
//!             .build()
//!     })
//!     .collect();
//!
//! // every waypoint looks down at the target
//! assert!(waypoints.iter().all(|waypoint| waypoint.pitch().is_looking_down()));
//! ```
//!
//! The same mission is also available ready-made as [`orbit`].
//!
//! Point a drone at a target, and tell the pilot which way that is on their compass:
//!
//! ```
//! use skyframe::{distance_between, heading_between, pitch_to_target};
//! use skyframe::{CompassHeading, GpsPoint};
//! use uom::si::length::meter;
//!
//! let drone = GpsPoint::from_degrees(37.79, -122.40).with_altitude(100.);
//! let target = GpsPoint::from_degrees(37.7897, -122.3972).with_altitude(50.);
//!
//! let heading = heading_between(&drone, &target);
//! let compass = CompassHeading::from(heading);
//! let pitch = pitch_to_target(&drone, &target);
//! let distance = distance_between(&drone, &target);
//!
//! println!(
//!     "fly {compass} ({heading}), tilt the camera {pitch}, target is {:.0}m away",
//!     distance.get::<meter>()
//! );
//! ```

mod enu;
mod frame;
mod geodetic;
mod gimbal;
mod heading;
mod util;
mod waypoint;

pub(crate) type Point3 = nalgebra::Point3<f64>;
pub(crate) type Vector3 = nalgebra::Vector3<f64>;
pub(crate) type Matrix3 = nalgebra::Matrix3<f64>;

/// Parameters of the WGS84 reference ellipsoid.
pub mod wgs84 {
    pub use super::geodetic::{ECCENTRICITY_SQ, SEMI_MAJOR_AXIS, SEMI_MINOR_AXIS};
}

/// Builders for the types in this crate that have more than a couple of parts.
pub mod builder {
    /// Used to construct a [`GpsPoint`](crate::GpsPoint).
    pub mod gps {
        pub use crate::geodetic::{
            Builder, Components, HasLatitude, HasLongitude, MissingLatitude, MissingLongitude,
        };
    }

    /// Used to construct an [`EnuPoint`](crate::EnuPoint).
    pub mod enu {
        pub use crate::enu::Components;
    }

    /// Used to construct a [`Waypoint`](crate::Waypoint).
    pub mod waypoint {
        pub use crate::waypoint::Builder;
    }
}

pub use enu::EnuPoint;
pub use frame::{distance_between, LocalFrame, ACCURATE_RANGE_IN_METERS};
pub use geodetic::GpsPoint;
pub use gimbal::{pitch_to_target, GimbalPitch, VERTICAL_THRESHOLD_IN_METERS};
pub use heading::{compass_to_enu, enu_to_compass, heading_between, CompassHeading, EnuHeading};
pub use waypoint::{orbit, Waypoint, DEFAULT_SPEED_IN_METERS_PER_SECOND};
