use crate::Point3;
use std::fmt;
use std::fmt::Display;
use std::marker::PhantomData;
use uom::si::f64::{Angle, Length};
use uom::si::{angle::degree, length::meter};

#[cfg(any(test, feature = "approx"))]
use approx::{AbsDiffEq, RelativeEq};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[cfg(doc)]
use crate::LocalFrame;

// Parameters of the WGS84 ellipsoid, in the precision mission planning has always used them.
/// Equatorial radius of the WGS84 ellipsoid in meters.
#[doc(alias = "equatorial radius")]
#[doc(alias = "a")]
pub const SEMI_MAJOR_AXIS: f64 = 6_378_137.0;
/// Polar radius of the WGS84 ellipsoid in meters, rounded to the decimeter.
#[doc(alias = "polar radius")]
#[doc(alias = "b")]
pub const SEMI_MINOR_AXIS: f64 = 6_356_752.3;
/// First eccentricity squared of the WGS84 ellipsoid.
#[doc(alias = "e^2")]
// e^2 = 1 - b^2/a^2
pub const ECCENTRICITY_SQ: f64 =
    1.0 - (SEMI_MINOR_AXIS / SEMI_MAJOR_AXIS) * (SEMI_MINOR_AXIS / SEMI_MAJOR_AXIS);

/// Radius of curvature in the prime vertical (ie, east-west) at the given latitude, in meters.
///
/// <https://en.wikipedia.org/wiki/Earth_radius#Prime_vertical>
#[doc(alias = "N")]
pub(crate) fn prime_vertical_radius(latitude_in_radians: f64) -> f64 {
    SEMI_MAJOR_AXIS / (1. - ECCENTRICITY_SQ * latitude_in_radians.sin().powi(2)).sqrt()
}

/// Radius of curvature in the meridian (ie, north-south) at the given latitude, in meters.
///
/// <https://en.wikipedia.org/wiki/Earth_radius#Meridional>
#[doc(alias = "M")]
pub(crate) fn meridional_radius(latitude_in_radians: f64) -> f64 {
    SEMI_MAJOR_AXIS * (1. - ECCENTRICITY_SQ)
        / (1. - ECCENTRICITY_SQ * latitude_in_radians.sin().powi(2)).powf(1.5)
}

/// An Earth-bound location as reported by GPS: latitude and longitude on the WGS84 ellipsoid plus
/// an altitude.
///
/// The altitude's reference is up to the caller. Missions usually express it as height above the
/// takeoff point, and as long as every point handed to the same [`LocalFrame`] uses the same
/// reference, the conversions do not care.
///
/// No range checks are made on construction. Out-of-range latitudes and longitudes are not
/// rejected; they just produce meaningless results further down the line. Use
/// [`GpsPoint::is_in_range`] if the values come from somewhere you do not trust.
///
/// ```rust
/// use skyframe::GpsPoint;
///
/// // a building in San Francisco, flown at 100m above takeoff
/// let tower = GpsPoint::from_degrees(37.7897, -122.3972).with_altitude(100.);
/// assert_eq!(tower.to_string(), "37.7897°N, 122.3972°W, 100m");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GpsPoint {
    /// Degrees north of the equator.
    #[cfg_attr(feature = "serde", serde(rename = "lat"))]
    pub(crate) latitude: f64,
    /// Degrees east of the reference meridian.
    #[cfg_attr(feature = "serde", serde(rename = "lon"))]
    pub(crate) longitude: f64,
    /// Meters above the caller-chosen vertical reference.
    #[cfg_attr(feature = "serde", serde(rename = "alt", default))]
    pub(crate) altitude: f64,
}

impl GpsPoint {
    /// Constructs a location at the given latitude and longitude (both in degrees) with an
    /// altitude of 0.
    #[must_use]
    pub const fn from_degrees(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            altitude: 0.,
        }
    }

    /// Returns the same location at the given altitude (in meters).
    #[must_use]
    pub const fn with_altitude(self, meters: f64) -> Self {
        Self {
            altitude: meters,
            ..self
        }
    }

    /// Constructs a location from latitude, longitude, and altitude.
    #[must_use]
    pub fn build(
        Components {
            latitude,
            longitude,
            altitude,
        }: Components,
    ) -> Self {
        Self::builder()
            .latitude(latitude)
            .longitude(longitude)
            .altitude(altitude)
            .build()
    }

    /// Provides a constructor for a [`GpsPoint`].
    ///
    /// Latitude and longitude must be provided; the altitude defaults to 0.
    pub fn builder() -> Builder<MissingLatitude, MissingLongitude> {
        Builder {
            under_construction: GpsPoint::default(),
            has: (PhantomData, PhantomData),
        }
    }

    /// Returns the latitude ("northing").
    #[must_use]
    pub fn latitude(&self) -> Angle {
        Angle::new::<degree>(self.latitude)
    }

    /// Returns the longitude ("easting").
    #[must_use]
    pub fn longitude(&self) -> Angle {
        Angle::new::<degree>(self.longitude)
    }

    /// Returns the altitude above whatever reference the caller used.
    #[must_use]
    pub fn altitude(&self) -> Length {
        Length::new::<meter>(self.altitude)
    }

    /// Returns `true` if latitude is in [-90°, 90°] and longitude in [-180°, 180°].
    ///
    /// Nothing in this crate calls this for you.
    #[must_use]
    pub fn is_in_range(&self) -> bool {
        (-90. ..=90.).contains(&self.latitude) && (-180. ..=180.).contains(&self.longitude)
    }

    /// Converts this location to Earth-Centered, Earth-Fixed cartesian coordinates (x, y, z).
    ///
    /// The altitude is taken to be the height above the WGS84 ellipsoid. When it is really
    /// height above takeoff, the result is offset along the local vertical by the takeoff
    /// point's ellipsoidal height, which cancels out again when comparing two such points.
    ///
    /// See:
    /// <https://en.wikipedia.org/wiki/Geographic_coordinate_conversion#From_geodetic_to_ECEF_coordinates>
    #[must_use]
    pub fn to_ecef(&self) -> [Length; 3] {
        let point = self.ecef_point();
        [
            Length::new::<meter>(point.x),
            Length::new::<meter>(point.y),
            Length::new::<meter>(point.z),
        ]
    }

    pub(crate) fn ecef_point(&self) -> Point3 {
        let height_h = self.altitude;
        let lat_phi = self.latitude.to_radians();
        let lon_lambda = self.longitude.to_radians();

        let n_phi = prime_vertical_radius(lat_phi);

        let x = (n_phi + height_h) * lat_phi.cos() * lon_lambda.cos();
        let y = (n_phi + height_h) * lat_phi.cos() * lon_lambda.sin();
        let z = ((1. - ECCENTRICITY_SQ) * n_phi + height_h) * lat_phi.sin();

        Point3::new(x, y, z)
    }
}

impl Display for GpsPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lat = self.latitude.abs();
        let lon = self.longitude.abs();
        let alt = self.altitude;
        match (self.latitude >= 0., self.longitude >= 0.) {
            (true, true) => write!(f, "{lat}°N, {lon}°E, {alt}m"),
            (true, false) => write!(f, "{lat}°N, {lon}°W, {alt}m"),
            (false, true) => write!(f, "{lat}°S, {lon}°E, {alt}m"),
            (false, false) => write!(f, "{lat}°S, {lon}°W, {alt}m"),
        }
    }
}

#[cfg(any(test, feature = "approx"))]
impl AbsDiffEq<Self> for GpsPoint {
    type Epsilon = Length;

    fn default_epsilon() -> Self::Epsilon {
        Length::new::<meter>(0.001)
    }

    /// Two locations are equal if they are within `epsilon` of each other horizontally (measured
    /// in the tangent plane at `self`) and vertically.
    ///
    /// Longitudes either side of the antimeridian compare as far apart.
    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        crate::LocalFrame::at(*self)
            .gps_to_enu(other)
            .horizontal_distance()
            <= epsilon
            && self
                .altitude
                .abs_diff_eq(&other.altitude, epsilon.get::<meter>())
    }
}

#[cfg(any(test, feature = "approx"))]
impl RelativeEq for GpsPoint {
    fn default_max_relative() -> Self::Epsilon {
        Length::new::<meter>(f64::default_max_relative())
    }

    fn relative_eq(
        &self,
        other: &Self,
        epsilon: Self::Epsilon,
        max_relative: Self::Epsilon,
    ) -> bool {
        crate::LocalFrame::at(*self)
            .gps_to_enu(other)
            .horizontal_distance()
            .get::<meter>()
            .relative_eq(&0., epsilon.get::<meter>(), max_relative.get::<meter>())
            && self.altitude.relative_eq(
                &other.altitude,
                epsilon.get::<meter>(),
                max_relative.get::<meter>(),
            )
    }
}

/// Argument type for [`GpsPoint::build`].
#[derive(Debug, Default)]
#[must_use]
pub struct Components {
    /// The latitude angle of the proposed [`GpsPoint`].
    pub latitude: Angle,

    /// The longitude angle of the proposed [`GpsPoint`].
    pub longitude: Angle,

    /// The altitude of the proposed [`GpsPoint`].
    pub altitude: Length,
}

/// Used to indicate that a partially-constructed [`GpsPoint`] is missing the latitude component.
pub struct MissingLatitude;
/// Used to indicate that a partially-constructed [`GpsPoint`] has the latitude component set.
pub struct HasLatitude;
/// Used to indicate that a partially-constructed [`GpsPoint`] is missing the longitude component.
pub struct MissingLongitude;
/// Used to indicate that a partially-constructed [`GpsPoint`] has the longitude component set.
pub struct HasLongitude;

/// [Builder] for a [`GpsPoint`].
///
/// Construct one through [`GpsPoint::builder`], and finalize with [`Builder::build`].
///
/// [Builder]: https://rust-unofficial.github.io/patterns/patterns/creational/builder.html
#[derive(Debug)]
#[must_use]
pub struct Builder<Latitude, Longitude> {
    under_construction: GpsPoint,
    has: (PhantomData<Latitude>, PhantomData<Longitude>),
}

// manual impls of Clone and Copy to avoid requiring the markers to be Copy + Clone
impl<L1, L2> Clone for Builder<L1, L2> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<L1, L2> Copy for Builder<L1, L2> {}

impl<L1, L2> Builder<L1, L2> {
    /// Sets the latitude of the [`GpsPoint`]-to-be.
    pub fn latitude(mut self, latitude: impl Into<Angle>) -> Builder<HasLatitude, L2> {
        self.under_construction.latitude = latitude.into().get::<degree>();
        Builder {
            under_construction: self.under_construction,
            has: (PhantomData::<HasLatitude>, self.has.1),
        }
    }

    /// Sets the longitude of the [`GpsPoint`]-to-be.
    pub fn longitude(mut self, longitude: impl Into<Angle>) -> Builder<L1, HasLongitude> {
        self.under_construction.longitude = longitude.into().get::<degree>();
        Builder {
            under_construction: self.under_construction,
            has: (self.has.0, PhantomData::<HasLongitude>),
        }
    }

    /// Sets the altitude of the [`GpsPoint`]-to-be.
    pub fn altitude(mut self, altitude: impl Into<Length>) -> Self {
        self.under_construction.altitude = altitude.into().get::<meter>();
        self
    }
}

impl Builder<HasLatitude, HasLongitude> {
    #[must_use]
    pub fn build(self) -> GpsPoint {
        self.under_construction
    }
}
