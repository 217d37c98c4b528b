//! Plans a photo orbit around a target and prints it as the JSON waypoint list that mission
//! assembly consumes.

use skyframe::{orbit, CompassHeading, GpsPoint};
use uom::si::f64::Length;
use uom::si::length::meter;

fn main() {
    let target = GpsPoint::from_degrees(37.7897, -122.3972);
    let waypoints = orbit(
        target,
        Length::new::<meter>(80.),
        Length::new::<meter>(100.),
        36,
    );

    for (i, waypoint) in waypoints.iter().enumerate() {
        eprintln!(
            "#{i:02} {} facing {} with the camera {}",
            waypoint.position(),
            CompassHeading::from(waypoint.heading()),
            waypoint.pitch()
        );
    }

    println!(
        "{}",
        serde_json::to_string_pretty(&waypoints).expect("waypoints are plain numbers")
    );
}
