//! Shows how far the flat tangent-plane frame drifts from the exact ellipsoidal answer as points
//! move away from its origin.

use skyframe::{EnuPoint, GpsPoint, LocalFrame, ACCURATE_RANGE_IN_METERS};
use uom::si::f64::Length;
use uom::si::length::meter;

fn main() {
    for latitude in [0., 37.79, 60.] {
        let frame = LocalFrame::at(GpsPoint::from_degrees(latitude, 10.));
        println!("origin {}", frame.origin());

        for distance in [100., 1_000., 5_000., ACCURATE_RANGE_IN_METERS, 50_000.] {
            // diagonally north-east, where both axes contribute
            let offset = distance / 2f64.sqrt();
            let point = frame.enu_to_gps(&EnuPoint::from_cartesian(
                Length::new::<meter>(offset),
                Length::new::<meter>(offset),
                Length::new::<meter>(0.),
            ));

            println!(
                "  {:>8.0}m away: off by {:>10.4}m{}",
                distance,
                frame.approximation_error(&point).get::<meter>(),
                if frame.is_within_accurate_range(&point) {
                    ""
                } else {
                    " (out of range)"
                }
            );
        }
    }
}
