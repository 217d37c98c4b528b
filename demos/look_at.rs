use skyframe::{
    distance_between, heading_between, pitch_to_target, CompassHeading, EnuHeading, GimbalPitch,
    GpsPoint, Waypoint,
};
use uom::si::length::meter;

fn main() {
    let drone = GpsPoint::from_degrees(37.79, -122.40).with_altitude(100.);
    let target = GpsPoint::from_degrees(37.7897, -122.3972).with_altitude(50.);

    let heading = heading_between(&drone, &target);
    let pitch = pitch_to_target(&drone, &target);
    let distance = distance_between(&drone, &target);

    // the target is east and a little south of the drone, and below it
    assert!((352.0..353.0).contains(&heading.degrees()));
    assert!((97.0..98.0).contains(&CompassHeading::from(heading).degrees()));
    assert!(pitch.is_looking_down());

    println!("drone:    {drone}");
    println!("target:   {target}");
    println!("heading:  {heading} = {}", CompassHeading::from(heading));
    println!("pitch:    {pitch}");
    println!("distance: {:.1}m", distance.get::<meter>());

    // look-at fills in whatever was not set explicitly
    let waypoint = Waypoint::builder(drone)
        .look_at(target)
        .heading(CompassHeading::NORTH)
        .build();
    assert_eq!(waypoint.heading(), EnuHeading::NORTH);
    assert_eq!(waypoint.pitch(), pitch);

    // straight down is exact, which is what nadir shots rely on
    let below = drone.with_altitude(0.);
    assert_eq!(pitch_to_target(&drone, &below), GimbalPitch::STRAIGHT_DOWN);
}
