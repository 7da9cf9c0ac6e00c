// hf-core/src/units.rs

use uom::si::f64::{
    Area as UomArea, Length as UomLength, Time as UomTime, VolumeRate as UomVolumeRate,
};

// Public canonical unit types (SI, f64)
pub type Area = UomArea;
pub type Length = UomLength;
pub type Time = UomTime;
pub type Flow = UomVolumeRate;

#[inline]
pub fn m(v: f64) -> Length {
    use uom::si::length::meter;
    Length::new::<meter>(v)
}

#[inline]
pub fn mm(v: f64) -> Length {
    use uom::si::length::millimeter;
    Length::new::<millimeter>(v)
}

#[inline]
pub fn m3ps(v: f64) -> Flow {
    use uom::si::volume_rate::cubic_meter_per_second;
    Flow::new::<cubic_meter_per_second>(v)
}

#[inline]
pub fn hours(v: f64) -> Time {
    use uom::si::time::hour;
    Time::new::<hour>(v)
}

/// Cross-sectional area of a circular bore.
#[inline]
pub fn circle_area(diameter: Length) -> Area {
    diameter * diameter * (std::f64::consts::PI / 4.0)
}
