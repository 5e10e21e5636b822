//! Callendar-Van Dusen conversion from raw RTD code to degrees Celsius

/// Full scale of the 15-bit RTD code
pub const RTD_FULL_SCALE: f32 = 32768.0;

const RTD_A: f32 = 3.9083e-3;
const RTD_B: f32 = -5.775e-7;

/// Resistance in ohms for a raw 15-bit RTD code
#[must_use]
pub fn resistance(raw: u16, reference: f32) -> f32 {
    f32::from(raw) / RTD_FULL_SCALE * reference
}

/// Temperature in degrees Celsius for a raw 15-bit RTD code
///
/// `nominal` is the RTD resistance at 0 °C (100 for a PT100) and
/// `reference` the value of the reference resistor on the board.
///
/// The quadratic Callendar-Van Dusen solution is used when it yields a
/// non-negative temperature; below 0 °C a fifth order polynomial fit takes
/// over.
#[must_use]
pub fn temperature(raw: u16, nominal: f32, reference: f32) -> f32 {
    let rt = resistance(raw, reference);

    let temp = quadratic(rt, nominal);
    if temp >= 0.0 {
        return temp;
    }

    polynomial(rt, nominal)
}

pub(crate) fn quadratic(rt: f32, nominal: f32) -> f32 {
    let z1 = -RTD_A;
    let z2 = RTD_A * RTD_A - (4.0 * RTD_B);
    let z3 = (4.0 * RTD_B) / nominal;
    let z4 = 2.0 * RTD_B;

    (libm::sqrtf(z2 + (z3 * rt)) + z1) / z4
}

// The nominal resistance enters once, at the cubic term, and carries into
// the higher powers.
pub(crate) fn polynomial(rt: f32, nominal: f32) -> f32 {
    let rt = rt / nominal * 100.0;

    let mut rpoly = rt;
    let mut temp = -242.02;
    temp += 2.2228 * rpoly;
    rpoly *= rt;
    temp += 2.5859e-3 * rpoly;
    rpoly *= nominal;
    temp -= 4.8260e-6 * rpoly;
    rpoly *= rt;
    temp -= 2.8183e-8 * rpoly;
    rpoly *= rt;
    temp += 1.5243e-10 * rpoly;

    temp
}
