//! EPA piecewise-linear conversion from a PM2.5 concentration to an AQI.
//!
//! The breakpoint table is the official non-overlapping one: the high end
//! of each concentration band (e.g. 350.4) deliberately differs from the
//! next band's threshold (350.5). Keep the literals exactly as published.

/// Linear interpolation within one breakpoint band, truncated toward zero
/// per the EPA formula (not rounded to nearest).
fn interpolate(cp: f64, ih: f64, il: f64, bph: f64, bpl: f64) -> u16 {
    ((ih - il) / (bph - bpl) * (cp - bpl) + il) as u16
}

/// Convert a PM2.5 concentration (µg/m³) to an AQI in 0..=500.
///
/// Returns `None` for negative concentrations and for NaN (an empty
/// sensor set averages to NaN, which falls through every band test).
pub fn aqi_from_pm25(pm25: f64) -> Option<u16> {
    if pm25 > 350.5 {
        Some(interpolate(pm25, 500.0, 401.0, 500.0, 350.5))
    } else if pm25 > 250.5 {
        Some(interpolate(pm25, 400.0, 301.0, 350.4, 250.5))
    } else if pm25 > 150.5 {
        Some(interpolate(pm25, 300.0, 201.0, 250.4, 150.5))
    } else if pm25 > 55.5 {
        Some(interpolate(pm25, 200.0, 151.0, 150.4, 55.5))
    } else if pm25 > 35.5 {
        Some(interpolate(pm25, 150.0, 101.0, 55.4, 35.5))
    } else if pm25 > 12.1 {
        Some(interpolate(pm25, 100.0, 51.0, 35.4, 12.1))
    } else if pm25 >= 0.0 {
        Some(interpolate(pm25, 50.0, 0.0, 12.0, 0.0))
    } else {
        None
    }
}
