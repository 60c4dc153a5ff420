use tubely_core::AspectClass;

const LANDSCAPE_RATIO: f64 = 16.0 / 9.0;
const PORTRAIT_RATIO: f64 = 9.0 / 16.0;
const TOLERANCE: f64 = 0.05;

/// Classify a stream by its width/height ratio.
///
/// A zero dimension is `Other`. Landscape is checked before portrait.
pub fn classify(width: u32, height: u32) -> AspectClass {
    if width == 0 || height == 0 {
        return AspectClass::Other;
    }

    let ratio = f64::from(width) / f64::from(height);

    if (ratio - LANDSCAPE_RATIO).abs() < TOLERANCE {
        AspectClass::Landscape
    } else if (ratio - PORTRAIT_RATIO).abs() < TOLERANCE {
        AspectClass::Portrait
    } else {
        AspectClass::Other
    }
}
