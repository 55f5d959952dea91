//! Box geometry and dimensional weight.

use serde::{Deserialize, Serialize};

/// Outer dimensions plus board thickness, all in the active length unit.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoxDimensions {
    pub length: f64,
    pub width: f64,
    pub height: f64,
    pub board: f64,
}

impl BoxDimensions {
    pub fn inner(&self) -> [f64; 3] {
        let wall = 2.0 * self.board.max(0.0);
        [
            (self.length - wall).max(0.0),
            (self.width - wall).max(0.0),
            (self.height - wall).max(0.0),
        ]
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoxMetrics {
    pub outer_volume: f64,
    pub inner: [f64; 3],
    pub inner_volume: f64,
    pub surface_area: f64,
    /// In the weight unit of the divisor profile.
    pub volumetric_weight: f64,
}

pub fn box_metrics(dims: &BoxDimensions, divisor: f64) -> BoxMetrics {
    let divisor = if divisor.is_finite() && divisor > 0.0 {
        divisor
    } else {
        1.0
    };
    let BoxDimensions {
        length: l,
        width: w,
        height: h,
        ..
    } = *dims;

    let outer_volume = l * w * h;
    let inner = dims.inner();
    let inner_volume = inner.iter().product();
    let surface_area = 2.0 * (l * w + l * h + w * h);

    BoxMetrics {
        outer_volume,
        inner,
        inner_volume,
        surface_area,
        volumetric_weight: outer_volume / divisor,
    }
}

/// Billable weight: the heavier of actual and volumetric, unless no actual
/// weight was entered.
pub fn chargeable_weight(actual: f64, volumetric: f64) -> f64 {
    if actual > 0.0 {
        actual.max(volumetric)
    } else {
        volumetric
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn mailer_example_matches_expected_geometry() {
        let dims = BoxDimensions {
            length: 30.0,
            width: 22.0,
            height: 10.0,
            board: 0.2,
        };
        let metrics = box_metrics(&dims, 5000.0);
        assert!(close(metrics.outer_volume, 6600.0));
        assert!(close(metrics.inner[0], 29.6));
        assert!(close(metrics.inner[1], 21.6));
        assert!(close(metrics.inner[2], 9.6));
        assert!(close(metrics.volumetric_weight, 1.32));
        assert!(close(metrics.surface_area, 2.0 * (660.0 + 300.0 + 220.0)));
        assert!(close(chargeable_weight(0.0, metrics.volumetric_weight), 1.32));
    }

    #[test]
    fn thick_board_floors_inner_dimensions_at_zero() {
        let dims = BoxDimensions {
            length: 1.0,
            width: 5.0,
            height: 5.0,
            board: 2.0,
        };
        let metrics = box_metrics(&dims, 5000.0);
        assert_eq!(metrics.inner[0], 0.0);
        assert_eq!(metrics.inner[1], 1.0);
        assert_eq!(metrics.inner_volume, 0.0);
    }

    #[test]
    fn invalid_divisor_defaults_to_one() {
        let dims = BoxDimensions {
            length: 2.0,
            width: 3.0,
            height: 4.0,
            board: 0.0,
        };
        assert_eq!(box_metrics(&dims, 0.0).volumetric_weight, 24.0);
        assert_eq!(box_metrics(&dims, f64::NAN).volumetric_weight, 24.0);
    }

    #[test]
    fn actual_weight_only_counts_when_positive() {
        for actual in [-5.0, -0.001, 0.0] {
            assert_eq!(chargeable_weight(actual, 1.7), 1.7);
        }
        assert_eq!(chargeable_weight(2.5, 1.7), 2.5);
        assert_eq!(chargeable_weight(0.5, 1.7), 1.7);
    }
}
