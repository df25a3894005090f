//! Sub-interval selection and interpolation of one stored series.
//!
//! A block splits each target's time span into `sub_interval_count` equal
//! pieces. [`HorizonRecord::select`] picks the piece covering a date and
//! [`HorizonRecord::interpolate`] evaluates its components.
use crate::ephem_errors::EphemError;

use super::{chebyshev::ChebyshevBasis, horizon_header::CoefficientLayout};

/// One target's coefficients over a **single sub-interval** of a block.
///
/// A `HorizonRecord` borrows the component series of one target directly from
/// a cached block, along with the normalised time at which they must be
/// evaluated.
///
/// Fields
/// --------
/// * `coefficients` — `component_count × coefficients_per_component` doubles,
///   components stored one after the other.
/// * `coefficients_per_component` — Chebyshev terms per component.
/// * `component_count` — Components stored for the target.
/// * `t` — Normalised time ∈ \[-1, 1\] inside the sub-interval.
/// * `velocity_scale` — Factor converting d/dt to d/day,
///   `2 · sub_interval_count / block_interval`.
///
/// See also
/// --------
/// * [`super::target_resolver::TargetResolver`] — combines records into body states.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HorizonRecord<'a> {
    coefficients: &'a [f64],
    coefficients_per_component: usize,
    component_count: usize,
    t: f64,
    velocity_scale: f64,
}

impl<'a> HorizonRecord<'a> {
    /// Select the sub-interval of `layout` containing `fraction`.
    ///
    /// Arguments
    /// -----------------
    /// * `block` — Whole coefficient block, including the two leading dates.
    /// * `layout` — Placement of the target inside the block.
    /// * `fraction` — Position of the date inside the block ∈ \[0, 1\].
    /// * `block_interval` — Length of the block in days.
    ///
    /// Return
    /// ----------
    /// * The record, or [`EphemError::Format`] when the layout runs past the
    ///   end of the block.
    ///
    /// Notes
    /// ----------
    /// * Sub-interval `min(⌊fraction · n⌋, n − 1)`, so that the block end
    ///   evaluates the last sub-interval at `t = 1`.
    pub fn select(
        block: &'a [f64],
        layout: &CoefficientLayout,
        fraction: f64,
        block_interval: f64,
    ) -> Result<Self, EphemError> {
        if !layout.is_present() {
            return Err(EphemError::Format(
                "cannot select a sub-interval of an absent target".into(),
            ));
        }
        if block.len() < layout.end() {
            return Err(EphemError::Format(format!(
                "layout ends at coefficient {} but the block holds {}",
                layout.end(),
                block.len()
            )));
        }

        let nsub = layout.sub_interval_count;
        let scaled = fraction * nsub as f64;
        let sub = (scaled.floor() as usize).min(nsub - 1);
        let t = 2.0 * (scaled - sub as f64) - 1.0;

        let len = layout.sub_interval_len();
        let start = layout.offset + sub * len;

        Ok(HorizonRecord {
            coefficients: &block[start..start + len],
            coefficients_per_component: layout.coefficients_per_component,
            component_count: layout.component_count,
            t,
            velocity_scale: 2.0 * nsub as f64 / block_interval,
        })
    }

    pub fn normalized_time(&self) -> f64 {
        self.t
    }

    /// Series of component `index`, `None` past the last component.
    pub fn component(&self, index: usize) -> Option<&'a [f64]> {
        if index >= self.component_count {
            return None;
        }
        let n = self.coefficients_per_component;
        self.coefficients.get(index * n..(index + 1) * n)
    }

    /// Evaluate the first `N` components.
    ///
    /// The Chebyshev basis is computed once and applied to each component.
    ///
    /// Return
    /// ----------
    /// * `(values, rates)` with rates in units per day when `with_velocity`.
    /// * [`EphemError::Format`] when the target stores fewer than `N`
    ///   components.
    pub fn interpolate<const N: usize>(
        &self,
        with_velocity: bool,
    ) -> Result<([f64; N], Option<[f64; N]>), EphemError> {
        if N > self.component_count {
            return Err(EphemError::Format(format!(
                "{N} components requested from a series storing {}",
                self.component_count
            )));
        }
        let basis = ChebyshevBasis::new(self.t, self.coefficients_per_component, with_velocity);

        let mut values = [0.0; N];
        let mut rates = [0.0; N];
        let components = self
            .coefficients
            .chunks_exact(self.coefficients_per_component)
            .take(N);
        for (i, series) in components.enumerate() {
            values[i] = basis.value(series);
            if let Some(deriv) = basis.derivative(series) {
                rates[i] = deriv * self.velocity_scale;
            }
        }

        Ok((values, with_velocity.then_some(rates)))
    }
}
