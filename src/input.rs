use crate::core::units::percent_to_fraction;
use serde::Serialize;
use thiserror::Error;

/// This module contains the request parameters handed over by the calling
/// collaborator (the installation form in the original deployment), validated
/// on construction so the numeric pipeline never sees a bad value.

#[derive(Clone, Copy, Debug, Serialize)]
pub struct PanelArrayParameters {
    num_panels: u32,
    panel_area_m2: f64,
}

impl PanelArrayParameters {
    pub fn new(num_panels: u32, panel_area_m2: f64) -> Result<Self, ParameterError> {
        if num_panels < 1 {
            return Err(ParameterError::NoPanels);
        }
        if !panel_area_m2.is_finite() || panel_area_m2 <= 0. {
            return Err(ParameterError::NonPositivePanelArea(panel_area_m2));
        }
        Ok(Self {
            num_panels,
            panel_area_m2,
        })
    }

    pub fn num_panels(&self) -> u32 {
        self.num_panels
    }

    pub fn panel_area_m2(&self) -> f64 {
        self.panel_area_m2
    }

    /// Combined useful collector area of the array.
    pub(crate) fn total_area_m2(&self) -> f64 {
        self.num_panels as f64 * self.panel_area_m2
    }
}

/// A declared overall system efficiency for the theoretical path, as a
/// percentage in [0, 100].
#[derive(Clone, Copy, Debug, Serialize)]
pub struct DeclaredEfficiency(f64);

impl DeclaredEfficiency {
    pub fn new(percent: f64) -> Result<Self, ParameterError> {
        if !percent.is_finite() || !(0. ..=100.).contains(&percent) {
            return Err(ParameterError::EfficiencyOutOfRange(percent));
        }
        Ok(Self(percent))
    }

    pub fn as_percent(&self) -> f64 {
        self.0
    }

    pub(crate) fn as_fraction(&self) -> f64 {
        percent_to_fraction(self.0)
    }
}

#[derive(Debug, Error)]
pub enum ParameterError {
    #[error("the number of panels must be at least 1")]
    NoPanels,
    #[error("the useful area of each panel must be greater than 0 m² (was {0})")]
    NonPositivePanelArea(f64),
    #[error("the overall system efficiency must be a percentage between 0 and 100 (was {0})")]
    EfficiencyOutOfRange(f64),
}
