use crate::core::series::IrradianceSample;
use crate::core::units::WATTS_PER_KILOWATT;
use crate::input::{DeclaredEfficiency, PanelArrayParameters};
use indexmap::IndexMap;
use serde::Serialize;

/// Expected yield computed directly from a declared system efficiency, with no
/// fitting involved: each irradiance sample (Wh/m2 over its interval) is scaled
/// by the array's useful area and the declared efficiency.
#[derive(Clone, Debug, Serialize)]
pub struct TheoreticalYield {
    pub total_kwh: f64,
    /// Yield grouped by the leading four digits of each sample's time label,
    /// in input order.
    pub yearly_kwh: IndexMap<String, f64>,
}

pub fn theoretical_yield(
    irradiance: &[IrradianceSample],
    parameters: &PanelArrayParameters,
    efficiency: DeclaredEfficiency,
) -> TheoreticalYield {
    let scale_factor =
        efficiency.as_fraction() * parameters.total_area_m2() / WATTS_PER_KILOWATT as f64;

    let mut total_kwh = 0.;
    let mut yearly_kwh: IndexMap<String, f64> = Default::default();
    for sample in irradiance {
        let kwh = sample.value * scale_factor;
        total_kwh += kwh;
        let year = sample.time.chars().take(4).collect::<String>();
        *yearly_kwh.entry(year).or_insert(0.) += kwh;
    }

    TheoreticalYield {
        total_kwh,
        yearly_kwh,
    }
}
