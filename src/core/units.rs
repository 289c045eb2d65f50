pub const WATTS_PER_KILOWATT: u32 = 1_000;

pub(crate) fn percent_to_fraction(percent: f64) -> f64 {
    percent / 100.
}

pub(crate) fn fraction_to_percent(fraction: f64) -> f64 {
    fraction * 100.
}
