/// Half-open slice of an amount reimbursed at a single marginal rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Band {
    pub lower: f64,
    pub upper: f64,
    pub rate: f64,
}

impl Band {
    pub(crate) fn new(lower: f64, upper: f64, rate: f64) -> Self {
        Self { lower, upper, rate }
    }

    fn portion(&self, amount: f64) -> f64 {
        (amount.min(self.upper) - self.lower).max(0.0)
    }
}

/// Sums each band's rate over the part of `amount` falling inside that band.
pub(crate) fn progressive(amount: f64, bands: &[Band]) -> f64 {
    bands.iter().map(|band| band.portion(amount) * band.rate).sum()
}

/// Builds contiguous bands from ascending breakpoints. Breakpoints that go backwards are
/// raised to the previous one so the schedule stays continuous.
pub(crate) fn bands_from_breakpoints(breakpoints: &[f64], rates: &[f64]) -> Vec<Band> {
    debug_assert_eq!(breakpoints.len() + 1, rates.len());

    let mut bands = Vec::with_capacity(rates.len());
    let mut lower = 0.0_f64;
    for (index, rate) in rates.iter().enumerate() {
        let upper = breakpoints
            .get(index)
            .map(|point| point.max(lower))
            .unwrap_or(f64::INFINITY);
        bands.push(Band::new(lower, upper, *rate));
        lower = upper;
    }
    bands
}
