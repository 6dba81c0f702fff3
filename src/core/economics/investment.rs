use serde::{Deserialize, Serialize};

use crate::{
    core::error::{ConfigurationError, NumericalError},
    prelude::*,
    quantity::{currency::Euros, power::Kilowatts, price::KilowattPrice},
};

/// Discounted cash flow settings.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InvestmentParameters {
    /// Annual discount rate as a proportion, `0.05` is 5%.
    pub discount_rate: f64,

    /// Evaluation horizon in years.
    pub horizon: u32,

    /// Installed cost of the wind turbine.
    pub wind_unit_cost: KilowattPrice,

    /// Annual wind maintenance as a proportion of the wind installed cost.
    pub wind_maintenance: f64,

    /// Annual public incentive credited to the wind turbine revenue.
    pub wind_government_aid: Euros,

    /// CHP installed cost at 1 MWe.
    pub chp_coefficient: Euros,

    /// Economy-of-scale exponent of the CHP installed cost.
    pub chp_exponent: f64,
}

impl Default for InvestmentParameters {
    fn default() -> Self {
        Self {
            discount_rate: 0.05,
            horizon: 20,
            wind_unit_cost: KilowattPrice(1000.0),
            wind_maintenance: 0.03,
            wind_government_aid: Euros::ZERO,
            chp_coefficient: Euros(2_000_000.0),
            chp_exponent: 0.868,
        }
    }
}

impl InvestmentParameters {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if !self.discount_rate.is_finite() || self.discount_rate <= -1.0 {
            return Err(ConfigurationError::DiscountRate(self.discount_rate));
        }
        if self.horizon == 0 {
            return Err(ConfigurationError::Horizon);
        }
        for (name, value) in [
            ("investment.wind_unit_cost", self.wind_unit_cost.0),
            ("investment.wind_maintenance", self.wind_maintenance),
            ("investment.wind_government_aid", self.wind_government_aid.0),
            ("investment.chp_coefficient", self.chp_coefficient.0),
            ("investment.chp_exponent", self.chp_exponent),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigurationError::Negative { name, value });
            }
        }
        Ok(())
    }

    pub fn wind_cost(&self, rated_power: Kilowatts) -> Euros {
        rated_power * self.wind_unit_cost
    }

    pub fn wind_maintenance_cost(&self, rated_power: Kilowatts) -> Euros {
        self.wind_cost(rated_power) * self.wind_maintenance
    }

    pub fn chp_cost(&self, electric_power: Kilowatts) -> Euros {
        self.chp_coefficient * (electric_power.0 / 1000.0).powf(self.chp_exponent)
    }
}

/// Net present value of `cash_flows`, the first one at year zero.
#[must_use]
pub fn net_present_value(cash_flows: &[f64], rate: f64) -> f64 {
    cash_flows
        .iter()
        .zip(0..)
        .map(|(cash_flow, year)| cash_flow / (1.0 + rate).powi(year))
        .sum()
}

/// Bracket searched for the internal rate of return, as proportions.
const IRR_RANGE: (f64, f64) = (-0.99, 10.0);
const IRR_SCAN_STEP: f64 = 0.01;
const IRR_TOLERANCE: f64 = 1e-10;
const IRR_MAX_ITERATIONS: usize = 200;

/// Find the rate which zeroes the net present value.
///
/// Scans the range for the first sign change, then bisects the bracketing interval.
#[instrument(skip_all, fields(n_years = cash_flows.len()))]
pub fn internal_rate_of_return(cash_flows: &[f64]) -> Result<f64, NumericalError> {
    let (lower, upper) = IRR_RANGE;
    let mut bracket = None;
    let mut previous = (lower, net_present_value(cash_flows, lower));
    let mut step = 1_u32;
    loop {
        let rate = f64::from(step).mul_add(IRR_SCAN_STEP, lower).min(upper);
        let value = net_present_value(cash_flows, rate);
        if previous.1 == 0.0 {
            return Ok(previous.0);
        }
        if previous.1.signum() != value.signum() {
            bracket = Some((previous, (rate, value)));
            break;
        }
        if rate >= upper {
            break;
        }
        previous = (rate, value);
        step += 1;
    }
    let Some(((mut low, mut low_value), (mut high, _))) = bracket else {
        return Err(NumericalError::NoSignChange { lower: lower * 100.0, upper: upper * 100.0 });
    };
    for _ in 0..IRR_MAX_ITERATIONS {
        let middle = 0.5 * (low + high);
        let value = net_present_value(cash_flows, middle);
        if value == 0.0 || (high - low) < IRR_TOLERANCE {
            debug!(rate = middle, "found the internal rate of return");
            return Ok(middle);
        }
        if value.signum() == low_value.signum() {
            (low, low_value) = (middle, value);
        } else {
            high = middle;
        }
    }
    Err(NumericalError::NotConverged(IRR_MAX_ITERATIONS))
}

/// A one-off investment returning a constant annual saving.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CapitalProject {
    pub investment: Euros,
    pub annual_saving: Euros,
    pub discount_rate: f64,
    pub horizon: u32,
}

impl CapitalProject {
    pub fn cash_flows(&self) -> Vec<f64> {
        std::iter::once(-self.investment.0)
            .chain(std::iter::repeat_n(self.annual_saving.0, self.horizon as usize))
            .collect()
    }

    pub fn net_present_value(&self) -> Euros {
        Euros(net_present_value(&self.cash_flows(), self.discount_rate))
    }

    /// Simple payback period in years.
    pub fn payback(&self) -> Result<f64, NumericalError> {
        self.ensure_positive_saving()?;
        Ok(self.investment / self.annual_saving)
    }

    pub fn profitability_index(&self) -> f64 {
        (self.net_present_value() + self.investment) / self.investment
    }

    pub fn internal_rate_of_return(&self) -> Result<f64, NumericalError> {
        self.ensure_positive_saving()?;
        internal_rate_of_return(&self.cash_flows())
    }

    const fn ensure_positive_saving(&self) -> Result<(), NumericalError> {
        if self.annual_saving.0 > 0.0 { Ok(()) } else { Err(NumericalError::NonPositiveSaving) }
    }
}

/// Investment metrics, each one either defined or carrying the reason it is not.
#[must_use]
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CapitalMetrics {
    pub investment: Euros,
    pub annual_saving: Euros,

    /// Simple payback period in years.
    pub payback: Result<f64, NumericalError>,

    pub net_present_value: Euros,
    pub profitability_index: f64,

    /// Internal rate of return as a proportion.
    pub internal_rate_of_return: Result<f64, NumericalError>,
}

impl From<CapitalProject> for CapitalMetrics {
    fn from(project: CapitalProject) -> Self {
        let internal_rate_of_return = project.internal_rate_of_return();
        match &internal_rate_of_return {
            Ok(rate) => info!(rate, "evaluated the internal rate of return"),
            Err(error) => warn!(%error, "the internal rate of return is undefined"),
        }
        Self {
            investment: project.investment,
            annual_saving: project.annual_saving,
            payback: project.payback(),
            net_present_value: project.net_present_value(),
            profitability_index: project.profitability_index(),
            internal_rate_of_return,
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    use super::*;

    fn project(investment: f64, annual_saving: f64) -> CapitalProject {
        CapitalProject {
            investment: Euros(investment),
            annual_saving: Euros(annual_saving),
            discount_rate: 0.05,
            horizon: 20,
        }
    }

    #[test]
    fn test_twenty_year_project() {
        let project = project(1_000_000.0, 150_000.0);
        let npv = project.net_present_value();
        assert!(npv > Euros::ZERO);
        // 150 000 × 12.4622 annuity factor:
        assert_relative_eq!(npv.0, 869_331.5, max_relative = 1e-5);

        let irr = project.internal_rate_of_return().unwrap();
        assert!(irr > 0.05);
        assert_abs_diff_eq!(net_present_value(&project.cash_flows(), irr), 0.0, epsilon = 1e-3);

        assert_abs_diff_eq!(project.payback().unwrap(), 1_000_000.0 / 150_000.0, epsilon = 1e-12);
        assert_relative_eq!(project.profitability_index(), 1.8693315, max_relative = 1e-5);
    }

    #[test]
    fn test_non_positive_saving() {
        let project = project(1_000_000.0, -10_000.0);
        assert_eq!(project.payback(), Err(NumericalError::NonPositiveSaving));
        assert_eq!(project.internal_rate_of_return(), Err(NumericalError::NonPositiveSaving));
        assert!(project.net_present_value() < Euros(-1_000_000.0));

        let metrics = CapitalMetrics::from(self::project(1_000_000.0, 0.0));
        assert_eq!(metrics.payback, Err(NumericalError::NonPositiveSaving));
        assert_eq!(metrics.internal_rate_of_return, Err(NumericalError::NonPositiveSaving));
    }

    #[test]
    fn test_no_sign_change() {
        // Never pays back within the horizon, even at -99%:
        assert!(matches!(
            internal_rate_of_return(&[-1.0, -1.0]),
            Err(NumericalError::NoSignChange { .. }),
        ));
    }

    #[test]
    fn test_known_rate() {
        // 100 invested, 110 back after a year.
        let irr = internal_rate_of_return(&[-100.0, 110.0]).unwrap();
        assert_abs_diff_eq!(irr, 0.1, epsilon = 1e-8);
    }

    #[test]
    fn test_capital_costs() {
        let parameters = InvestmentParameters::default();
        assert_abs_diff_eq!(parameters.wind_cost(Kilowatts(4000.0)).0, 4_000_000.0);
        assert_abs_diff_eq!(
            parameters.wind_maintenance_cost(Kilowatts(4000.0)).0,
            120_000.0,
            epsilon = 1e-6,
        );
        assert_abs_diff_eq!(parameters.chp_cost(Kilowatts(1000.0)).0, 2_000_000.0);
        assert_relative_eq!(
            parameters.chp_cost(Kilowatts(800.0)).0,
            2_000_000.0 * 0.8_f64.powf(0.868),
            max_relative = 1e-12,
        );
    }

    #[test]
    fn test_invalid_parameters() {
        let parameters = InvestmentParameters { discount_rate: -1.0, ..Default::default() };
        assert_eq!(parameters.validate(), Err(ConfigurationError::DiscountRate(-1.0)));
        let parameters = InvestmentParameters { horizon: 0, ..Default::default() };
        assert_eq!(parameters.validate(), Err(ConfigurationError::Horizon));
        let parameters =
            InvestmentParameters { wind_government_aid: Euros(-1.0), ..Default::default() };
        assert_eq!(
            parameters.validate(),
            Err(ConfigurationError::Negative {
                name: "investment.wind_government_aid",
                value: -1.0,
            }),
        );
    }
}
