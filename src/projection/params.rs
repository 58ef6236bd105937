//! Calculator inputs: the parameter set, its fields, and single-field edits.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Chart and report display mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// Per-year costs.
    #[default]
    Annual,
    /// Running totals since year 1.
    Cumulative,
}

impl ViewMode {
    /// Query-string spelling of the mode.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Annual => "annual",
            Self::Cumulative => "cumulative",
        }
    }

    /// Returns the other mode.
    pub fn toggled(self) -> Self {
        match self {
            Self::Annual => Self::Cumulative,
            Self::Cumulative => Self::Annual,
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string names neither view mode.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown view mode \"{0}\", expected \"annual\" or \"cumulative\"")]
pub struct ParseViewModeError(pub String);

impl FromStr for ViewMode {
    type Err = ParseViewModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "annual" => Ok(Self::Annual),
            "cumulative" => Ok(Self::Cumulative),
            other => Err(ParseViewModeError(other.to_string())),
        }
    }
}

/// Utility, PPA and purchase inputs for one projection.
///
/// Rates are in $/kWh, escalators are fractional annual growth
/// (`0.035` = 3.5%), costs are in dollars.
///
/// # Examples
///
/// ```
/// use solar_savings::projection::params::{ParameterSet, ViewMode};
///
/// let p = ParameterSet::default();
/// assert_eq!(p.usage, 14354.0);
/// assert_eq!(p.view, ViewMode::Annual);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParameterSet {
    /// Annual consumption (kWh).
    pub usage: f64,
    /// Utility rate in year 1 ($/kWh).
    pub utility_rate: f64,
    /// Utility annual escalation (fraction).
    pub utility_esc: f64,
    /// PPA rate in year 1 ($/kWh).
    pub ppa_rate: f64,
    /// PPA annual escalator (fraction).
    pub ppa_esc: f64,
    /// Whether the battery subscription is included.
    pub include_battery: bool,
    /// Net metering credit ($/kWh exported).
    pub net_metering_credit: f64,
    /// Purchase price of the system before tax credit ($).
    pub system_cost: f64,
    /// Annual maintenance for a purchased system ($).
    pub maintenance: f64,
    /// Investment tax credit fraction (0.0 to 1.0).
    pub itc: f64,
    /// Active display mode.
    pub view: ViewMode,
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self {
            usage: 14354.0,
            utility_rate: 0.38,
            utility_esc: 0.09,
            ppa_rate: 0.22,
            ppa_esc: 0.035,
            include_battery: false,
            net_metering_credit: 0.10,
            system_cost: 45000.0,
            maintenance: 200.0,
            itc: 0.30,
            view: ViewMode::Annual,
        }
    }
}

impl ParameterSet {
    /// Applies a single-field edit in place.
    pub fn apply(&mut self, edit: Edit) {
        match edit {
            Edit::Usage(v) => self.usage = v,
            Edit::UtilityRate(v) => self.utility_rate = v,
            Edit::UtilityEsc(v) => self.utility_esc = v,
            Edit::PpaRate(v) => self.ppa_rate = v,
            Edit::PpaEsc(v) => self.ppa_esc = v,
            Edit::IncludeBattery(v) => self.include_battery = v,
            Edit::NetMeteringCredit(v) => self.net_metering_credit = v,
            Edit::SystemCost(v) => self.system_cost = v,
            Edit::Maintenance(v) => self.maintenance = v,
            Edit::Itc(v) => self.itc = v,
            Edit::View(v) => self.view = v,
        }
    }

    /// Current value of a numeric field, `None` for battery and view.
    pub fn number(&self, field: Field) -> Option<f64> {
        match field {
            Field::Usage => Some(self.usage),
            Field::UtilityRate => Some(self.utility_rate),
            Field::UtilityEsc => Some(self.utility_esc),
            Field::PpaRate => Some(self.ppa_rate),
            Field::PpaEsc => Some(self.ppa_esc),
            Field::NetMeteringCredit => Some(self.net_metering_credit),
            Field::SystemCost => Some(self.system_cost),
            Field::Maintenance => Some(self.maintenance),
            Field::Itc => Some(self.itc),
            Field::IncludeBattery | Field::View => None,
        }
    }

    /// Human-readable value of any field, as shown in the inputs panel.
    pub fn display_value(&self, field: Field) -> String {
        match field {
            Field::IncludeBattery => {
                let label = if self.include_battery { "yes" } else { "no" };
                label.to_string()
            }
            Field::View => self.view.to_string(),
            _ => self.number(field).map(|v| v.to_string()).unwrap_or_default(),
        }
    }

    /// ITC-adjusted purchase price.
    pub fn discounted_system_cost(&self) -> f64 {
        self.system_cost * (1.0 - self.itc)
    }
}

/// Identifies one editable input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Usage,
    UtilityRate,
    UtilityEsc,
    PpaRate,
    PpaEsc,
    IncludeBattery,
    NetMeteringCredit,
    SystemCost,
    Maintenance,
    Itc,
    View,
}

impl Field {
    /// Every field, in query-string order.
    pub const ALL: [Field; 11] = [
        Field::Usage,
        Field::UtilityRate,
        Field::UtilityEsc,
        Field::PpaRate,
        Field::PpaEsc,
        Field::IncludeBattery,
        Field::NetMeteringCredit,
        Field::SystemCost,
        Field::Maintenance,
        Field::Itc,
        Field::View,
    ];

    /// Short query-string key.
    pub fn query_key(self) -> &'static str {
        match self {
            Self::Usage => "usage",
            Self::UtilityRate => "ur",
            Self::UtilityEsc => "ue",
            Self::PpaRate => "pr",
            Self::PpaEsc => "pe",
            Self::IncludeBattery => "battery",
            Self::NetMeteringCredit => "nmc",
            Self::SystemCost => "sys",
            Self::Maintenance => "maint",
            Self::Itc => "itc",
            Self::View => "view",
        }
    }

    /// Looks a field up by its query key.
    pub fn from_query_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.query_key() == key)
    }

    /// Human-readable label for reports and the TUI inputs panel.
    pub fn label(self) -> &'static str {
        match self {
            Self::Usage => "Annual usage (kWh)",
            Self::UtilityRate => "Utility start ($/kWh)",
            Self::UtilityEsc => "Utility escalation",
            Self::PpaRate => "PPA start ($/kWh)",
            Self::PpaEsc => "PPA escalator",
            Self::IncludeBattery => "Battery ($59.99/mo)",
            Self::NetMeteringCredit => "NEM credit ($/kWh)",
            Self::SystemCost => "System cost ($)",
            Self::Maintenance => "Maintenance ($/yr)",
            Self::Itc => "Tax credit (ITC)",
            Self::View => "View mode",
        }
    }

    /// Increment used when nudging a numeric field; `0.0` for battery and view.
    pub fn step(self) -> f64 {
        match self {
            Self::Usage | Self::SystemCost => 100.0,
            Self::Maintenance => 10.0,
            Self::Itc => 0.01,
            Self::UtilityRate
            | Self::UtilityEsc
            | Self::PpaRate
            | Self::PpaEsc
            | Self::NetMeteringCredit => 0.001,
            Self::IncludeBattery | Self::View => 0.0,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.query_key())
    }
}

/// One field-level update to a [`ParameterSet`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Edit {
    Usage(f64),
    UtilityRate(f64),
    UtilityEsc(f64),
    PpaRate(f64),
    PpaEsc(f64),
    IncludeBattery(bool),
    NetMeteringCredit(f64),
    SystemCost(f64),
    Maintenance(f64),
    Itc(f64),
    View(ViewMode),
}

impl Edit {
    /// The field this edit writes.
    pub fn field(&self) -> Field {
        match self {
            Self::Usage(_) => Field::Usage,
            Self::UtilityRate(_) => Field::UtilityRate,
            Self::UtilityEsc(_) => Field::UtilityEsc,
            Self::PpaRate(_) => Field::PpaRate,
            Self::PpaEsc(_) => Field::PpaEsc,
            Self::IncludeBattery(_) => Field::IncludeBattery,
            Self::NetMeteringCredit(_) => Field::NetMeteringCredit,
            Self::SystemCost(_) => Field::SystemCost,
            Self::Maintenance(_) => Field::Maintenance,
            Self::Itc(_) => Field::Itc,
            Self::View(_) => Field::View,
        }
    }

    /// Builds a numeric edit. Returns `None` for battery/view, for
    /// non-finite values, for usage at or below zero, and for an ITC outside
    /// `[0, 1]`.
    pub fn number(field: Field, value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        let edit = match field {
            Field::Usage if value > 0.0 => Self::Usage(value),
            Field::UtilityRate => Self::UtilityRate(value),
            Field::UtilityEsc => Self::UtilityEsc(value),
            Field::PpaRate => Self::PpaRate(value),
            Field::PpaEsc => Self::PpaEsc(value),
            Field::NetMeteringCredit => Self::NetMeteringCredit(value),
            Field::SystemCost => Self::SystemCost(value),
            Field::Maintenance => Self::Maintenance(value),
            Field::Itc if (0.0..=1.0).contains(&value) => Self::Itc(value),
            Field::Usage | Field::Itc | Field::IncludeBattery | Field::View => return None,
        };
        Some(edit)
    }

    /// Parses a raw query value for `field`.
    ///
    /// Numbers are trimmed and must be finite; `battery` accepts `"1"` and
    /// `"0"`; `view` accepts `"annual"` and `"cumulative"`. Anything else
    /// yields `None`.
    pub fn parse(field: Field, raw: &str) -> Option<Self> {
        match field {
            Field::IncludeBattery => match raw {
                "1" => Some(Self::IncludeBattery(true)),
                "0" => Some(Self::IncludeBattery(false)),
                _ => None,
            },
            Field::View => raw.parse().ok().map(Self::View),
            _ => {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    return None;
                }
                trimmed
                    .parse::<f64>()
                    .ok()
                    .and_then(|v| Self::number(field, v))
            }
        }
    }

    /// Edit that moves `field` by `steps` increments of [`Field::step`].
    ///
    /// Battery and view flip regardless of `steps`. Costs stop at zero, a
    /// step that would take usage to zero yields `None`, and the ITC stays
    /// within `[0, 1]`.
    pub fn nudge(params: &ParameterSet, field: Field, steps: i32) -> Option<Self> {
        match field {
            Field::IncludeBattery => Some(Self::IncludeBattery(!params.include_battery)),
            Field::View => Some(Self::View(params.view.toggled())),
            _ => {
                let current = params.number(field)?;
                let step = field.step();
                let mut next = round_to_step(current + step * f64::from(steps), step);
                next = match field {
                    Field::Itc => next.clamp(0.0, 1.0),
                    Field::Usage | Field::SystemCost | Field::Maintenance => next.max(0.0),
                    _ => next,
                };
                Self::number(field, next)
            }
        }
    }
}

/// Rounds to the number of decimals the step carries, so repeated nudges
/// don't accumulate binary noise (`0.38 + 0.001` stays `0.381`).
fn round_to_step(value: f64, step: f64) -> f64 {
    let mut scale = 1.0;
    while (step * scale).fract().abs() > 1e-9 && scale < 1e9 {
        scale *= 10.0;
    }
    (value * scale).round() / scale
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_calculator() {
        let p = ParameterSet::default();
        assert_eq!(p.utility_rate, 0.38);
        assert_eq!(p.ppa_esc, 0.035);
        assert!(!p.include_battery);
        assert_eq!(p.itc, 0.30);
        assert_eq!(p.discounted_system_cost(), 45000.0 * (1.0 - 0.30));
    }

    #[test]
    fn query_keys_round_trip() {
        for field in Field::ALL {
            assert_eq!(Field::from_query_key(field.query_key()), Some(field));
        }
        assert_eq!(Field::from_query_key("admin"), None);
    }

    #[test]
    fn parse_accepts_numbers_and_rejects_garbage() {
        assert_eq!(Edit::parse(Field::Usage, "12000"), Some(Edit::Usage(12000.0)));
        assert_eq!(Edit::parse(Field::UtilityRate, " 0.41 "), Some(Edit::UtilityRate(0.41)));
        assert_eq!(Edit::parse(Field::Usage, "0"), None);
        assert_eq!(Edit::parse(Field::Usage, "-5"), None);
        assert_eq!(Edit::parse(Field::Usage, "0.5"), Some(Edit::Usage(0.5)));
        assert_eq!(Edit::parse(Field::Usage, ""), None);
        assert_eq!(Edit::parse(Field::Usage, "abc"), None);
        assert_eq!(Edit::parse(Field::Usage, "NaN"), None);
        assert_eq!(Edit::parse(Field::Usage, "inf"), None);
    }

    #[test]
    fn parse_itc_requires_unit_interval() {
        assert_eq!(Edit::parse(Field::Itc, "0.26"), Some(Edit::Itc(0.26)));
        assert_eq!(Edit::parse(Field::Itc, "1.5"), None);
        assert_eq!(Edit::parse(Field::Itc, "-0.1"), None);
    }

    #[test]
    fn parse_battery_and_view() {
        assert_eq!(
            Edit::parse(Field::IncludeBattery, "1"),
            Some(Edit::IncludeBattery(true))
        );
        assert_eq!(
            Edit::parse(Field::IncludeBattery, "0"),
            Some(Edit::IncludeBattery(false))
        );
        assert_eq!(Edit::parse(Field::IncludeBattery, "yes"), None);
        assert_eq!(
            Edit::parse(Field::View, "cumulative"),
            Some(Edit::View(ViewMode::Cumulative))
        );
        assert_eq!(Edit::parse(Field::View, "weekly"), None);
    }

    #[test]
    fn apply_writes_only_the_named_field() {
        let mut p = ParameterSet::default();
        p.apply(Edit::PpaRate(0.19));
        let expected = ParameterSet {
            ppa_rate: 0.19,
            ..ParameterSet::default()
        };
        assert_eq!(p, expected);
    }

    #[test]
    fn nudge_moves_by_step_without_float_noise() {
        let p = ParameterSet::default();
        assert_eq!(
            Edit::nudge(&p, Field::UtilityRate, 1),
            Some(Edit::UtilityRate(0.381))
        );
        assert_eq!(
            Edit::nudge(&p, Field::Maintenance, -2),
            Some(Edit::Maintenance(180.0))
        );
    }

    #[test]
    fn nudge_never_takes_usage_to_zero() {
        let p = ParameterSet {
            usage: 50.0,
            ..ParameterSet::default()
        };
        assert_eq!(Edit::nudge(&p, Field::Usage, -1), None);
        assert_eq!(Edit::nudge(&p, Field::Usage, 1), Some(Edit::Usage(150.0)));
    }

    #[test]
    fn nudge_clamps_itc_and_costs() {
        let p = ParameterSet {
            itc: 1.0,
            maintenance: 5.0,
            ..ParameterSet::default()
        };
        assert_eq!(Edit::nudge(&p, Field::Itc, 1), Some(Edit::Itc(1.0)));
        assert_eq!(
            Edit::nudge(&p, Field::Maintenance, -1),
            Some(Edit::Maintenance(0.0))
        );
    }

    #[test]
    fn nudge_flips_battery_and_view() {
        let p = ParameterSet::default();
        assert_eq!(
            Edit::nudge(&p, Field::IncludeBattery, -1),
            Some(Edit::IncludeBattery(true))
        );
        assert_eq!(
            Edit::nudge(&p, Field::View, 1),
            Some(Edit::View(ViewMode::Cumulative))
        );
    }

    #[test]
    fn view_mode_toggles_and_parses() {
        assert_eq!(ViewMode::Annual.toggled(), ViewMode::Cumulative);
        assert_eq!(ViewMode::Cumulative.toggled(), ViewMode::Annual);
        assert_eq!("annual".parse::<ViewMode>(), Ok(ViewMode::Annual));
        assert!("Annual".parse::<ViewMode>().is_err());
    }
}
