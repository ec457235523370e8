// used to read loosely typed values out of flat records
use serde_json::Value;
use serde::Serialize;

// used when parsing names of groups and covariates
use std::str::FromStr;
// used to print out readable forms of a data type
use std::fmt;

use crate::error::ExplorerError;

/// Glyph rendered in place of a missing numeric table value.
pub const PLACEHOLDER: &str = "\u{2014}";
/// Rendered in place of a missing vote share.
pub const PERCENT_PLACEHOLDER: &str = "N/A";

// ------------- Outcome -------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Outcome {
    Won,
    Lost,
}

impl Outcome {
    /// Panel rule: only the literal string "no" means the incumbent lost.
    /// Missing or garbled values count as won.
    pub fn from_panel_flag(value: Option<&Value>) -> Self {
        match value {
            Some(Value::String(s)) if s == "no" => Outcome::Lost,
            _ => Outcome::Won,
        }
    }
    /// Hand-coded rule: only the number 0 (or the text "0") means the incumbent lost.
    pub fn from_coded_flag(value: Option<&Value>) -> Self {
        match value {
            Some(Value::Number(n)) if n.as_f64() == Some(0.0) => Outcome::Lost,
            Some(Value::String(s)) if s.trim() == "0" => Outcome::Lost,
            _ => Outcome::Won,
        }
    }
    /// Detail rule: only the literal string "lost" means the incumbent lost.
    pub fn from_detail_flag(value: Option<&Value>) -> Self {
        match value {
            Some(Value::String(s)) if s == "lost" => Outcome::Lost,
            _ => Outcome::Won,
        }
    }
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Won => "Won",
            Outcome::Lost => "Lost",
        }
    }
    pub fn detail_label(&self) -> &'static str {
        match self {
            Outcome::Won => "Re-elected",
            Outcome::Lost => "Defeated",
        }
    }
}
impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ------------- RegimeGroup -------------
/// The grouping used by the coefficient estimates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum RegimeGroup {
    Pooled,
    Democracy,
    Autocracy,
}

impl RegimeGroup {
    pub const ALL: [RegimeGroup; 3] = [RegimeGroup::Pooled, RegimeGroup::Democracy, RegimeGroup::Autocracy];
    pub fn name(&self) -> &'static str {
        match self {
            RegimeGroup::Pooled => "Pooled",
            RegimeGroup::Democracy => "Democracy",
            RegimeGroup::Autocracy => "Autocracy",
        }
    }
}
impl FromStr for RegimeGroup {
    type Err = ExplorerError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Pooled" => Ok(RegimeGroup::Pooled),
            "Democracy" => Ok(RegimeGroup::Democracy),
            "Autocracy" => Ok(RegimeGroup::Autocracy),
            other => Err(ExplorerError::Parse {
                message: format!("unknown regime group '{other}'"),
                line: None,
                col: None,
            }),
        }
    }
}
impl fmt::Display for RegimeGroup {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ------------- RegimeBucket -------------
/// Two-way bucket derived from a free-text regime label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RegimeBucket {
    Democracy,
    Autocracy,
}

impl RegimeBucket {
    /// Case-insensitive substring match, "democracy" checked before "autocracy".
    /// Labels matching neither stay unbucketed.
    pub fn classify(label: &str) -> Option<Self> {
        let lowered = label.to_lowercase();
        if lowered.contains("democracy") {
            Some(RegimeBucket::Democracy)
        } else if lowered.contains("autocracy") {
            Some(RegimeBucket::Autocracy)
        } else {
            None
        }
    }
    pub fn name(&self) -> &'static str {
        match self {
            RegimeBucket::Democracy => "Democracy",
            RegimeBucket::Autocracy => "Autocracy",
        }
    }
}

// ------------- Covariate -------------
/// The fixed, ordered vocabulary of regression covariates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Covariate {
    HighVisibility,
    LowVisibility,
    Scope,
    HorizontalConstraints,
    VerticalConstraints,
    GdpGrowth,
    Unemployment,
    Polarization,
    MassMobilization,
    CitizenSupport,
}

impl Covariate {
    pub const ALL: [Covariate; 10] = [
        Covariate::HighVisibility,
        Covariate::LowVisibility,
        Covariate::Scope,
        Covariate::HorizontalConstraints,
        Covariate::VerticalConstraints,
        Covariate::GdpGrowth,
        Covariate::Unemployment,
        Covariate::Polarization,
        Covariate::MassMobilization,
        Covariate::CitizenSupport,
    ];
    pub fn name(&self) -> &'static str {
        match self {
            Covariate::HighVisibility => "High Visibility",
            Covariate::LowVisibility => "Low Visibility",
            Covariate::Scope => "Scope",
            Covariate::HorizontalConstraints => "Horizontal Constraints",
            Covariate::VerticalConstraints => "Vertical Constraints",
            Covariate::GdpGrowth => "GDP Growth",
            Covariate::Unemployment => "Unemployment",
            Covariate::Polarization => "Polarization",
            Covariate::MassMobilization => "Mass Mobilization",
            Covariate::CitizenSupport => "Citizen Support",
        }
    }
    pub fn from_name(name: &str) -> Option<Self> {
        Covariate::ALL.iter().copied().find(|c| c.name() == name)
    }
    pub fn rank(&self) -> usize {
        *self as usize
    }
}
impl fmt::Display for Covariate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ------------- Coercion -------------
/// Significance is a native boolean or, failing that, a "TRUE"-style text.
pub fn significance_flag(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => s.trim().eq_ignore_ascii_case("true"),
        _ => false,
    }
}

/// Indicator flags in the action ledger are set only by the value 1.
pub fn unit_flag(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Number(n)) => n.as_f64() == Some(1.0),
        Some(Value::String(s)) => s.trim() == "1",
        Some(Value::Bool(b)) => *b,
        _ => false,
    }
}

pub fn numeric(value: Option<&Value>) -> Option<f64> {
    let number = match value? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    number.is_finite().then_some(number)
}

pub fn integer(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(n) => n.as_i64().or_else(|| {
            let f = n.as_f64()?;
            (f.fract() == 0.0 && f.is_finite()).then_some(f as i64)
        }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// Blank strings count as missing.
pub fn text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

// ------------- Formatting -------------
pub fn two_decimals(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => fixed(v, 2),
        _ => PLACEHOLDER.to_string(),
    }
}

pub fn percent(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{}%", fixed(v, 1)),
        _ => PERCENT_PLACEHOLDER.to_string(),
    }
}

/// Fixed-point rendering of a finite value. Rounding is exact on the binary
/// value; a value lying exactly halfway rounds away from zero.
pub fn fixed(value: f64, digits: u32) -> String {
    // negative zero prints unsigned
    let value = if value == 0.0 { 0.0 } else { value };
    let Some(magnitude) = halfway_rounded(value.abs(), digits) else {
        return format!("{:.*}", digits as usize, value);
    };
    let sign = if value < 0.0 { "-" } else { "" };
    let scale = 10u128.pow(digits);
    if digits == 0 {
        format!("{sign}{magnitude}")
    } else {
        format!("{sign}{}.{:0width$}", magnitude / scale, magnitude % scale, width = digits as usize)
    }
}

// value = m * 2^e with m odd. value * 10^d = m * 5^d * 2^(e + d), which is
// halfway between two integers exactly when e + d == -1.
fn halfway_rounded(value: f64, digits: u32) -> Option<u128> {
    let bits = value.to_bits();
    let biased = ((bits >> 52) & 0x7ff) as i32;
    let fraction = bits & ((1u64 << 52) - 1);
    let (mut mantissa, mut exponent) = if biased == 0 {
        (fraction, -1074)
    } else {
        (fraction | (1u64 << 52), biased - 1075)
    };
    if mantissa == 0 {
        return None;
    }
    let zeros = mantissa.trailing_zeros();
    mantissa >>= zeros;
    exponent += zeros as i32;
    if exponent != -(digits as i32) - 1 {
        return None;
    }
    Some((u128::from(mantissa) * 5u128.pow(digits) + 1) / 2)
}
