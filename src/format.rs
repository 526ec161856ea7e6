//! Display formatting for stack values
//!
//! Decides between fixed-point and exponential notation. The formatter is
//! a small state machine: its mode and precision change only through
//! explicit user requests, and formatting itself never mutates it.

/// The most digits worth showing for an f64.
const MAX_DIGITS: usize = 15;

/// How values are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormatMode {
    /// Always fixed-point, so 0.001 may render as `0.00`.
    NoExponent,
    /// Fixed-point when it stays close to the true value and short enough,
    /// exponential otherwise.
    #[default]
    OptionalExponent,
    /// Always `mantissa e exponent`.
    UseExponent,
}

/// A user request to change the display settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FormatAdjustment {
    IncreasePrecision,
    DecreasePrecision,
    /// Switch mode; `grouping` constrains exponents to its multiples
    /// (1 for scientific notation, 3 for engineering).
    SetMode { mode: FormatMode, grouping: u32 },
}

/// Renders stack values as text.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayFormatter {
    /// Digits after the decimal point.
    precision: usize,
    /// Displayed exponents are multiples of this.
    grouping: u32,
    mode: FormatMode,
}

impl Default for DisplayFormatter {
    fn default() -> Self {
        Self::new(2, 1, FormatMode::OptionalExponent)
    }
}

impl DisplayFormatter {
    pub fn new(precision: usize, grouping: u32, mode: FormatMode) -> Self {
        Self {
            precision: precision.min(MAX_DIGITS - 2),
            grouping: grouping.max(1),
            mode,
        }
    }

    pub fn precision(&self) -> usize {
        self.precision
    }

    pub fn mode(&self) -> FormatMode {
        self.mode
    }

    /// Formats one value according to the current mode.
    pub fn format(&self, value: f64) -> String {
        match self.mode {
            FormatMode::NoExponent => self.fixed(value),
            FormatMode::UseExponent => self.exponential(value),
            FormatMode::OptionalExponent => {
                let fixed = self.fixed(value);
                let rounded: f64 = fixed.parse().unwrap_or(f64::NAN);
                if value == 0.0
                    || (is_close(value, rounded, 0.1) && fixed.len() <= MAX_DIGITS)
                {
                    fixed
                } else {
                    self.exponential(value)
                }
            }
        }
    }

    fn fixed(&self, value: f64) -> String {
        format!("{:.*}", self.precision, value)
    }

    /// Renders with an exponent snapped to a multiple of the grouping.
    fn exponential(&self, value: f64) -> String {
        if value == 0.0 {
            return format!("{:.*}e0", self.precision, 0.0);
        }
        let grouping = f64::from(self.grouping);
        let exponent = (value.abs().log10() / grouping).floor() * grouping;
        let mantissa = value / 10f64.powf(exponent);
        format!("{:.*}e{}", self.precision, mantissa, exponent as i64)
    }

    /// One more digit after the decimal point, capped two short of the
    /// total digits an f64 is good for.
    pub fn increase_precision(&mut self) {
        self.precision = (self.precision + 1).min(MAX_DIGITS - 2);
    }

    /// One fewer digit after the decimal point, floored at zero.
    pub fn decrease_precision(&mut self) {
        self.precision = self.precision.saturating_sub(1);
    }

    /// Changes mode and grouping; precision carries across the switch.
    pub fn set_mode(&mut self, mode: FormatMode, grouping: u32) {
        self.mode = mode;
        self.grouping = grouping.max(1);
    }

    /// Applies one display-change request.
    pub fn adjust(&mut self, adjustment: FormatAdjustment) {
        match adjustment {
            FormatAdjustment::IncreasePrecision => self.increase_precision(),
            FormatAdjustment::DecreasePrecision => self.decrease_precision(),
            FormatAdjustment::SetMode { mode, grouping } => self.set_mode(mode, grouping),
        }
    }
}

/// Relative closeness, matching `|a - b| <= tolerance * max(|a|, |b|)`.
fn is_close(a: f64, b: f64, tolerance: f64) -> bool {
    (a - b).abs() <= tolerance * a.abs().max(b.abs())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_mode_truncates_quietly() {
        let formatter = DisplayFormatter::new(2, 1, FormatMode::NoExponent);
        assert_eq!(formatter.format(0.001), "0.00");
        assert_eq!(formatter.format(1234.5678), "1234.57");
    }

    #[test]
    fn optional_mode_falls_back_to_exponent() {
        let formatter = DisplayFormatter::new(2, 1, FormatMode::OptionalExponent);
        // 0.00 would be off by 100%, so this needs an exponent.
        assert_eq!(formatter.format(0.001), "1.00e-3");
        // Near 1 the fixed form is close enough.
        let near_one = formatter.format(1.005);
        assert!(!near_one.contains('e'));
    }

    #[test]
    fn optional_mode_keeps_zero_fixed() {
        let formatter = DisplayFormatter::new(2, 1, FormatMode::OptionalExponent);
        assert_eq!(formatter.format(0.0), "0.00");
    }

    #[test]
    fn optional_mode_rejects_overlong_fixed_forms() {
        let formatter = DisplayFormatter::new(2, 1, FormatMode::OptionalExponent);
        // 17 fixed-point characters, accurate but too wide.
        assert_eq!(formatter.format(123456789012345.0), "1.23e14");
    }

    #[test]
    fn exponent_mode_always_uses_exponent() {
        let formatter = DisplayFormatter::new(2, 1, FormatMode::UseExponent);
        assert_eq!(formatter.format(5.0), "5.00e0");
        assert_eq!(formatter.format(-1234.0), "-1.23e3");
        assert_eq!(formatter.format(0.0), "0.00e0");
    }

    #[test]
    fn engineering_grouping_snaps_exponents() {
        let formatter = DisplayFormatter::new(2, 3, FormatMode::UseExponent);
        assert_eq!(formatter.format(12345.0), "12.35e3");
        assert_eq!(formatter.format(0.001), "1.00e-3");
        assert_eq!(formatter.format(0.01), "10.00e-3");
    }

    #[test]
    fn precision_clamps() {
        let mut formatter = DisplayFormatter::new(12, 1, FormatMode::NoExponent);
        formatter.increase_precision();
        assert_eq!(formatter.precision(), 13);
        formatter.increase_precision();
        assert_eq!(formatter.precision(), 13);

        let mut formatter = DisplayFormatter::new(1, 1, FormatMode::NoExponent);
        formatter.decrease_precision();
        assert_eq!(formatter.precision(), 0);
        formatter.decrease_precision();
        assert_eq!(formatter.precision(), 0);
    }

    #[test]
    fn mode_switch_preserves_precision() {
        let mut formatter = DisplayFormatter::new(5, 1, FormatMode::NoExponent);
        formatter.adjust(FormatAdjustment::SetMode {
            mode: FormatMode::UseExponent,
            grouping: 3,
        });
        assert_eq!(formatter.precision(), 5);
        assert_eq!(formatter.mode(), FormatMode::UseExponent);
    }

    #[test]
    fn formatted_values_reparse_nearby() {
        let formatter = DisplayFormatter::default();
        for value in [0.0, 1.0, -2.5, 0.001, 6.022e23, -1.6e-19, 123456.789] {
            let text = formatter.format(value);
            let parsed: f64 = text.parse().unwrap();
            assert!(
                value == parsed || is_close(value, parsed, 0.1),
                "{value} formatted as {text} reparsed as {parsed}"
            );
        }
    }
}
