//! Effective strength for a single match.

use super::form::Form;

pub const HOME_ADVANTAGE: f64 = 5.0;
/// Effective strength never drops below this.
pub const MIN_EFFECTIVE_STRENGTH: f64 = 30.0;
/// Form score 0..1 maps to -10..+10.
const FORM_SCALE: f64 = 20.0;

/// base (+5 at home) + form adjustment + trend adjustment, floored at 30.
pub fn effective_strength(base: u8, form: &Form, is_home: bool) -> f64 {
    let mut strength = base as f64;
    if is_home {
        strength += HOME_ADVANTAGE;
    }
    strength += (form.score - 0.5) * FORM_SCALE;
    strength += form.trend.adjustment();
    strength.max(MIN_EFFECTIVE_STRENGTH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::form::FormTrend;

    fn form(score: f64, trend: FormTrend) -> Form {
        Form { score, trend, ..Form::no_history() }
    }

    #[test]
    fn test_home_and_form_adjustments() {
        assert_eq!(effective_strength(70, &form(0.5, FormTrend::Stable), false), 70.0);
        assert_eq!(effective_strength(70, &form(0.5, FormTrend::Stable), true), 75.0);
        assert_eq!(effective_strength(70, &form(1.0, FormTrend::Improving), true), 90.0);
        assert_eq!(effective_strength(70, &form(0.0, FormTrend::Declining), false), 55.0);
    }

    #[test]
    fn test_no_history_costs_ten() {
        assert_eq!(effective_strength(60, &Form::no_history(), false), 50.0);
    }

    #[test]
    fn test_floor() {
        assert_eq!(effective_strength(1, &form(0.0, FormTrend::Declining), false), 30.0);
        assert_eq!(effective_strength(35, &Form::no_history(), false), 30.0);
    }
}
