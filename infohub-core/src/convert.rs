//! The currency conversion engine.
//!
//! Three amounts (INR, USD, EUR) stay mutually consistent while any one of
//! them is edited. Recomputation is always anchored through INR: the edited
//! field yields an INR amount first and the remaining two are derived from
//! it, so rounding error never compounds across a USD-to-EUR hop and the
//! update rule stays uniform.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConvertError {
    #[error("conversion rate must be a strictly positive finite number, got {0}")]
    InvalidRate(f64),

    #[error("conversion rate for the edited currency is zero")]
    DivisionByZero,
}

/// Pair of scalar conversion factors anchored at INR.
///
/// Immutable once fetched; a refresh replaces the whole set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateSet {
    pub usd_per_inr: f64,
    pub eur_per_inr: f64,
}

impl RateSet {
    /// Both factors must be strictly positive and finite.
    pub fn new(usd_per_inr: f64, eur_per_inr: f64) -> Result<Self, ConvertError> {
        for rate in [usd_per_inr, eur_per_inr] {
            if !rate.is_finite() || rate <= 0.0 {
                return Err(ConvertError::InvalidRate(rate));
            }
        }

        Ok(Self { usd_per_inr, eur_per_inr })
    }
}

/// One displayed amount.
///
/// The control being edited echoes its text back exactly as typed; the other
/// two carry amounts derived from it, rounded for display. Serializes to
/// either a bare string or a bare number accordingly.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Field {
    Typed(String),
    Amount(f64),
}

impl Field {
    /// Numeric value of the field under the input-normalization rule.
    pub fn amount(&self) -> f64 {
        match self {
            Field::Typed(raw) => normalize_amount(raw),
            Field::Amount(value) => *value,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Typed(raw) => f.write_str(raw),
            Field::Amount(value) => write!(f, "{value}"),
        }
    }
}

/// The three mutually-derived amounts shown to the user.
///
/// Outside an in-flight edit, `usd == round4(inr * usd_per_inr)` and
/// `eur == round4(inr * eur_per_inr)` hold within display tolerance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversionState {
    pub inr: Field,
    pub usd: Field,
    pub eur: Field,
}

/// Coerce raw input text to a number.
///
/// Mirrors the lenient coercion the currency controls have always had, as an
/// explicit step: the longest leading decimal prefix of the trimmed input
/// (sign, digits, fraction, exponent) is parsed, and anything that does not
/// yield a finite number collapses to zero.
pub fn normalize_amount(raw: &str) -> f64 {
    match numeric_prefix(raw.trim()).parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => 0.0,
    }
}

fn numeric_prefix(s: &str) -> &str {
    let bytes = s.as_bytes();
    let at = |i: usize| bytes.get(i).copied();
    let mut end = 0;
    let mut seen_digit = false;
    let mut seen_dot = false;

    if matches!(at(0), Some(b'+' | b'-')) {
        end = 1;
    }

    while let Some(b) = at(end) {
        match b {
            b'0'..=b'9' => {
                seen_digit = true;
                end += 1;
            }
            b'.' if !seen_dot => {
                seen_dot = true;
                end += 1;
            }
            _ => break,
        }
    }

    if !seen_digit {
        return "";
    }

    // An exponent only counts if at least one digit follows it.
    if matches!(at(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(at(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let digits_start = exp_end;
        while matches!(at(exp_end), Some(b'0'..=b'9')) {
            exp_end += 1;
        }
        if exp_end > digits_start {
            end = exp_end;
        }
    }

    &s[..end]
}

/// Four decimal places, half-away-from-zero.
pub fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// The conversion engine: a rate set plus the pure update rules.
///
/// Every operation is a function of (edited field, raw input, rates) alone;
/// the engine keeps no memory of prior states.
#[derive(Debug, Clone)]
pub struct Converter {
    rates: RateSet,
}

impl Converter {
    pub fn new(rates: RateSet) -> Self {
        Self { rates }
    }

    pub fn rates(&self) -> &RateSet {
        &self.rates
    }

    /// USD and EUR amounts for an INR amount, rounded for display.
    pub fn amounts_from_inr(&self, inr: f64) -> (f64, f64) {
        (
            round4(inr * self.rates.usd_per_inr),
            round4(inr * self.rates.eur_per_inr),
        )
    }

    /// State shown right after a successful rate fetch: one rupee, converted.
    pub fn initialize(&self) -> ConversionState {
        let (usd, eur) = self.amounts_from_inr(1.0);
        ConversionState {
            inr: Field::Amount(1.0),
            usd: Field::Amount(usd),
            eur: Field::Amount(eur),
        }
    }

    pub fn edit_inr(&self, raw: &str) -> ConversionState {
        let (usd, eur) = self.amounts_from_inr(normalize_amount(raw));
        ConversionState {
            inr: Field::Typed(raw.to_owned()),
            usd: Field::Amount(usd),
            eur: Field::Amount(eur),
        }
    }

    /// Fails only on a zero USD rate, which [`RateSet::new`] rules out.
    pub fn edit_usd(&self, raw: &str) -> Result<ConversionState, ConvertError> {
        if self.rates.usd_per_inr == 0.0 {
            return Err(ConvertError::DivisionByZero);
        }

        let inr = normalize_amount(raw) / self.rates.usd_per_inr;
        Ok(ConversionState {
            inr: Field::Amount(round4(inr)),
            usd: Field::Typed(raw.to_owned()),
            eur: Field::Amount(round4(inr * self.rates.eur_per_inr)),
        })
    }

    /// Fails only on a zero EUR rate, which [`RateSet::new`] rules out.
    pub fn edit_eur(&self, raw: &str) -> Result<ConversionState, ConvertError> {
        if self.rates.eur_per_inr == 0.0 {
            return Err(ConvertError::DivisionByZero);
        }

        let inr = normalize_amount(raw) / self.rates.eur_per_inr;
        Ok(ConversionState {
            inr: Field::Amount(round4(inr)),
            usd: Field::Amount(round4(inr * self.rates.usd_per_inr)),
            eur: Field::Typed(raw.to_owned()),
        })
    }
}

/// A single edit to one of the three controls, carrying the text as typed.
#[derive(Debug, Clone, PartialEq)]
pub enum Edit {
    Inr(String),
    Usd(String),
    Eur(String),
}

/// One converter session: the engine plus the latest state, owned by a
/// single front-end context. An explicit state object in place of
/// framework-managed component state.
#[derive(Debug, Clone)]
pub struct Session {
    converter: Converter,
    state: ConversionState,
}

impl Session {
    pub fn start(rates: RateSet) -> Self {
        let converter = Converter::new(rates);
        let state = converter.initialize();
        Self { converter, state }
    }

    pub fn state(&self) -> &ConversionState {
        &self.state
    }

    /// Apply one edit and return the recomputed state.
    pub fn apply(&mut self, edit: Edit) -> Result<&ConversionState, ConvertError> {
        self.state = match edit {
            Edit::Inr(raw) => self.converter.edit_inr(&raw),
            Edit::Usd(raw) => self.converter.edit_usd(&raw)?,
            Edit::Eur(raw) => self.converter.edit_eur(&raw)?,
        };

        Ok(&self.state)
    }

    /// Replace the rates wholesale and start over, as a manual refresh does.
    pub fn refresh(&mut self, rates: RateSet) -> &ConversionState {
        self.converter = Converter::new(rates);
        self.state = self.converter.initialize();
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rates() -> RateSet {
        RateSet::new(0.012, 0.011).expect("rates must be valid")
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-4,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn rate_set_rejects_non_positive_factors() {
        assert_eq!(
            RateSet::new(0.0, 0.011).unwrap_err(),
            ConvertError::InvalidRate(0.0)
        );
        assert_eq!(
            RateSet::new(0.012, -0.011).unwrap_err(),
            ConvertError::InvalidRate(-0.011)
        );
    }

    #[test]
    fn rate_set_rejects_non_finite_factors() {
        assert!(RateSet::new(f64::NAN, 0.011).is_err());
        assert!(RateSet::new(0.012, f64::INFINITY).is_err());
    }

    #[test]
    fn initialize_converts_one_rupee() {
        let state = Converter::new(rates()).initialize();

        assert_eq!(state.inr, Field::Amount(1.0));
        assert_eq!(state.usd, Field::Amount(0.012));
        assert_eq!(state.eur, Field::Amount(0.011));
    }

    #[test]
    fn edit_inr_derives_both_other_fields() {
        let state = Converter::new(rates()).edit_inr("250");

        assert_eq!(state.inr, Field::Typed("250".to_owned()));
        assert_eq!(state.usd.amount(), round4(250.0 * 0.012));
        assert_eq!(state.eur.amount(), round4(250.0 * 0.011));
    }

    #[test]
    fn edit_inr_echoes_raw_text_unreformatted() {
        let state = Converter::new(rates()).edit_inr("250.50");

        assert_eq!(state.inr.to_string(), "250.50");
        assert_eq!(state.inr.amount(), 250.5);
    }

    #[test]
    fn edit_usd_anchors_through_inr() {
        let state = Converter::new(rates()).edit_usd("1").unwrap();

        assert_eq!(state.inr, Field::Amount(83.3333));
        assert_eq!(state.usd, Field::Typed("1".to_owned()));
        assert_eq!(state.eur, Field::Amount(0.9167));
    }

    #[test]
    fn edit_eur_anchors_through_inr() {
        let state = Converter::new(rates()).edit_eur("1").unwrap();

        assert_eq!(state.inr, Field::Amount(round4(1.0 / 0.011)));
        assert_eq!(state.usd, Field::Amount(round4((1.0 / 0.011) * 0.012)));
        assert_eq!(state.eur, Field::Typed("1".to_owned()));
    }

    #[test]
    fn inr_round_trips_through_usd_within_tolerance() {
        let converter = Converter::new(rates());

        for input in ["250", "1", "83.3333", "500.5"] {
            let usd = converter.edit_inr(input).usd.amount();
            let back = converter.edit_usd(&usd.to_string()).unwrap();
            assert_close(back.inr.amount(), normalize_amount(input));
        }
    }

    #[test]
    fn repeated_edits_are_idempotent() {
        let converter = Converter::new(rates());

        assert_eq!(converter.edit_inr("42.5"), converter.edit_inr("42.5"));
        assert_eq!(
            converter.edit_usd("3").unwrap(),
            converter.edit_usd("3").unwrap()
        );
    }

    #[test]
    fn empty_input_collapses_to_zero() {
        let state = Converter::new(rates()).edit_inr("");

        assert_eq!(
            serde_json::to_value(&state).unwrap(),
            json!({ "inr": "", "usd": 0.0, "eur": 0.0 })
        );
    }

    #[test]
    fn negative_amounts_propagate() {
        let state = Converter::new(rates()).edit_inr("-10");

        assert_eq!(state.usd, Field::Amount(-0.12));
        assert_eq!(state.eur, Field::Amount(-0.11));
    }

    #[test]
    fn zero_usd_rate_is_division_by_zero() {
        let degenerate = Converter::new(RateSet {
            usd_per_inr: 0.0,
            eur_per_inr: 0.011,
        });

        assert_eq!(
            degenerate.edit_usd("1").unwrap_err(),
            ConvertError::DivisionByZero
        );
    }

    #[test]
    fn normalize_accepts_plain_and_signed_decimals() {
        assert_eq!(normalize_amount("250"), 250.0);
        assert_eq!(normalize_amount(" 3.5 "), 3.5);
        assert_eq!(normalize_amount("-2.5"), -2.5);
        assert_eq!(normalize_amount("+7"), 7.0);
        assert_eq!(normalize_amount(".5"), 0.5);
        assert_eq!(normalize_amount("12."), 12.0);
    }

    #[test]
    fn normalize_parses_the_longest_leading_prefix() {
        assert_eq!(normalize_amount("12abc"), 12.0);
        assert_eq!(normalize_amount("12.3.4"), 12.3);
        assert_eq!(normalize_amount("1e3"), 1000.0);
        assert_eq!(normalize_amount("1e"), 1.0);
        assert_eq!(normalize_amount("2e-2"), 0.02);
    }

    #[test]
    fn normalize_collapses_junk_and_non_finite_to_zero() {
        assert_eq!(normalize_amount(""), 0.0);
        assert_eq!(normalize_amount("abc"), 0.0);
        assert_eq!(normalize_amount("."), 0.0);
        assert_eq!(normalize_amount("-"), 0.0);
        assert_eq!(normalize_amount("Infinity"), 0.0);
        assert_eq!(normalize_amount("1e999"), 0.0);
    }

    #[test]
    fn round4_rounds_half_away_from_zero() {
        assert_eq!(round4(0.00005), 0.0001);
        assert_eq!(round4(-0.00005), -0.0001);
        assert_eq!(round4(83.333_333_33), 83.3333);
        assert_eq!(round4(0.916_666_63), 0.9167);
    }

    #[test]
    fn session_applies_edits_and_keeps_latest_state() {
        let mut session = Session::start(rates());
        assert_eq!(session.state().inr, Field::Amount(1.0));

        session.apply(Edit::Inr("100".to_owned())).unwrap();
        assert_eq!(session.state().usd, Field::Amount(1.2));

        session.apply(Edit::Eur("1.1".to_owned())).unwrap();
        assert_eq!(session.state().inr, Field::Amount(100.0));
    }

    #[test]
    fn session_refresh_replaces_rates_wholesale() {
        let mut session = Session::start(rates());
        session.apply(Edit::Inr("500".to_owned())).unwrap();

        let state = session.refresh(RateSet::new(0.02, 0.01).unwrap());
        assert_eq!(state.inr, Field::Amount(1.0));
        assert_eq!(state.usd, Field::Amount(0.02));
        assert_eq!(state.eur, Field::Amount(0.01));
    }
}
