//! Phone-number normalization for matching and display.
//!
//! Every function here is total: a number that cannot be parsed is returned
//! unchanged rather than failing, so matching degrades to comparing the raw
//! strings.

use phonenumber::{Mode, country};

/// The dialing region used to interpret numbers without a country code.
pub type Region = country::Id;

/// Canonical E.164-style form of `number`, used for matching. Parse failure
/// returns the input unchanged.
pub fn normalize(number: &str, region: Option<Region>) -> String {
  match phonenumber::parse(region, number) {
    Ok(parsed) => parsed.format().mode(Mode::E164).to_string(),
    Err(_) => number.to_string(),
  }
}

/// The national-significant digits of `number` — the local-dialing form
/// tried as a secondary lookup key. Parse failure returns the input
/// unchanged.
pub fn local_number(number: &str, region: Option<Region>) -> String {
  match phonenumber::parse(region, number) {
    Ok(parsed) => parsed.national().value().to_string(),
    Err(_) => number.to_string(),
  }
}

/// Human-readable international rendering for display. Parse failure
/// returns the input unchanged.
pub fn pretty_number(number: &str, region: Option<Region>) -> String {
  match phonenumber::parse(region, number) {
    Ok(parsed) => parsed.format().mode(Mode::International).to_string(),
    Err(_) => number.to_string(),
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
