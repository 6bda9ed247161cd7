use thiserror::Error;

use crate::config::settings::LeagueSettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("legs must be between 0 and {max}, got {legs_for}:{legs_against}")]
    OutOfRange {
        legs_for: i32,
        legs_against: i32,
        max: i32,
    },
    #[error("{legs_for}:{legs_against} is not a final score")]
    NotFinal { legs_for: i32, legs_against: i32 },
    #[error("0:0 means no result and cannot be submitted")]
    NoResult,
}

/// Legality of a final score under the default league rules (first to 6, draw at 5:5)
pub fn validate(legs_for: i32, legs_against: i32) -> bool {
    check_result(&LeagueSettings::default(), legs_for, legs_against).is_ok()
}

/// Accepts a side reaching `legs_to_win` against fewer legs, the drawn
/// `draw_legs:draw_legs` result, and 0:0 (no result / reset).
pub fn check_result(
    settings: &LeagueSettings,
    legs_for: i32,
    legs_against: i32,
) -> Result<(), ValidationError> {
    let max_legs = settings.legs_to_win;

    if !(0..=max_legs).contains(&legs_for) || !(0..=max_legs).contains(&legs_against) {
        return Err(ValidationError::OutOfRange {
            legs_for,
            legs_against,
            max: max_legs,
        });
    }

    let high = legs_for.max(legs_against);
    let low = legs_for.min(legs_against);

    let decided = high == max_legs && low < max_legs;
    let drawn = legs_for == settings.draw_legs && legs_against == settings.draw_legs;
    let blank = legs_for == 0 && legs_against == 0;

    if decided || drawn || blank {
        Ok(())
    } else {
        Err(ValidationError::NotFinal {
            legs_for,
            legs_against,
        })
    }
}

/// Same rule as [`check_result`] minus the 0:0 pair, which players cannot report
pub fn check_submission(
    settings: &LeagueSettings,
    legs_for: i32,
    legs_against: i32,
) -> Result<(), ValidationError> {
    check_result(settings, legs_for, legs_against)?;
    if legs_for == 0 && legs_against == 0 {
        return Err(ValidationError::NoResult);
    }
    Ok(())
}
