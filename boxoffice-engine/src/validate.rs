use std::sync::LazyLock;

use regex::Regex;

use crate::engine::HoldError;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[\w+-]+(\.\w+)*@[\w-]+(\.\w+)*(\.[a-z]{2,})$")
        .expect("email pattern compiles")
});

/// A hold must request at least one seat.
pub(crate) fn require_seat_count(count: u32) -> Result<(), HoldError> {
    if count == 0 {
        return Err(HoldError::InvalidRequest(
            "at least one seat must be requested".to_string(),
        ));
    }
    Ok(())
}

/// The customer email must be well formed before the engine acts on it.
pub(crate) fn require_email(email: &str) -> Result<(), HoldError> {
    if !EMAIL_PATTERN.is_match(email) {
        return Err(HoldError::InvalidRequest(format!(
            "malformed customer email: {}",
            email
        )));
    }
    Ok(())
}
