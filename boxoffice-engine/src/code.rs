use rand::distributions::Alphanumeric;
use rand::Rng;

/// Generates an 8-character uppercase alphanumeric confirmation code.
pub(crate) fn confirmation_code() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(8)
        .map(char::from)
        .collect::<String>()
        .to_uppercase()
}
