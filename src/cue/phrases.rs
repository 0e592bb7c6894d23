//! Spoken phrases, chosen by locale.

/// Returns true for Japanese locales ("ja", "ja-JP", "ja_JP").
fn is_japanese(locale: &str) -> bool {
    locale
        .get(..2)
        .is_some_and(|lang| lang.eq_ignore_ascii_case("ja"))
}

/// Announcement for the exercise that follows the current rest.
pub fn next_exercise(locale: &str, name: &str) -> String {
    if is_japanese(locale) {
        format!("次は{}", name)
    } else {
        format!("Next up: {}", name)
    }
}

/// Announcement for a finished workout.
pub fn workout_complete(locale: &str) -> String {
    if is_japanese(locale) {
        "お疲れ様でした".to_string()
    } else {
        "Workout complete. Great job!".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_japanese_phrases() {
        assert_eq!(next_exercise("ja-JP", "スクワット"), "次はスクワット");
        assert_eq!(workout_complete("ja"), "お疲れ様でした");
    }

    #[test]
    fn test_other_locales_use_english() {
        assert_eq!(next_exercise("en-US", "Squat"), "Next up: Squat");
        assert_eq!(workout_complete("de-DE"), "Workout complete. Great job!");
        assert_eq!(workout_complete(""), "Workout complete. Great job!");
    }
}
