//! Mood to catalog-query mapping
//!
//! A static lookup translating a mood keyword to the search phrases used to
//! fan out against the catalog. There is no scoring model behind this; the
//! phrase lists are the whole mapping.

/// Moods accepted by the mood recommendation endpoint
pub const MOODS: &[&str] = &["happy", "sad", "energetic", "chill", "romantic", "focus"];

/// Search phrases for a mood keyword, or None for an unknown mood
pub fn mood_queries(mood: &str) -> Option<&'static [&'static str]> {
    let queries: &[&str] = match mood {
        "happy" => &[
            "happy music",
            "upbeat songs",
            "feel good hits",
            "positive vibes",
        ],
        "sad" => &[
            "sad songs",
            "melancholy music",
            "emotional ballads",
            "heartbreak songs",
        ],
        "energetic" => &[
            "workout music",
            "high energy",
            "pump up songs",
            "dance hits",
        ],
        "chill" => &[
            "chill music",
            "relaxing songs",
            "ambient music",
            "lo-fi beats",
        ],
        "romantic" => &[
            "love songs",
            "romantic music",
            "date night playlist",
            "intimate songs",
        ],
        "focus" => &[
            "study music",
            "concentration",
            "instrumental focus",
            "productivity music",
        ],
        _ => return None,
    };

    Some(queries)
}
