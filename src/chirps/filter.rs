// Profanity filter for chirp bodies

/// Words replaced with [`CENSORED`]
pub const PROFANE_WORDS: [&str; 3] = ["kerfuffle", "sharbert", "fornax"];

pub const CENSORED: &str = "****";

/// Replace profane words in `body`.
///
/// Words are split on single spaces and matched case-insensitively. A word
/// containing punctuation (`Sharbert!`) is left alone, and spacing is kept
/// exactly as it was.
pub fn clean_body(body: &str) -> String {
    body.split(' ')
        .map(|word| if is_profane(word) { CENSORED } else { word })
        .collect::<Vec<_>>()
        .join(" ")
}

fn is_profane(word: &str) -> bool {
    if word.chars().any(|c| c.is_ascii_punctuation()) {
        return false;
    }
    let lowered = word.to_lowercase();
    PROFANE_WORDS.contains(&lowered.as_str())
}
