use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;

/// Best fuzzy candidate for a name the user mistyped, if any candidate
/// matches at all.
pub fn closest<'a>(input: &str, candidates: &[&'a str]) -> Option<&'a str> {
    let matcher = SkimMatcherV2::default().ignore_case();
    let mut best: Option<(i64, &'a str)> = None;

    for candidate in candidates {
        if let Some(score) = matcher.fuzzy_match(candidate, input.trim()) {
            if best.map_or(true, |(top, _)| score > top) {
                best = Some((score, *candidate));
            }
        }
    }

    best.map(|(_, candidate)| candidate)
}

/// ` (did you mean 'x'?)` or an empty string.
pub fn did_you_mean(input: &str, candidates: &[&str]) -> String {
    match closest(input, candidates) {
        Some(candidate) => format!(" (did you mean '{}'?)", candidate),
        None => String::new(),
    }
}
