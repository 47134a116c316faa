//! Error types for the layout engine

use thiserror::Error;

/// Errors that can occur during layout computation
///
/// All of these indicate a broken contract with the statement tree builder;
/// the engine never falls back to default coordinates.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    /// Position lookup for a participant the solver does not know
    #[error("participant '{name}' not found{}", format_suggestions(.suggestions))]
    ParticipantNotFound {
        name: String,
        suggestions: Vec<String>,
    },

    /// Fragment span references a participant outside the global ordering
    #[error("fragment {fragment} spans participant '{participant}' which is not in the diagram")]
    InconsistentFrameSpan {
        fragment: String,
        participant: String,
    },

    /// Horizontal relaxation did not reach a fixed point
    #[error("horizontal constraints did not converge after {passes} passes")]
    SolverDidNotConverge { passes: usize },
}

impl LayoutError {
    /// Create a participant-not-found error, suggesting close matches from `known`
    pub fn participant_not_found<'a>(
        name: impl Into<String>,
        known: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        let name = name.into();
        let suggestions = find_similar(known, &name, 2);
        Self::ParticipantNotFound { name, suggestions }
    }

    /// Create an inconsistent frame span error
    pub fn inconsistent_span(fragment: impl Into<String>, participant: impl Into<String>) -> Self {
        Self::InconsistentFrameSpan {
            fragment: fragment.into(),
            participant: participant.into(),
        }
    }

    /// Get suggestions if available
    pub fn suggestions(&self) -> Option<&[String]> {
        match self {
            Self::ParticipantNotFound { suggestions, .. } => Some(suggestions),
            _ => None,
        }
    }
}

fn format_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else {
        format!(" (did you mean {}?)", suggestions.join(", "))
    }
}

/// Compute Levenshtein edit distance between two strings
fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let n = b_chars.len();

    if a_chars.is_empty() {
        return n;
    }
    if n == 0 {
        return a_chars.len();
    }

    let mut prev: Vec<usize> = (0..=n).collect();
    let mut cur = vec![0usize; n + 1];
    for (i, ca) in a_chars.iter().enumerate() {
        cur[0] = i + 1;
        for (j, cb) in b_chars.iter().enumerate() {
            let cost = usize::from(ca != cb);
            cur[j + 1] = (prev[j + 1] + 1).min(cur[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut cur);
    }

    prev[n]
}

/// Find known names within a maximum edit distance, closest first
fn find_similar<'a>(
    known: impl IntoIterator<Item = &'a str>,
    target: &str,
    max_distance: usize,
) -> Vec<String> {
    let mut candidates: Vec<(&str, usize)> = known
        .into_iter()
        .filter_map(|name| {
            let dist = levenshtein_distance(name, target);
            (dist <= max_distance && dist > 0).then_some((name, dist))
        })
        .collect();

    candidates.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(b.0)));
    candidates
        .into_iter()
        .map(|(name, _)| name.to_string())
        .take(3)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levenshtein() {
        assert_eq!(levenshtein_distance("hello", "hello"), 0);
        assert_eq!(levenshtein_distance("server", "servr"), 1);
        assert_eq!(levenshtein_distance("cat", "dog"), 3);
        assert_eq!(levenshtein_distance("", "abc"), 3);
    }

    #[test]
    fn test_participant_not_found_display() {
        let err = LayoutError::participant_not_found("Clinet", ["Client", "Server"]);
        assert_eq!(err.suggestions(), Some(&["Client".to_string()][..]));
        assert_eq!(
            err.to_string(),
            "participant 'Clinet' not found (did you mean Client?)"
        );
    }

    #[test]
    fn test_participant_not_found_without_suggestions() {
        let err = LayoutError::participant_not_found("Zed", ["Client", "Server"]);
        assert_eq!(err.to_string(), "participant 'Zed' not found");
    }

    #[test]
    fn test_inconsistent_span_display() {
        let err = LayoutError::inconsistent_span("2.0", "Ghost");
        assert!(err.to_string().contains("fragment 2.0"));
        assert!(err.to_string().contains("'Ghost'"));
    }
}
