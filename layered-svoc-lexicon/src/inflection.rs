//! Suffix-stripping helpers for regular English verb inflection.

/// Candidate base forms for an inflected word, most specific first.
///
/// The caller checks each candidate against its verb table; nothing here
/// knows whether a candidate is a real verb.
pub(crate) fn base_candidates(word: &str) -> Vec<String> {
    let mut out = Vec::new();

    if let Some(stem) = word.strip_suffix("ies") {
        if stem.len() > 1 {
            out.push(format!("{}y", stem));
        }
    }
    if let Some(stem) = word.strip_suffix("ied") {
        if stem.len() > 1 {
            out.push(format!("{}y", stem));
        }
    }
    if let Some(stem) = word.strip_suffix("ing") {
        if stem.len() > 1 {
            out.push(stem.to_string());
            out.push(format!("{}e", stem));
            if let Some(undoubled) = undouble(stem) {
                out.push(undoubled);
            }
        }
    }
    if let Some(stem) = word.strip_suffix("ed") {
        if stem.len() > 1 {
            out.push(stem.to_string());
            out.push(format!("{}e", stem));
            if let Some(undoubled) = undouble(stem) {
                out.push(undoubled);
            }
        }
    }
    if let Some(stem) = word.strip_suffix("en") {
        if stem.len() > 1 {
            out.push(stem.to_string());
            out.push(format!("{}e", stem));
        }
    }
    if let Some(stem) = word.strip_suffix("es") {
        if stem.len() > 1 {
            out.push(stem.to_string());
        }
    }
    if let Some(stem) = word.strip_suffix('s') {
        if stem.len() > 2 && !stem.ends_with('s') {
            out.push(stem.to_string());
        }
    }

    out
}

/// "admitt" -> "admit", "stopp" -> "stop"
fn undouble(stem: &str) -> Option<String> {
    let mut chars = stem.chars().rev();
    let last = chars.next()?;
    let before = chars.next()?;
    if last == before && !matches!(last, 'a' | 'e' | 'i' | 'o' | 'u' | 's' | 'l') {
        let mut undoubled = stem.to_string();
        undoubled.pop();
        Some(undoubled)
    } else {
        None
    }
}

/// Best-effort lemma when no candidate is a known verb.
pub(crate) fn fallback_lemma(word: &str) -> String {
    if word.len() > 4 {
        if let Some(stem) = word.strip_suffix("ies") {
            return format!("{}y", stem);
        }
        for suffix in ["shes", "ches", "sses", "xes", "zes"] {
            if word.ends_with(suffix) {
                return word[..word.len() - 2].to_string();
            }
        }
    }
    if word.len() > 3
        && word.ends_with('s')
        && !word.ends_with("ss")
        && !word.ends_with("us")
        && !word.ends_with("is")
    {
        return word[..word.len() - 1].to_string();
    }
    word.to_string()
}
