use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;

use super::cleaner::{strip_emphasis, strip_leading_hashes};

// Alternatives are ordered longest first so "Subject Name:" is consumed whole.
static LABEL_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(subject name:|subject name|subject:|subject)\s*").unwrap());
static LEADING_COLON_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^:\s*").unwrap());

pub const DEFAULT_SUBJECT: &str = "General";
pub const ALL_SUBJECTS: &str = "All";

const CANONICAL: &[(&str, &str)] = &[
    ("cybersecurity", "Cybersecurity"),
    ("cyber security", "Cybersecurity"),
    ("cloud computing", "Cloud Computing"),
    ("computer architecture", "Computer Architecture"),
    ("machine learning", "Machine Learning"),
    ("image processing", "Image Processing"),
    ("computer networking", "Computer Networking"),
    ("computer networks", "Computer Networking"),
    ("networking", "Computer Networking"),
    ("software engineering", "Software Engineering"),
];

/// Process-wide canonical subject table.
pub static SUBJECTS: LazyLock<SubjectTable> = LazyLock::new(SubjectTable::standard);

/// Lowercase subject label to its canonical display name.
#[derive(Debug)]
pub struct SubjectTable {
    by_key: HashMap<&'static str, &'static str>,
}

impl SubjectTable {
    pub fn standard() -> Self {
        Self {
            by_key: CANONICAL.iter().copied().collect(),
        }
    }

    /// Map a raw subject label to its category.
    ///
    /// Missing or empty input is treated as `"General"`. Unknown labels pass
    /// through cleaned; only a label that cleans down to nothing becomes `"General"`.
    pub fn canonicalize(&self, raw: Option<&str>) -> String {
        let raw = raw.filter(|s| !s.is_empty()).unwrap_or(DEFAULT_SUBJECT);
        let cleaned = clean_label(raw);

        if let Some(canonical) = self.by_key.get(cleaned.to_lowercase().as_str()) {
            return canonical.to_string();
        }
        if cleaned.is_empty() {
            DEFAULT_SUBJECT.to_string()
        } else {
            cleaned
        }
    }

    /// `"All"` followed by the distinct canonical subjects in first-seen order,
    /// without `"General"`.
    pub fn distinct<'a, I>(&self, raw_subjects: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut seen = HashSet::new();
        let mut out = vec![ALL_SUBJECTS.to_string()];

        for raw in raw_subjects.into_iter().filter(|s| !s.is_empty()) {
            let subject = self.canonicalize(Some(raw));
            if subject != DEFAULT_SUBJECT && seen.insert(subject.clone()) {
                out.push(subject);
            }
        }
        out
    }
}

fn clean_label(raw: &str) -> String {
    let s = strip_leading_hashes(raw);
    let s = strip_emphasis(&s);
    let s = LABEL_PREFIX_RE.replace(&s, "");
    let s = LEADING_COLON_RE.replace(&s, "");
    s.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canon(raw: &str) -> String {
        SUBJECTS.canonicalize(Some(raw))
    }

    #[test]
    fn label_prefix_and_case() {
        assert_eq!(canon("Subject Name: cyber security"), "Cybersecurity");
        assert_eq!(canon("CYBER SECURITY"), "Cybersecurity");
        assert_eq!(canon("subject: Machine Learning"), "Machine Learning");
        assert_eq!(canon("Subject : networking"), "Computer Networking");
    }

    #[test]
    fn markdown_noise_removed() {
        assert_eq!(canon("## **Cloud Computing**"), "Cloud Computing");
        assert_eq!(canon("**Subject:** *Image Processing*"), "Image Processing");
    }

    #[test]
    fn idempotent() {
        for raw in ["Subject Name: cyber security", "Quantum Stuff", "computer networks", ""] {
            let once = canon(raw);
            assert_eq!(canon(&once), once);
        }
    }

    #[test]
    fn unknown_passes_through() {
        assert_eq!(canon("Quantum Stuff"), "Quantum Stuff");
        assert_eq!(canon("# Quantum Stuff  "), "Quantum Stuff");
    }

    #[test]
    fn missing_or_blank_is_general() {
        assert_eq!(SUBJECTS.canonicalize(None), "General");
        assert_eq!(canon(""), "General");
        assert_eq!(canon("## **"), "General");
        assert_eq!(canon("Subject:"), "General");
    }

    #[test]
    fn distinct_listing() {
        let raw = [
            "cyber security",
            "Subject: Cybersecurity",
            "",
            "General",
            "Quantum Stuff",
            "networking",
            "Computer Networks",
        ];
        assert_eq!(
            SUBJECTS.distinct(raw),
            vec!["All", "Cybersecurity", "Quantum Stuff", "Computer Networking"]
        );
    }

    #[test]
    fn distinct_of_nothing_is_all() {
        assert_eq!(SUBJECTS.distinct(std::iter::empty()), vec!["All"]);
    }
}
