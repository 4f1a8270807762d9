const WORDS_PER_MINUTE: usize = 200;

/// Reading time label, never below one minute.
pub fn read_time(text: &str) -> String {
    let words = text.split_whitespace().count();
    let minutes = words.div_ceil(WORDS_PER_MINUTE).max(1);
    format!("{} min read", minutes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(n: usize) -> String {
        vec!["word"; n].join(" ")
    }

    #[test]
    fn empty_is_one_minute() {
        assert_eq!(read_time(""), "1 min read");
        assert_eq!(read_time("  \n\t "), "1 min read");
    }

    #[test]
    fn boundaries() {
        assert_eq!(read_time(&words(200)), "1 min read");
        assert_eq!(read_time(&words(201)), "2 min read");
        assert_eq!(read_time(&words(1000)), "5 min read");
    }

    #[test]
    fn whitespace_runs_count_once() {
        assert_eq!(read_time("a \n\n  b\t\tc"), read_time("a b c"));
    }
}
