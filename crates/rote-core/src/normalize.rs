use unicode_normalization::UnicodeNormalization;

/// Comparable form for words and definitions: NFKC, lower-case, single spaces, trimmed.
pub fn normalize(text: &str) -> String {
    collapse_whitespace(&fold(text))
}

/// Comparable form for example sentences.
///
/// Punctuation is stripped, and a blank placeholder (three or more underscores)
/// becomes a word break, so `"The cat ___ on the mat."` reads as
/// `"the cat on the mat"`.
pub fn normalize_example(text: &str) -> String {
    let stripped: String = fold(text)
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace())
        .collect();

    collapse_whitespace(&replace_blanks(&stripped))
}

fn fold(text: &str) -> String {
    text.nfkc().flat_map(char::to_lowercase).collect()
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn replace_blanks(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut run = 0usize;

    for c in text.chars() {
        if c == '_' {
            run += 1;
            continue;
        }
        flush_run(&mut out, run);
        run = 0;
        out.push(c);
    }
    flush_run(&mut out, run);

    out
}

fn flush_run(out: &mut String, run: usize) {
    if run >= 3 {
        out.push(' ');
    } else {
        out.extend(std::iter::repeat_n('_', run));
    }
}
