//! Text preprocessing ahead of phonemization.
//!
//! Expands digit runs into number words, collapses whitespace, detects the
//! script of the input, and owns the English punctuation pause table.

use super::engine::Language;

/// Detect the language of a text by counting Latin vs. Cyrillic letters.
///
/// Ties and letterless input fall back to Russian, matching the engine's
/// historical default.
pub fn detect_language(text: &str) -> Language {
    let mut latin = 0usize;
    let mut cyrillic = 0usize;
    for ch in text.chars() {
        if ch.is_ascii_alphabetic() {
            latin += 1;
        } else if ('\u{0400}'..='\u{04FF}').contains(&ch) {
            cyrillic += 1;
        }
    }
    if latin > cyrillic {
        Language::English
    } else {
        Language::Russian
    }
}

/// Pause duration in seconds for punctuation, English text.
///
/// Codepoints absent from the table yield zero pause.
pub fn punctuation_pause(ch: char) -> f64 {
    match ch {
        ' ' => 0.08,
        ',' => 0.18,
        ';' => 0.24,
        ':' => 0.22,
        '.' => 0.38,
        '!' => 0.42,
        '?' => 0.40,
        '-' => 0.10,
        '\u{2013}' => 0.18, // en dash
        '\u{2014}' => 0.28, // em dash
        '\n' => 0.45,
        '(' => 0.06,
        ')' => 0.10,
        '"' | '\u{201C}' | '\u{201D}' => 0.04,
        _ => 0.0,
    }
}

/// Expand digit runs to words and collapse whitespace runs to single spaces.
pub fn expand_input(text: &str, language: Language) -> String {
    let mut out = String::with_capacity(text.len() + 16);
    let mut chars = text.chars().peekable();

    while let Some(&ch) = chars.peek() {
        if ch.is_ascii_digit() {
            match language {
                Language::English | Language::Auto => {
                    // Whole run as one number; runs past i64 are spelled digit
                    // by digit instead
                    let mut digits = String::new();
                    while let Some(&d) = chars.peek() {
                        if !d.is_ascii_digit() {
                            break;
                        }
                        chars.next();
                        digits.push(d);
                    }
                    match digits.parse::<i64>() {
                        Ok(value) => append_word(&mut out, &english_number_words(value)),
                        Err(_) => {
                            for d in digits.chars().filter_map(|c| c.to_digit(10)) {
                                append_word(&mut out, ONES[d as usize]);
                            }
                        }
                    }
                }
                Language::Russian => {
                    // Digit-by-digit, the historical Russian behavior
                    while let Some(&d) = chars.peek() {
                        let Some(digit) = d.to_digit(10) else { break };
                        chars.next();
                        append_word(&mut out, super::russian::digit_word(digit as u8));
                    }
                }
            }
        } else if ch == ' ' || ch == '\t' {
            chars.next();
            if !out.is_empty() && !out.ends_with(' ') {
                out.push(' ');
            }
        } else {
            chars.next();
            out.push(ch);
        }
    }

    while out.ends_with(' ') {
        out.pop();
    }
    out
}

fn append_word(out: &mut String, word: &str) {
    if !out.is_empty() && !out.ends_with(' ') {
        out.push(' ');
    }
    out.push_str(word);
    out.push(' ');
}

const ONES: [&str; 20] = [
    "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten",
    "eleven", "twelve", "thirteen", "fourteen", "fifteen", "sixteen", "seventeen", "eighteen",
    "nineteen",
];

const TENS: [&str; 10] = [
    "", "", "twenty", "thirty", "forty", "fifty", "sixty", "seventy", "eighty", "ninety",
];

/// Render an integer as English words, up to the billions.
pub fn english_number_words(n: i64) -> String {
    let mut out = String::new();
    number_words_into(n, &mut out);
    while out.ends_with(' ') {
        out.pop();
    }
    out
}

fn number_words_into(mut n: i64, out: &mut String) {
    if n < 0 {
        out.push_str("negative ");
        n = -n;
    }
    if n < 20 {
        out.push_str(ONES[n as usize]);
        out.push(' ');
    } else if n < 100 {
        out.push_str(TENS[(n / 10) as usize]);
        if n % 10 != 0 {
            out.push(' ');
            out.push_str(ONES[(n % 10) as usize]);
        }
        out.push(' ');
    } else if n < 1_000 {
        number_words_into(n / 100, out);
        out.push_str("hundred ");
        if n % 100 != 0 {
            number_words_into(n % 100, out);
        }
    } else if n < 1_000_000 {
        number_words_into(n / 1_000, out);
        out.push_str("thousand ");
        if n % 1_000 != 0 {
            number_words_into(n % 1_000, out);
        }
    } else if n < 1_000_000_000 {
        number_words_into(n / 1_000_000, out);
        out.push_str("million ");
        if n % 1_000_000 != 0 {
            number_words_into(n % 1_000_000, out);
        }
    } else {
        // Past the billions, spell out digit by digit
        for d in n.to_string().chars().filter_map(|c| c.to_digit(10)) {
            out.push_str(ONES[d as usize]);
            out.push(' ');
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_script_by_majority() {
        assert_eq!(detect_language("hello there"), Language::English);
        assert_eq!(detect_language("привет мир"), Language::Russian);
        assert_eq!(detect_language("12345 ..."), Language::Russian);
        assert_eq!(detect_language(""), Language::Russian);
    }

    #[test]
    fn number_words_cover_the_basic_ranges() {
        assert_eq!(english_number_words(0), "zero");
        assert_eq!(english_number_words(14), "fourteen");
        assert_eq!(english_number_words(42), "forty two");
        assert_eq!(english_number_words(70), "seventy");
        assert_eq!(english_number_words(305), "three hundred five");
        assert_eq!(english_number_words(1_204), "one thousand two hundred four");
        assert_eq!(english_number_words(2_000_000), "two million");
        assert_eq!(english_number_words(-8), "negative eight");
    }

    #[test]
    fn expands_digit_runs_in_place() {
        assert_eq!(
            expand_input("room 42 is free", Language::English),
            "room forty two is free"
        );
        assert_eq!(expand_input("счёт 3", Language::Russian), "счёт три");
    }

    #[test]
    fn overlong_digit_runs_are_spelled_out() {
        let run = "9".repeat(20);
        let expanded = expand_input(&run, Language::English);
        let words: Vec<&str> = expanded.split(' ').collect();
        assert_eq!(words.len(), 20);
        assert!(words.iter().all(|&w| w == "nine"));
    }

    #[test]
    fn collapses_whitespace_runs() {
        assert_eq!(
            expand_input("a  \t b   c ", Language::English),
            "a b c"
        );
    }

    #[test]
    fn unlisted_punctuation_gets_no_pause() {
        assert_eq!(punctuation_pause('~'), 0.0);
        assert!(punctuation_pause('.') > punctuation_pause(','));
    }
}
