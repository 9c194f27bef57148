//! Character-level helpers consumed by the parser: classifiers for the
//! characters that make up variable names, and a running parenthesis counter.

use lazy_static::lazy_static;
use regex::Regex;

// The different classes of text the parser needs to recognize.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
enum CharClass {
    UppercaseLetter,
    DecimalDigit,
    DecimalDigitRun,
    VariableSymbol,
}

// Represents how to recognize a character class.
#[derive(Debug)]
struct CharRule {
    char_class: CharClass,
    regex: Regex,
}

// Vector of regex patterns that correspond to each character class. Every
// pattern is anchored at both ends so it must match the whole input.
lazy_static! {
    static ref char_rules: Vec<CharRule> = vec![
        CharRule {
            char_class: CharClass::UppercaseLetter,
            regex: Regex::new(r"^[A-Z]$").expect("Unable to compile UppercaseLetter rule regex."),
        },
        CharRule {
            char_class: CharClass::DecimalDigit,
            regex: Regex::new(r"^[0-9]$").expect("Unable to compile DecimalDigit rule regex."),
        },
        CharRule {
            char_class: CharClass::DecimalDigitRun,
            regex: Regex::new(r"^[0-9]+$").expect("Unable to compile DecimalDigitRun rule regex."),
        },
        CharRule {
            char_class: CharClass::VariableSymbol,
            regex: Regex::new(r"^[A-Z]+[0-9]+$")
                .expect("Unable to compile VariableSymbol rule regex."),
        },
    ];
}

// Gets the rule for a specific character class.
fn get_rule_for_char_class(char_class: CharClass) -> Option<&'static CharRule> {
    char_rules
        .iter()
        .find(|char_rule| char_rule.char_class == char_class)
}

// Checks whether the whole of input_str belongs to the given class.
fn matches_char_class(input_str: &str, char_class: CharClass) -> bool {
    match get_rule_for_char_class(char_class) {
        Some(char_rule) => return char_rule.regex.is_match(input_str),
        None => return false,
    };
}

/// Returns true if `c` is an ASCII uppercase letter (`A` to `Z`).
pub fn is_uppercase_letter(c: char) -> bool {
    let mut buf = [0u8; 4];
    return matches_char_class(c.encode_utf8(&mut buf), CharClass::UppercaseLetter);
}

/// Returns true if `c` is a decimal digit (`0` to `9`).
pub fn is_decimal_digit(c: char) -> bool {
    let mut buf = [0u8; 4];
    return matches_char_class(c.encode_utf8(&mut buf), CharClass::DecimalDigit);
}

/// Returns true if `s` is a non-empty run of decimal digits.
pub fn is_decimal_digit_run(s: &str) -> bool {
    return matches_char_class(s, CharClass::DecimalDigitRun);
}

/// Returns true if `s` is a complete variable name: uppercase letters followed
/// by one or more digits, e.g. `X1` or `AB23`.
pub fn is_variable_symbol(s: &str) -> bool {
    return matches_char_class(s, CharClass::VariableSymbol);
}

/// Running count of unmatched open parentheses, updated one character at a
/// time.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NestingTracker {
    depth: i32,
}

impl NestingTracker {
    /// Creates a tracker at depth zero.
    pub fn new() -> Self {
        return Self { depth: 0 };
    }

    /// Counts `c` if it is a parenthesis. Other characters are ignored.
    pub fn update(&mut self, c: char) {
        match c {
            '(' => self.depth += 1,
            ')' => self.depth -= 1,
            _ => {}
        }
    }

    /// Current number of unmatched `(`. Negative once more `)` than `(` have
    /// been seen.
    pub fn depth(&self) -> i32 {
        return self.depth;
    }
}
