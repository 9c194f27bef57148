//! States of the parser and the pure transition functions that enforce the
//! grammar:
//!
//! ```text
//! expr          := variable | lambda | parenthetical
//! variable      := LETTER+ DIGIT+
//! lambda        := 'L' LETTER+ DIGIT+ '.' '(' expr* ')'
//! parenthetical := '(' expr* ')'
//! ```
//!
//! Each state has one mapper computing the next transition from the next
//! (already uppercased) character. Bodies of lambdas and parentheticals are not
//! parsed here; the mappers only find their closing parenthesis.

use std::collections::HashMap;
use std::fmt::Display;

use crate::lexical_analysis::{is_decimal_digit, is_uppercase_letter, NestingTracker};

/// Represents a state of the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParserState {
    /// `I_i`: nothing read yet.
    Initial,
    /// `L_i`: read the `L` starting a lambda.
    LambdaStart,
    /// `LV1`: reading the letters of a binder.
    BindingLetters,
    /// `LV2`: reading the digits of a binder.
    BindingDigits,
    /// `LV3`: read the `.` ending a binder.
    BindingDot,
    /// `LP1`: capturing a lambda body.
    LambdaBody,
    /// `L_f`: read the `)` closing a lambda body.
    LambdaEnd,
    /// `V_i`: reading the letters of a variable.
    VariableLetters,
    /// `V_f`: reading the digits of a variable.
    VariableDigits,
    /// `P_i`: capturing the contents of a parenthetical.
    ParenBody,
    /// `P_f`: read the `)` closing a parenthetical.
    ParenEnd,
    /// `E_0`: entered once after the last character.
    End,
}

impl ParserState {
    /// Every state, in declaration order.
    pub const ALL: [ParserState; 12] = [
        ParserState::Initial,
        ParserState::LambdaStart,
        ParserState::BindingLetters,
        ParserState::BindingDigits,
        ParserState::BindingDot,
        ParserState::LambdaBody,
        ParserState::LambdaEnd,
        ParserState::VariableLetters,
        ParserState::VariableDigits,
        ParserState::ParenBody,
        ParserState::ParenEnd,
        ParserState::End,
    ];

    /// Short name used in diagnostics.
    pub fn short_name(&self) -> &'static str {
        match self {
            ParserState::Initial => return "I_i",
            ParserState::LambdaStart => return "L_i",
            ParserState::BindingLetters => return "LV1",
            ParserState::BindingDigits => return "LV2",
            ParserState::BindingDot => return "LV3",
            ParserState::LambdaBody => return "LP1",
            ParserState::LambdaEnd => return "L_f",
            ParserState::VariableLetters => return "V_i",
            ParserState::VariableDigits => return "V_f",
            ParserState::ParenBody => return "P_i",
            ParserState::ParenEnd => return "P_f",
            ParserState::End => return "E_0",
        };
    }

    /// Whether input may end while the parser is in this state.
    pub fn accepts_end_of_input(&self) -> bool {
        return matches!(
            self,
            ParserState::Initial
                | ParserState::VariableLetters
                | ParserState::VariableDigits
                | ParserState::LambdaEnd
                | ParserState::ParenEnd
        );
    }
}

impl Display for ParserState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        return write!(f, "{}", self.short_name());
    }
}

/// A move from one state to another. Self-loops are transitions too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Transition {
    pub from: ParserState,
    pub to: ParserState,
}

impl Transition {
    pub fn new(from: ParserState, to: ParserState) -> Self {
        return Self { from: from, to: to };
    }
}

impl Display for Transition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        return write!(f, "{} -> {}", self.from, self.to);
    }
}

/// Represents a rejection of the input by a state mapper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrammarError {
    UnexpectedCharacter {
        state: ParserState,
        found: char,
        expected: &'static str,
    },
    UnexpectedEndOfInput {
        state: ParserState,
    },
}

/// Display trait implementation for GrammarError.
impl Display for GrammarError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnexpectedCharacter {
                state,
                found,
                expected,
            } => {
                return write!(
                    f,
                    "Parser in state ({}) encountered invalid next character {:?}. Expected: {}.",
                    state, found, expected
                );
            }

            Self::UnexpectedEndOfInput { state } => {
                return write!(f, "Input ended while parser was in state ({}).", state);
            }
        }
    }
}

impl std::error::Error for GrammarError {}

/// Computes the transition out of one particular state given the next
/// character and the nesting depth after counting that character.
pub type TransitionMapper = fn(char, &NestingTracker) -> Result<Transition, GrammarError>;

const EXPRESSION_START: &str = "'L', '(' or an uppercase letter";

// Shared dispatch for every position where a new expression may start.
fn map_expression_start(from: ParserState, c: char) -> Result<Transition, GrammarError> {
    // `L` always starts a lambda, so it is checked before the letter class.
    if c == 'L' {
        return Ok(Transition::new(from, ParserState::LambdaStart));
    }

    if c == '(' {
        return Ok(Transition::new(from, ParserState::ParenBody));
    }

    if is_uppercase_letter(c) {
        return Ok(Transition::new(from, ParserState::VariableLetters));
    }

    return Err(GrammarError::UnexpectedCharacter {
        state: from,
        found: c,
        expected: EXPRESSION_START,
    });
}

// Shared body capture: stay until the matching `)` brings the depth to zero.
fn map_captured_body(
    from: ParserState,
    closed: ParserState,
    c: char,
    nesting: &NestingTracker,
) -> Result<Transition, GrammarError> {
    if c == ')' && nesting.depth() == 0 {
        return Ok(Transition::new(from, closed));
    }

    return Ok(Transition::new(from, from));
}

/// Mapper for `I_i`.
pub fn map_from_initial(c: char, _nesting: &NestingTracker) -> Result<Transition, GrammarError> {
    return map_expression_start(ParserState::Initial, c);
}

/// Mapper for `L_i`: a binder must start with a letter.
pub fn map_from_lambda_start(
    c: char,
    _nesting: &NestingTracker,
) -> Result<Transition, GrammarError> {
    if is_uppercase_letter(c) {
        return Ok(Transition::new(
            ParserState::LambdaStart,
            ParserState::BindingLetters,
        ));
    }

    return Err(GrammarError::UnexpectedCharacter {
        state: ParserState::LambdaStart,
        found: c,
        expected: "an uppercase letter starting the lambda binding",
    });
}

/// Mapper for `LV1`.
pub fn map_from_binding_letters(
    c: char,
    _nesting: &NestingTracker,
) -> Result<Transition, GrammarError> {
    let from = ParserState::BindingLetters;

    if is_uppercase_letter(c) {
        return Ok(Transition::new(from, ParserState::BindingLetters));
    }

    if is_decimal_digit(c) {
        return Ok(Transition::new(from, ParserState::BindingDigits));
    }

    return Err(GrammarError::UnexpectedCharacter {
        state: from,
        found: c,
        expected: "a letter or digit of the lambda binding",
    });
}

/// Mapper for `LV2`.
pub fn map_from_binding_digits(
    c: char,
    _nesting: &NestingTracker,
) -> Result<Transition, GrammarError> {
    let from = ParserState::BindingDigits;

    if is_decimal_digit(c) {
        return Ok(Transition::new(from, ParserState::BindingDigits));
    }

    if c == '.' {
        return Ok(Transition::new(from, ParserState::BindingDot));
    }

    return Err(GrammarError::UnexpectedCharacter {
        state: from,
        found: c,
        expected: "a digit or the '.' ending the lambda binding",
    });
}

/// Mapper for `LV3`.
pub fn map_from_binding_dot(c: char, _nesting: &NestingTracker) -> Result<Transition, GrammarError> {
    if c == '(' {
        return Ok(Transition::new(
            ParserState::BindingDot,
            ParserState::LambdaBody,
        ));
    }

    return Err(GrammarError::UnexpectedCharacter {
        state: ParserState::BindingDot,
        found: c,
        expected: "'(' opening the lambda body",
    });
}

/// Mapper for `LP1`.
pub fn map_from_lambda_body(c: char, nesting: &NestingTracker) -> Result<Transition, GrammarError> {
    return map_captured_body(ParserState::LambdaBody, ParserState::LambdaEnd, c, nesting);
}

/// Mapper for `L_f`.
pub fn map_from_lambda_end(c: char, _nesting: &NestingTracker) -> Result<Transition, GrammarError> {
    return map_expression_start(ParserState::LambdaEnd, c);
}

/// Mapper for `V_i`: a variable needs at least one digit before anything
/// other than another letter may follow.
pub fn map_from_variable_letters(
    c: char,
    _nesting: &NestingTracker,
) -> Result<Transition, GrammarError> {
    let from = ParserState::VariableLetters;

    if is_uppercase_letter(c) {
        return Ok(Transition::new(from, ParserState::VariableLetters));
    }

    if is_decimal_digit(c) {
        return Ok(Transition::new(from, ParserState::VariableDigits));
    }

    return Err(GrammarError::UnexpectedCharacter {
        state: from,
        found: c,
        expected: "a letter or digit of the variable name",
    });
}

/// Mapper for `V_f`.
pub fn map_from_variable_digits(
    c: char,
    _nesting: &NestingTracker,
) -> Result<Transition, GrammarError> {
    let from = ParserState::VariableDigits;

    if is_decimal_digit(c) {
        return Ok(Transition::new(from, ParserState::VariableDigits));
    }

    return map_expression_start(from, c);
}

/// Mapper for `P_i`.
pub fn map_from_paren_body(c: char, nesting: &NestingTracker) -> Result<Transition, GrammarError> {
    return map_captured_body(ParserState::ParenBody, ParserState::ParenEnd, c, nesting);
}

/// Mapper for `P_f`.
pub fn map_from_paren_end(c: char, _nesting: &NestingTracker) -> Result<Transition, GrammarError> {
    return map_expression_start(ParserState::ParenEnd, c);
}

/// Mapper for `E_0`. Nothing may follow the end of input.
pub fn map_from_end(c: char, _nesting: &NestingTracker) -> Result<Transition, GrammarError> {
    return Err(GrammarError::UnexpectedCharacter {
        state: ParserState::End,
        found: c,
        expected: "no further input",
    });
}

/// The synthetic transition into `E_0` taken after the last character.
pub fn end_of_input_transition(state: ParserState) -> Result<Transition, GrammarError> {
    if state.accepts_end_of_input() {
        return Ok(Transition::new(state, ParserState::End));
    }

    return Err(GrammarError::UnexpectedEndOfInput { state: state });
}

/// Builds the map from each state to its mapper.
pub fn default_transition_mappers() -> HashMap<ParserState, TransitionMapper> {
    let mut out: HashMap<ParserState, TransitionMapper> = HashMap::new();

    out.insert(ParserState::Initial, map_from_initial);
    out.insert(ParserState::LambdaStart, map_from_lambda_start);
    out.insert(ParserState::BindingLetters, map_from_binding_letters);
    out.insert(ParserState::BindingDigits, map_from_binding_digits);
    out.insert(ParserState::BindingDot, map_from_binding_dot);
    out.insert(ParserState::LambdaBody, map_from_lambda_body);
    out.insert(ParserState::LambdaEnd, map_from_lambda_end);
    out.insert(ParserState::VariableLetters, map_from_variable_letters);
    out.insert(ParserState::VariableDigits, map_from_variable_digits);
    out.insert(ParserState::ParenBody, map_from_paren_body);
    out.insert(ParserState::ParenEnd, map_from_paren_end);
    out.insert(ParserState::End, map_from_end);

    return out;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Runs the default mappers over input_str and returns the visited states,
    // or the first grammar error.
    fn run_states(input_str: &str) -> Result<Vec<ParserState>, GrammarError> {
        let mappers = default_transition_mappers();
        let mut nesting = NestingTracker::new();
        let mut state = ParserState::Initial;
        let mut out = vec![];

        for c in input_str.chars() {
            nesting.update(c);
            let transition = mappers[&state](c, &nesting)?;
            assert_eq!(transition.from, state);
            state = transition.to;
            out.push(state);
        }

        out.push(end_of_input_transition(state)?.to);
        return Ok(out);
    }

    // Test if every state has a mapper.
    #[test]
    fn test_every_state_is_mapped() {
        let mappers = default_transition_mappers();

        for state in ParserState::ALL {
            assert!(mappers.contains_key(&state), "No mapper for {}", state);
        }
    }

    // Test the state sequence for a variable followed by a lambda.
    #[test]
    fn test_variable_then_lambda_states() {
        use ParserState::*;

        let states = run_states("AB12LX1.(Y1)").expect("Input should be accepted.");
        assert_eq!(
            states,
            vec![
                VariableLetters,
                VariableLetters,
                VariableDigits,
                VariableDigits,
                LambdaStart,
                BindingLetters,
                BindingDigits,
                BindingDot,
                LambdaBody,
                LambdaBody,
                LambdaBody,
                LambdaEnd,
                End,
            ]
        );
    }

    // Test if interior parentheses do not close a captured body early.
    #[test]
    fn test_nested_parentheses_stay_captured() {
        use ParserState::*;

        let states = run_states("((X1)Y1)").expect("Input should be accepted.");
        assert_eq!(states.len(), 9);
        assert!(states[..7].iter().all(|state| *state == ParenBody));
        assert_eq!(states[7], ParenEnd);
        assert_eq!(states[8], End);
    }

    // Test if L starts a lambda at an expression start but is a plain letter
    // inside a name.
    #[test]
    fn test_l_handling() {
        let mut nesting = NestingTracker::new();
        nesting.update('L');

        assert_eq!(
            map_from_initial('L', &nesting),
            Ok(Transition::new(ParserState::Initial, ParserState::LambdaStart))
        );
        assert_eq!(
            map_from_variable_digits('L', &nesting),
            Ok(Transition::new(
                ParserState::VariableDigits,
                ParserState::LambdaStart
            ))
        );
        assert_eq!(
            map_from_variable_letters('L', &nesting),
            Ok(Transition::new(
                ParserState::VariableLetters,
                ParserState::VariableLetters
            ))
        );
    }

    // Test the grammar errors raised by malformed input.
    #[test]
    fn test_grammar_rejections() {
        let cases = vec![
            ("1X", ParserState::Initial, '1'),
            (")", ParserState::Initial, ')'),
            ("X(", ParserState::VariableLetters, '('),
            ("X1.", ParserState::VariableDigits, '.'),
            ("L1", ParserState::LambdaStart, '1'),
            ("LX.", ParserState::BindingLetters, '.'),
            ("LX1X1", ParserState::BindingDigits, 'X'),
            ("LX1.X", ParserState::BindingDot, 'X'),
            ("(X1)1", ParserState::ParenEnd, '1'),
        ];

        for (input_str, expected_state, expected_char) in cases {
            match run_states(input_str) {
                Err(GrammarError::UnexpectedCharacter { state, found, .. }) => {
                    assert_eq!(state, expected_state, "Wrong state for {}", input_str);
                    assert_eq!(found, expected_char, "Wrong char for {}", input_str);
                }
                other => panic!("Unexpected result for {}: {:?}", input_str, other),
            }
        }
    }

    // Test which states may be followed by the end of input.
    #[test]
    fn test_end_of_input() {
        assert!(run_states("").is_ok());
        assert!(run_states("X1").is_ok());
        assert!(run_states("X").is_ok());

        assert_eq!(
            run_states("(X1"),
            Err(GrammarError::UnexpectedEndOfInput {
                state: ParserState::ParenBody
            })
        );
        assert_eq!(
            run_states("LX1"),
            Err(GrammarError::UnexpectedEndOfInput {
                state: ParserState::BindingDigits
            })
        );
        assert_eq!(
            map_from_end('X', &NestingTracker::new()),
            Err(GrammarError::UnexpectedCharacter {
                state: ParserState::End,
                found: 'X',
                expected: "no further input",
            })
        );
    }

    // Test the error message names the state and the character.
    #[test]
    fn test_grammar_error_display() {
        let error = GrammarError::UnexpectedCharacter {
            state: ParserState::BindingDigits,
            found: 'X',
            expected: "a digit",
        };

        let message = error.to_string();
        assert!(message.contains("LV2"));
        assert!(message.contains("'X'"));
    }
}
