//! Drives the finite-state parser over an input string.
//!
//! The executor scans one character at a time, asks the current state's mapper
//! for the next transition, then runs every callback registered for that
//! transition. Callbacks build up variable names and captured bodies in a
//! [`ParseContext`] and push finished terms onto its result list. Captured
//! bodies of parentheticals and lambdas are parsed by calling the executor
//! again on the captured text.

use std::collections::HashMap;
use std::fmt::Display;

use lazy_static::lazy_static;
use log::{debug, trace};

use crate::finite_state_parsing::{
    default_transition_mappers, end_of_input_transition, GrammarError, ParserState, Transition,
    TransitionMapper,
};
use crate::lexical_analysis::{is_variable_symbol, NestingTracker};
use crate::term_representation::{Expression, Term, Variable};

/// Nesting depth of captured bodies allowed by default.
pub const DEFAULT_MAX_NESTING_DEPTH: usize = 256;

/// Config for the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserConfig {
    /// How many captured bodies may be nested inside each other before parsing
    /// fails with `ParseError::NestingTooDeep`.
    pub max_nesting_depth: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        return Self {
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
        };
    }
}

/// Errors that may be returned by a parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    Grammar(GrammarError),
    Nested {
        captured_text: String,
        source: Box<ParseError>,
    },
    InvalidBinding {
        binding: String,
    },
    NestingTooDeep {
        limit: usize,
    },
    UnmappedState {
        state: ParserState,
    },
}

impl ParseError {
    /// Follows `Nested` wrappers down to the error that started the failure.
    pub fn root_cause(&self) -> &ParseError {
        let mut current = self;

        while let ParseError::Nested { source, .. } = current {
            current = &**source;
        }

        return current;
    }
}

/// Display trait implementation for ParseError.
impl Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Grammar(grammar_error) => {
                return write!(f, "Grammar error: {}", grammar_error);
            }

            Self::Nested {
                captured_text,
                source,
            } => {
                return write!(f, "In captured expression {:?}: {}", captured_text, source);
            }

            Self::InvalidBinding { binding } => {
                return write!(
                    f,
                    "Cannot finish lambda: binding {:?} is not a variable name.",
                    binding
                );
            }

            Self::NestingTooDeep { limit } => {
                return write!(f, "Expressions nested more than {} levels deep.", limit);
            }

            Self::UnmappedState { state } => {
                return write!(f, "No transition mapper registered for state ({}).", state);
            }
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Grammar(grammar_error) => return Some(grammar_error),
            Self::Nested { source, .. } => return Some(&**source),
            _ => return None,
        }
    }
}

/// Type conversions for errors.
impl From<GrammarError> for ParseError {
    fn from(value: GrammarError) -> Self {
        return Self::Grammar(value);
    }
}

/// Everything a single parse run accumulates. Each run owns its own context.
#[derive(Debug)]
pub struct ParseContext {
    pub state: ParserState,
    pub nesting: NestingTracker,
    /// Letters and digits of the variable or binding being read.
    pub name_buffer: String,
    /// Raw text of the lambda body or parenthetical being captured.
    pub body_buffer: String,
    pub terms: Vec<Term>,
    /// How many captured bodies enclose this run. Zero at the top level.
    pub level: usize,
}

impl ParseContext {
    pub fn new(level: usize) -> Self {
        return Self {
            state: ParserState::Initial,
            nesting: NestingTracker::new(),
            name_buffer: String::new(),
            body_buffer: String::new(),
            terms: Vec::new(),
            level: level,
        };
    }
}

/// Selects the transitions a callback runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackTrigger {
    /// Exactly this transition.
    Exact(Transition),
    /// Any transition out of the state, self-loops included.
    Leaving(ParserState),
    /// Any transition into the state, self-loops included.
    Entering(ParserState),
}

impl CallbackTrigger {
    pub fn matches(&self, transition: &Transition) -> bool {
        match self {
            Self::Exact(exact) => return exact == transition,
            Self::Leaving(state) => return transition.from == *state,
            Self::Entering(state) => return transition.to == *state,
        };
    }
}

/// Code run on a transition. Receives the character that caused it, or `None`
/// for the transition into `E_0`.
pub type TransitionCallback =
    fn(&TransitionExecutor, &mut ParseContext, Option<char>) -> Result<(), ParseError>;

/// Owns the state-to-mapper table and the callback registry, and runs parses
/// against them. The tables are never modified by a parse, so one executor can
/// serve any number of parses.
#[derive(Clone)]
pub struct TransitionExecutor {
    transition_mappers: HashMap<ParserState, TransitionMapper>,
    transition_callbacks: Vec<(CallbackTrigger, TransitionCallback)>,
    config: ParserConfig,
}

lazy_static! {
    static ref default_executor: TransitionExecutor =
        TransitionExecutor::new(ParserConfig::default());
}

impl TransitionExecutor {
    /// An executor with the grammar's mappers and the callbacks that build
    /// terms.
    pub fn new(config: ParserConfig) -> Self {
        let mut executor = Self::without_callbacks(config);
        executor.register_default_callbacks();
        return executor;
    }

    /// An executor with the grammar's mappers and no callbacks. Parsing with it
    /// only validates the input.
    pub fn without_callbacks(config: ParserConfig) -> Self {
        return Self {
            transition_mappers: default_transition_mappers(),
            transition_callbacks: Vec::new(),
            config: config,
        };
    }

    pub fn config(&self) -> &ParserConfig {
        return &self.config;
    }

    /// Adds a callback. Callbacks matching the same transition run in the order
    /// they were registered.
    pub fn register_callback(&mut self, trigger: CallbackTrigger, callback: TransitionCallback) {
        self.transition_callbacks.push((trigger, callback));
    }

    fn register_default_callbacks(&mut self) {
        use ParserState::*;

        // A finished variable has to be stored before the first character of
        // whatever follows is recorded.
        for next_state in [VariableLetters, LambdaStart, ParenBody, End] {
            self.register_callback(
                CallbackTrigger::Exact(Transition::new(VariableDigits, next_state)),
                capture_variable,
            );
        }
        self.register_callback(
            CallbackTrigger::Exact(Transition::new(VariableLetters, End)),
            capture_variable,
        );

        for name_state in [VariableLetters, VariableDigits, BindingLetters, BindingDigits] {
            self.register_callback(
                CallbackTrigger::Entering(name_state),
                build_variable_character,
            );
        }

        for body_state in [ParenBody, LambdaBody] {
            self.register_callback(
                CallbackTrigger::Exact(Transition::new(body_state, body_state)),
                build_body_character,
            );
        }

        self.register_callback(
            CallbackTrigger::Exact(Transition::new(ParenBody, ParenEnd)),
            capture_parenthetical,
        );
        self.register_callback(
            CallbackTrigger::Exact(Transition::new(LambdaBody, LambdaEnd)),
            capture_lambda,
        );
    }

    /// Every callback registered for `transition`, in registration order.
    pub fn callbacks_for(&self, transition: &Transition) -> Vec<TransitionCallback> {
        return self
            .transition_callbacks
            .iter()
            .filter(|(trigger, _)| trigger.matches(transition))
            .map(|(_, callback)| *callback)
            .collect();
    }

    /// Runs the callbacks for `transition`, stopping at the first error.
    pub fn apply(
        &self,
        transition: &Transition,
        context: &mut ParseContext,
        c: Option<char>,
    ) -> Result<(), ParseError> {
        for callback in self.callbacks_for(transition) {
            callback(self, context, c)?;
        }

        return Ok(());
    }

    /// Parses `text` into its top-level terms.
    pub fn parse(&self, text: &str) -> Result<Vec<Term>, ParseError> {
        return self.parse_at_level(text, 0);
    }

    /// Parses text captured from inside another expression. Errors are wrapped
    /// with the captured text.
    pub fn parse_nested(&self, captured_text: &str, level: usize) -> Result<Vec<Term>, ParseError> {
        let nested_result = if level > self.config.max_nesting_depth {
            Err(ParseError::NestingTooDeep {
                limit: self.config.max_nesting_depth,
            })
        } else {
            debug!("Parsing captured text {:?} at level {}", captured_text, level);
            self.parse_at_level(captured_text, level)
        };

        return nested_result.map_err(|nested_error| ParseError::Nested {
            captured_text: String::from(captured_text),
            source: Box::new(nested_error),
        });
    }

    fn parse_at_level(&self, text: &str, level: usize) -> Result<Vec<Term>, ParseError> {
        // ASCII only: full case mapping would turn characters like `ß` into
        // letters the grammar accepts.
        let normalized_text = text.to_ascii_uppercase();
        let mut context = ParseContext::new(level);

        for c in normalized_text.chars() {
            context.nesting.update(c);

            let mapper = self
                .transition_mappers
                .get(&context.state)
                .ok_or(ParseError::UnmappedState {
                    state: context.state,
                })?;
            let transition = mapper(c, &context.nesting)?;

            trace!("{} on {:?}", transition, c);
            context.state = transition.to;
            self.apply(&transition, &mut context, Some(c))?;
        }

        // Flush whatever is still pending by moving into the end state.
        let final_transition = end_of_input_transition(context.state)?;
        trace!("{} at end of input", final_transition);
        context.state = final_transition.to;
        self.apply(&final_transition, &mut context, None)?;

        return Ok(context.terms);
    }
}

impl std::fmt::Debug for TransitionExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let triggers: Vec<&CallbackTrigger> = self
            .transition_callbacks
            .iter()
            .map(|(trigger, _)| trigger)
            .collect();

        return f
            .debug_struct("TransitionExecutor")
            .field("mapped_states", &self.transition_mappers.len())
            .field("callback_triggers", &triggers)
            .field("config", &self.config)
            .finish();
    }
}

impl Default for TransitionExecutor {
    fn default() -> Self {
        return Self::new(ParserConfig::default());
    }
}

/// Parses `text` with the default config.
pub fn parse(text: &str) -> Result<Vec<Term>, ParseError> {
    return default_executor.parse(text);
}

/// Appends the current character to the pending variable name.
pub fn build_variable_character(
    _executor: &TransitionExecutor,
    context: &mut ParseContext,
    c: Option<char>,
) -> Result<(), ParseError> {
    if let Some(c) = c {
        context.name_buffer.push(c);
    }

    return Ok(());
}

/// Turns the pending variable name into a variable term.
pub fn capture_variable(
    _executor: &TransitionExecutor,
    context: &mut ParseContext,
    _c: Option<char>,
) -> Result<(), ParseError> {
    let symbol = std::mem::take(&mut context.name_buffer);
    debug!("Captured variable {}", symbol);

    context.terms.push(Term::Variable(Variable::new(symbol)));
    return Ok(());
}

/// Appends the current character to the captured body.
pub fn build_body_character(
    _executor: &TransitionExecutor,
    context: &mut ParseContext,
    c: Option<char>,
) -> Result<(), ParseError> {
    if let Some(c) = c {
        context.body_buffer.push(c);
    }

    return Ok(());
}

/// Parses the captured body and stores it as one unbound group.
pub fn capture_parenthetical(
    executor: &TransitionExecutor,
    context: &mut ParseContext,
    _c: Option<char>,
) -> Result<(), ParseError> {
    let body = std::mem::take(&mut context.body_buffer);
    let body_terms = executor.parse_nested(&body, context.level + 1)?;

    let group = Expression::concatenate(body_terms);
    debug!("Captured parenthetical {}", group);

    context.terms.push(Term::Expression(group));
    return Ok(());
}

/// Parses the captured body and stores it abstracted over the pending binding.
pub fn capture_lambda(
    executor: &TransitionExecutor,
    context: &mut ParseContext,
    _c: Option<char>,
) -> Result<(), ParseError> {
    let binding = std::mem::take(&mut context.name_buffer);
    let body = std::mem::take(&mut context.body_buffer);

    if !is_variable_symbol(&binding) {
        return Err(ParseError::InvalidBinding { binding: binding });
    }

    let body_terms = executor.parse_nested(&body, context.level + 1)?;
    let lambda =
        Term::Expression(Expression::concatenate(body_terms)).abstract_over(&Variable::new(binding));
    debug!("Captured lambda {}", lambda);

    context.terms.push(lambda);
    return Ok(());
}
