//! Data structures to represent untyped lambda calculus terms, and the term
//! algebra used to build, print, compare and substitute into them.
//!
//! Every term has a canonical printed form and two terms are equivalent exactly
//! when their printed forms are equal. The only normalization printing performs
//! is collapsing an unbound expression that wraps a single subterm, so `X1`,
//! `(X1)` and `((X1))` all print as `X1`.

use std::fmt::Display;

/// Symbol used for lambda in printed output. Input uses `L` instead.
pub const LAMBDA_SYMBOL: char = 'λ';

/// Represents a variable such as `X1`. Variables are compared by symbol only.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Variable {
    symbol: String,
}

impl Variable {
    pub fn new(symbol: impl Into<String>) -> Self {
        return Self {
            symbol: symbol.into(),
        };
    }

    pub fn symbol(&self) -> &str {
        return self.symbol.as_str();
    }

    pub fn print(&self) -> String {
        return self.symbol.clone();
    }

    /// Substitution into a variable. When the symbol matches `target` the
    /// result is a copy of `target` itself; `replacement` is never inserted.
    pub fn apply(&self, target: &Variable, _replacement: &Term) -> Term {
        if self.symbol == target.symbol {
            return Term::Variable(target.clone());
        }

        return Term::Variable(self.clone());
    }
}

/// Represents a parenthesized group, an application sequence or, when
/// `binding` is present, a lambda abstraction.
#[derive(Debug, Clone)]
pub struct Expression {
    binding: Option<Variable>,
    subterms: Vec<Term>,
    canonical_text: String,
}

// Concatenates the printed forms of the given terms.
fn concatenate_prints(terms: &[Term]) -> String {
    let mut out_string = String::new();

    for term in terms {
        out_string.push_str(term.print().as_str());
    }

    return out_string;
}

impl Expression {
    /// Wraps `terms` in an unbound expression printing as `(` followed by each
    /// term's print and `)`. Juxtaposed terms and parenthesized groups are both
    /// represented this way.
    pub fn concatenate(terms: Vec<Term>) -> Self {
        let canonical_text = format!("({})", concatenate_prints(&terms));

        return Self {
            binding: None,
            subterms: terms,
            canonical_text: canonical_text,
        };
    }

    pub fn binding(&self) -> Option<&Variable> {
        return self.binding.as_ref();
    }

    pub fn subterms(&self) -> &[Term] {
        return &self.subterms;
    }

    /// The text stored at construction. Differs from `print` only for unbound
    /// expressions wrapping a single subterm.
    pub fn canonical_text(&self) -> &str {
        return self.canonical_text.as_str();
    }

    pub fn is_abstraction(&self) -> bool {
        return self.binding.is_some();
    }

    pub fn print(&self) -> String {
        if self.binding.is_none() && self.subterms.len() == 1 {
            return self.subterms[0].print();
        }

        return self.canonical_text.clone();
    }

    /// Substitutes into every subterm and rebuilds the text as
    /// `λ<binding>.(<subterms>)`. A missing binding prints as nothing.
    ///
    /// There is no shadowing guard: substitution continues beneath a nested
    /// abstraction that rebinds `target`, and no alpha-renaming is done.
    pub fn apply(&self, target: &Variable, replacement: &Term) -> Expression {
        let new_subterms: Vec<Term> = self
            .subterms
            .iter()
            .map(|subterm| subterm.apply(target, replacement))
            .collect();

        let binding_text = match &self.binding {
            Some(binding) => binding.print(),
            None => String::new(),
        };

        let canonical_text = format!(
            "{}{}.({})",
            LAMBDA_SYMBOL,
            binding_text,
            concatenate_prints(&new_subterms)
        );

        return Expression {
            binding: self.binding.clone(),
            subterms: new_subterms,
            canonical_text: canonical_text,
        };
    }

    /// Substitutes into each subterm and wraps the results in a fresh unbound
    /// expression. One explicit beta step; nothing here reduces repeatedly.
    pub fn apply_initial(&self, target: &Variable, replacement: &Term) -> Expression {
        let new_subterms: Vec<Term> = self
            .subterms
            .iter()
            .map(|subterm| subterm.apply(target, replacement))
            .collect();

        return Expression::concatenate(new_subterms);
    }

    /// Applies this abstraction to `argument` using its own binding as the
    /// substitution target. Returns `None` if the expression is unbound.
    pub fn beta_step(&self, argument: &Term) -> Option<Expression> {
        let binding = self.binding.as_ref()?;
        return Some(self.apply_initial(binding, argument));
    }
}

/// A node in a lambda calculus term tree.
#[derive(Debug, Clone)]
pub enum Term {
    Variable(Variable),
    Expression(Expression),
}

impl Term {
    /// Canonical printed form of the term.
    pub fn print(&self) -> String {
        match self {
            Term::Variable(variable) => return variable.print(),
            Term::Expression(expression) => return expression.print(),
        };
    }

    /// Returns `λ<binder>.<self>`. The binder need not occur in the term.
    pub fn abstract_over(&self, binder: &Variable) -> Term {
        let canonical_text = format!("{}{}.{}", LAMBDA_SYMBOL, binder.print(), self.print());

        return Term::Expression(Expression {
            binding: Some(binder.clone()),
            subterms: vec![self.clone()],
            canonical_text: canonical_text,
        });
    }

    /// Deep copy of the term.
    pub fn copy(&self) -> Term {
        return self.clone();
    }

    /// Substitution of `replacement` for `target`. See [`Variable::apply`] and
    /// [`Expression::apply`] for the exact rules.
    pub fn apply(&self, target: &Variable, replacement: &Term) -> Term {
        match self {
            Term::Variable(variable) => return variable.apply(target, replacement),
            Term::Expression(expression) => {
                return Term::Expression(expression.apply(target, replacement));
            }
        };
    }

    /// Two terms are equivalent iff they print identically.
    pub fn equals(&self, other: &Term) -> bool {
        return self.print() == other.print();
    }

    /// Renders the term in input notation. For terms built by parsing,
    /// `concatenate` or `abstract_over`, parsing the result gives back a term
    /// printing identically to `self`. Terms rebuilt by `apply` do not round
    /// trip: their `λ<binding>.(…)` text has no input form.
    pub fn to_source(&self) -> String {
        let mut out_string = String::new();
        to_source_helper(self, &mut out_string);
        return out_string;
    }
}

// Helper function to produce the input notation for a term.
fn to_source_helper(term: &Term, string_so_far: &mut String) {
    match term {
        Term::Variable(variable) => {
            string_so_far.push_str(variable.symbol());
        }
        Term::Expression(expression) => {
            // Parsed lambdas wrap their body in one unbound group, which the
            // `.(` `)` of the lambda already provides.
            let body = match (expression.binding(), expression.subterms()) {
                (Some(_), [Term::Expression(inner)]) if !inner.is_abstraction() => {
                    inner.subterms()
                }
                (_, subterms) => subterms,
            };

            match expression.binding() {
                Some(binding) => {
                    string_so_far.push('L');
                    string_so_far.push_str(binding.symbol());
                    string_so_far.push_str(".(");
                }
                None => {
                    string_so_far.push('(');
                }
            }

            for subterm in body {
                to_source_helper(subterm, string_so_far);
            }

            string_so_far.push(')');
        }
    };
}

impl From<Variable> for Term {
    fn from(value: Variable) -> Self {
        return Term::Variable(value);
    }
}

impl From<Expression> for Term {
    fn from(value: Expression) -> Self {
        return Term::Expression(value);
    }
}

/// Equality is print equality, so structurally different trees can be equal.
impl PartialEq for Term {
    fn eq(&self, other: &Self) -> bool {
        return self.equals(other);
    }
}

impl Eq for Term {}

impl Display for Term {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        return write!(f, "{}", self.print());
    }
}

impl Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        return write!(f, "{}", self.print());
    }
}

impl Display for Variable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        return write!(f, "{}", self.symbol);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var(symbol: &str) -> Term {
        return Term::Variable(Variable::new(symbol));
    }

    // Test if redundant unbound wrappers collapse when printing.
    #[test]
    fn test_redundant_wrapping_collapses() {
        let x = var("X1");
        let once = Term::Expression(Expression::concatenate(vec![x.copy()]));
        let twice = Term::Expression(Expression::concatenate(vec![once.copy()]));

        assert_eq!(once.print(), "X1");
        assert_eq!(twice.print(), "X1");
        assert!(twice.equals(&x));

        if let Term::Expression(expression) = &twice {
            assert_eq!(expression.canonical_text(), "(X1)");
        } else {
            panic!("Expected an expression.");
        }
    }

    // Test if concatenating several terms prints them inside one group.
    #[test]
    fn test_concatenate_multiple_terms() {
        let group = Expression::concatenate(vec![var("X1"), var("Y1"), var("AB23")]);
        assert_eq!(group.print(), "(X1Y1AB23)");
        assert!(!group.is_abstraction());

        let empty = Expression::concatenate(vec![]);
        assert_eq!(empty.print(), "()");
    }

    // Test if abstraction wraps the term and leaves the original untouched.
    #[test]
    fn test_abstraction() {
        let x = var("X1");
        let abstraction = x.abstract_over(&Variable::new("Y1"));

        assert_eq!(abstraction.print(), "λY1.X1");
        assert_eq!(x.print(), "X1");

        let body = Term::Expression(Expression::concatenate(vec![var("X1"), var("Y1")]));
        assert_eq!(body.abstract_over(&Variable::new("Z1")).print(), "λZ1.(X1Y1)");

        if let Term::Expression(expression) = &abstraction {
            assert_eq!(expression.binding(), Some(&Variable::new("Y1")));
            assert_eq!(expression.subterms().len(), 1);
        } else {
            panic!("Expected an expression.");
        }
    }

    // Test if equals agrees with print equality on a few pairs.
    #[test]
    fn test_equals_is_print_equality() {
        let terms = vec![
            var("X1"),
            Term::Expression(Expression::concatenate(vec![var("X1")])),
            var("Y1"),
            var("X1").abstract_over(&Variable::new("Y1")),
            Term::Expression(Expression::concatenate(vec![var("X1"), var("Y1")])),
        ];

        for a in &terms {
            for b in &terms {
                assert_eq!(a.equals(b), a.print() == b.print());
                assert_eq!(a == b, a.print() == b.print());
            }
        }
    }

    // Test if a copy is equivalent to the original and independent of it.
    #[test]
    fn test_copy() {
        let original = Term::Expression(Expression::concatenate(vec![
            var("X1"),
            var("Y1").abstract_over(&Variable::new("Y1")),
        ]));
        let copied = original.copy();
        assert!(copied.equals(&original));

        let replaced = copied.apply(&Variable::new("X1"), &var("Z1"));
        assert_eq!(original.print(), "(X1λY1.Y1)");
        assert_ne!(replaced.print(), original.print());
    }

    // Matching variables yield the target itself, not the replacement.
    #[test]
    fn test_variable_apply_returns_target() {
        let x = var("X1");
        let replacement = var("Z9");

        assert_eq!(x.apply(&Variable::new("X1"), &replacement).print(), "X1");
        assert_eq!(x.apply(&Variable::new("Y1"), &replacement).print(), "X1");
    }

    // Test if applying into an abstraction rebuilds its text in substitution
    // form.
    #[test]
    fn test_expression_apply_rebuilds_text() {
        let abstraction = Term::Expression(Expression::concatenate(vec![var("X1"), var("Y1")]))
            .abstract_over(&Variable::new("Y1"));
        assert_eq!(abstraction.print(), "λY1.(X1Y1)");

        // The unbound body group is rebuilt with an empty binding as well.
        let applied = abstraction.apply(&Variable::new("X1"), &var("Z1"));
        assert_eq!(applied.print(), "λY1.(λ.(X1Y1))");
    }

    // An unbound expression has no binder to print, so its rebuilt text starts
    // with an empty lambda header.
    #[test]
    fn test_unbound_apply_prints_empty_binding() {
        let group = Term::Expression(Expression::concatenate(vec![var("X1"), var("Y1")]));
        let applied = group.apply(&Variable::new("X1"), &var("Z1"));

        assert_eq!(applied.print(), "λ.(X1Y1)");
    }

    // Text rebuilt by apply is lost when rendering back to input notation.
    #[test]
    fn test_to_source_after_apply() {
        let group = Term::Expression(Expression::concatenate(vec![var("X1"), var("Y1")]));
        let applied = group.apply(&Variable::new("X1"), &var("Z1"));

        assert_eq!(applied.to_source(), "(X1Y1)");
        assert_eq!(group.to_source(), "(X1Y1)");
        assert!(!applied.equals(&group));
    }

    // Known limitation: substitution descends beneath an abstraction that
    // rebinds the target instead of stopping there.
    #[test]
    fn test_apply_ignores_shadowing() {
        let inner = var("X1").abstract_over(&Variable::new("X1"));
        assert_eq!(inner.print(), "λX1.X1");

        let applied = inner.apply(&Variable::new("X1"), &var("Z1"));
        assert_eq!(applied.print(), "λX1.(X1)");
        assert!(!applied.equals(&inner));
    }

    // Test if apply_initial and beta_step produce an unbound group.
    #[test]
    fn test_apply_initial_and_beta_step() {
        let identity = match var("X1").abstract_over(&Variable::new("X1")) {
            Term::Expression(expression) => expression,
            Term::Variable(_) => panic!("Expected an expression."),
        };

        let stepped = identity
            .beta_step(&var("W1"))
            .expect("Abstraction should allow a beta step.");
        assert!(!stepped.is_abstraction());
        assert_eq!(stepped.canonical_text(), "(X1)");
        assert_eq!(stepped.print(), "X1");

        let body = Term::Expression(Expression::concatenate(vec![var("X1"), var("Y1")]));
        let abstraction = match body.abstract_over(&Variable::new("X1")) {
            Term::Expression(expression) => expression,
            Term::Variable(_) => panic!("Expected an expression."),
        };

        let initial = abstraction.apply_initial(&Variable::new("Y1"), &var("W1"));
        assert_eq!(initial.subterms().len(), 1);
        assert_eq!(initial.print(), "λ.(X1Y1)");

        let unbound = Expression::concatenate(vec![var("X1")]);
        assert!(unbound.beta_step(&var("W1")).is_none());
    }

    // Test if to_source renders input notation.
    #[test]
    fn test_to_source() {
        let abstraction = Term::Expression(Expression::concatenate(vec![var("X1"), var("Y1")]))
            .abstract_over(&Variable::new("Z1"));
        assert_eq!(abstraction.to_source(), "LZ1.(X1Y1)");

        let group = Term::Expression(Expression::concatenate(vec![
            var("X1"),
            Term::Expression(Expression::concatenate(vec![var("Y1")])),
        ]));
        assert_eq!(group.to_source(), "(X1(Y1))");

        let nested = var("X1")
            .abstract_over(&Variable::new("Y1"))
            .abstract_over(&Variable::new("Z1"));
        assert_eq!(nested.to_source(), "LZ1.(LY1.(X1))");
    }

    // Test the Display implementations.
    #[test]
    fn test_display() {
        let abstraction = var("X1").abstract_over(&Variable::new("Y1"));
        assert_eq!(format!("{}", abstraction), "λY1.X1");
        assert_eq!(format!("{}", Variable::new("Q7")), "Q7");
        assert_eq!(
            format!("{}", Expression::concatenate(vec![var("A1"), var("B2")])),
            "(A1B2)"
        );
    }
}
