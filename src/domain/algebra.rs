//! Composable domains over floating point values
//!
//! A [`Domain`] is an immutable predicate describing which values an operand
//! or result may take. Domains are built from a small algebra: the finite
//! reals, the integers, half-open comparisons, finite allow-lists, and the
//! usual set combinators. Membership checks are pure and total; asking
//! whether NaN is in a domain is always answerable (it never is, for the
//! base domains).

/// A comparison operator used by [`Domain::Comparison`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Less,
    LessEq,
    Greater,
    GreaterEq,
}

impl CompareOp {
    /// Tests `value <op> threshold`. NaN fails every comparison.
    fn matches(self, value: f64, threshold: f64) -> bool {
        match self {
            CompareOp::Less => value < threshold,
            CompareOp::LessEq => value <= threshold,
            CompareOp::Greater => value > threshold,
            CompareOp::GreaterEq => value >= threshold,
        }
    }
}

/// A set of acceptable values, expressed as a predicate tree.
///
/// `All` is the set of finite reals and is the only gate keeping NaN and
/// the infinities off the stack: every entry path (typed input, clipboard
/// paste, computed results) checks against it before a value is stored.
#[derive(Debug, Clone, PartialEq)]
pub enum Domain {
    /// All finite reals.
    All,
    /// Values that are mathematically integral, including integral floats.
    Integers,
    /// Values satisfying a single comparison against a threshold.
    Comparison(CompareOp, f64),
    /// An explicit finite allow-list.
    Set(Vec<f64>),
    /// Values in either operand.
    Union(Box<Domain>, Box<Domain>),
    /// Values in both operands.
    Intersect(Box<Domain>, Box<Domain>),
    /// Values in the left operand but not the right.
    Minus(Box<Domain>, Box<Domain>),
}

impl Domain {
    /// The finite reals.
    pub fn all() -> Self {
        Domain::All
    }

    /// The integers (integral floats included).
    pub fn integers() -> Self {
        Domain::Integers
    }

    /// A domain containing exactly the given values.
    pub fn set(values: impl IntoIterator<Item = f64>) -> Self {
        Domain::Set(values.into_iter().collect())
    }

    /// A domain containing exactly one value.
    pub fn single(value: f64) -> Self {
        Domain::Set(vec![value])
    }

    /// Returns true when `value` is a member of this domain.
    ///
    /// Cost is linear in the depth of the combinator tree.
    pub fn contains(&self, value: f64) -> bool {
        match self {
            Domain::All => value.is_finite(),
            Domain::Integers => value.is_finite() && value.floor() == value,
            Domain::Comparison(op, threshold) => op.matches(value, *threshold),
            Domain::Set(values) => values.contains(&value),
            Domain::Union(left, right) => left.contains(value) || right.contains(value),
            Domain::Intersect(left, right) => left.contains(value) && right.contains(value),
            Domain::Minus(left, right) => left.contains(value) && !right.contains(value),
        }
    }

    /// Values in `self` or `other`.
    ///
    /// Two allow-lists merge into a single one instead of growing the tree.
    pub fn union_with(self, other: Domain) -> Self {
        match (self, other) {
            (Domain::Set(mut left), Domain::Set(right)) => {
                for value in right {
                    if !left.contains(&value) {
                        left.push(value);
                    }
                }
                Domain::Set(left)
            }
            (left, right) => Domain::Union(Box::new(left), Box::new(right)),
        }
    }

    /// Values in both `self` and `other`.
    pub fn intersect_with(self, other: Domain) -> Self {
        Domain::Intersect(Box::new(self), Box::new(other))
    }

    /// Values in `self` but not in `other`.
    pub fn minus(self, other: Domain) -> Self {
        Domain::Minus(Box::new(self), Box::new(other))
    }

    /// Values in `self` except the listed ones. Shorthand for subtracting
    /// a finite allow-list.
    pub fn without(self, values: impl IntoIterator<Item = f64>) -> Self {
        self.minus(Domain::set(values))
    }

    /// Restricts to values strictly below `threshold`.
    pub fn less_than(self, threshold: f64) -> Self {
        self.comparison(CompareOp::Less, threshold)
    }

    /// Restricts to values at or below `threshold`.
    pub fn at_most(self, threshold: f64) -> Self {
        self.comparison(CompareOp::LessEq, threshold)
    }

    /// Restricts to values strictly above `threshold`.
    pub fn greater_than(self, threshold: f64) -> Self {
        self.comparison(CompareOp::Greater, threshold)
    }

    /// Restricts to values at or above `threshold`.
    pub fn at_least(self, threshold: f64) -> Self {
        self.comparison(CompareOp::GreaterEq, threshold)
    }

    /// Applied to `All` this yields a bare comparison; applied to anything
    /// else it intersects, so chained comparisons compose without
    /// re-deriving the base domain.
    fn comparison(self, op: CompareOp, threshold: f64) -> Self {
        let restriction = Domain::Comparison(op, threshold);
        if self == Domain::All {
            restriction
        } else {
            self.intersect_with(restriction)
        }
    }
}
