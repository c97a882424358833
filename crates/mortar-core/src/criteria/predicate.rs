use crate::Value;

/// Boolean expression tree over attribute comparisons.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    And(Vec<Predicate>),
    Or(Vec<Predicate>),
    /// Negation. Representable so that it can be rejected explicitly: the
    /// compiler does not translate it.
    Not(Box<Predicate>),
    Comparison(Comparison),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub attribute: String,
    pub op: Op,
    /// Operand. `In`/`NotIn` carry a [`Value::List`]; `IsNull`/`IsNotNull`
    /// carry [`Value::Null`].
    pub value: Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    /// Substring match, `%value%`
    Like,
    /// Prefix match, `value%`
    StartsWith,
    /// Suffix match, `%value`
    EndsWith,
    In,
    NotIn,
    IsNull,
    IsNotNull,
}

impl Predicate {
    pub fn and(operands: impl IntoIterator<Item = Predicate>) -> Predicate {
        Predicate::And(operands.into_iter().collect())
    }

    pub fn or(operands: impl IntoIterator<Item = Predicate>) -> Predicate {
        Predicate::Or(operands.into_iter().collect())
    }

    pub fn not(operand: Predicate) -> Predicate {
        Predicate::Not(Box::new(operand))
    }

    pub fn compare(attribute: impl Into<String>, op: Op, value: impl Into<Value>) -> Predicate {
        Predicate::Comparison(Comparison {
            attribute: attribute.into(),
            op,
            value: value.into(),
        })
    }

    pub fn eq(attribute: impl Into<String>, value: impl Into<Value>) -> Predicate {
        Predicate::compare(attribute, Op::Eq, value)
    }

    pub fn ne(attribute: impl Into<String>, value: impl Into<Value>) -> Predicate {
        Predicate::compare(attribute, Op::Ne, value)
    }

    pub fn lt(attribute: impl Into<String>, value: impl Into<Value>) -> Predicate {
        Predicate::compare(attribute, Op::Lt, value)
    }

    pub fn le(attribute: impl Into<String>, value: impl Into<Value>) -> Predicate {
        Predicate::compare(attribute, Op::Le, value)
    }

    pub fn gt(attribute: impl Into<String>, value: impl Into<Value>) -> Predicate {
        Predicate::compare(attribute, Op::Gt, value)
    }

    pub fn ge(attribute: impl Into<String>, value: impl Into<Value>) -> Predicate {
        Predicate::compare(attribute, Op::Ge, value)
    }

    pub fn like(attribute: impl Into<String>, value: impl Into<Value>) -> Predicate {
        Predicate::compare(attribute, Op::Like, value)
    }

    pub fn in_list<I, V>(attribute: impl Into<String>, values: I) -> Predicate
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let list = values.into_iter().map(Into::into).collect::<Vec<_>>();
        Predicate::compare(attribute, Op::In, Value::List(list))
    }

    pub fn not_in<I, V>(attribute: impl Into<String>, values: I) -> Predicate
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let list = values.into_iter().map(Into::into).collect::<Vec<_>>();
        Predicate::compare(attribute, Op::NotIn, Value::List(list))
    }

    pub fn is_null(attribute: impl Into<String>) -> Predicate {
        Predicate::compare(attribute, Op::IsNull, Value::Null)
    }

    /// Combines `self` with `other`, flattening into an existing `And`.
    pub fn and_also(self, other: Predicate) -> Predicate {
        match self {
            Predicate::And(mut operands) => {
                operands.push(other);
                Predicate::And(operands)
            }
            predicate => Predicate::And(vec![predicate, other]),
        }
    }
}
