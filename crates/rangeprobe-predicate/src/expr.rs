use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CmpOp {
    Lt,
    Lte,
    Gt,
    Gte,
    Eq,
}

impl CmpOp {
    pub fn apply(self, lhs: i64, rhs: i64) -> bool {
        match self {
            CmpOp::Lt => lhs < rhs,
            CmpOp::Lte => lhs <= rhs,
            CmpOp::Gt => lhs > rhs,
            CmpOp::Gte => lhs >= rhs,
            CmpOp::Eq => lhs == rhs,
        }
    }

    /// The operator that gives the same answer with operands swapped:
    /// `20 > A` is `A < 20`.
    pub fn flipped(self) -> CmpOp {
        match self {
            CmpOp::Lt => CmpOp::Gt,
            CmpOp::Lte => CmpOp::Gte,
            CmpOp::Gt => CmpOp::Lt,
            CmpOp::Gte => CmpOp::Lte,
            CmpOp::Eq => CmpOp::Eq,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            CmpOp::Lt => "<",
            CmpOp::Lte => "<=",
            CmpOp::Gt => ">",
            CmpOp::Gte => ">=",
            CmpOp::Eq => "=",
        }
    }
}

/// Structured range predicate over integer attributes.
///
/// Evaluated by walking the tree against an assignment; there is no textual
/// evaluation step anywhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Predicate {
    /// `attribute op value`.
    Comparison {
        attribute: String,
        op: CmpOp,
        value: i64,
    },
    /// `start <= attribute <= end`. Empty when `start > end`.
    Range {
        attribute: String,
        start: i64,
        end: i64,
    },
    And {
        terms: Vec<Predicate>,
    },
    Or {
        terms: Vec<Predicate>,
    },
}

impl Predicate {
    pub fn cmp(attribute: impl Into<String>, op: CmpOp, value: i64) -> Self {
        Predicate::Comparison {
            attribute: attribute.into(),
            op,
            value,
        }
    }

    pub fn range(attribute: impl Into<String>, start: i64, end: i64) -> Self {
        Predicate::Range {
            attribute: attribute.into(),
            start,
            end,
        }
    }

    /// Conjunction, flattening nested `And`s. A single term is returned as is.
    pub fn and(terms: Vec<Predicate>) -> Self {
        let mut flat = Vec::with_capacity(terms.len());
        for term in terms {
            match term {
                Predicate::And { terms } => flat.extend(terms),
                other => flat.push(other),
            }
        }
        if flat.len() == 1 {
            return flat.remove(0);
        }
        Predicate::And { terms: flat }
    }

    /// Disjunction, flattening nested `Or`s. A single term is returned as is.
    pub fn or(terms: Vec<Predicate>) -> Self {
        let mut flat = Vec::with_capacity(terms.len());
        for term in terms {
            match term {
                Predicate::Or { terms } => flat.extend(terms),
                other => flat.push(other),
            }
        }
        if flat.len() == 1 {
            return flat.remove(0);
        }
        Predicate::Or { terms: flat }
    }

    /// Every attribute the predicate reads.
    pub fn attributes(&self) -> BTreeSet<&str> {
        let mut out = BTreeSet::new();
        self.collect_attributes(&mut out);
        out
    }

    fn collect_attributes<'a>(&'a self, out: &mut BTreeSet<&'a str>) {
        match self {
            Predicate::Comparison { attribute, .. } | Predicate::Range { attribute, .. } => {
                out.insert(attribute.as_str());
            }
            Predicate::And { terms } | Predicate::Or { terms } => {
                for term in terms {
                    term.collect_attributes(out);
                }
            }
        }
    }
}

impl std::fmt::Display for Predicate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Predicate::Comparison {
                attribute,
                op,
                value,
            } => write!(f, "{attribute} {} {value}", op.symbol()),
            Predicate::Range {
                attribute,
                start,
                end,
            } => write!(f, "{attribute} BETWEEN {start} AND {end}"),
            Predicate::And { terms } => write_joined(f, terms, " AND "),
            Predicate::Or { terms } => write_joined(f, terms, " OR "),
        }
    }
}

fn write_joined(
    f: &mut std::fmt::Formatter<'_>,
    terms: &[Predicate],
    sep: &str,
) -> std::fmt::Result {
    f.write_str("(")?;
    for (i, term) in terms.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{term}")?;
    }
    f.write_str(")")
}
