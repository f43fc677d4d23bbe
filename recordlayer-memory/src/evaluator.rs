//! Query expression evaluation for in-memory record filtering.
//!
//! Stored records are BSON documents. Field names in expressions may be dotted paths that
//! descend into embedded documents, so `customer.id` reads the `id` of an embedded
//! `customer` record.

use std::{cmp::Ordering, collections::HashMap};

use bson::{Bson, Document, datetime::DateTime};

use recordlayer_core::{
    error::{RecordError, RecordResult},
    query::{Expr, Predicate, QueryVisitor},
};

/// Type-erased, comparable representation of BSON values.
///
/// Integers and floats are kept apart so large identities compare exactly, but compare
/// with each other numerically.
#[derive(Debug)]
pub(crate) enum Comparable<'a> {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    DateTime(DateTime),
    String(&'a str),
    Array(Vec<Comparable<'a>>),
    Map(HashMap<&'a str, Comparable<'a>>),
    /// Values of other BSON types never compare equal or ordered.
    Opaque,
}

impl<'a> From<&'a Bson> for Comparable<'a> {
    fn from(bson: &'a Bson) -> Self {
        match bson {
            Bson::Null => Comparable::Null,
            Bson::Boolean(value) => Comparable::Bool(*value),
            Bson::Int32(value) => Comparable::Int(i64::from(*value)),
            Bson::Int64(value) => Comparable::Int(*value),
            Bson::Double(value) => Comparable::Float(*value),
            Bson::DateTime(value) => Comparable::DateTime(*value),
            Bson::String(value) => Comparable::String(value),
            Bson::Array(items) => Comparable::Array(items.iter().map(Comparable::from).collect()),
            Bson::Document(doc) => Comparable::Map(
                doc.iter()
                    .map(|(key, value)| (key.as_str(), Comparable::from(value)))
                    .collect(),
            ),
            _ => Comparable::Opaque,
        }
    }
}

impl PartialEq for Comparable<'_> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Comparable::Null, Comparable::Null) => true,
            (Comparable::Bool(a), Comparable::Bool(b)) => a == b,
            (Comparable::Int(a), Comparable::Int(b)) => a == b,
            (Comparable::Float(a), Comparable::Float(b)) => a == b,
            (Comparable::Int(a), Comparable::Float(b)) => (*a as f64) == *b,
            (Comparable::Float(a), Comparable::Int(b)) => *a == (*b as f64),
            (Comparable::DateTime(a), Comparable::DateTime(b)) => a == b,
            (Comparable::String(a), Comparable::String(b)) => a == b,
            (Comparable::Array(a), Comparable::Array(b)) => a == b,
            (Comparable::Map(a), Comparable::Map(b)) => a == b,
            _ => false,
        }
    }
}

impl PartialOrd for Comparable<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Comparable::Bool(a), Comparable::Bool(b)) => a.partial_cmp(b),
            (Comparable::Int(a), Comparable::Int(b)) => a.partial_cmp(b),
            (Comparable::Float(a), Comparable::Float(b)) => a.partial_cmp(b),
            (Comparable::Int(a), Comparable::Float(b)) => (*a as f64).partial_cmp(b),
            (Comparable::Float(a), Comparable::Int(b)) => a.partial_cmp(&(*b as f64)),
            (Comparable::DateTime(a), Comparable::DateTime(b)) => a.partial_cmp(b),
            (Comparable::String(a), Comparable::String(b)) => a.partial_cmp(b),
            _ => None,
        }
    }
}

/// Resolves a possibly dotted field path inside `document`.
pub(crate) fn lookup<'a>(document: &'a Bson, path: &str) -> Option<&'a Bson> {
    path.split('.').try_fold(document, |current, segment| match current {
        Bson::Document(doc) => doc.get(segment),
        _ => None,
    })
}

/// Applies `predicate` with the stored value on the left.
pub(crate) fn satisfies(stored: &Bson, predicate: &Predicate) -> bool {
    let left = Comparable::from(stored);
    let right = Comparable::from(predicate.value());

    match predicate {
        Predicate::Equals(_) => left == right,
        Predicate::NotEquals(_) => left != right,
        Predicate::LessThan(_) => left.partial_cmp(&right) == Some(Ordering::Less),
        Predicate::LessOrEqual(_) => matches!(
            left.partial_cmp(&right),
            Some(Ordering::Less | Ordering::Equal)
        ),
        Predicate::GreaterThan(_) => left.partial_cmp(&right) == Some(Ordering::Greater),
        Predicate::GreaterOrEqual(_) => matches!(
            left.partial_cmp(&right),
            Some(Ordering::Greater | Ordering::Equal)
        ),
    }
}

/// Orders two stored documents by the value at `path`. Missing or incomparable values
/// are treated as equal so a stable sort keeps their store order.
pub(crate) fn compare_at(left: &Bson, right: &Bson, path: &str) -> Ordering {
    let left = lookup(left, path).map_or(Comparable::Null, Comparable::from);
    let right = lookup(right, path).map_or(Comparable::Null, Comparable::from);

    left.partial_cmp(&right).unwrap_or(Ordering::Equal)
}

pub(crate) struct RecordEvaluator<'a> {
    document: &'a Bson,
}

impl<'a> RecordEvaluator<'a> {
    pub fn new(document: &'a Bson) -> Self {
        Self { document }
    }

    pub fn evaluate(&mut self, expr: &Expr) -> RecordResult<bool> {
        self.visit_expr(expr)
    }

    /// Keeps the documents matching `expr`, preserving their order.
    pub fn filter_documents(
        documents: impl IntoIterator<Item = &'a Bson>,
        expr: &Expr,
    ) -> RecordResult<Vec<&'a Bson>> {
        let mut matched = Vec::new();

        for document in documents {
            if RecordEvaluator::new(document).evaluate(expr)? {
                matched.push(document);
            }
        }

        Ok(matched)
    }

    fn fields(&self) -> RecordResult<&'a Document> {
        self.document
            .as_document()
            .ok_or_else(|| RecordError::Backend("stored record is not a document".to_string()))
    }
}

impl QueryVisitor for RecordEvaluator<'_> {
    type Output = bool;
    type Error = RecordError;

    fn visit_and(&mut self, exprs: &[Expr]) -> Result<Self::Output, Self::Error> {
        for expr in exprs {
            if !self.visit_expr(expr)? {
                return Ok(false);
            }
        }

        Ok(true)
    }

    fn visit_or(&mut self, exprs: &[Expr]) -> Result<Self::Output, Self::Error> {
        for expr in exprs {
            if self.visit_expr(expr)? {
                return Ok(true);
            }
        }

        Ok(false)
    }

    fn visit_not(&mut self, expr: &Expr) -> Result<Self::Output, Self::Error> {
        Ok(!self.visit_expr(expr)?)
    }

    fn visit_exists(&mut self, field: &str, should_exist: bool) -> Result<Self::Output, Self::Error> {
        self.fields()?;

        Ok(lookup(self.document, field).is_some() == should_exist)
    }

    fn visit_field(&mut self, field: &str, predicate: &Predicate) -> Result<Self::Output, Self::Error> {
        self.fields()?;

        Ok(lookup(self.document, field).is_some_and(|stored| satisfies(stored, predicate)))
    }
}
