//! Query construction and filtering API for record stores.
//!
//! A query is a filter expression over record fields plus optional sorting and
//! pagination. The common case, a conjunction of per-field predicates, is built with
//! [`QueryBuilder::eq`] and [`QueryBuilder::matching`]:
//!
//! ```ignore
//! use recordlayer::query::{Predicate, Query, SortDirection};
//!
//! let query = Query::builder()
//!     .eq("name", "abc")
//!     .matching("price", Predicate::gte(10.0))
//!     .sort("price", SortDirection::Desc)
//!     .limit(10)
//!     .build();
//! ```
//!
//! # Predicates
//!
//! A [`Predicate`] wraps a comparison value and the relation the stored value must have
//! with it. The stored value is always the left operand: `Predicate::gte(10)` matches
//! stored values `>= 10`. A literal query value is the same as [`Predicate::Equals`].
//!
//! # Filter Expression API
//!
//! [`Filter`] builds [`Expr`] trees directly:
//!
//! - Comparison: `eq`, `ne`, `gt`, `gte`, `lt`, `lte`, `matches`
//! - Existence: `exists`, `not_exists`
//! - Logical: `and`, `or`
//!
//! Field names may be dotted paths (`"customer.id"`) to reach into embedded records.

use bson::Bson;

use crate::error::RecordError;

/// Sort direction for query results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    /// Ascending order (A to Z, 0 to 9, earliest to latest).
    Asc,
    /// Descending order (Z to A, 9 to 0, latest to earliest).
    Desc,
}

/// Sort specification for query results.
#[derive(Debug, Clone, PartialEq)]
pub struct Sort {
    /// The field name to sort by.
    pub field: String,
    /// The sort direction.
    pub direction: SortDirection,
}

/// A comparison value together with the relation a stored value must satisfy.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Stored value equals the wrapped value.
    Equals(Bson),
    /// Stored value differs from the wrapped value.
    NotEquals(Bson),
    /// Stored value is less than the wrapped value.
    LessThan(Bson),
    /// Stored value is less than or equal to the wrapped value.
    LessOrEqual(Bson),
    /// Stored value is greater than the wrapped value.
    GreaterThan(Bson),
    /// Stored value is greater than or equal to the wrapped value.
    GreaterOrEqual(Bson),
}

impl Predicate {
    pub fn eq(value: impl Into<Bson>) -> Self {
        Predicate::Equals(value.into())
    }

    pub fn ne(value: impl Into<Bson>) -> Self {
        Predicate::NotEquals(value.into())
    }

    pub fn lt(value: impl Into<Bson>) -> Self {
        Predicate::LessThan(value.into())
    }

    pub fn lte(value: impl Into<Bson>) -> Self {
        Predicate::LessOrEqual(value.into())
    }

    pub fn gt(value: impl Into<Bson>) -> Self {
        Predicate::GreaterThan(value.into())
    }

    pub fn gte(value: impl Into<Bson>) -> Self {
        Predicate::GreaterOrEqual(value.into())
    }

    /// The wrapped comparison value.
    pub fn value(&self) -> &Bson {
        match self {
            Predicate::Equals(value)
            | Predicate::NotEquals(value)
            | Predicate::LessThan(value)
            | Predicate::LessOrEqual(value)
            | Predicate::GreaterThan(value)
            | Predicate::GreaterOrEqual(value) => value,
        }
    }
}

/// A filter expression for querying records.
///
/// Expressions can be combined using logical operators (`And`, `Or`, `Not`)
/// to build complex filter predicates.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Logical AND of multiple expressions (all must match).
    And(Vec<Expr>),
    /// Logical OR of multiple expressions (any must match).
    Or(Vec<Expr>),
    /// Logical NOT of an expression (inverts the result).
    Not(Box<Expr>),
    /// Checks if a field exists or doesn't exist.
    Exists(String, bool),
    /// Field predicate. A record missing the field never matches.
    Field {
        /// The field name (or dotted path) to compare.
        field: String,
        /// The relation the stored value must satisfy.
        predicate: Predicate,
    },
}

impl Expr {
    /// Creates a field predicate expression.
    pub fn field(field: impl Into<String>, predicate: Predicate) -> Self {
        Expr::Field { field: field.into(), predicate }
    }

    /// Combines this expression with another using logical AND.
    ///
    /// If this expression is already an AND, the other expression is appended
    /// to the list. Otherwise, a new AND expression is created.
    pub fn and(self, other: Expr) -> Self {
        match self {
            Expr::And(mut list) => {
                list.push(other);
                Expr::And(list)
            }
            _ => Expr::And(vec![self, other]),
        }
    }

    /// Combines this expression with another using logical OR.
    pub fn or(self, other: Expr) -> Self {
        match self {
            Expr::Or(mut list) => {
                list.push(other);
                Expr::Or(list)
            }
            _ => Expr::Or(vec![self, other]),
        }
    }

    /// Negates this expression (logical NOT).
    pub fn not(self) -> Self {
        Expr::Not(Box::new(self))
    }
}

/// A structured query for retrieving and filtering records.
///
/// An empty query (no filter) matches every record. Results keep store order unless a
/// sort is given.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    /// Optional filter expression to match records.
    pub filter: Option<Expr>,
    /// Maximum number of records to return.
    pub limit: Option<usize>,
    /// Number of records to skip.
    pub offset: Option<usize>,
    /// Sort specification for results.
    pub sort: Option<Sort>,
}

impl Query {
    /// Creates a new empty query that matches everything.
    pub fn new() -> Self {
        Query::default()
    }

    /// Creates a new query builder for fluent construction.
    pub fn builder() -> QueryBuilder {
        QueryBuilder::new()
    }

    /// Builds a conjunction of field predicates, one per pair.
    pub fn matching<F>(pairs: impl IntoIterator<Item = (F, Predicate)>) -> Self
    where
        F: Into<String>,
    {
        pairs
            .into_iter()
            .fold(QueryBuilder::new(), |builder, (field, predicate)| {
                builder.matching(field, predicate)
            })
            .build()
    }
}

impl From<Expr> for Query {
    fn from(filter: Expr) -> Self {
        Query { filter: Some(filter), ..Query::default() }
    }
}

/// Helper struct for constructing filter expressions.
///
/// # Example
///
/// ```ignore
/// use recordlayer::query::Filter;
///
/// let expr = Filter::eq("name", "abc")
///     .and(Filter::gt("price", 10.0));
/// ```
pub struct Filter;

impl Filter {
    /// Matches records whose field equals `value`.
    pub fn eq(field: impl Into<String>, value: impl Into<Bson>) -> Expr {
        Expr::field(field, Predicate::eq(value))
    }

    /// Matches records whose field differs from `value`.
    pub fn ne(field: impl Into<String>, value: impl Into<Bson>) -> Expr {
        Expr::field(field, Predicate::ne(value))
    }

    /// Matches records whose field is greater than `value`.
    pub fn gt(field: impl Into<String>, value: impl Into<Bson>) -> Expr {
        Expr::field(field, Predicate::gt(value))
    }

    /// Matches records whose field is greater than or equal to `value`.
    pub fn gte(field: impl Into<String>, value: impl Into<Bson>) -> Expr {
        Expr::field(field, Predicate::gte(value))
    }

    /// Matches records whose field is less than `value`.
    pub fn lt(field: impl Into<String>, value: impl Into<Bson>) -> Expr {
        Expr::field(field, Predicate::lt(value))
    }

    /// Matches records whose field is less than or equal to `value`.
    pub fn lte(field: impl Into<String>, value: impl Into<Bson>) -> Expr {
        Expr::field(field, Predicate::lte(value))
    }

    /// Matches records whose field satisfies `predicate`.
    pub fn matches(field: impl Into<String>, predicate: Predicate) -> Expr {
        Expr::field(field, predicate)
    }

    /// Matches records where the field is present.
    pub fn exists(field: impl Into<String>) -> Expr {
        Expr::Exists(field.into(), true)
    }

    /// Matches records where the field is absent.
    pub fn not_exists(field: impl Into<String>) -> Expr {
        Expr::Exists(field.into(), false)
    }

    /// Combines expressions such that all must match.
    pub fn and(exprs: impl IntoIterator<Item = Expr>) -> Expr {
        Expr::And(exprs.into_iter().collect())
    }

    /// Combines expressions such that any may match.
    pub fn or(exprs: impl IntoIterator<Item = Expr>) -> Expr {
        Expr::Or(exprs.into_iter().collect())
    }
}

#[derive(Debug, Clone, Default)]
pub struct QueryBuilder {
    query: Query,
}

impl QueryBuilder {
    /// Creates a new query builder.
    pub fn new() -> Self {
        QueryBuilder { query: Query::default() }
    }

    /// Adds `filter` to the query, AND-ed with anything already present.
    pub fn filter(mut self, filter: Expr) -> Self {
        self.query.filter = Some(match self.query.filter.take() {
            Some(existing) => existing.and(filter),
            None => filter,
        });
        self
    }

    /// Requires `field` to equal `value`.
    pub fn eq(self, field: impl Into<String>, value: impl Into<Bson>) -> Self {
        self.filter(Filter::eq(field, value))
    }

    /// Requires `field` to satisfy `predicate`.
    pub fn matching(self, field: impl Into<String>, predicate: Predicate) -> Self {
        self.filter(Filter::matches(field, predicate))
    }

    /// Sets the maximum number of records to return.
    pub fn limit(mut self, limit: usize) -> Self {
        self.query.limit = Some(limit);
        self
    }

    /// Sets the number of records to skip.
    pub fn offset(mut self, offset: usize) -> Self {
        self.query.offset = Some(offset);
        self
    }

    /// Sets the sort specification for the query results.
    pub fn sort(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.query.sort = Some(Sort { field: field.into(), direction });
        self
    }

    /// Builds and returns the final query.
    pub fn build(self) -> Query {
        self.query
    }
}

/// Walks a filter expression. Backends implement this to evaluate or translate queries.
pub trait QueryVisitor {
    type Output;
    type Error: Into<RecordError>;

    fn visit_and(&mut self, exprs: &[Expr]) -> Result<Self::Output, Self::Error>;
    fn visit_or(&mut self, exprs: &[Expr]) -> Result<Self::Output, Self::Error>;
    fn visit_not(&mut self, expr: &Expr) -> Result<Self::Output, Self::Error>;
    fn visit_exists(
        &mut self,
        field: &str,
        should_exist: bool,
    ) -> Result<Self::Output, Self::Error>;
    fn visit_field(
        &mut self,
        field: &str,
        predicate: &Predicate,
    ) -> Result<Self::Output, Self::Error>;

    fn visit_expr(&mut self, expr: &Expr) -> Result<Self::Output, Self::Error> {
        match expr {
            Expr::And(exprs) => self.visit_and(exprs),
            Expr::Or(exprs) => self.visit_or(exprs),
            Expr::Not(expr) => self.visit_not(expr),
            Expr::Exists(field, should_exist) => self.visit_exists(field, *should_exist),
            Expr::Field { field, predicate } => self.visit_field(field, predicate),
        }
    }
}
