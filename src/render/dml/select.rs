//! SELECT statement builder.

use serde::{Deserialize, Serialize};

use crate::ast::{Expr, Join};
use crate::error::{SqlError, SqlResult};

use super::super::traits::SqlDialect;
use super::{Filter, Limit, render_filter};

/// One entry of the FROM clause: a table, a join, or a raw SQL fragment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Source {
    Table(String),
    Join(Join),
    Sql(String),
}

impl Source {
    pub fn table(name: impl Into<String>) -> Self {
        Source::Table(name.into())
    }

    pub fn sql(fragment: impl Into<String>) -> Self {
        Source::Sql(fragment.into())
    }
}

impl From<Join> for Source {
    fn from(join: Join) -> Self {
        Source::Join(join)
    }
}

/// ORDER BY entry: an expression carrying its own sort direction, or the
/// dialect's random-order function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum OrderBy {
    Expr(Expr),
    Random,
}

impl From<Expr> for OrderBy {
    fn from(e: Expr) -> Self {
        OrderBy::Expr(e)
    }
}

/// DISTINCT: all selected columns, or PostgreSQL's `DISTINCT ON (columns)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Distinct {
    Rows,
    On(Vec<Expr>),
}

/// A SELECT statement description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectQuery {
    pub fields: Vec<Expr>,
    /// Source tables and joins. When empty, sources are inferred from the
    /// tables the selected fields reference.
    pub from: Vec<Source>,
    pub filter: Option<Filter>,
    pub group_by: Vec<Expr>,
    pub having: Option<Filter>,
    pub order_by: Vec<OrderBy>,
    pub limit: Option<Limit>,
    pub distinct: Option<Distinct>,
}

impl SelectQuery {
    pub fn new(fields: impl IntoIterator<Item = Expr>) -> Self {
        SelectQuery {
            fields: fields.into_iter().collect(),
            from: Vec::new(),
            filter: None,
            group_by: Vec::new(),
            having: None,
            order_by: Vec::new(),
            limit: None,
            distinct: None,
        }
    }

    pub fn source(mut self, source: impl Into<Source>) -> Self {
        self.from.push(source.into());
        self
    }

    pub fn filter(mut self, filter: impl Into<Filter>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    pub fn group_by(mut self, expr: Expr) -> Self {
        self.group_by.push(expr);
        self
    }

    pub fn having(mut self, filter: impl Into<Filter>) -> Self {
        self.having = Some(filter.into());
        self
    }

    pub fn order_by(mut self, order: impl Into<OrderBy>) -> Self {
        self.order_by.push(order.into());
        self
    }

    pub fn limit(mut self, limit: impl Into<Limit>) -> Self {
        self.limit = Some(limit.into());
        self
    }

    pub fn distinct(mut self) -> Self {
        self.distinct = Some(Distinct::Rows);
        self
    }

    pub fn distinct_on(mut self, columns: impl IntoIterator<Item = Expr>) -> Self {
        self.distinct = Some(Distinct::On(columns.into_iter().collect()));
        self
    }
}

/// Generate SELECT SQL.
pub fn build_select(dialect: &dyn SqlDialect, query: &SelectQuery) -> SqlResult<String> {
    if query.fields.is_empty() {
        return Err(SqlError::query("specify at least one field to select"));
    }

    // sources, inferred from the selected fields when absent
    let inferred;
    let sources: &[Source] = if query.from.is_empty() {
        let mut tables: Vec<String> = Vec::new();
        for field in &query.fields {
            for table in field.source_tables() {
                if !tables.contains(&table) {
                    tables.push(table);
                }
            }
        }
        inferred = tables.into_iter().map(Source::Table).collect::<Vec<_>>();
        &inferred
    } else {
        &query.from
    };
    if sources.is_empty() {
        return Err(SqlError::query(
            "no source tables: pass a source or select at least one field bound to a table",
        ));
    }

    let rendered_fields: Vec<String> = query
        .fields
        .iter()
        .map(|f| dialect.render_expr(f))
        .collect::<SqlResult<_>>()?;

    let mut tables = Vec::new();
    let mut texts = Vec::new();
    let mut joins = Vec::new();
    for source in sources {
        match source {
            Source::Table(name) => tables.push(name.clone()),
            Source::Sql(sql) => texts.push(sql.clone()),
            Source::Join(join) => joins.push(format!(
                "{} JOIN {} ON {}",
                join.kind.as_sql(),
                join.table,
                dialect.render_expr(&join.on)?
            )),
        }
    }
    let mut from_clause = String::new();
    if !tables.is_empty() {
        from_clause.push(' ');
        from_clause.push_str(&tables.join(", "));
    }
    if !texts.is_empty() {
        from_clause.push(' ');
        from_clause.push_str(&texts.join(" "));
    }
    if !joins.is_empty() {
        from_clause.push(' ');
        from_clause.push_str(&joins.join(" "));
    }

    let select_head = match &query.distinct {
        None => String::new(),
        Some(Distinct::Rows) => "DISTINCT ".to_string(),
        Some(Distinct::On(columns)) => {
            if !dialect.supports_distinct_on() {
                return Err(SqlError::UnsupportedOperation {
                    dialect: dialect.name(),
                    operation: "DISTINCT ON".to_string(),
                });
            }
            let rendered: Vec<String> = columns
                .iter()
                .map(|c| dialect.render_expr(c))
                .collect::<SqlResult<_>>()?;
            format!("DISTINCT ON ({}) ", rendered.join(", "))
        }
    };

    let where_clause = match &query.filter {
        None => String::new(),
        Some(filter) => format!(" WHERE {}", render_filter(dialect, filter)?),
    };

    let mut tail = String::new();
    if !query.group_by.is_empty() {
        let rendered: Vec<String> = query
            .group_by
            .iter()
            .map(|e| dialect.render_expr(e))
            .collect::<SqlResult<_>>()?;
        tail.push_str(&format!(" GROUP BY {}", rendered.join(", ")));
        if let Some(having) = &query.having {
            tail.push_str(&format!(" HAVING {}", render_filter(dialect, having)?));
        }
    } else if query.having.is_some() {
        return Err(SqlError::query("HAVING requires GROUP BY"));
    }

    if !query.order_by.is_empty() {
        let rendered: Vec<String> = query
            .order_by
            .iter()
            .map(|order| match order {
                OrderBy::Expr(e) => {
                    Ok(format!("{} {}", dialect.render_expr(e)?, e.sort.as_sql()))
                }
                OrderBy::Random => Ok(dialect.random_function().to_string()),
            })
            .collect::<SqlResult<_>>()?;
        tail.push_str(&format!(" ORDER BY {}", rendered.join(", ")));
    }

    tail.push_str(&dialect.limit_clause(query.limit.as_ref()));

    Ok(format!(
        "SELECT {}{} FROM{}{}{}",
        select_head,
        rendered_fields.join(", "),
        from_clause,
        where_clause,
        tail
    ))
}
