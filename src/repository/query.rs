//! SQL text for generic list queries.
//!
//! Identifiers come from the static registry and are always quoted; every
//! value is emitted as a `?` placeholder with its bind collected alongside.

use diesel::query_builder::BoxedSqlQuery;
use diesel::sql_types::{BigInt, Double, Text};
use diesel::sqlite::Sqlite;
use diesel::{RunQueryDsl, SqliteConnection};

use crate::domain::list::{FilterCondition, FilterOperator, FilterValue, OrderClause};
use crate::models::document::{RowCount, RowId};
use crate::repository::ListQuery;
use crate::repository::errors::RepositoryResult;

/// SQL fragment with its positional binds.
#[derive(Debug, Default, PartialEq)]
pub struct SqlParts {
    pub sql: String,
    pub binds: Vec<FilterValue>,
}

fn quote(identifier: &str) -> String {
    format!("\"{}\"", identifier.replace('"', "\"\""))
}

fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}

fn condition_sql(condition: &FilterCondition, parts: &mut SqlParts) -> String {
    let column = quote(condition.field.column_name());
    let values = &condition.values;
    let comparison = |op: &str| format!("{column} {op} ?");

    let sql = match condition.operator {
        FilterOperator::Eq => comparison("="),
        FilterOperator::NotEq => format!("({column} IS NULL OR {column} != ?)"),
        FilterOperator::Lt => comparison("<"),
        FilterOperator::Le => comparison("<="),
        FilterOperator::Gt => comparison(">"),
        FilterOperator::Ge => comparison(">="),
        FilterOperator::Like => comparison("LIKE"),
        FilterOperator::NotLike => format!("({column} IS NULL OR {column} NOT LIKE ?)"),
        FilterOperator::In if values.is_empty() => "1 = 0".to_string(),
        FilterOperator::In => format!("{column} IN ({})", placeholders(values.len())),
        FilterOperator::NotIn if values.is_empty() => "1 = 1".to_string(),
        FilterOperator::NotIn => format!(
            "({column} IS NULL OR {column} NOT IN ({}))",
            placeholders(values.len())
        ),
        FilterOperator::IsSet => format!("({column} IS NOT NULL AND {column} != '')"),
        FilterOperator::IsNotSet => format!("({column} IS NULL OR {column} = '')"),
        FilterOperator::Between => format!("{column} BETWEEN ? AND ?"),
    };

    if !matches!(
        condition.operator,
        FilterOperator::IsSet | FilterOperator::IsNotSet
    ) {
        parts.binds.extend(values.iter().cloned());
    }
    sql
}

/// `WHERE` clause: hub scope, every condition, then the free-text search.
pub fn where_clause(query: &ListQuery) -> SqlParts {
    let mut parts = SqlParts::default();
    let mut clauses = vec![format!("{} = ?", quote("hub_id"))];
    parts
        .binds
        .push(FilterValue::Int(i64::from(query.hub_id.get())));

    for condition in &query.conditions {
        clauses.push(condition_sql(condition, &mut parts));
    }

    if let Some(term) = &query.search {
        let columns: Vec<&str> = query
            .meta
            .search_fields
            .iter()
            .filter_map(|name| query.meta.resolve(name))
            .map(|field| field.column_name())
            .collect();
        if !columns.is_empty() {
            let pattern = format!("%{term}%");
            let search = columns
                .iter()
                .map(|column| format!("{} LIKE ?", quote(column)))
                .collect::<Vec<_>>()
                .join(" OR ");
            clauses.push(format!("({search})"));
            parts
                .binds
                .extend(columns.iter().map(|_| FilterValue::Text(pattern.clone())));
        }
    }

    parts.sql = clauses.join(" AND ");
    parts
}

/// `ORDER BY` body with `id DESC` as the final tie breaker.
pub fn order_clause(order: &[OrderClause]) -> String {
    let mut terms: Vec<String> = order
        .iter()
        .map(|clause| {
            format!(
                "{} {}",
                quote(clause.field.column_name()),
                clause.direction.as_sql()
            )
        })
        .collect();
    if !order.iter().any(|clause| clause.field.column_name() == "id") {
        terms.push(format!("{} DESC", quote("id")));
    }
    terms.join(", ")
}

pub fn count_sql(query: &ListQuery) -> SqlParts {
    let filter = where_clause(query);
    SqlParts {
        sql: format!(
            "SELECT COUNT(*) AS count FROM {} WHERE {}",
            quote(query.meta.table),
            filter.sql
        ),
        binds: filter.binds,
    }
}

pub fn ids_sql(query: &ListQuery) -> SqlParts {
    let mut parts = where_clause(query);
    let mut sql = format!(
        "SELECT {} AS id FROM {} WHERE {} ORDER BY {}",
        quote("id"),
        quote(query.meta.table),
        parts.sql,
        order_clause(&query.order)
    );
    if let Some(pagination) = &query.pagination {
        sql.push_str(" LIMIT ? OFFSET ?");
        parts
            .binds
            .push(FilterValue::Int(sql_count(pagination.per_page)));
        parts
            .binds
            .push(FilterValue::Int(sql_count(pagination.offset())));
    }
    parts.sql = sql;
    parts
}

fn sql_count(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

fn bound(parts: SqlParts) -> BoxedSqlQuery<'static, Sqlite, diesel::query_builder::SqlQuery> {
    let mut query = diesel::sql_query(parts.sql).into_boxed::<Sqlite>();
    for value in parts.binds {
        query = match value {
            FilterValue::Text(text) => query.bind::<Text, _>(text),
            FilterValue::Int(number) => query.bind::<BigInt, _>(number),
            FilterValue::Float(number) => query.bind::<Double, _>(number),
        };
    }
    query
}

pub fn load_count(conn: &mut SqliteConnection, query: &ListQuery) -> RepositoryResult<usize> {
    let rows = bound(count_sql(query)).load::<RowCount>(conn)?;
    Ok(rows
        .first()
        .map(|row| usize::try_from(row.count).unwrap_or_default())
        .unwrap_or_default())
}

pub fn load_ids(conn: &mut SqliteConnection, query: &ListQuery) -> RepositoryResult<Vec<i32>> {
    let rows = bound(ids_sql(query)).load::<RowId>(conn)?;
    Ok(rows.into_iter().map(|row| row.id).collect())
}
