//! Statement builders the generated relations and persistence methods call.
//!
//! Every builder renders to `(sql, params)` with `?` placeholders. Columns,
//! conditions and parameters keep insertion order so the rendered statement
//! and its bind list line up.

use strum::{AsRefStr, Display};

use crate::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
pub enum Order {
    #[strum(serialize = "ASC")]
    Asc,
    #[strum(serialize = "DESC")]
    Desc,
}

/// A `WHERE`/`HAVING` fragment and the values bound to its placeholders.
///
/// A bare column name with one argument renders as `column = ?`, with several
/// as `column IN (?, ?)`. Conditions that already contain placeholders are
/// kept as written.
#[derive(Debug, Clone, PartialEq)]
struct Condition {
    expr: String,
    args: Vec<Value>,
}

impl Condition {
    fn new(cond: &str, args: Vec<Value>) -> Self {
        let expr = if cond.contains('?') || args.is_empty() {
            cond.to_string()
        } else if args.len() == 1 {
            format!("{cond} = ?")
        } else {
            let placeholders = vec!["?"; args.len()].join(", ");
            format!("{cond} IN ({placeholders})")
        };
        Self { expr, args }
    }
}

fn render_conditions(keyword: &str, conditions: &[Condition], sql: &mut String, params: &mut Vec<Value>) {
    if conditions.is_empty() {
        return;
    }
    let exprs: Vec<&str> = conditions.iter().map(|c| c.expr.as_str()).collect();
    sql.push_str(&format!(" {keyword} {}", exprs.join(" AND ")));
    params.extend(conditions.iter().flat_map(|c| c.args.iter().cloned()));
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Select {
    table: String,
    columns: Vec<String>,
    joins: Vec<String>,
    wheres: Vec<Condition>,
    groups: Vec<String>,
    havings: Vec<Condition>,
    orders: Vec<(String, Order)>,
    limit: Option<u64>,
    offset: Option<u64>,
}

impl Select {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            ..Default::default()
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Replaces the selected column list.
    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn selected_columns(&self) -> &[String] {
        &self.columns
    }

    pub fn r#where(mut self, cond: &str, args: Vec<Value>) -> Self {
        self.wheres.push(Condition::new(cond, args));
        self
    }

    pub fn and(self, cond: &str, args: Vec<Value>) -> Self {
        self.r#where(cond, args)
    }

    /// Adds `INNER JOIN table ON on`.
    pub fn join(mut self, table: &str, on: &str) -> Self {
        self.joins.push(format!("INNER JOIN {table} ON {on}"));
        self
    }

    pub fn order_by(mut self, column: &str, order: Order) -> Self {
        self.orders.push((column.to_string(), order));
        self
    }

    pub fn group_by<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.groups.extend(columns.into_iter().map(Into::into));
        self
    }

    pub fn having(mut self, cond: &str, args: Vec<Value>) -> Self {
        self.havings.push(Condition::new(cond, args));
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn build(&self) -> (String, Vec<Value>) {
        let columns = if self.columns.is_empty() {
            "*".to_string()
        } else {
            self.columns.join(", ")
        };
        let mut sql = format!("SELECT {columns} FROM {}", self.table);
        let mut params = Vec::new();
        for join in &self.joins {
            sql.push(' ');
            sql.push_str(join);
        }
        render_conditions("WHERE", &self.wheres, &mut sql, &mut params);
        if !self.groups.is_empty() {
            sql.push_str(&format!(" GROUP BY {}", self.groups.join(", ")));
        }
        render_conditions("HAVING", &self.havings, &mut sql, &mut params);
        if !self.orders.is_empty() {
            let orders: Vec<String> = self
                .orders
                .iter()
                .map(|(column, order)| format!("{column} {order}"))
                .collect();
            sql.push_str(&format!(" ORDER BY {}", orders.join(", ")));
        }
        match (self.limit, self.offset) {
            (Some(limit), Some(offset)) => sql.push_str(&format!(" LIMIT {limit} OFFSET {offset}")),
            (Some(limit), None) => sql.push_str(&format!(" LIMIT {limit}")),
            (None, Some(offset)) => sql.push_str(&format!(" LIMIT -1 OFFSET {offset}")),
            (None, None) => {}
        }
        (sql, params)
    }

    pub fn build_explain(&self) -> (String, Vec<Value>) {
        let (sql, params) = self.build();
        (format!("EXPLAIN QUERY PLAN {sql}"), params)
    }

    /// Renders `SELECT 1 ... LIMIT 1` over the same table and conditions.
    pub fn build_exists(&self) -> (String, Vec<Value>) {
        let probe = Self {
            columns: vec!["1".to_string()],
            orders: Vec::new(),
            limit: Some(1),
            offset: None,
            ..self.clone()
        };
        probe.build()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Insert {
    table: String,
    params: Vec<(String, Value)>,
}

impl Insert {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            params: Vec::new(),
        }
    }

    pub fn param(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.params.push((column.to_string(), value.into()));
        self
    }

    pub fn build(&self) -> (String, Vec<Value>) {
        let columns: Vec<&str> = self.params.iter().map(|(c, _)| c.as_str()).collect();
        let placeholders = vec!["?"; self.params.len()].join(", ");
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({placeholders})",
            self.table,
            columns.join(", ")
        );
        (sql, self.params.iter().map(|(_, v)| v.clone()).collect())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Update {
    table: String,
    params: Vec<(String, Value)>,
    wheres: Vec<Condition>,
}

impl Update {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            ..Default::default()
        }
    }

    pub fn param(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.params.push((column.to_string(), value.into()));
        self
    }

    pub fn r#where(mut self, cond: &str, args: Vec<Value>) -> Self {
        self.wheres.push(Condition::new(cond, args));
        self
    }

    pub fn build(&self) -> (String, Vec<Value>) {
        let sets: Vec<String> = self.params.iter().map(|(c, _)| format!("{c} = ?")).collect();
        let mut sql = format!("UPDATE {} SET {}", self.table, sets.join(", "));
        let mut params: Vec<Value> = self.params.iter().map(|(_, v)| v.clone()).collect();
        render_conditions("WHERE", &self.wheres, &mut sql, &mut params);
        (sql, params)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Delete {
    table: String,
    wheres: Vec<Condition>,
}

impl Delete {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            wheres: Vec::new(),
        }
    }

    pub fn r#where(mut self, cond: &str, args: Vec<Value>) -> Self {
        self.wheres.push(Condition::new(cond, args));
        self
    }

    pub fn build(&self) -> (String, Vec<Value>) {
        let mut sql = format!("DELETE FROM {}", self.table);
        let mut params = Vec::new();
        render_conditions("WHERE", &self.wheres, &mut sql, &mut params);
        (sql, params)
    }
}
