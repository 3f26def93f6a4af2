use super::error::FilterError;
use super::filter_order::FilterOrder;
use super::filter_where::FilterWhere;
use super::types::{FilterOp, FilterOrderInfo, FilterWhereInfo, SqlParam, SqlResult};

pub struct Filter {
    table_name: String,
    conditions: Vec<FilterWhereInfo>,
    order_data: Vec<FilterOrderInfo>,
}

impl Filter {
    pub fn new(table_name: impl Into<String>) -> Result<Self, FilterError> {
        let table_name = table_name.into();
        validate_identifier(&table_name)
            .map_err(|_| FilterError::InvalidTableName(table_name.clone()))?;
        Ok(Self {
            table_name,
            conditions: vec![],
            order_data: vec![],
        })
    }

    pub fn where_eq(&mut self, column: &str, value: impl Into<SqlParam>) -> &mut Self {
        self.push(column, FilterOp::Eq, value)
    }

    pub fn where_in(&mut self, column: &str, values: Vec<SqlParam>) -> &mut Self {
        self.conditions.push(FilterWhereInfo::In { column: column.to_string(), data: values });
        self
    }

    /// Any one of the given conditions must hold.
    pub fn where_any(&mut self, branches: Vec<FilterWhereInfo>) -> &mut Self {
        self.conditions.push(FilterWhereInfo::Or(branches));
        self
    }

    pub fn push(&mut self, column: &str, operator: FilterOp, value: impl Into<SqlParam>) -> &mut Self {
        self.conditions.push(FilterWhereInfo::Field {
            column: column.to_string(),
            operator,
            data: value.into(),
        });
        self
    }

    pub fn order(&mut self, order_spec: &str) -> Result<&mut Self, FilterError> {
        self.order_data = FilterOrder::parse(order_spec)?;
        Ok(self)
    }

    pub fn to_sql(&self) -> Result<SqlResult, FilterError> {
        let where_result = self.to_where_sql()?;
        let order_clause = FilterOrder::generate(&self.order_data);

        let query = [
            format!("SELECT * FROM \"{}\"", self.table_name),
            if where_result.query.is_empty() { String::new() } else { format!("WHERE {}", where_result.query) },
            order_clause,
        ].into_iter().filter(|s| !s.is_empty()).collect::<Vec<_>>().join(" ");

        Ok(SqlResult { query, params: where_result.params })
    }

    pub fn to_where_sql(&self) -> Result<SqlResult, FilterError> {
        let (query, params) = FilterWhere::generate(&self.conditions, 0)?;
        Ok(SqlResult { query, params })
    }

    pub fn to_delete_sql(&self) -> Result<SqlResult, FilterError> {
        let where_result = self.to_where_sql()?;
        let query = if where_result.query.is_empty() {
            format!("DELETE FROM \"{}\"", self.table_name)
        } else {
            format!("DELETE FROM \"{}\" WHERE {}", self.table_name, where_result.query)
        };
        Ok(SqlResult { query, params: where_result.params })
    }
}

/// Identifiers are interpolated into SQL, so only `[A-Za-z_][A-Za-z0-9_]*` passes.
pub(crate) fn validate_identifier(name: &str) -> Result<(), FilterError> {
    let mut chars = name.chars();
    let valid_start = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_');
    if !valid_start || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(FilterError::InvalidColumn(name.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn select_with_where_and_order() {
        let owner = Uuid::new_v4();
        let mut filter = Filter::new("todos").unwrap();
        filter.where_eq("user_id", owner).where_eq("priority", "high");
        filter.order("created_at desc").unwrap();

        let sql = filter.to_sql().unwrap();
        assert_eq!(
            sql.query,
            "SELECT * FROM \"todos\" WHERE \"user_id\" = $1 AND \"priority\" = $2 ORDER BY \"created_at\" DESC"
        );
        assert_eq!(sql.params, vec![SqlParam::Uuid(owner), SqlParam::Text("high".to_string())]);
    }

    #[test]
    fn select_without_conditions_omits_where() {
        let filter = Filter::new("todos").unwrap();
        assert_eq!(filter.to_sql().unwrap().query, "SELECT * FROM \"todos\"");
    }

    #[test]
    fn delete_sql_is_scoped() {
        let id = Uuid::new_v4();
        let mut filter = Filter::new("todos").unwrap();
        filter.where_eq("id", id);
        let sql = filter.to_delete_sql().unwrap();
        assert_eq!(sql.query, "DELETE FROM \"todos\" WHERE \"id\" = $1");
    }

    #[test]
    fn rejects_bad_table_name() {
        assert!(matches!(Filter::new("todos; --"), Err(FilterError::InvalidTableName(_))));
        assert!(matches!(Filter::new(""), Err(FilterError::InvalidTableName(_))));
    }
}
