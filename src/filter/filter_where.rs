use super::error::FilterError;
use super::filter::validate_identifier;
use super::types::{FilterOp, FilterWhereInfo, SqlParam};

/// Renders typed conditions into a `$n`-parameterised WHERE body.
pub struct FilterWhere {
    param_values: Vec<SqlParam>,
    param_index: usize,
}

impl FilterWhere {
    pub fn new(starting_param_index: usize) -> Self {
        Self {
            param_values: vec![],
            param_index: starting_param_index,
        }
    }

    /// Returns `(clause, params)`; an empty condition list yields an empty clause.
    pub fn generate(
        conditions: &[FilterWhereInfo],
        starting_param_index: usize,
    ) -> Result<(String, Vec<SqlParam>), FilterError> {
        let mut filter_where = Self::new(starting_param_index);
        let mut sql_conditions = Vec::with_capacity(conditions.len());
        for condition in conditions {
            sql_conditions.push(filter_where.build_sql_condition(condition)?);
        }
        Ok((sql_conditions.join(" AND "), filter_where.param_values))
    }

    fn build_sql_condition(&mut self, condition: &FilterWhereInfo) -> Result<String, FilterError> {
        match condition {
            FilterWhereInfo::Field { column, operator, data } => {
                validate_identifier(column)?;
                let quoted_column = format!("\"{}\"", column);
                let placeholder = self.param(data.clone());
                Ok(match operator {
                    FilterOp::Eq => format!("{} = {}", quoted_column, placeholder),
                    FilterOp::ILike => format!("{} ILIKE {}", quoted_column, placeholder),
                    FilterOp::AnyILike => format!(
                        "EXISTS (SELECT 1 FROM unnest({}) AS elem WHERE elem ILIKE {})",
                        quoted_column, placeholder
                    ),
                })
            }
            FilterWhereInfo::In { column, data } => {
                validate_identifier(column)?;
                if data.is_empty() { return Ok("1=0".to_string()); }
                let params: Vec<String> = data.iter().map(|v| self.param(v.clone())).collect();
                Ok(format!("\"{}\" IN ({})", column, params.join(", ")))
            }
            FilterWhereInfo::Or(branches) => {
                if branches.is_empty() { return Ok("1=0".to_string()); }
                let mut parts = Vec::with_capacity(branches.len());
                for branch in branches {
                    parts.push(format!("({})", self.build_sql_condition(branch)?));
                }
                Ok(format!("({})", parts.join(" OR ")))
            }
        }
    }

    fn param(&mut self, value: SqlParam) -> String {
        self.param_values.push(value);
        self.param_index += 1;
        format!("${}", self.param_index)
    }
}
