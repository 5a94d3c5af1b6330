//! MySQL dialect.
//!
//! MySQL tracks the generic baseline closely; the divergences are the random
//! function, CONCAT() instead of `||`, LIMIT on UPDATE/DELETE and the InnoDB
//! table-options clause on CREATE TABLE.

use crate::ast::Operand;
use crate::error::SqlResult;
use crate::schema::TableDef;

use super::traits::SqlDialect;

pub struct MySqlDialect;

impl SqlDialect for MySqlDialect {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn random_function(&self) -> &'static str {
        "RAND()"
    }

    /// `CONCAT((a), (b), ...)` — `||` is logical OR in default MySQL mode.
    fn op_concat(&self, parts: &[Operand]) -> SqlResult<String> {
        let rendered: Vec<String> = parts
            .iter()
            .map(|p| Ok(format!("({})", self.render(p, None)?)))
            .collect::<SqlResult<_>>()?;
        Ok(format!("CONCAT({})", rendered.join(", ")))
    }

    fn supports_dml_limit(&self) -> bool {
        true
    }

    fn create_table_options(&self, table: &TableDef) -> String {
        format!(
            "ENGINE=InnoDB DEFAULT CHARSET=utf8 COLLATE=utf8_bin COMMENT={}",
            self.escape(&table.comment)
        )
    }
}
