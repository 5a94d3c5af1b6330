//! Per-dialect divergences: type declarations, CREATE TABLE shapes, storage
//! encodings.

use chrono::NaiveDate;
use pretty_assertions::assert_eq;

use crate::ast::concat;
use crate::error::SqlError;
use crate::render::Dialect;
use crate::render::dml::SelectQuery;
use crate::schema::Column;

use super::{author, book};

fn declare(dialect: Dialect, column: &Column) -> String {
    dialect.renderer().declare_type(column).unwrap()
}

#[test]
fn generic_int_width_follows_precision() {
    assert_eq!(declare(Dialect::Generic, &Column::integer("n", 2)), "TINYINT(2) NULL");
    assert_eq!(declare(Dialect::Generic, &Column::integer("n", 4)), "SMALLINT(4) NULL");
    assert_eq!(declare(Dialect::Generic, &Column::integer("n", 9)), "INT(9) NULL");
    assert_eq!(declare(Dialect::Generic, &Column::integer("n", 19)), "BIGINT(19) NULL");
}

#[test]
fn int_precision_beyond_eight_bytes_is_rejected() {
    for dialect in [Dialect::Generic, Dialect::Sqlite, Dialect::Postgres, Dialect::MySql] {
        assert!(
            matches!(
                dialect.renderer().declare_type(&Column::integer("n", 20)),
                Err(SqlError::Query(_))
            ),
            "{} accepted a 20-digit INT",
            dialect.name()
        );
    }
}

#[test]
fn postgres_int_keywords_and_serial() {
    assert_eq!(declare(Dialect::Postgres, &Column::integer("n", 3)), "SMALLINT NULL");
    assert_eq!(declare(Dialect::Postgres, &Column::integer("n", 9)), "INTEGER NULL");
    assert_eq!(declare(Dialect::Postgres, &Column::integer("n", 19)), "BIGINT NULL");
    assert_eq!(declare(Dialect::Postgres, &Column::id("id")), "SERIAL");
    assert_eq!(
        declare(Dialect::Postgres, &Column::integer("id", 19).autoincrement()),
        "BIGSERIAL"
    );
}

#[test]
fn sqlite_integers_are_always_integer() {
    assert_eq!(declare(Dialect::Sqlite, &Column::integer("n", 2)), "INTEGER");
    assert_eq!(declare(Dialect::Sqlite, &Column::integer("n", 19)), "INTEGER");
    assert_eq!(declare(Dialect::Sqlite, &Column::id("id")), "INTEGER");
}

#[test]
fn type_declarations_per_dialect() {
    let bool_col = Column::boolean("b");
    assert_eq!(declare(Dialect::Generic, &bool_col), "TINYINT NULL");
    assert_eq!(declare(Dialect::Postgres, &bool_col), "BOOLEAN NULL");

    let date_col = Column::date("d");
    assert_eq!(declare(Dialect::Generic, &date_col), "DATE NULL");
    assert_eq!(declare(Dialect::Sqlite, &date_col), "INTEGER NULL");
    assert_eq!(declare(Dialect::Postgres, &date_col), "DATE NULL");

    let datetime_col = Column::datetime("t");
    assert_eq!(declare(Dialect::Generic, &datetime_col), "INTEGER NULL");
    assert_eq!(
        declare(Dialect::Postgres, &datetime_col),
        "timestamp(6) without time zone NULL"
    );

    let decimal_col = Column::decimal("p", 10, 2);
    assert_eq!(declare(Dialect::Generic, &decimal_col), "DECIMAL(10, 2) NULL");
    assert_eq!(declare(Dialect::Sqlite, &decimal_col), "INTEGER NULL");
    assert_eq!(declare(Dialect::Postgres, &decimal_col), "DECIMAL(10, 2) NULL");

    let char_col = Column::varchar("c", 100);
    assert_eq!(declare(Dialect::Generic, &char_col), "VARCHAR(100) NULL");
    assert_eq!(declare(Dialect::Sqlite, &char_col), "TEXT NULL");
    assert_eq!(declare(Dialect::Postgres, &char_col), "VARCHAR(100) NULL");
}

#[test]
fn declaration_clause_order() {
    let column = Column::varchar("name", 100)
        .not_null()
        .default_value("x")
        .comment("display name");
    assert_eq!(
        declare(Dialect::Generic, &column),
        "VARCHAR(100) NOT NULL DEFAULT 'x' COMMENT 'display name'"
    );
}

#[test]
fn mysql_create_table_inlines_everything() {
    let statements = Dialect::MySql.create_table(&book()).unwrap();
    assert_eq!(
        statements,
        vec![
            "CREATE TABLE book (\n  \
             id INT(9) UNSIGNED NULL AUTO_INCREMENT,\n  \
             name VARCHAR(100) NULL DEFAULT 'A very good book!!!',\n  \
             author_id INT(9) UNSIGNED NULL,\n  \
             price DECIMAL(10, 2) NULL,\n  \
             publication_date DATE NULL,\n  \
             is_popular TINYINT NULL,\n  \
             PRIMARY KEY book_pk (id ASC),\n  \
             KEY book_price (price ASC)\n\
             ) ENGINE=InnoDB DEFAULT CHARSET=utf8 COLLATE=utf8_bin COMMENT='Books catalog.'"
                .to_string()
        ]
    );
}

#[test]
fn sqlite_create_table_inlines_only_the_primary_key() {
    let statements = Dialect::Sqlite.create_table(&book()).unwrap();
    assert_eq!(
        statements,
        vec![
            "CREATE TABLE book (\n  \
             id INTEGER,\n  \
             name TEXT NULL DEFAULT 'A very good book!!!',\n  \
             author_id INTEGER,\n  \
             price INTEGER NULL,\n  \
             publication_date INTEGER NULL,\n  \
             is_popular TINYINT NULL,\n  \
             PRIMARY KEY (id ASC)\n)"
                .to_string(),
            "CREATE INDEX \"book_price\" ON \"book\" (price ASC)".to_string(),
        ]
    );
}

#[test]
fn postgres_create_table_appends_indexes_and_comments() {
    let statements = Dialect::Postgres.create_table(&author()).unwrap();
    assert_eq!(
        statements,
        vec![
            "CREATE TABLE author (\n  \
             id SERIAL,\n  \
             last_name VARCHAR(100) NULL,\n  \
             first_name VARCHAR(100) NULL,\n  \
             created_at timestamp(6) without time zone NULL,\n  \
             PRIMARY KEY (id)\n)"
                .to_string(),
            "CREATE UNIQUE INDEX author_name ON author (last_name ASC, first_name ASC)"
                .to_string(),
            "COMMENT ON COLUMN author.last_name IS 'Author''s last name'".to_string(),
        ]
    );
}

#[test]
fn autoincrement_outside_primary_index_is_rejected() {
    let table = crate::schema::TableDef::new("t").column(Column::id("id"));
    assert!(matches!(
        Dialect::Generic.create_table(&table),
        Err(SqlError::Query(_))
    ));
}

#[test]
fn decimal_comparison_is_scaled_on_sqlite_and_native_on_postgres() {
    let price = book().field("price").unwrap().expr();
    let cmp = price.gt("15");
    assert_eq!(
        Dialect::Sqlite.render_expr(&cmp).unwrap(),
        "(book.price > 1500)"
    );
    assert_eq!(
        Dialect::Postgres.render_expr(&cmp).unwrap(),
        "(book.price > 15)"
    );
}

#[test]
fn date_comparison_is_day_count_on_sqlite() {
    let published = book().field("publication_date").unwrap().expr();
    let cmp = published.eq("2002-03-08");
    assert_eq!(
        Dialect::Sqlite.render_expr(&cmp).unwrap(),
        "(book.publication_date = 11754)"
    );
    assert_eq!(
        Dialect::Generic.render_expr(&cmp).unwrap(),
        "(book.publication_date = '2002-03-08')"
    );
}

#[test]
fn datetime_encoding_per_dialect() {
    let created = author().field("created_at").unwrap().expr();
    let dt = NaiveDate::from_ymd_opt(2002, 3, 8)
        .unwrap()
        .and_hms_micro_opt(12, 30, 45, 123_456)
        .unwrap();
    let cmp = created.eq(dt);
    assert_eq!(
        Dialect::Generic.render_expr(&cmp).unwrap(),
        "(author.created_at = 1015590645123456)"
    );
    assert_eq!(
        Dialect::Postgres.render_expr(&cmp).unwrap(),
        "(author.created_at = '2002-03-08 12:30:45.123456')"
    );
}

#[test]
fn bool_literal_per_dialect() {
    let popular = book().field("is_popular").unwrap().expr();
    let cmp = popular.eq(true);
    assert_eq!(
        Dialect::Generic.render_expr(&cmp).unwrap(),
        "(book.is_popular = 1)"
    );
    assert_eq!(
        Dialect::Postgres.render_expr(&cmp).unwrap(),
        "(book.is_popular = TRUE)"
    );
}

#[test]
fn mysql_concat_function() {
    let first = author().field("first_name").unwrap().expr();
    let last = author().field("last_name").unwrap().expr();
    assert_eq!(
        Dialect::MySql.render_expr(&concat([first, last])).unwrap(),
        "CONCAT((author.first_name), (author.last_name))"
    );
}

#[test]
fn postgres_insert_returns_the_generated_id() {
    let table = book();
    let values = [table.field("name").unwrap().assign("Crypto")];
    assert_eq!(
        Dialect::Postgres.insert(&values).unwrap(),
        "INSERT INTO book (name) VALUES ('Crypto') RETURNING id"
    );
}

#[test]
fn distinct_on_is_postgres_only() {
    let table = book();
    let query = || {
        SelectQuery::new([table.field("name").unwrap().expr()])
            .distinct_on([table.field("author_id").unwrap().expr()])
    };
    assert_eq!(
        Dialect::Postgres.select(&query()).unwrap(),
        "SELECT DISTINCT ON (book.author_id) book.name FROM book"
    );
    for dialect in [Dialect::Generic, Dialect::Sqlite, Dialect::MySql] {
        assert!(matches!(
            dialect.select(&query()),
            Err(SqlError::UnsupportedOperation { .. })
        ));
    }
}

#[test]
fn drop_and_truncate() {
    assert_eq!(Dialect::Generic.drop_table("book"), "DROP TABLE book");
    assert_eq!(
        Dialect::Postgres.drop_table("book"),
        "DROP TABLE IF EXISTS book"
    );
    assert_eq!(
        Dialect::Generic.truncate("book"),
        vec!["DELETE FROM book".to_string()]
    );
    assert_eq!(
        Dialect::Sqlite.truncate("book"),
        vec![
            "DELETE FROM book".to_string(),
            "DELETE FROM sqlite_sequence WHERE name='book'".to_string(),
        ]
    );
}
