//! Rendering tests: expression/statement building, per-dialect divergences,
//! encode/decode round-trips.

mod dialects;
mod roundtrip;

use crate::schema::{Column, Index, TableDef};

/// The books table used across the tests.
pub(crate) fn book() -> TableDef {
    TableDef::new("book")
        .comment("Books catalog.")
        .column(Column::id("id"))
        .column(Column::varchar("name", 100).default_value("A very good book!!!"))
        .column(Column::integer("author_id", 9).unsigned())
        .column(Column::decimal("price", 10, 2))
        .column(Column::date("publication_date"))
        .column(Column::boolean("is_popular"))
        .index(Index::primary("book_pk", ["id"]))
        .index(Index::plain("book_price", ["price"]))
}

/// The authors table used across the tests.
pub(crate) fn author() -> TableDef {
    TableDef::new("author")
        .comment("Authors catalog.")
        .column(Column::id("id"))
        .column(Column::varchar("last_name", 100).comment("Author's last name"))
        .column(Column::varchar("first_name", 100))
        .column(Column::datetime("created_at"))
        .index(Index::primary("author_pk", ["id"]))
        .index(Index::unique("author_name", ["last_name", "first_name"]))
}
