//! End-to-end: declare a schema, build statements for several dialects,
//! decode simulated executor rows back into typed values.

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use sqltree::prelude::*;

fn author() -> TableDef {
    TableDef::new("author")
        .comment("Authors catalog.")
        .column(Column::id("id"))
        .column(Column::varchar("last_name", 100))
        .column(Column::varchar("first_name", 100))
        .index(Index::primary("author_pk", ["id"]))
        .index(Index::unique("author_name", ["last_name", "first_name"]))
}

fn book() -> TableDef {
    TableDef::new("book")
        .comment("Books catalog.")
        .column(Column::id("id"))
        .column(Column::varchar("name", 100).not_null().default_value("A very good book!!!"))
        .column(Column::integer("author_id", 9).unsigned())
        .column(Column::decimal("price", 10, 2))
        .column(Column::date("publication_date"))
        .column(Column::boolean("is_popular"))
        .index(Index::primary("book_pk", ["id"]))
        .index(Index::plain("book_price", ["price"]))
}

#[test]
fn create_schema_on_every_dialect() {
    for dialect in [Dialect::Generic, Dialect::Sqlite, Dialect::Postgres, Dialect::MySql] {
        for table in [author(), book()] {
            let statements = dialect.create_table(&table).unwrap();
            assert!(!statements.is_empty());
            assert!(
                statements[0].starts_with(&format!("CREATE TABLE {} (", table.name)),
                "{}: {}",
                dialect.name(),
                statements[0]
            );
        }
    }
    // secondary indexes leave the CREATE TABLE statement on sqlite/postgres
    assert_eq!(Dialect::Sqlite.create_table(&book()).unwrap().len(), 2);
    assert_eq!(Dialect::MySql.create_table(&book()).unwrap().len(), 1);
}

#[test]
fn insert_update_delete_strings() {
    let books = book();
    let values = [
        books.field("name").unwrap().assign("Hackers"),
        books.field("author_id").unwrap().assign(2),
        books.field("price").unwrap().assign("14.95"),
        books.field("publication_date").unwrap().assign("2010-03-27"),
        books.field("is_popular").unwrap().assign(true),
    ];

    assert_eq!(
        Dialect::Generic.insert(&values).unwrap(),
        "INSERT INTO book (name, author_id, price, publication_date, is_popular) \
         VALUES ('Hackers', 2, 14.95, '2010-03-27', 1)"
    );
    assert_eq!(
        Dialect::Sqlite.insert(&values).unwrap(),
        "INSERT INTO book (name, author_id, price, publication_date, is_popular) \
         VALUES ('Hackers', 2, 1495, 14695, 1)"
    );
    assert_eq!(
        Dialect::Postgres.insert(&values).unwrap(),
        "INSERT INTO book (name, author_id, price, publication_date, is_popular) \
         VALUES ('Hackers', 2, 14.95, '2010-03-27', TRUE) RETURNING id"
    );

    let id = books.field("id").unwrap().expr();
    let price = books.field("price").unwrap();
    let update = UpdateQuery::new([price.assign(price.expr().add(1))]).filter(id.eq(2));
    assert_eq!(
        Dialect::Generic.update(&update).unwrap(),
        "UPDATE book SET price = (book.price + 1) WHERE (book.id = 2)"
    );

    let delete = DeleteQuery::new("book").filter(id.eq(2));
    assert_eq!(
        Dialect::Generic.delete(&delete).unwrap(),
        "DELETE FROM book WHERE (book.id = 2)"
    );
}

#[test]
fn select_and_decode_round_trip() {
    let books = book();
    let id = books.field("id").unwrap().expr();
    let name = books.field("name").unwrap().expr();
    let price = books.field("price").unwrap().expr();
    let published = books.field("publication_date").unwrap().expr();
    let popular = books.field("is_popular").unwrap().expr();

    let query = SelectQuery::new([
        id.clone(),
        name.clone(),
        price.clone(),
        published.clone(),
        popular.clone(),
    ])
    .filter(price.gt("10"))
    .order_by(price.desc())
    .limit(10u64);

    assert_eq!(
        Dialect::Sqlite.select(&query).unwrap(),
        "SELECT book.id, book.name, book.price, book.publication_date, book.is_popular \
         FROM book WHERE (book.price > 1000) ORDER BY book.price DESC LIMIT 10"
    );

    // what a sqlite driver would hand back for the row inserted above
    let raw = vec![vec![
        Value::Int(1),
        Value::Str("Hackers".into()),
        Value::Int(1495),
        Value::Int(14695),
        Value::Int(1),
    ]];
    let rows = Rows::decode(
        Dialect::Sqlite,
        vec![id.clone(), name.clone(), price.clone(), published.clone(), popular.clone()],
        raw,
    )
    .unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows.value(0, &id).unwrap(), &Value::Int(1));
    assert_eq!(rows.value(0, &name).unwrap(), &Value::Str("Hackers".into()));
    assert_eq!(
        rows.value(0, &price).unwrap(),
        &Value::Decimal(Decimal::new(1495, 2))
    );
    assert_eq!(
        rows.value(0, &published).unwrap(),
        &Value::Date(NaiveDate::from_ymd_opt(2010, 3, 27).unwrap())
    );
    assert_eq!(rows.value(0, &popular).unwrap(), &Value::Bool(true));

    let named: Vec<_> = rows.named().collect();
    assert_eq!(named[0]["book.name"], &Value::Str("Hackers".into()));
}

#[test]
fn journal_keeps_recent_statements() {
    use std::time::{Duration, SystemTime};

    let mut journal = StatementJournal::new();
    let query = SelectQuery::new([book().field("name").unwrap().expr()]);
    let sql = Dialect::Generic.select(&query).unwrap();
    journal.record(sql.clone(), SystemTime::now(), Duration::from_millis(3));
    assert_eq!(journal.last().map(|e| e.sql.as_str()), Some(sql.as_str()));
    assert_eq!(journal.len(), 1);
}

#[test]
fn display_uses_the_default_dialect_for_debugging() {
    let price = book().field("price").unwrap().expr();
    // the process-wide default starts as the generic dialect
    assert_eq!(format!("{}", price.gt("15")), "(book.price > 15)");
}
