//! decode(encode(v)) == v for every dialect/type pair.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::ast::Value;
use crate::render::Dialect;
use crate::schema::Column;

const ALL_DIALECTS: [Dialect; 4] = [
    Dialect::Generic,
    Dialect::Sqlite,
    Dialect::Postgres,
    Dialect::MySql,
];

/// Reinterpret an encoded SQL literal as the raw value an executor would
/// hand back: quoted text becomes a string, bare digits an integer, and so
/// on.
fn raw_from_literal(literal: &str) -> Value {
    if literal == "NULL" {
        return Value::Null;
    }
    if literal == "TRUE" {
        return Value::Bool(true);
    }
    if literal == "FALSE" {
        return Value::Bool(false);
    }
    if let Some(inner) = literal
        .strip_prefix('\'')
        .and_then(|s| s.strip_suffix('\''))
    {
        return Value::Str(inner.replace("''", "'"));
    }
    if let Ok(n) = literal.parse::<i64>() {
        return Value::Int(n);
    }
    if let Ok(d) = literal.parse::<Decimal>() {
        return Value::Decimal(d);
    }
    panic!("literal does not look like anything a driver returns: {literal}");
}

fn assert_roundtrip(dialect: Dialect, column: &Column, value: Value) {
    let renderer = dialect.renderer();
    let coerced = column.ty.coerce(value.clone()).unwrap();
    let literal = renderer.encode_value(&coerced, column).unwrap();
    let raw = raw_from_literal(&literal);
    let decoded = renderer.decode_value(raw, column).unwrap();
    assert_eq!(
        decoded,
        value,
        "{}/{} failed to round-trip {:?} (literal {})",
        dialect.name(),
        column.ty,
        value,
        literal
    );
}

#[test]
fn int_roundtrip() {
    let column = Column::integer("n", 9);
    for dialect in ALL_DIALECTS {
        for value in [0i64, 1, -5, 999_999_999] {
            assert_roundtrip(dialect, &column, Value::Int(value));
        }
    }
}

#[test]
fn bool_roundtrip() {
    let column = Column::boolean("b");
    for dialect in ALL_DIALECTS {
        assert_roundtrip(dialect, &column, Value::Bool(true));
        assert_roundtrip(dialect, &column, Value::Bool(false));
    }
}

#[test]
fn string_roundtrip() {
    for column in [Column::varchar("c", 100), Column::text("t")] {
        for dialect in ALL_DIALECTS {
            assert_roundtrip(dialect, &column, Value::Str("Hackers".into()));
            assert_roundtrip(dialect, &column, Value::Str("O'Reilly & Sons".into()));
            assert_roundtrip(dialect, &column, Value::Str(String::new()));
        }
    }
}

#[test]
fn decimal_roundtrip_at_column_scale() {
    let column = Column::decimal("p", 10, 2);
    for dialect in ALL_DIALECTS {
        for text in ["0.00", "15.00", "-3.50", "99999999.99"] {
            let value = Value::Decimal(text.parse().unwrap());
            assert_roundtrip(dialect, &column, value);
        }
    }
}

#[test]
fn date_roundtrip_including_epoch() {
    let column = Column::date("d");
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
    let before_epoch = NaiveDate::from_ymd_opt(1969, 7, 20).unwrap();
    let modern = NaiveDate::from_ymd_opt(2010, 3, 27).unwrap();
    for dialect in ALL_DIALECTS {
        for date in [epoch, before_epoch, modern] {
            assert_roundtrip(dialect, &column, Value::Date(date));
        }
    }
}

#[test]
fn datetime_roundtrip_with_microseconds() {
    let column = Column::datetime("t");
    let dt = NaiveDate::from_ymd_opt(2002, 3, 8)
        .unwrap()
        .and_hms_micro_opt(12, 30, 45, 123_456)
        .unwrap();
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1)
        .unwrap()
        .and_hms_micro_opt(0, 0, 0, 0)
        .unwrap();
    for dialect in ALL_DIALECTS {
        assert_roundtrip(dialect, &column, Value::DateTime(dt));
        assert_roundtrip(dialect, &column, Value::DateTime(epoch));
    }
}

#[test]
fn blob_roundtrip() {
    let column = Column::blob("data");
    for dialect in ALL_DIALECTS {
        assert_roundtrip(dialect, &column, Value::Bytes(b"hello".to_vec()));
        assert_roundtrip(dialect, &column, Value::Bytes(Vec::new()));
    }
}

#[test]
fn null_decodes_unchanged_for_every_type() {
    let columns = [
        Column::integer("n", 9),
        Column::boolean("b"),
        Column::varchar("c", 10),
        Column::text("t"),
        Column::decimal("p", 10, 2),
        Column::date("d"),
        Column::datetime("dt"),
        Column::blob("bl"),
    ];
    for dialect in ALL_DIALECTS {
        let renderer = dialect.renderer();
        for column in &columns {
            assert_eq!(
                renderer.decode_value(Value::Null, column).unwrap(),
                Value::Null
            );
        }
    }
}

#[test]
fn sqlite_storage_representations() {
    let renderer = Dialect::Sqlite.renderer();
    let price = Column::decimal("price", 10, 2);
    let fifteen = Value::Decimal("15.00".parse().unwrap());
    assert_eq!(
        renderer
            .encode_value(&price.ty.coerce(fifteen).unwrap(), &price)
            .unwrap(),
        "1500"
    );
    let date = Column::date("d");
    let day = Value::Date(NaiveDate::from_ymd_opt(2002, 3, 8).unwrap());
    assert_eq!(
        renderer
            .encode_value(&date.ty.coerce(day).unwrap(), &date)
            .unwrap(),
        "11754"
    );
}

#[test]
fn sqlite_rejects_excess_decimal_precision() {
    let renderer = Dialect::Sqlite.renderer();
    let price = Column::decimal("price", 10, 2);
    let value = Value::Decimal("1.005".parse().unwrap());
    assert!(
        renderer
            .encode_value(&price.ty.coerce(value).unwrap(), &price)
            .is_err()
    );
}
