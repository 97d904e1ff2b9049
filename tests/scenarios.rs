mod common;

use common::{assert_indexes_consistent, users_db};
use quilldb::{Database, ErrorKind, ExecResult, Value};

#[test]
fn insert_returns_the_stored_row() {
    let mut db = users_db();
    let result = db
        .execute("INSERT INTO users (id,name,email) VALUES (1,'Alice','a@x.com')")
        .unwrap();

    let ExecResult::Inserted(row) = result else {
        panic!("expected an inserted row, got {result:?}");
    };
    assert_eq!(row.get("id"), Some(&Value::Int(1)));
    assert_eq!(row.get("name"), Some(&Value::from("Alice")));
    assert_eq!(row.get("email"), Some(&Value::from("a@x.com")));
}

#[test]
fn duplicate_primary_key_is_rejected() {
    let mut db = users_db();
    db.execute("INSERT INTO users (id,name,email) VALUES (1,'Alice','a@x.com')")
        .unwrap();

    let err = db
        .execute("INSERT INTO users (id,name,email) VALUES (1,'Alice','a@x.com')")
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConstraintViolation);
    assert!(err.to_string().contains("duplicate primary key"));
    assert_eq!(db.get_table("users").unwrap().len(), 1);
}

#[test]
fn duplicate_unique_value_is_rejected() {
    let mut db = users_db();
    db.execute("INSERT INTO users (id,name,email) VALUES (1,'Alice','a@x.com')")
        .unwrap();

    let err = db
        .execute("INSERT INTO users (id,name,email) VALUES (2,'Bob','a@x.com')")
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConstraintViolation);
    assert!(err.to_string().contains("duplicate unique value"));
    assert_eq!(db.get_table("users").unwrap().len(), 1);
}

#[test]
fn update_then_select() {
    let mut db = users_db();
    db.execute("INSERT INTO users (id,name,email) VALUES (1,'Alice','a@x.com')")
        .unwrap();

    let result = db.execute("UPDATE users SET name='Al' WHERE id=1").unwrap();
    assert_eq!(result.affected(), Some(1));

    let rows = db.query("SELECT * FROM users WHERE id=1").unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows.rows[0].get("name"), Some(&Value::from("Al")));
}

#[test]
fn delete_then_select() {
    let mut db = users_db();
    db.execute("INSERT INTO users (id,name,email) VALUES (1,'Alice','a@x.com')")
        .unwrap();

    let result = db.execute("DELETE FROM users WHERE id=1").unwrap();
    assert_eq!(result.affected(), Some(1));
    assert!(db.query("SELECT * FROM users").unwrap().is_empty());
}

#[test]
fn join_produces_one_merged_row() {
    let mut db = users_db();
    db.execute("CREATE TABLE posts (id INT PRIMARY KEY, user_id INT, title TEXT)")
        .unwrap();
    db.execute("INSERT INTO users VALUES (1, 'Alice', 'a@x.com')")
        .unwrap();
    db.execute("INSERT INTO posts VALUES (7, 1, 'First post')")
        .unwrap();

    let result = db
        .query("SELECT users.name, posts.title FROM users JOIN posts ON users.id=posts.user_id")
        .unwrap();
    assert_eq!(result.columns, vec!["users.name", "posts.title"]);
    assert_eq!(result.len(), 1);
    assert_eq!(
        result.rows[0].values(),
        &[Value::from("Alice"), Value::from("First post")]
    );
}

#[test]
fn update_and_delete_need_where_whatever_the_state() {
    let mut db = users_db();
    for sql in ["UPDATE users SET name = 'x'", "DELETE FROM users"] {
        assert_eq!(db.execute(sql).unwrap_err().kind(), ErrorKind::Safety);
    }

    db.execute("INSERT INTO users VALUES (1, 'Alice', 'a@x.com')")
        .unwrap();
    for sql in ["UPDATE users SET name = 'x';", "DELETE FROM users;"] {
        assert_eq!(db.execute(sql).unwrap_err().kind(), ErrorKind::Safety);
    }
    assert_eq!(db.get_table("users").unwrap().len(), 1);
}

#[test]
fn create_table_schema_has_at_most_one_primary_key() {
    let mut db = Database::new("main");
    let err = db
        .execute("CREATE TABLE t (a INT PRIMARY KEY, b INT PRIMARY KEY)")
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Schema);

    db.execute("CREATE TABLE t (a INT PRIMARY KEY, b INT UNIQUE, c TEXT)")
        .unwrap();
    let schema = db.get_table_schema("t").unwrap();
    let primary: Vec<_> = schema.iter().filter(|c| c.primary_key).collect();
    assert_eq!(primary.len(), 1);
    assert!(primary[0].unique);
}

#[test]
fn front_end_errors_are_classified() {
    let mut db = users_db();
    assert_eq!(db.execute("SELECT # FROM users").unwrap_err().kind(), ErrorKind::Lexical);
    assert_eq!(db.execute("SELECT FROM users").unwrap_err().kind(), ErrorKind::Parse);
    assert_eq!(
        db.execute("CREATE TABLE t (a FLOAT)").unwrap_err().kind(),
        ErrorKind::Schema
    );
    assert_eq!(
        db.execute("INSERT INTO users VALUES ('one', 'x', 'y')").unwrap_err().kind(),
        ErrorKind::Type
    );
    assert_eq!(
        db.execute("SELECT * FROM users WHERE age = 3").unwrap_err().kind(),
        ErrorKind::Column
    );
}

#[test]
fn index_and_scan_agree_on_equality() {
    let mut db = users_db();
    for id in 0..50 {
        db.execute(&format!(
            "INSERT INTO users VALUES ({id}, 'user{}', 'u{id}@x.com')",
            id % 7
        ))
        .unwrap();
    }
    db.execute("DELETE FROM users WHERE id < 10").unwrap();

    let table = db.get_table("users").unwrap();
    let conditions = [
        quilldb::ast::Condition::new("id", quilldb::ast::ComparisonOp::Eq, 25),
        quilldb::ast::Condition::new("id", quilldb::ast::ComparisonOp::Eq, 3),
        quilldb::ast::Condition::new("email", quilldb::ast::ComparisonOp::Eq, "u42@x.com"),
        quilldb::ast::Condition::new("email", quilldb::ast::ComparisonOp::Eq, Value::Null),
    ];
    for condition in &conditions {
        assert_eq!(
            table.find(Some(condition)).unwrap(),
            table.scan(Some(condition)).unwrap(),
            "{condition:?}"
        );
    }
}

#[test]
fn indexes_stay_consistent_across_mixed_statements() {
    let mut db = users_db();
    let statements = [
        "INSERT INTO users VALUES (1, 'a', 'a@x')",
        "INSERT INTO users VALUES (2, 'b', 'b@x')",
        "INSERT INTO users VALUES (3, 'c', NULL)",
        "INSERT INTO users (id, name) VALUES (4, 'd')",
        "INSERT INTO users VALUES (5, 'e', 'e@x')",
        "UPDATE users SET email = 'z@x' WHERE id = 1",
        "DELETE FROM users WHERE id = 2",
        "UPDATE users SET id = 20 WHERE name = 'c'",
        "INSERT INTO users VALUES (2, 'b2', 'b@x')",
        "DELETE FROM users WHERE email = NULL",
        "UPDATE users SET name = 'same' WHERE id >= 5",
    ];
    for sql in statements {
        db.execute(sql).unwrap();
        assert_indexes_consistent(db.get_table("users").unwrap());
    }

    // Failing statements leave everything in place.
    assert!(db.execute("INSERT INTO users VALUES (1, 'x', 'new@x')").is_err());
    assert!(db.execute("UPDATE users SET email = 'z@x' WHERE id = 5").is_err());
    assert!(db.execute("UPDATE users SET id = 1 WHERE id > 1").is_err());
    let table = db.get_table("users").unwrap();
    assert_indexes_consistent(table);

    let ids: Vec<_> = table
        .rows()
        .iter()
        .map(|row| row.get("id").cloned().unwrap())
        .collect();
    assert_eq!(ids, vec![Value::Int(1), Value::Int(5), Value::Int(2)]);
}
