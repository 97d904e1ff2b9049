use quilldb::{Database, Table};

pub fn users_db() -> Database {
    let mut db = Database::new("main");
    db.execute("CREATE TABLE users(id INT PRIMARY KEY, name TEXT, email TEXT UNIQUE)")
        .unwrap();
    db
}

/// Every index bucket points at exactly the rows holding its value, and
/// every row is found through every index.
pub fn assert_indexes_consistent(table: &Table) {
    let rows = table.rows();
    for index in table.indexes() {
        let mut tracked = 0;
        for (value, positions) in index.entries() {
            for pos in positions {
                assert_eq!(rows[*pos].get(index.column()), Some(&value));
                tracked += 1;
            }
        }
        assert_eq!(tracked, rows.len(), "index on {}", index.column());
        for (pos, row) in rows.iter().enumerate() {
            let value = row.get(index.column()).unwrap();
            assert!(index.find(value).contains(&pos));
        }
    }
}
