//! Fixtures shared by this crate's tests.

use crate::Database;
use crate::models::FileType;

pub(crate) type FixtureRow = (&'static str, &'static str, &'static str, &'static str, FileType);

/// Two groups publishing `jstl` 1.2, where `javax.servlet` has more packaged
/// archives indexed than `jstl`, plus a tie between two groups on `tied`.
pub(crate) const JSTL_FIXTURE: &[FixtureRow] = &[
    ("javax.servlet", "jstl", "1.2", "74aca283cd4f4b4f3e425f5820cda58f44409547", FileType::Jar),
    ("javax.servlet", "jstl", "1.2", "5f44409547b4f3e425f5820cda58f74aca283cd4", FileType::Jar),
    ("javax.servlet", "jstl", "1.2", "0cda58f44409547b4f3e425f5820074aca283cd4", FileType::Sources),
    ("jstl", "jstl", "1.2", "a6c54a90ba8e4a8b4e1d3c8c2f1a9d6a8c2b3e4f", FileType::Jar),
    ("jstl", "jstl", "1.2", "b7d65b01cb9f5b9c5f2e4d9d3a2b0e7b9d3c4f50", FileType::Pom),
    ("org.example", "tied", "2.0", "1111111111111111111111111111111111111111", FileType::Jar),
    ("com.example", "tied", "2.0", "2222222222222222222222222222222222222222", FileType::Jar),
];

/// An in-memory index populated with `rows`.
pub(crate) async fn seeded(rows: &[FixtureRow]) -> Database {
    let db = Database::connect_in_memory().await.unwrap();
    for &(group_id, artifact_id, version, sha1, file_type) in rows {
        sqlx::query("INSERT INTO artifacts (group_id, artifact_id) VALUES (?, ?) ON CONFLICT DO NOTHING")
            .bind(group_id)
            .bind(artifact_id)
            .execute(db.pool())
            .await
            .unwrap();
        sqlx::query(
            r#"
                INSERT INTO indices (artifact_id, version, sha1, archive_type)
                SELECT id, ?, ?, ? FROM artifacts WHERE group_id = ? AND artifact_id = ?
            "#,
        )
        .bind(version)
        .bind(sha1)
        .bind(file_type.as_str())
        .bind(group_id)
        .bind(artifact_id)
        .execute(db.pool())
        .await
        .unwrap();
    }
    db
}
