use std::str::FromStr;

use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::db::DatabaseError;
use crate::models::{User, UserRole};

use super::decode_created_at;

const SELECT_USER: &str = "SELECT id, login, password_hash, role, created_at FROM users";

type UserRow = (i64, String, String, String, Option<String>);

fn map_row(row: &Row<'_>) -> rusqlite::Result<UserRow> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?))
}

fn user_from_row(row: UserRow) -> Result<User, DatabaseError> {
    let (id, login, password_hash, role, created_at) = row;
    Ok(User {
        id,
        login,
        password_hash,
        role: UserRole::from_str(&role)?,
        created_at: decode_created_at(created_at),
    })
}

pub fn insert_user(conn: &Connection, user: &User) -> Result<i64, DatabaseError> {
    conn.execute(
        "INSERT INTO users (login, password_hash, role) VALUES (?1, ?2, ?3)",
        params![user.login, user.password_hash, user.role.as_str()],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_user_by_id(conn: &Connection, id: i64) -> Result<Option<User>, DatabaseError> {
    let row = conn
        .query_row(&format!("{SELECT_USER} WHERE id = ?1"), params![id], map_row)
        .optional()?;
    row.map(user_from_row).transpose()
}

pub fn get_user_by_login(conn: &Connection, login: &str) -> Result<Option<User>, DatabaseError> {
    let row = conn
        .query_row(
            &format!("{SELECT_USER} WHERE login = ?1"),
            params![login],
            map_row,
        )
        .optional()?;
    row.map(user_from_row).transpose()
}

pub fn get_all_users(conn: &Connection) -> Result<Vec<User>, DatabaseError> {
    let mut stmt = conn.prepare(&format!("{SELECT_USER} ORDER BY login ASC"))?;
    let rows = stmt.query_map([], map_row)?;
    let mut users = Vec::new();
    for row in rows {
        users.push(user_from_row(row?)?);
    }
    Ok(users)
}

pub fn update_user_password(
    conn: &Connection,
    id: i64,
    password_hash: &str,
) -> Result<bool, DatabaseError> {
    let affected = conn.execute(
        "UPDATE users SET password_hash = ?1 WHERE id = ?2",
        params![password_hash, id],
    )?;
    Ok(affected > 0)
}

pub fn delete_user(conn: &Connection, id: i64) -> Result<bool, DatabaseError> {
    let affected = conn.execute("DELETE FROM users WHERE id = ?1", params![id])?;
    Ok(affected > 0)
}

pub fn count_users(conn: &Connection) -> Result<i64, DatabaseError> {
    let count = conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_memory_database;

    fn sample_user(login: &str, role: UserRole) -> User {
        User {
            id: 0,
            login: login.into(),
            password_hash: "salt$hash".into(),
            role,
            created_at: None,
        }
    }

    #[test]
    fn insert_and_fetch_round_trip() {
        let conn = open_memory_database().unwrap();
        let id = insert_user(&conn, &sample_user("dr.mansouri", UserRole::Doctor)).unwrap();

        let fetched = get_user_by_id(&conn, id).unwrap().unwrap();
        assert_eq!(fetched.login, "dr.mansouri");
        assert!(fetched.is_doctor());

        let by_login = get_user_by_login(&conn, "dr.mansouri").unwrap().unwrap();
        assert_eq!(by_login.id, id);
    }

    #[test]
    fn password_update_is_persisted() {
        let conn = open_memory_database().unwrap();
        let id = insert_user(&conn, &sample_user("sec.naima", UserRole::Assistant)).unwrap();

        assert!(update_user_password(&conn, id, "salt$newhash").unwrap());
        let fetched = get_user_by_id(&conn, id).unwrap().unwrap();
        assert_eq!(fetched.password_hash, "salt$newhash");
    }

    #[test]
    fn duplicate_login_violates_unique_constraint() {
        let conn = open_memory_database().unwrap();
        insert_user(&conn, &sample_user("dr.mansouri", UserRole::Doctor)).unwrap();
        let err = insert_user(&conn, &sample_user("dr.mansouri", UserRole::Doctor));
        assert!(matches!(err, Err(DatabaseError::Sqlite(_))));
    }
}
