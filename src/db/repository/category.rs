use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::db::DatabaseError;
use crate::models::Category;

const SELECT_CATEGORY: &str = "SELECT id, designation, description FROM categories";

fn map_row(row: &Row<'_>) -> rusqlite::Result<Category> {
    Ok(Category {
        id: row.get(0)?,
        designation: row.get(1)?,
        description: row.get(2)?,
    })
}

pub fn insert_category(conn: &Connection, category: &Category) -> Result<i64, DatabaseError> {
    conn.execute(
        "INSERT INTO categories (designation, description) VALUES (?1, ?2)",
        params![category.designation, category.description],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_category_by_id(conn: &Connection, id: i64) -> Result<Option<Category>, DatabaseError> {
    let row = conn
        .query_row(&format!("{SELECT_CATEGORY} WHERE id = ?1"), params![id], map_row)
        .optional()?;
    Ok(row)
}

pub fn get_category_by_designation(
    conn: &Connection,
    designation: &str,
) -> Result<Option<Category>, DatabaseError> {
    let row = conn
        .query_row(
            &format!("{SELECT_CATEGORY} WHERE designation = ?1"),
            params![designation],
            map_row,
        )
        .optional()?;
    Ok(row)
}

pub fn get_all_categories(conn: &Connection) -> Result<Vec<Category>, DatabaseError> {
    let mut stmt = conn.prepare(&format!("{SELECT_CATEGORY} ORDER BY designation ASC"))?;
    let rows = stmt.query_map([], map_row)?;
    let mut categories = Vec::new();
    for row in rows {
        categories.push(row?);
    }
    Ok(categories)
}

pub fn update_category(conn: &Connection, category: &Category) -> Result<bool, DatabaseError> {
    let affected = conn.execute(
        "UPDATE categories SET designation = ?1, description = ?2 WHERE id = ?3",
        params![category.designation, category.description, category.id],
    )?;
    Ok(affected > 0)
}

pub fn delete_category(conn: &Connection, id: i64) -> Result<bool, DatabaseError> {
    let affected = conn.execute("DELETE FROM categories WHERE id = ?1", params![id])?;
    Ok(affected > 0)
}

pub fn count_categories(conn: &Connection) -> Result<i64, DatabaseError> {
    let count = conn.query_row("SELECT COUNT(*) FROM categories", [], |row| row.get(0))?;
    Ok(count)
}

/// Whether any consultation still points at this category.
pub fn is_category_referenced(conn: &Connection, id: i64) -> Result<bool, DatabaseError> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM consultations WHERE category_id = ?1",
        params![id],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_memory_database;

    #[test]
    fn insert_and_fetch_round_trip() {
        let conn = open_memory_database().unwrap();
        let id = insert_category(
            &conn,
            &Category::new("Consultation générale", Some("Visite de routine".into())),
        )
        .unwrap();

        let fetched = get_category_by_id(&conn, id).unwrap().unwrap();
        assert_eq!(fetched.designation, "Consultation générale");

        let by_designation = get_category_by_designation(&conn, "Consultation générale")
            .unwrap()
            .unwrap();
        assert_eq!(by_designation.id, id);
    }

    #[test]
    fn listing_is_ordered_by_designation() {
        let conn = open_memory_database().unwrap();
        insert_category(&conn, &Category::new("Urgence", None)).unwrap();
        insert_category(&conn, &Category::new("Contrôle", None)).unwrap();

        let all = get_all_categories(&conn).unwrap();
        assert_eq!(all[0].designation, "Contrôle");
        assert_eq!(all[1].designation, "Urgence");
    }

    #[test]
    fn unreferenced_category_is_not_flagged() {
        let conn = open_memory_database().unwrap();
        let id = insert_category(&conn, &Category::new("Urgence", None)).unwrap();
        assert!(!is_category_referenced(&conn, id).unwrap());
    }
}
