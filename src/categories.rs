//! Consultation categories — business rules over the category repository.

use rusqlite::Connection;
use tracing::info;

use crate::db::repository;
use crate::error::ServiceError;
use crate::models::Category;
use crate::validation;

pub fn create_category(conn: &Connection, category: Category) -> Result<Category, ServiceError> {
    validate_category(&category)?;

    if repository::get_category_by_designation(conn, &category.designation)?.is_some() {
        return Err(ServiceError::business(
            "a category with this designation already exists",
        ));
    }

    let mut category = category;
    category.id = repository::insert_category(conn, &category)?;
    info!("Created category {}", category.id);
    Ok(category)
}

pub fn get_category(conn: &Connection, id: i64) -> Result<Category, ServiceError> {
    repository::get_category_by_id(conn, id)?.ok_or(ServiceError::not_found("category", id))
}

pub fn get_category_by_designation(
    conn: &Connection,
    designation: &str,
) -> Result<Option<Category>, ServiceError> {
    Ok(repository::get_category_by_designation(conn, designation)?)
}

pub fn list_categories(conn: &Connection) -> Result<Vec<Category>, ServiceError> {
    Ok(repository::get_all_categories(conn)?)
}

pub fn update_category(conn: &Connection, category: Category) -> Result<Category, ServiceError> {
    get_category(conn, category.id)?;
    validate_category(&category)?;

    if let Some(other) = repository::get_category_by_designation(conn, &category.designation)? {
        if other.id != category.id {
            return Err(ServiceError::business(
                "another category already has this designation",
            ));
        }
    }

    repository::update_category(conn, &category)?;
    Ok(category)
}

/// Deletion is refused while consultations still reference the category.
pub fn delete_category(conn: &Connection, id: i64) -> Result<(), ServiceError> {
    get_category(conn, id)?;

    if repository::is_category_referenced(conn, id)? {
        return Err(ServiceError::business(
            "this category is used by consultations and cannot be deleted",
        ));
    }

    repository::delete_category(conn, id)?;
    info!("Deleted category {id}");
    Ok(())
}

pub fn count_categories(conn: &Connection) -> Result<i64, ServiceError> {
    Ok(repository::count_categories(conn)?)
}

fn validate_category(category: &Category) -> Result<(), ServiceError> {
    if !validation::is_not_blank(&category.designation) {
        return Err(ServiceError::validation(
            "designation",
            "designation is required",
        ));
    }
    if category.designation.chars().count() > 50 {
        return Err(ServiceError::validation(
            "designation",
            "designation cannot exceed 50 characters",
        ));
    }
    Ok(())
}
