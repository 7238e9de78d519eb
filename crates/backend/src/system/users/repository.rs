//! `sys_user` / `sys_group`: the people and work queues a document can be assigned to

use anyhow::{Context, Result};
use contracts::system::users::{Group, User};
use sea_orm::{ConnectionTrait, DatabaseBackend, QueryResult, Statement};

use crate::shared::data::db::get_connection;

fn user_from_row(row: &QueryResult) -> Result<User> {
    Ok(User {
        id: row.try_get("", "id")?,
        username: row.try_get("", "username")?,
        full_name: row.try_get("", "full_name")?,
        is_active: row.try_get::<i32>("", "is_active")? != 0,
    })
}

fn group_from_row(row: &QueryResult) -> Result<Group> {
    Ok(Group {
        id: row.try_get("", "id")?,
        name: row.try_get("", "name")?,
    })
}

fn like_pattern(query: Option<&str>) -> String {
    format!("%{}%", query.unwrap_or("").trim().to_lowercase())
}

/// Get user by ID
pub async fn get_user(id: i64) -> Result<Option<User>> {
    let row = get_connection()
        .query_one(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "SELECT id, username, full_name, is_active FROM sys_user WHERE id = ?",
            [id.into()],
        ))
        .await?;
    row.as_ref().map(user_from_row).transpose()
}

/// Get group by ID
pub async fn get_group(id: i64) -> Result<Option<Group>> {
    let row = get_connection()
        .query_one(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "SELECT id, name FROM sys_group WHERE id = ?",
            [id.into()],
        ))
        .await?;
    row.as_ref().map(group_from_row).transpose()
}

/// Active users whose username or full name contains `query`
pub async fn search_active_users(query: Option<&str>, limit: u64) -> Result<Vec<User>> {
    let rows = get_connection()
        .query_all(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "SELECT id, username, full_name, is_active FROM sys_user
             WHERE is_active = 1
               AND (lower(username) LIKE ? OR lower(coalesce(full_name, '')) LIKE ?)
             ORDER BY coalesce(full_name, username)
             LIMIT ?",
            [
                like_pattern(query).into(),
                like_pattern(query).into(),
                (limit as i64).into(),
            ],
        ))
        .await?;
    rows.iter().map(user_from_row).collect()
}

pub async fn search_groups(query: Option<&str>, limit: u64) -> Result<Vec<Group>> {
    let rows = get_connection()
        .query_all(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "SELECT id, name FROM sys_group WHERE lower(name) LIKE ? ORDER BY name LIMIT ?",
            [like_pattern(query).into(), (limit as i64).into()],
        ))
        .await?;
    rows.iter().map(group_from_row).collect()
}

/// Insert user, returns the new ID
pub async fn insert_user(username: &str, full_name: Option<&str>) -> Result<i64> {
    let result = get_connection()
        .execute(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "INSERT INTO sys_user (username, full_name, is_active) VALUES (?, ?, 1)",
            [username.into(), full_name.map(str::to_string).into()],
        ))
        .await
        .context("Failed to insert user")?;
    Ok(result.last_insert_id() as i64)
}

pub async fn insert_group(name: &str) -> Result<i64> {
    let result = get_connection()
        .execute(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "INSERT INTO sys_group (name) VALUES (?)",
            [name.into()],
        ))
        .await
        .context("Failed to insert group")?;
    Ok(result.last_insert_id() as i64)
}

/// Number of users, used to keep seeded usernames unique across runs
pub async fn count_users() -> Result<u64> {
    let row = get_connection()
        .query_one(Statement::from_string(
            DatabaseBackend::Sqlite,
            "SELECT COUNT(*) AS cnt FROM sys_user".to_string(),
        ))
        .await?;
    let count = match row {
        Some(row) => row.try_get::<i64>("", "cnt")?,
        None => 0,
    };
    Ok(count as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_is_case_insensitive_contains() {
        assert_eq!(like_pattern(Some(" Jane ")), "%jane%");
        assert_eq!(like_pattern(None), "%%");
    }
}
