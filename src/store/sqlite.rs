use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::Utc;
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{Connection, OptionalExtension, Row, params};

use crate::models::{NewOrganization, NewUser, Organization, RoleName, User};

use super::{OrganizationsStore, StoreError, UsersStore};

const USER_COLS: &str = "id, name, provider, scheme, super_admin, created_at";

/// SQLite-backed implementation of the store contracts.
#[derive(Clone)]
pub struct SqliteStore {
    pool: Pool<SqliteConnectionManager>,
}

impl SqliteStore {
    /// Open (creating if necessary) the database at `path` and ensure the
    /// schema and the default organization exist.
    pub fn open(path: &str) -> Result<Self, StoreError> {
        let manager = SqliteConnectionManager::file(path)
            .with_init(|conn| conn.execute_batch("PRAGMA foreign_keys = ON;"));
        let pool = Pool::new(manager)?;
        let store = Self { pool };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<(), StoreError> {
        let conn = self.pool.get()?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS organizations (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                provider TEXT NOT NULL,
                scheme TEXT NOT NULL,
                super_admin INTEGER NOT NULL DEFAULT 0,
                created_at INTEGER NOT NULL,
                UNIQUE (name, provider)
            );

            CREATE TABLE IF NOT EXISTS roles (
                user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                organization TEXT NOT NULL,
                name TEXT NOT NULL,
                UNIQUE (user_id, organization)
            );",
        )?;
        // Every deployment has the default organization from the start.
        conn.execute(
            "INSERT OR IGNORE INTO organizations (id, name) VALUES (0, 'Default')",
            [],
        )?;
        Ok(())
    }
}

fn user_from_row(row: &Row) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        name: row.get(1)?,
        provider: row.get(2)?,
        scheme: row.get(3)?,
        super_admin: row.get(4)?,
        roles: BTreeMap::new(),
        created_at: row.get(5)?,
    })
}

fn roles_for(conn: &Connection, user_id: i64) -> Result<BTreeMap<String, RoleName>, StoreError> {
    let mut stmt = conn.prepare("SELECT organization, name FROM roles WHERE user_id = ?1")?;
    let rows = stmt.query_map(params![user_id], |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
    })?;
    let mut roles = BTreeMap::new();
    for row in rows {
        let (organization, name) = row?;
        let name = RoleName::from_str(&name).map_err(|_| StoreError::InvalidRole(name))?;
        // UNIQUE (user_id, organization) guarantees no key is seen twice.
        roles.insert(organization, name);
    }
    Ok(roles)
}

impl UsersStore for SqliteStore {
    fn user_by_subject_issuer(
        &self,
        subject: &str,
        issuer: &str,
    ) -> Result<Option<User>, StoreError> {
        let conn = self.pool.get()?;
        // One transaction so the user row and its roles are a consistent
        // snapshot even under concurrent role mutation.
        let tx = conn.unchecked_transaction()?;
        let user = tx
            .prepare(&format!(
                "SELECT {USER_COLS} FROM users WHERE name = ?1 AND provider = ?2"
            ))?
            .query_row(params![subject, issuer], user_from_row)
            .optional()?;
        let user = match user {
            Some(mut user) => {
                user.roles = roles_for(&tx, user.id)?;
                Some(user)
            }
            None => None,
        };
        tx.commit()?;
        Ok(user)
    }

    fn user_by_id(&self, id: i64) -> Result<Option<User>, StoreError> {
        let conn = self.pool.get()?;
        let tx = conn.unchecked_transaction()?;
        let user = tx
            .prepare(&format!("SELECT {USER_COLS} FROM users WHERE id = ?1"))?
            .query_row(params![id], user_from_row)
            .optional()?;
        let user = match user {
            Some(mut user) => {
                user.roles = roles_for(&tx, user.id)?;
                Some(user)
            }
            None => None,
        };
        tx.commit()?;
        Ok(user)
    }

    fn all_users(&self) -> Result<Vec<User>, StoreError> {
        let conn = self.pool.get()?;
        let tx = conn.unchecked_transaction()?;
        let mut users: Vec<User> = tx
            .prepare(&format!("SELECT {USER_COLS} FROM users ORDER BY id"))?
            .query_map([], user_from_row)?
            .collect::<rusqlite::Result<_>>()?;
        for user in &mut users {
            user.roles = roles_for(&tx, user.id)?;
        }
        tx.commit()?;
        Ok(users)
    }

    fn add_user(&self, input: &NewUser) -> Result<User, StoreError> {
        // Rejects duplicate roles per organization before touching the DB.
        let roles = input.roles_by_organization()?;

        let mut conn = self.pool.get()?;
        let tx = conn.transaction()?;
        let now = Utc::now().timestamp();
        tx.execute(
            "INSERT INTO users (name, provider, scheme, super_admin, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![input.name, input.provider, input.scheme, input.super_admin, now],
        )?;
        let id = tx.last_insert_rowid();
        for (organization, name) in &roles {
            tx.execute(
                "INSERT INTO roles (user_id, organization, name) VALUES (?1, ?2, ?3)",
                params![id, organization, name.as_ref()],
            )?;
        }
        tx.commit()?;

        Ok(User {
            id,
            name: input.name.clone(),
            provider: input.provider.clone(),
            scheme: input.scheme.clone(),
            super_admin: input.super_admin,
            roles,
            created_at: now,
        })
    }
}

impl OrganizationsStore for SqliteStore {
    fn organization_by_id(&self, id: &str) -> Result<Option<Organization>, StoreError> {
        let Ok(numeric_id) = id.parse::<i64>() else {
            return Ok(None);
        };
        let conn = self.pool.get()?;
        let org = conn
            .prepare("SELECT id, name FROM organizations WHERE id = ?1")?
            .query_row(params![numeric_id], organization_from_row)
            .optional()?;
        Ok(org)
    }

    fn all_organizations(&self) -> Result<Vec<Organization>, StoreError> {
        let conn = self.pool.get()?;
        let orgs = conn
            .prepare("SELECT id, name FROM organizations ORDER BY id")?
            .query_map([], organization_from_row)?
            .collect::<rusqlite::Result<_>>()?;
        Ok(orgs)
    }

    fn add_organization(&self, input: &NewOrganization) -> Result<Organization, StoreError> {
        let conn = self.pool.get()?;
        conn.execute(
            "INSERT INTO organizations (name) VALUES (?1)",
            params![input.name],
        )?;
        Ok(Organization {
            id: conn.last_insert_rowid().to_string(),
            name: input.name.clone(),
        })
    }
}

fn organization_from_row(row: &Row) -> rusqlite::Result<Organization> {
    Ok(Organization {
        id: row.get::<_, i64>(0)?.to_string(),
        name: row.get(1)?,
    })
}
