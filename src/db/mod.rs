mod schema;

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use chrono::NaiveDate;
use indexmap::IndexSet;
use rusqlite::Connection;
use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use crate::models::*;

/// Failure inside the record store.
///
/// A stored row whose values no longer pass domain validation surfaces as
/// [`StoreError::Corrupt`]; a half-built record never escapes.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("stored row is not a valid record: {0}")]
    Corrupt(String),
}

/// Gateway to the launch record collections.
///
/// Saves are upserts on the record's natural key: saving a record equal to
/// a stored one updates the stored record's other attributes in place, so
/// the store never holds two records that compare equal. Saving a record
/// also saves the records it references (a rocket's manufacturer, a
/// launch's vehicle and provider) the same way. The order `get_all_*`
/// returns records in carries no contract.
pub trait Store {
    fn get_all_providers(&self) -> Result<Vec<LaunchServiceProvider>, StoreError>;
    fn get_provider(&self, id: Uuid) -> Result<Option<LaunchServiceProvider>, StoreError>;
    fn save_provider(
        &self,
        provider: LaunchServiceProvider,
    ) -> Result<LaunchServiceProvider, StoreError>;
    fn delete_provider(&self, id: Uuid) -> Result<bool, StoreError>;

    fn get_all_rockets(&self) -> Result<Vec<Rocket>, StoreError>;
    fn get_rocket(&self, id: Uuid) -> Result<Option<Rocket>, StoreError>;
    fn save_rocket(&self, rocket: Rocket) -> Result<Rocket, StoreError>;
    fn delete_rocket(&self, id: Uuid) -> Result<bool, StoreError>;

    fn get_all_launches(&self) -> Result<Vec<Launch>, StoreError>;
    fn get_launch(&self, id: Uuid) -> Result<Option<Launch>, StoreError>;
    fn save_launch(&self, launch: Launch) -> Result<Launch, StoreError>;
    fn delete_launch(&self, id: Uuid) -> Result<bool, StoreError>;

    fn get_all_users(&self) -> Result<Vec<User>, StoreError>;
    fn get_user(&self, id: Uuid) -> Result<Option<User>, StoreError>;
    fn save_user(&self, user: User) -> Result<User, StoreError>;
    fn delete_user(&self, id: Uuid) -> Result<bool, StoreError>;
}

pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

const ROCKET_SELECT: &str =
    "SELECT r.id, r.name, r.country, r.mass_to_leo, r.mass_to_gto, r.mass_to_other, r.wiki_link,
            m.id, m.name, m.year_founded, m.country, m.headquarters
     FROM rockets r
     JOIN providers m ON m.id = r.manufacturer_id";

const LAUNCH_SELECT: &str =
    "SELECT l.id, l.launch_date, l.launch_site, l.orbit, l.function, l.price, l.outcome,
            r.id, r.name, r.country, r.mass_to_leo, r.mass_to_gto, r.mass_to_other, r.wiki_link,
            m.id, m.name, m.year_founded, m.country, m.headquarters,
            p.id, p.name, p.year_founded, p.country, p.headquarters
     FROM launches l
     JOIN rockets r ON r.id = l.rocket_id
     JOIN providers m ON m.id = r.manufacturer_id
     JOIN providers p ON p.id = l.provider_id";

impl Database {
    pub fn open(path: PathBuf) -> Result<Self> {
        let parent = path
            .parent()
            .ok_or_else(|| anyhow::anyhow!("Database path has no parent directory"))?;
        std::fs::create_dir_all(parent)?;
        let conn = Connection::open(&path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn open_default() -> Result<Self> {
        let dirs = directories::ProjectDirs::from("", "", "launch-ledger")
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
        let db_path = dirs.data_dir().join("ledger.db");
        Self::open(db_path)
    }

    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn migrate(&self) -> Result<()> {
        let conn = self.conn.lock().expect("database lock poisoned");
        schema::run_migrations(&conn)
    }
}

impl Store for Database {
    // ============================================================
    // Provider operations
    // ============================================================

    fn get_all_providers(&self) -> Result<Vec<LaunchServiceProvider>, StoreError> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(
            "SELECT id, name, year_founded, country, headquarters
             FROM providers ORDER BY name, year_founded",
        )?;

        let rows = stmt
            .query_map([], |row| provider_at(row, 0))?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|row| assemble_provider(&conn, row))
            .collect()
    }

    fn get_provider(&self, id: Uuid) -> Result<Option<LaunchServiceProvider>, StoreError> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(
            "SELECT id, name, year_founded, country, headquarters
             FROM providers WHERE id = ?",
        )?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            let row = provider_at(row, 0)?;
            Ok(Some(assemble_provider(&conn, row)?))
        } else {
            Ok(None)
        }
    }

    fn save_provider(
        &self,
        provider: LaunchServiceProvider,
    ) -> Result<LaunchServiceProvider, StoreError> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let (_, saved) = upsert_provider(&conn, provider)?;
        Ok(saved)
    }

    fn delete_provider(&self, id: Uuid) -> Result<bool, StoreError> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let rows = conn.execute("DELETE FROM providers WHERE id = ?", [id.to_string()])?;
        Ok(rows > 0)
    }

    // ============================================================
    // Rocket operations
    // ============================================================

    fn get_all_rockets(&self) -> Result<Vec<Rocket>, StoreError> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(&format!("{ROCKET_SELECT} ORDER BY r.name, r.country"))?;

        let rows = stmt
            .query_map([], |row| Ok((rocket_at(row, 0)?, provider_at(row, 7)?)))?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(rocket, manufacturer)| build_rocket(rocket, build_provider(manufacturer)?))
            .collect()
    }

    fn get_rocket(&self, id: Uuid) -> Result<Option<Rocket>, StoreError> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(&format!("{ROCKET_SELECT} WHERE r.id = ?"))?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            let rocket = rocket_at(row, 0)?;
            let manufacturer = provider_at(row, 7)?;
            Ok(Some(build_rocket(rocket, build_provider(manufacturer)?)?))
        } else {
            Ok(None)
        }
    }

    fn save_rocket(&self, rocket: Rocket) -> Result<Rocket, StoreError> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let (_, saved) = upsert_rocket(&conn, rocket)?;
        Ok(saved)
    }

    fn delete_rocket(&self, id: Uuid) -> Result<bool, StoreError> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let rows = conn.execute("DELETE FROM rockets WHERE id = ?", [id.to_string()])?;
        Ok(rows > 0)
    }

    // ============================================================
    // Launch operations
    // ============================================================

    fn get_all_launches(&self) -> Result<Vec<Launch>, StoreError> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(&format!("{LAUNCH_SELECT} ORDER BY l.launch_date, l.id"))?;

        let rows = stmt
            .query_map([], |row| {
                Ok((
                    launch_at(row, 0)?,
                    rocket_at(row, 7)?,
                    provider_at(row, 14)?,
                    provider_at(row, 19)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(launch, rocket, manufacturer, provider)| {
                build_launch(launch, rocket, manufacturer, provider)
            })
            .collect()
    }

    fn get_launch(&self, id: Uuid) -> Result<Option<Launch>, StoreError> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(&format!("{LAUNCH_SELECT} WHERE l.id = ?"))?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            let launch = launch_at(row, 0)?;
            let rocket = rocket_at(row, 7)?;
            let manufacturer = provider_at(row, 14)?;
            let provider = provider_at(row, 19)?;
            Ok(Some(build_launch(launch, rocket, manufacturer, provider)?))
        } else {
            Ok(None)
        }
    }

    fn save_launch(&self, launch: Launch) -> Result<Launch, StoreError> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let (_, saved) = upsert_launch(&conn, launch)?;
        Ok(saved)
    }

    fn delete_launch(&self, id: Uuid) -> Result<bool, StoreError> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let rows = conn.execute("DELETE FROM launches WHERE id = ?", [id.to_string()])?;
        Ok(rows > 0)
    }

    // ============================================================
    // User operations
    // ============================================================

    fn get_all_users(&self) -> Result<Vec<User>, StoreError> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(
            "SELECT id, first_name, last_name, email, password
             FROM users ORDER BY email",
        )?;

        let rows = stmt
            .query_map([], user_at)?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter().map(build_user).collect()
    }

    fn get_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(
            "SELECT id, first_name, last_name, email, password
             FROM users WHERE id = ?",
        )?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            Ok(Some(build_user(user_at(row)?)?))
        } else {
            Ok(None)
        }
    }

    fn save_user(&self, user: User) -> Result<User, StoreError> {
        let conn = self.conn.lock().expect("database lock poisoned");
        upsert_user(&conn, user)
    }

    fn delete_user(&self, id: Uuid) -> Result<bool, StoreError> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let rows = conn.execute("DELETE FROM users WHERE id = ?", [id.to_string()])?;
        Ok(rows > 0)
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self {
            conn: self.conn.clone(),
        }
    }
}

// ============================================================
// Row shapes and mapping
// ============================================================

struct ProviderRow {
    id: String,
    name: String,
    year_founded: i32,
    country: String,
    headquarters: Option<String>,
}

struct RocketRow {
    id: String,
    name: String,
    country: String,
    mass_to_leo: Option<u32>,
    mass_to_gto: Option<u32>,
    mass_to_other: Option<u32>,
    wiki_link: Option<String>,
}

struct LaunchRow {
    id: String,
    launch_date: String,
    launch_site: String,
    orbit: String,
    function: Option<String>,
    price: String,
    outcome: String,
}

struct UserRow {
    id: String,
    first_name: String,
    last_name: String,
    email: String,
    password: String,
}

fn provider_at(row: &rusqlite::Row, base: usize) -> rusqlite::Result<ProviderRow> {
    Ok(ProviderRow {
        id: row.get(base)?,
        name: row.get(base + 1)?,
        year_founded: row.get(base + 2)?,
        country: row.get(base + 3)?,
        headquarters: row.get(base + 4)?,
    })
}

fn rocket_at(row: &rusqlite::Row, base: usize) -> rusqlite::Result<RocketRow> {
    Ok(RocketRow {
        id: row.get(base)?,
        name: row.get(base + 1)?,
        country: row.get(base + 2)?,
        mass_to_leo: row.get(base + 3)?,
        mass_to_gto: row.get(base + 4)?,
        mass_to_other: row.get(base + 5)?,
        wiki_link: row.get(base + 6)?,
    })
}

fn launch_at(row: &rusqlite::Row, base: usize) -> rusqlite::Result<LaunchRow> {
    Ok(LaunchRow {
        id: row.get(base)?,
        launch_date: row.get(base + 1)?,
        launch_site: row.get(base + 2)?,
        orbit: row.get(base + 3)?,
        function: row.get(base + 4)?,
        price: row.get(base + 5)?,
        outcome: row.get(base + 6)?,
    })
}

fn user_at(row: &rusqlite::Row) -> rusqlite::Result<UserRow> {
    Ok(UserRow {
        id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        email: row.get(3)?,
        password: row.get(4)?,
    })
}

// ============================================================
// Record assembly
// ============================================================

fn build_provider(row: ProviderRow) -> Result<LaunchServiceProvider, StoreError> {
    let id = parse_uuid(&row.id)?;
    let mut provider =
        LaunchServiceProvider::new(&row.name, row.year_founded, &row.country).map_err(corrupt)?;
    if let Some(headquarters) = &row.headquarters {
        provider = provider.with_headquarters(headquarters).map_err(corrupt)?;
    }
    Ok(provider.with_id(id))
}

/// Builds a provider together with its owned rocket set. Each rocket in
/// the set back-references the provider shallowly (no rocket set of its
/// own), which keeps the value finite.
fn assemble_provider(
    conn: &Connection,
    row: ProviderRow,
) -> Result<LaunchServiceProvider, StoreError> {
    let id = parse_uuid(&row.id)?;
    let shallow = build_provider(row)?;

    let mut stmt = conn.prepare(
        "SELECT id, name, country, mass_to_leo, mass_to_gto, mass_to_other, wiki_link
         FROM rockets WHERE manufacturer_id = ? ORDER BY name",
    )?;
    let rows = stmt
        .query_map([id.to_string()], |row| {
            Ok(RocketRow {
                id: row.get(0)?,
                name: row.get(1)?,
                country: row.get(2)?,
                mass_to_leo: row.get(3)?,
                mass_to_gto: row.get(4)?,
                mass_to_other: row.get(5)?,
                wiki_link: row.get(6)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    let rockets = rows
        .into_iter()
        .map(|row| build_rocket(row, shallow.clone()))
        .collect::<Result<IndexSet<_>, _>>()?;

    Ok(shallow.with_rockets(rockets))
}

fn build_rocket(row: RocketRow, manufacturer: LaunchServiceProvider) -> Result<Rocket, StoreError> {
    let id = parse_uuid(&row.id)?;
    let mut rocket = Rocket::new(&row.name, &row.country, manufacturer)
        .and_then(|r| r.with_mass_to_leo(row.mass_to_leo))
        .and_then(|r| r.with_mass_to_gto(row.mass_to_gto))
        .and_then(|r| r.with_mass_to_other(row.mass_to_other))
        .map_err(corrupt)?;
    if let Some(wiki_link) = &row.wiki_link {
        rocket = rocket.with_wiki_link(wiki_link).map_err(corrupt)?;
    }
    Ok(rocket.with_id(id))
}

fn build_launch(
    row: LaunchRow,
    rocket: RocketRow,
    manufacturer: ProviderRow,
    provider: ProviderRow,
) -> Result<Launch, StoreError> {
    let id = parse_uuid(&row.id)?;
    let vehicle = build_rocket(rocket, build_provider(manufacturer)?)?;
    let provider = build_provider(provider)?;

    let launch = Launch::new(LaunchDetails {
        launch_date: parse_date(&row.launch_date)?,
        vehicle,
        provider,
        launch_site: row.launch_site,
        orbit: row.orbit,
        function: row.function,
        price: parse_price(&row.price)?,
        outcome: parse_outcome(&row.outcome)?,
    })
    .map_err(corrupt)?;

    Ok(launch.with_id(id))
}

fn build_user(row: UserRow) -> Result<User, StoreError> {
    let id = parse_uuid(&row.id)?;
    let user =
        User::new(&row.first_name, &row.last_name, &row.email, &row.password).map_err(corrupt)?;
    Ok(user.with_id(id))
}

// ============================================================
// Upserts
// ============================================================

fn upsert_provider(
    conn: &Connection,
    provider: LaunchServiceProvider,
) -> Result<(Uuid, LaunchServiceProvider), StoreError> {
    let existing = {
        let mut stmt = conn.prepare(
            "SELECT id FROM providers WHERE name = ? AND year_founded = ? AND country = ?",
        )?;
        let mut rows = stmt.query((
            provider.name(),
            provider.year_founded(),
            provider.country(),
        ))?;
        match rows.next()? {
            Some(row) => Some(row.get::<_, String>(0)?),
            None => None,
        }
    };

    let id = match existing {
        Some(raw) => {
            let id = parse_uuid(&raw)?;
            conn.execute(
                "UPDATE providers SET headquarters = ? WHERE id = ?",
                (provider.headquarters(), id.to_string()),
            )?;
            id
        }
        None => {
            let id = Uuid::new_v4();
            conn.execute(
                "INSERT INTO providers (id, name, year_founded, country, headquarters)
                 VALUES (?, ?, ?, ?, ?)",
                (
                    id.to_string(),
                    provider.name(),
                    provider.year_founded(),
                    provider.country(),
                    provider.headquarters(),
                ),
            )?;
            id
        }
    };

    let mut saved_rockets = IndexSet::new();
    for rocket in provider.rockets() {
        let (_, saved) = upsert_rocket(conn, rocket.clone())?;
        saved_rockets.insert(saved);
    }

    Ok((id, provider.with_rockets(saved_rockets).with_id(id)))
}

fn upsert_rocket(conn: &Connection, rocket: Rocket) -> Result<(Uuid, Rocket), StoreError> {
    let (manufacturer_id, manufacturer) = upsert_provider(conn, rocket.manufacturer().clone())?;

    let existing = {
        let mut stmt = conn.prepare(
            "SELECT id FROM rockets WHERE name = ? AND country = ? AND manufacturer_id = ?",
        )?;
        let mut rows = stmt.query((rocket.name(), rocket.country(), manufacturer_id.to_string()))?;
        match rows.next()? {
            Some(row) => Some(row.get::<_, String>(0)?),
            None => None,
        }
    };

    let id = match existing {
        Some(raw) => {
            let id = parse_uuid(&raw)?;
            conn.execute(
                "UPDATE rockets SET mass_to_leo = ?, mass_to_gto = ?, mass_to_other = ?, wiki_link = ?
                 WHERE id = ?",
                (
                    rocket.mass_to_leo(),
                    rocket.mass_to_gto(),
                    rocket.mass_to_other(),
                    rocket.wiki_link(),
                    id.to_string(),
                ),
            )?;
            id
        }
        None => {
            let id = Uuid::new_v4();
            conn.execute(
                "INSERT INTO rockets (id, name, country, manufacturer_id, mass_to_leo, mass_to_gto, mass_to_other, wiki_link)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
                (
                    id.to_string(),
                    rocket.name(),
                    rocket.country(),
                    manufacturer_id.to_string(),
                    rocket.mass_to_leo(),
                    rocket.mass_to_gto(),
                    rocket.mass_to_other(),
                    rocket.wiki_link(),
                ),
            )?;
            id
        }
    };

    Ok((id, rocket.with_manufacturer(manufacturer).with_id(id)))
}

fn upsert_launch(conn: &Connection, launch: Launch) -> Result<(Uuid, Launch), StoreError> {
    let (rocket_id, vehicle) = upsert_rocket(conn, launch.vehicle().clone())?;
    let (provider_id, provider) = upsert_provider(conn, launch.provider().clone())?;

    let existing = {
        let mut stmt = conn.prepare(
            "SELECT id FROM launches
             WHERE launch_date = ? AND rocket_id = ? AND provider_id = ? AND orbit = ?",
        )?;
        let mut rows = stmt.query((
            launch.launch_date().to_string(),
            rocket_id.to_string(),
            provider_id.to_string(),
            launch.orbit(),
        ))?;
        match rows.next()? {
            Some(row) => Some(row.get::<_, String>(0)?),
            None => None,
        }
    };

    let id = match existing {
        Some(raw) => {
            let id = parse_uuid(&raw)?;
            conn.execute(
                "UPDATE launches SET launch_site = ?, function = ?, price = ?, outcome = ?
                 WHERE id = ?",
                (
                    launch.launch_site(),
                    launch.function(),
                    launch.price().to_string(),
                    launch.outcome().as_str(),
                    id.to_string(),
                ),
            )?;
            id
        }
        None => {
            let id = Uuid::new_v4();
            conn.execute(
                "INSERT INTO launches (id, launch_date, rocket_id, provider_id, launch_site, orbit, function, price, outcome)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
                (
                    id.to_string(),
                    launch.launch_date().to_string(),
                    rocket_id.to_string(),
                    provider_id.to_string(),
                    launch.launch_site(),
                    launch.orbit(),
                    launch.function(),
                    launch.price().to_string(),
                    launch.outcome().as_str(),
                ),
            )?;
            id
        }
    };

    Ok((
        id,
        launch
            .with_vehicle(vehicle)
            .with_provider(provider)
            .with_id(id),
    ))
}

fn upsert_user(conn: &Connection, user: User) -> Result<User, StoreError> {
    let existing = {
        let mut stmt = conn.prepare("SELECT id FROM users WHERE email = ?")?;
        let mut rows = stmt.query([user.email()])?;
        match rows.next()? {
            Some(row) => Some(row.get::<_, String>(0)?),
            None => None,
        }
    };

    let id = match existing {
        Some(raw) => {
            let id = parse_uuid(&raw)?;
            conn.execute(
                "UPDATE users SET first_name = ?, last_name = ?, password = ? WHERE id = ?",
                (
                    user.first_name(),
                    user.last_name(),
                    user.password(),
                    id.to_string(),
                ),
            )?;
            id
        }
        None => {
            let id = Uuid::new_v4();
            conn.execute(
                "INSERT INTO users (id, first_name, last_name, email, password)
                 VALUES (?, ?, ?, ?, ?)",
                (
                    id.to_string(),
                    user.first_name(),
                    user.last_name(),
                    user.email(),
                    user.password(),
                ),
            )?;
            id
        }
    };

    Ok(user.with_id(id))
}

// ============================================================
// Column parsing
// ============================================================

fn corrupt(err: ValidationError) -> StoreError {
    StoreError::Corrupt(err.to_string())
}

fn parse_uuid(value: &str) -> Result<Uuid, StoreError> {
    Uuid::parse_str(value).map_err(|_| StoreError::Corrupt(format!("bad uuid in row: {value}")))
}

fn parse_date(value: &str) -> Result<NaiveDate, StoreError> {
    value
        .parse::<NaiveDate>()
        .map_err(|_| StoreError::Corrupt(format!("bad launch date in row: {value}")))
}

fn parse_price(value: &str) -> Result<Decimal, StoreError> {
    value
        .parse::<Decimal>()
        .map_err(|_| StoreError::Corrupt(format!("bad price in row: {value}")))
}

fn parse_outcome(value: &str) -> Result<LaunchOutcome, StoreError> {
    LaunchOutcome::from_str(value)
        .ok_or_else(|| StoreError::Corrupt(format!("bad outcome in row: {value}")))
}
