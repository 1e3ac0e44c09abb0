//! SQLite record store
//!
//! Meals, their mood logs and craving swaps live in three tables. Each call
//! hops onto the blocking pool and holds the connection mutex only for the
//! duration of one statement batch.
//!
//! Timestamps are stored as Unix milliseconds (UTC).

use super::*;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS meals (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id      INTEGER NOT NULL,
    meal_type    TEXT    NOT NULL,
    foods        TEXT    NOT NULL,
    timestamp_ms INTEGER NOT NULL,
    photo        TEXT,
    notes        TEXT
);
CREATE INDEX IF NOT EXISTS idx_meals_user_ts ON meals (user_id, timestamp_ms);

CREATE TABLE IF NOT EXISTS mood_logs (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    meal_id      INTEGER NOT NULL REFERENCES meals (id) ON DELETE CASCADE,
    time_context TEXT    NOT NULL,
    intensity    INTEGER,
    mood_state   TEXT
);
CREATE INDEX IF NOT EXISTS idx_mood_logs_meal ON mood_logs (meal_id);

CREATE TABLE IF NOT EXISTS craving_swaps (
    id                  INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id             INTEGER NOT NULL,
    original_item       TEXT    NOT NULL,
    suggested_swap      TEXT    NOT NULL,
    accepted            INTEGER NOT NULL DEFAULT 0,
    craving_type        TEXT    NOT NULL DEFAULT 'General',
    satisfaction_rating INTEGER,
    created_at_ms       INTEGER NOT NULL,
    completed_at_ms     INTEGER
);
CREATE INDEX IF NOT EXISTS idx_craving_swaps_user ON craving_swaps (user_id);
"#;

/// Record store backed by a single SQLite connection
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

/// Meal columns before timestamp decoding
struct MealRow {
    id: i64,
    user_id: i64,
    meal_type: String,
    foods: String,
    timestamp_ms: i64,
    photo: Option<String>,
    notes: Option<String>,
}

/// Mood columns before context decoding
struct MoodRow {
    meal_id: i64,
    time_context: String,
    intensity: Option<i32>,
    mood_state: Option<String>,
}

fn from_millis(ms: i64, column: &str) -> StoreResult<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp_millis(ms)
        .ok_or_else(|| StoreError::Corrupt(format!("{} out of range: {}", column, ms)))
}

impl MoodRow {
    fn into_observation(self) -> StoreResult<(i64, MoodObservation)> {
        let time_context = TimeContext::parse(&self.time_context).ok_or_else(|| {
            StoreError::Corrupt(format!("unknown time context '{}'", self.time_context))
        })?;

        Ok((
            self.meal_id,
            MoodObservation {
                time_context,
                intensity: self.intensity,
                mood_state: self.mood_state,
            },
        ))
    }
}

impl SqliteStore {
    /// Open (or create) a database file and apply the schema
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        tracing::debug!(path = %path.display(), "Opened SQLite store");
        Self::from_connection(conn)
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> StoreResult<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run `f` against the connection on the blocking pool
    async fn with_conn<T, F>(&self, f: F) -> StoreResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> StoreResult<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let mut guard = conn
                .lock()
                .map_err(|e| StoreError::Lock(e.to_string()))?;
            f(&mut guard)
        })
        .await?
    }

    /// Insert a meal and its mood observations in one transaction
    pub async fn insert_meal(&self, meal: NewMeal) -> StoreResult<i64> {
        self.with_conn(move |conn| {
            let tx = conn.transaction()?;
            tx.execute(
                "INSERT INTO meals (user_id, meal_type, foods, timestamp_ms, photo, notes)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    meal.user_id.0,
                    meal.meal_type,
                    meal.foods,
                    meal.timestamp.timestamp_millis(),
                    meal.photo,
                    meal.notes,
                ],
            )?;
            let meal_id = tx.last_insert_rowid();

            for mood in &meal.moods {
                tx.execute(
                    "INSERT INTO mood_logs (meal_id, time_context, intensity, mood_state)
                     VALUES (?1, ?2, ?3, ?4)",
                    params![
                        meal_id,
                        mood.time_context.as_str(),
                        mood.intensity,
                        mood.mood_state,
                    ],
                )?;
            }

            tx.commit()?;
            Ok(meal_id)
        })
        .await
    }

    /// Record an accepted swap; the id on `swap` is ignored
    pub async fn insert_swap(&self, swap: SwapRecord) -> StoreResult<i64> {
        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO craving_swaps (user_id, original_item, suggested_swap, accepted,
                     craving_type, satisfaction_rating, created_at_ms, completed_at_ms)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    swap.user_id.0,
                    swap.original_item,
                    swap.suggested_swap,
                    swap.accepted,
                    swap.craving_type,
                    swap.satisfaction_rating,
                    swap.created_at.timestamp_millis(),
                    swap.completed_at.map(|t| t.timestamp_millis()),
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .await
    }
}

fn fetch_meals_blocking(
    conn: &Connection,
    user: UserId,
    options: &FetchOptions,
) -> StoreResult<Vec<MealRecord>> {
    let (from_ms, to_ms) = match options.range {
        Some(range) => (range.start.timestamp_millis(), range.end.timestamp_millis()),
        None => (i64::MIN, i64::MAX),
    };

    let order_by = match options.order {
        Some(SortOrder::Asc) => "timestamp_ms ASC, id ASC",
        Some(SortOrder::Desc) => "timestamp_ms DESC, id DESC",
        None => "id ASC",
    };

    let sql = format!(
        "SELECT id, user_id, meal_type, foods, timestamp_ms, photo, notes
         FROM meals
         WHERE user_id = ?1 AND timestamp_ms BETWEEN ?2 AND ?3
         ORDER BY {}",
        order_by
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![user.0, from_ms, to_ms], |row| {
            Ok(MealRow {
                id: row.get(0)?,
                user_id: row.get(1)?,
                meal_type: row.get(2)?,
                foods: row.get(3)?,
                timestamp_ms: row.get(4)?,
                photo: row.get(5)?,
                notes: row.get(6)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    let mood_state_column = match options.moods {
        MoodProjection::Full => "l.mood_state",
        MoodProjection::ContextAndIntensity => "NULL",
    };
    let mood_sql = format!(
        "SELECT l.meal_id, l.time_context, l.intensity, {}
         FROM mood_logs l
         JOIN meals m ON m.id = l.meal_id
         WHERE m.user_id = ?1 AND m.timestamp_ms BETWEEN ?2 AND ?3
         ORDER BY l.id ASC",
        mood_state_column
    );

    let mut mood_stmt = conn.prepare(&mood_sql)?;
    let mood_rows = mood_stmt
        .query_map(params![user.0, from_ms, to_ms], |row| {
            Ok(MoodRow {
                meal_id: row.get(0)?,
                time_context: row.get(1)?,
                intensity: row.get(2)?,
                mood_state: row.get(3)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    let mut moods_by_meal: HashMap<i64, Vec<MoodObservation>> = HashMap::new();
    for row in mood_rows {
        let (meal_id, observation) = row.into_observation()?;
        moods_by_meal.entry(meal_id).or_default().push(observation);
    }

    rows.into_iter()
        .map(|row| {
            Ok(MealRecord {
                id: row.id,
                user_id: UserId(row.user_id),
                meal_type: row.meal_type,
                foods: FoodList::parse(row.foods),
                timestamp: from_millis(row.timestamp_ms, "timestamp_ms")?,
                photo: row.photo,
                notes: row.notes,
                moods: moods_by_meal.remove(&row.id).unwrap_or_default(),
            })
        })
        .collect()
}

fn fetch_swaps_blocking(conn: &Connection, user: UserId, rating: u8) -> StoreResult<Vec<SwapRecord>> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, original_item, suggested_swap, accepted, craving_type,
                satisfaction_rating, created_at_ms, completed_at_ms
         FROM craving_swaps
         WHERE user_id = ?1 AND satisfaction_rating = ?2
         ORDER BY id ASC",
    )?;

    let rows = stmt
        .query_map(params![user.0, i32::from(rating)], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, bool>(4)?,
                row.get::<_, String>(5)?,
                row.get::<_, Option<i32>>(6)?,
                row.get::<_, i64>(7)?,
                row.get::<_, Option<i64>>(8)?,
            ))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    rows.into_iter()
        .map(
            |(id, user_id, original_item, suggested_swap, accepted, craving_type, rating, created, completed)| {
                Ok(SwapRecord {
                    id,
                    user_id: UserId(user_id),
                    original_item,
                    suggested_swap,
                    accepted,
                    craving_type,
                    satisfaction_rating: rating,
                    created_at: from_millis(created, "created_at_ms")?,
                    completed_at: completed
                        .map(|ms| from_millis(ms, "completed_at_ms"))
                        .transpose()?,
                })
            },
        )
        .collect()
}

#[async_trait]
impl MealStore for SqliteStore {
    async fn fetch_meals(
        &self,
        user: UserId,
        options: &FetchOptions,
    ) -> StoreResult<Vec<MealRecord>> {
        let options = options.clone();
        self.with_conn(move |conn| fetch_meals_blocking(conn, user, &options))
            .await
    }

    async fn ping(&self) -> StoreResult<()> {
        self.with_conn(|conn| {
            conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
            Ok(())
        })
        .await
    }
}

#[async_trait]
impl SwapStore for SqliteStore {
    async fn swaps_with_rating(&self, user: UserId, rating: u8) -> StoreResult<Vec<SwapRecord>> {
        self.with_conn(move |conn| fetch_swaps_blocking(conn, user, rating))
            .await
    }
}
