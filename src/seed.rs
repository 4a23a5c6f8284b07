use uuid::Uuid;

use crate::config::Config;
use crate::error::{AppError, AppResult};

const SCHEMA: &[&str] = &[
    r#"CREATE TABLE IF NOT EXISTS users (
        id UUID PRIMARY KEY,
        name TEXT NOT NULL,
        email TEXT UNIQUE NOT NULL,
        phone TEXT,
        password_hash TEXT NOT NULL,
        role TEXT NOT NULL DEFAULT 'user',
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )"#,
    r#"CREATE TABLE IF NOT EXISTS turfs (
        id UUID PRIMARY KEY,
        name TEXT NOT NULL,
        location TEXT NOT NULL,
        city TEXT NOT NULL,
        distance DOUBLE PRECISION NOT NULL DEFAULT 0,
        rating DOUBLE PRECISION NOT NULL DEFAULT 4.5,
        review_count INT NOT NULL DEFAULT 0,
        open_hour INT NOT NULL DEFAULT 6,
        close_hour INT NOT NULL DEFAULT 23,
        max_players INT NOT NULL DEFAULT 22,
        price_per_hour INT NOT NULL,
        sports TEXT NOT NULL,
        amenities TEXT NOT NULL DEFAULT '',
        description TEXT NOT NULL DEFAULT '',
        is_active BOOLEAN NOT NULL DEFAULT TRUE
    )"#,
    r#"CREATE TABLE IF NOT EXISTS bookings (
        id UUID PRIMARY KEY,
        user_id UUID NOT NULL REFERENCES users(id),
        turf_id UUID NOT NULL REFERENCES turfs(id),
        booking_date DATE NOT NULL,
        start_hour INT NOT NULL,
        end_hour INT NOT NULL,
        duration_hours INT NOT NULL,
        total_amount INT NOT NULL,
        sport TEXT NOT NULL,
        players INT NOT NULL DEFAULT 1,
        status TEXT NOT NULL DEFAULT 'confirmed',
        payment_status TEXT NOT NULL DEFAULT 'pending',
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )"#,
    r#"CREATE INDEX IF NOT EXISTS idx_bookings_turf_date
        ON bookings (turf_id, booking_date)"#,
    r#"CREATE TABLE IF NOT EXISTS reviews (
        id UUID PRIMARY KEY,
        user_id UUID NOT NULL REFERENCES users(id),
        turf_id UUID NOT NULL REFERENCES turfs(id),
        rating INT NOT NULL,
        comment TEXT,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        UNIQUE (user_id, turf_id)
    )"#,
];

// name, location, city, distance, rating, review_count, open, close,
// max_players, price_per_hour, sports, amenities, description
type SeedTurf = (
    &'static str,
    &'static str,
    &'static str,
    f64,
    f64,
    i32,
    i32,
    i32,
    i32,
    i32,
    &'static str,
    &'static str,
    &'static str,
);

const SEED_TURFS: &[SeedTurf] = &[
    ("Green Arena Football Turf", "Koramangala", "Bangalore", 1.2, 4.8, 245, 6, 23, 22, 1200,
     "Football,Cricket", "Parking,Floodlight,Cafeteria",
     "Premium football turf with top-quality artificial grass and floodlights."),
    ("Premier Cricket Academy", "Indiranagar", "Bangalore", 2.5, 4.6, 189, 5, 22, 22, 1500,
     "Cricket", "Nets,Coaching,Parking",
     "Professional cricket academy with practice nets and expert coaching."),
    ("Smash Badminton Hub", "HSR Layout", "Bangalore", 0.8, 4.9, 312, 6, 23, 8, 800,
     "Badminton", "AC,Locker,Trainer",
     "Air-conditioned badminton courts with professional trainers."),
    ("Elite Tennis Academy", "Whitefield", "Bangalore", 5.1, 4.7, 156, 5, 21, 4, 1000,
     "Tennis", "Clay Court,Hard Court,Coaching",
     "Premium tennis academy with clay and hard courts."),
    ("City Sports Complex", "Marathahalli", "Bangalore", 4.6, 4.5, 423, 6, 24, 22, 1100,
     "Football,Cricket,Basketball", "Parking,Canteen,Showers",
     "Multi-sport complex with facilities for football, cricket and basketball."),
    ("Hoops Arena", "Yelahanka", "Bangalore", 6.3, 4.6, 198, 6, 22, 10, 900,
     "Basketball", "Indoor Court,Scoreboard",
     "Professional indoor basketball court with electronic scoreboard."),
    ("Vaishali Cricket Ground", "Vaishali", "Delhi", 2.0, 4.4, 134, 6, 22, 22, 1000,
     "Cricket", "Parking,Nets",
     "Well-maintained cricket ground with practice nets."),
    ("Vaishali Football Arena", "Vaishali", "Delhi", 1.5, 4.3, 98, 7, 21, 22, 900,
     "Football", "Floodlight,Parking",
     "Quality football turf with floodlights for evening games."),
];

/// Idempotent bootstrap, run once at startup: create the schema if absent,
/// seed the turf catalog when the table is empty and the admin account when
/// none exists. Never invoked from request handling.
pub async fn run(db: &sqlx::PgPool, config: &Config) -> AppResult<()> {
    for stmt in SCHEMA {
        sqlx::query(stmt).execute(db).await?;
    }

    let turf_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM turfs")
        .fetch_one(db)
        .await?;

    if turf_count == 0 {
        for &(name, location, city, distance, rating, review_count, open_hour, close_hour,
             max_players, price_per_hour, sports, amenities, description) in SEED_TURFS
        {
            sqlx::query(
                r#"INSERT INTO turfs
                (id, name, location, city, distance, rating, review_count,
                 open_hour, close_hour, max_players, price_per_hour,
                 sports, amenities, description)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)"#,
            )
            .bind(Uuid::new_v4())
            .bind(name)
            .bind(location)
            .bind(city)
            .bind(distance)
            .bind(rating)
            .bind(review_count)
            .bind(open_hour)
            .bind(close_hour)
            .bind(max_players)
            .bind(price_per_hour)
            .bind(sports)
            .bind(amenities)
            .bind(description)
            .execute(db)
            .await?;
        }
        tracing::info!("Seeded {} turfs", SEED_TURFS.len());
    }

    let admin_count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE role = 'admin'")
            .fetch_one(db)
            .await?;

    if admin_count == 0 {
        let password_hash = bcrypt::hash(&config.seed.admin_password, 12)
            .map_err(|e| AppError::Internal(e.to_string()))?;
        sqlx::query(
            r#"INSERT INTO users (id, name, email, phone, password_hash, role)
            VALUES ($1, 'Admin', $2, '9876543210', $3, 'admin')
            ON CONFLICT (email) DO NOTHING"#,
        )
        .bind(Uuid::new_v4())
        .bind(&config.seed.admin_email)
        .bind(&password_hash)
        .execute(db)
        .await?;
        tracing::info!("Seeded admin account {}", config.seed.admin_email);
    }

    Ok(())
}
