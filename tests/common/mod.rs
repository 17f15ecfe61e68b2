use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;

use gift_payments::GiftCertificate;

pub fn datetime(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, mo, d)
        .expect("valid date")
        .and_hms_opt(h, mi, s)
        .expect("valid time")
}

fn certificate_stamp() -> NaiveDateTime {
    datetime(2022, 4, 10, 13, 48, 14)
}

/// A certificate as seeded into the fixture, for building expected values.
pub fn certificate(
    id: i64,
    name: &str,
    description: &str,
    price: Decimal,
    duration: i32,
) -> GiftCertificate {
    GiftCertificate {
        id,
        name: name.to_string(),
        description: description.to_string(),
        price,
        duration,
        create_date: certificate_stamp(),
        last_update_date: certificate_stamp(),
    }
}

pub fn evroopt() -> GiftCertificate {
    certificate(4, "Evroopt", "Buy two bananas", Decimal::new(2000, 2), 10)
}

pub async fn count_rows(pool: &SqlitePool, table: &str) -> i64 {
    let sql = format!("SELECT COUNT(*) AS count FROM {table}");
    let row = sqlx::query(&sql)
        .fetch_one(pool)
        .await
        .expect("Failed to count rows");
    row.get("count")
}

/// Fresh in-memory database with the schema created and the canonical
/// fixture seeded: 5 users, 4 certificates, 5 payments and 9 orders.
pub async fn setup_database() -> SqlitePool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .expect("valid connection string")
        .foreign_keys(true);

    // A single connection keeps every query on the same in-memory database.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .expect("Failed to open in-memory database");

    create_schema(&pool).await;
    seed_fixture(&pool).await;
    pool
}

async fn create_schema(pool: &SqlitePool) {
    sqlx::query(
        r#"
        CREATE TABLE users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            first_name TEXT NOT NULL,
            last_name TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await
    .expect("Failed to create users table");

    sqlx::query(
        r#"
        CREATE TABLE certificates (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            description TEXT NOT NULL,
            price TEXT NOT NULL,
            duration INTEGER NOT NULL,
            create_date TEXT NOT NULL,
            last_update_date TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await
    .expect("Failed to create certificates table");

    sqlx::query(
        r#"
        CREATE TABLE payments (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            created_at TEXT NOT NULL,
            user_id INTEGER NOT NULL REFERENCES users(id)
        )
        "#,
    )
    .execute(pool)
    .await
    .expect("Failed to create payments table");

    sqlx::query(
        r#"
        CREATE TABLE orders (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            cost TEXT NOT NULL,
            payment_id INTEGER NOT NULL REFERENCES payments(id),
            certificate_id INTEGER REFERENCES certificates(id) ON DELETE SET NULL
        )
        "#,
    )
    .execute(pool)
    .await
    .expect("Failed to create orders table");
}

async fn seed_fixture(pool: &SqlitePool) {
    let users: [(i64, &str, &str); 5] = [
        (1, "Ivan", "Pupkin"),
        (2, "Sanek", "Lupkin"),
        (3, "Petr", "Zhulkin"),
        (4, "Vasya", "Trupkin"),
        (5, "Kolya", "Shmupkin"),
    ];
    for (id, first_name, last_name) in users {
        sqlx::query("INSERT INTO users (id, first_name, last_name) VALUES (?, ?, ?)")
            .bind(id)
            .bind(first_name)
            .bind(last_name)
            .execute(pool)
            .await
            .expect("Failed to seed user");
    }

    let certificates: [(i64, &str, &str, &str, i32); 4] = [
        (1, "Oz.by", "Books and board games", "10.00", 30),
        (2, "Belvest", "Shoes for the whole family", "50.00", 14),
        (3, "Milavitsa", "Spring collection discount", "15.00", 7),
        (4, "Evroopt", "Buy two bananas", "20.00", 10),
    ];
    for (id, name, description, price, duration) in certificates {
        sqlx::query(
            "INSERT INTO certificates \
             (id, name, description, price, duration, create_date, last_update_date) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(id)
        .bind(name)
        .bind(description)
        .bind(price)
        .bind(duration)
        .bind(certificate_stamp())
        .bind(certificate_stamp())
        .execute(pool)
        .await
        .expect("Failed to seed certificate");
    }

    let payments: [(i64, NaiveDateTime, i64); 5] = [
        (1, datetime(2022, 5, 26, 22, 25, 17), 1),
        (2, datetime(2022, 5, 27, 22, 25, 17), 1),
        (3, datetime(2022, 5, 28, 22, 25, 17), 1),
        (4, datetime(2022, 5, 26, 22, 25, 17), 2),
        (5, datetime(2022, 5, 29, 22, 25, 17), 4),
    ];
    for (id, created_at, user_id) in payments {
        sqlx::query("INSERT INTO payments (id, created_at, user_id) VALUES (?, ?, ?)")
            .bind(id)
            .bind(created_at)
            .bind(user_id)
            .execute(pool)
            .await
            .expect("Failed to seed payment");
    }

    let orders: [(i64, &str, i64, Option<i64>); 9] = [
        (1, "10.00", 1, Some(1)),
        (2, "50.00", 1, Some(2)),
        (3, "5.00", 2, Some(2)),
        (4, "20.00", 2, Some(4)),
        (5, "20.00", 3, Some(4)),
        (6, "20.00", 4, Some(4)),
        (7, "20.00", 4, Some(4)),
        (8, "15.00", 5, Some(3)),
        (9, "12.00", 5, None),
    ];
    for (id, cost, payment_id, certificate_id) in orders {
        sqlx::query(
            "INSERT INTO orders (id, cost, payment_id, certificate_id) VALUES (?, ?, ?, ?)",
        )
        .bind(id)
        .bind(cost)
        .bind(payment_id)
        .bind(certificate_id)
        .execute(pool)
        .await
        .expect("Failed to seed order");
    }
}
