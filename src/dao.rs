use rust_decimal::Decimal;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use std::str::FromStr;

use crate::aggregate::{build_payment, PaymentOrderRow};
use crate::entities::{GiftCertificate, Payment, User, UserOrder};
use crate::error::{StoreError, StoreResult};
use crate::Executor;

const READ_PAYMENT_SQL: &str = "\
    SELECT p.id AS payment_id, p.created_at, \
           u.id AS user_id, u.first_name, u.last_name, \
           o.id AS order_id, o.cost, \
           c.id AS certificate_id, c.name AS certificate_name, \
           c.description AS certificate_description, c.price, c.duration, \
           c.create_date, c.last_update_date \
    FROM payments p \
    JOIN users u ON u.id = p.user_id \
    JOIN orders o ON o.payment_id = p.id \
    LEFT JOIN certificates c ON c.id = o.certificate_id \
    WHERE p.id = ? \
    ORDER BY o.id";

const READ_ORDERS_SQL: &str = "\
    SELECT o.id AS order_id, o.cost, o.payment_id, \
           c.id AS certificate_id, c.name AS certificate_name, \
           c.description AS certificate_description, c.price, c.duration, \
           c.create_date, c.last_update_date \
    FROM orders o \
    LEFT JOIN certificates c ON c.id = o.certificate_id \
    WHERE o.payment_id = ? \
    ORDER BY o.id \
    LIMIT ? OFFSET ?";

const READ_USER_PAYMENTS_SQL: &str = "\
    SELECT p.id AS payment_id, p.created_at, \
           u.id AS user_id, u.first_name, u.last_name \
    FROM payments p \
    JOIN users u ON u.id = p.user_id \
    WHERE p.user_id = ? \
    ORDER BY p.id \
    LIMIT ? OFFSET ?";

/// Storage access for the payment aggregate.
///
/// All queries run on the transaction of the unit-of-work session whose
/// executor this DAO was created with. Pagination here is zero-based; the
/// service layer translates one-based page numbers before calling in.
pub struct PaymentDao {
    executor: Executor,
}

impl PaymentDao {
    pub fn new(executor: Executor) -> Self {
        Self { executor }
    }

    /// Inserts the payment row and then each order row in insertion order,
    /// writing the generated ids back into the passed aggregate. Callers
    /// must wrap this in a session commit/rollback so a failed child insert
    /// leaves no rows behind.
    pub async fn create_payment(&self, payment: &mut Payment) -> StoreResult<()> {
        let mut tx_guard = self.executor.tx.lock().await;
        let tx = tx_guard.as_mut().ok_or(StoreError::TransactionClosed)?;

        let result = sqlx::query("INSERT INTO payments (created_at, user_id) VALUES (?, ?)")
            .bind(payment.created)
            .bind(payment.user.id)
            .execute(&mut **tx)
            .await?;
        payment.id = result.last_insert_rowid();

        for order in &mut payment.orders {
            let result = sqlx::query(
                "INSERT INTO orders (cost, payment_id, certificate_id) VALUES (?, ?, ?)",
            )
            .bind(order.cost.to_string())
            .bind(payment.id)
            .bind(order.certificate.as_ref().map(|c| c.id))
            .execute(&mut **tx)
            .await?;
            order.id = result.last_insert_rowid();
            order.payment_id = payment.id;
        }
        Ok(())
    }

    /// Reads one payment fully hydrated with its orders and their
    /// certificates. A deleted certificate shows up as an absent reference.
    /// Returns `None` when no payment row matches.
    pub async fn read_payment(&self, payment_id: i64) -> StoreResult<Option<Payment>> {
        let mut tx_guard = self.executor.tx.lock().await;
        let tx = tx_guard.as_mut().ok_or(StoreError::TransactionClosed)?;

        let rows = sqlx::query(READ_PAYMENT_SQL)
            .bind(payment_id)
            .fetch_all(&mut **tx)
            .await?;

        let joined = rows
            .iter()
            .map(map_joined_row)
            .collect::<StoreResult<Vec<_>>>()?;
        Ok(build_payment(joined))
    }

    /// Reads a window of one payment's orders, ascending by order id.
    pub async fn read_user_orders_by_payment_id(
        &self,
        payment_id: i64,
        offset: i64,
        limit: i64,
    ) -> StoreResult<Vec<UserOrder>> {
        let mut tx_guard = self.executor.tx.lock().await;
        let tx = tx_guard.as_mut().ok_or(StoreError::TransactionClosed)?;

        let rows = sqlx::query(READ_ORDERS_SQL)
            .bind(payment_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(&mut **tx)
            .await?;

        rows.iter().map(map_order_row).collect()
    }

    /// Reads a window of one user's payments, ascending by payment id,
    /// without orders attached. A user with no payments and a nonexistent
    /// user both yield an empty sequence.
    pub async fn read_payments_by_user_id(
        &self,
        user_id: i64,
        offset: i64,
        limit: i64,
    ) -> StoreResult<Vec<Payment>> {
        let mut tx_guard = self.executor.tx.lock().await;
        let tx = tx_guard.as_mut().ok_or(StoreError::TransactionClosed)?;

        let rows = sqlx::query(READ_USER_PAYMENTS_SQL)
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(&mut **tx)
            .await?;

        rows.iter().map(map_payment_row).collect()
    }

    pub async fn count_user_payments(&self, user_id: i64) -> StoreResult<i64> {
        let mut tx_guard = self.executor.tx.lock().await;
        let tx = tx_guard.as_mut().ok_or(StoreError::TransactionClosed)?;

        let row = sqlx::query("SELECT COUNT(*) AS count FROM payments WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(&mut **tx)
            .await?;
        Ok(row.try_get("count")?)
    }

    pub async fn count_payment_orders(&self, payment_id: i64) -> StoreResult<i64> {
        let mut tx_guard = self.executor.tx.lock().await;
        let tx = tx_guard.as_mut().ok_or(StoreError::TransactionClosed)?;

        let row = sqlx::query("SELECT COUNT(*) AS count FROM orders WHERE payment_id = ?")
            .bind(payment_id)
            .fetch_one(&mut **tx)
            .await?;
        Ok(row.try_get("count")?)
    }
}

fn map_joined_row(row: &SqliteRow) -> StoreResult<PaymentOrderRow> {
    Ok(PaymentOrderRow {
        payment_id: row.try_get("payment_id")?,
        created: row.try_get("created_at")?,
        user: User {
            id: row.try_get("user_id")?,
            first_name: row.try_get("first_name")?,
            last_name: row.try_get("last_name")?,
        },
        order_id: row.try_get("order_id")?,
        cost: parse_decimal(row.try_get("cost")?)?,
        certificate: map_certificate(row)?,
    })
}

fn map_order_row(row: &SqliteRow) -> StoreResult<UserOrder> {
    Ok(UserOrder {
        id: row.try_get("order_id")?,
        cost: parse_decimal(row.try_get("cost")?)?,
        payment_id: row.try_get("payment_id")?,
        certificate: map_certificate(row)?,
    })
}

fn map_payment_row(row: &SqliteRow) -> StoreResult<Payment> {
    Ok(Payment {
        id: row.try_get("payment_id")?,
        created: row.try_get("created_at")?,
        user: User {
            id: row.try_get("user_id")?,
            first_name: row.try_get("first_name")?,
            last_name: row.try_get("last_name")?,
        },
        orders: Vec::new(),
    })
}

/// Certificate columns come from a left join, so a NULL id means the
/// certificate was deleted and the reference is absent.
fn map_certificate(row: &SqliteRow) -> StoreResult<Option<GiftCertificate>> {
    let id: Option<i64> = row.try_get("certificate_id")?;
    let Some(id) = id else {
        return Ok(None);
    };
    Ok(Some(GiftCertificate {
        id,
        name: row.try_get("certificate_name")?,
        description: row.try_get("certificate_description")?,
        price: parse_decimal(row.try_get("price")?)?,
        duration: row.try_get("duration")?,
        create_date: row.try_get("create_date")?,
        last_update_date: row.try_get("last_update_date")?,
    }))
}

fn parse_decimal(text: String) -> StoreResult<Decimal> {
    Ok(Decimal::from_str(&text)?)
}
