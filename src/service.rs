use crate::dao::PaymentDao;
use crate::entities::{Payment, UserOrder};
use crate::error::{ServiceError, ServiceResult};
use crate::unit_of_work::{SqliteUnitOfWork, SqliteUnitOfWorkSession, UnitOfWork, UnitOfWorkSession};

/// Largest page a caller may request in one windowed read. The transport
/// layer defaults to far smaller pages; this bound keeps an arbitrary
/// `size` query parameter from turning into an unbounded scan.
pub const MAX_PAGE_SIZE: i64 = 100;

/// One page of a windowed read plus the total row count, so the transport
/// layer can compute page metadata without re-fetching rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
}

/// Orchestrates storage access for the payment use cases.
///
/// Each call begins one unit-of-work session, runs its storage calls on
/// that session, and commits. Page numbers are one-based here and
/// normalized to the zero-based offsets the storage layer expects.
pub struct PaymentService {
    uow: SqliteUnitOfWork,
}

impl PaymentService {
    /// Create a service on top of an explicitly constructed unit of work.
    pub fn new(uow: SqliteUnitOfWork) -> Self {
        Self { uow }
    }

    /// Persists a payment and its orders as one atomic unit, writing the
    /// generated ids back into the aggregate. An empty order set is
    /// rejected before any store access.
    pub async fn create_payment(&self, payment: &mut Payment) -> ServiceResult<()> {
        if payment.orders.is_empty() {
            return Err(ServiceError::Validation(
                "a payment must contain at least one order".to_string(),
            ));
        }
        require_positive(payment.user.id, "user id")?;

        let session = self.uow.begin().await?;
        let dao = PaymentDao::new(session.executor().clone());
        match dao.create_payment(payment).await {
            Ok(()) => {
                session.commit().await?;
                tracing::debug!(
                    payment_id = payment.id,
                    orders = payment.orders.len(),
                    "payment created"
                );
                Ok(())
            }
            Err(err) => {
                abort(session).await;
                Err(err.into())
            }
        }
    }

    /// Finds one payment with its orders and their certificates attached.
    pub async fn find_payment(&self, payment_id: i64) -> ServiceResult<Payment> {
        require_positive(payment_id, "payment id")?;

        let session = self.uow.begin().await?;
        let dao = PaymentDao::new(session.executor().clone());
        match dao.read_payment(payment_id).await {
            Ok(Some(payment)) => {
                session.commit().await?;
                Ok(payment)
            }
            Ok(None) => {
                session.commit().await?;
                Err(ServiceError::ResourceNotFound {
                    resource: "payment",
                    id: payment_id,
                })
            }
            Err(err) => {
                abort(session).await;
                Err(err.into())
            }
        }
    }

    /// Finds one page of a payment's orders together with the total order
    /// count for that payment.
    pub async fn find_user_orders_by_payment_id(
        &self,
        payment_id: i64,
        page_number: i64,
        page_size: i64,
    ) -> ServiceResult<Page<UserOrder>> {
        require_positive(payment_id, "payment id")?;
        let (offset, limit) = window(page_number, page_size)?;

        let session = self.uow.begin().await?;
        let dao = PaymentDao::new(session.executor().clone());
        let result = read_order_page(&dao, payment_id, offset, limit).await;
        finish(session, result).await
    }

    /// Finds one page of a user's payments (without orders attached)
    /// together with the user's total payment count.
    pub async fn find_payments_by_user_id(
        &self,
        user_id: i64,
        page_number: i64,
        page_size: i64,
    ) -> ServiceResult<Page<Payment>> {
        require_positive(user_id, "user id")?;
        let (offset, limit) = window(page_number, page_size)?;

        let session = self.uow.begin().await?;
        let dao = PaymentDao::new(session.executor().clone());
        let result = read_payment_page(&dao, user_id, offset, limit).await;
        finish(session, result).await
    }
}

async fn read_order_page(
    dao: &PaymentDao,
    payment_id: i64,
    offset: i64,
    limit: i64,
) -> ServiceResult<Page<UserOrder>> {
    let items = dao
        .read_user_orders_by_payment_id(payment_id, offset, limit)
        .await?;
    let total = dao.count_payment_orders(payment_id).await?;
    Ok(Page { items, total })
}

async fn read_payment_page(
    dao: &PaymentDao,
    user_id: i64,
    offset: i64,
    limit: i64,
) -> ServiceResult<Page<Payment>> {
    let items = dao.read_payments_by_user_id(user_id, offset, limit).await?;
    let total = dao.count_user_payments(user_id).await?;
    Ok(Page { items, total })
}

/// Commits on success, rolls back on failure, and hands the result through.
async fn finish<T>(
    session: SqliteUnitOfWorkSession,
    result: ServiceResult<T>,
) -> ServiceResult<T> {
    match result {
        Ok(value) => {
            session.commit().await?;
            Ok(value)
        }
        Err(err) => {
            abort(session).await;
            Err(err)
        }
    }
}

/// Best-effort rollback; the original failure is the one callers see.
async fn abort(session: SqliteUnitOfWorkSession) {
    if let Err(rollback_err) = session.rollback().await {
        tracing::warn!(error = %rollback_err, "rollback after failed operation also failed");
    }
}

fn require_positive(value: i64, what: &str) -> ServiceResult<()> {
    if value < 1 {
        return Err(ServiceError::Validation(format!(
            "{what} must be positive, got {value}"
        )));
    }
    Ok(())
}

/// Translates a one-based page request into a zero-based offset/limit pair.
fn window(page_number: i64, page_size: i64) -> ServiceResult<(i64, i64)> {
    require_positive(page_number, "page number")?;
    require_positive(page_size, "page size")?;
    if page_size > MAX_PAGE_SIZE {
        return Err(ServiceError::Validation(format!(
            "page size must not exceed {MAX_PAGE_SIZE}, got {page_size}"
        )));
    }
    let offset = (page_number - 1).checked_mul(page_size).ok_or_else(|| {
        ServiceError::Validation(format!(
            "page window out of range: page {page_number} of size {page_size}"
        ))
    })?;
    Ok((offset, page_size))
}
