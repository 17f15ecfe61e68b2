use chrono::NaiveDateTime;
use rust_decimal::Decimal;

use crate::entities::{GiftCertificate, Payment, User, UserOrder};

/// One flat row of the payment ⋈ users ⋈ orders ⟕ certificates join.
///
/// `certificate` is `None` when the left join produced no certificate row,
/// i.e. the certificate was deleted after the order was placed.
#[derive(Debug, Clone)]
pub struct PaymentOrderRow {
    pub payment_id: i64,
    pub created: NaiveDateTime,
    pub user: User,
    pub order_id: i64,
    pub cost: Decimal,
    pub certificate: Option<GiftCertificate>,
}

/// Groups the joined rows of a single payment into the owning aggregate.
///
/// Row order is preserved as order-insertion order. Returns `None` for empty
/// input; otherwise the full graph is built — never a partial aggregate.
pub fn build_payment(rows: Vec<PaymentOrderRow>) -> Option<Payment> {
    let mut rows = rows.into_iter();
    let first = rows.next()?;

    let payment_id = first.payment_id;
    let mut payment = Payment {
        id: payment_id,
        created: first.created,
        user: first.user.clone(),
        orders: Vec::new(),
    };
    payment.orders.push(into_order(first));

    for row in rows {
        debug_assert_eq!(row.payment_id, payment_id, "rows must share one root payment");
        payment.orders.push(into_order(row));
    }
    Some(payment)
}

fn into_order(row: PaymentOrderRow) -> UserOrder {
    UserOrder {
        id: row.order_id,
        cost: row.cost,
        payment_id: row.payment_id,
        certificate: row.certificate,
    }
}
