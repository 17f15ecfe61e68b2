use chrono::NaiveDateTime;
use rust_decimal::Decimal;

/// Buyer of gift certificates. Reference data owned by the user module;
/// this crate only ever reads it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
}

impl User {
    pub fn new(id: i64, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            id,
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }
}

/// A purchasable gift certificate. Certificates may be deleted after orders
/// were placed against them; orders keep an absent reference in that case.
#[derive(Debug, Clone, PartialEq)]
pub struct GiftCertificate {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub duration: i32,
    pub create_date: NaiveDateTime,
    pub last_update_date: NaiveDateTime,
}

/// A single purchase line inside a payment.
///
/// The owning payment is referenced by id only; the `Payment` aggregate owns
/// its order list exclusively. `certificate` is `None` when the certificate
/// was deleted after the order was placed.
#[derive(Debug, Clone, PartialEq)]
pub struct UserOrder {
    pub id: i64,
    pub cost: Decimal,
    pub payment_id: i64,
    pub certificate: Option<GiftCertificate>,
}

impl UserOrder {
    /// A not-yet-persisted order. Ids are assigned by the store on create;
    /// anything set here is overwritten.
    pub fn new(cost: Decimal, certificate: Option<GiftCertificate>) -> Self {
        Self {
            id: 0,
            cost,
            payment_id: 0,
            certificate,
        }
    }
}

/// The payment aggregate: one payment row plus its ordered list of orders.
/// Insertion order of `orders` is the persisted order.
#[derive(Debug, Clone, PartialEq)]
pub struct Payment {
    pub id: i64,
    pub created: NaiveDateTime,
    pub user: User,
    pub orders: Vec<UserOrder>,
}

impl Payment {
    /// A not-yet-persisted payment. The store assigns `id` and every order id
    /// during create; client-supplied ids are ignored.
    pub fn new(user: User, created: NaiveDateTime, orders: Vec<UserOrder>) -> Self {
        Self {
            id: 0,
            created,
            user,
            orders,
        }
    }
}
