use serde::{Deserialize, Serialize};
use statesync::Identified;

/// A recorded payment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: i64,
    pub amount: i64,
    #[serde(default)]
    pub payment_number: Option<String>,
    #[serde(default)]
    pub payment_date: Option<String>,
    #[serde(default)]
    pub customer_id: Option<i64>,
    #[serde(default)]
    pub invoice_id: Option<i64>,
    #[serde(default)]
    pub payment_method_id: Option<i64>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Payment {
    /// A payment with only the required fields set.
    pub fn new(id: i64, amount: i64) -> Self {
        Self {
            id,
            amount,
            payment_number: None,
            payment_date: None,
            customer_id: None,
            invoice_id: None,
            payment_method_id: None,
            notes: None,
        }
    }
}

impl Identified for Payment {
    type Id = i64;

    fn id(&self) -> &i64 {
        &self.id
    }
}

/// Fields sent when creating or updating a payment. The server assigns ids.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaymentParams {
    pub amount: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl PaymentParams {
    pub fn with_amount(amount: i64) -> Self {
        Self {
            amount,
            ..Self::default()
        }
    }
}

/// An invoice a payment can still be applied to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnpaidInvoice {
    pub id: i64,
    pub invoice_number: String,
    pub due_amount: i64,
    #[serde(default)]
    pub customer_id: Option<i64>,
}

impl Identified for UnpaidInvoice {
    type Id = i64;

    fn id(&self) -> &i64 {
        &self.id
    }
}
