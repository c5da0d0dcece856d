//! Read access to completed payments.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::payments::types::PaymentRecord;

/// Failure to read the payment feed.
///
/// This is the only condition that aborts an active-session query.
#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("payment source unavailable: {0}")]
    Unavailable(String),
}

pub type PaymentResult<T> = Result<T, PaymentError>;

/// A feed of completed payments.
///
/// Implementations return only payments whose status is `completed`, sorted
/// by creation time, newest first.
#[async_trait]
pub trait PaymentSource: Send + Sync {
    async fn completed_payments(&self) -> PaymentResult<Vec<PaymentRecord>>;
}

#[async_trait]
impl<T: PaymentSource + ?Sized> PaymentSource for Arc<T> {
    async fn completed_payments(&self) -> PaymentResult<Vec<PaymentRecord>> {
        (**self).completed_payments().await
    }
}
