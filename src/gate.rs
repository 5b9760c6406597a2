//! Start gate: preconditions a run start must satisfy
//!
//! The session consults the gate before honoring a start request. The
//! payment itself (a token transfer) happens outside the game; the host
//! reports its outcome here.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

/// Fixed entry fee in whole tokens
pub const GAME_FEE: u32 = 10;

pub trait StartGate {
    /// May a run start right now?
    fn permits_start(&self) -> bool;
    /// A run has started; one-shot gates close again
    fn on_run_started(&mut self) {}
}

/// The host keeps one handle to report payment progress, the session the other
impl<T: StartGate> StartGate for Rc<RefCell<T>> {
    fn permits_start(&self) -> bool {
        self.borrow().permits_start()
    }

    fn on_run_started(&mut self) {
        self.borrow_mut().on_run_started();
    }
}

/// Free play
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenGate;

impl StartGate for OpenGate {
    fn permits_start(&self) -> bool {
        true
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
    Unpaid,
    /// Transfer submitted, waiting for the receipt
    Pending,
    Paid,
    Failed(String),
}

/// Pay-per-run gate: each confirmed payment admits exactly one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentGate {
    pub fee: u32,
    pub status: PaymentStatus,
}

impl Default for PaymentGate {
    fn default() -> Self {
        Self::new(GAME_FEE)
    }
}

impl PaymentGate {
    pub fn new(fee: u32) -> Self {
        Self {
            fee,
            status: PaymentStatus::Unpaid,
        }
    }

    /// Host submitted the transfer. Ignored while one is in flight or paid.
    pub fn begin_payment(&mut self) -> bool {
        match self.status {
            PaymentStatus::Unpaid | PaymentStatus::Failed(_) => {
                self.status = PaymentStatus::Pending;
                true
            }
            PaymentStatus::Pending | PaymentStatus::Paid => false,
        }
    }

    pub fn confirm(&mut self) {
        if self.status == PaymentStatus::Pending {
            log::info!("Payment of {} tokens confirmed", self.fee);
            self.status = PaymentStatus::Paid;
        }
    }

    pub fn fail(&mut self, reason: impl Into<String>) {
        if self.status == PaymentStatus::Pending {
            let reason = reason.into();
            log::warn!("Payment failed: {}", reason);
            self.status = PaymentStatus::Failed(reason);
        }
    }
}

impl StartGate for PaymentGate {
    fn permits_start(&self) -> bool {
        self.status == PaymentStatus::Paid
    }

    fn on_run_started(&mut self) {
        self.status = PaymentStatus::Unpaid;
    }
}
