use tracing::{info, warn};

use crate::events::LoanEvent;

/// Trait for loan event observation
pub trait LoanObserver {
    /// Called after a borrow or return has been applied
    fn on_loan_event(&self, event: &LoanEvent);
}

/// Logs every loan event
#[derive(Debug)]
pub struct LoanLogger;

impl LoanObserver for LoanLogger {
    fn on_loan_event(&self, event: &LoanEvent) {
        match event {
            LoanEvent::Borrowed { member, item, on } => {
                info!(%member, %item, %on, "item borrowed");
            }
            LoanEvent::Returned { member, item, on, fine } => {
                info!(%member, %item, %on, fine, "item returned");
            }
        }
    }
}

/// Raises a notice when a returned item carried an overdue fine
#[derive(Debug)]
pub struct OverdueNotice;

impl LoanObserver for OverdueNotice {
    fn on_loan_event(&self, event: &LoanEvent) {
        match event {
            LoanEvent::Returned { member, item, fine, .. } if *fine > 0 => {
                warn!(%member, %item, fine, "overdue return, fine due");
            }
            _ => {}
        }
    }
}
