//! Billing domain: premium checkout delegation.

pub mod actions;
pub mod checkout;

pub use checkout::HostedCheckoutClient;
