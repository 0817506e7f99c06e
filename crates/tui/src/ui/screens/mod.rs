pub mod accounts;
pub mod feedback;
pub mod history;
pub mod loan;
pub mod login;
pub mod profile;
pub mod transfer;
