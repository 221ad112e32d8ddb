pub mod account;
pub mod doctor;
pub mod patient;

pub use account::Account;
pub use doctor::Doctor;
pub use patient::Patient;
