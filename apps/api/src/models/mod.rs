pub mod domain;
pub mod session;
