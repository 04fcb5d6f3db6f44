pub mod config;
pub mod error;
pub mod jwk;
pub mod keygen;
