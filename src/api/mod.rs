// HTTP shell around the scheduling core

pub mod catalog;
pub mod cycle;
pub mod error;
pub mod health;
pub mod plans;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use state::AppState;
