// Domain models shared by the services and the HTTP layer

pub mod cycle;
pub mod phase;
pub mod plan;
pub mod race;
pub mod workout;

pub use cycle::*;
pub use phase::*;
pub use plan::*;
pub use race::*;
pub use workout::*;
