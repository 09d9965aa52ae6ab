pub mod connection;
pub mod ids;
pub mod model;
pub mod step;

pub use connection::*;
pub use ids::*;
pub use model::*;
pub use step::*;
