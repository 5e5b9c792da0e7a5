pub mod results;
pub mod viewport;

pub use results::{Marker, ResultSet};
pub use viewport::Viewport;
