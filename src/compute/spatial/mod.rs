pub mod index;
pub use index::{Candidates, PointIndex};

pub mod prepared;
pub use prepared::PreparedPolygon;
