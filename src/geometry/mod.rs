pub mod bbox;
pub mod edit_distance;
pub mod polygon;
pub mod spline;

pub use bbox::RoadBoundingBox;
pub use edit_distance::iterative_levenshtein;
pub use polygon::RoadPolygon;
pub use spline::catmull_rom;
