mod categories;
mod questions;
mod quiz;

pub use categories::category_router;
pub(crate) use categories::category_map;
pub use questions::questions_router;
pub use quiz::quiz_router;
