pub mod chunk;
pub mod courses;
pub mod index;
pub mod models;
pub mod normalize;
pub mod recommend;
pub mod snapshot;

pub use index::{Answer, QaConfig, QaIndex};
pub use models::{ProgramMap, ProgramRecord};
pub use recommend::{recommend, Recommendation};
