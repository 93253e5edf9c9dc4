//! SurrealDB repository implementations.

mod group;
mod inspection;
mod rating;
mod session;
mod user;

pub use group::SurrealGroupRepository;
pub use inspection::SurrealInspectionRepository;
pub use rating::SurrealRatingRepository;
pub use session::SurrealSessionRepository;
pub use user::SurrealUserRepository;
