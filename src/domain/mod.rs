//! Domain records held by the document store.

pub mod property;
pub mod recommendation;
pub mod user;

pub use property::{Furnished, ListedBy, ListingType, Property, PropertyFilter, PropertyPatch};
pub use recommendation::{Recommendation, RecommendationStatus};
pub use user::{Role, User, UserPatch, UserProfile, UserSummary};
