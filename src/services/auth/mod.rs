pub mod principal;
pub mod provider;
pub mod resolver;

pub use principal::{Authority, Principal, UserId, UserRecord};
pub use provider::UserRecordProvider;
pub use resolver::{PrincipalResolver, ResolveError, UserPrincipalResolver};
