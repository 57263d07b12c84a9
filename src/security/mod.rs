pub mod authorization;
pub mod catalogue;
pub mod provider;

pub use authorization::Authorization;
pub use catalogue::{routes, ActionCatalogue, RouteAction};
pub use provider::{AuthorizationProvider, PrivilegeIndex, RoleProvider};
