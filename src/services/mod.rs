pub mod accounts;
pub mod audit;
pub mod error;
pub mod generic;
pub mod privilege_tree;
pub mod privileges;
pub mod roles;
pub mod validators;

pub use accounts::AccountService;
pub use audit::AuditLog;
pub use error::ServiceError;
pub use generic::{GenericService, NoSteps, PersistSteps};
pub use privilege_tree::build_privilege_tree;
pub use privileges::PrivilegeService;
pub use roles::RoleService;
