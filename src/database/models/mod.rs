pub mod account;
pub mod log;
pub mod privilege;
pub mod role;
pub mod role_privilege;

pub use account::Account;
pub use log::Log;
pub use privilege::{Privilege, PrivilegeKey};
pub use role::Role;
pub use role_privilege::RolePrivilege;

use crate::database::entity::{Entity, TableDef};

/// Every persisted table, parents before children
pub const TABLES: &[&TableDef] = &[
    Privilege::TABLE,
    Role::TABLE,
    RolePrivilege::TABLE,
    Account::TABLE,
    Log::TABLE,
];
