pub mod account;
pub mod role;
pub mod tree;

pub use account::{AccountEditView, AccountView};
pub use role::RoleView;
pub use tree::{PrivilegeTree, TreeNode};
