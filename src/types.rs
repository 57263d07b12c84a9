//! Shared types used across the codebase

use serde::{Deserialize, Serialize};

/// Write operations a service commits in one unit of work
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operation {
    Create,
    Update,
    Delete,
}
