//! Voice agent coordination: the role-selection agent, the dashboard
//! command controller, and the coordinator that owns the shared capture
//! slot between them.

pub mod coordinator;
pub mod messages;
