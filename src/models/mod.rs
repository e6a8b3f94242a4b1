//! Data models for Maintrack

pub mod enums;
pub mod equipment;
pub mod maintenance;
pub mod repair;
pub mod search;
pub mod supplier;
pub mod user;

// Re-export commonly used types
pub use enums::{EquipmentStatus, MaintenanceStatus, Role};
pub use equipment::Equipment;
pub use maintenance::MaintenanceSchedule;
pub use repair::RepairHistory;
pub use supplier::Supplier;
pub use user::User;
