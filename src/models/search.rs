//! Free-text search types

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::{
    equipment::Equipment, maintenance::MaintenanceSchedule, repair::RepairHistory,
    supplier::Supplier,
};

/// Kind of record a search hit points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SearchKind {
    Equipment,
    Maintenance,
    Repair,
    Supplier,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SearchHit {
    pub id: i32,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: SearchKind,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    pub q: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DetailQuery {
    #[serde(rename = "type")]
    pub kind: Option<SearchKind>,
    pub id: Option<i32>,
}

/// Full record behind a search hit
#[derive(Debug, Serialize, ToSchema)]
#[serde(untagged)]
pub enum SearchDetail {
    Equipment(Equipment),
    Maintenance(MaintenanceSchedule),
    Repair(RepairHistory),
    Supplier(Supplier),
}
