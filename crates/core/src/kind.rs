//! Record-type and user-event tags consumed from the host.

use serde::{Deserialize, Serialize};

use crate::fields;

/// Transaction record type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RecordType {
    InventoryAdjustment,
    PurchaseOrder,
    PurchaseRequisition,
    /// Any other transaction type, kept under its host tag.
    Other(String),
}

impl RecordType {
    /// Host tag (e.g. `"purchaseorder"`).
    pub fn as_str(&self) -> &str {
        match self {
            RecordType::InventoryAdjustment => "inventoryadjustment",
            RecordType::PurchaseOrder => "purchaseorder",
            RecordType::PurchaseRequisition => "purchaserequisition",
            RecordType::Other(tag) => tag,
        }
    }

    /// Body field holding the header location.
    pub fn location_field(&self) -> &'static str {
        match self {
            RecordType::InventoryAdjustment => fields::ADJ_LOCATION,
            _ => fields::LOCATION,
        }
    }

    /// Sublist whose lines mirror the header location.
    pub fn line_sublist(&self) -> &'static str {
        match self {
            RecordType::InventoryAdjustment => fields::SUBLIST_INVENTORY,
            _ => fields::SUBLIST_ITEM,
        }
    }

    /// Whether lines carry their own location that must follow the header
    /// while the user edits them.
    pub fn requires_line_location(&self) -> bool {
        matches!(self, RecordType::InventoryAdjustment)
    }
}

impl core::fmt::Display for RecordType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for RecordType {
    fn from(value: &str) -> Self {
        match value {
            "inventoryadjustment" => RecordType::InventoryAdjustment,
            "purchaseorder" => RecordType::PurchaseOrder,
            "purchaserequisition" => RecordType::PurchaseRequisition,
            other => RecordType::Other(other.to_string()),
        }
    }
}

impl From<String> for RecordType {
    fn from(value: String) -> Self {
        RecordType::from(value.as_str())
    }
}

impl From<RecordType> for String {
    fn from(value: RecordType) -> Self {
        value.as_str().to_string()
    }
}

/// Lifecycle event that triggered a submit hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserEventType {
    Create,
    Edit,
    Copy,
    Delete,
    View,
    XEdit,
}

impl UserEventType {
    /// Submit hooks only act on full creates and edits.
    pub fn triggers_submit_hooks(self) -> bool {
        matches!(self, UserEventType::Create | UserEventType::Edit)
    }
}
