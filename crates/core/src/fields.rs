//! Fixed field and sublist keys. These must match the host schema exactly.

pub const LOCATION: &str = "location";
pub const ADJ_LOCATION: &str = "adjlocation";
/// Purchase order ship-to party (the end customer).
pub const SHIP_TO: &str = "shipto";
pub const SHIP_ADDRESS_LIST: &str = "shipaddresslist";
pub const CUSTOMER_CONTRACT: &str = "custbody_tkio_hl_customer_contract";
pub const SHIP_TO_CONTRACT: &str = "custbody_tkio_hl_ship_to_con";

/// Line fields.
pub const LINE_LOCATION: &str = "location";
pub const LINE_CUSTOMER: &str = "customer";
pub const LINE_SHIP_TO: &str = "custcol_tkio_ship_to_line";
pub const LINE_ITEM: &str = "item";

pub const SUBLIST_ITEM: &str = "item";
pub const SUBLIST_INVENTORY: &str = "inventory";

/// Search filter value selecting purchase requisitions.
pub const REQUISITION_SUBTYPE: &str = "PurchReq";
