//! Requisition → purchase order reconciliation (pure decision + apply).

use serde::Serialize;

use copyloc_core::{FieldValue, RecordId, RecordResult, fields};
use copyloc_records::{Record, RequisitionLink};

/// The purchase order fields the reconciliation looks at.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderSnapshot {
    pub location: FieldValue,
    /// Ship-to party (`shipto`).
    pub customer: FieldValue,
    /// Ship-to address (`shipaddresslist`).
    pub ship_to: FieldValue,
}

impl HeaderSnapshot {
    pub fn read<R: Record>(record: &R) -> Self {
        Self {
            location: record.get_value(fields::LOCATION),
            customer: record.get_value(fields::SHIP_TO),
            ship_to: record.get_value(fields::SHIP_ADDRESS_LIST),
        }
    }

    /// At least one of the three fields is empty.
    pub fn has_gap(&self) -> bool {
        self.location.is_empty() || self.customer.is_empty() || self.ship_to.is_empty()
    }
}

/// Values to copy from a requisition onto a purchase order.
///
/// A `None` field is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Backfill {
    pub requisition_id: RecordId,
    pub location: Option<u64>,
    pub customer: Option<u64>,
    pub ship_to: Option<u64>,
}

impl Backfill {
    pub fn is_empty(&self) -> bool {
        self.location.is_none() && self.customer.is_none() && self.ship_to.is_none()
    }
}

/// Decide what to backfill onto purchase order `po_id`.
///
/// Returns `None` when the header is complete or when `po_id` is not among the
/// applied purchase orders of `links`. Otherwise the first link is the donor
/// and only fields that are empty on the header are taken from it.
pub fn plan_backfill(
    po_id: RecordId,
    current: &HeaderSnapshot,
    links: &[RequisitionLink],
) -> Option<Backfill> {
    if !current.has_gap() || !links.iter().any(|l| l.applied_po_id == po_id) {
        return None;
    }
    let donor = links.first()?;
    let when_empty = |field: &FieldValue, value: Option<u64>| value.filter(|_| field.is_empty());

    Some(Backfill {
        requisition_id: donor.requisition_id,
        location: when_empty(&current.location, donor.location),
        customer: when_empty(&current.customer, donor.customer),
        ship_to: when_empty(&current.ship_to, donor.ship_to),
    })
}

/// Distinct requisition ids in result order.
pub(crate) fn distinct_requisitions(links: &[RequisitionLink]) -> Vec<RecordId> {
    let mut ids: Vec<RecordId> = Vec::new();
    for link in links {
        if !ids.contains(&link.requisition_id) {
            ids.push(link.requisition_id);
        }
    }
    ids
}

/// Write `plan` onto the header and onto every `item` line.
///
/// Lines receive location and customer; ship-to stays header-only.
pub fn apply_backfill<R: Record>(record: &mut R, plan: &Backfill) -> RecordResult<()> {
    if let Some(location) = plan.location {
        record.set_value(fields::LOCATION, FieldValue::Id(location));
    }
    if let Some(customer) = plan.customer {
        record.set_value(fields::SHIP_TO, FieldValue::Id(customer));
    }
    if let Some(ship_to) = plan.ship_to {
        record.set_value(fields::SHIP_ADDRESS_LIST, FieldValue::Id(ship_to));
    }

    if plan.location.is_none() && plan.customer.is_none() {
        return Ok(());
    }
    for line in 0..record.line_count(fields::SUBLIST_ITEM) {
        record.select_line(fields::SUBLIST_ITEM, line)?;
        if let Some(location) = plan.location {
            record.set_current_sublist_value(
                fields::SUBLIST_ITEM,
                fields::LINE_LOCATION,
                FieldValue::Id(location),
            )?;
        }
        if let Some(customer) = plan.customer {
            record.set_current_sublist_value(
                fields::SUBLIST_ITEM,
                fields::LINE_CUSTOMER,
                FieldValue::Id(customer),
            )?;
        }
        record.commit_line(fields::SUBLIST_ITEM)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use copyloc_core::RecordType;
    use copyloc_records::{Line, TransactionRecord};

    const PO: RecordId = RecordId::new(100);

    fn link(req: u64, po: RecordId) -> RequisitionLink {
        RequisitionLink {
            document_number: format!("REQ{req}"),
            requisition_id: RecordId::new(req),
            applied_po_id: po,
            customer: Some(10),
            location: Some(5),
            ship_to: Some(20),
        }
    }

    fn empty_header() -> HeaderSnapshot {
        HeaderSnapshot::default()
    }

    #[test]
    fn complete_header_needs_no_backfill() {
        let current = HeaderSnapshot {
            location: FieldValue::Id(1),
            customer: FieldValue::Id(2),
            ship_to: FieldValue::Id(3),
        };
        assert_eq!(plan_backfill(PO, &current, &[link(1, PO)]), None);
    }

    #[test]
    fn unlinked_purchase_order_needs_no_backfill() {
        assert_eq!(plan_backfill(PO, &empty_header(), &[]), None);
        assert_eq!(
            plan_backfill(PO, &empty_header(), &[link(1, RecordId::new(200))]),
            None
        );
    }

    #[test]
    fn empty_header_takes_every_donor_value() {
        let plan = plan_backfill(PO, &empty_header(), &[link(1, PO)]).unwrap();
        assert_eq!(
            plan,
            Backfill {
                requisition_id: RecordId::new(1),
                location: Some(5),
                customer: Some(10),
                ship_to: Some(20),
            }
        );
    }

    #[test]
    fn only_empty_fields_are_planned() {
        let current = HeaderSnapshot {
            location: FieldValue::Id(8),
            customer: FieldValue::Empty,
            ship_to: FieldValue::from(""),
        };
        let plan = plan_backfill(PO, &current, &[link(1, PO)]).unwrap();
        assert_eq!(plan.location, None);
        assert_eq!(plan.customer, Some(10));
        assert_eq!(plan.ship_to, Some(20));
    }

    #[test]
    fn first_link_is_the_donor() {
        let mut second = link(2, PO);
        second.location = Some(99);
        let plan = plan_backfill(PO, &empty_header(), &[link(1, PO), second]).unwrap();
        assert_eq!(plan.requisition_id, RecordId::new(1));
        assert_eq!(plan.location, Some(5));
    }

    #[test]
    fn unresolved_donor_cells_leave_fields_alone() {
        let mut donor = link(1, PO);
        donor.customer = None;
        donor.ship_to = None;
        let plan = plan_backfill(PO, &empty_header(), &[donor]).unwrap();
        assert_eq!(plan.location, Some(5));
        assert_eq!(plan.customer, None);

        donor = link(1, PO);
        donor.location = None;
        donor.customer = None;
        donor.ship_to = None;
        assert!(plan_backfill(PO, &empty_header(), &[donor]).unwrap().is_empty());
    }

    #[test]
    fn distinct_requisitions_keeps_result_order() {
        let links = [link(3, PO), link(1, PO), link(3, PO)];
        assert_eq!(
            distinct_requisitions(&links),
            vec![RecordId::new(3), RecordId::new(1)]
        );
    }

    #[test]
    fn apply_writes_header_and_lines_but_not_line_ship_to() {
        let mut po = TransactionRecord::new(RecordType::PurchaseOrder)
            .with_id(PO)
            .with_line(fields::SUBLIST_ITEM, Line::new().with(fields::LINE_ITEM, 300u64))
            .with_line(fields::SUBLIST_ITEM, Line::new().with(fields::LINE_ITEM, 301u64));
        let plan = plan_backfill(PO, &empty_header(), &[link(1, PO)]).unwrap();

        apply_backfill(&mut po, &plan).unwrap();

        assert_eq!(po.get_value(fields::LOCATION), FieldValue::Id(5));
        assert_eq!(po.get_value(fields::SHIP_TO), FieldValue::Id(10));
        assert_eq!(po.get_value(fields::SHIP_ADDRESS_LIST), FieldValue::Id(20));
        for line in po.lines(fields::SUBLIST_ITEM) {
            assert_eq!(line.get(fields::LINE_LOCATION), FieldValue::Id(5));
            assert_eq!(line.get(fields::LINE_CUSTOMER), FieldValue::Id(10));
            assert!(line.get(fields::LINE_SHIP_TO).is_empty());
            assert!(!line.get(fields::LINE_ITEM).is_empty());
        }
    }
}
