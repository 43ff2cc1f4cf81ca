//! Client-side hooks: run while the user edits lines.

use anyhow::Context;

use copyloc_core::{FieldValue, RecordType, fields};
use copyloc_records::{Record, RecordStore, SearchEngine};

use crate::barrier::guarded;
use crate::propagator::LocationPropagator;

impl<S, E> LocationPropagator<S, E>
where
    S: RecordStore,
    E: SearchEngine,
{
    /// The header location changed: copy it onto the line being edited.
    ///
    /// Only inventory adjustments carry a per-line location that must follow
    /// the header; an empty `new_location` is ignored.
    pub fn on_header_location_set<R: Record>(&self, record: &mut R, new_location: FieldValue) {
        guarded("on_header_location_set", (), || {
            set_current_line_location(record, new_location)
        })
    }

    /// Host field-changed event.
    ///
    /// On an inventory adjustment, a change of `adjlocation` or of the item on
    /// an `inventory` line applies the header location to the current line.
    pub fn on_field_changed<R: Record>(&self, record: &mut R, sublist: Option<&str>, field: &str) {
        guarded("on_field_changed", (), || {
            if *record.record_type() != RecordType::InventoryAdjustment {
                return Ok(());
            }
            let header_change = sublist.is_none() && field == fields::ADJ_LOCATION;
            let item_picked =
                sublist == Some(fields::SUBLIST_INVENTORY) && field == fields::LINE_ITEM;
            if !header_change && !item_picked {
                return Ok(());
            }
            let location = record.get_value(fields::ADJ_LOCATION);
            tracing::debug!(%location, field, "applying adjustment location to current line");
            set_current_line_location(record, location)
        })
    }

    /// Line validation before commit. Always returns `true`.
    ///
    /// On the `item` sublist the header location is copied unconditionally,
    /// clearing stale line values when the header is empty. Requisitions also
    /// copy the contract customer and ship-to.
    pub fn on_line_commit<R: Record>(&self, record: &mut R, sublist: &str) -> bool {
        guarded("on_line_commit", true, || {
            if sublist != fields::SUBLIST_ITEM {
                return Ok(true);
            }
            let location = record.get_value(fields::LOCATION);
            let location_text = record.get_text(fields::LOCATION);
            tracing::debug!(%location, %location_text, "copying header location to line");
            record
                .set_current_sublist_value(sublist, fields::LINE_LOCATION, location)
                .context("setting line location")?;

            if *record.record_type() == RecordType::PurchaseRequisition {
                let customer = record.get_value(fields::CUSTOMER_CONTRACT);
                let customer_text = record.get_text(fields::CUSTOMER_CONTRACT);
                let ship_to = record.get_value(fields::SHIP_TO_CONTRACT);
                tracing::debug!(%customer, %customer_text, %ship_to, "copying contract to line");
                record
                    .set_current_sublist_value(sublist, fields::LINE_CUSTOMER, customer)
                    .context("setting line customer")?;
                record
                    .set_current_sublist_value(sublist, fields::LINE_SHIP_TO, ship_to)
                    .context("setting line ship-to")?;
            }
            Ok(true)
        })
    }

    /// A new line was started: prefill its location from `adjlocation`.
    pub fn on_line_init<R: Record>(&self, record: &mut R, sublist: &str) {
        guarded("on_line_init", (), || {
            if *record.record_type() != RecordType::InventoryAdjustment
                || sublist != fields::SUBLIST_INVENTORY
            {
                return Ok(());
            }
            let location = record.get_value(fields::ADJ_LOCATION);
            if location.is_empty() {
                return Ok(());
            }
            record
                .set_current_sublist_value(sublist, fields::LINE_LOCATION, location)
                .context("prefilling line location")?;
            Ok(())
        })
    }
}

fn set_current_line_location<R: Record>(
    record: &mut R,
    location: FieldValue,
) -> anyhow::Result<()> {
    let record_type = record.record_type().clone();
    if !record_type.requires_line_location() || location.is_empty() {
        return Ok(());
    }
    record
        .set_current_sublist_value(record_type.line_sublist(), fields::LINE_LOCATION, location)
        .with_context(|| format!("setting current {record_type} line location"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use copyloc_core::RecordId;
    use copyloc_records::{InMemoryRecordStore, InMemorySearchEngine, Line, TransactionRecord};
    use proptest::prelude::*;

    use super::*;

    type Propagator = LocationPropagator<InMemoryRecordStore, InMemorySearchEngine>;

    fn propagator() -> Propagator {
        LocationPropagator::new(InMemoryRecordStore::new(), InMemorySearchEngine::new())
    }

    fn adjustment(adj_location: impl Into<FieldValue>) -> TransactionRecord {
        TransactionRecord::new(RecordType::InventoryAdjustment)
            .with_value(fields::ADJ_LOCATION, adj_location)
    }

    fn current(record: &TransactionRecord, sublist: &str, field: &str) -> FieldValue {
        record.get_current_sublist_value(sublist, field).unwrap()
    }

    #[test]
    fn header_location_reaches_current_adjustment_line() {
        let mut adj = adjustment(5u64);
        adj.select_new_line(fields::SUBLIST_INVENTORY).unwrap();

        propagator().on_header_location_set(&mut adj, FieldValue::Id(9));
        assert_eq!(current(&adj, fields::SUBLIST_INVENTORY, fields::LINE_LOCATION), FieldValue::Id(9));
    }

    #[test]
    fn empty_header_location_is_ignored() {
        let mut adj = adjustment(5u64);
        adj.select_new_line(fields::SUBLIST_INVENTORY).unwrap();
        adj.set_current_sublist_value(fields::SUBLIST_INVENTORY, fields::LINE_LOCATION, 3u64.into())
            .unwrap();

        propagator().on_header_location_set(&mut adj, FieldValue::Empty);
        assert_eq!(current(&adj, fields::SUBLIST_INVENTORY, fields::LINE_LOCATION), FieldValue::Id(3));
    }

    #[test]
    fn header_location_on_other_types_is_ignored() {
        let mut po = TransactionRecord::new(RecordType::PurchaseOrder);
        po.select_new_line(fields::SUBLIST_ITEM).unwrap();
        propagator().on_header_location_set(&mut po, FieldValue::Id(9));
        assert!(current(&po, fields::SUBLIST_ITEM, fields::LINE_LOCATION).is_empty());
    }

    #[test]
    fn missing_current_line_is_swallowed() {
        let mut adj = adjustment(5u64);
        propagator().on_header_location_set(&mut adj, FieldValue::Id(9));
        assert_eq!(adj.line_count(fields::SUBLIST_INVENTORY), 0);
    }

    #[test]
    fn picking_an_item_applies_adjustment_location() {
        let mut adj = adjustment(5u64);
        adj.select_new_line(fields::SUBLIST_INVENTORY).unwrap();

        let p = propagator();
        p.on_field_changed(&mut adj, Some(fields::SUBLIST_INVENTORY), fields::LINE_LOCATION);
        assert!(current(&adj, fields::SUBLIST_INVENTORY, fields::LINE_LOCATION).is_empty());

        p.on_field_changed(&mut adj, Some(fields::SUBLIST_INVENTORY), fields::LINE_ITEM);
        assert_eq!(current(&adj, fields::SUBLIST_INVENTORY, fields::LINE_LOCATION), FieldValue::Id(5));
    }

    #[test]
    fn changing_adjlocation_applies_new_value() {
        let mut adj = adjustment(5u64);
        adj.select_new_line(fields::SUBLIST_INVENTORY).unwrap();
        adj.set_value(fields::ADJ_LOCATION, FieldValue::Id(6));

        propagator().on_field_changed(&mut adj, None, fields::ADJ_LOCATION);
        assert_eq!(current(&adj, fields::SUBLIST_INVENTORY, fields::LINE_LOCATION), FieldValue::Id(6));
    }

    #[test]
    fn line_commit_copies_location_even_when_empty() {
        let mut po = TransactionRecord::new(RecordType::PurchaseOrder)
            .with_line(fields::SUBLIST_ITEM, Line::new().with(fields::LINE_LOCATION, 3u64));
        po.select_line(fields::SUBLIST_ITEM, 0).unwrap();

        assert!(propagator().on_line_commit(&mut po, fields::SUBLIST_ITEM));
        assert!(current(&po, fields::SUBLIST_ITEM, fields::LINE_LOCATION).is_empty());
    }

    #[test]
    fn requisition_line_commit_copies_contract_fields() {
        let mut req = TransactionRecord::new(RecordType::PurchaseRequisition)
            .with_text(fields::LOCATION, 5u64, "Warehouse A")
            .with_text(fields::CUSTOMER_CONTRACT, 10u64, "ACME")
            .with_value(fields::SHIP_TO_CONTRACT, 20u64);
        req.select_new_line(fields::SUBLIST_ITEM).unwrap();

        assert!(propagator().on_line_commit(&mut req, fields::SUBLIST_ITEM));
        assert_eq!(current(&req, fields::SUBLIST_ITEM, fields::LINE_LOCATION), FieldValue::Id(5));
        assert_eq!(current(&req, fields::SUBLIST_ITEM, fields::LINE_CUSTOMER), FieldValue::Id(10));
        assert_eq!(current(&req, fields::SUBLIST_ITEM, fields::LINE_SHIP_TO), FieldValue::Id(20));
    }

    #[test]
    fn line_commit_ignores_other_sublists() {
        let mut po = TransactionRecord::new(RecordType::PurchaseOrder)
            .with_value(fields::LOCATION, 5u64)
            .with_sublist("expense");
        po.select_new_line("expense").unwrap();

        assert!(propagator().on_line_commit(&mut po, "expense"));
        assert!(current(&po, "expense", fields::LINE_LOCATION).is_empty());
    }

    #[test]
    fn line_commit_fails_open() {
        let mut po = TransactionRecord::new(RecordType::PurchaseOrder)
            .with_id(RecordId::new(1))
            .with_value(fields::LOCATION, 5u64);
        // No line selected: the write fails, the line is still accepted.
        assert!(propagator().on_line_commit(&mut po, fields::SUBLIST_ITEM));
    }

    #[test]
    fn line_init_prefills_only_adjustment_inventory_lines() {
        let p = propagator();

        let mut adj = adjustment(5u64);
        adj.select_new_line(fields::SUBLIST_INVENTORY).unwrap();
        p.on_line_init(&mut adj, fields::SUBLIST_INVENTORY);
        assert_eq!(current(&adj, fields::SUBLIST_INVENTORY, fields::LINE_LOCATION), FieldValue::Id(5));

        let mut unset = adjustment(FieldValue::Empty);
        unset.select_new_line(fields::SUBLIST_INVENTORY).unwrap();
        p.on_line_init(&mut unset, fields::SUBLIST_INVENTORY);
        assert!(current(&unset, fields::SUBLIST_INVENTORY, fields::LINE_LOCATION).is_empty());

        let mut po = TransactionRecord::new(RecordType::PurchaseOrder).with_value(fields::LOCATION, 5u64);
        po.select_new_line(fields::SUBLIST_ITEM).unwrap();
        p.on_line_init(&mut po, fields::SUBLIST_ITEM);
        assert!(current(&po, fields::SUBLIST_ITEM, fields::LINE_LOCATION).is_empty());
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 128,
            ..ProptestConfig::default()
        })]

        /// Property: every line added to an adjustment with `adjlocation` set
        /// carries that location once committed.
        #[test]
        fn added_adjustment_lines_follow_adjlocation(
            location in 1u64..10_000,
            items in prop::collection::vec(1u64..500, 0..12)
        ) {
            let p = propagator();
            let mut adj = adjustment(location);

            for item in &items {
                adj.select_new_line(fields::SUBLIST_INVENTORY).unwrap();
                p.on_line_init(&mut adj, fields::SUBLIST_INVENTORY);
                adj.set_current_sublist_value(fields::SUBLIST_INVENTORY, fields::LINE_ITEM, FieldValue::Id(*item)).unwrap();
                p.on_field_changed(&mut adj, Some(fields::SUBLIST_INVENTORY), fields::LINE_ITEM);
                adj.commit_line(fields::SUBLIST_INVENTORY).unwrap();
            }

            prop_assert_eq!(adj.line_count(fields::SUBLIST_INVENTORY), items.len());
            for line in adj.lines(fields::SUBLIST_INVENTORY) {
                prop_assert_eq!(line.get(fields::LINE_LOCATION), FieldValue::Id(location));
            }
        }
    }
}
