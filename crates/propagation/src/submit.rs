//! Server-side submit hooks.

use anyhow::Context;
use uuid::Uuid;

use copyloc_core::{RecordId, RecordType, UserEventType, fields};
use copyloc_records::{Record, RecordStore, RequisitionQuery, SearchEngine};

use crate::barrier::guarded;
use crate::propagator::LocationPropagator;
use crate::reconcile::{self, Backfill, HeaderSnapshot};

impl<S, E> LocationPropagator<S, E>
where
    S: RecordStore,
    E: SearchEngine,
{
    /// Before persistence: overwrite every line's location with the header's.
    ///
    /// Runs for CREATE and EDIT only. The header value is copied as-is, empty
    /// included. Requisitions also copy the contract customer onto each line.
    pub fn before_header_submit<R: Record>(&self, record: &mut R, event: UserEventType) {
        guarded("before_header_submit", (), || {
            if !event.triggers_submit_hooks() {
                return Ok(());
            }
            let record_type = record.record_type().clone();
            let sublist = record_type.line_sublist();
            let location = record.get_value(record_type.location_field());
            let customer = (record_type == RecordType::PurchaseRequisition)
                .then(|| record.get_value(fields::CUSTOMER_CONTRACT));
            let lines = record.line_count(sublist);
            tracing::debug!(%record_type, %location, lines, "propagating header location");

            for line in 0..lines {
                record
                    .set_sublist_value(sublist, fields::LINE_LOCATION, line, location.clone())
                    .with_context(|| format!("setting location on {sublist} line {line}"))?;
                if let Some(customer) = &customer {
                    record
                        .set_sublist_value(sublist, fields::LINE_CUSTOMER, line, customer.clone())
                        .with_context(|| format!("setting customer on {sublist} line {line}"))?;
                }
            }
            Ok(())
        })
    }

    /// After persistence: backfill a purchase order from its requisition.
    ///
    /// Runs for CREATE and EDIT of purchase orders only. The saved order is
    /// reloaded, and when location, ship-to party or ship-to address is empty
    /// the first requisition applied to it donates the missing values to the
    /// header and its lines, followed by a second save. Faults are logged; the
    /// order then keeps its state from the first save.
    pub fn after_header_submit(&self, record: &S::Record, event: UserEventType) {
        if !event.triggers_submit_hooks() || *record.record_type() != RecordType::PurchaseOrder {
            return;
        }
        let Some(po_id) = record.id() else {
            tracing::warn!("purchase order has no id after submit; skipping backfill");
            return;
        };

        let _claim = if self.config.guard_reentrancy {
            match self.in_flight.enter(po_id) {
                Some(claim) => Some(claim),
                None => {
                    tracing::debug!(%po_id, "after-submit already running for this order; skipping");
                    return;
                }
            }
        } else {
            None
        };

        let cycle_id = Uuid::now_v7();
        let span = tracing::info_span!("after_header_submit", %po_id, %cycle_id);
        let _entered = span.enter();

        guarded("after_header_submit", (), || {
            if let Some(plan) = self.reconcile_purchase_order(po_id)? {
                tracing::info!(
                    requisition_id = %plan.requisition_id,
                    location = ?plan.location,
                    customer = ?plan.customer,
                    ship_to = ?plan.ship_to,
                    "purchase order backfilled from requisition"
                );
            }
            Ok(())
        })
    }

    /// Reload, decide, apply and resave. Returns the applied plan, if any.
    fn reconcile_purchase_order(&self, po_id: RecordId) -> anyhow::Result<Option<Backfill>> {
        let mut po = self
            .store
            .load(&RecordType::PurchaseOrder, po_id)
            .context("reloading purchase order")?;

        let links = self
            .search
            .requisition_links(&RequisitionQuery::applied_to(po_id))
            .context("searching requisitions applied to purchase order")?;
        tracing::debug!(count = links.len(), ?links, "requisition search results");

        let current = HeaderSnapshot::read(&po);
        tracing::debug!(
            location = %current.location,
            customer = %current.customer,
            ship_to = %current.ship_to,
            "purchase order values"
        );

        let Some(plan) = reconcile::plan_backfill(po_id, &current, &links) else {
            return Ok(None);
        };
        if plan.is_empty() {
            tracing::debug!(requisition_id = %plan.requisition_id, "requisition has nothing to backfill");
            return Ok(None);
        }

        let requisitions = reconcile::distinct_requisitions(&links);
        if requisitions.len() > 1 {
            tracing::warn!(
                ?requisitions,
                donor = %plan.requisition_id,
                "several requisitions apply to this purchase order; using the first"
            );
        }

        reconcile::apply_backfill(&mut po, &plan).context("applying backfill")?;
        self.store
            .save(&po, self.config.resave)
            .context("resaving purchase order")?;
        Ok(Some(plan))
    }
}
