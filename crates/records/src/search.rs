use std::sync::{Arc, Mutex, RwLock};

use serde::{Deserialize, Serialize};

use copyloc_core::{RecordError, RecordId, RecordResult, fields};

/// Grouped query over requisitions applied to a given transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequisitionQuery {
    /// Requisition subtype filter (`PurchReq`).
    pub subtype: String,
    /// Applying transaction (the purchase order) to match.
    pub applying_transaction: RecordId,
}

impl RequisitionQuery {
    /// Purchase requisitions whose applying transaction is `purchase_order`.
    pub fn applied_to(purchase_order: RecordId) -> Self {
        Self {
            subtype: fields::REQUISITION_SUBTYPE.to_string(),
            applying_transaction: purchase_order,
        }
    }
}

/// One grouped row of the requisition-link query.
///
/// Reference cells the host could not resolve to a numeric id come back as
/// `None`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequisitionLink {
    pub document_number: String,
    pub requisition_id: RecordId,
    pub applied_po_id: RecordId,
    pub customer: Option<u64>,
    pub location: Option<u64>,
    pub ship_to: Option<u64>,
}

/// Read-only access to the requisition → purchase order relation.
pub trait SearchEngine: Send + Sync {
    /// Run the query to completion and return every grouped row, in host order.
    fn requisition_links(&self, query: &RequisitionQuery) -> RecordResult<Vec<RequisitionLink>>;
}

impl<E> SearchEngine for Arc<E>
where
    E: SearchEngine + ?Sized,
{
    fn requisition_links(&self, query: &RequisitionQuery) -> RecordResult<Vec<RequisitionLink>> {
        (**self).requisition_links(query)
    }
}

#[derive(Debug, Clone)]
struct Row {
    subtype: String,
    link: RequisitionLink,
}

/// In-memory requisition search.
#[derive(Debug, Default)]
pub struct InMemorySearchEngine {
    rows: RwLock<Vec<Row>>,
    fail_next: Mutex<Option<String>>,
    queries: Mutex<Vec<RequisitionQuery>>,
}

impl InMemorySearchEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a purchase requisition row.
    pub fn insert(&self, link: RequisitionLink) {
        self.insert_with_subtype(fields::REQUISITION_SUBTYPE, link);
    }

    pub fn insert_with_subtype(&self, subtype: &str, link: RequisitionLink) {
        if let Ok(mut rows) = self.rows.write() {
            rows.push(Row {
                subtype: subtype.to_string(),
                link,
            });
        }
    }

    /// Make the next query fail with `message` (fault injection).
    pub fn fail_next(&self, message: impl Into<String>) {
        if let Ok(mut slot) = self.fail_next.lock() {
            *slot = Some(message.into());
        }
    }

    /// Queries received so far, in order.
    pub fn queries(&self) -> Vec<RequisitionQuery> {
        self.queries.lock().map(|q| q.clone()).unwrap_or_default()
    }
}

impl SearchEngine for InMemorySearchEngine {
    fn requisition_links(&self, query: &RequisitionQuery) -> RecordResult<Vec<RequisitionLink>> {
        self.queries
            .lock()
            .map_err(|_| RecordError::search("lock poisoned"))?
            .push(query.clone());

        if let Some(message) = self
            .fail_next
            .lock()
            .map_err(|_| RecordError::search("lock poisoned"))?
            .take()
        {
            return Err(RecordError::search(message));
        }

        let rows = self
            .rows
            .read()
            .map_err(|_| RecordError::search("lock poisoned"))?;

        // Grouping collapses identical rows; first occurrence keeps its position.
        let mut grouped: Vec<RequisitionLink> = Vec::new();
        for row in rows.iter() {
            if row.subtype != query.subtype || row.link.applied_po_id != query.applying_transaction {
                continue;
            }
            if !grouped.contains(&row.link) {
                grouped.push(row.link.clone());
            }
        }
        Ok(grouped)
    }
}
