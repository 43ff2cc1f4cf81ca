use std::collections::BTreeMap;

use copyloc_core::{FieldValue, RecordError, RecordId, RecordResult, RecordType};

/// Record-like API exposed by the host.
///
/// Mirrors the host's two editing modes: direct sublist writes by line index
/// (server side, before persistence) and a current-line buffer that is
/// selected, edited and committed (client side, dynamic records).
pub trait Record {
    fn record_type(&self) -> &RecordType;

    /// Internal id; `None` until the record has been saved once.
    fn id(&self) -> Option<RecordId>;

    /// Body field value. Unknown fields read as [`FieldValue::Empty`].
    fn get_value(&self, field: &str) -> FieldValue;

    /// Display text of a body field.
    fn get_text(&self, field: &str) -> String;

    fn set_value(&mut self, field: &str, value: FieldValue);

    /// Number of lines; unknown sublists have none.
    fn line_count(&self, sublist: &str) -> usize;

    fn get_sublist_value(&self, sublist: &str, field: &str, line: usize) -> RecordResult<FieldValue>;

    fn set_sublist_value(
        &mut self,
        sublist: &str,
        field: &str,
        line: usize,
        value: FieldValue,
    ) -> RecordResult<()>;

    /// Load an existing line into the current-line buffer.
    fn select_line(&mut self, sublist: &str, line: usize) -> RecordResult<()>;

    /// Start a fresh line in the current-line buffer.
    fn select_new_line(&mut self, sublist: &str) -> RecordResult<()>;

    fn get_current_sublist_value(&self, sublist: &str, field: &str) -> RecordResult<FieldValue>;

    fn set_current_sublist_value(
        &mut self,
        sublist: &str,
        field: &str,
        value: FieldValue,
    ) -> RecordResult<()>;

    /// Write the current-line buffer back into the sublist and clear it.
    fn commit_line(&mut self, sublist: &str) -> RecordResult<()>;
}

/// One sublist line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Line {
    values: BTreeMap<String, FieldValue>,
}

impl Line {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: &str, value: impl Into<FieldValue>) -> Self {
        self.set(field, value.into());
        self
    }

    pub fn get(&self, field: &str) -> FieldValue {
        self.values.get(field).cloned().unwrap_or_default()
    }

    pub fn set(&mut self, field: &str, value: FieldValue) {
        self.values.insert(field.to_string(), value);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CurrentLine {
    sublist: String,
    /// `None` for a line that has not been committed yet.
    index: Option<usize>,
    line: Line,
}

/// In-memory transaction record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRecord {
    record_type: RecordType,
    id: Option<RecordId>,
    body: BTreeMap<String, FieldValue>,
    texts: BTreeMap<String, String>,
    sublists: BTreeMap<String, Vec<Line>>,
    current: Option<CurrentLine>,
}

impl TransactionRecord {
    /// A new, unsaved record with the type's line sublist present and empty.
    pub fn new(record_type: RecordType) -> Self {
        let mut sublists = BTreeMap::new();
        sublists.insert(record_type.line_sublist().to_string(), Vec::new());
        Self {
            record_type,
            id: None,
            body: BTreeMap::new(),
            texts: BTreeMap::new(),
            sublists,
            current: None,
        }
    }

    pub fn with_id(mut self, id: RecordId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_value(mut self, field: &str, value: impl Into<FieldValue>) -> Self {
        self.body.insert(field.to_string(), value.into());
        self
    }

    /// Set a select field together with its display text.
    pub fn with_text(mut self, field: &str, value: impl Into<FieldValue>, text: &str) -> Self {
        self.body.insert(field.to_string(), value.into());
        self.texts.insert(field.to_string(), text.to_string());
        self
    }

    pub fn with_sublist(mut self, sublist: &str) -> Self {
        self.sublists.entry(sublist.to_string()).or_default();
        self
    }

    pub fn with_line(mut self, sublist: &str, line: Line) -> Self {
        self.sublists.entry(sublist.to_string()).or_default().push(line);
        self
    }

    /// Append `count` blank lines.
    pub fn with_blank_lines(mut self, sublist: &str, count: usize) -> Self {
        let lines = self.sublists.entry(sublist.to_string()).or_default();
        lines.extend(std::iter::repeat_with(Line::new).take(count));
        self
    }

    pub fn set_id(&mut self, id: RecordId) {
        self.id = Some(id);
    }

    pub fn lines(&self, sublist: &str) -> &[Line] {
        self.sublists.get(sublist).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Drop any uncommitted current-line edits.
    pub fn cancel_line(&mut self) {
        self.current = None;
    }

    /// Line index being edited; `None` for a new line or when nothing is selected.
    pub fn current_line_index(&self) -> Option<usize> {
        self.current.as_ref().and_then(|c| c.index)
    }

    fn line_mut(&mut self, sublist: &str, line: usize) -> RecordResult<&mut Line> {
        let lines = self
            .sublists
            .get_mut(sublist)
            .ok_or_else(|| RecordError::UnknownSublist(sublist.to_string()))?;
        let count = lines.len();
        lines.get_mut(line).ok_or_else(|| RecordError::LineOutOfRange {
            sublist: sublist.to_string(),
            line,
            count,
        })
    }

    fn current_for(&self, sublist: &str) -> RecordResult<&CurrentLine> {
        self.current
            .as_ref()
            .filter(|c| c.sublist == sublist)
            .ok_or_else(|| RecordError::NoCurrentLine(sublist.to_string()))
    }
}

impl Record for TransactionRecord {
    fn record_type(&self) -> &RecordType {
        &self.record_type
    }

    fn id(&self) -> Option<RecordId> {
        self.id
    }

    fn get_value(&self, field: &str) -> FieldValue {
        self.body.get(field).cloned().unwrap_or_default()
    }

    fn get_text(&self, field: &str) -> String {
        match self.texts.get(field) {
            Some(text) => text.clone(),
            None => self.get_value(field).to_string(),
        }
    }

    fn set_value(&mut self, field: &str, value: FieldValue) {
        // A new value invalidates the display text captured for the old one.
        self.texts.remove(field);
        self.body.insert(field.to_string(), value);
    }

    fn line_count(&self, sublist: &str) -> usize {
        self.lines(sublist).len()
    }

    fn get_sublist_value(&self, sublist: &str, field: &str, line: usize) -> RecordResult<FieldValue> {
        let lines = self
            .sublists
            .get(sublist)
            .ok_or_else(|| RecordError::UnknownSublist(sublist.to_string()))?;
        lines
            .get(line)
            .map(|l| l.get(field))
            .ok_or_else(|| RecordError::LineOutOfRange {
                sublist: sublist.to_string(),
                line,
                count: lines.len(),
            })
    }

    fn set_sublist_value(
        &mut self,
        sublist: &str,
        field: &str,
        line: usize,
        value: FieldValue,
    ) -> RecordResult<()> {
        self.line_mut(sublist, line)?.set(field, value);
        Ok(())
    }

    fn select_line(&mut self, sublist: &str, line: usize) -> RecordResult<()> {
        let selected = self.line_mut(sublist, line)?.clone();
        self.current = Some(CurrentLine {
            sublist: sublist.to_string(),
            index: Some(line),
            line: selected,
        });
        Ok(())
    }

    fn select_new_line(&mut self, sublist: &str) -> RecordResult<()> {
        if !self.sublists.contains_key(sublist) {
            return Err(RecordError::UnknownSublist(sublist.to_string()));
        }
        self.current = Some(CurrentLine {
            sublist: sublist.to_string(),
            index: None,
            line: Line::new(),
        });
        Ok(())
    }

    fn get_current_sublist_value(&self, sublist: &str, field: &str) -> RecordResult<FieldValue> {
        Ok(self.current_for(sublist)?.line.get(field))
    }

    fn set_current_sublist_value(
        &mut self,
        sublist: &str,
        field: &str,
        value: FieldValue,
    ) -> RecordResult<()> {
        self.current_for(sublist)?;
        if let Some(current) = self.current.as_mut() {
            current.line.set(field, value);
        }
        Ok(())
    }

    fn commit_line(&mut self, sublist: &str) -> RecordResult<()> {
        self.current_for(sublist)?;
        let Some(current) = self.current.take() else {
            return Err(RecordError::NoCurrentLine(sublist.to_string()));
        };
        match current.index {
            Some(index) => *self.line_mut(sublist, index)? = current.line,
            None => self
                .sublists
                .entry(current.sublist)
                .or_default()
                .push(current.line),
        }
        Ok(())
    }
}
