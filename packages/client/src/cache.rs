//! Invalidating read cache.
//!
//! One cached query (the instruction list, keyed by the optional product
//! filter) plus the records fetched individually. Mutations invalidate the
//! whole list cache and the record they touched; there are no optimistic
//! updates.

use std::collections::HashMap;

use crate::types::Instruction;

#[derive(Default)]
pub(crate) struct Cache {
    lists: HashMap<Option<i32>, Vec<Instruction>>,
    records: HashMap<String, Instruction>,
}

impl Cache {
    pub fn list(&self, product: Option<i32>) -> Option<Vec<Instruction>> {
        self.lists.get(&product).cloned()
    }

    pub fn put_list(&mut self, product: Option<i32>, items: Vec<Instruction>) {
        self.lists.insert(product, items);
    }

    pub fn record(&self, id: &str) -> Option<Instruction> {
        self.records.get(id).cloned()
    }

    pub fn put_record(&mut self, record: Instruction) {
        self.records.insert(record.id.clone(), record);
    }

    /// Every mutation goes through here: the list cache is stale no matter
    /// what changed, and so is the touched record (when known).
    pub fn invalidate(&mut self, id: Option<&str>) {
        self.lists.clear();
        if let Some(id) = id {
            self.records.remove(id);
        }
    }
}
