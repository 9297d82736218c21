//! Safe serialization of [`Input`] values into [`Item`] trees.
//!
//! Every sequence, mapping and record identity is remembered for the whole
//! call. The second visit of any identity yields [`Item::Circular`], so a
//! real cycle terminates, and so does a sub-object merely shared between two
//! siblings or two root values. Sharing is reported as circular on purpose:
//! the check is identity membership, not path membership.
//!
//! Absent values survive at the top level and inside sequences. Absent
//! mapping (and record) entries are dropped from their mapping.

use std::collections::HashSet;

use crate::input::Input;
use crate::item::Item;
use crate::logging::targets;

/// Serializes `values` into plain item trees.
#[must_use]
pub fn serialize(values: &[Input]) -> Vec<Item> {
    let mut visited = Visited::default();
    let items: Vec<Item> = values
        .iter()
        .map(|value| copy(value, &mut visited))
        .collect();
    log::trace!(
        target: targets::SERIALIZE,
        "serialized {} values ({} shared objects)",
        items.len(),
        visited.seen.len()
    );
    items
}

/// Identities visited during one call.
///
/// Every visited handle is held in `alive` until the call ends, so an
/// address in `seen` cannot be reused by a node built later (record fields
/// are produced on demand and would otherwise be freed after use).
#[derive(Default)]
struct Visited {
    seen: HashSet<usize>,
    alive: Vec<Input>,
}

impl Visited {
    /// False if `input` has an identity that was already visited.
    fn enter(&mut self, input: &Input) -> bool {
        let Some(identity) = input.identity() else {
            return true;
        };
        if !self.seen.insert(identity) {
            return false;
        }
        self.alive.push(input.clone());
        true
    }
}

fn copy(input: &Input, visited: &mut Visited) -> Item {
    if !visited.enter(input) {
        return Item::Circular;
    }

    match input {
        Input::Absent => Item::Absent,
        Input::Null => Item::Null,
        Input::Bool(b) => Item::Bool(*b),
        Input::Number(n) => Item::Number(n.clone()),
        Input::String(s) => Item::String(s.clone()),
        Input::Seq(seq) => Item::Seq(seq.to_vec().iter().map(|v| copy(v, visited)).collect()),
        Input::Map(map) => copy_fields(map.entries(), visited),
        Input::Record(record) => copy_fields(record.fields(), visited),
    }
}

fn copy_fields(fields: Vec<(String, Input)>, visited: &mut Visited) -> Item {
    Item::Map(
        fields
            .into_iter()
            .filter(|(_, value)| !value.is_absent())
            .map(|(key, value)| {
                let item = copy(&value, visited);
                (key, item)
            })
            .collect(),
    )
}
