//! Path-addressed edits on raw input trees.
//!
//! Form input is a JSON tree: objects for records and messages, arrays for
//! vectors, tuples and the argument list itself. Edits address one node by
//! [`PathSeg`]s and create missing containers on the way down, so a form
//! can set a deep field before its parents were ever touched.

use serde_json::{Map, Value as Json};
use sonde_ir::PathSeg;

/// The node at `path`.
pub fn get_at<'a>(root: &'a Json, path: &[PathSeg]) -> Option<&'a Json> {
    path.iter().try_fold(root, |node, seg| match (node, seg) {
        (Json::Object(map), PathSeg::Field(key)) => map.get(key),
        (Json::Array(items), PathSeg::Index(i)) => items.get(*i),
        _ => None,
    })
}

fn get_at_mut<'a>(root: &'a mut Json, path: &[PathSeg]) -> Option<&'a mut Json> {
    path.iter().try_fold(root, |node, seg| match (node, seg) {
        (Json::Object(map), PathSeg::Field(key)) => map.get_mut(key),
        (Json::Array(items), PathSeg::Index(i)) => items.get_mut(*i),
        _ => None,
    })
}

/// Replace the node at `path` with `value`.
///
/// Missing or wrongly shaped containers along the path are replaced by
/// ones that fit; arrays grow with `null` up to the addressed position.
/// Nodes off the path are left alone.
pub fn set_at(root: &mut Json, path: &[PathSeg], value: Json) {
    let Some((head, rest)) = path.split_first() else {
        *root = value;
        return;
    };
    let child = match head {
        PathSeg::Field(key) => {
            if !root.is_object() {
                *root = Json::Object(Map::new());
            }
            let Json::Object(map) = root else {
                return;
            };
            map.entry(key.clone()).or_insert(Json::Null)
        }
        PathSeg::Index(index) => {
            if !root.is_array() {
                *root = Json::Array(Vec::new());
            }
            let Json::Array(items) = root else {
                return;
            };
            if items.len() <= *index {
                items.resize(*index + 1, Json::Null);
            }
            &mut items[*index]
        }
    };
    set_at(child, rest, value);
}

/// Append `value` to the array at `path`, replacing a non-array node with
/// an empty array first. Returns the new element's index.
pub fn push_at(root: &mut Json, path: &[PathSeg], value: Json) -> usize {
    if !get_at(root, path).is_some_and(Json::is_array) {
        set_at(root, path, Json::Array(Vec::new()));
    }
    match get_at_mut(root, path) {
        Some(Json::Array(items)) => {
            items.push(value);
            items.len() - 1
        }
        _ => 0,
    }
}

/// Remove position `index` from the array at `path`, shifting later
/// elements down. Returns the removed node, or `None` when there is no
/// such array or position.
pub fn remove_index_at(root: &mut Json, path: &[PathSeg], index: usize) -> Option<Json> {
    match get_at_mut(root, path)? {
        Json::Array(items) if index < items.len() => Some(items.remove(index)),
        _ => None,
    }
}
