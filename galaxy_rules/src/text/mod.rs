//! Text substitution and conversation graphs.
//!
//! Mission text carries `<key>` placeholders that are filled in from a
//! substitution table when an objective is instantiated.

mod conversation;

pub use conversation::*;

use std::collections::BTreeMap;

/// Placeholder -> replacement. Keys include the angle brackets, e.g. `"<npc>"`.
pub type Substitutions = BTreeMap<String, String>;

/// Placeholder bound to the first tracked ship's display name.
pub const NPC_KEY: &str = "<npc>";

/// Replace every `<key>` placeholder found in `subs`.
///
/// Unknown placeholders are kept verbatim. Replacement text is not scanned
/// again, so a value containing `<...>` is inserted literally.
pub fn replace(text: &str, subs: &Substitutions) -> String {
    let mut result = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find('<') {
        result.push_str(&rest[..start]);
        let candidate = &rest[start..];
        match candidate.find('>') {
            Some(end) => {
                let key = &candidate[..=end];
                match subs.get(key) {
                    Some(value) => {
                        result.push_str(value);
                        rest = &candidate[end + 1..];
                    }
                    None => {
                        // Keep the '<' and resume after it; a nested '<' may still open a key.
                        result.push('<');
                        rest = &candidate[1..];
                    }
                }
            }
            None => {
                result.push_str(candidate);
                rest = "";
            }
        }
    }
    result.push_str(rest);
    result
}
