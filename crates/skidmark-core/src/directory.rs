// Team id -> display name lookup shared by every prompt section.

use std::borrow::Cow;
use std::collections::HashMap;

use crate::model::Team;

/// Name lookup built from the full team list of a request.
///
/// Lookups never fail: an id that is not in the list renders as
/// `"Team {id}"`. When the list repeats an id, the later entry wins.
#[derive(Debug, Clone, Default)]
pub struct TeamDirectory<'a> {
    names: HashMap<&'a str, &'a str>,
}

impl<'a> TeamDirectory<'a> {
    pub fn new(teams: &'a [Team]) -> Self {
        let names = teams
            .iter()
            .map(|t| (t.id.as_str(), t.name.as_str()))
            .collect();
        Self { names }
    }

    /// Display name for `id`, falling back to `"Team {id}"`.
    pub fn name(&self, id: &str) -> Cow<'a, str> {
        match self.names.get(id) {
            Some(name) => Cow::Borrowed(*name),
            None => Cow::Owned(format!("Team {id}")),
        }
    }
}

#[cfg(test)]
impl TeamDirectory<'_> {
    fn contains(&self, id: &str) -> bool {
        self.names.contains_key(id)
    }

    fn len(&self) -> usize {
        self.names.len()
    }

    fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
