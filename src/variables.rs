//! Output variables returned by a finished job.

use std::slice;

use serde::{Deserialize, Serialize};

/// A named string value produced by a job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    pub name: String,
    pub value: String,
}

impl Variable {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Append-only, insertion-ordered sequence of [`Variable`]s.
///
/// Names may repeat. Every call to [`iter`](Self::iter) replays all items from
/// the start in insertion order. Serializes as a JSON array of
/// `{"name", "value"}` objects in that same order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariableCollection {
    items: Vec<Variable>,
}

impl VariableCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, variable: Variable) {
        self.items.push(variable);
    }

    pub fn add(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.push(Variable::new(name, value));
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<'_, Variable> {
        self.items.iter()
    }

    /// Value of the first variable named `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.items
            .iter()
            .find(|v| v.name == name)
            .map(|v| v.value.as_str())
    }

    pub fn as_slice(&self) -> &[Variable] {
        &self.items
    }
}

impl<'a> IntoIterator for &'a VariableCollection {
    type Item = &'a Variable;
    type IntoIter = slice::Iter<'a, Variable>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for VariableCollection {
    type Item = Variable;
    type IntoIter = std::vec::IntoIter<Variable>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl FromIterator<Variable> for VariableCollection {
    fn from_iter<I: IntoIterator<Item = Variable>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl Extend<Variable> for VariableCollection {
    fn extend<I: IntoIterator<Item = Variable>>(&mut self, iter: I) {
        self.items.extend(iter);
    }
}
