//! Variable assignments: the genotype shared by every optimizer.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::ops::Index;
use std::sync::{Arc, Mutex};

/// Value read for an id the problem does not declare.
static UNKNOWN_VALUE: f64 = f64::NAN;

/// Ids read through [`Assignment`]'s index without a matching variable.
pub(crate) type UnknownReads = Arc<Mutex<Vec<String>>>;

/// Positional lookup from variable id to slot, shared by all assignments of
/// one problem.
#[derive(Debug, PartialEq)]
pub(crate) struct VariableIndex {
    ids: Vec<String>,
    lookup: HashMap<String, usize>,
}

impl VariableIndex {
    pub(crate) fn new(ids: Vec<String>) -> Self {
        let lookup = ids
            .iter()
            .enumerate()
            .map(|(i, id)| (id.clone(), i))
            .collect();
        Self { ids, lookup }
    }

    pub(crate) fn position(&self, id: &str) -> Option<usize> {
        self.lookup.get(id).copied()
    }

    pub(crate) fn len(&self) -> usize {
        self.ids.len()
    }
}

/// A value for every variable of a problem, addressable by id.
///
/// Evaluators receive a `&Assignment` and read values by id:
///
/// ```ignore
/// let cost = |a: &Assignment| a["door_count"] * 12.5 + a["shift_hours"];
/// ```
///
/// Indexing an undeclared id yields NaN, which evaluation reports as an
/// [`Evaluation`](crate::OptimizeError::Evaluation) error.
/// [`build_problem`](crate::problem::build_problem) dry-runs every evaluator
/// and rejects ones that read undeclared ids.
#[derive(Clone)]
pub struct Assignment {
    index: Arc<VariableIndex>,
    values: Vec<f64>,
    unknown_reads: Option<UnknownReads>,
}

impl Assignment {
    pub(crate) fn new(index: Arc<VariableIndex>, values: Vec<f64>) -> Self {
        debug_assert_eq!(index.len(), values.len());
        Self {
            index,
            values,
            unknown_reads: None,
        }
    }

    /// An assignment that records every undeclared id it is indexed with.
    pub(crate) fn recording(index: Arc<VariableIndex>, values: Vec<f64>) -> (Self, UnknownReads) {
        let reads = UnknownReads::default();
        let mut assignment = Self::new(index, values);
        assignment.unknown_reads = Some(Arc::clone(&reads));
        (assignment, reads)
    }

    /// Value of variable `id`, if the problem declares it.
    pub fn get(&self, id: &str) -> Option<f64> {
        self.index.position(id).map(|i| self.values[i])
    }

    /// Values in variable declaration order.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// `(id, value)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.index
            .ids
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }

    /// Owned id → value map, for callers decoding a result.
    pub fn to_map(&self) -> BTreeMap<String, f64> {
        self.iter().map(|(id, v)| (id.to_string(), v)).collect()
    }

    pub(crate) fn value(&self, i: usize) -> f64 {
        self.values[i]
    }

    pub(crate) fn set(&mut self, i: usize, value: f64) {
        self.values[i] = value;
    }

    /// Bit-exact identity used to count distinct assignments.
    pub(crate) fn key(&self) -> Vec<u64> {
        // -0.0 and 0.0 are the same assignment.
        self.values.iter().map(|v| (v + 0.0).to_bits()).collect()
    }

    /// Euclidean distance in variable space.
    pub fn distance(&self, other: &Assignment) -> f64 {
        self.values
            .iter()
            .zip(&other.values)
            .map(|(a, b)| (a - b) * (a - b))
            .sum::<f64>()
            .sqrt()
    }
}

impl PartialEq for Assignment {
    fn eq(&self, other: &Self) -> bool {
        (Arc::ptr_eq(&self.index, &other.index) || self.index.ids == other.index.ids)
            && self.values == other.values
    }
}

impl Index<&str> for Assignment {
    type Output = f64;

    /// NaN if the problem declares no variable `id`.
    fn index(&self, id: &str) -> &f64 {
        match self.index.position(id) {
            Some(i) => &self.values[i],
            None => {
                if let Some(reads) = &self.unknown_reads {
                    if let Ok(mut reads) = reads.lock() {
                        reads.push(id.to_string());
                    }
                }
                &UNKNOWN_VALUE
            }
        }
    }
}

impl fmt::Debug for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
