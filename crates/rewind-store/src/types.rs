//! Data types for persisted timelines.

use rewind_core::{Rules, Timeline};

/// Everything a saved file holds: the rules it was authored under and
/// the authored log.
///
/// # Examples
///
/// ```
/// use rewind_core::{Rules, Timeline, Vec3};
/// use rewind_store::{load, save, Document};
///
/// let rules = Rules::default();
/// let doc = Document::new(rules.clone(), Timeline::new(&rules, Vec3::ZERO));
///
/// let mut buf = Vec::new();
/// save(&mut buf, &doc.rules, &doc.timeline).unwrap();
/// assert_eq!(load(buf.as_slice()).unwrap(), doc);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    /// Rules the log was authored under.
    pub rules: Rules,
    /// The authored log.
    pub timeline: Timeline,
}

impl Document {
    /// Pair rules with a log.
    pub fn new(rules: Rules, timeline: Timeline) -> Self {
        Self { rules, timeline }
    }
}
