//! Merged parameter view.

use std::collections::HashMap;

use crate::RequestContext;

/// Parameter name to values, as produced by query parsing and body parsers.
pub type ParamMap = HashMap<String, Vec<String>>;

/// Append values for a key into an ordered entry list, combining values of
/// a repeated key in encounter order.
pub(crate) fn merge_entry(
    entries: &mut Vec<(String, Vec<String>)>,
    name: String,
    values: Vec<String>,
) {
    if let Some((_, existing)) = entries.iter_mut().find(|(key, _)| *key == name) {
        existing.extend(values);
    } else {
        entries.push((name, values));
    }
}

/// Read-only composite view over the three parameter sources of a context.
///
/// Precedence is overrides > query > body. Iteration yields the live
/// override entries first (each as a single-element value list), then the
/// query+body entries merged by key, query values before body values. The
/// query+body merge is computed once per context and cached; the override
/// entries are read live, so the view always reflects the latest overrides.
///
/// The view is read-only by construction: it exposes no mutating API, which
/// is this crate's rendition of the unsupported-operation error the merged
/// view historically raised on mutation attempts.
pub struct MergedParams<'a> {
    ctx: &'a RequestContext,
}

impl<'a> MergedParams<'a> {
    pub(crate) fn new(ctx: &'a RequestContext) -> Self {
        Self { ctx }
    }

    /// Values for a name, honoring precedence.
    pub fn get(&self, name: &str) -> Option<Vec<String>> {
        if let Some(value) = self.ctx.override_value(name) {
            return Some(vec![value]);
        }
        self.ctx
            .merged_request_params()
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, values)| values.clone())
    }

    /// Whether a name is present in any source.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Number of entries the iterator yields.
    ///
    /// A key present both as an override and in the request counts twice,
    /// matching the iteration behavior.
    pub fn len(&self) -> usize {
        self.ctx.override_count() + self.ctx.merged_request_params().len()
    }

    /// Whether the view has no entries at all.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate all entries: overrides first, then the merged request params.
    pub fn iter(&self) -> impl Iterator<Item = (String, Vec<String>)> + '_ {
        let overrides = self
            .ctx
            .override_snapshot()
            .into_iter()
            .map(|(name, value)| (name, vec![value]));
        let merged = self.ctx.merged_request_params();
        overrides.chain((0..merged.len()).map(move |i| merged[i].clone()))
    }

    /// Collapse the view into a plain map. Overrides shadow request-derived
    /// entries for the same key.
    pub fn to_map(&self) -> ParamMap {
        let mut map = ParamMap::new();
        for (name, values) in self.merged_entries() {
            map.insert(name, values);
        }
        for (name, value) in self.ctx.override_snapshot() {
            map.insert(name, vec![value]);
        }
        map
    }

    fn merged_entries(&self) -> Vec<(String, Vec<String>)> {
        self.ctx.merged_request_params().as_ref().clone()
    }
}
