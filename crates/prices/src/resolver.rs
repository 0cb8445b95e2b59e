//! Interval overlap resolution.
//!
//! Turns the raw price records of one product into a resolved timeline:
//! records that overlap nothing pass through, overlapping records that agree
//! on amount are merged into one, and overlapping records that disagree are
//! all flagged as `overlapped`.
//!
//! ## Anchored grouping
//!
//! Groups are anchored: each pass takes the first not-yet-grouped record (the
//! anchor) and collects every *other* record in the whole input that overlaps
//! the anchor directly. Records that only overlap another group member are not
//! pulled in, so chains such as `A ~ B ~ C` (with `A` and `C` disjoint) yield
//! two groups `{B, A}` and `{B, C}`, and `B` is emitted by both.
//!
//! Grouping tracks records by their position in the input, never by value.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use pricing_core::{DomainError, DomainResult};

use crate::overlap::overlaps;
use crate::price::{PriceRecord, ResolvedPrice};

/// How groups with overlapping records are decided.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionPolicy {
    /// Merge-or-flag by amount alone.
    #[default]
    Lenient,
    /// Like `Lenient`, but a group mixing currencies is rejected.
    Strict,
}

/// Indices into the input that one grouping pass selected.
///
/// For an anchor with overlaps, `members` holds the collected records in input
/// order followed by the anchor. For an isolated anchor it holds the anchor
/// alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlapGroup {
    anchor: usize,
    members: Vec<usize>,
}

impl OverlapGroup {
    pub fn anchor(&self) -> usize {
        self.anchor
    }

    pub fn members(&self) -> &[usize] {
        &self.members
    }

    /// `true` when the anchor overlapped nothing.
    pub fn is_isolated(&self) -> bool {
        self.members.len() == 1
    }
}

/// Partition `records` into anchored groups, in group-formation order.
pub fn anchored_groups(records: &[PriceRecord]) -> Vec<OverlapGroup> {
    let mut placed: HashSet<usize> = HashSet::with_capacity(records.len());
    let mut groups = Vec::new();

    for (anchor, current) in records.iter().enumerate() {
        if placed.contains(&anchor) {
            continue;
        }

        let mut members: Vec<usize> = records
            .iter()
            .enumerate()
            .filter(|(idx, other)| *idx != anchor && overlaps(current, other))
            .map(|(idx, _)| idx)
            .collect();
        members.push(anchor);

        placed.extend(members.iter().copied());
        groups.push(OverlapGroup { anchor, members });
    }

    groups
}

/// Resolve a single product's price records into a timeline.
///
/// Output order is group-formation order; nothing is sorted afterwards.
pub fn resolve(records: &[PriceRecord]) -> Vec<ResolvedPrice> {
    let groups = anchored_groups(records);
    emit(records, &groups)
}

/// Resolve under an explicit policy.
///
/// `ResolutionPolicy::Lenient` never fails and matches [`resolve`].
pub fn resolve_with(
    records: &[PriceRecord],
    policy: ResolutionPolicy,
) -> DomainResult<Vec<ResolvedPrice>> {
    let groups = anchored_groups(records);

    if policy == ResolutionPolicy::Strict {
        for group in groups.iter().filter(|g| !g.is_isolated()) {
            ensure_single_currency(records, group)?;
        }
    }

    Ok(emit(records, &groups))
}

fn emit(records: &[PriceRecord], groups: &[OverlapGroup]) -> Vec<ResolvedPrice> {
    let mut out = Vec::with_capacity(records.len());

    for group in groups {
        if group.is_isolated() {
            out.push(records[group.anchor].to_resolved(false));
            continue;
        }

        let members: Vec<&PriceRecord> = group.members.iter().map(|&i| &records[i]).collect();
        if all_amounts_equal(&members) {
            out.push(merge(&members));
        } else {
            out.extend(members.iter().map(|r| r.to_resolved(true)));
        }
    }

    out
}

/// Exact decimal equality across the group (trivially true for 0 or 1 members).
fn all_amounts_equal(members: &[&PriceRecord]) -> bool {
    match members.split_first() {
        Some((first, rest)) => rest.iter().all(|r| r.amount() == first.amount()),
        None => true,
    }
}

/// Collapse an equal-amount group into one record spanning all its intervals.
///
/// Descriptive fields come from the first member in collection order.
fn merge(members: &[&PriceRecord]) -> ResolvedPrice {
    let first = members[0];
    let mut merged = first.to_resolved(false);

    for r in &members[1..] {
        if r.valid_from() < merged.valid_from {
            merged.valid_from = r.valid_from();
        }
        if r.valid_to() > merged.valid_to {
            merged.valid_to = r.valid_to();
        }
    }

    merged
}

fn ensure_single_currency(records: &[PriceRecord], group: &OverlapGroup) -> DomainResult<()> {
    let anchor = &records[group.anchor];
    let mixed = group
        .members
        .iter()
        .find(|&&i| records[i].currency() != anchor.currency());

    match mixed {
        Some(&i) => Err(DomainError::policy(format!(
            "overlapping records mix currencies {} and {} (records {} and {})",
            anchor.currency(),
            records[i].currency(),
            group.anchor,
            i
        ))),
        None => Ok(()),
    }
}
