// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Ring reconstruction
//!
//! Surfaces list their boundary edges as an unordered set, and each edge may
//! be stored in either direction. This module chains those edges into an
//! ordered, closed sequence of point ids.

use std::fmt::Debug;
use std::hash::Hash;

use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;
use structure3d_core::{Edge, Structure};

use crate::error::{Error, Result};

/// Chain an unordered set of undirected edges into a closed ring.
///
/// The first edge seeds the ring in its stored orientation. Each following
/// step takes the lowest-indexed unused edge touching the last placed point,
/// flipping it when it was stored the other way round. The returned sequence
/// has `edges.len() + 1` ids and its first and last ids are equal.
///
/// An empty input yields an empty ring. Any input that is not exactly one
/// simple cycle (open chains, disconnected loops, points visited twice) is
/// reported as [`Error::MalformedRing`]; a partial ring is never returned.
/// The input is left untouched.
pub fn reconstruct_ring<K>(edges: &[(K, K)]) -> Result<Vec<K>>
where
    K: Copy + Eq + Hash + Debug,
{
    chain_edges(edges).map(|(ring, _)| ring)
}

/// Ring walk shared by [`reconstruct_ring`] and [`resolve_ring`].
///
/// Besides the ring, returns the traversal order as `(edge index, flipped)`.
fn chain_edges<K>(edges: &[(K, K)]) -> Result<(Vec<K>, Vec<(usize, bool)>)>
where
    K: Copy + Eq + Hash + Debug,
{
    let Some(&(start, first_end)) = edges.first() else {
        return Ok((Vec::new(), Vec::new()));
    };

    // Endpoint index: point -> edges touching it, in input order
    let mut by_endpoint: FxHashMap<K, SmallVec<[usize; 2]>> = FxHashMap::default();
    for (i, &(a, b)) in edges.iter().enumerate() {
        if a == b {
            return Err(Error::MalformedRing(format!(
                "edge {} starts and ends at {:?}",
                i, a
            )));
        }
        by_endpoint.entry(a).or_default().push(i);
        by_endpoint.entry(b).or_default().push(i);
    }

    let mut used = vec![false; edges.len()];
    used[0] = true;

    let mut visited: FxHashSet<K> = FxHashSet::default();
    visited.insert(start);
    visited.insert(first_end);

    let mut ring = Vec::with_capacity(edges.len() + 1);
    ring.push(start);
    ring.push(first_end);
    let mut order = Vec::with_capacity(edges.len());
    order.push((0, false));
    let mut last = first_end;

    for placed in 1..edges.len() {
        let next_edge = by_endpoint
            .get(&last)
            .and_then(|candidates| candidates.iter().copied().find(|&i| !used[i]))
            .ok_or_else(|| {
                Error::MalformedRing(format!(
                    "no remaining edge continues from {:?} after {} of {} edges",
                    last,
                    placed,
                    edges.len()
                ))
            })?;
        used[next_edge] = true;

        let (a, b) = edges[next_edge];
        let flipped = a != last;
        let next = if flipped { a } else { b };

        if next == start {
            // Closing is only legal on the final edge
            if placed + 1 != edges.len() {
                return Err(Error::MalformedRing(format!(
                    "ring closes after {} of {} edges",
                    placed + 1,
                    edges.len()
                )));
            }
        } else if !visited.insert(next) {
            return Err(Error::MalformedRing(format!(
                "point {:?} is visited more than once",
                next
            )));
        }

        ring.push(next);
        order.push((next_edge, flipped));
        last = next;
    }

    if last != start {
        return Err(Error::MalformedRing(format!(
            "ring is open: ends at {:?} but starts at {:?}",
            last, start
        )));
    }

    tracing::trace!(edges = edges.len(), "reconstructed ring");
    Ok((ring, order))
}

/// Resolve a surface ring given as edge ids into an ordered ring of point ids.
///
/// Edges are chained by their endpoints. Intermediate vertices of an edge are
/// spliced in between its endpoints, in traversal direction, so the ring
/// follows the same path as the edge's line.
pub fn resolve_ring<'a>(structure: &'a Structure, edge_ids: &'a [String]) -> Result<Vec<&'a str>> {
    let edges = edge_ids
        .iter()
        .map(|id| structure.edge(id).ok_or_else(|| Error::dangling_edge(id)))
        .collect::<Result<Vec<_>>>()?;

    let pairs = edges
        .iter()
        .zip(edge_ids)
        .map(|(edge, id)| {
            edge.endpoints().ok_or_else(|| {
                Error::MalformedRing(format!("edge '{}' has fewer than two points", id))
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let (ring, order) = chain_edges(&pairs)?;
    let Some(&start) = ring.first() else {
        return Ok(ring);
    };
    if edges.iter().all(|e| e.points.len() == 2) {
        return Ok(ring);
    }

    let mut spliced = Vec::with_capacity(edges.iter().map(|e| e.points.len()).sum::<usize>());
    spliced.push(start);
    for (i, flipped) in order {
        let edge: &'a Edge = edges[i];
        if flipped {
            spliced.extend(edge.points.iter().rev().skip(1).map(String::as_str));
        } else {
            spliced.extend(edge.points.iter().skip(1).map(String::as_str));
        }
    }

    Ok(spliced)
}
