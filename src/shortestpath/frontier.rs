// Copyright (c) 2016-2022 Frank Fischer <frank-fischer@shadow-soft.de>
//
// This program is free software: you can redistribute it and/or
// modify it under the terms of the GNU General Public License as
// published by the Free Software Foundation, either version 3 of the
// License, or (at your option) any later version.
//
// This program is distributed in the hope that it will be useful, but
// WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU
// General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see  <http://www.gnu.org/licenses/>
//

//! Node-indexed binary heap used as the frontier of label-correcting searches.

const NONE: u32 = u32::MAX;

/// A binary heap over node indices.
///
/// The priority of a node is its current label; ties are broken by the node
/// index, so the node with the smallest `(label, index)` pair is extracted
/// first. The labels are owned by the caller and passed to every operation.
/// A label may only decrease while its node is on the heap.
pub(super) struct Frontier {
    /// The heap elements.
    heap: Vec<u32>,
    /// Position of each node on the heap, `NONE` if the node is not on it.
    pos: Vec<u32>,
}

impl Frontier {
    pub fn new(n: usize) -> Self {
        Frontier {
            heap: Vec::with_capacity(n),
            pos: vec![NONE; n],
        }
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    #[cfg(test)]
    pub fn contains(&self, u: usize) -> bool {
        self.pos[u] != NONE
    }

    /// Add `u` to the frontier or restore the heap order after its label
    /// has decreased.
    pub fn push_or_decrease<D: PartialOrd>(&mut self, u: usize, labels: &[D]) {
        if self.pos[u] == NONE {
            self.pos[u] = self.heap.len() as u32;
            self.heap.push(u as u32);
        }
        self.upheap(u, labels);
    }

    /// Remove and return the node with the smallest label.
    pub fn pop_min<D: PartialOrd>(&mut self, labels: &[D]) -> Option<usize> {
        if self.heap.is_empty() {
            return None;
        }

        let min = self.heap.swap_remove(0) as usize;
        self.pos[min] = NONE;

        if !self.heap.is_empty() {
            let n = self.heap.len();
            let item = self.heap[0] as usize;
            let mut cur_pos = 0;
            loop {
                let left_pos = 2 * cur_pos + 1;
                let right_pos = left_pos + 1;
                let next_pos = if left_pos >= n {
                    break;
                } else if right_pos >= n || less(self.heap[left_pos] as usize, self.heap[right_pos] as usize, labels) {
                    left_pos
                } else {
                    right_pos
                };

                let next = self.heap[next_pos] as usize;
                if !less(next, item, labels) {
                    break;
                }

                self.heap[cur_pos] = next as u32;
                self.pos[next] = cur_pos as u32;
                cur_pos = next_pos;
            }
            self.heap[cur_pos] = item as u32;
            self.pos[item] = cur_pos as u32;
        }

        Some(min)
    }

    /// Move `u` up in the heap until its parent is smaller or the root is
    /// reached.
    fn upheap<D: PartialOrd>(&mut self, u: usize, labels: &[D]) {
        let mut cur_pos = self.pos[u] as usize;
        while cur_pos > 0 {
            let parent_pos = (cur_pos - 1) / 2;
            let parent = self.heap[parent_pos] as usize;
            if !less(u, parent, labels) {
                break;
            }
            self.heap[cur_pos] = parent as u32;
            self.pos[parent] = cur_pos as u32;
            cur_pos = parent_pos;
        }
        self.heap[cur_pos] = u as u32;
        self.pos[u] = cur_pos as u32;
    }
}

/// Strict `(label, index)` order.
fn less<D: PartialOrd>(u: usize, v: usize, labels: &[D]) -> bool {
    labels[u] < labels[v] || (labels[u] == labels[v] && u < v)
}
