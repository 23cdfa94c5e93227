/*
 * Copyright (c) 2022 Frank Fischer <frank-fischer@shadow-soft.de>
 *
 * This program is free software: you can redistribute it and/or
 * modify it under the terms of the GNU General Public License as
 * published by the Free Software Foundation, either version 3 of the
 * License, or (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful, but
 * WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU
 * General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program.  If not, see  <http://www.gnu.org/licenses/>
 */

//! The static multi-commodity network.
//!
//! A [`Network`] consists of nodes, arcs and commodities. Each node has a
//! type which selects its capacity class, each arc has a traversal cost and a
//! capacity and each commodity asks for `demand` units to be routed from its
//! origin to its destination.
//!
//! Networks are immutable. They are constructed with a [`NetworkBuilder`]
//! and converted into the final compact representation by
//! [`NetworkBuilder::into_network`].
//!
//! # Example
//!
//! ```
//! use rs_colgen::Network;
//!
//! let net = Network::new_with(|b| {
//!     let a = b.add_node("A", 0);
//!     let c = b.add_node("C", 0);
//!     b.add_arc(a, c, 5.0, 10.0);
//!     b.add_commodity(a, c, 5.0);
//! })
//! .unwrap();
//!
//! assert_eq!(net.num_nodes(), 2);
//! assert_eq!(net.num_arcs(), 1);
//! assert_eq!(net.num_commodities(), 1);
//! ```

use crate::error::{Error, Result};

use std::collections::HashMap;
use std::fmt;

#[cfg(feature = "serialize")]
use serde_derive::{Deserialize, Serialize};

macro_rules! index_type {
    ($(#[$attr:meta])* $name:ident, $prefix:expr) => {
        $(#[$attr])*
        #[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Debug, Hash)]
        #[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
        pub struct $name(u32);

        impl $name {
            pub fn new(index: usize) -> Self {
                debug_assert!(index < u32::MAX as usize, "Index out of range");
                $name(index as u32)
            }

            /// Return the (0-based) index of this item.
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter) -> std::result::Result<(), fmt::Error> {
                write!(f, "{}{}", $prefix, self.0)
            }
        }
    };
}

index_type!(
    /// Node of a network.
    NodeId,
    "v"
);
index_type!(
    /// Arc of a network.
    ArcId,
    "a"
);
index_type!(
    /// Commodity of a network.
    CommodityId,
    "k"
);

/// Data for a node.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct NodeData {
    /// The display name.
    pub name: String,
    /// The node type, selects the capacity class.
    pub kind: usize,
    /// Number of outgoing arcs.
    pub outdegree: usize,
    /// Maximal total flow through this node.
    ///
    /// This is `f64::INFINITY` if the node type has no capacity class.
    pub capacity: f64,
}

/// Data for an arc.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct ArcData {
    pub tail: NodeId,
    pub head: NodeId,
    pub cost: f64,
    pub capacity: f64,
}

/// An origin-destination demand.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Commodity {
    pub origin: NodeId,
    pub destination: NodeId,
    pub demand: f64,
}

/// A capacitated multi-commodity network.
#[derive(Clone, Debug)]
pub struct Network {
    nodes: Vec<NodeData>,
    arcs: Vec<ArcData>,
    commodities: Vec<Commodity>,
    // Offsets into `adj`: the outgoing arcs of node `u` are
    // `adj[firstout[u]..firstout[u + 1]]`.
    firstout: Vec<u32>,
    adj: Vec<ArcId>,
}

impl Network {
    /// Create a new network by passing a builder to the callback `f`.
    pub fn new_with<F>(f: F) -> Result<Network>
    where
        F: FnOnce(&mut NetworkBuilder),
    {
        let mut b = NetworkBuilder::new();
        f(&mut b);
        b.into_network()
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn num_arcs(&self) -> usize {
        self.arcs.len()
    }

    pub fn num_commodities(&self) -> usize {
        self.commodities.len()
    }

    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(NodeId::new)
    }

    pub fn arcs(&self) -> impl Iterator<Item = ArcId> + '_ {
        (0..self.arcs.len()).map(ArcId::new)
    }

    pub fn commodities(&self) -> impl Iterator<Item = CommodityId> + '_ {
        (0..self.commodities.len()).map(CommodityId::new)
    }

    pub fn node(&self, u: NodeId) -> &NodeData {
        &self.nodes[u.index()]
    }

    pub fn arc(&self, a: ArcId) -> &ArcData {
        &self.arcs[a.index()]
    }

    pub fn commodity(&self, k: CommodityId) -> &Commodity {
        &self.commodities[k.index()]
    }

    pub fn tail(&self, a: ArcId) -> NodeId {
        self.arcs[a.index()].tail
    }

    pub fn head(&self, a: ArcId) -> NodeId {
        self.arcs[a.index()].head
    }

    /// The outgoing arcs of `u` in insertion order.
    pub fn out_arcs(&self, u: NodeId) -> &[ArcId] {
        let uid = u.index();
        let beg = self.firstout[uid] as usize;
        let end = self.firstout[uid + 1] as usize;
        &self.adj[beg..end]
    }

    /// Find a node by its display name.
    pub fn node_by_name(&self, name: &str) -> Option<NodeId> {
        self.nodes.iter().position(|n| n.name == name).map(NodeId::new)
    }
}

/// A builder for a [`Network`].
///
/// Nodes, arcs and commodities are numbered consecutively in the order they
/// are added.
#[derive(Default)]
pub struct NetworkBuilder {
    nodes: Vec<NodeData>,
    arcs: Vec<ArcData>,
    commodities: Vec<Commodity>,
    classes: HashMap<usize, f64>,
}

impl NetworkBuilder {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn with_capacities(nnodes: usize, narcs: usize, ncommodities: usize) -> Self {
        NetworkBuilder {
            nodes: Vec::with_capacity(nnodes),
            arcs: Vec::with_capacity(narcs),
            commodities: Vec::with_capacity(ncommodities),
            classes: HashMap::new(),
        }
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn num_arcs(&self) -> usize {
        self.arcs.len()
    }

    pub fn num_commodities(&self) -> usize {
        self.commodities.len()
    }

    /// Set the capacity of all nodes of type `kind`.
    ///
    /// Nodes whose type has no capacity class are uncapacitated.
    pub fn set_class_capacity(&mut self, kind: usize, capacity: f64) {
        self.classes.insert(kind, capacity);
    }

    /// Add a new node with the given display name and type.
    pub fn add_node<S: Into<String>>(&mut self, name: S, kind: usize) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(NodeData {
            name: name.into(),
            kind,
            outdegree: 0,
            capacity: f64::INFINITY,
        });
        id
    }

    /// Add a new arc from `tail` to `head`.
    ///
    /// The end nodes may be added later, they are checked by
    /// [`NetworkBuilder::into_network`].
    pub fn add_arc(&mut self, tail: NodeId, head: NodeId, cost: f64, capacity: f64) -> ArcId {
        let id = ArcId::new(self.arcs.len());
        self.arcs.push(ArcData {
            tail,
            head,
            cost,
            capacity,
        });
        id
    }

    /// Add a new commodity.
    pub fn add_commodity(&mut self, origin: NodeId, destination: NodeId, demand: f64) -> CommodityId {
        let id = CommodityId::new(self.commodities.len());
        self.commodities.push(Commodity {
            origin,
            destination,
            demand,
        });
        id
    }

    /// Validate the data and turn the builder into a network.
    pub fn into_network(self) -> Result<Network> {
        let n = self.nodes.len();
        let check_node = |u: NodeId, what: &str| {
            if u.index() < n {
                Ok(())
            } else {
                Err(Error::Data {
                    msg: format!("{} {} out of range (network has {} nodes)", what, u, n),
                })
            }
        };

        for (i, arc) in self.arcs.iter().enumerate() {
            check_node(arc.tail, "tail node")?;
            check_node(arc.head, "head node")?;
            if !arc.cost.is_finite() || arc.cost < 0.0 {
                return Err(Error::Data {
                    msg: format!("arc {} has invalid cost {}", ArcId::new(i), arc.cost),
                });
            }
            if arc.capacity.is_nan() || arc.capacity < 0.0 {
                return Err(Error::Data {
                    msg: format!("arc {} has invalid capacity {}", ArcId::new(i), arc.capacity),
                });
            }
        }

        for (i, k) in self.commodities.iter().enumerate() {
            check_node(k.origin, "origin")?;
            check_node(k.destination, "destination")?;
            if !k.demand.is_finite() || k.demand < 0.0 {
                return Err(Error::Data {
                    msg: format!("commodity {} has invalid demand {}", CommodityId::new(i), k.demand),
                });
            }
        }

        for (&kind, &cap) in &self.classes {
            if cap.is_nan() || cap < 0.0 {
                return Err(Error::Data {
                    msg: format!("node type {} has invalid capacity {}", kind, cap),
                });
            }
        }

        let classes = self.classes;
        let mut nodes = self.nodes;
        for arc in &self.arcs {
            nodes[arc.tail.index()].outdegree += 1;
        }

        // counting sort of the arcs by tail, stable in insertion order
        let mut firstout = Vec::with_capacity(n + 1);
        let mut start = 0;
        for node in nodes.iter_mut() {
            node.capacity = classes.get(&node.kind).copied().unwrap_or(f64::INFINITY);
            firstout.push(start as u32);
            start += node.outdegree;
        }
        firstout.push(start as u32);

        let mut next: Vec<usize> = firstout[..n].iter().map(|&i| i as usize).collect();
        let mut adj = vec![ArcId::new(0); self.arcs.len()];
        for (i, arc) in self.arcs.iter().enumerate() {
            let u = arc.tail.index();
            adj[next[u]] = ArcId::new(i);
            next[u] += 1;
        }

        Ok(Network {
            nodes,
            arcs: self.arcs,
            commodities: self.commodities,
            firstout,
            adj,
        })
    }
}
