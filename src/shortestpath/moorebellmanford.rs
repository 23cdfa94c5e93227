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

use super::ShortestPathTree;
use crate::error::{Error, Result};
use crate::network::{ArcId, Network, NodeId};

use num_traits::Float;

/// The shortest-path algorithm by Moore-Bellman-Ford on a directed network.
///
/// In contrast to [`label_correcting`](super::label_correcting) the arc
/// weights may be negative. If a negative cycle is reachable from `src`,
/// [`Error::NegativeCycle`] with some node on or behind that cycle is
/// returned.
///
/// # Example
///
/// ```
/// use rs_colgen::Network;
/// use rs_colgen::shortestpath::moorebellmanford;
///
/// let mut weights = vec![];
/// let net = Network::new_with(|b| {
///     let nodes: Vec<_> = (0..7).map(|i| b.add_node(format!("{}", i), 0)).collect();
///     for &(u,v,w) in [(0,1,-8), (1,4,-3), (2,0,2), (2,1,1), (2,5,-3), (3,1,0), (3,2,5),
///                      (4,3,8), (5,3,-1), (6,3,4), (6,4,6), (6,5,3)].iter()
///     {
///         b.add_arc(nodes[u], nodes[v], 0.0, 1.0);
///         weights.push(w as f64);
///     }
/// })
/// .unwrap();
///
/// let src = net.node_by_name("6").unwrap();
/// let tree = moorebellmanford::directed(&net, src, |a| weights[a.index()]).unwrap();
/// assert_eq!(tree.pred_node(src), None);
/// for &(u, p) in [(0, 2), (1, 0), (2, 3), (4, 1), (5, 6)].iter() {
///     let u = net.node_by_name(&u.to_string()).unwrap();
///     assert_eq!(tree.pred_node(u), net.node_by_name(&p.to_string()));
/// }
/// ```
pub fn directed<D, W>(net: &Network, src: NodeId, weights: W) -> Result<ShortestPathTree<D>>
where
    D: Float,
    W: Fn(ArcId) -> D,
{
    let n = net.num_nodes();
    let mut tree: ShortestPathTree<D> = ShortestPathTree::new(n, src);

    for i in 0..n {
        let mut changed = false;
        for a in net.arcs() {
            let du = tree.labels[net.tail(a).index()];

            // skip source nodes that have not been seen, yet
            if !du.is_finite() {
                continue;
            }

            let v = net.head(a);
            let newdist = du + weights(a);
            if newdist < tree.labels[v.index()] {
                tree.update(net, a, newdist);
                changed = true;

                if i + 1 == n {
                    return Err(Error::NegativeCycle { node: v });
                }
            }
        }
        if !changed {
            break;
        }
    }

    Ok(tree)
}
