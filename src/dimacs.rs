/*
 * Copyright (c) 2017, 2022 Frank Fischer <frank-fischer@shadow-soft.de>
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

//! Reading and writing multi-commodity flow instances in a DIMACS-like
//! format.
//!
//! A file must look as follows.
//!
//! 1. empty lines are allowed and ignored
//! 2. a line starting with `c` is a comment line and is ignored
//! 3. the first non-comment line must have the form `p mcmf <n> <m> <k>`,
//!    where `<n>` is the number of nodes, `<m>` the number of arcs and `<k>`
//!    the number of commodities.
//! 4. the problem line is followed by lines of the following forms in any
//!    order:
//!    - `t <type> <capacity>`: all nodes of type `<type>` have the given
//!      capacity. Nodes whose type has no such line are uncapacitated.
//!    - `n <node> <type> [<name>]`: node `<node>` (between `1..n`) has the
//!      given type and name. The default type is 0 and the default name is
//!      the node number.
//!    - `a <u> <v> <cost> <capacity>`: an arc from `<u>` to `<v>`; there
//!      must be exactly `m` of these lines.
//!    - `k <origin> <destination> <demand>`: a commodity; there must be
//!      exactly `k` of these lines.
//!
//! Capacities may be `inf`. Names must not contain whitespace.

use crate::network::{Network, NetworkBuilder, NodeId};

use std::fmt::Display;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read, Write};
use std::path::Path;
use std::str::{FromStr, SplitWhitespace};
use thiserror::Error;

/// Error when reading a file in DIMACS format.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("Format error on line {line}: {msg}")]
    Format { line: usize, msg: String },
    #[error("Data error on line {line}: {msg}")]
    Data { line: usize, msg: String },
}

pub type Result<T> = std::result::Result<T, Error>;

struct DimacsReader<R: Read> {
    io: BufReader<R>,
    line: String,
    line_number: usize,
}

impl<R: Read> DimacsReader<R> {
    fn new(reader: R) -> Self {
        DimacsReader {
            io: BufReader::new(reader),
            line: String::new(),
            line_number: 0,
        }
    }

    /// Return the tokens of the next non-comment line.
    fn read_line(&mut self) -> Result<Option<Tokens<'_>>> {
        let line = &mut self.line;
        loop {
            line.clear();
            if self.io.read_line(line)? == 0 {
                return Ok(None);
            }
            self.line_number += 1;

            let skip = {
                let trimmed = line.trim_start();
                trimmed.is_empty() || trimmed.starts_with('c')
            };
            if skip {
                continue;
            }
            return Ok(Some(Tokens {
                it: line.split_whitespace(),
                line: self.line_number,
            }));
        }
    }

    /// Read the next line and return its descriptor and *remaining* tokens.
    ///
    /// The descriptor must be one of `descriptors`.
    fn read_one_line_of(&mut self, descriptors: &[&str]) -> Result<Option<(&str, Tokens<'_>)>> {
        if let Some(mut toks) = self.read_line()? {
            let line = toks.line;
            match toks.next() {
                Some(d) if descriptors.iter().any(|&desc| desc == d) => Ok(Some((d, toks))),
                Some(d) => Err(Error::Format {
                    line,
                    msg: format!("unexpected line, expected one of '{}', got '{}'", descriptors.join("', '"), d),
                }),
                None => Err(Error::Format {
                    line,
                    msg: "unexpected empty line".to_string(),
                }),
            }
        } else {
            Ok(None)
        }
    }
}

/// Iterates over the tokens in a line.
struct Tokens<'a> {
    it: SplitWhitespace<'a>,
    line: usize,
}

impl<'a> Iterator for Tokens<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        self.it.next()
    }
}

impl<'a> Tokens<'a> {
    /// Return an error if the next token is not the given token.
    fn expect(&mut self, tok: &str) -> Result<()> {
        let nxt = self.str()?;
        if nxt == tok {
            Ok(())
        } else {
            Err(Error::Format {
                line: self.line,
                msg: format!("expected '{}', got '{}'", tok, nxt),
            })
        }
    }

    fn str(&mut self) -> Result<&'a str> {
        let line = self.line;
        self.it.next().ok_or_else(|| Error::Format {
            line,
            msg: "expected token".to_string(),
        })
    }

    /// Returns the next token converted to a number.
    fn number<T>(&mut self) -> Result<T>
    where
        T: FromStr,
        T::Err: Display,
    {
        let line = self.line;
        self.str()?.parse().map_err(|e| Error::Format {
            line,
            msg: format!("{}", e),
        })
    }

    /// Returns the next token as node index between `1..=n`, converted to
    /// a 0-based index.
    fn node(&mut self, n: usize, what: &str) -> Result<usize> {
        let u: usize = self.number()?;
        if u < 1 || u > n {
            return Err(Error::Data {
                line: self.line,
                msg: format!("invalid {} id {} (must be in 1..{})", what, u, n),
            });
        }
        Ok(u - 1)
    }

    /// Ensures that there is no next token.
    fn end(&mut self) -> Result<()> {
        if let Some(s) = self.it.next() {
            Err(Error::Format {
                line: self.line,
                msg: format!("unexpected token at end of line: {}", s),
            })
        } else {
            Ok(())
        }
    }
}

/// Read a network from `r`.
pub fn read<R: Read>(r: R) -> Result<Network> {
    let mut reader = DimacsReader::new(r);

    // Read the problem line.
    let mut pline = reader.read_line()?.ok_or_else(|| Error::Format {
        line: 0,
        msg: "unexpected end of file, expected 'p' line".to_string(),
    })?;
    pline.expect("p")?;
    pline.expect("mcmf")?;
    let nnodes: usize = pline.number()?;
    let narcs: usize = pline.number()?;
    let ncommodities: usize = pline.number()?;
    pline.end()?;

    let mut classes = vec![];
    let mut nodes: Vec<(usize, Option<String>)> = vec![(0, None); nnodes];
    let mut arcs = Vec::with_capacity(narcs);
    let mut commodities = Vec::with_capacity(ncommodities);

    while let Some((d, mut toks)) = reader.read_one_line_of(&["t", "n", "a", "k"])? {
        match d {
            "t" => {
                let kind: usize = toks.number()?;
                let cap: f64 = toks.number()?;
                classes.push((kind, cap));
            }
            "n" => {
                let u = toks.node(nnodes, "node")?;
                let kind: usize = toks.number()?;
                let name = toks.next().map(str::to_string);
                nodes[u] = (kind, name);
            }
            "a" => {
                if arcs.len() == narcs {
                    return Err(Error::Data {
                        line: toks.line,
                        msg: format!("unexpected 'a' line (expected exactly {} arcs)", narcs),
                    });
                }
                let u = toks.node(nnodes, "tail node")?;
                let v = toks.node(nnodes, "head node")?;
                let cost: f64 = toks.number()?;
                let cap: f64 = toks.number()?;
                arcs.push((u, v, cost, cap));
            }
            _ => {
                if commodities.len() == ncommodities {
                    return Err(Error::Data {
                        line: toks.line,
                        msg: format!("unexpected 'k' line (expected exactly {} commodities)", ncommodities),
                    });
                }
                let s = toks.node(nnodes, "origin")?;
                let t = toks.node(nnodes, "destination")?;
                let demand: f64 = toks.number()?;
                commodities.push((s, t, demand));
            }
        }
        toks.end()?;
    }

    let line = reader.line_number;
    if arcs.len() != narcs {
        return Err(Error::Data {
            line,
            msg: format!("expected {} arcs, got {}", narcs, arcs.len()),
        });
    }
    if commodities.len() != ncommodities {
        return Err(Error::Data {
            line,
            msg: format!("expected {} commodities, got {}", ncommodities, commodities.len()),
        });
    }

    let mut b = NetworkBuilder::with_capacities(nnodes, narcs, ncommodities);
    for (kind, cap) in classes {
        b.set_class_capacity(kind, cap);
    }
    for (i, (kind, name)) in nodes.into_iter().enumerate() {
        b.add_node(name.unwrap_or_else(|| (i + 1).to_string()), kind);
    }
    for (u, v, cost, cap) in arcs {
        b.add_arc(NodeId::new(u), NodeId::new(v), cost, cap);
    }
    for (s, t, demand) in commodities {
        b.add_commodity(NodeId::new(s), NodeId::new(t), demand);
    }

    b.into_network().map_err(|e| Error::Data { line, msg: e.to_string() })
}

/// Read a network from the file `path`.
pub fn read_from_file<P: AsRef<Path>>(path: P) -> Result<Network> {
    read(File::open(path)?)
}

/// Write a network.
///
/// Node capacities are written as one class per distinct node type.
pub fn write<W: Write>(mut w: W, net: &Network) -> io::Result<()> {
    writeln!(w, "p mcmf {} {} {}", net.num_nodes(), net.num_arcs(), net.num_commodities())?;

    let mut classes: Vec<(usize, f64)> = net
        .nodes()
        .map(|u| net.node(u))
        .filter(|n| n.capacity.is_finite())
        .map(|n| (n.kind, n.capacity))
        .collect();
    classes.sort_by_key(|&(kind, _)| kind);
    classes.dedup_by_key(|&mut (kind, _)| kind);
    for (kind, cap) in classes {
        writeln!(w, "t {} {}", kind, cap)?;
    }

    for u in net.nodes() {
        let node = net.node(u);
        writeln!(w, "n {} {} {}", u.index() + 1, node.kind, node.name)?;
    }
    for a in net.arcs() {
        let arc = net.arc(a);
        writeln!(
            w,
            "a {} {} {} {}",
            arc.tail.index() + 1,
            arc.head.index() + 1,
            arc.cost,
            arc.capacity
        )?;
    }
    for k in net.commodities() {
        let c = net.commodity(k);
        writeln!(w, "k {} {} {}", c.origin.index() + 1, c.destination.index() + 1, c.demand)?;
    }

    Ok(())
}

/// Write a network to the file `path`.
pub fn write_to_file<P: AsRef<Path>>(path: P, net: &Network) -> io::Result<()> {
    let mut w = io::BufWriter::new(File::create(path)?);
    write(&mut w, net)?;
    w.flush()
}

#[cfg(test)]
mod tests {
    use super::{read, write, Error};
    use crate::network::{ArcId, CommodityId, NodeId};

    const INSTANCE: &str = "c triangle
p mcmf 3 3 1
t 1 20
n 1 0 A
n 2 1 B
n 3 0
a 1 2 1 10
a 2 3 1 3
a 1 3 5 inf

k 1 3 5
";

    #[test]
    fn test_read() {
        let net = read(INSTANCE.as_bytes()).unwrap();
        assert_eq!(net.num_nodes(), 3);
        assert_eq!(net.num_arcs(), 3);
        assert_eq!(net.num_commodities(), 1);
        assert_eq!(net.node(NodeId::new(0)).name, "A");
        assert_eq!(net.node(NodeId::new(2)).name, "3");
        assert_eq!(net.node(NodeId::new(1)).capacity, 20.0);
        assert_eq!(net.node(NodeId::new(0)).capacity, f64::INFINITY);
        assert_eq!(net.arc(ArcId::new(1)).capacity, 3.0);
        assert_eq!(net.arc(ArcId::new(2)).capacity, f64::INFINITY);
        assert_eq!(net.commodity(CommodityId::new(0)).demand, 5.0);

        let mut buf = vec![];
        write(&mut buf, &net).unwrap();
        let again = read(&buf[..]).unwrap();
        assert_eq!(again.node(NodeId::new(1)).name, "B");
        assert_eq!(again.node(NodeId::new(1)).capacity, 20.0);
        assert_eq!(again.arc(ArcId::new(2)).head, NodeId::new(2));
    }

    #[test]
    fn test_errors() {
        let res = read("p mcmf 2 1 0\na 1 3 1 1\n".as_bytes());
        assert!(matches!(res, Err(Error::Data { line: 2, .. })));

        let res = read("p mcmf 2 1 0\na 1 2 1\n".as_bytes());
        assert!(matches!(res, Err(Error::Format { line: 2, .. })));

        let res = read("p mcmf 2 2 0\na 1 2 1 1\n".as_bytes());
        assert!(matches!(res, Err(Error::Data { .. })));

        let res = read("p min 2 2\n".as_bytes());
        assert!(matches!(res, Err(Error::Format { line: 1, .. })));

        let res = read("p mcmf 2 1 0\nx 1 2\n".as_bytes());
        assert!(matches!(res, Err(Error::Format { line: 2, .. })));

        let res = read("p mcmf 2 1 0\na 1 2 -1 1\n".as_bytes());
        assert!(matches!(res, Err(Error::Data { .. })));
    }
}
