//! Graph flavours and the edge records each one stores.
//!
//! | flavour | records per edge | record |
//! |---|---|---|
//! | [`Directed`] | 1, in the source | [`Edge`] |
//! | [`Undirected`] | 2, one per endpoint | [`Edge`] |
//! | [`UndirectedEmbedded`] | 2, cross-referenced | [`EmbeddedEdge`] |
//! | [`DirectedEmbedded`] | 2, cross-referenced, one inverted | [`DirectedEmbeddedEdge`] |
//!
//! "Embedded" records carry the index of their partner record inside the
//! partner's partition, so the reciprocal of any record is found in O(1).

use std::fmt;

use crate::config::FlavourKind;

pub trait Flavour: fmt::Debug + Default + Copy + 'static {
    const KIND: FlavourKind;
    const DIRECTED: bool;
    const EMBEDDED: bool;

    type Record<H: Clone + fmt::Debug + PartialEq>: EdgeRecord<H>;
}

pub trait EdgeRecord<H>: Clone + fmt::Debug + PartialEq {
    /// Build a record; fields the record type does not carry are ignored.
    fn link(source: usize, target: usize, complement: usize, inverted: bool, weight: H) -> Self;

    fn target(&self) -> usize;

    fn source(&self) -> Option<usize> {
        None
    }

    /// Index of the partner record inside the partner's host partition.
    fn complementary_index(&self) -> Option<usize> {
        None
    }

    /// True for the incoming half of a directed-embedded edge.
    fn is_inverted(&self) -> bool {
        false
    }

    fn weight(&self) -> &H;

    fn weight_mut(&mut self) -> &mut H;

    fn set_complementary_index(&mut self, _index: usize) {}

    fn remap_nodes(&mut self, f: impl Fn(usize) -> usize);

    /// The node at the other end, seen from the record's host.
    fn neighbour(&self) -> usize {
        match self.source() {
            Some(source) if self.is_inverted() => source,
            _ => self.target(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Directed;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Undirected;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirectedEmbedded;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UndirectedEmbedded;

impl Flavour for Directed {
    const KIND: FlavourKind = FlavourKind::Directed;
    const DIRECTED: bool = true;
    const EMBEDDED: bool = false;

    type Record<H: Clone + fmt::Debug + PartialEq> = Edge<H>;
}

impl Flavour for Undirected {
    const KIND: FlavourKind = FlavourKind::Undirected;
    const DIRECTED: bool = false;
    const EMBEDDED: bool = false;

    type Record<H: Clone + fmt::Debug + PartialEq> = Edge<H>;
}

impl Flavour for DirectedEmbedded {
    const KIND: FlavourKind = FlavourKind::DirectedEmbedded;
    const DIRECTED: bool = true;
    const EMBEDDED: bool = true;

    type Record<H: Clone + fmt::Debug + PartialEq> = DirectedEmbeddedEdge<H>;
}

impl Flavour for UndirectedEmbedded {
    const KIND: FlavourKind = FlavourKind::UndirectedEmbedded;
    const DIRECTED: bool = false;
    const EMBEDDED: bool = true;

    type Record<H: Clone + fmt::Debug + PartialEq> = EmbeddedEdge<H>;
}

/// Target plus weight.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge<H> {
    pub target: usize,
    pub weight: H,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddedEdge<H> {
    pub target: usize,
    pub complement: usize,
    pub weight: H,
}

/// Stored in both endpoints; `source`/`target` are the same in both halves.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectedEmbeddedEdge<H> {
    pub source: usize,
    pub target: usize,
    pub complement: usize,
    pub inverted: bool,
    pub weight: H,
}

impl<H: Clone + fmt::Debug + PartialEq> EdgeRecord<H> for Edge<H> {
    fn link(_source: usize, target: usize, _complement: usize, _inverted: bool, weight: H) -> Self {
        Self { target, weight }
    }

    fn target(&self) -> usize {
        self.target
    }

    fn weight(&self) -> &H {
        &self.weight
    }

    fn weight_mut(&mut self) -> &mut H {
        &mut self.weight
    }

    fn remap_nodes(&mut self, f: impl Fn(usize) -> usize) {
        self.target = f(self.target);
    }
}

impl<H: Clone + fmt::Debug + PartialEq> EdgeRecord<H> for EmbeddedEdge<H> {
    fn link(_source: usize, target: usize, complement: usize, _inverted: bool, weight: H) -> Self {
        Self {
            target,
            complement,
            weight,
        }
    }

    fn target(&self) -> usize {
        self.target
    }

    fn complementary_index(&self) -> Option<usize> {
        Some(self.complement)
    }

    fn weight(&self) -> &H {
        &self.weight
    }

    fn weight_mut(&mut self) -> &mut H {
        &mut self.weight
    }

    fn set_complementary_index(&mut self, index: usize) {
        self.complement = index;
    }

    fn remap_nodes(&mut self, f: impl Fn(usize) -> usize) {
        self.target = f(self.target);
    }
}

impl<H: Clone + fmt::Debug + PartialEq> EdgeRecord<H> for DirectedEmbeddedEdge<H> {
    fn link(source: usize, target: usize, complement: usize, inverted: bool, weight: H) -> Self {
        Self {
            source,
            target,
            complement,
            inverted,
            weight,
        }
    }

    fn target(&self) -> usize {
        self.target
    }

    fn source(&self) -> Option<usize> {
        Some(self.source)
    }

    fn complementary_index(&self) -> Option<usize> {
        Some(self.complement)
    }

    fn is_inverted(&self) -> bool {
        self.inverted
    }

    fn weight(&self) -> &H {
        &self.weight
    }

    fn weight_mut(&mut self) -> &mut H {
        &mut self.weight
    }

    fn set_complementary_index(&mut self, index: usize) {
        self.complement = index;
    }

    fn remap_nodes(&mut self, f: impl Fn(usize) -> usize) {
        self.source = f(self.source);
        self.target = f(self.target);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_edge_ignores_extra_fields() {
        let e = <Edge<u8> as EdgeRecord<u8>>::link(4, 2, 9, true, 7);
        assert_eq!(e, Edge { target: 2, weight: 7 });
        assert_eq!(e.neighbour(), 2);
        assert_eq!(e.complementary_index(), None);
        assert!(!e.is_inverted());
    }

    #[test]
    fn test_inverted_neighbour_is_source() {
        let out = DirectedEmbeddedEdge::link(1, 3, 0, false, ());
        let inc = DirectedEmbeddedEdge::link(1, 3, 0, true, ());
        assert_eq!(out.neighbour(), 3);
        assert_eq!(inc.neighbour(), 1);
    }

    #[test]
    fn test_remap_and_complement() {
        let mut e = DirectedEmbeddedEdge::link(5, 2, 1, false, 'w');
        e.remap_nodes(|n| if n > 2 { n - 1 } else { n });
        e.set_complementary_index(6);
        assert_eq!((e.source, e.target, e.complement), (4, 2, 6));

        let mut u = EmbeddedEdge::link(0, 8, 3, false, 'x');
        u.remap_nodes(|n| n + 1);
        assert_eq!(u.target(), 9);
        assert_eq!(u.complementary_index(), Some(3));
    }

    #[test]
    fn test_flavour_constants() {
        assert!(Directed::DIRECTED && !Directed::EMBEDDED);
        assert!(!UndirectedEmbedded::DIRECTED && UndirectedEmbedded::EMBEDDED);
        assert_eq!(DirectedEmbedded::KIND, FlavourKind::DirectedEmbedded);
    }
}
