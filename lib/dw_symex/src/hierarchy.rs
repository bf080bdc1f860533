//! Classes hierarchy graph representation.
//!
//! The hierarchy is used to decide whether a reference can be stored into an
//! array of a given element type. It only holds what the caller registered:
//! when the ancestry of a class is not completely known, assignability cannot
//! be refuted and is assumed.

use dw_dex::types::Type;
use lazy_static::lazy_static;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Dfs;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

pub const JAVA_LANG_OBJECT: &str = "java/lang/Object";

lazy_static! {
    /// Interfaces implemented by every array type.
    static ref ARRAY_INTERFACES: BTreeSet<&'static str> =
        ["java/lang/Cloneable", "java/io/Serializable"].into_iter().collect();
}

#[derive(Debug, PartialEq, Eq)]
pub enum Inheritance {
    Extends,
    Implements,
}

impl fmt::Display for Inheritance {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Extends => write!(f, "<extends>"),
            Self::Implements => write!(f, "<implements>"),
        }
    }
}

#[derive(Debug, Default)]
pub struct Hierarchy {
    inner: DiGraph<String, Inheritance>,
    node_ids: BTreeMap<String, NodeIndex>,
    // classes whose superclass is known
    defined: BTreeSet<String>,
}

impl Hierarchy {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn node(&mut self, class: &str) -> NodeIndex {
        if let Some(id) = self.node_ids.get(class) {
            return *id;
        }
        let id = self.inner.add_node(class.to_string());
        self.node_ids.insert(class.to_string(), id);
        id
    }

    pub fn insert_extends(&mut self, class: &str, superclass: &str) {
        self.insert_link(class, superclass, Inheritance::Extends);
        self.defined.insert(class.to_string());
    }

    pub fn insert_implements(&mut self, class: &str, interface: &str) {
        self.insert_link(class, interface, Inheritance::Implements);
    }

    fn insert_link(&mut self, from: &str, to: &str, link: Inheritance) {
        let src = self.node(from);
        let dst = self.node(to);
        log::trace!("hierarchy: {from} {link} {to}");
        self.inner.add_edge(src, dst, link);
    }

    #[must_use]
    pub fn contains_class(&self, class_name: &str) -> bool {
        self.node_ids.contains_key(class_name)
    }

    #[must_use]
    pub fn nb_classes(&self) -> usize {
        self.inner.node_count()
    }

    /// Returns the class itself and all its known superclasses and interfaces.
    #[must_use]
    pub fn all_parents(&self, class_name: &str) -> BTreeSet<String> {
        let mut parents = BTreeSet::new();
        if let Some(id) = self.node_ids.get(class_name) {
            let mut dfs = Dfs::new(&self.inner, *id);
            while let Some(id) = dfs.next(&self.inner) {
                parents.insert(self.inner[id].clone());
            }
        } else {
            parents.insert(class_name.to_string());
        }
        parents
    }

    /// Checks if `class_name` may be a subtype of `target`.
    ///
    /// Returns `false` only if the whole ancestry of `class_name` is known and
    /// does not contain `target`.
    #[must_use]
    pub fn is_subclass(&self, class_name: &str, target: &str) -> bool {
        let Some(id) = self.node_ids.get(class_name) else {
            return true;
        };
        let mut complete = true;
        let mut dfs = Dfs::new(&self.inner, *id);
        while let Some(id) = dfs.next(&self.inner) {
            let name = &self.inner[id];
            if name == target {
                return true;
            }
            if name != JAVA_LANG_OBJECT && !self.defined.contains(name) {
                complete = false;
            }
        }
        !complete
    }

    /// Checks if a value of type `from` can be stored where a `to` is expected,
    /// following Java assignment rules for references.
    #[must_use]
    pub fn is_assignable(&self, from: &Type, to: &Type) -> bool {
        match (from, to) {
            _ if from == to => true,
            (_, Type::Class(c)) if c == JAVA_LANG_OBJECT => from.is_reference(),
            (Type::Array(_, _), Type::Class(c)) => ARRAY_INTERFACES.contains(c.as_str()),
            (Type::Array(_, _), Type::Array(_, _)) => {
                match (from.element_type(), to.element_type()) {
                    (Ok(f), Ok(t)) if f.is_reference() && t.is_reference() => {
                        self.is_assignable(&f, &t)
                    }
                    _ => false,
                }
            }
            (Type::Class(c), Type::Class(t)) => self.is_subclass(c, t),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dw_dex::parse_type;

    fn assignable(h: &Hierarchy, from: &str, to: &str) -> bool {
        h.is_assignable(&parse_type(from).unwrap(), &parse_type(to).unwrap())
    }

    fn sample() -> Hierarchy {
        let mut h = Hierarchy::new();
        h.insert_extends("java/lang/Number", JAVA_LANG_OBJECT);
        h.insert_extends("java/lang/Integer", "java/lang/Number");
        h.insert_implements("java/lang/Integer", "java/lang/Comparable");
        h.insert_extends("java/lang/Comparable", JAVA_LANG_OBJECT);
        h.insert_extends("java/lang/String", JAVA_LANG_OBJECT);
        h
    }

    #[test]
    fn parents() {
        let h = sample();
        let parents = h.all_parents("java/lang/Integer");
        assert!(parents.contains("java/lang/Integer"));
        assert!(parents.contains("java/lang/Number"));
        assert!(parents.contains("java/lang/Comparable"));
        assert!(parents.contains(JAVA_LANG_OBJECT));
        assert_eq!(h.nb_classes(), 5);
        assert!(h.contains_class("java/lang/Comparable"));
    }

    #[test]
    fn class_assignability() {
        let h = sample();
        assert!(assignable(&h, "Ljava/lang/Integer;", "Ljava/lang/Number;"));
        assert!(assignable(&h, "Ljava/lang/Integer;", "Ljava/lang/Comparable;"));
        assert!(!assignable(&h, "Ljava/lang/Integer;", "Ljava/lang/String;"));
        assert!(!assignable(&h, "Ljava/lang/Number;", "Ljava/lang/Integer;"));
    }

    #[test]
    fn unknown_ancestry_is_assumed() {
        let mut h = sample();
        assert!(assignable(&h, "Lcom/example/Foo;", "Ljava/lang/String;"));
        h.insert_extends("com/example/Bar", "com/example/Base");
        assert!(assignable(&h, "Lcom/example/Bar;", "Ljava/lang/String;"));
        h.insert_extends("com/example/Base", JAVA_LANG_OBJECT);
        assert!(!assignable(&h, "Lcom/example/Bar;", "Ljava/lang/String;"));
    }

    #[test]
    fn array_assignability() {
        let h = sample();
        assert!(assignable(&h, "[I", "Ljava/lang/Object;"));
        assert!(assignable(&h, "[I", "Ljava/io/Serializable;"));
        assert!(!assignable(&h, "[I", "Ljava/lang/String;"));
        assert!(!assignable(&h, "[I", "[J"));
        assert!(!assignable(&h, "[I", "[Ljava/lang/Object;"));
        assert!(assignable(&h, "[[I", "[Ljava/lang/Object;"));
        assert!(assignable(&h, "[Ljava/lang/Integer;", "[Ljava/lang/Number;"));
        assert!(!assignable(&h, "[Ljava/lang/Number;", "[Ljava/lang/Integer;"));
        assert!(!assignable(&h, "Ljava/lang/Object;", "[I"));
        assert!(!assignable(&h, "I", "Ljava/lang/Object;"));
    }
}
