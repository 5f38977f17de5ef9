use super::{Converter, Expression, Placeholder, Statement};
use crate::session::Request;

/// Stable handle to a domain object owned by a [`Program`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(usize);

impl ObjectId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Domain objects that can travel through the syntax tree behind a
/// [`Placeholder`].
#[derive(Debug, Clone, PartialEq)]
pub enum DomainObject {
    Request(Request),
    /// Arbitrary structured data attached by plugins.
    Data(serde_json::Value),
}

impl DomainObject {
    pub fn kind(&self) -> &'static str {
        match self {
            DomainObject::Request(_) => "request",
            DomainObject::Data(_) => "data value",
        }
    }

    pub fn as_request(&self) -> Option<&Request> {
        match self {
            DomainObject::Request(r) => Some(r),
            DomainObject::Data(_) => None,
        }
    }
}

/// Arena of the domain objects placeholders point to.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Objects {
    items: Vec<DomainObject>,
}

impl Objects {
    pub fn insert(&mut self, object: DomainObject) -> ObjectId {
        self.items.push(object);
        ObjectId(self.items.len() - 1)
    }

    pub fn get(&self, id: ObjectId) -> Option<&DomainObject> {
        self.items.get(id.0)
    }

    /// Swaps in a new value; every placeholder pointing at `id` will render it.
    pub fn replace(&mut self, id: ObjectId, object: DomainObject) -> Option<DomainObject> {
        self.items
            .get_mut(id.0)
            .map(|slot| std::mem::replace(slot, object))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ObjectId, &DomainObject)> {
        self.items.iter().enumerate().map(|(i, o)| (ObjectId(i), o))
    }
}

/// An ordered sequence of statements, in final output order, together with
/// the objects its placeholders refer to.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
    pub statements: Vec<Statement>,
    objects: Objects,
}

impl Program {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, statement: Statement) {
        self.statements.push(statement);
    }

    pub fn objects(&self) -> &Objects {
        &self.objects
    }

    pub fn object(&self, id: ObjectId) -> Option<&DomainObject> {
        self.objects.get(id)
    }

    pub fn replace_object(&mut self, id: ObjectId, object: DomainObject) -> Option<DomainObject> {
        self.objects.replace(id, object)
    }

    /// Moves `object` into the program and returns an expression standing for it.
    pub fn placeholder(
        &mut self,
        object: DomainObject,
        converter: Converter,
        name: impl Into<String>,
    ) -> Expression {
        let id = self.objects.insert(object);
        Expression::Placeholder(Placeholder::new(id, converter, name))
    }

    /// All placeholders in statement order.
    pub fn placeholders(&self) -> Vec<&Placeholder> {
        let mut found = Vec::new();
        for stmt in &self.statements {
            stmt.walk_expressions(&mut |e| {
                if let Expression::Placeholder(p) = e {
                    found.push(p);
                }
            });
        }
        found
    }

    pub fn into_parts(self) -> (Vec<Statement>, Objects) {
        (self.statements, self.objects)
    }
}
