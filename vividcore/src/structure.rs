use std::collections::BTreeMap;

use indexmap::IndexMap;

use crate::{
    attribute::Attribute,
    relation::Relation,
    utils::error::{VividError, VividResult},
};

/// Attributes and the relations ranging over them.
///
/// Every label in the domain of a relation is an attribute of the structure.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeStructure {
    attributes: IndexMap<String, Attribute>,
    relations: BTreeMap<u64, Relation>,
}

impl AttributeStructure {
    pub fn new(
        attributes: impl IntoIterator<Item = Attribute>,
        relations: impl IntoIterator<Item = Relation>,
    ) -> VividResult<Self> {
        let mut structure = Self::default();
        for attribute in attributes {
            structure.add_attribute(attribute)?;
        }
        for relation in relations {
            structure.add_relation(relation)?;
        }
        Ok(structure)
    }

    pub fn add_attribute(&mut self, attribute: Attribute) -> VividResult<()> {
        if self.attributes.contains_key(attribute.label()) {
            return Err(VividError::DuplicateAttribute(attribute.label().to_string()));
        }
        self.attributes.insert(attribute.label().to_string(), attribute);
        Ok(())
    }

    /// Remove an attribute no relation ranges over.
    pub fn remove_attribute(&mut self, label: &str) -> VividResult<Attribute> {
        if let Some(relation) = self
            .relations
            .values()
            .find(|relation| relation.domain().iter().any(|l| l == label))
        {
            return Err(VividError::AttributeInUse {
                label: label.to_string(),
                subscript: relation.subscript(),
            });
        }
        self.attributes
            .shift_remove(label)
            .ok_or_else(|| VividError::UnknownAttribute(label.to_string()))
    }

    pub fn add_relation(&mut self, relation: Relation) -> VividResult<()> {
        if self.relations.contains_key(&relation.subscript()) {
            return Err(VividError::DuplicateRelation(relation.subscript()));
        }
        if let Some(label) = relation
            .domain()
            .iter()
            .find(|label| !self.attributes.contains_key(label.as_str()))
        {
            return Err(VividError::UnknownAttribute(label.clone()));
        }
        self.relations.insert(relation.subscript(), relation);
        Ok(())
    }

    pub fn remove_relation(&mut self, subscript: u64) -> VividResult<Relation> {
        self.relations
            .remove(&subscript)
            .ok_or(VividError::UnknownRelation(subscript))
    }

    pub fn attribute(&self, label: &str) -> VividResult<&Attribute> {
        self.attributes
            .get(label)
            .ok_or_else(|| VividError::UnknownAttribute(label.to_string()))
    }

    pub fn relation(&self, subscript: u64) -> VividResult<&Relation> {
        self.relations
            .get(&subscript)
            .ok_or(VividError::UnknownRelation(subscript))
    }

    /// Attributes, in insertion order.
    pub fn attributes(&self) -> impl Iterator<Item = &Attribute> {
        self.attributes.values()
    }

    pub fn relations(&self) -> impl Iterator<Item = &Relation> {
        self.relations.values()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.attributes.keys().map(String::as_str)
    }

    #[inline]
    pub fn contains_attribute(&self, label: &str) -> bool {
        self.attributes.contains_key(label)
    }
}
