use indexmap::IndexSet;

use crate::{
    structure::AttributeStructure,
    utils::error::{VividError, VividResult},
};

/// A finite, ordered universe of objects over an attribute structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeSystem {
    structure: AttributeStructure,
    objects: IndexSet<String>,
}

impl AttributeSystem {
    pub fn new<O: Into<String>>(
        structure: AttributeStructure,
        objects: impl IntoIterator<Item = O>,
    ) -> VividResult<Self> {
        let mut system = Self {
            structure,
            objects: IndexSet::new(),
        };
        for object in objects {
            system.add_object(object)?;
        }
        Ok(system)
    }

    pub fn add_object(&mut self, object: impl Into<String>) -> VividResult<()> {
        let object = object.into();
        if self.objects.contains(&object) {
            return Err(VividError::DuplicateObject(object));
        }
        self.objects.insert(object);
        Ok(())
    }

    #[inline]
    pub fn structure(&self) -> &AttributeStructure {
        &self.structure
    }

    #[inline]
    pub fn objects(&self) -> &IndexSet<String> {
        &self.objects
    }

    #[inline]
    pub fn contains_object(&self, object: &str) -> bool {
        self.objects.contains(object)
    }

    /// Every `(label, object)` pair, attribute-major.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.structure.labels().flat_map(move |label| {
            self.objects
                .iter()
                .map(move |object| (label, object.as_str()))
        })
    }
}
