use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{ast::Name, error::Error, literal::Value};

/// `address` is set by the declaration. `offset` is the program offset of the
/// first reference seen before the declaration, if there was one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub address: Option<u16>,
    pub offset: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Symbol {
    Const(Value),
    Label(Label),
}

/// Constants and labels share one namespace, keyed by lower-cased name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Symbols(IndexMap<String, Symbol>);

impl Symbols {
    pub fn new() -> Self {
        Symbols(IndexMap::new())
    }

    pub fn get(&self, key: &str) -> Option<&Symbol> {
        self.0.get(key)
    }

    pub fn constant(&self, key: &str) -> Option<&Value> {
        match self.0.get(key) {
            Some(Symbol::Const(value)) => Some(value),
            _ => None,
        }
    }

    pub fn label(&self, key: &str) -> Option<&Label> {
        match self.0.get(key) {
            Some(Symbol::Label(label)) => Some(label),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Symbol)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn declare_const(&mut self, name: &Name, value: Value) -> Result<(), Error> {
        let key = name.key();
        if self.0.contains_key(&key) {
            return Err(Error::DuplicateName(name.pos, name.text.clone()));
        }
        self.0.insert(key, Symbol::Const(value));
        Ok(())
    }

    /// Declares a label, filling in the placeholder left by earlier forward
    /// references.
    pub fn declare_label(&mut self, name: &Name, address: u16) -> Result<(), Error> {
        match self.0.get_mut(&name.key()) {
            Some(Symbol::Label(label)) if label.address.is_none() => {
                label.address = Some(address);
                Ok(())
            }
            Some(_) => Err(Error::DuplicateName(name.pos, name.text.clone())),
            None => {
                self.0.insert(
                    name.key(),
                    Symbol::Label(Label {
                        address: Some(address),
                        offset: None,
                    }),
                );
                Ok(())
            }
        }
    }

    /// Returns the label's address when it is already declared. Otherwise
    /// records a placeholder at `offset` and returns `None`.
    pub fn resolve_label_reference(
        &mut self,
        name: &Name,
        offset: u32,
    ) -> Result<Option<u16>, Error> {
        match self.0.get(&name.key()) {
            Some(Symbol::Label(label)) => Ok(label.address),
            Some(Symbol::Const(_)) => Err(Error::UnsupportedOperation(
                name.pos,
                format!("`{}` is a constant and can't be used as a jump target", name.text),
            )),
            None => {
                self.0.insert(
                    name.key(),
                    Symbol::Label(Label {
                        address: None,
                        offset: Some(offset),
                    }),
                );
                Ok(None)
            }
        }
    }

    /// Labels that were referenced but never declared.
    pub fn undefined_labels(&self) -> impl Iterator<Item = &str> {
        self.0.iter().filter_map(|(key, symbol)| match symbol {
            Symbol::Label(Label { address: None, .. }) => Some(key.as_str()),
            _ => None,
        })
    }

    pub fn count(&self) -> (usize, usize) {
        let labels = self
            .0
            .values()
            .filter(|s| matches!(s, Symbol::Label(_)))
            .count();
        (labels, self.0.len() - labels)
    }
}
