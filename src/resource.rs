//! Uniform attribute access for resource types.
//!
//! A resource's declared fields are its serde fields: [`HasAttributes`] reads
//! and writes them through their serialized names. Computed accessors
//! ("mutators") are registered per type in a [`Mutators`] table, keyed by the
//! [`studly`]-cased attribute name, so `tracking_number`, `tracking-number` and
//! `trackingNumber` all resolve to the same handler.

use crate::Error;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Computes the value of an attribute from the resource.
pub type GetMutator<R> = fn(&R) -> Value;

/// Stores a value on the resource.
pub type SetMutator<R> = fn(&mut R, Value) -> Result<(), serde_json::Error>;

/// Convert `snake_case`, `kebab-case` or space separated words to `PascalCase`.
///
/// Characters after the first of each word are kept as-is.
#[must_use]
pub fn studly(value: &str) -> String {
    value
        .split(|c: char| c == '_' || c == '-' || c.is_whitespace())
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

/// Per-type registration table of get and set mutators.
pub struct Mutators<R> {
    get: HashMap<String, GetMutator<R>>,
    set: HashMap<String, SetMutator<R>>,
}

impl<R> Default for Mutators<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> Mutators<R> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            get: HashMap::new(),
            set: HashMap::new(),
        }
    }

    #[must_use]
    pub fn getter(mut self, key: &str, handler: GetMutator<R>) -> Self {
        self.get.insert(studly(key), handler);
        self
    }

    #[must_use]
    pub fn setter(mut self, key: &str, handler: SetMutator<R>) -> Self {
        self.set.insert(studly(key), handler);
        self
    }

    fn get_mutator(&self, key: &str) -> Option<GetMutator<R>> {
        self.get.get(&studly(key)).copied()
    }

    fn set_mutator(&self, key: &str) -> Option<SetMutator<R>> {
        self.set.get(&studly(key)).copied()
    }
}

/// Get/set protocol over a resource's declared fields.
///
/// Implementors only provide [`HasAttributes::mutators`], usually a
/// `OnceLock`-backed static built on first use.
pub trait HasAttributes: Serialize + DeserializeOwned + Sized + 'static {
    fn mutators() -> &'static Mutators<Self>;

    /// Every declared field with its stored value. Mutators are not consulted.
    fn attributes_to_array(&self) -> Result<Map<String, Value>, Error> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Ok(Map::new()),
            Err(source) => Err(Error::Attribute {
                key: "*".into(),
                source,
            }),
        }
    }

    /// Value produced by the get mutator for `key`.
    ///
    /// Returns `None` for an empty key or when no get mutator is registered;
    /// plain fields are not readable through this method.
    fn get_attribute(&self, key: &str) -> Option<Value> {
        if key.is_empty() {
            return None;
        }

        if Self::has_get_mutator(key) {
            return self.get_attribute_value(key);
        }

        None
    }

    /// Invoke the get mutator for `key`, if any.
    ///
    /// The mutator receives only the resource, never the stored field value.
    fn get_attribute_value(&self, key: &str) -> Option<Value> {
        Self::mutators().get_mutator(key).map(|handler| handler(self))
    }

    fn has_get_mutator(key: &str) -> bool {
        Self::mutators().get_mutator(key).is_some()
    }

    fn has_set_mutator(key: &str) -> bool {
        Self::mutators().set_mutator(key).is_some()
    }

    /// Store `value` under `key`.
    ///
    /// A registered set mutator wins; otherwise the declared field named
    /// exactly `key` is assigned. Unknown keys are ignored.
    fn set_attribute(&mut self, key: &str, value: impl Into<Value>) -> Result<&mut Self, Error> {
        assign(self, key, value.into()).map_err(|source| Error::Attribute {
            key: key.into(),
            source,
        })?;
        Ok(self)
    }

    /// [`HasAttributes::set_attribute`] for each pair, in order.
    fn fill<I, K>(&mut self, attributes: I) -> Result<&mut Self, Error>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: AsRef<str>,
    {
        for (key, value) in attributes {
            self.set_attribute(key.as_ref(), value)?;
        }
        Ok(self)
    }
}

fn assign<R: HasAttributes>(resource: &mut R, key: &str, value: Value) -> Result<(), serde_json::Error> {
    if let Some(handler) = R::mutators().set_mutator(key) {
        return handler(resource, value);
    }

    let Value::Object(mut fields) = serde_json::to_value(&*resource)? else {
        return Ok(());
    };
    if !fields.contains_key(key) {
        return Ok(());
    }

    fields.insert(key.to_owned(), value);
    *resource = serde_json::from_value(Value::Object(fields))?;
    Ok(())
}

/// Replace a nested resource with one built from `value`.
///
/// An object is applied key by key on an empty resource, so the nested
/// type's set mutators run; any other value is deserialized as-is. Intended
/// for set mutators of resources that embed other resources.
pub fn assign_nested<R: HasAttributes>(
    target: &mut R,
    value: Value,
) -> Result<(), serde_json::Error> {
    let Value::Object(fields) = value else {
        *target = serde_json::from_value(value)?;
        return Ok(());
    };

    let mut nested: R = serde_json::from_value(Value::Object(Map::new()))?;
    for (key, value) in fields {
        assign(&mut nested, &key, value)?;
    }
    *target = nested;
    Ok(())
}
