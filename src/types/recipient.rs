use crate::resource::{HasAttributes, Mutators};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::OnceLock;

/// Recipient (or sender) address of a shipment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct Recipient {
    /// ISO 3166-1 alpha-2 country code.
    pub cc: Option<String>,
    pub region: Option<String>,
    pub city: Option<String>,
    pub street: Option<String>,
    pub number: Option<String>,
    pub number_suffix: Option<String>,
    pub postal_code: Option<String>,
    pub person: Option<String>,
    pub company: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl Recipient {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// `Street 12A, 1234AB City`, skipping missing parts.
    #[must_use]
    pub fn address_line(&self) -> String {
        let house = [self.number.as_deref(), self.number_suffix.as_deref()]
            .into_iter()
            .flatten()
            .collect::<String>();
        let street = [self.street.as_deref(), Some(house.as_str())]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        let place = [self.postal_code.as_deref(), self.city.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ");

        [street, place]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn optional_string(value: Value) -> Result<Option<String>, serde_json::Error> {
    serde_json::from_value(value)
}

impl HasAttributes for Recipient {
    fn mutators() -> &'static Mutators<Self> {
        static MUTATORS: OnceLock<Mutators<Recipient>> = OnceLock::new();
        MUTATORS.get_or_init(|| {
            Mutators::<Recipient>::new()
                .getter("address", |r| {
                    let line = r.address_line();
                    if line.is_empty() { Value::Null } else { json!(line) }
                })
                .setter("cc", |r, value| {
                    r.cc = optional_string(value)?.map(|cc| cc.trim().to_uppercase());
                    Ok(())
                })
                .setter("postal_code", |r, value| {
                    r.postal_code = optional_string(value)?.map(|code| {
                        code.chars()
                            .filter(|c| !c.is_whitespace())
                            .collect::<String>()
                            .to_uppercase()
                    });
                    Ok(())
                })
        })
    }
}
