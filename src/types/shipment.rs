use crate::{
    Error,
    resource::{HasAttributes, Mutators, assign_nested},
    types::{Carrier, PackageType, Recipient, ShipmentId, common::deserialize_flag},
    util::json::strip_nulls,
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::OnceLock;

const LABEL_DESCRIPTION_MAX_CHARS: usize = 45;

/// Insured value in cents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insurance {
    pub amount: u64,
    pub currency: String,
}

impl Insurance {
    #[must_use]
    pub fn eur(amount: u64) -> Self {
        Self {
            amount,
            currency: "EUR".to_owned(),
        }
    }
}

/// Delivery options of a shipment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct ShipmentOptions {
    #[serde(default)]
    pub package_type: PackageType,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub only_recipient: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub signature: Option<bool>,
    #[serde(rename = "return", default, deserialize_with = "deserialize_flag")]
    pub return_unanswered: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub large_format: Option<bool>,
    pub label_description: Option<String>,
    pub insurance: Option<Insurance>,
}

impl ShipmentOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum InsuranceInput {
    Cents(u64),
    Full {
        amount: u64,
        currency: Option<String>,
    },
}

impl HasAttributes for ShipmentOptions {
    fn mutators() -> &'static Mutators<Self> {
        static MUTATORS: OnceLock<Mutators<ShipmentOptions>> = OnceLock::new();
        MUTATORS.get_or_init(|| {
            Mutators::<ShipmentOptions>::new()
                .getter("insured_amount", |o| {
                    o.insurance.as_ref().map_or(Value::Null, |i| json!(i.amount))
                })
                .setter("label_description", |o, value| {
                    let text: Option<String> = serde_json::from_value(value)?;
                    o.label_description =
                        text.map(|t| t.chars().take(LABEL_DESCRIPTION_MAX_CHARS).collect());
                    Ok(())
                })
                .setter("insurance", |o, value| {
                    let input: Option<InsuranceInput> = serde_json::from_value(value)?;
                    o.insurance = input.map(|input| match input {
                        InsuranceInput::Cents(amount) => Insurance::eur(amount),
                        InsuranceInput::Full { amount, currency } => Insurance {
                            amount,
                            currency: currency.unwrap_or_else(|| "EUR".to_owned()),
                        },
                    });
                    Ok(())
                })
        })
    }
}

/// A shipment (parcel) registered with MyParcel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct Shipment {
    pub id: Option<ShipmentId>,
    pub reference_identifier: Option<String>,
    #[serde(default)]
    pub carrier: Carrier,
    pub barcode: Option<String>,
    pub status: Option<u8>,
    #[serde(default)]
    pub recipient: Recipient,
    #[serde(default)]
    pub options: ShipmentOptions,
}

impl Shipment {
    #[must_use]
    pub fn new(recipient: Recipient) -> Self {
        Self {
            recipient,
            ..Self::default()
        }
    }

    /// Public track & trace page, once a barcode is assigned.
    #[must_use]
    pub fn track_trace_url(&self) -> Option<String> {
        let barcode = self.barcode.as_deref()?;
        let postal_code = self.recipient.postal_code.as_deref().unwrap_or_default();
        let cc = self.recipient.cc.as_deref().unwrap_or("NL");
        Some(format!(
            "https://myparcel.me/track-trace/{barcode}/{postal_code}/{cc}"
        ))
    }

    /// Body entry for `POST shipments`: nulls and server-assigned fields dropped.
    pub(crate) fn to_request_body(&self) -> Result<Value, Error> {
        let mut fields = self.attributes_to_array()?;
        for key in ["id", "barcode", "status"] {
            fields.remove(key);
        }
        Ok(strip_nulls(Value::Object(fields)))
    }
}

impl HasAttributes for Shipment {
    fn mutators() -> &'static Mutators<Self> {
        static MUTATORS: OnceLock<Mutators<Shipment>> = OnceLock::new();
        MUTATORS.get_or_init(|| {
            Mutators::<Shipment>::new()
                .getter("track_trace_url", |s| {
                    s.track_trace_url().map_or(Value::Null, Value::String)
                })
                .setter("recipient", |s, value| assign_nested(&mut s.recipient, value))
                .setter("options", |s, value| assign_nested(&mut s.options, value))
        })
    }
}
