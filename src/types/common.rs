use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// A MyParcel shipment id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShipmentId(u64);

impl ShipmentId {
    #[must_use]
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }

    /// `1;2;3`, the form the API expects for id lists in a path.
    pub(crate) fn join(ids: &[ShipmentId]) -> String {
        ids.iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(";")
    }
}

impl From<u64> for ShipmentId {
    fn from(value: u64) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for ShipmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Carrier handling a shipment, sent as its numeric id.
///
/// Ids this crate does not know are kept in [`Carrier::Other`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
#[non_exhaustive]
pub enum Carrier {
    #[default]
    PostNl,
    Bpost,
    Dpd,
    Other(u8),
}

impl From<Carrier> for u8 {
    fn from(value: Carrier) -> Self {
        match value {
            Carrier::PostNl => 1,
            Carrier::Bpost => 2,
            Carrier::Dpd => 4,
            Carrier::Other(id) => id,
        }
    }
}

impl From<u8> for Carrier {
    fn from(value: u8) -> Self {
        match value {
            1 => Self::PostNl,
            2 => Self::Bpost,
            4 => Self::Dpd,
            other => Self::Other(other),
        }
    }
}

/// Package type, sent as its numeric id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
#[non_exhaustive]
pub enum PackageType {
    #[default]
    Package,
    MailboxPackage,
    Letter,
    DigitalStamp,
    Other(u8),
}

impl From<PackageType> for u8 {
    fn from(value: PackageType) -> Self {
        match value {
            PackageType::Package => 1,
            PackageType::MailboxPackage => 2,
            PackageType::Letter => 3,
            PackageType::DigitalStamp => 4,
            PackageType::Other(id) => id,
        }
    }
}

impl From<u8> for PackageType {
    fn from(value: u8) -> Self {
        match value {
            1 => Self::Package,
            2 => Self::MailboxPackage,
            3 => Self::Letter,
            4 => Self::DigitalStamp,
            other => Self::Other(other),
        }
    }
}

/// Decode an optional flag sent as `true`/`false` or `1`/`0`.
pub(crate) fn deserialize_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(u64),
    }

    Ok(Option::<Flag>::deserialize(deserializer)?.map(|flag| match flag {
        Flag::Bool(value) => value,
        Flag::Int(value) => value != 0,
    }))
}

/// Paper format of a label document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum LabelFormat {
    #[default]
    A4,
    A6,
}

impl LabelFormat {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::A4 => "A4",
            Self::A6 => "A6",
        }
    }
}

/// Options for `shipment_labels` requests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelOptions {
    pub format: LabelFormat,
    /// Start positions on an A4 sheet (1-4); ignored for A6.
    pub positions: Vec<u8>,
}

impl LabelOptions {
    pub(crate) fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("format", self.format.as_str().to_owned())];
        if self.format == LabelFormat::A4 && !self.positions.is_empty() {
            let positions = self
                .positions
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(";");
            pairs.push(("positions", positions));
        }
        pairs
    }
}

/// `{"data": ...}` wrapper used by every JSON response.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    pub(crate) data: T,
}
