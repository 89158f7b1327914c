use crate::{
    Error, LabelOptions, ShipmentId, response::PDF_CONTENT_TYPE, types::Envelope,
    util::url::build_query_string,
};
use http::{HeaderMap, HeaderValue, Method, header::ACCEPT};
use serde::Deserialize;

#[derive(Deserialize)]
struct Pdfs {
    pdfs: PdfLink,
}

#[derive(Deserialize)]
struct PdfLink {
    url: String,
}

/// MyParcel shipment label APIs.
#[derive(Clone)]
pub struct LabelsService {
    client: crate::Client,
}

impl LabelsService {
    pub(crate) fn new(client: crate::Client) -> Self {
        Self { client }
    }

    fn path(ids: &[ShipmentId], options: &LabelOptions) -> Result<String, Error> {
        if ids.is_empty() {
            return Err(Error::InvalidConfig {
                message: "at least one shipment id is required for labels".into(),
                source: None,
            });
        }
        Ok(format!(
            "shipment_labels/{}{}",
            ShipmentId::join(ids),
            build_query_string(options.query_pairs())
        ))
    }

    /// `GET /shipment_labels/<ids>` as a PDF document.
    pub fn pdf(&self, ids: &[ShipmentId], options: &LabelOptions) -> Result<Vec<u8>, Error> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(PDF_CONTENT_TYPE));

        self.client
            .perform_api_call(Method::GET, &Self::path(ids, options)?, None, headers)?
            .into_bytes()
            .ok_or_else(|| Error::unexpected("PDF document"))
    }

    /// `GET /shipment_labels/<ids>`: URL of the generated PDF.
    pub fn link(&self, ids: &[ShipmentId], options: &LabelOptions) -> Result<String, Error> {
        let link: Envelope<Pdfs> = self
            .client
            .perform_api_call(Method::GET, &Self::path(ids, options)?, None, HeaderMap::new())?
            .decode("label link")?;
        Ok(link.data.pdfs.url)
    }
}
