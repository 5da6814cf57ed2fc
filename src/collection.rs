//! Postman v2.0.0 request collection built from WSDL bindings and samples.

use serde::{Deserialize, Serialize};

use crate::converter::SampleSet;
use crate::error::Result;
use crate::render::XmlRenderer;
use crate::wsdl::{Binding, BindingOperation, WsdlDefinitions};

pub const COLLECTION_SCHEMA: &str = "https://schema.getpostman.com/json/collection/v2.0.0/";
pub const CONTENT_TYPE: &str = "application/xml;charset=utf-8";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    pub info: CollectionInfo,
    pub item: Vec<Folder>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionInfo {
    pub name: String,
    #[serde(rename = "_postman_id")]
    pub postman_id: String,
    pub schema: String,
}

/// One folder per WSDL binding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Folder {
    pub name: String,
    pub item: Vec<RequestItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestItem {
    pub name: String,
    pub request: Request,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    pub url: String,
    pub method: String,
    pub header: Vec<Header>,
    pub body: Body,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Header {
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    pub disabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub mode: String,
    pub raw: String,
}

impl Collection {
    pub fn request_count(&self) -> usize {
        self.item.iter().map(|folder| folder.item.len()).sum()
    }

    pub fn find_request(&self, name: &str) -> Option<&RequestItem> {
        self.item
            .iter()
            .flat_map(|folder| folder.item.iter())
            .find(|item| item.name == name)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Header {
    fn enabled(key: &str, value: Option<String>) -> Self {
        Self {
            key: key.to_string(),
            value,
            disabled: false,
        }
    }
}

/// Joins WSDL bindings to synthesized samples by operation name.
#[derive(Debug, Clone, Default)]
pub struct CollectionBuilder {
    renderer: XmlRenderer,
}

impl CollectionBuilder {
    pub fn new(renderer: XmlRenderer) -> Self {
        Self { renderer }
    }

    pub fn build(&self, definitions: &WsdlDefinitions, samples: &SampleSet) -> Result<Collection> {
        let name = definitions
            .service_name
            .clone()
            .or_else(|| definitions.name.clone())
            .unwrap_or_else(|| "WSDL collection".to_string());

        let item = definitions
            .bindings
            .iter()
            .map(|binding| self.build_folder(binding, definitions.address.as_deref(), samples))
            .collect::<Result<Vec<_>>>()?;

        let collection = Collection {
            info: CollectionInfo {
                name,
                postman_id: uuid::Uuid::new_v4().to_string(),
                schema: COLLECTION_SCHEMA.to_string(),
            },
            item,
        };

        tracing::info!(
            "Built collection `{}` with {} requests",
            collection.info.name,
            collection.request_count()
        );
        Ok(collection)
    }

    fn build_folder(
        &self,
        binding: &Binding,
        address: Option<&str>,
        samples: &SampleSet,
    ) -> Result<Folder> {
        let item = binding
            .operations
            .iter()
            .map(|operation| self.build_request(binding, operation, address, samples))
            .collect::<Result<Vec<_>>>()?;

        Ok(Folder {
            name: binding.name.clone(),
            item,
        })
    }

    fn build_request(
        &self,
        binding: &Binding,
        operation: &BindingOperation,
        address: Option<&str>,
        samples: &SampleSet,
    ) -> Result<RequestItem> {
        let raw = match samples.get(&operation.name) {
            Some(node) => self.renderer.render(&operation.name, node)?,
            None => {
                tracing::warn!("No sample element for operation {}", operation.name);
                String::new()
            }
        };

        let url = match address {
            Some(address) => format!("{}/{}", address.trim_end_matches('/'), operation.name),
            None => String::new(),
        };

        Ok(RequestItem {
            name: operation.name.clone(),
            request: Request {
                url,
                method: binding.verb.clone(),
                header: vec![
                    Header::enabled("SOAPAction", operation.soap_action.clone()),
                    Header::enabled("Content-Type", Some(CONTENT_TYPE.to_string())),
                ],
                body: Body {
                    mode: "raw".to_string(),
                    raw,
                },
            },
        })
    }
}
