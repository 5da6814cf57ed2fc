use async_trait::async_trait;
use wsdl_sampler::*;

pub const XS: &str = r#"xmlns:xs="http://www.w3.org/2001/XMLSchema""#;

/// Wrap schema body markup in an `xs:schema` root.
#[allow(dead_code)]
pub fn xsd(body: &str) -> String {
    format!(r#"<xs:schema {XS} xmlns:tns="urn:test" targetNamespace="urn:test">{body}</xs:schema>"#)
}

#[allow(dead_code)]
pub fn parse_schema(body: &str) -> SchemaDocument {
    WsdlDefinitions::parse(&xsd(body), None)
        .unwrap()
        .schemas
        .remove(0)
}

#[allow(dead_code)]
pub fn synthesize(body: &str) -> Result<SampleSet> {
    synthesize_with(body, SamplerConfig::default())
}

#[allow(dead_code)]
pub fn synthesize_with(body: &str, config: SamplerConfig) -> Result<SampleSet> {
    let definitions = WsdlDefinitions::parse(&xsd(body), None)?;
    SampleSynthesizer::with_config(config).synthesize_documents(definitions.schemas)
}

#[allow(dead_code)]
pub fn person_schema() -> &'static str {
    r#"
    <xs:complexType name="Person">
      <xs:sequence>
        <xs:element name="name" type="xs:string"/>
        <xs:element name="age" type="xs:int"/>
      </xs:sequence>
    </xs:complexType>
    <xs:element name="Person" type="tns:Person"/>
    "#
}

#[allow(dead_code)]
pub fn orders_wsdl(schema_body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<wsdl:definitions name="Orders" targetNamespace="urn:test"
    xmlns:wsdl="http://schemas.xmlsoap.org/wsdl/"
    xmlns:soap="http://schemas.xmlsoap.org/wsdl/soap/"
    {XS}
    xmlns:tns="urn:test">
  <wsdl:types>
    <xs:schema targetNamespace="urn:test">{schema_body}</xs:schema>
  </wsdl:types>
  <wsdl:binding name="OrdersSoap" type="tns:OrdersPort">
    <soap:binding style="document" transport="http://schemas.xmlsoap.org/soap/http"/>
    <wsdl:operation name="GetOrder">
      <soap:operation soapAction="urn:test/GetOrder"/>
    </wsdl:operation>
    <wsdl:operation name="CancelOrder">
      <soap:operation soapAction="urn:test/CancelOrder"/>
    </wsdl:operation>
  </wsdl:binding>
  <wsdl:service name="OrderService">
    <wsdl:port name="OrdersPort" binding="tns:OrdersSoap">
      <soap:address location="http://example.com/orders"/>
    </wsdl:port>
  </wsdl:service>
</wsdl:definitions>"#
    )
}

/// Fails every fetch, for abort-on-failure tests.
#[allow(dead_code)]
pub struct FailingFetcher;

#[async_trait]
impl ImportFetcher for FailingFetcher {
    async fn fetch(&self, location: &str) -> Result<String> {
        Err(WsdlSamplerError::import_fetch(location, "connection refused"))
    }
}

/// Never answers, for timeout tests.
#[allow(dead_code)]
pub struct HangingFetcher;

#[async_trait]
impl ImportFetcher for HangingFetcher {
    async fn fetch(&self, _location: &str) -> Result<String> {
        std::future::pending::<()>().await;
        Ok(String::new())
    }
}
