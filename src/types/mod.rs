pub mod qname;
pub mod sample;
pub mod schema;
pub mod tree;
pub mod type_registry;

pub use qname::{QName, local_name};
pub use sample::{SampleNode, SampleValue};
pub use schema::{
    AttributeDecl, AttributeKind, ComplexContent, ComplexTypeDecl, Derivation, ElementDecl,
    ElementKind, Extension, ImportDecl, ImportKind, ListDecl, Particle, Restriction,
    SchemaDocument, SimpleDerivation, SimpleTypeDecl,
};
pub use type_registry::{RegistryStats, TypeDefinition, TypeLookup, TypeRegistry};
