//! schema
//!
//! Request schemas: the typed field set an operation accepts.
//!
//! # Design
//!
//! Two schema conventions exist across catalog generations: older
//! generations expose each field as a directly settable attribute, newer
//! ones wrap every field in a `set_<field>` setter. Callers never branch
//! on the convention - both are implementations of the [`RequestSchema`]
//! trait, and the active one is chosen by the resolver from the
//! manifest's `convention` declaration.
//!
//! Field names are case-sensitive wire names. Matching a user flag
//! against a schema field is exact; only service/operation tokens are
//! case-folded elsewhere.

pub mod resolver;

pub use resolver::SchemaResolver;

use std::collections::BTreeMap;

use thiserror::Error;

use crate::catalog::{FieldSpec, OperationSpec, SchemaConvention};
use crate::version::ApiVersion;

/// The conventional region field name, used for default-region injection.
pub const REGION_FIELD: &str = "RegionId";

/// Errors from schema field assignment.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("'{operation}' has no parameter named '{field}'")]
    UnknownField { operation: String, field: String },
}

/// A field a schema will accept, with its requiredness for help display.
pub type FieldDescriptor = FieldSpec;

/// The resolved, instantiable shape of a request.
///
/// A schema starts with every field unset; the argument binder fills it
/// from parsed flags. `wire_params` then yields the name/value pairs the
/// transport serializes.
pub trait RequestSchema {
    fn service(&self) -> &str;
    fn operation(&self) -> &str;
    fn version(&self) -> &ApiVersion;

    /// The settable fields, in catalog order.
    fn fields(&self) -> &[FieldDescriptor];

    /// Assign a value to the named field (exact, case-sensitive match).
    fn set_field(&mut self, name: &str, value: &str) -> Result<(), SchemaError>;

    /// Current value of the named field, if assigned.
    fn field_value(&self, name: &str) -> Option<&str>;

    /// Whether the schema declares the named field at all.
    fn has_field(&self, name: &str) -> bool {
        self.fields().iter().any(|f| f.name == name)
    }

    /// The assigned fields as wire parameters.
    fn wire_params(&self) -> BTreeMap<String, String>;
}

/// Shared storage for both conventions: declared fields plus assignments.
#[derive(Debug, Clone)]
struct FieldBag {
    service: String,
    operation: String,
    version: ApiVersion,
    fields: Vec<FieldDescriptor>,
    values: BTreeMap<String, String>,
}

impl FieldBag {
    fn new(service: &str, spec: &OperationSpec, version: &ApiVersion) -> Self {
        Self {
            service: service.to_string(),
            operation: spec.name.clone(),
            version: version.clone(),
            fields: spec.fields.clone(),
            values: BTreeMap::new(),
        }
    }

    fn assign(&mut self, name: &str, value: &str) -> Result<(), SchemaError> {
        if !self.fields.iter().any(|f| f.name == name) {
            return Err(SchemaError::UnknownField {
                operation: self.operation.clone(),
                field: name.to_string(),
            });
        }
        self.values.insert(name.to_string(), value.to_string());
        Ok(())
    }
}

/// Direct-attribute convention: flags match field names one to one.
#[derive(Debug, Clone)]
pub struct AttributeSchema {
    bag: FieldBag,
}

impl AttributeSchema {
    pub fn new(service: &str, spec: &OperationSpec, version: &ApiVersion) -> Self {
        Self {
            bag: FieldBag::new(service, spec, version),
        }
    }
}

impl RequestSchema for AttributeSchema {
    fn service(&self) -> &str {
        &self.bag.service
    }

    fn operation(&self) -> &str {
        &self.bag.operation
    }

    fn version(&self) -> &ApiVersion {
        &self.bag.version
    }

    fn fields(&self) -> &[FieldDescriptor] {
        &self.bag.fields
    }

    fn set_field(&mut self, name: &str, value: &str) -> Result<(), SchemaError> {
        self.bag.assign(name, value)
    }

    fn field_value(&self, name: &str) -> Option<&str> {
        self.bag.values.get(name).map(String::as_str)
    }

    fn wire_params(&self) -> BTreeMap<String, String> {
        self.bag.values.clone()
    }
}

/// Setter-method convention: each field is addressed through a
/// `set_<field>` entry point. The trait surface stays the same; the
/// setter name is resolved internally so call sites never see it.
#[derive(Debug, Clone)]
pub struct SetterSchema {
    bag: FieldBag,
}

impl SetterSchema {
    pub fn new(service: &str, spec: &OperationSpec, version: &ApiVersion) -> Self {
        Self {
            bag: FieldBag::new(service, spec, version),
        }
    }

    /// The setter entry-point names, for parameter help display.
    pub fn setter_names(&self) -> Vec<String> {
        self.bag
            .fields
            .iter()
            .map(|f| format!("set_{}", f.name))
            .collect()
    }
}

impl RequestSchema for SetterSchema {
    fn service(&self) -> &str {
        &self.bag.service
    }

    fn operation(&self) -> &str {
        &self.bag.operation
    }

    fn version(&self) -> &ApiVersion {
        &self.bag.version
    }

    fn fields(&self) -> &[FieldDescriptor] {
        &self.bag.fields
    }

    fn set_field(&mut self, name: &str, value: &str) -> Result<(), SchemaError> {
        // Accept both the bare field name and its setter spelling.
        let field = name.strip_prefix("set_").unwrap_or(name);
        self.bag.assign(field, value)
    }

    fn field_value(&self, name: &str) -> Option<&str> {
        let field = name.strip_prefix("set_").unwrap_or(name);
        self.bag.values.get(field).map(String::as_str)
    }

    fn wire_params(&self) -> BTreeMap<String, String> {
        self.bag.values.clone()
    }
}

/// Instantiate a schema under the given convention.
pub fn instantiate(
    convention: SchemaConvention,
    service: &str,
    spec: &OperationSpec,
    version: &ApiVersion,
) -> Box<dyn RequestSchema> {
    match convention {
        SchemaConvention::Attribute => Box::new(AttributeSchema::new(service, spec, version)),
        SchemaConvention::Setter => Box::new(SetterSchema::new(service, spec, version)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec() -> OperationSpec {
        OperationSpec {
            name: "DescribeInstanceAttribute".into(),
            fields: vec![
                FieldSpec {
                    name: "RegionId".into(),
                    required: false,
                },
                FieldSpec {
                    name: "InstanceId".into(),
                    required: true,
                },
            ],
        }
    }

    fn version() -> ApiVersion {
        ApiVersion::new("20140526").unwrap()
    }

    #[test]
    fn attribute_schema_sets_known_field() {
        let mut schema = AttributeSchema::new("ecs", &spec(), &version());
        schema.set_field("InstanceId", "i-123").unwrap();
        assert_eq!(schema.field_value("InstanceId"), Some("i-123"));
        assert_eq!(schema.wire_params().get("InstanceId").unwrap(), "i-123");
    }

    #[test]
    fn attribute_schema_rejects_unknown_field() {
        let mut schema = AttributeSchema::new("ecs", &spec(), &version());
        let err = schema.set_field("NoSuchField", "x").unwrap_err();
        assert_eq!(
            err,
            SchemaError::UnknownField {
                operation: "DescribeInstanceAttribute".into(),
                field: "NoSuchField".into()
            }
        );
    }

    #[test]
    fn field_names_are_case_sensitive() {
        let mut schema = AttributeSchema::new("ecs", &spec(), &version());
        assert!(schema.set_field("instanceid", "i-123").is_err());
        assert!(!schema.has_field("instanceid"));
        assert!(schema.has_field("InstanceId"));
    }

    #[test]
    fn setter_schema_accepts_both_spellings() {
        let mut schema = SetterSchema::new("ecs", &spec(), &version());
        schema.set_field("InstanceId", "i-1").unwrap();
        schema.set_field("set_RegionId", "cn-hangzhou").unwrap();
        assert_eq!(schema.field_value("set_InstanceId"), Some("i-1"));
        assert_eq!(schema.field_value("RegionId"), Some("cn-hangzhou"));
    }

    #[test]
    fn setter_names_carry_prefix() {
        let schema = SetterSchema::new("ecs", &spec(), &version());
        assert_eq!(schema.setter_names(), vec!["set_RegionId", "set_InstanceId"]);
    }

    #[test]
    fn wire_params_cover_only_assigned_fields() {
        let mut schema = AttributeSchema::new("ecs", &spec(), &version());
        schema.set_field("InstanceId", "i-123").unwrap();
        let params = schema.wire_params();
        assert_eq!(params.len(), 1);
        assert!(!params.contains_key("RegionId"));
    }

    #[test]
    fn instantiate_follows_convention() {
        let attr = instantiate(SchemaConvention::Attribute, "ecs", &spec(), &version());
        assert_eq!(attr.operation(), "DescribeInstanceAttribute");
        let setter = instantiate(SchemaConvention::Setter, "ecs", &spec(), &version());
        assert_eq!(setter.fields().len(), 2);
    }
}
