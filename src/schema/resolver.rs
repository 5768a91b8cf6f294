//! schema::resolver
//!
//! Locates and instantiates the concrete request schema for a
//! (service, operation, version) triple.
//!
//! Resolution is idempotent and side-effect free: nothing is cached, and
//! a miss is `None` rather than an error - callers treat it as
//! "operation unavailable", the same user experience as an operation the
//! catalog never listed.

use crate::catalog::CatalogIndex;
use crate::version::ApiVersion;

use super::{instantiate, RequestSchema};

/// Resolver over a catalog index.
pub struct SchemaResolver<'a> {
    catalog: &'a CatalogIndex,
}

impl<'a> SchemaResolver<'a> {
    pub fn new(catalog: &'a CatalogIndex) -> Self {
        Self { catalog }
    }

    /// Resolve and instantiate a fresh, unbound schema.
    ///
    /// Service and operation tokens are matched case-insensitively; the
    /// instantiated schema carries the exact catalog spellings.
    pub fn resolve(
        &self,
        service: &str,
        operation: &str,
        version: &ApiVersion,
    ) -> Option<Box<dyn RequestSchema>> {
        let exact_service = self.catalog.resolve_service(service)?;
        let spec = self.catalog.operation_spec(exact_service, operation, version)?;
        Some(instantiate(
            self.catalog.convention(),
            exact_service,
            spec,
            version,
        ))
    }
}
