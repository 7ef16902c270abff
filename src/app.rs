//! Root of the application manifest.

use std::sync::Arc;

use crate::{catalogs::CatalogsPart, container::ApplicationPart, db::DbClient};

/// Entry part handed to the service registration; every module is reached
/// through its references.
pub struct AppPart;

impl ApplicationPart<DbClient> for AppPart {
    fn name(&self) -> &str {
        "app"
    }

    fn references(&self) -> Vec<Arc<dyn ApplicationPart<DbClient>>> {
        vec![Arc::new(CatalogsPart)]
    }
}

pub fn application_part() -> Arc<dyn ApplicationPart<DbClient>> {
    Arc::new(AppPart)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::{resolve_parts, ServiceCollection};

    #[test]
    fn test_manifest_reaches_catalogs() {
        let parts = resolve_parts(&application_part(), &[]);
        let names: Vec<&str> = parts.iter().map(|part| part.name()).collect();
        assert_eq!(names, vec!["app", "catalogs"]);
    }

    #[test]
    fn test_manifest_registers_product_slice() {
        let part = application_part();
        let mut services = ServiceCollection::new();
        services
            .add_minimal_endpoints(&part, &[])
            .add_data_seeders(&part, &[]);
        let provider = services.build();

        assert_eq!(provider.endpoint_count(), 3);
        assert_eq!(provider.seeder_count(), 1);
    }
}
