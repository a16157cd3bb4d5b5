//! Central schema registry for fixture and report types.
//!
//! The `SchemaRegistry` builds JSON Schemas from alm-core types at construction
//! time using [`schemars::schema_for!`] and provides validation via `jsonschema`.

use std::collections::HashMap;

use schemars::schema_for;

use crate::error::SchemaError;

/// Name of the schema every fixture line must satisfy.
pub const RECORD_SCHEMA: &str = "record";

/// Central store of all JSON Schemas in almfx.
pub struct SchemaRegistry {
    schemas: HashMap<&'static str, serde_json::Value>,
}

macro_rules! register {
    ($map:expr, $name:expr, $ty:ty) => {
        $map.insert($name, schema_for!($ty).to_value());
    };
}

impl SchemaRegistry {
    /// Build a new registry containing the record and report schemas.
    #[must_use]
    pub fn new() -> Self {
        let mut schemas = HashMap::new();

        // --- Fixture line (1) ---
        register!(schemas, RECORD_SCHEMA, alm_core::record::Record);

        // --- CLI response types (5) ---
        register!(
            schemas,
            "generate_summary",
            alm_core::responses::GenerateSummary
        );
        register!(schemas, "verify_report", alm_core::responses::VerifyReport);
        register!(schemas, "violation", alm_core::responses::Violation);
        register!(schemas, "compare_report", alm_core::responses::CompareReport);
        register!(
            schemas,
            "compare_mismatch",
            alm_core::responses::CompareMismatch
        );

        Self { schemas }
    }

    /// Get a schema by name. Returns `None` if not found.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&serde_json::Value> {
        self.schemas.get(name)
    }

    /// Compile a named schema once for repeated validation.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::NotFound` for an unknown name, or
    /// `SchemaError::Generation` if the schema does not compile.
    pub fn compile(&self, name: &str) -> Result<CompiledSchema, SchemaError> {
        let schema = self
            .get(name)
            .ok_or_else(|| SchemaError::NotFound(name.to_string()))?;

        let validator = jsonschema::validator_for(schema)
            .map_err(|e| SchemaError::Generation(format!("{e}")))?;

        Ok(CompiledSchema {
            name: name.to_string(),
            validator,
        })
    }

    /// Validate a JSON value against a named schema.
    ///
    /// Compiles the schema on every call; use [`Self::compile`] in loops.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::NotFound` if the schema name is unknown, or
    /// `SchemaError::ValidationFailed` if validation produces errors.
    pub fn validate(&self, name: &str, instance: &serde_json::Value) -> Result<(), SchemaError> {
        self.compile(name)?.validate(instance)
    }

    /// List all registered schema names.
    #[must_use]
    pub fn list(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.schemas.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Number of registered schemas.
    #[must_use]
    pub fn schema_count(&self) -> usize {
        self.schemas.len()
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// A schema compiled into a reusable validator.
pub struct CompiledSchema {
    name: String,
    validator: jsonschema::Validator,
}

impl CompiledSchema {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn is_valid(&self, instance: &serde_json::Value) -> bool {
        self.validator.is_valid(instance)
    }

    /// # Errors
    ///
    /// Returns `SchemaError::ValidationFailed` with every validator message.
    pub fn validate(&self, instance: &serde_json::Value) -> Result<(), SchemaError> {
        let errors: Vec<String> = self
            .validator
            .iter_errors(instance)
            .map(|e| format!("{e}"))
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(SchemaError::ValidationFailed { errors })
        }
    }
}

impl std::fmt::Debug for CompiledSchema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompiledSchema")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn registry() -> SchemaRegistry {
        SchemaRegistry::new()
    }

    fn verify_report() -> serde_json::Value {
        serde_json::json!({
            "path": "full_test.json",
            "sha256": "00",
            "records": 4,
            "days": 1,
            "expected_records": null,
            "schema_checked": false,
            "passed": true,
            "violation_count": 0,
            "violations_by_rule": {},
            "violations": []
        })
    }

    #[test]
    fn registry_has_expected_count() {
        // 1 record + 5 responses
        assert_eq!(registry().schema_count(), 6);
    }

    #[test]
    fn registry_list_is_sorted() {
        let names = registry().list();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
    }

    #[test]
    fn all_expected_schemas_present() {
        let reg = registry();
        for name in [
            "record",
            "generate_summary",
            "verify_report",
            "violation",
            "compare_report",
            "compare_mismatch",
        ] {
            assert!(reg.get(name).is_some(), "Missing expected schema: {name}");
        }
        assert!(reg.get("nonexistent").is_none());
    }

    #[test]
    fn validate_accepts_valid_report() {
        assert!(registry().validate("verify_report", &verify_report()).is_ok());
    }

    #[test]
    fn validate_rejects_missing_required_field() {
        let mut invalid = verify_report();
        invalid.as_object_mut().unwrap().remove("sha256");
        match registry().validate("verify_report", &invalid) {
            Err(SchemaError::ValidationFailed { errors }) => assert!(!errors.is_empty()),
            other => panic!("Expected ValidationFailed, got {other:?}"),
        }
    }

    #[test]
    fn validate_rejects_unknown_rule() {
        let violation = serde_json::json!({
            "record": 1,
            "input_date": null,
            "rule": "made_up",
            "detail": "x"
        });
        assert!(registry().validate("violation", &violation).is_err());
    }

    #[test]
    fn compiled_schema_is_reusable() {
        let compiled = registry().compile("verify_report").unwrap();
        assert_eq!(compiled.name(), "verify_report");
        assert!(compiled.is_valid(&verify_report()));
        assert!(!compiled.is_valid(&serde_json::json!({"path": 1})));
        assert!(compiled.validate(&verify_report()).is_ok());
    }

    #[test]
    fn record_schema_rejects_bad_yeargod() {
        let compiled = registry().compile(RECORD_SCHEMA).unwrap();
        assert!(!compiled.is_valid(&serde_json::json!({
            "input_date": "2024-01-01 10:30",
            "yeargod": "sometimes"
        })));
    }

    #[test]
    fn validate_nonexistent_schema_returns_not_found() {
        let result = registry().validate("bogus", &serde_json::json!({}));
        assert!(matches!(result, Err(SchemaError::NotFound(_))));
    }
}
