//! Case value extraction
//!
//! Flattens a resolved case record's nested property and role collections
//! into the value set fed to the declarative mapping. Extraction is a pure
//! function of `(case_type, case_record)`; it may run repeatedly across
//! retries and must always yield the same output.

use serde_json::{Map, Value};

use crate::capabilities::Record;

/// Reserved property name carrying a country code.
pub const COUNTRY_CODE_PROPERTY: &str = "landcode";

/// Output key for the first country-code occurrence.
pub const COUNTRY_OF_BIRTH_KEY: &str = "geboorteland";

/// Output key for every subsequent country-code occurrence.
pub const COUNTRY_OF_ORIGIN_KEY: &str = "land_van_herkomst";

/// Generic role-type description identifying the case initiator.
const INITIATOR_DESCRIPTION: &str = "initiator";

/// Output key under which the initiator role is exposed.
pub const INITIATOR_KEY: &str = "initiator";

/// Output key under which the raw case record is exposed.
pub const CASE_KEY: &str = "zaak";

/// Flat key/value aggregate handed to the mapping evaluator. Derived and
/// transient; recomputed per synchronization attempt.
pub type CaseValueSet = Map<String, Value>;

/// The case-type view needed for extraction: declared property names and
/// role-type descriptors.
#[derive(Debug, Clone, Default)]
pub struct CaseType {
    pub property_names: Vec<String>,
    pub role_types: Vec<RoleType>,
}

#[derive(Debug, Clone)]
pub struct RoleType {
    pub url: String,
    pub generic_description: String,
}

impl CaseType {
    /// Build the case-type view from its embedded representation on the case
    /// record (`eigenschappen` names, `roltypen` descriptors).
    pub fn from_value(value: &Value) -> Self {
        let property_names = value
            .get("eigenschappen")
            .and_then(Value::as_array)
            .map(|props| {
                props
                    .iter()
                    .filter_map(|prop| prop.get("naam").and_then(Value::as_str))
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let role_types = value
            .get("roltypen")
            .and_then(Value::as_array)
            .map(|types| {
                types
                    .iter()
                    .filter_map(|role_type| {
                        Some(RoleType {
                            url: role_type.get("url")?.as_str()?.to_string(),
                            generic_description: role_type
                                .get("omschrijvingGeneriek")?
                                .as_str()?
                                .to_string(),
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            property_names,
            role_types,
        }
    }

    fn initiator_role_type(&self) -> Option<&RoleType> {
        self.role_types
            .iter()
            .find(|role_type| role_type.generic_description == INITIATOR_DESCRIPTION)
    }
}

pub struct CaseValueExtractor;

impl CaseValueExtractor {
    /// Extract the flat value set for a case.
    ///
    /// Properties declared on the case type are copied keyed by name;
    /// country-code properties are assigned by ordinal position; the
    /// initiator role (when present) and the raw case record are attached
    /// under fixed keys.
    pub fn extract(case_type: &CaseType, case_record: &Record) -> CaseValueSet {
        let mut values = CaseValueSet::new();
        let mut country_codes_seen = 0usize;

        if let Some(properties) = case_record.get("eigenschappen").and_then(Value::as_array) {
            for property in properties {
                let Some(name) = property.get("naam").and_then(Value::as_str) else {
                    continue;
                };
                let value = property.get("waarde").cloned().unwrap_or(Value::Null);

                if name == COUNTRY_CODE_PROPERTY {
                    assign_country_code(&mut values, &mut country_codes_seen, value);
                } else if case_type.property_names.iter().any(|known| known == name) {
                    values.insert(name.to_string(), value);
                }
            }
        }

        if let Some(role) = find_initiator_role(case_type, case_record) {
            values.insert(INITIATOR_KEY.to_string(), role.clone());
        }

        values.insert(CASE_KEY.to_string(), Value::Object(case_record.data.clone()));

        values
    }
}

/// Ordinal-position country-code rule: the source system emits repeated
/// `landcode` properties that differ only by position, so position is the
/// only discriminator available. First occurrence is the country of birth,
/// every later one the country of origin.
fn assign_country_code(values: &mut CaseValueSet, seen: &mut usize, value: Value) {
    let key = if *seen == 0 {
        COUNTRY_OF_BIRTH_KEY
    } else {
        COUNTRY_OF_ORIGIN_KEY
    };
    values.insert(key.to_string(), value);
    *seen += 1;
}

/// The case role referencing the case-type's initiator role-type, if any.
/// A missing role-type or role is not an error; the value set simply carries
/// no initiator.
fn find_initiator_role<'a>(case_type: &CaseType, case_record: &'a Record) -> Option<&'a Value> {
    let role_type = case_type.initiator_role_type()?;
    case_record
        .get("rollen")
        .and_then(Value::as_array)?
        .iter()
        .find(|role| {
            role.get("roltype").and_then(Value::as_str) == Some(role_type.url.as_str())
        })
}
