use super::{DefinitionConverter, ReadContext, WriteContext, wrong_family};
use crate::definition::{
    AllPatientsCohortDefinition, CohortDefinition, CompositionCohortDefinition, Definition,
    DefinitionHeader, DefinitionKind, SqlCohortDefinition, StaticCohortDefinition,
};
use crate::error::{SerializationError, SerializationResult};
use crate::node::{NodeReader, field_path};
use serde_json::{Map, Value};
use std::sync::Arc;

const QUERY: &str = "query";
const COHORT: &str = "cohort";
const SEARCHES: &str = "searches";
const COMPOSITION: &str = "compositionString";

/// Converter for cohort definitions
#[derive(Debug, Default, Clone, Copy)]
pub struct CohortDefinitionConverter;

impl DefinitionConverter for CohortDefinitionConverter {
    fn kind(&self) -> DefinitionKind {
        DefinitionKind::Cohort
    }

    fn type_tags(&self) -> &'static [&'static str] {
        &[
            SqlCohortDefinition::TYPE_TAG,
            AllPatientsCohortDefinition::TYPE_TAG,
            StaticCohortDefinition::TYPE_TAG,
            CompositionCohortDefinition::TYPE_TAG,
        ]
    }

    fn write(
        &self,
        definition: &Definition,
        node: &mut Map<String, Value>,
        ctx: &mut WriteContext<'_>,
        path: &str,
    ) -> SerializationResult<()> {
        let Definition::Cohort(cohort) = definition else {
            return Err(wrong_family(DefinitionKind::Cohort, definition, path));
        };

        match cohort.as_ref() {
            CohortDefinition::Sql(d) => {
                node.insert(QUERY.to_string(), Value::String(d.query.clone()));
            }
            CohortDefinition::AllPatients(_) => {}
            CohortDefinition::Static(d) => {
                let members = serde_json::to_value(&d.cohort).map_err(|e| {
                    SerializationError::invalid_field(field_path(path, COHORT), e.to_string())
                })?;
                node.insert(COHORT.to_string(), members);
            }
            CohortDefinition::Composition(d) => {
                check_composition(d, &field_path(path, COMPOSITION))?;
                if !d.searches.is_empty() {
                    let searches = ctx.write_mapped_map(&d.searches, &field_path(path, SEARCHES))?;
                    node.insert(SEARCHES.to_string(), searches);
                }
                node.insert(COMPOSITION.to_string(), Value::String(d.composition.clone()));
            }
        }
        Ok(())
    }

    fn read(
        &self,
        tag: &str,
        header: DefinitionHeader,
        node: &NodeReader<'_>,
        ctx: &mut ReadContext<'_>,
    ) -> SerializationResult<Definition> {
        let cohort = match tag {
            SqlCohortDefinition::TYPE_TAG => CohortDefinition::Sql(SqlCohortDefinition {
                header,
                query: node.str(QUERY)?.to_string(),
            }),
            AllPatientsCohortDefinition::TYPE_TAG => {
                CohortDefinition::AllPatients(AllPatientsCohortDefinition { header })
            }
            StaticCohortDefinition::TYPE_TAG => CohortDefinition::Static(StaticCohortDefinition {
                header,
                cohort: node.decode(COHORT)?.unwrap_or_default(),
            }),
            CompositionCohortDefinition::TYPE_TAG => {
                let definition = CompositionCohortDefinition {
                    header,
                    searches: ctx.read_mapped_map(node, SEARCHES)?,
                    composition: node.str(COMPOSITION)?.to_string(),
                };
                check_composition(&definition, &node.child_path(COMPOSITION))?;
                CohortDefinition::Composition(definition)
            }
            other => return Err(SerializationError::unknown_type(other, node.path())),
        };
        Ok(Definition::Cohort(Arc::new(cohort)))
    }
}

/// Every key the composition string names must be one of the searches
fn check_composition(
    definition: &CompositionCohortDefinition,
    path: &str,
) -> SerializationResult<()> {
    match composition_keys(&definition.composition)
        .find(|key| !definition.searches.contains_key(*key))
    {
        Some(key) => Err(SerializationError::invalid_field(
            path,
            format!("composition refers to undefined search '{}'", key),
        )),
        None => Ok(()),
    }
}

/// Search keys a composition string refers to, e.g. `1` and `2` in `(1 AND NOT 2)`
fn composition_keys(composition: &str) -> impl Iterator<Item = &str> {
    composition
        .split(|c: char| c.is_whitespace() || c == '(' || c == ')')
        .filter(|token| !token.is_empty())
        .filter(|token| !matches!(token.to_ascii_uppercase().as_str(), "AND" | "OR" | "NOT"))
}
