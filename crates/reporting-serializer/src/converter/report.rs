use super::{DefinitionConverter, ReadContext, WriteContext, wrong_family};
use crate::definition::{Definition, DefinitionHeader, DefinitionKind, ReportDefinition};
use crate::error::{SerializationError, SerializationResult};
use crate::node::{NodeReader, field_path};
use serde_json::{Map, Value};
use std::sync::Arc;

const BASE_COHORT_DEFINITION: &str = "baseCohortDefinition";
const DATA_SET_DEFINITIONS: &str = "dataSetDefinitions";

/// Converter for report definitions
#[derive(Debug, Default, Clone, Copy)]
pub struct ReportDefinitionConverter;

impl DefinitionConverter for ReportDefinitionConverter {
    fn kind(&self) -> DefinitionKind {
        DefinitionKind::Report
    }

    fn type_tags(&self) -> &'static [&'static str] {
        &[ReportDefinition::TYPE_TAG]
    }

    fn write(
        &self,
        definition: &Definition,
        node: &mut Map<String, Value>,
        ctx: &mut WriteContext<'_>,
        path: &str,
    ) -> SerializationResult<()> {
        let Definition::Report(report) = definition else {
            return Err(wrong_family(DefinitionKind::Report, definition, path));
        };

        if let Some(base) = &report.base_cohort_definition {
            let base = ctx.write_mapped(base, &field_path(path, BASE_COHORT_DEFINITION))?;
            node.insert(BASE_COHORT_DEFINITION.to_string(), base);
        }
        let data_sets = ctx.write_mapped_map(
            &report.data_set_definitions,
            &field_path(path, DATA_SET_DEFINITIONS),
        )?;
        node.insert(DATA_SET_DEFINITIONS.to_string(), data_sets);
        Ok(())
    }

    fn read(
        &self,
        tag: &str,
        header: DefinitionHeader,
        node: &NodeReader<'_>,
        ctx: &mut ReadContext<'_>,
    ) -> SerializationResult<Definition> {
        if tag != ReportDefinition::TYPE_TAG {
            return Err(SerializationError::unknown_type(tag, node.path()));
        }

        Ok(Definition::Report(Arc::new(ReportDefinition {
            header,
            base_cohort_definition: ctx.read_optional_mapped(node, BASE_COHORT_DEFINITION)?,
            data_set_definitions: ctx.read_mapped_map(node, DATA_SET_DEFINITIONS)?,
        })))
    }
}
