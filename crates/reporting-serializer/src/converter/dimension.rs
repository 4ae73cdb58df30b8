use super::{DefinitionConverter, ReadContext, WriteContext, wrong_family};
use crate::definition::{
    CohortDefinitionDimension, Definition, DefinitionHeader, DefinitionKind, Dimension,
};
use crate::error::{SerializationError, SerializationResult};
use crate::node::{NodeReader, field_path};
use serde_json::{Map, Value};
use std::sync::Arc;

const COHORT_DEFINITIONS: &str = "cohortDefinitions";

/// Converter for dimensions
#[derive(Debug, Default, Clone, Copy)]
pub struct DimensionConverter;

impl DefinitionConverter for DimensionConverter {
    fn kind(&self) -> DefinitionKind {
        DefinitionKind::Dimension
    }

    fn type_tags(&self) -> &'static [&'static str] {
        &[CohortDefinitionDimension::TYPE_TAG]
    }

    fn write(
        &self,
        definition: &Definition,
        node: &mut Map<String, Value>,
        ctx: &mut WriteContext<'_>,
        path: &str,
    ) -> SerializationResult<()> {
        let Definition::Dimension(dimension) = definition else {
            return Err(wrong_family(DefinitionKind::Dimension, definition, path));
        };

        match dimension.as_ref() {
            Dimension::Cohort(d) => {
                let options =
                    ctx.write_mapped_map(&d.options, &field_path(path, COHORT_DEFINITIONS))?;
                node.insert(COHORT_DEFINITIONS.to_string(), options);
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
        if tag != CohortDefinitionDimension::TYPE_TAG {
            return Err(SerializationError::unknown_type(tag, node.path()));
        }

        let options = ctx.read_mapped_map(node, COHORT_DEFINITIONS)?;
        Ok(Definition::Dimension(Arc::new(Dimension::Cohort(
            CohortDefinitionDimension { header, options },
        ))))
    }
}
