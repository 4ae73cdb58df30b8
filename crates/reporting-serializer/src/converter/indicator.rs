use super::{DefinitionConverter, ReadContext, WriteContext, wrong_family};
use crate::definition::{
    CohortIndicator, Definition, DefinitionHeader, DefinitionKind, Indicator, IndicatorType,
};
use crate::error::{SerializationError, SerializationResult};
use crate::node::{NodeReader, field_path};
use serde_json::{Map, Value};
use std::sync::Arc;

const INDICATOR_TYPE: &str = "indicatorType";
const COHORT_DEFINITION: &str = "cohortDefinition";
const DENOMINATOR: &str = "denominator";

/// Converter for indicators
#[derive(Debug, Default, Clone, Copy)]
pub struct IndicatorConverter;

impl DefinitionConverter for IndicatorConverter {
    fn kind(&self) -> DefinitionKind {
        DefinitionKind::Indicator
    }

    fn type_tags(&self) -> &'static [&'static str] {
        &[CohortIndicator::TYPE_TAG]
    }

    fn write(
        &self,
        definition: &Definition,
        node: &mut Map<String, Value>,
        ctx: &mut WriteContext<'_>,
        path: &str,
    ) -> SerializationResult<()> {
        let Definition::Indicator(indicator) = definition else {
            return Err(wrong_family(DefinitionKind::Indicator, definition, path));
        };

        match indicator.as_ref() {
            Indicator::Cohort(d) => {
                check_denominator(d, path)?;
                node.insert(
                    INDICATOR_TYPE.to_string(),
                    Value::String(d.indicator_type.to_string()),
                );
                let cohort = ctx.write_mapped(
                    &d.cohort_definition,
                    &field_path(path, COHORT_DEFINITION),
                )?;
                node.insert(COHORT_DEFINITION.to_string(), cohort);
                if let Some(denominator) = &d.denominator {
                    let denominator =
                        ctx.write_mapped(denominator, &field_path(path, DENOMINATOR))?;
                    node.insert(DENOMINATOR.to_string(), denominator);
                }
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
        if tag != CohortIndicator::TYPE_TAG {
            return Err(SerializationError::unknown_type(tag, node.path()));
        }

        let indicator_type = match node.opt_str(INDICATOR_TYPE)? {
            Some(raw) => raw.parse::<IndicatorType>().map_err(|message| {
                SerializationError::invalid_field(node.child_path(INDICATOR_TYPE), message)
            })?,
            None => IndicatorType::default(),
        };
        let indicator = CohortIndicator {
            header,
            indicator_type,
            cohort_definition: ctx.read_mapped_field(node, COHORT_DEFINITION)?,
            denominator: ctx.read_optional_mapped(node, DENOMINATOR)?,
        };
        check_denominator(&indicator, node.path())?;

        Ok(Definition::Indicator(Arc::new(Indicator::Cohort(indicator))))
    }
}

/// A fraction needs a denominator cohort
fn check_denominator(indicator: &CohortIndicator, path: &str) -> SerializationResult<()> {
    if indicator.indicator_type == IndicatorType::Fraction && indicator.denominator.is_none() {
        return Err(SerializationError::missing_field(DENOMINATOR, path));
    }
    Ok(())
}
