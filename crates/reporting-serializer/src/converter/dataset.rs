use super::{DefinitionConverter, ReadContext, WriteContext, wrong_family};
use crate::definition::{
    CohortIndicatorColumn, CohortIndicatorDataSetDefinition, DataSetDefinition, Definition,
    DefinitionHeader, DefinitionKind, SqlDataSetDefinition,
};
use crate::error::{SerializationError, SerializationResult};
use crate::node::{NAME, NodeReader, field_path, index_path};
use serde_json::{Map, Value};
use std::sync::Arc;

const SQL_QUERY: &str = "sqlQuery";
const DIMENSIONS: &str = "dimensions";
const COLUMNS: &str = "columns";
const LABEL: &str = "label";
const INDICATOR: &str = "indicator";
const DIMENSION_OPTIONS: &str = "dimensionOptions";

/// Converter for dataset definitions
#[derive(Debug, Default, Clone, Copy)]
pub struct DataSetDefinitionConverter;

impl DefinitionConverter for DataSetDefinitionConverter {
    fn kind(&self) -> DefinitionKind {
        DefinitionKind::DataSet
    }

    fn type_tags(&self) -> &'static [&'static str] {
        &[
            SqlDataSetDefinition::TYPE_TAG,
            CohortIndicatorDataSetDefinition::TYPE_TAG,
        ]
    }

    fn write(
        &self,
        definition: &Definition,
        node: &mut Map<String, Value>,
        ctx: &mut WriteContext<'_>,
        path: &str,
    ) -> SerializationResult<()> {
        let Definition::DataSet(data_set) = definition else {
            return Err(wrong_family(DefinitionKind::DataSet, definition, path));
        };

        match data_set.as_ref() {
            DataSetDefinition::Sql(d) => {
                node.insert(SQL_QUERY.to_string(), Value::String(d.sql_query.clone()));
            }
            DataSetDefinition::CohortIndicator(d) => {
                let columns_path = field_path(path, COLUMNS);
                check_dimensions(d, &columns_path)?;
                if !d.dimensions.is_empty() {
                    let dimensions =
                        ctx.write_mapped_map(&d.dimensions, &field_path(path, DIMENSIONS))?;
                    node.insert(DIMENSIONS.to_string(), dimensions);
                }
                let mut columns = Vec::with_capacity(d.columns.len());
                for (i, column) in d.columns.iter().enumerate() {
                    columns.push(write_column(column, ctx, &index_path(&columns_path, i))?);
                }
                node.insert(COLUMNS.to_string(), Value::Array(columns));
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
        let data_set = match tag {
            SqlDataSetDefinition::TYPE_TAG => DataSetDefinition::Sql(SqlDataSetDefinition {
                header,
                sql_query: node.str(SQL_QUERY)?.to_string(),
            }),
            CohortIndicatorDataSetDefinition::TYPE_TAG => {
                let dimensions = ctx.read_mapped_map(node, DIMENSIONS)?;
                let columns_path = node.child_path(COLUMNS);
                let mut columns = Vec::new();
                for (i, value) in node.array(COLUMNS)?.iter().enumerate() {
                    let column = NodeReader::new(value, index_path(&columns_path, i))?;
                    columns.push(read_column(&column, ctx)?);
                }

                let definition = CohortIndicatorDataSetDefinition {
                    header,
                    dimensions,
                    columns,
                };
                check_dimensions(&definition, &columns_path)?;
                DataSetDefinition::CohortIndicator(definition)
            }
            other => return Err(SerializationError::unknown_type(other, node.path())),
        };
        Ok(Definition::DataSet(Arc::new(data_set)))
    }
}

/// Columns may only filter by dimensions the dataset declares
fn check_dimensions(
    definition: &CohortIndicatorDataSetDefinition,
    columns_path: &str,
) -> SerializationResult<()> {
    match definition.undeclared_dimension() {
        Some((column, dimension)) => Err(SerializationError::invalid_field(
            columns_path,
            format!("column '{}' uses undeclared dimension '{}'", column, dimension),
        )),
        None => Ok(()),
    }
}

fn write_column(
    column: &CohortIndicatorColumn,
    ctx: &mut WriteContext<'_>,
    path: &str,
) -> SerializationResult<Value> {
    let mut node = Map::new();
    node.insert(NAME.to_string(), Value::String(column.name.clone()));
    node.insert(LABEL.to_string(), Value::String(column.label.clone()));
    node.insert(
        INDICATOR.to_string(),
        ctx.write_mapped(&column.indicator, &field_path(path, INDICATOR))?,
    );
    if !column.dimension_options.is_empty() {
        let options: Map<String, Value> = column
            .dimension_options
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect();
        node.insert(DIMENSION_OPTIONS.to_string(), Value::Object(options));
    }
    Ok(Value::Object(node))
}

fn read_column(
    node: &NodeReader<'_>,
    ctx: &mut ReadContext<'_>,
) -> SerializationResult<CohortIndicatorColumn> {
    let name = node.str(NAME)?.to_string();
    let label = match node.opt_str(LABEL)? {
        Some(label) => label.to_string(),
        None => name.clone(),
    };
    Ok(CohortIndicatorColumn {
        name,
        label,
        indicator: ctx.read_mapped_field(node, INDICATOR)?,
        dimension_options: node.string_map(DIMENSION_OPTIONS)?,
    })
}
