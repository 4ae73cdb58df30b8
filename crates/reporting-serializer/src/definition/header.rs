use reporting_types::Parameter;
use uuid::Uuid;

/// Fields every definition carries
#[derive(Debug, Clone, PartialEq)]
pub struct DefinitionHeader {
    /// Stable identifier; the nil UUID marks a definition that has none yet
    pub uuid: Uuid,
    pub name: String,
    pub description: Option<String>,
    /// Parameters the definition declares
    pub parameters: Vec<Parameter>,
}

impl DefinitionHeader {
    /// Create a header with a fresh random UUID
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            name: name.into(),
            description: None,
            parameters: Vec::new(),
        }
    }

    pub fn with_uuid(mut self, uuid: Uuid) -> Self {
        self.uuid = uuid;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_parameter(mut self, parameter: Parameter) -> Self {
        self.add_parameter(parameter);
        self
    }

    /// Declare a parameter, replacing any previous one with the same name
    pub fn add_parameter(&mut self, parameter: Parameter) {
        match self.parameters.iter_mut().find(|p| p.name == parameter.name) {
            Some(existing) => *existing = parameter,
            None => self.parameters.push(parameter),
        }
    }

    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.name == name)
    }

    pub fn has_uuid(&self) -> bool {
        !self.uuid.is_nil()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reporting_types::ParameterType;

    #[test]
    fn test_add_parameter_replaces_same_name() {
        let mut header = DefinitionHeader::new("Visits")
            .with_parameter(Parameter::new("startDate", ParameterType::Date));
        header.add_parameter(Parameter::new("startDate", ParameterType::DateTime));
        header.add_parameter(Parameter::new("location", ParameterType::Integer));

        assert_eq!(header.parameters.len(), 2);
        assert_eq!(
            header.parameter("startDate").map(|p| p.parameter_type),
            Some(ParameterType::DateTime)
        );
    }

    #[test]
    fn test_fresh_header_has_uuid() {
        assert!(DefinitionHeader::new("a").has_uuid());
        assert!(!DefinitionHeader::new("a").with_uuid(Uuid::nil()).has_uuid());
    }
}
