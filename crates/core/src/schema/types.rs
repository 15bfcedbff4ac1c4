use crate::metadata::EntityMetadata;

/// Everything needed to issue a single create-table request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    pub table_name: String,
    pub key_schema: Vec<KeySchemaElement>,
    pub attribute_definitions: Vec<AttributeDefinition>,
    pub secondary_indexes: Vec<SecondaryIndex>,
    pub billing_mode: BillingMode,
}

/// One entry of a key schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeySchemaElement {
    pub attribute_name: String,
    pub key_type: KeyType,
}

/// Role of an attribute in a key schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyType {
    Hash,
    Range,
}

/// A key attribute definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeDefinition {
    pub attribute_name: String,
    pub attribute_type: AttributeType,
}

/// DynamoDB attribute types. Only string keys are supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeType {
    String,
}

/// Global Secondary Index declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecondaryIndex {
    pub name: String,
    pub key_schema: Vec<KeySchemaElement>,
    pub projection: ProjectionType,
}

/// GSI projection type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionType {
    All,
}

/// Billing mode for the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BillingMode {
    PayPerRequest,
}

impl KeySchemaElement {
    fn hash(name: &str) -> Self {
        Self {
            attribute_name: name.to_string(),
            key_type: KeyType::Hash,
        }
    }

    fn range(name: &str) -> Self {
        Self {
            attribute_name: name.to_string(),
            key_type: KeyType::Range,
        }
    }
}

impl TableSchema {
    /// Derives the table schema declared by entity metadata.
    ///
    /// Attribute definitions are deduplicated: a field used as a key by the
    /// table and by one or more indexes is declared once.
    pub fn from_metadata(metadata: &EntityMetadata) -> Self {
        let mut attribute_definitions = Vec::new();

        let table_key_schema = key_schema(
            &metadata.partition_key,
            metadata.sort_key.as_deref(),
            &mut attribute_definitions,
        );

        let secondary_indexes = metadata
            .indexes
            .iter()
            .map(|(name, index)| SecondaryIndex {
                name: name.clone(),
                key_schema: key_schema(
                    &index.partition_key,
                    index.sort_key.as_deref(),
                    &mut attribute_definitions,
                ),
                projection: ProjectionType::All,
            })
            .collect();

        Self {
            table_name: metadata.table_name.clone(),
            key_schema: table_key_schema,
            attribute_definitions,
            secondary_indexes,
            billing_mode: BillingMode::PayPerRequest,
        }
    }

    /// Returns the key schema of the named index, or of the table itself.
    pub fn key_schema_for(&self, index_name: Option<&str>) -> Option<&[KeySchemaElement]> {
        match index_name {
            None => Some(&self.key_schema),
            Some(name) => self
                .secondary_indexes
                .iter()
                .find(|index| index.name == name)
                .map(|index| index.key_schema.as_slice()),
        }
    }
}

/// Returns the attribute names of the hash and (optional) range key.
pub fn key_names(key_schema: &[KeySchemaElement]) -> (Option<&str>, Option<&str>) {
    let find = |key_type: KeyType| {
        key_schema
            .iter()
            .find(|element| element.key_type == key_type)
            .map(|element| element.attribute_name.as_str())
    };
    (find(KeyType::Hash), find(KeyType::Range))
}

fn key_schema(
    partition_key: &str,
    sort_key: Option<&str>,
    attribute_definitions: &mut Vec<AttributeDefinition>,
) -> Vec<KeySchemaElement> {
    let mut schema = vec![KeySchemaElement::hash(partition_key)];
    declare(attribute_definitions, partition_key);

    if let Some(sort_key) = sort_key {
        schema.push(KeySchemaElement::range(sort_key));
        declare(attribute_definitions, sort_key);
    }

    schema
}

fn declare(attribute_definitions: &mut Vec<AttributeDefinition>, name: &str) {
    if !attribute_definitions
        .iter()
        .any(|definition| definition.attribute_name == name)
    {
        attribute_definitions.push(AttributeDefinition {
            attribute_name: name.to_string(),
            attribute_type: AttributeType::String,
        });
    }
}
