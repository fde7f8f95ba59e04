use std::collections::HashMap;

use tf_provider::schema::{Attribute, AttributeConstraint, AttributeType, Block, Description, NestedBlock};

mod action;

pub use action::ActionSchemaBuilder;

pub type Attributes = HashMap<String, Attribute>;
pub type Blocks = HashMap<String, NestedBlock>;

pub fn attribute(
    attr_type: AttributeType,
    constraint: AttributeConstraint,
    description: impl ToString,
) -> Attribute {
    Attribute {
        attr_type,
        description: Description::markdown(description),
        constraint,
        ..Default::default()
    }
}

pub fn string(constraint: AttributeConstraint, description: impl ToString) -> Attribute {
    attribute(AttributeType::String, constraint, description)
}

pub fn boolean(constraint: AttributeConstraint, description: impl ToString) -> Attribute {
    attribute(AttributeType::Bool, constraint, description)
}

pub fn number(constraint: AttributeConstraint, description: impl ToString) -> Attribute {
    attribute(AttributeType::Number, constraint, description)
}

pub fn string_list(constraint: AttributeConstraint, description: impl ToString) -> Attribute {
    attribute(
        AttributeType::List(Box::new(AttributeType::String)),
        constraint,
        description,
    )
}

pub fn string_map(constraint: AttributeConstraint, description: impl ToString) -> Attribute {
    attribute(
        AttributeType::Map(Box::new(AttributeType::String)),
        constraint,
        description,
    )
}

pub fn sensitive(mut attribute: Attribute) -> Attribute {
    attribute.sensitive = true;
    attribute
}

pub fn block(description: impl ToString, attributes: Attributes, blocks: Blocks) -> Block {
    Block {
        attributes,
        blocks,
        description: Description::markdown(description),
        ..Default::default()
    }
}

/// Computed identifier, kept across updates.
pub fn id() -> Attribute {
    string(
        AttributeConstraint::Computed,
        "The unique ID for this resource.",
    )
}

pub fn space_id(resource: &str) -> Attribute {
    string(
        AttributeConstraint::OptionalComputed,
        format!("The space ID associated with this {resource}."),
    )
}

pub fn name(resource: &str) -> Attribute {
    string(
        AttributeConstraint::Required,
        format!("The name of this {resource}."),
    )
}

pub fn description(resource: &str) -> Attribute {
    string(
        AttributeConstraint::OptionalComputed,
        format!("The description of this {resource}."),
    )
}

pub fn slug(resource: &str) -> Attribute {
    string(
        AttributeConstraint::OptionalComputed,
        format!("The unique slug of this {resource}."),
    )
}

/// `ids`, `partial_name`, `skip`, `take` and `space_id` filters of a data source, plus its synthetic `id`.
pub fn query_attributes(resource: &str) -> Attributes {
    let mut attributes = Attributes::new();
    attributes.insert(
        "id".into(),
        string(
            AttributeConstraint::Computed,
            "An auto-generated identifier that includes the timestamp when this data source was last modified.",
        ),
    );
    attributes.insert(
        "ids".into(),
        string_list(AttributeConstraint::Optional, "A filter to search by a list of IDs."),
    );
    attributes.insert(
        "partial_name".into(),
        string(AttributeConstraint::Optional, "A filter to search by a partial name."),
    );
    attributes.insert(
        "skip".into(),
        number(
            AttributeConstraint::Optional,
            "A filter to specify the number of items to skip in the response.",
        ),
    );
    attributes.insert(
        "take".into(),
        number(
            AttributeConstraint::Optional,
            "A filter to specify the number of items to take (or return) in the response.",
        ),
    );
    attributes.insert(
        "space_id".into(),
        string(
            AttributeConstraint::Optional,
            format!("The space ID associated with the {resource}."),
        ),
    );
    attributes
}

/// Read-only copy of a resource schema for use in a data source's result list.
pub fn computed_copy(attributes: &Attributes) -> Attributes {
    attributes
        .iter()
        .map(|(name, attribute)| {
            let mut attribute = attribute.clone();
            attribute.constraint = AttributeConstraint::Computed;
            (name.clone(), attribute)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn computed_copy_marks_everything_computed() {
        let mut attributes = Attributes::new();
        attributes.insert("name".into(), name("environment"));
        attributes.insert("space_id".into(), space_id("environment"));
        let copy = computed_copy(&attributes);
        assert!(
            copy.values()
                .all(|a| a.constraint == AttributeConstraint::Computed)
        );
        assert_eq!(copy.len(), 2);
    }

    #[test]
    fn query_attributes_cover_paging() {
        let attributes = query_attributes("environments");
        for key in ["id", "ids", "partial_name", "skip", "take", "space_id"] {
            assert!(attributes.contains_key(key), "missing {key}");
        }
        assert_eq!(attributes["id"].constraint, AttributeConstraint::Computed);
    }

    #[test]
    fn sensitive_flag_is_set() {
        assert!(sensitive(string(AttributeConstraint::Optional, "secret")).sensitive);
    }
}
