use serde::{Deserialize, Serialize};
use tf_provider::{AttributePath, Diagnostics, value};
use tf_provider::schema::{AttributeConstraint, Block, NestedBlock};
use tf_provider::value::Value;

use super::ApiResourceKind;
use crate::error::Result;
use crate::mappers::environment::{environment_state, to_environment};
use crate::model::Environment;
use crate::plan::{carry, default_to};
use crate::schema::{self, Attributes};
use crate::validators;
use crate::value::{BoolValue, NumberValue, StringValue, known};

pub const JIRA_ENVIRONMENT_TYPES: [&str; 5] =
    ["development", "production", "staging", "testing", "unmapped"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentState {
    pub id: StringValue,
    pub space_id: StringValue,
    pub name: StringValue,
    pub slug: StringValue,
    pub description: StringValue,
    pub sort_order: NumberValue,
    pub allow_dynamic_infrastructure: BoolValue,
    pub use_guided_failure: BoolValue,
    #[serde(with = "value::serde_as_vec")]
    pub jira_extension_settings: Value<JiraExtensionSettingsState>,
    #[serde(with = "value::serde_as_vec")]
    pub jira_service_management_extension_settings: Value<ChangeControlState>,
    #[serde(with = "value::serde_as_vec")]
    pub servicenow_extension_settings: Value<ChangeControlState>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JiraExtensionSettingsState {
    pub environment_type: StringValue,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChangeControlState {
    pub is_enabled: BoolValue,
}

/// Attributes shared with the `octopusdeploy_environments` data source.
pub fn attributes() -> Attributes {
    use AttributeConstraint::OptionalComputed;

    let mut attributes = Attributes::new();
    attributes.insert("id".into(), schema::id());
    attributes.insert("space_id".into(), schema::space_id("environment"));
    attributes.insert("name".into(), schema::name("environment"));
    attributes.insert("slug".into(), schema::slug("environment"));
    attributes.insert("description".into(), schema::description("environment"));
    attributes.insert(
        "sort_order".into(),
        schema::number(OptionalComputed, "The order number to sort an environment."),
    );
    attributes.insert(
        "allow_dynamic_infrastructure".into(),
        schema::boolean(
            OptionalComputed,
            "Whether deployment targets can be created dynamically in this environment. Defaults to `false`.",
        ),
    );
    attributes.insert(
        "use_guided_failure".into(),
        schema::boolean(
            OptionalComputed,
            "Whether guided failure mode is on by default for deployments to this environment. Defaults to `false`.",
        ),
    );
    attributes
}

fn change_control_block(product: &str) -> NestedBlock {
    let mut attributes = Attributes::new();
    attributes.insert(
        "is_enabled".into(),
        schema::boolean(
            AttributeConstraint::Required,
            format!("Whether {product} change controls are enabled for this environment."),
        ),
    );
    NestedBlock::Optional(schema::block(
        format!("Provides extension settings for the {product} integration for this environment."),
        attributes,
        Default::default(),
    ))
}

pub struct EnvironmentKind;

impl ApiResourceKind for EnvironmentKind {
    type Model = Environment;
    type State = EnvironmentState;

    const TYPE_NAME: &'static str = "octopusdeploy_environment";
    const DISPLAY_NAME: &'static str = "environment";

    fn schema() -> Block {
        let mut jira = Attributes::new();
        jira.insert(
            "environment_type".into(),
            schema::string(
                AttributeConstraint::Required,
                format!(
                    "The Jira environment type of this Octopus deployment environment. Valid values are {}.",
                    JIRA_ENVIRONMENT_TYPES.map(|t| format!("`\"{t}\"`")).join(", ")
                ),
            ),
        );

        let mut blocks = schema::Blocks::new();
        blocks.insert(
            "jira_extension_settings".into(),
            NestedBlock::Optional(schema::block(
                "Provides extension settings for the Jira integration for this environment.",
                jira,
                Default::default(),
            )),
        );
        blocks.insert(
            "jira_service_management_extension_settings".into(),
            change_control_block("Jira Service Management"),
        );
        blocks.insert(
            "servicenow_extension_settings".into(),
            change_control_block("ServiceNow"),
        );

        schema::block(
            "This resource manages environments in Octopus Deploy.",
            attributes(),
            blocks,
        )
    }

    fn id(state: &EnvironmentState) -> &StringValue {
        &state.id
    }

    fn space_id(state: &EnvironmentState) -> &StringValue {
        &state.space_id
    }

    fn space_id_mut(state: &mut EnvironmentState) -> &mut StringValue {
        &mut state.space_id
    }

    fn to_model(state: &EnvironmentState, _current: Option<&Environment>) -> Result<Environment> {
        Ok(to_environment(state))
    }

    fn to_state(model: &Environment, prior: Option<&EnvironmentState>) -> Result<EnvironmentState> {
        Ok(environment_state(model, prior))
    }

    fn plan(planned: &mut EnvironmentState, config: &EnvironmentState, prior: Option<&EnvironmentState>) {
        carry(&mut planned.id, &config.id, prior.map(|p| &p.id));
        carry(&mut planned.slug, &config.slug, prior.map(|p| &p.slug));
        carry(&mut planned.sort_order, &config.sort_order, prior.map(|p| &p.sort_order));
        default_to(&mut planned.description, &config.description, String::new());
        default_to(
            &mut planned.allow_dynamic_infrastructure,
            &config.allow_dynamic_infrastructure,
            false,
        );
        default_to(&mut planned.use_guided_failure, &config.use_guided_failure, false);
    }

    fn validate(diags: &mut Diagnostics, config: &EnvironmentState) {
        validators::not_empty(diags, AttributePath::new("name"), &config.name);
        if let Some(jira) = known(&config.jira_extension_settings) {
            validators::one_of(
                diags,
                AttributePath::new("jira_extension_settings")
                    .index(0)
                    .attribute("environment_type"),
                &jira.environment_type,
                &JIRA_ENVIRONMENT_TYPES,
                true,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::string;

    #[test]
    fn environment_type_is_case_insensitive() {
        let mut config = EnvironmentState {
            name: string("Production"),
            jira_extension_settings: Value::Value(JiraExtensionSettingsState {
                environment_type: string("PRODUCTION"),
            }),
            ..Default::default()
        };
        let mut diags = Diagnostics::default();
        EnvironmentKind::validate(&mut diags, &config);
        assert!(diags.errors.is_empty());

        config.jira_extension_settings = Value::Value(JiraExtensionSettingsState {
            environment_type: string("qa"),
        });
        EnvironmentKind::validate(&mut diags, &config);
        assert_eq!(diags.errors.len(), 1);
    }

    #[test]
    fn plan_defaults_flags_and_keeps_identity() {
        let config = EnvironmentState {
            name: string("Test"),
            ..Default::default()
        };
        let prior = EnvironmentState {
            id: string("Environments-1"),
            slug: string("test"),
            sort_order: Value::Value(3),
            ..config.clone()
        };
        let mut planned = config.clone();
        EnvironmentKind::plan(&mut planned, &config, Some(&prior));
        assert_eq!(planned.id, string("Environments-1"));
        assert_eq!(planned.sort_order, Value::Value(3));
        assert_eq!(planned.allow_dynamic_infrastructure, Value::Value(false));
        assert_eq!(planned.description, string(""));
    }

    #[test]
    fn schema_declares_extension_blocks() {
        let block = EnvironmentKind::schema();
        for name in [
            "jira_extension_settings",
            "jira_service_management_extension_settings",
            "servicenow_extension_settings",
        ] {
            assert!(block.blocks.contains_key(name), "missing {name}");
        }
        assert_eq!(block.attributes["name"].constraint, AttributeConstraint::Required);
    }
}
