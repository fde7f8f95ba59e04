use serde::{Deserialize, Serialize};
use tf_provider::schema::{AttributeConstraint, Block, NestedBlock};
use tf_provider::value::Value;
use tf_provider::{AttributePath, Diagnostics, value};

use super::ApiResourceKind;
use crate::error::Result;
use crate::mappers::lifecycle::{lifecycle_state, to_lifecycle};
use crate::model::{Lifecycle, RETENTION_UNIT_DAYS, RETENTION_UNIT_ITEMS, RetentionPeriod};
use crate::plan::{carry, default_to, is_null};
use crate::schema::{self, Attributes, Blocks as SchemaBlocks};
use crate::validators;
use crate::value::{Blocks, BoolValue, NumberValue, StringList, StringValue, blocks, known};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LifecycleState {
    pub id: StringValue,
    pub space_id: StringValue,
    pub name: StringValue,
    pub description: StringValue,
    pub phase: Blocks<PhaseState>,
    #[serde(with = "value::serde_as_vec")]
    pub release_retention_policy: Value<RetentionPolicyState>,
    #[serde(with = "value::serde_as_vec")]
    pub tentacle_retention_policy: Value<RetentionPolicyState>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhaseState {
    pub id: StringValue,
    pub name: StringValue,
    pub automatic_deployment_targets: StringList,
    pub optional_deployment_targets: StringList,
    pub minimum_environments_before_promotion: NumberValue,
    pub is_optional_phase: BoolValue,
    pub is_priority_phase: BoolValue,
    #[serde(with = "value::serde_as_vec")]
    pub release_retention_policy: Value<RetentionPolicyState>,
    #[serde(with = "value::serde_as_vec")]
    pub tentacle_retention_policy: Value<RetentionPolicyState>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RetentionPolicyState {
    pub quantity_to_keep: NumberValue,
    pub should_keep_forever: BoolValue,
    pub unit: StringValue,
}

pub fn retention_policy_attributes() -> Attributes {
    use AttributeConstraint::OptionalComputed;

    let mut attributes = Attributes::new();
    attributes.insert(
        "quantity_to_keep".into(),
        schema::number(
            OptionalComputed,
            "The number of days/releases to keep. The default value is 30. If 0 then all are kept.",
        ),
    );
    attributes.insert(
        "should_keep_forever".into(),
        schema::boolean(
            OptionalComputed,
            "Indicates if items should never be deleted. The default value is false.",
        ),
    );
    attributes.insert(
        "unit".into(),
        schema::string(
            OptionalComputed,
            "The unit of quantity to keep. Valid units are Days or Items. The default value is Days.",
        ),
    );
    attributes
}

fn retention_policy_blocks() -> SchemaBlocks {
    let policy = || {
        NestedBlock::Optional(schema::block(
            "Defines the retention policy for releases or tentacles.",
            retention_policy_attributes(),
            Default::default(),
        ))
    };
    SchemaBlocks::from([
        ("release_retention_policy".into(), policy()),
        ("tentacle_retention_policy".into(), policy()),
    ])
}

pub fn phase_attributes() -> Attributes {
    use AttributeConstraint::OptionalComputed;

    let mut attributes = Attributes::new();
    attributes.insert(
        "id".into(),
        schema::string(OptionalComputed, "The unique ID for this resource."),
    );
    attributes.insert("name".into(), schema::name("phase"));
    attributes.insert(
        "automatic_deployment_targets".into(),
        schema::string_list(
            OptionalComputed,
            "Environment IDs in this phase that a release is automatically deployed to when it is eligible for this phase.",
        ),
    );
    attributes.insert(
        "optional_deployment_targets".into(),
        schema::string_list(
            OptionalComputed,
            "Environment IDs in this phase that a release can be deployed to, but is not automatically deployed to.",
        ),
    );
    attributes.insert(
        "minimum_environments_before_promotion".into(),
        schema::number(
            OptionalComputed,
            "The number of units required before a release can enter the next phase. If 0, all environments are required.",
        ),
    );
    attributes.insert(
        "is_optional_phase".into(),
        schema::boolean(
            OptionalComputed,
            "If false a release must be deployed to this phase before it can be deployed to the next phase.",
        ),
    );
    attributes.insert(
        "is_priority_phase".into(),
        schema::boolean(OptionalComputed, "Deployments will be prioritized in this phase."),
    );
    attributes
}

fn plan_retention_policy(planned: &mut Value<RetentionPolicyState>, config: &Value<RetentionPolicyState>) {
    let (Value::Value(planned), Value::Value(config)) = (planned, config) else {
        return;
    };
    let defaults = RetentionPeriod::default();
    default_to(&mut planned.quantity_to_keep, &config.quantity_to_keep, defaults.quantity_to_keep);
    default_to(
        &mut planned.should_keep_forever,
        &config.should_keep_forever,
        defaults.should_keep_forever,
    );
    default_to(&mut planned.unit, &config.unit, defaults.unit);
}

fn plan_phase(planned: &mut PhaseState, config: &PhaseState, prior: Option<&PhaseState>) {
    carry(&mut planned.id, &config.id, prior.map(|p| &p.id));
    carry(
        &mut planned.automatic_deployment_targets,
        &config.automatic_deployment_targets,
        prior.map(|p| &p.automatic_deployment_targets),
    );
    carry(
        &mut planned.optional_deployment_targets,
        &config.optional_deployment_targets,
        prior.map(|p| &p.optional_deployment_targets),
    );
    default_to(
        &mut planned.minimum_environments_before_promotion,
        &config.minimum_environments_before_promotion,
        0,
    );
    default_to(&mut planned.is_optional_phase, &config.is_optional_phase, false);
    default_to(&mut planned.is_priority_phase, &config.is_priority_phase, false);
    plan_retention_policy(&mut planned.release_retention_policy, &config.release_retention_policy);
    plan_retention_policy(&mut planned.tentacle_retention_policy, &config.tentacle_retention_policy);
}

/// `should_keep_forever` must agree with a zero `quantity_to_keep`.
fn validate_retention_policy(diags: &mut Diagnostics, path: AttributePath, policy: &Value<RetentionPolicyState>) {
    let Some(policy) = known(policy) else {
        return;
    };
    validators::at_least(diags, path.clone().attribute("quantity_to_keep"), &policy.quantity_to_keep, 0);
    if let (Value::Value(quantity), Value::Value(forever)) =
        (&policy.quantity_to_keep, &policy.should_keep_forever)
    {
        let detail = match (*quantity == 0, *forever) {
            (true, false) => Some("should_keep_forever must be true when quantity_to_keep is 0"),
            (false, true) => Some("should_keep_forever must be false when quantity_to_keep is not 0"),
            _ => None,
        };
        if let Some(detail) = detail {
            diags.error(
                "Invalid retention policy configuration",
                detail,
                path.clone().attribute("should_keep_forever"),
            );
        }
    }
    validators::one_of(
        diags,
        path.attribute("unit"),
        &policy.unit,
        &[RETENTION_UNIT_DAYS, RETENTION_UNIT_ITEMS],
        true,
    );
}

pub struct LifecycleKind;

impl ApiResourceKind for LifecycleKind {
    type Model = Lifecycle;
    type State = LifecycleState;

    const TYPE_NAME: &'static str = "octopusdeploy_lifecycle";
    const DISPLAY_NAME: &'static str = "lifecycle";

    fn schema() -> Block {
        let mut attributes = Attributes::new();
        attributes.insert("id".into(), schema::id());
        attributes.insert("space_id".into(), schema::space_id("lifecycle"));
        attributes.insert("name".into(), schema::name("lifecycle"));
        attributes.insert("description".into(), schema::description("lifecycle"));

        let mut blocks = retention_policy_blocks();
        blocks.insert(
            "phase".into(),
            NestedBlock::List(schema::block(
                "Defines a phase in the lifecycle.",
                phase_attributes(),
                retention_policy_blocks(),
            )),
        );

        schema::block(
            "This resource manages lifecycles in Octopus Deploy.",
            attributes,
            blocks,
        )
    }

    fn id(state: &LifecycleState) -> &StringValue {
        &state.id
    }

    fn space_id(state: &LifecycleState) -> &StringValue {
        &state.space_id
    }

    fn space_id_mut(state: &mut LifecycleState) -> &mut StringValue {
        &mut state.space_id
    }

    fn to_model(state: &LifecycleState, _current: Option<&Lifecycle>) -> Result<Lifecycle> {
        Ok(to_lifecycle(state))
    }

    fn to_state(model: &Lifecycle, prior: Option<&LifecycleState>) -> Result<LifecycleState> {
        Ok(lifecycle_state(model, prior))
    }

    fn plan(planned: &mut LifecycleState, config: &LifecycleState, prior: Option<&LifecycleState>) {
        carry(&mut planned.id, &config.id, prior.map(|p| &p.id));
        default_to(&mut planned.description, &config.description, String::new());
        plan_retention_policy(&mut planned.release_retention_policy, &config.release_retention_policy);
        plan_retention_policy(&mut planned.tentacle_retention_policy, &config.tentacle_retention_policy);

        if is_null(&config.phase) {
            planned.phase = Value::Value(Vec::new());
            return;
        }
        let (Value::Value(planned_phases), Value::Value(config_phases)) = (&mut planned.phase, &config.phase)
        else {
            return;
        };
        for (planned_phase, config_phase) in planned_phases.iter_mut().zip(config_phases) {
            let (Value::Value(planned_phase), Value::Value(config_phase)) = (planned_phase, config_phase) else {
                continue;
            };
            let prior_phase = known(&config_phase.name).and_then(|name| {
                prior
                    .into_iter()
                    .flat_map(|p| blocks(&p.phase))
                    .find(|phase| known(&phase.name) == Some(name))
            });
            plan_phase(planned_phase, config_phase, prior_phase);
        }
    }

    fn validate(diags: &mut Diagnostics, config: &LifecycleState) {
        validators::not_empty(diags, AttributePath::new("name"), &config.name);
        validate_retention_policy(
            diags,
            AttributePath::new("release_retention_policy").index(0),
            &config.release_retention_policy,
        );
        validate_retention_policy(
            diags,
            AttributePath::new("tentacle_retention_policy").index(0),
            &config.tentacle_retention_policy,
        );

        let Value::Value(phases) = &config.phase else {
            return;
        };
        let mut names = Vec::new();
        for (index, phase) in phases.iter().enumerate() {
            let Value::Value(phase) = phase else {
                continue;
            };
            let path = AttributePath::new("phase").index(index as i64);
            validators::not_empty(diags, path.clone().attribute("name"), &phase.name);
            validators::at_least(
                diags,
                path.clone().attribute("minimum_environments_before_promotion"),
                &phase.minimum_environments_before_promotion,
                0,
            );
            validate_retention_policy(
                diags,
                path.clone().attribute("release_retention_policy").index(0),
                &phase.release_retention_policy,
            );
            validate_retention_policy(
                diags,
                path.clone().attribute("tentacle_retention_policy").index(0),
                &phase.tentacle_retention_policy,
            );
            if let Some(name) = known(&phase.name) {
                names.push((name.as_str(), path.attribute("name")));
            }
        }
        validators::unique_names(diags, "phase", names);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{flatten_list, string};

    fn policy(quantity: i64, forever: bool, unit: &str) -> Value<RetentionPolicyState> {
        Value::Value(RetentionPolicyState {
            quantity_to_keep: Value::Value(quantity),
            should_keep_forever: Value::Value(forever),
            unit: string(unit),
        })
    }

    fn phase(name: &str) -> PhaseState {
        PhaseState {
            name: string(name),
            ..Default::default()
        }
    }

    #[test]
    fn schema_nests_retention_policies_in_phases() {
        let block = LifecycleKind::schema();
        let Some(NestedBlock::List(phase)) = block.blocks.get("phase") else {
            panic!("phase must be a list block");
        };
        for name in ["release_retention_policy", "tentacle_retention_policy"] {
            assert!(matches!(block.blocks.get(name), Some(NestedBlock::Optional(_))), "{name}");
            assert!(phase.blocks.contains_key(name), "phase misses {name}");
        }
        assert_eq!(phase.attributes["name"].constraint, AttributeConstraint::Required);
        assert_eq!(block.attributes["name"].constraint, AttributeConstraint::Required);
    }

    #[test]
    fn keep_forever_must_match_zero_quantity() {
        let mut diags = Diagnostics::default();
        let config = LifecycleState {
            name: string("Default"),
            release_retention_policy: policy(0, true, "Days"),
            tentacle_retention_policy: policy(5, false, "items"),
            ..Default::default()
        };
        LifecycleKind::validate(&mut diags, &config);
        assert!(diags.errors.is_empty());

        let config = LifecycleState {
            release_retention_policy: policy(0, false, "Days"),
            tentacle_retention_policy: policy(3, true, "Weeks"),
            ..config
        };
        LifecycleKind::validate(&mut diags, &config);
        assert_eq!(diags.errors.len(), 3);
    }

    #[test]
    fn phase_names_must_be_unique() {
        let mut diags = Diagnostics::default();
        let config = LifecycleState {
            name: string("Default"),
            phase: Value::Value(vec![
                Value::Value(phase("Dev")),
                Value::Value(PhaseState {
                    release_retention_policy: policy(-1, false, "Days"),
                    ..phase("Dev")
                }),
            ]),
            ..Default::default()
        };
        LifecycleKind::validate(&mut diags, &config);
        assert_eq!(diags.errors.len(), 2);
    }

    #[test]
    fn plan_fills_phase_defaults_and_keeps_prior_ids() {
        let config = LifecycleState {
            name: string("Default"),
            phase: Value::Value(vec![
                Value::Value(PhaseState {
                    release_retention_policy: Value::Value(RetentionPolicyState {
                        should_keep_forever: Value::Value(true),
                        quantity_to_keep: Value::Value(0),
                        ..Default::default()
                    }),
                    ..phase("Dev")
                }),
                Value::Value(phase("Prod")),
            ]),
            ..Default::default()
        };
        let prior = LifecycleState {
            id: string("Lifecycles-1"),
            phase: Value::Value(vec![Value::Value(PhaseState {
                id: string("phase-prod"),
                automatic_deployment_targets: flatten_list(["Environments-3"]),
                ..phase("Prod")
            })]),
            ..config.clone()
        };

        let mut planned = config.clone();
        LifecycleKind::plan(&mut planned, &config, Some(&prior));
        assert_eq!(planned.id, string("Lifecycles-1"));
        assert_eq!(planned.description, string(""));
        assert!(matches!(planned.release_retention_policy, Value::Null));

        let phases: Vec<_> = blocks(&planned.phase).collect();
        assert!(matches!(phases[0].id, Value::Unknown));
        assert_eq!(phases[0].minimum_environments_before_promotion, Value::Value(0));
        assert_eq!(phases[0].is_optional_phase, Value::Value(false));
        let dev_policy = known(&phases[0].release_retention_policy).expect("policy");
        assert_eq!(dev_policy.unit, string("Days"));
        assert_eq!(dev_policy.quantity_to_keep, Value::Value(0));
        assert!(matches!(phases[0].tentacle_retention_policy, Value::Null));

        assert_eq!(phases[1].id, string("phase-prod"));
        assert_eq!(phases[1].automatic_deployment_targets, flatten_list(["Environments-3"]));
    }
}
