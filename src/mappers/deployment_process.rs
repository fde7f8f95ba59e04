use tf_provider::value::Value;
use tracing::warn;

use super::actions::{ACTION_BLOCKS, MappableAction, block_for_action_type, keys};
use super::{plain_properties, properties_state};
use crate::error::Result;
use crate::model::{DeploymentAction, DeploymentProcess, DeploymentStep, Properties, PropertyValue};
use crate::plan::{carry, default_to, is_null};
use crate::resources::deployment_process::state::{
    ActionBase, KubernetesSecretActionState, ManualInterventionActionState,
    PackageActionState, ProcessState, RunKubectlScriptActionState, RunScriptActionState, StepState,
    TerraformTemplateActionState, WindowsServiceActionState,
};
use crate::value::{
    Blocks, NumberValue, StringList, block_list, blocks, blocks_mut, expand_list, expand_map,
    flatten_list, flatten_list_or_null, known, non_empty, optional_string, string, string_or_empty,
};

pub const DEFAULT_STEP_CONDITION: &str = "Success";
pub const DEFAULT_PACKAGE_REQUIREMENT: &str = "LetOctopusDecide";
pub const DEFAULT_START_TRIGGER: &str = "StartAfterPrevious";

const STEP_KEYS: [&str; 3] = [
    keys::STEP_CONDITION_EXPRESSION,
    keys::STEP_TARGET_ROLES,
    keys::STEP_MAX_PARALLELISM,
];

/// Declared sort order, `None` when the action leaves it unset.
fn declared_sort_order(sort_order: &NumberValue) -> Option<i64> {
    known(sort_order).copied().filter(|order| *order >= 0)
}

/// Orders actions by declared sort order.
///
/// Actions without a sort order rank as 0. The sort is stable, so ties keep
/// declaration order.
pub fn order_actions<T>(mut declared: Vec<(Option<i64>, T)>) -> Vec<T> {
    declared.sort_by_key(|(order, _)| order.unwrap_or(0));
    declared.into_iter().map(|(_, item)| item).collect()
}

fn warn_on_ambiguous_order(step_name: &str, declared: &[Option<i64>]) {
    let mut orders: Vec<i64> = declared.iter().flatten().copied().collect();
    let declared_count = orders.len();
    orders.sort_unstable();
    orders.dedup();
    if orders.len() != declared_count {
        warn!(step = step_name, "actions share a sort_order; their relative order follows declaration order");
    }
    if declared_count > 0 && declared_count < declared.len() {
        warn!(
            step = step_name,
            "only some actions declare a sort_order; the others are sorted as 0"
        );
    }
}

fn collect<A: MappableAction>(
    list: &Blocks<A>,
    out: &mut Vec<(Option<i64>, DeploymentAction)>,
) -> Result<()> {
    for action in blocks(list) {
        out.push((
            declared_sort_order(&action.base().sort_order),
            action.to_deployment_action()?,
        ));
    }
    Ok(())
}

fn step_actions(step: &StepState) -> Result<Vec<DeploymentAction>> {
    let mut declared = Vec::new();
    collect(&step.action, &mut declared)?;
    collect(&step.manual_intervention_action, &mut declared)?;
    collect(&step.apply_terraform_template_action, &mut declared)?;
    collect(&step.deploy_package_action, &mut declared)?;
    collect(&step.deploy_windows_service_action, &mut declared)?;
    collect(&step.run_script_action, &mut declared)?;
    collect(&step.run_kubectl_script_action, &mut declared)?;
    collect(&step.deploy_kubernetes_secret_action, &mut declared)?;

    let orders: Vec<_> = declared.iter().map(|(order, _)| *order).collect();
    warn_on_ambiguous_order(&string_or_empty(&step.name), &orders);
    Ok(order_actions(declared))
}

fn to_step(step: &StepState) -> Result<DeploymentStep> {
    let mut properties: Properties = expand_map(&step.properties)
        .into_iter()
        .map(|(key, value)| (key, PropertyValue::from(value)))
        .collect();
    if let Some(expression) = non_empty(&step.condition_expression) {
        properties.insert(keys::STEP_CONDITION_EXPRESSION.to_string(), expression.into());
    }
    let target_roles = expand_list(&step.target_roles);
    if !target_roles.is_empty() {
        properties.insert(
            keys::STEP_TARGET_ROLES.to_string(),
            target_roles.join(",").into(),
        );
    }
    if let Some(window_size) = non_empty(&step.window_size) {
        properties.insert(keys::STEP_MAX_PARALLELISM.to_string(), window_size.into());
    }

    Ok(DeploymentStep {
        id: non_empty(&step.id).map(str::to_string),
        name: string_or_empty(&step.name),
        condition: string_or_empty(&step.condition),
        package_requirement: string_or_empty(&step.package_requirement),
        start_trigger: string_or_empty(&step.start_trigger),
        properties,
        actions: step_actions(step)?,
    })
}

/// Builds the process to PUT. `current` is the process as the server has it;
/// its version is the one Octopus expects back.
pub fn to_deployment_process(
    state: &ProcessState,
    current: Option<&DeploymentProcess>,
) -> Result<DeploymentProcess> {
    Ok(DeploymentProcess {
        id: non_empty(&state.id)
            .map(str::to_string)
            .or_else(|| current.and_then(|c| c.id.clone())),
        space_id: non_empty(&state.space_id).map(str::to_string),
        project_id: string_or_empty(&state.project_id),
        version: current.map_or(0, |c| c.version),
        last_snapshot_id: non_empty(&state.last_snapshot_id).map(str::to_string),
        branch: non_empty(&state.branch).map(str::to_string),
        steps: blocks(&state.step).map(to_step).collect::<Result<_>>()?,
    })
}

fn empty_step() -> StepState {
    StepState {
        action: block_list([]),
        apply_terraform_template_action: block_list([]),
        deploy_kubernetes_secret_action: block_list([]),
        deploy_package_action: block_list([]),
        deploy_windows_service_action: block_list([]),
        manual_intervention_action: block_list([]),
        run_kubectl_script_action: block_list([]),
        run_script_action: block_list([]),
        ..Default::default()
    }
}

fn action_bases(step: &StepState) -> impl Iterator<Item = &ActionBase> {
    blocks(&step.action)
        .map(|a| &a.base)
        .chain(blocks(&step.manual_intervention_action).map(|a| &a.base))
        .chain(blocks(&step.apply_terraform_template_action).map(|a| &a.base))
        .chain(blocks(&step.deploy_package_action).map(|a| &a.base))
        .chain(blocks(&step.deploy_windows_service_action).map(|a| &a.base))
        .chain(blocks(&step.run_script_action).map(|a| &a.base))
        .chain(blocks(&step.run_kubectl_script_action).map(|a| &a.base))
        .chain(blocks(&step.deploy_kubernetes_secret_action).map(|a| &a.base))
}

fn action_bases_mut(step: &mut StepState) -> Vec<&mut ActionBase> {
    blocks_mut(&mut step.action)
        .map(|a| &mut a.base)
        .chain(blocks_mut(&mut step.manual_intervention_action).map(|a| &mut a.base))
        .chain(blocks_mut(&mut step.apply_terraform_template_action).map(|a| &mut a.base))
        .chain(blocks_mut(&mut step.deploy_package_action).map(|a| &mut a.base))
        .chain(blocks_mut(&mut step.deploy_windows_service_action).map(|a| &mut a.base))
        .chain(blocks_mut(&mut step.run_script_action).map(|a| &mut a.base))
        .chain(blocks_mut(&mut step.run_kubectl_script_action).map(|a| &mut a.base))
        .chain(blocks_mut(&mut step.deploy_kubernetes_secret_action).map(|a| &mut a.base))
        .collect()
}

fn find_named<'a, A: MappableAction>(list: Option<&'a Blocks<A>>, name: &str) -> Option<&'a A> {
    list.into_iter()
        .flat_map(blocks)
        .find(|action| known(&action.base().name).is_some_and(|n| n == name))
}

fn push_action<A: MappableAction>(
    list: &mut Blocks<A>,
    action: &DeploymentAction,
    prior: Option<&Blocks<A>>,
    sort_order: i64,
    position: i64,
) -> Result<()> {
    let mut state = A::to_state(action, find_named(prior, &action.name))?;
    let base = state.base_mut();
    base.sort_order = Value::Value(sort_order);
    base.computed_sort_order = Value::Value(position);
    if let Value::Value(items) = list {
        items.push(Value::Value(state));
    }
    Ok(())
}

fn step_to_state(step: &DeploymentStep, prior: Option<&StepState>) -> Result<StepState> {
    let plain = plain_properties(&step.properties);
    let target_roles: StringList = match plain.get(keys::STEP_TARGET_ROLES) {
        Some(roles) => flatten_list_or_null(
            roles
                .split(',')
                .map(str::trim)
                .filter(|role| !role.is_empty()),
        ),
        None => match prior.map(|p| &p.target_roles) {
            Some(Value::Value(roles)) if roles.is_empty() => flatten_list(Vec::<String>::new()),
            _ => Value::Null,
        },
    };
    let remaining = plain
        .iter()
        .filter(|(key, _)| !STEP_KEYS.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    let mut state = StepState {
        id: string(step.id.clone().unwrap_or_default()),
        name: string(step.name.as_str()),
        condition: string(step.condition.as_str()),
        condition_expression: string(
            plain
                .get(keys::STEP_CONDITION_EXPRESSION)
                .cloned()
                .unwrap_or_default(),
        ),
        package_requirement: string(step.package_requirement.as_str()),
        properties: properties_state(remaining, prior.map(|p| &p.properties)),
        start_trigger: string(step.start_trigger.as_str()),
        target_roles,
        window_size: string(
            plain
                .get(keys::STEP_MAX_PARALLELISM)
                .cloned()
                .unwrap_or_default(),
        ),
        ..empty_step()
    };

    for (position, action) in step.actions.iter().enumerate() {
        let sort_order = prior
            .and_then(|prior| {
                action_bases(prior)
                    .find(|base| known(&base.name).is_some_and(|name| *name == action.name))
            })
            .and_then(|base| known(&base.sort_order).copied())
            .unwrap_or(-1);
        let position = position as i64;

        match block_for_action_type(&action.action_type) {
            ManualInterventionActionState::BLOCK => push_action(
                &mut state.manual_intervention_action,
                action,
                prior.map(|p| &p.manual_intervention_action),
                sort_order,
                position,
            )?,
            TerraformTemplateActionState::BLOCK => push_action(
                &mut state.apply_terraform_template_action,
                action,
                prior.map(|p| &p.apply_terraform_template_action),
                sort_order,
                position,
            )?,
            PackageActionState::BLOCK => push_action(
                &mut state.deploy_package_action,
                action,
                prior.map(|p| &p.deploy_package_action),
                sort_order,
                position,
            )?,
            WindowsServiceActionState::BLOCK => push_action(
                &mut state.deploy_windows_service_action,
                action,
                prior.map(|p| &p.deploy_windows_service_action),
                sort_order,
                position,
            )?,
            RunScriptActionState::BLOCK => push_action(
                &mut state.run_script_action,
                action,
                prior.map(|p| &p.run_script_action),
                sort_order,
                position,
            )?,
            RunKubectlScriptActionState::BLOCK => push_action(
                &mut state.run_kubectl_script_action,
                action,
                prior.map(|p| &p.run_kubectl_script_action),
                sort_order,
                position,
            )?,
            KubernetesSecretActionState::BLOCK => push_action(
                &mut state.deploy_kubernetes_secret_action,
                action,
                prior.map(|p| &p.deploy_kubernetes_secret_action),
                sort_order,
                position,
            )?,
            _ => push_action(
                &mut state.action,
                action,
                prior.map(|p| &p.action),
                sort_order,
                position,
            )?,
        }
    }
    Ok(state)
}

fn find_step<'a>(process: Option<&'a ProcessState>, name: &str) -> Option<&'a StepState> {
    process
        .into_iter()
        .flat_map(|p| blocks(&p.step))
        .find(|step| known(&step.name).is_some_and(|n| n == name))
}

/// State of `process`. `prior` is the state being refreshed, if any; it is
/// consulted for values the API does not report.
pub fn to_state(process: &DeploymentProcess, prior: Option<&ProcessState>) -> Result<ProcessState> {
    let branch = match process.branch.as_deref().filter(|b| !b.is_empty()) {
        Some(branch) => string(branch),
        None => prior.map_or(Value::Null, |p| p.branch.clone()),
    };
    let steps = process
        .steps
        .iter()
        .map(|step| step_to_state(step, find_step(prior, &step.name)))
        .collect::<Result<Vec<_>>>()?;

    Ok(ProcessState {
        id: string(process.id.clone().unwrap_or_default()),
        space_id: optional_string(process.space_id.clone()),
        project_id: string(process.project_id.as_str()),
        branch,
        last_snapshot_id: optional_string(process.last_snapshot_id.clone()),
        version: string(process.version.to_string()),
        step: block_list(steps),
    })
}

fn plan_actions<A: MappableAction>(
    planned: &mut Blocks<A>,
    config: &Blocks<A>,
    prior: Option<&Blocks<A>>,
) {
    if is_null(config) {
        *planned = Value::Value(Vec::new());
        return;
    }
    let (Value::Value(planned), Value::Value(config)) = (planned, config) else {
        return;
    };
    for (planned_item, config_item) in planned.iter_mut().zip(config) {
        let (Value::Value(action), Value::Value(config_action)) = (planned_item, config_item) else {
            continue;
        };
        let prior_action = known(&config_action.base().name)
            .and_then(|name| find_named(prior, name));
        action.plan(config_action, prior_action);
    }
}

/// Predicts `computed_sort_order` with the same ordering the write path uses.
fn plan_computed_sort_order(step: &mut StepState) {
    let mut bases = action_bases_mut(step);
    let resolvable = bases
        .iter()
        .all(|base| known(&base.name).is_some() && !matches!(base.sort_order, Value::Unknown));
    if !resolvable {
        for base in bases {
            base.computed_sort_order = Value::Unknown;
        }
        return;
    }

    let declared = bases
        .iter()
        .enumerate()
        .map(|(index, base)| (declared_sort_order(&base.sort_order), index))
        .collect();
    for (position, index) in order_actions(declared).into_iter().enumerate() {
        bases[index].computed_sort_order = Value::Value(position as i64);
    }
}

fn plan_step(planned: &mut StepState, config: &StepState, prior: Option<&StepState>) {
    carry(&mut planned.id, &config.id, prior.map(|p| &p.id));
    default_to(&mut planned.condition, &config.condition, DEFAULT_STEP_CONDITION.to_string());
    default_to(
        &mut planned.package_requirement,
        &config.package_requirement,
        DEFAULT_PACKAGE_REQUIREMENT.to_string(),
    );
    default_to(
        &mut planned.start_trigger,
        &config.start_trigger,
        DEFAULT_START_TRIGGER.to_string(),
    );
    carry(
        &mut planned.condition_expression,
        &config.condition_expression,
        prior.map(|p| &p.condition_expression),
    );
    carry(&mut planned.window_size, &config.window_size, prior.map(|p| &p.window_size));
    carry(&mut planned.target_roles, &config.target_roles, prior.map(|p| &p.target_roles));
    carry(&mut planned.properties, &config.properties, prior.map(|p| &p.properties));

    plan_actions(&mut planned.action, &config.action, prior.map(|p| &p.action));
    plan_actions(
        &mut planned.manual_intervention_action,
        &config.manual_intervention_action,
        prior.map(|p| &p.manual_intervention_action),
    );
    plan_actions(
        &mut planned.apply_terraform_template_action,
        &config.apply_terraform_template_action,
        prior.map(|p| &p.apply_terraform_template_action),
    );
    plan_actions(
        &mut planned.deploy_package_action,
        &config.deploy_package_action,
        prior.map(|p| &p.deploy_package_action),
    );
    plan_actions(
        &mut planned.deploy_windows_service_action,
        &config.deploy_windows_service_action,
        prior.map(|p| &p.deploy_windows_service_action),
    );
    plan_actions(
        &mut planned.run_script_action,
        &config.run_script_action,
        prior.map(|p| &p.run_script_action),
    );
    plan_actions(
        &mut planned.run_kubectl_script_action,
        &config.run_kubectl_script_action,
        prior.map(|p| &p.run_kubectl_script_action),
    );
    plan_actions(
        &mut planned.deploy_kubernetes_secret_action,
        &config.deploy_kubernetes_secret_action,
        prior.map(|p| &p.deploy_kubernetes_secret_action),
    );

    plan_computed_sort_order(planned);
}

/// Fills the planned process from configuration and prior state.
///
/// The version is only predictable while the steps stay as they are.
pub fn plan_process(planned: &mut ProcessState, config: &ProcessState, prior: Option<&ProcessState>) {
    carry(&mut planned.id, &config.id, prior.map(|p| &p.id));
    carry(
        &mut planned.last_snapshot_id,
        &config.last_snapshot_id,
        prior.map(|p| &p.last_snapshot_id),
    );

    if let (Value::Value(steps), Value::Value(config_steps)) = (&mut planned.step, &config.step) {
        for (planned_item, config_item) in steps.iter_mut().zip(config_steps) {
            let (Value::Value(step), Value::Value(config_step)) = (planned_item, config_item) else {
                continue;
            };
            let prior_step = known(&config_step.name).and_then(|name| find_step(prior, name));
            plan_step(step, config_step, prior_step);
        }
    }

    planned.version = match prior {
        Some(prior) if planned.step == prior.step => prior.version.clone(),
        _ => Value::Unknown,
    };
}

/// Names of the action blocks that hold at least one action.
pub fn populated_action_blocks(step: &StepState) -> Vec<&'static str> {
    let counts = [
        blocks(&step.action).count(),
        blocks(&step.manual_intervention_action).count(),
        blocks(&step.apply_terraform_template_action).count(),
        blocks(&step.deploy_package_action).count(),
        blocks(&step.deploy_windows_service_action).count(),
        blocks(&step.run_script_action).count(),
        blocks(&step.run_kubectl_script_action).count(),
        blocks(&step.deploy_kubernetes_secret_action).count(),
    ];
    ACTION_BLOCKS
        .iter()
        .zip(counts)
        .filter(|(_, count)| *count > 0)
        .map(|(block, _)| *block)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::deployment_process::state::{GenericActionState, ScriptState};

    fn script(name: &str, sort_order: NumberValue) -> RunScriptActionState {
        RunScriptActionState {
            base: ActionBase {
                name: string(name),
                sort_order,
                ..Default::default()
            },
            script: ScriptState {
                script_body: string(format!("echo {name}")),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn step(name: &str, scripts: Vec<RunScriptActionState>) -> StepState {
        StepState {
            name: string(name),
            run_script_action: block_list(scripts),
            ..empty_step()
        }
    }

    fn process(steps: Vec<StepState>) -> ProcessState {
        ProcessState {
            id: string("deploymentprocess-Projects-1"),
            project_id: string("Projects-1"),
            space_id: string("Spaces-1"),
            step: block_list(steps),
            ..Default::default()
        }
    }

    #[test]
    fn undeclared_sort_order_ties_with_zero() {
        let ordered = order_actions(vec![
            (None, "a"),
            (Some(2), "b"),
            (Some(1), "c"),
            (None, "d"),
            (Some(1), "e"),
            (Some(0), "f"),
        ]);
        assert_eq!(ordered, vec!["a", "d", "f", "c", "e", "b"]);
    }

    #[test]
    fn actions_are_written_in_sort_order() {
        let state = process(vec![step(
            "Scripts",
            vec![script("third", Value::Value(2)), script("first", Value::Value(0)), script("second", Value::Value(1))],
        )]);
        let current = DeploymentProcess {
            version: 7,
            ..Default::default()
        };
        let process = to_deployment_process(&state, Some(&current)).expect("map");
        assert_eq!(process.version, 7);
        let names: Vec<_> = process.steps[0].actions.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["first", "second", "third"]);
    }

    #[test]
    fn actions_are_collected_block_by_block() {
        let mut step = step("Mixed", vec![script("script", Value::Null)]);
        step.manual_intervention_action = block_list([ManualInterventionActionState {
            base: ActionBase {
                name: string("approve"),
                ..Default::default()
            },
            instructions: string("ok?"),
            ..Default::default()
        }]);
        step.action = block_list([GenericActionState {
            base: ActionBase {
                name: string("generic"),
                ..Default::default()
            },
            action_type: string("Octopus.AzurePowerShell"),
            ..Default::default()
        }]);
        let process = to_deployment_process(&process(vec![step]), None).expect("map");
        let names: Vec<_> = process.steps[0].actions.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["generic", "approve", "script"]);
    }

    #[test]
    fn target_roles_are_joined_and_split() {
        let mut state_step = step("Deploy", vec![script("run", Value::Null)]);
        state_step.target_roles = flatten_list(["web", "api"]);
        state_step.window_size = string("2");
        state_step.properties = Value::Value(
            [("Custom".to_string(), string("x"))].into_iter().collect(),
        );
        let written = to_step(&state_step).expect("map");
        assert_eq!(
            written.properties[keys::STEP_TARGET_ROLES].as_plain(),
            Some("web,api")
        );
        assert_eq!(written.properties[keys::STEP_MAX_PARALLELISM].as_plain(), Some("2"));
        assert!(!written.properties.contains_key(keys::STEP_CONDITION_EXPRESSION));

        let read = step_to_state(&written, None).expect("read");
        assert_eq!(read.target_roles, flatten_list(["web", "api"]));
        assert_eq!(read.window_size, string("2"));
        assert_eq!(read.condition_expression, string(""));
        assert_eq!(
            read.properties,
            Value::Value([("Custom".to_string(), string("x"))].into_iter().collect())
        );
    }

    #[test]
    fn read_dispatches_by_action_type_and_keeps_sort_order() {
        let state = process(vec![step(
            "Scripts",
            vec![script("b", Value::Value(1)), script("a", Value::Value(0))],
        )]);
        let mut api = to_deployment_process(&state, None).expect("map");
        api.steps[0]
            .actions
            .push(DeploymentAction::new("yaml", "Octopus.KubernetesDeployRawYaml"));
        api.version = 3;

        let read = to_state(&api, Some(&state)).expect("read");
        assert_eq!(read.version, string("3"));
        let step = blocks(&read.step).next().expect("step");
        let scripts: Vec<_> = blocks(&step.run_script_action).collect();
        assert_eq!(scripts[0].base.name, string("a"));
        assert_eq!(scripts[0].base.sort_order, Value::Value(0));
        assert_eq!(scripts[0].base.computed_sort_order, Value::Value(0));
        assert_eq!(scripts[1].base.sort_order, Value::Value(1));

        let generic: Vec<_> = blocks(&step.action).collect();
        assert_eq!(generic.len(), 1);
        assert_eq!(generic[0].action_type, string("Octopus.KubernetesDeployRawYaml"));
        assert_eq!(generic[0].base.sort_order, Value::Value(-1));
        assert_eq!(generic[0].base.computed_sort_order, Value::Value(2));
    }

    #[test]
    fn plan_predicts_computed_sort_order() {
        let config = process(vec![step(
            "Scripts",
            vec![
                script("later", Value::Value(1)),
                script("unset", Value::Null),
                script("zero", Value::Value(0)),
            ],
        )]);
        let mut planned = config.clone();
        plan_process(&mut planned, &config, None);

        let step = blocks(&planned.step).next().expect("step");
        assert_eq!(step.condition, string(DEFAULT_STEP_CONDITION));
        assert_eq!(step.start_trigger, string(DEFAULT_START_TRIGGER));
        let scripts: Vec<_> = blocks(&step.run_script_action).collect();
        assert_eq!(scripts[1].base.sort_order, Value::Value(-1));
        assert_eq!(scripts[0].base.computed_sort_order, Value::Value(2));
        assert_eq!(scripts[1].base.computed_sort_order, Value::Value(0));
        assert_eq!(scripts[2].base.computed_sort_order, Value::Value(1));
        assert!(matches!(planned.version, Value::Unknown));
    }

    #[test]
    fn refreshed_state_plans_without_changes() {
        let config = process(vec![step(
            "Scripts",
            vec![script("one", Value::Null), script("two", Value::Null)],
        )]);
        let mut planned_on_create = config.clone();
        plan_process(&mut planned_on_create, &config, None);
        let mut api = to_deployment_process(&planned_on_create, None).expect("map");
        api.version = 4;
        api.steps[0].id = Some("Steps-1".to_string());
        for (index, action) in api.steps[0].actions.iter_mut().enumerate() {
            action.id = Some(format!("Actions-{index}"));
            action.slug = Some(format!("action-{index}"));
        }
        let prior = to_state(&api, Some(&planned_on_create)).expect("read");

        let mut planned = config.clone();
        plan_process(&mut planned, &config, Some(&prior));
        let planned_step = blocks(&planned.step).next().expect("step");
        let prior_step = blocks(&prior.step).next().expect("step");
        assert_eq!(planned_step, prior_step);
        assert_eq!(planned.version, string("4"));
    }

    #[test]
    fn populated_blocks_follow_collection_order() {
        let mut step = step("Mixed", vec![script("run", Value::Null)]);
        step.action = block_list([GenericActionState::default()]);
        assert_eq!(populated_action_blocks(&step), vec!["action", "run_script_action"]);
    }
}
