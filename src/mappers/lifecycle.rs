use tf_provider::value::Value;

use crate::data_sources::lifecycles::{LifecycleItem, PhaseItem};
use crate::model::{Lifecycle, Phase, RetentionPeriod};
use crate::resources::lifecycle::{LifecycleState, PhaseState, RetentionPolicyState};
use crate::value::{
    Blocks, block_list, blocks, bool_or, expand_list, flatten_list, known, non_empty, string,
    string_or_empty,
};

fn to_retention_period(policy: &RetentionPolicyState) -> RetentionPeriod {
    let defaults = RetentionPeriod::default();
    RetentionPeriod {
        quantity_to_keep: known(&policy.quantity_to_keep)
            .copied()
            .unwrap_or(defaults.quantity_to_keep),
        should_keep_forever: bool_or(&policy.should_keep_forever, defaults.should_keep_forever),
        unit: known(&policy.unit).cloned().unwrap_or(defaults.unit),
    }
}

fn retention_policy_state(period: &RetentionPeriod) -> RetentionPolicyState {
    RetentionPolicyState {
        quantity_to_keep: Value::Value(period.quantity_to_keep),
        should_keep_forever: Value::Value(period.should_keep_forever),
        unit: string(period.unit.as_str()),
    }
}

fn optional_policy(period: Option<&RetentionPeriod>) -> Value<RetentionPolicyState> {
    period.map_or(Value::Null, |period| Value::Value(retention_policy_state(period)))
}

/// Lifecycle-level policy. The server fills in its default when none is sent,
/// so that default stays out of state unless the configuration names it.
fn lifecycle_policy(
    period: Option<&RetentionPeriod>,
    prior: Option<&Value<RetentionPolicyState>>,
) -> Value<RetentionPolicyState> {
    let configured = prior.is_some_and(|policy| known(policy).is_some());
    match period {
        Some(period) if configured || *period != RetentionPeriod::default() => {
            Value::Value(retention_policy_state(period))
        }
        _ => Value::Null,
    }
}

fn to_phase(phase: &PhaseState) -> Phase {
    Phase {
        id: non_empty(&phase.id).map(str::to_string),
        name: string_or_empty(&phase.name),
        automatic_deployment_targets: expand_list(&phase.automatic_deployment_targets),
        optional_deployment_targets: expand_list(&phase.optional_deployment_targets),
        minimum_environments_before_promotion: known(&phase.minimum_environments_before_promotion)
            .copied()
            .unwrap_or_default(),
        is_optional_phase: bool_or(&phase.is_optional_phase, false),
        is_priority_phase: bool_or(&phase.is_priority_phase, false),
        release_retention_policy: known(&phase.release_retention_policy).map(to_retention_period),
        tentacle_retention_policy: known(&phase.tentacle_retention_policy).map(to_retention_period),
    }
}

pub fn to_lifecycle(state: &LifecycleState) -> Lifecycle {
    let policy = |policy: &Value<RetentionPolicyState>| {
        Some(known(policy).map(to_retention_period).unwrap_or_default())
    };
    Lifecycle {
        id: non_empty(&state.id).map(str::to_string),
        name: string_or_empty(&state.name),
        description: string_or_empty(&state.description),
        space_id: non_empty(&state.space_id).map(str::to_string),
        phases: blocks(&state.phase).map(to_phase).collect(),
        release_retention_policy: policy(&state.release_retention_policy),
        tentacle_retention_policy: policy(&state.tentacle_retention_policy),
    }
}

fn phase_state(phase: &Phase) -> PhaseState {
    PhaseState {
        id: string(phase.id.clone().unwrap_or_default()),
        name: string(phase.name.as_str()),
        automatic_deployment_targets: flatten_list(&phase.automatic_deployment_targets),
        optional_deployment_targets: flatten_list(&phase.optional_deployment_targets),
        minimum_environments_before_promotion: Value::Value(phase.minimum_environments_before_promotion),
        is_optional_phase: Value::Value(phase.is_optional_phase),
        is_priority_phase: Value::Value(phase.is_priority_phase),
        release_retention_policy: optional_policy(phase.release_retention_policy.as_ref()),
        tentacle_retention_policy: optional_policy(phase.tentacle_retention_policy.as_ref()),
    }
}

pub fn lifecycle_state(lifecycle: &Lifecycle, prior: Option<&LifecycleState>) -> LifecycleState {
    LifecycleState {
        id: string(lifecycle.id.clone().unwrap_or_default()),
        space_id: string(lifecycle.space_id.clone().unwrap_or_default()),
        name: string(lifecycle.name.as_str()),
        description: string(lifecycle.description.as_str()),
        phase: block_list(lifecycle.phases.iter().map(phase_state)),
        release_retention_policy: lifecycle_policy(
            lifecycle.release_retention_policy.as_ref(),
            prior.map(|p| &p.release_retention_policy),
        ),
        tentacle_retention_policy: lifecycle_policy(
            lifecycle.tentacle_retention_policy.as_ref(),
            prior.map(|p| &p.tentacle_retention_policy),
        ),
    }
}

/// Data source items list a missing policy as an empty list.
fn policy_items(period: Option<&RetentionPeriod>) -> Blocks<RetentionPolicyState> {
    block_list(period.map(retention_policy_state))
}

pub fn lifecycle_item(lifecycle: &Lifecycle) -> LifecycleItem {
    let phase = lifecycle.phases.iter().map(|phase| PhaseItem {
        id: string(phase.id.clone().unwrap_or_default()),
        name: string(phase.name.as_str()),
        automatic_deployment_targets: flatten_list(&phase.automatic_deployment_targets),
        optional_deployment_targets: flatten_list(&phase.optional_deployment_targets),
        minimum_environments_before_promotion: Value::Value(phase.minimum_environments_before_promotion),
        is_optional_phase: Value::Value(phase.is_optional_phase),
        is_priority_phase: Value::Value(phase.is_priority_phase),
        release_retention_policy: policy_items(phase.release_retention_policy.as_ref()),
        tentacle_retention_policy: policy_items(phase.tentacle_retention_policy.as_ref()),
    });
    LifecycleItem {
        id: string(lifecycle.id.clone().unwrap_or_default()),
        space_id: string(lifecycle.space_id.clone().unwrap_or_default()),
        name: string(lifecycle.name.as_str()),
        description: string(lifecycle.description.as_str()),
        phase: block_list(phase),
        release_retention_policy: policy_items(lifecycle.release_retention_policy.as_ref()),
        tentacle_retention_policy: policy_items(lifecycle.tentacle_retention_policy.as_ref()),
    }
}
