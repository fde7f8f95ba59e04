use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::error::Result;
use crate::model::DeploymentAction;
use crate::plan::recompute_if;
use crate::resources::deployment_process::state::{
    ActionBase, GenericActionState, KubernetesSecretActionState, ManualInterventionActionState,
    PackageActionState, RunKubectlScriptActionState, RunScriptActionState,
    TerraformTemplateActionState, WindowsServiceActionState,
};

mod base;
mod generic;
pub mod keys;
mod kubernetes;
mod manual;
mod script;
mod terraform;
mod windows_service;

pub use base::{ensure_feature_is_enabled, polyfill_status_check};

/// Action blocks of a step, in the order their actions are collected.
pub const ACTION_BLOCKS: [&str; 8] = [
    GenericActionState::BLOCK,
    ManualInterventionActionState::BLOCK,
    TerraformTemplateActionState::BLOCK,
    PackageActionState::BLOCK,
    WindowsServiceActionState::BLOCK,
    RunScriptActionState::BLOCK,
    RunKubectlScriptActionState::BLOCK,
    KubernetesSecretActionState::BLOCK,
];

static BLOCK_BY_ACTION_TYPE: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        (ManualInterventionActionState::ACTION_TYPE, ManualInterventionActionState::BLOCK),
        (TerraformTemplateActionState::ACTION_TYPE, TerraformTemplateActionState::BLOCK),
        (PackageActionState::ACTION_TYPE, PackageActionState::BLOCK),
        (WindowsServiceActionState::ACTION_TYPE, WindowsServiceActionState::BLOCK),
        (RunScriptActionState::ACTION_TYPE, RunScriptActionState::BLOCK),
        (RunKubectlScriptActionState::ACTION_TYPE, RunKubectlScriptActionState::BLOCK),
        (KubernetesSecretActionState::ACTION_TYPE, KubernetesSecretActionState::BLOCK),
    ])
});

/// Block an API action reads back into. Types without a dedicated block land in `action`.
pub fn block_for_action_type(action_type: &str) -> &'static str {
    BLOCK_BY_ACTION_TYPE
        .get(action_type)
        .copied()
        .unwrap_or(GenericActionState::BLOCK)
}

/// True when `action_type` is written by a dedicated block rather than the generic one.
pub fn has_dedicated_block(action_type: &str) -> bool {
    BLOCK_BY_ACTION_TYPE.contains_key(action_type)
}

/// One Terraform action block and the Octopus action type it writes.
pub trait MappableAction: Clone + PartialEq + Sized {
    /// Terraform block name inside a step.
    const BLOCK: &'static str;
    /// Octopus action type this block writes. Empty for the generic block.
    const ACTION_TYPE: &'static str;

    fn base(&self) -> &ActionBase;

    fn base_mut(&mut self) -> &mut ActionBase;

    fn to_deployment_action(&self) -> Result<DeploymentAction>;

    /// Builds block state from an API action. `prior` is the same-named action
    /// of this block in prior state, if any.
    fn to_state(action: &DeploymentAction, prior: Option<&Self>) -> Result<Self>;

    /// Kind-specific defaults and computed values.
    fn plan_kind(&mut self, config: &Self, prior: Option<&Self>);

    /// Fills the planned block from its configuration and prior state.
    ///
    /// `properties` and `features` are derived from the whole action, so they
    /// become unknown whenever anything else about the action changes.
    fn plan(&mut self, config: &Self, prior: Option<&Self>) {
        base::plan_base(self.base_mut(), config.base(), prior.map(Self::base));
        self.plan_kind(config, prior);

        let changed = match prior {
            None => true,
            Some(prior) => {
                let mut candidate = self.clone();
                let candidate_base = candidate.base_mut();
                candidate_base.properties = prior.base().properties.clone();
                candidate_base.features = prior.base().features.clone();
                candidate_base.computed_sort_order = prior.base().computed_sort_order.clone();
                candidate != *prior
            }
        };
        let planned = self.base_mut();
        recompute_if(&mut planned.properties, &config.base().properties, changed);
        recompute_if(&mut planned.features, &config.base().features, changed);
    }
}
